//! Shared Kernel
//!
//! Vocabulary that every backend crate agrees on:
//! - Error classification and the unified [`error::app_error::AppError`]
//! - Typed, opaque identifiers issued by external systems
//!
//! Nothing domain specific belongs here. If a type only makes sense inside
//! one crate, it lives in that crate.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
