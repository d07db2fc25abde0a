//! Access (Role-Based Access Gate) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, store and provider traits
//! - `application/` - Identity pipeline, session context, role gates
//! - `infra/` - Profile store adapters, push identity provider
//! - `presentation/` - HTTP handlers, DTOs, router, role middleware
//!
//! ## Flow
//! The identity provider pushes session changes through the listener bridge
//! onto a single-consumer channel. The resolver task turns each signed-in
//! identity into an `AppUser` (existing profile, first-login provisioning,
//! or an unpersisted fallback when the store is down) and publishes the
//! `Session`. Role gates read the session and decide `Pending`, `Denied` or
//! `Granted`.
//!
//! ## Authorization Model
//! - One role per user, stored in the profile store and never taken from the provider
//! - New identities start as `general_user`
//! - Denial is a gate outcome with a redirect, not an error

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AccessConfig, GateRoutes};
pub use application::session_context::SessionContext;
pub use error::{AccessError, AccessResult};
pub use infra::{
    memory::InMemoryProfileStore, postgres::PgProfileStore, push_provider::PushIdentityProvider,
    retry::RetryingProfileStore,
};
pub use presentation::router::{access_router, guarded_router, identity_callback_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
