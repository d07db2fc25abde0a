//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - HMAC payload signatures and deterministic credential derivation
//! - Retry policies with backoff for calls to external collaborators

pub mod crypto;
pub mod retry;
