//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AccessAppState;
pub use middleware::{CurrentUser, RoleGuard, require_roles};
pub use router::{access_router, guarded, guarded_router, identity_callback_router};
