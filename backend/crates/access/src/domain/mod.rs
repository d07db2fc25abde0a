//! Domain Layer
//!
//! Entities, value objects, and the traits for the two external
//! collaborators (profile store, identity provider).

pub mod entity;
pub mod provider;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    app_user::{AppUser, ProfileAttributes},
    profile::ProfileRecord,
    session::Session,
};
pub use provider::{IdentityProvider, IdentitySink, Subscription};
pub use repository::ProfileStore;
pub use value_object::{
    identity::{Identity, IdentityEvent},
    identity_id::IdentityId,
    person_name::PersonName,
    role::Role,
};
