//! Infrastructure Layer
//!
//! Profile store adapters and the identity provider implementation.

pub mod memory;
pub mod postgres;
pub mod push_provider;
pub mod retry;

pub use memory::InMemoryProfileStore;
pub use postgres::PgProfileStore;
pub use push_provider::PushIdentityProvider;
pub use retry::RetryingProfileStore;
