//! Failure Observer
//!
//! Collaborator that is told about failures the identity pipeline absorbs
//! (store outages during resolution, provider errors on sign-in).

use crate::domain::value_object::identity_id::IdentityId;
use crate::error::AccessError;

pub trait FailureObserver: Send + Sync {
    /// A failure was absorbed; `identity` is set when it happened while
    /// resolving a specific identity
    fn report(&self, identity: Option<&IdentityId>, error: &AccessError);
}

/// Default observer: structured log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FailureObserver for TracingObserver {
    fn report(&self, identity: Option<&IdentityId>, error: &AccessError) {
        match identity {
            Some(id) if error.is_store_failure() => tracing::error!(
                identity_id = %id,
                error = %error,
                "Profile store failed during resolution, using fallback user"
            ),
            Some(id) => tracing::warn!(identity_id = %id, error = %error, "Identity pipeline failure"),
            None => tracing::warn!(error = %error, "Identity pipeline failure"),
        }
    }
}
