//! Retrying Profile Store
//!
//! Wraps any profile store with the configured retry policy. Retries live in
//! the adapter: the resolver sees one call that either succeeds or fails
//! after the last attempt, and falls back from there.

use platform::retry::{RetryConfig, retry_async};

use crate::domain::entity::profile::ProfileRecord;
use crate::domain::repository::ProfileStore;
use crate::domain::value_object::identity_id::IdentityId;
use crate::error::{AccessError, AccessResult};

pub struct RetryingProfileStore<S> {
    inner: S,
    policy: RetryConfig,
}

impl<S> RetryingProfileStore<S> {
    pub fn new(inner: S, policy: RetryConfig) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn policy(&self) -> &RetryConfig {
        &self.policy
    }
}

impl<S> ProfileStore for RetryingProfileStore<S>
where
    S: ProfileStore + Sync,
{
    async fn get_by_id(&self, id: &IdentityId) -> AccessResult<Option<ProfileRecord>> {
        retry_async(&self.policy, AccessError::is_store_failure, || {
            self.inner.get_by_id(id)
        })
        .await
    }

    async fn upsert(&self, id: &IdentityId, record: &ProfileRecord) -> AccessResult<()> {
        retry_async(&self.policy, AccessError::is_store_failure, || {
            self.inner.upsert(id, record)
        })
        .await
    }
}
