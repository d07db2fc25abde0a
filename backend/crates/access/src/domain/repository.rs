//! Repository Traits
//!
//! Interface to the external profile store. Implementations are in the
//! infrastructure layer.

use crate::domain::entity::profile::ProfileRecord;
use crate::domain::value_object::identity_id::IdentityId;
use crate::error::AccessResult;

/// Profile store trait
///
/// Point operations keyed by identity id. No transactions; `upsert` must be
/// idempotent so concurrent provisioning of the same id is harmless.
#[trait_variant::make(ProfileStore: Send)]
pub trait LocalProfileStore {
    /// Find the stored profile, `None` when the id has never been provisioned
    async fn get_by_id(&self, id: &IdentityId) -> AccessResult<Option<ProfileRecord>>;

    /// Insert or replace the profile stored under `id`
    async fn upsert(&self, id: &IdentityId, record: &ProfileRecord) -> AccessResult<()>;
}
