//! First-Login Provisioning
//!
//! Creates the profile of an identity the store has never seen. New users
//! always start as `general_user`; elevated roles only come from records
//! created out-of-band before the first sign-in, or from later admin edits.

use std::sync::Arc;

use crate::application::config::AccessConfig;
use crate::domain::entity::app_user::AppUser;
use crate::domain::repository::ProfileStore;
use crate::domain::value_object::{identity::Identity, person_name::PersonName};
use crate::error::AccessResult;

pub struct FirstLoginProvisioning<S>
where
    S: ProfileStore,
{
    store: Arc<S>,
    config: Arc<AccessConfig>,
}

impl<S> FirstLoginProvisioning<S>
where
    S: ProfileStore,
{
    pub fn new(store: Arc<S>, config: Arc<AccessConfig>) -> Self {
        Self { store, config }
    }

    /// Build the default profile and write it before returning it
    pub async fn execute(&self, identity: &Identity) -> AccessResult<AppUser> {
        let name = PersonName::from_display_name(
            identity.display_name.as_deref(),
            &self.config.default_first_name,
        );
        let user = AppUser::provisioned(identity, name);

        self.store.upsert(&user.id, &user.to_record()).await?;

        tracing::info!(
            identity_id = %user.id,
            role = %user.role,
            "Provisioned profile on first login"
        );

        Ok(user)
    }
}
