//! Identity Resolver
//!
//! Turns a signed-in identity into an `AppUser`: existing profiles are
//! merged, unseen identities are provisioned, and store failures fall back
//! to a minimal unpersisted user so the session never stays loading.

use std::sync::Arc;

use derive_more::Display;

use crate::application::config::AccessConfig;
use crate::application::observer::FailureObserver;
use crate::application::provisioning::FirstLoginProvisioning;
use crate::domain::entity::app_user::AppUser;
use crate::domain::repository::ProfileStore;
use crate::domain::value_object::identity::Identity;
use crate::error::AccessResult;

/// Which branch produced the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ResolvedFrom {
    #[display("existing")]
    Existing,
    #[display("provisioned")]
    Provisioned,
    #[display("fallback")]
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub user: AppUser,
    pub source: ResolvedFrom,
}

pub struct IdentityResolver<S>
where
    S: ProfileStore,
{
    store: Arc<S>,
    provisioning: FirstLoginProvisioning<S>,
    observer: Arc<dyn FailureObserver>,
}

impl<S> IdentityResolver<S>
where
    S: ProfileStore,
{
    pub fn new(store: Arc<S>, observer: Arc<dyn FailureObserver>, config: Arc<AccessConfig>) -> Self {
        Self {
            provisioning: FirstLoginProvisioning::new(store.clone(), config),
            store,
            observer,
        }
    }

    /// Resolve `identity`. Never fails: store errors are reported to the
    /// observer and replaced by [`AppUser::fallback`], which is not persisted.
    pub async fn resolve(&self, identity: &Identity) -> Resolved {
        match self.try_resolve(identity).await {
            Ok(resolved) => {
                tracing::info!(
                    identity_id = %identity.id,
                    role = %resolved.user.role,
                    source = %resolved.source,
                    "Identity resolved"
                );
                resolved
            }
            Err(e) => {
                self.observer.report(Some(&identity.id), &e);
                Resolved {
                    user: AppUser::fallback(identity),
                    source: ResolvedFrom::Fallback,
                }
            }
        }
    }

    async fn try_resolve(&self, identity: &Identity) -> AccessResult<Resolved> {
        match self.store.get_by_id(&identity.id).await? {
            Some(record) => Ok(Resolved {
                user: AppUser::from_record(identity, record),
                source: ResolvedFrom::Existing,
            }),
            None => Ok(Resolved {
                user: self.provisioning.execute(identity).await?,
                source: ResolvedFrom::Provisioned,
            }),
        }
    }
}
