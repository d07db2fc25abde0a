//! Roster Import
//!
//! Pre-creates `student` profiles from a roster so that the first sign-in
//! of those identities resolves to an existing record instead of being
//! provisioned as `general_user`. Each created profile gets a credential
//! derived from a shared secret, so re-running an import hands out the same
//! credentials again.

use std::sync::Arc;

use platform::crypto::derive_credential;
use serde::{Deserialize, Serialize};

use crate::domain::entity::profile::ProfileRecord;
use crate::domain::repository::ProfileStore;
use crate::domain::value_object::{identity_id::IdentityId, role::Role};
use crate::error::{AccessError, AccessResult};

/// One roster row
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RosterEntry {
    /// Provider-issued identity id the profile will be stored under
    pub id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub classroom: Option<String>,
}

impl RosterEntry {
    fn identity_id(&self) -> AccessResult<IdentityId> {
        let raw = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AccessError::InvalidRoster("missing id".to_string()))?;

        IdentityId::parse(raw).map_err(|e| AccessError::InvalidRoster(e.to_string()))
    }

    /// Email when present, else the identity id
    fn credential_subject<'a>(&'a self, id: &'a IdentityId) -> &'a str {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .unwrap_or(id.as_str())
    }

    fn to_record(&self) -> ProfileRecord {
        ProfileRecord {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            classroom: self.classroom.clone(),
            ..ProfileRecord::with_role(Role::Student)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCredential {
    pub id: IdentityId,
    pub subject: String,
    pub credential: String,
    /// False when a profile already existed and was left untouched
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    /// Zero-based position in the roster
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterReport {
    pub issued: Vec<IssuedCredential>,
    pub rejected: Vec<RejectedRow>,
}

impl RosterReport {
    pub fn created_count(&self) -> usize {
        self.issued.iter().filter(|c| c.created).count()
    }
}

pub struct RosterImport<S>
where
    S: ProfileStore,
{
    store: Arc<S>,
    secret: [u8; 32],
}

impl<S> RosterImport<S>
where
    S: ProfileStore,
{
    pub fn new(store: Arc<S>, secret: [u8; 32]) -> Self {
        Self { store, secret }
    }

    /// Import `entries`
    ///
    /// Invalid rows are rejected one by one. A store failure aborts the
    /// import; rows before it have already been written, and re-running the
    /// import is safe.
    pub async fn execute(&self, entries: &[RosterEntry]) -> AccessResult<RosterReport> {
        let mut report = RosterReport::default();

        for (row, entry) in entries.iter().enumerate() {
            let id = match entry.identity_id() {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(row, error = %e, "Roster row rejected");
                    report.rejected.push(RejectedRow {
                        row,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let created = match self.store.get_by_id(&id).await? {
                Some(_) => false,
                None => {
                    self.store.upsert(&id, &entry.to_record()).await?;
                    true
                }
            };

            let subject = entry.credential_subject(&id).to_string();
            report.issued.push(IssuedCredential {
                credential: derive_credential(&self.secret, &subject),
                subject,
                id,
                created,
            });
        }

        tracing::info!(
            issued = report.issued.len(),
            created = report.created_count(),
            rejected = report.rejected.len(),
            "Roster imported"
        );

        Ok(report)
    }
}
