//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::{app_user::AppUser, session::Session};
use crate::domain::value_object::{identity::Identity, role::Role};

// ============================================================================
// Session
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub loading: bool,
    pub user: Option<AppUser>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            loading: session.loading,
            user: session.user,
        }
    }
}

// ============================================================================
// Identity Gateway Callback
// ============================================================================

/// Pushed by the identity gateway on every session change
///
/// `identity: null` (or a missing field) means signed out.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityCallbackRequest {
    #[serde(default)]
    pub identity: Option<Identity>,
}

// ============================================================================
// Permission Page
// ============================================================================

/// What the permission-denied page offers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionPageResponse {
    pub title: String,
    pub message: String,
    /// Role of the signed-in user, if any
    pub role: Option<Role>,
    pub actions: Vec<PageAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAction {
    pub id: String,
    pub label: String,
    pub method: String,
    pub href: String,
}

// ============================================================================
// Guarded Views
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverviewResponse {
    pub viewer: AppUser,
    pub roles: Vec<Role>,
}
