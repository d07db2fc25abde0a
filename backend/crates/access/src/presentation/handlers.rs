//! HTTP Handlers

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use platform::crypto::verify_signature;
use std::sync::Arc;

use crate::application::config::AccessConfig;
use crate::application::session_context::SessionContext;
use crate::domain::entity::app_user::AppUser;
use crate::domain::provider::IdentityProvider;
use crate::domain::value_object::role::Role;
use crate::error::{AccessError, AccessResult};
use crate::infra::push_provider::PushIdentityProvider;
use crate::presentation::dto::{
    AdminOverviewResponse, IdentityCallbackRequest, PageAction, PermissionPageResponse,
    SessionResponse,
};
use crate::presentation::middleware::CurrentUser;
use crate::presentation::router::{IDENTITY_SIGNATURE_HEADER, SIGN_OUT_PATH};

/// Shared state for session handlers
pub struct AccessAppState<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub session: Arc<SessionContext<P>>,
    pub config: Arc<AccessConfig>,
}

impl<P> Clone for AccessAppState<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/session
pub async fn session_status<P>(State(state): State<AccessAppState<P>>) -> Json<SessionResponse>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    Json(state.session.current().into())
}

/// POST /api/session/signin
pub async fn sign_in<P>(State(state): State<AccessAppState<P>>) -> AccessResult<StatusCode>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    state.session.sign_in().await?;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/session/signout
pub async fn sign_out<P>(State(state): State<AccessAppState<P>>) -> AccessResult<StatusCode>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    // Local user is already cleared even if the provider call fails
    state.session.sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Permission Page
// ============================================================================

/// GET /unauthorized
pub async fn permission_denied<P>(
    State(state): State<AccessAppState<P>>,
) -> Json<PermissionPageResponse>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let role = state.session.current().user.map(|user| user.role);

    Json(PermissionPageResponse {
        title: "Access denied".to_string(),
        message: "You do not have permission to view this page.".to_string(),
        role,
        actions: vec![
            PageAction {
                id: "home".to_string(),
                label: "Back to home".to_string(),
                method: "GET".to_string(),
                href: state.config.routes.home.clone(),
            },
            PageAction {
                id: "signOut".to_string(),
                label: "Sign out".to_string(),
                method: "POST".to_string(),
                href: SIGN_OUT_PATH.to_string(),
            },
        ],
    })
}

// ============================================================================
// Identity Gateway Callback
// ============================================================================

/// State for the gateway callback
#[derive(Clone)]
pub struct IdentityCallbackState {
    pub provider: PushIdentityProvider,
    /// Shared HMAC key, never logged
    pub secret: Arc<[u8]>,
}

/// POST /api/identity
///
/// The body must carry a base64 HMAC-SHA256 signature in
/// `X-Identity-Signature`. Nothing is published unless it verifies.
pub async fn identity_callback(
    State(state): State<IdentityCallbackState>,
    headers: HeaderMap,
    body: Bytes,
) -> AccessResult<StatusCode> {
    let signature = headers
        .get(IDENTITY_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AccessError::InvalidSignature)?;

    if !verify_signature(&state.secret, &body, signature) {
        return Err(AccessError::InvalidSignature);
    }

    let Json(req) = Json::<IdentityCallbackRequest>::from_bytes(&body)
        .map_err(|rejection| AccessError::InvalidCallback(rejection.body_text()))?;

    state.provider.publish(req.identity);
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Guarded Views
// ============================================================================

/// GET /api/me
pub async fn current_user(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<AppUser> {
    Json(user)
}

/// GET /api/admin/overview
pub async fn admin_overview(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<AdminOverviewResponse> {
    Json(AdminOverviewResponse {
        viewer: user,
        roles: Role::ALL.to_vec(),
    })
}
