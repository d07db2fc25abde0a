//! Access Routers

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AccessConfig;
use crate::application::role_gate::RoleGate;
use crate::application::session_context::SessionContext;
use crate::domain::provider::IdentityProvider;
use crate::domain::value_object::role::Role;
use crate::infra::push_provider::PushIdentityProvider;
use crate::presentation::handlers::{self, AccessAppState, IdentityCallbackState};
use crate::presentation::middleware::{RoleGuard, require_roles};

pub const SESSION_PATH: &str = "/api/session";
pub const SIGN_IN_PATH: &str = "/api/session/signin";
pub const SIGN_OUT_PATH: &str = "/api/session/signout";
pub const IDENTITY_CALLBACK_PATH: &str = "/api/identity";
pub const IDENTITY_SIGNATURE_HEADER: &str = "x-identity-signature";

/// Session endpoints and the permission page
pub fn access_router<P>(session: Arc<SessionContext<P>>, config: Arc<AccessConfig>) -> Router
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let denied_path = config.routes.permission_denied.clone();
    let state = AccessAppState { session, config };

    let mut router = Router::new()
        .route(SESSION_PATH, get(handlers::session_status::<P>))
        .route(SIGN_IN_PATH, post(handlers::sign_in::<P>))
        .route(SIGN_OUT_PATH, post(handlers::sign_out::<P>));

    // An absolute URL means the page is served elsewhere
    if denied_path.starts_with('/') {
        router = router.route(&denied_path, get(handlers::permission_denied::<P>));
    } else {
        tracing::info!(route = %denied_path, "Permission page served externally");
    }

    router.with_state(state)
}

/// Endpoint the identity gateway pushes session changes to
///
/// Callbacks must be signed with `secret`, see [`handlers::identity_callback`].
pub fn identity_callback_router(
    provider: PushIdentityProvider,
    secret: impl Into<Arc<[u8]>>,
) -> Router {
    let state = IdentityCallbackState {
        provider,
        secret: secret.into(),
    };

    Router::new()
        .route(IDENTITY_CALLBACK_PATH, post(handlers::identity_callback))
        .with_state(state)
}

/// Put every route of `router` behind `gate`
pub fn guarded<P>(
    router: Router,
    session: Arc<SessionContext<P>>,
    gate: RoleGate,
    config: &AccessConfig,
) -> Router
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let guard = RoleGuard::new(session, gate, config);
    router.route_layer(middleware::from_fn_with_state(guard, require_roles::<P>))
}

/// Guarded views: `/api/me` for any role, `/api/admin/overview` for admins
pub fn guarded_router<P>(session: Arc<SessionContext<P>>, config: &AccessConfig) -> Router
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let me = guarded(
        Router::new().route("/api/me", get(handlers::current_user)),
        session.clone(),
        RoleGate::any_role(),
        config,
    );

    let admin = guarded(
        Router::new().route("/api/admin/overview", get(handlers::admin_overview)),
        session,
        RoleGate::new([Role::Admin, Role::SuperAdmin]),
        config,
    );

    me.merge(admin)
}
