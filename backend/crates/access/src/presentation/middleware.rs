//! Role Middleware
//!
//! Runs a [`RoleGate`] in front of protected routes. The request waits for a
//! loading session to settle, up to the configured bound.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;
use std::time::Duration;

use crate::application::config::{AccessConfig, GateRoutes};
use crate::application::role_gate::{GateDecision, RoleGate};
use crate::application::session_context::SessionContext;
use crate::domain::entity::app_user::AppUser;
use crate::domain::provider::IdentityProvider;
use crate::error::AccessError;

/// Middleware state: one gate and the session it reads
pub struct RoleGuard<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub session: Arc<SessionContext<P>>,
    pub gate: RoleGate,
    pub routes: GateRoutes,
    pub resolve_wait: Duration,
}

impl<P> RoleGuard<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub fn new(session: Arc<SessionContext<P>>, gate: RoleGate, config: &AccessConfig) -> Self {
        Self {
            session,
            gate,
            routes: config.routes.clone(),
            resolve_wait: config.resolve_wait,
        }
    }
}

impl<P> Clone for RoleGuard<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            gate: self.gate.clone(),
            routes: self.routes.clone(),
            resolve_wait: self.resolve_wait,
        }
    }
}

/// The granted user, stored in request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AppUser);

/// Middleware that requires one of the gate's roles
pub async fn require_roles<P>(
    State(guard): State<RoleGuard<P>>,
    mut req: Request,
    next: Next,
) -> Response
where
    P: IdentityProvider + Send + Sync + 'static,
{
    if guard.session.is_closed() {
        return AccessError::ContextClosed.into_response();
    }

    let session = match guard.session.wait_settled_for(guard.resolve_wait).await {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };

    match guard.gate.evaluate(&session) {
        GateDecision::Granted(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        GateDecision::Denied(denial) => {
            let target = denial.redirect_target(&guard.routes);
            tracing::debug!(
                denial = %denial,
                target = %target,
                path = %req.uri().path(),
                "Role gate denied request"
            );
            Redirect::to(target).into_response()
        }
        GateDecision::Pending => AccessError::ResolutionPending.into_response(),
    }
}
