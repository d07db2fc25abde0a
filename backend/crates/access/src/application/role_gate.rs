//! Role Gate
//!
//! Decides whether a guarded view may proceed given the current session and
//! an allow-list of roles. The decision is pure; the redirect it implies is
//! performed separately by [`GuardedView`], at most once per denial.

use derive_more::Display;
use tokio::sync::watch;

use crate::application::config::GateRoutes;
use crate::domain::entity::{app_user::AppUser, session::Session};
use crate::domain::value_object::role::Role;

/// Why a gate denied access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Denial {
    /// Session settled with nobody signed in
    #[display("unauthenticated")]
    Unauthenticated,
    /// Signed in, but the role is not on the allow-list
    #[display("role {role} not allowed")]
    Forbidden { role: Role },
}

impl Denial {
    pub fn redirect_target<'a>(&self, routes: &'a GateRoutes) -> &'a str {
        match self {
            Denial::Unauthenticated => &routes.unauthenticated_entry,
            Denial::Forbidden { .. } => &routes.permission_denied,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session still loading; nothing may be decided yet
    Pending,
    Denied(Denial),
    Granted(AppUser),
}

impl GateDecision {
    pub fn is_pending(&self) -> bool {
        matches!(self, GateDecision::Pending)
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, GateDecision::Granted(_))
    }

    pub fn user(&self) -> Option<&AppUser> {
        match self {
            GateDecision::Granted(user) => Some(user),
            _ => None,
        }
    }
}

/// Allow-list of roles for one guarded entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGate {
    allowed: Vec<Role>,
}

impl RoleGate {
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        let mut roles: Vec<Role> = Vec::new();
        for role in allowed {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        Self { allowed: roles }
    }

    /// Any signed-in user
    pub fn any_role() -> Self {
        Self::new(Role::ALL)
    }

    pub fn allowed(&self) -> &[Role] {
        &self.allowed
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    pub fn evaluate(&self, session: &Session) -> GateDecision {
        if session.loading {
            return GateDecision::Pending;
        }

        match &session.user {
            None => GateDecision::Denied(Denial::Unauthenticated),
            Some(user) if self.allows(user.role) => GateDecision::Granted(user.clone()),
            Some(user) => GateDecision::Denied(Denial::Forbidden { role: user.role }),
        }
    }
}

/// Performs navigation for a denied gate
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, target: &str) {
        self(target)
    }
}

/// One mounted guarded view: a gate, its current decision, and the
/// navigation side effect
///
/// Re-evaluating the same denial does not navigate again. A view that was
/// granted and is later denied (e.g. sign-out while open) navigates once
/// more.
pub struct GuardedView<N>
where
    N: Navigator,
{
    gate: RoleGate,
    routes: GateRoutes,
    navigator: N,
    decision: GateDecision,
    redirected_to: Option<String>,
}

impl<N> GuardedView<N>
where
    N: Navigator,
{
    pub fn mount(gate: RoleGate, routes: GateRoutes, navigator: N) -> Self {
        Self {
            gate,
            routes,
            navigator,
            decision: GateDecision::Pending,
            redirected_to: None,
        }
    }

    pub fn decision(&self) -> &GateDecision {
        &self.decision
    }

    /// Re-evaluate against `session`, navigating if newly denied
    pub fn observe(&mut self, session: &Session) -> &GateDecision {
        let decision = self.gate.evaluate(session);

        match &decision {
            GateDecision::Denied(denial) => {
                let target = denial.redirect_target(&self.routes);
                if self.redirected_to.as_deref() != Some(target) {
                    tracing::debug!(denial = %denial, target = %target, "Role gate redirect");
                    self.navigator.navigate(target);
                    self.redirected_to = Some(target.to_string());
                }
            }
            GateDecision::Granted(_) => self.redirected_to = None,
            GateDecision::Pending => {}
        }

        self.decision = decision;
        &self.decision
    }

    /// Evaluate the current session and then every change, until the
    /// session context goes away
    pub async fn follow(&mut self, mut sessions: watch::Receiver<Session>) {
        loop {
            let session = sessions.borrow_and_update().clone();
            self.observe(&session);

            if sessions.changed().await.is_err() {
                break;
            }
        }
    }
}
