//! Session
//!
//! Process-local view of who is signed in. Never persisted; rebuilt on
//! start-up from whatever the identity provider replays.

use serde::Serialize;

use crate::domain::entity::app_user::AppUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: Option<AppUser>,
    /// True until the first identity event has been resolved, and while a
    /// later one is being resolved
    pub loading: bool,
}

impl Session {
    /// Starting state: nobody yet, but still loading so that no gate treats
    /// the process as signed out before the provider has reported
    pub fn initial() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn resolved(user: AppUser) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    /// A new identity is being resolved; the previous user stays visible
    pub fn resolving(previous: Option<AppUser>) -> Self {
        Self {
            user: previous,
            loading: true,
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.loading
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initial()
    }
}
