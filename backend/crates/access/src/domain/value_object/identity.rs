//! Identity Value Object
//!
//! The raw principal as reported by the identity provider. Read-only here:
//! the provider is its source of truth.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::identity_id::IdentityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: IdentityId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_ref: Option<String>,
}

impl Identity {
    pub fn new(id: IdentityId) -> Self {
        Self {
            id,
            email: None,
            display_name: None,
            avatar_ref: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_avatar_ref(mut self, avatar_ref: impl Into<String>) -> Self {
        self.avatar_ref = Some(avatar_ref.into());
        self
    }
}

/// One session-change notification from the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    SignedIn(Identity),
    SignedOut,
}

impl IdentityEvent {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            IdentityEvent::SignedIn(identity) => Some(identity),
            IdentityEvent::SignedOut => None,
        }
    }
}

impl From<Option<Identity>> for IdentityEvent {
    fn from(identity: Option<Identity>) -> Self {
        match identity {
            Some(identity) => IdentityEvent::SignedIn(identity),
            None => IdentityEvent::SignedOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_deserializes_with_missing_optionals() {
        let identity: Identity = serde_json::from_str(r#"{"id":"uid-7"}"#).unwrap();
        assert_eq!(identity.id.as_str(), "uid-7");
        assert!(identity.email.is_none());
        assert!(identity.display_name.is_none());
        assert!(identity.avatar_ref.is_none());
    }

    #[test]
    fn test_identity_camel_case_fields() {
        let json = r#"{"id":"uid-7","displayName":"Ana Ruiz","avatarRef":"https://img/a.png"}"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.display_name.as_deref(), Some("Ana Ruiz"));
        assert_eq!(identity.avatar_ref.as_deref(), Some("https://img/a.png"));
    }

    #[test]
    fn test_event_from_option() {
        let identity = Identity::new(IdentityId::parse("uid-1").unwrap());
        let event = IdentityEvent::from(Some(identity.clone()));
        assert_eq!(event.identity(), Some(&identity));
        assert_eq!(IdentityEvent::from(None), IdentityEvent::SignedOut);
    }
}
