//! AppUser Entity
//!
//! The application-level user: identity id, mirrored contact fields, the
//! role, and optional role-specific attributes. Attributes never take part
//! in authorization decisions.

use serde::{Deserialize, Serialize};

use crate::domain::entity::profile::ProfileRecord;
use crate::domain::value_object::{
    identity::Identity, identity_id::IdentityId, person_name::PersonName, role::Role,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    /// Equals the identity id; never reassigned
    pub id: IdentityId,
    pub email: Option<String>,
    pub avatar_ref: Option<String>,
    pub role: Role,
    #[serde(flatten)]
    pub attributes: ProfileAttributes,
}

/// Optional, additive profile fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAttributes {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub classroom: Option<String>,
    pub domain_tag: Option<String>,
}

impl AppUser {
    /// Merge a stored profile with the identity that resolved to it
    ///
    /// Stored email/avatar win; the identity's values only fill gaps. The
    /// role is always the stored one.
    pub fn from_record(identity: &Identity, record: ProfileRecord) -> Self {
        Self {
            id: identity.id.clone(),
            email: record.email.or_else(|| identity.email.clone()),
            avatar_ref: record.avatar_ref.or_else(|| identity.avatar_ref.clone()),
            role: record.role,
            attributes: ProfileAttributes {
                first_name: record.first_name,
                last_name: record.last_name,
                classroom: record.classroom,
                domain_tag: record.domain_tag,
            },
        }
    }

    /// New user created by first-login provisioning
    pub fn provisioned(identity: &Identity, name: PersonName) -> Self {
        Self {
            id: identity.id.clone(),
            email: identity.email.clone(),
            avatar_ref: identity.avatar_ref.clone(),
            role: Role::GeneralUser,
            attributes: ProfileAttributes {
                first_name: Some(name.first_name),
                last_name: Some(name.last_name),
                ..Default::default()
            },
        }
    }

    /// Minimal unpersisted user used when the profile store is unreachable
    pub fn fallback(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            email: identity.email.clone(),
            avatar_ref: identity.avatar_ref.clone(),
            role: Role::GeneralUser,
            attributes: ProfileAttributes::default(),
        }
    }

    /// Document to persist under `self.id`
    pub fn to_record(&self) -> ProfileRecord {
        ProfileRecord {
            email: self.email.clone(),
            avatar_ref: self.avatar_ref.clone(),
            role: self.role,
            first_name: self.attributes.first_name.clone(),
            last_name: self.attributes.last_name.clone(),
            classroom: self.attributes.classroom.clone(),
            domain_tag: self.attributes.domain_tag.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity::new(IdentityId::parse("uid-1").unwrap())
            .with_email("provider@mail.test")
            .with_display_name("Ana Ruiz")
            .with_avatar_ref("https://img/provider.png")
    }

    #[test]
    fn test_stored_contact_fields_win() {
        let record = ProfileRecord {
            email: Some("stored@mail.test".into()),
            role: Role::Admin,
            ..Default::default()
        };

        let user = AppUser::from_record(&identity(), record);
        assert_eq!(user.email.as_deref(), Some("stored@mail.test"));
        assert_eq!(user.avatar_ref.as_deref(), Some("https://img/provider.png"));
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_provisioned_user_is_general_user() {
        let name = PersonName::from_display_name(Some("Ana Ruiz"), "User");
        let user = AppUser::provisioned(&identity(), name);
        assert_eq!(user.role, Role::GeneralUser);
        assert_eq!(user.attributes.first_name.as_deref(), Some("Ana"));
        assert_eq!(user.attributes.last_name.as_deref(), Some("Ruiz"));
        assert_eq!(user.email.as_deref(), Some("provider@mail.test"));
    }

    #[test]
    fn test_fallback_has_no_attributes() {
        let user = AppUser::fallback(&identity());
        assert_eq!(user.role, Role::GeneralUser);
        assert_eq!(user.attributes, ProfileAttributes::default());
    }

    #[test]
    fn test_record_roundtrip_preserves_user() {
        let name = PersonName::from_display_name(Some("Ana Ruiz"), "User");
        let user = AppUser::provisioned(&identity(), name);
        let again = AppUser::from_record(&identity(), user.to_record());
        assert_eq!(again, user);
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let user = AppUser::fallback(&identity());
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], "uid-1");
        assert_eq!(json["role"], "general_user");
        assert!(json.get("firstName").is_some());
        assert!(json.get("attributes").is_none());
    }
}
