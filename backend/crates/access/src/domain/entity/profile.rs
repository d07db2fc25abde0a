//! Profile Record
//!
//! The document kept in the profile store under an identity id. Fields the
//! document does not carry come back as their defaults, which for `role`
//! means `general_user`.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileRecord {
    pub email: Option<String>,
    pub avatar_ref: Option<String>,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Classroom or group, set by roster imports
    pub classroom: Option<String>,
    /// Assigned-domain tag for staff accounts
    pub domain_tag: Option<String>,
}

impl ProfileRecord {
    pub fn with_role(role: Role) -> Self {
        Self {
            role,
            ..Default::default()
        }
    }
}
