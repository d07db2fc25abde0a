use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application role. Exactly one per user; authoritative in the profile store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Admin,
    SuperAdmin,
    /// Assigned to every identity on first login
    #[default]
    GeneralUser,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Student,
        Role::Admin,
        Role::SuperAdmin,
        Role::GeneralUser,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            Student => "student",
            Admin => "admin",
            SuperAdmin => "super_admin",
            GeneralUser => "general_user",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use Role::*;
        match code {
            "student" => Some(Student),
            "admin" => Some(Admin),
            "super_admin" => Some(SuperAdmin),
            "general_user" => Some(GeneralUser),
            _ => None,
        }
    }
}

/// Unknown role code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role code: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_code(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes_roundtrip() {
        for role in Role::ALL {
            assert_eq!(Role::from_code(role.code()), Some(role));
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert_eq!(Role::from_code("teacher"), None);
        assert_eq!(
            "Admin".parse::<Role>(),
            Err(UnknownRole("Admin".to_string()))
        );
    }

    #[test]
    fn test_default_is_general_user() {
        assert_eq!(Role::default(), Role::GeneralUser);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), r#""super_admin""#);
        let role: Role = serde_json::from_str(r#""general_user""#).unwrap();
        assert_eq!(role, Role::GeneralUser);
    }
}
