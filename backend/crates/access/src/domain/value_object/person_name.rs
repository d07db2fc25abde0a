//! Person Name Value Object
//!
//! First/last name derived from a provider display name.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
}

impl PersonName {
    /// Split a display name on whitespace
    ///
    /// First token is the first name, the remaining tokens joined by a single
    /// space are the last name. With no tokens at all, the first name is
    /// `default_first_name` and the last name is empty.
    pub fn from_display_name(display_name: Option<&str>, default_first_name: &str) -> Self {
        let mut tokens = display_name.unwrap_or_default().split_whitespace();

        match tokens.next() {
            Some(first) => Self {
                first_name: first.to_string(),
                last_name: tokens.collect::<Vec<_>>().join(" "),
            },
            None => Self {
                first_name: default_first_name.to_string(),
                last_name: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_token() {
        let name = PersonName::from_display_name(Some("Ana"), "User");
        assert_eq!(name.first_name, "Ana");
        assert_eq!(name.last_name, "");
    }

    #[test]
    fn test_remaining_tokens_joined_by_single_space() {
        let name = PersonName::from_display_name(Some("  Ana   María  de la Cruz "), "User");
        assert_eq!(name.first_name, "Ana");
        assert_eq!(name.last_name, "María de la Cruz");
    }

    #[test]
    fn test_missing_or_blank_uses_default() {
        for input in [None, Some(""), Some("   \t ")] {
            let name = PersonName::from_display_name(input, "User");
            assert_eq!(name.first_name, "User");
            assert_eq!(name.last_name, "");
        }
    }
}
