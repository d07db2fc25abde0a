//! Typed Opaque IDs
//!
//! Identifiers handed to us by external systems (identity providers,
//! document stores) are opaque strings. Wrapping them in a marker-typed
//! struct keeps an identity id from being passed where some other id is
//! expected, without assuming anything about the string's format.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Maximum accepted id length in bytes
pub const ID_MAX_LENGTH: usize = 128;

/// Reasons an external id is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidId {
    #[error("id must not be empty")]
    Empty,
    #[error("id must be at most {ID_MAX_LENGTH} bytes")]
    TooLong,
    #[error("id must not contain whitespace or control characters")]
    IllegalCharacter,
}

/// Generic typed id wrapper around an opaque string
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type IdentityId = Id<markers::Identity>;
///
/// let id = IdentityId::parse("uid-42").unwrap();
/// assert_eq!(id.as_str(), "uid-42");
/// ```
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Validate and wrap an externally issued id
    pub fn parse(value: impl Into<String>) -> Result<Self, InvalidId> {
        let value = value.into();

        if value.is_empty() {
            return Err(InvalidId::Empty);
        }
        if value.len() > ID_MAX_LENGTH {
            return Err(InvalidId::TooLong);
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(InvalidId::IllegalCharacter);
        }

        Ok(Self::from_trusted(value))
    }

    /// Wrap a value already validated elsewhere (e.g. read back from storage)
    pub fn from_trusted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

// Manual impls: deriving would put bounds on the marker type.

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::from_trusted(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(value).map_err(serde::de::Error::custom)
    }
}

/// Marker types for different id families
pub mod markers {
    /// Principal id issued by the identity provider
    pub struct Identity;
}

#[cfg(test)]
mod tests {
    use super::*;

    type IdentityId = Id<markers::Identity>;

    #[test]
    fn test_parse_accepts_opaque_ids() {
        let id = IdentityId::parse("x9Fq2LmZp0").unwrap();
        assert_eq!(id.as_str(), "x9Fq2LmZp0");
        assert_eq!(id.to_string(), "x9Fq2LmZp0");
    }

    #[test]
    fn test_parse_rejects_bad_ids() {
        assert_eq!(IdentityId::parse(""), Err(InvalidId::Empty));
        assert_eq!(IdentityId::parse("a b"), Err(InvalidId::IllegalCharacter));
        assert_eq!(
            IdentityId::parse("x".repeat(ID_MAX_LENGTH + 1)),
            Err(InvalidId::TooLong)
        );
    }

    #[test]
    fn test_serde_is_a_plain_string() {
        let id = IdentityId::parse("uid-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""uid-1""#);

        let back: IdentityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<IdentityId>(r#""""#).is_err());
    }
}
