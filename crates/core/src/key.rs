//! [`Key`]: a validated identifier for nodes, parameters, and outputs.
//!
//! Workflow authors name things with plain strings in JSON, but the runtime
//! should never have to wonder whether a name is empty, starts with a digit,
//! or contains characters that would break a later lookup. `Key` validates
//! once at the boundary (deserialization or explicit construction) and is
//! infallible to use from then on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A validated name: non-empty, ASCII, does not start with a digit, and
/// contains only alphanumerics, `_`, and `-`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Key(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum KeyError {
    #[error("key must not be empty")]
    Empty,

    #[error("key {0:?} must not start with a digit")]
    LeadingDigit(String),

    #[error("key {0:?} contains a character outside [A-Za-z0-9_-]")]
    InvalidChar(String),
}

impl Key {
    /// Validates `value` and returns a `Key`, or the first rule it breaks.
    pub fn new(value: impl Into<String>) -> Result<Self, KeyError> {
        let value = value.into();
        if value.is_empty() {
            return Err(KeyError::Empty);
        }
        if value.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return Err(KeyError::LeadingDigit(value));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(KeyError::InvalidChar(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Key {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Key::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifier() {
        assert_eq!(Key::new("node_1").unwrap().as_str(), "node_1");
    }

    #[test]
    fn accepts_hyphens() {
        assert!(Key::new("fetch-user").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Key::new("").unwrap_err(), KeyError::Empty);
    }

    #[test]
    fn rejects_leading_digit() {
        assert!(matches!(Key::new("1node"), Err(KeyError::LeadingDigit(_))));
    }

    #[test]
    fn rejects_invalid_char() {
        assert!(matches!(Key::new("a b"), Err(KeyError::InvalidChar(_))));
        assert!(matches!(Key::new("a.b"), Err(KeyError::InvalidChar(_))));
    }

    #[test]
    fn display_roundtrips_to_source_string() {
        let key = Key::new("my_key").unwrap();
        assert_eq!(key.to_string(), "my_key");
    }

    #[test]
    fn from_str_matches_new() {
        let key: Key = "abc".parse().unwrap();
        assert_eq!(key.as_str(), "abc");
    }

    #[test]
    fn serde_roundtrip() {
        let key = Key::new("out_1").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"out_1\"");
        let back: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }

    #[test]
    fn serde_rejects_invalid_on_the_way_in() {
        let result: Result<Key, _> = serde_json::from_str("\"1bad\"");
        assert!(result.is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = Key::new("a").unwrap();
        let b = Key::new("b").unwrap();
        assert!(a < b);
    }
}
