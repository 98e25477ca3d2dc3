//! Validated dot-notation alias names.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// Grammar for alias names: dot-separated segments of `[A-Za-z0-9_-]`.
///
/// This rejects leading and trailing dots and consecutive dots.
pub const ALIAS_NAME_PATTERN: &str = r"^[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)*$";

static ALIAS_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(ALIAS_NAME_PATTERN).expect("Alias name pattern must compile"));

/// Error for a name that violates the alias grammar
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// Name is empty
    #[error("alias name is empty")]
    Empty,
    /// Name starts or ends with a dot
    #[error("alias name `{0}` must not start or end with '.'")]
    EdgeDot(String),
    /// Name contains `..`
    #[error("alias name `{0}` must not contain consecutive dots")]
    ConsecutiveDots(String),
    /// Name contains a character outside `[A-Za-z0-9._-]`
    #[error("alias name `{0}` may only contain letters, digits, '.', '_' and '-'")]
    InvalidCharacter(String),
}

/// Dot-notation alias name such as `data.input`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AliasName(String);

impl AliasName {
    /// Validate and wrap a name
    ///
    /// # Errors
    ///
    /// Returns error if the name violates [`ALIAS_NAME_PATTERN`]
    pub fn new(value: impl Into<String>) -> Result<Self, NameError> {
        let value = value.into();
        if ALIAS_NAME_REGEX.is_match(&value) {
            return Ok(Self(value));
        }
        Err(Self::diagnose(value))
    }

    /// Check a name without allocating
    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        ALIAS_NAME_REGEX.is_match(value)
    }

    /// Get the name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the dot-separated segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Check whether the name starts with `prefix` as a plain string
    ///
    /// No segment boundary is required: `data` matches `database.x`.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    fn diagnose(value: String) -> NameError {
        if value.is_empty() {
            NameError::Empty
        } else if value.starts_with('.') || value.ends_with('.') {
            NameError::EdgeDot(value)
        } else if value.contains("..") {
            NameError::ConsecutiveDots(value)
        } else {
            NameError::InvalidCharacter(value)
        }
    }
}

impl fmt::Display for AliasName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AliasName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AliasName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for AliasName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AliasName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        AliasName::new(value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["data", "data.input", "cad-2.raw_files", "A.b.C", "0"] {
            assert!(AliasName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(AliasName::new(""), Err(NameError::Empty));
        assert!(matches!(AliasName::new(".data"), Err(NameError::EdgeDot(_))));
        assert!(matches!(AliasName::new("data."), Err(NameError::EdgeDot(_))));
        assert!(matches!(AliasName::new("a..b"), Err(NameError::ConsecutiveDots(_))));
        assert!(matches!(AliasName::new("a/b"), Err(NameError::InvalidCharacter(_))));
        assert!(matches!(AliasName::new("a b"), Err(NameError::InvalidCharacter(_))));
        assert!(matches!(AliasName::new("@a"), Err(NameError::InvalidCharacter(_))));
    }

    #[test]
    fn test_segments() {
        let name = AliasName::new("cad.input.raw").unwrap();
        let segments: Vec<_> = name.segments().collect();
        assert_eq!(segments, vec!["cad", "input", "raw"]);
    }

    #[test]
    fn test_starts_with_is_string_prefix() {
        let name = AliasName::new("database.x").unwrap();
        assert!(name.starts_with("data"));
        assert!(name.starts_with("database.x"));
        assert!(!name.starts_with("x"));
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let ok: AliasName = serde_json::from_str("\"data.input\"").unwrap();
        assert_eq!(ok.as_str(), "data.input");

        let bad: Result<AliasName, _> = serde_json::from_str("\"data..input\"");
        assert!(bad.is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_valid_names_never_have_edge_or_double_dots(s in "[A-Za-z0-9._-]{1,24}") {
            if AliasName::is_valid(&s) {
                proptest::prop_assert!(!s.starts_with('.'));
                proptest::prop_assert!(!s.ends_with('.'));
                proptest::prop_assert!(!s.contains(".."));
            }
        }
    }
}
