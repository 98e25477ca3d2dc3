//! Nested alias namespaces as supplied by project configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node of the alias namespace tree
///
/// Configuration supplies aliases as nested objects whose leaves are path
/// strings. Any other JSON shape is kept as [`AliasValue::Invalid`] so that
/// flattening can report it with its full dotted path instead of failing
/// somewhere inside the deserializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasValue {
    /// Target path or alias reference
    Leaf(String),
    /// Named sub-namespaces, in declaration order
    Namespace(IndexMap<String, AliasValue>),
    /// Anything else (number, bool, null, array)
    Invalid(serde_json::Value),
}

impl AliasValue {
    /// Create a leaf
    pub fn leaf(target: impl Into<String>) -> Self {
        Self::Leaf(target.into())
    }

    /// Create a namespace from `(key, value)` pairs
    pub fn namespace<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, AliasValue)>,
    {
        Self::Namespace(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Create an empty namespace
    #[must_use]
    pub fn empty() -> Self {
        Self::Namespace(IndexMap::new())
    }

    /// Check if this node is a leaf
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Human-readable shape name used in diagnostics
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Leaf(_) => "string",
            Self::Namespace(_) => "namespace",
            Self::Invalid(value) => match value {
                serde_json::Value::Null => "null",
                serde_json::Value::Bool(_) => "boolean",
                serde_json::Value::Number(_) => "number",
                serde_json::Value::Array(_) => "array",
                serde_json::Value::String(_) => "string",
                serde_json::Value::Object(_) => "object",
            },
        }
    }
}

impl Default for AliasValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<serde_json::Value> for AliasValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(target) => Self::Leaf(target),
            serde_json::Value::Object(map) => {
                Self::Namespace(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
            other => Self::Invalid(other),
        }
    }
}
