//! Flat alias table built from a nested namespace.

use crate::namespace::AliasValue;
use geoforge_core::{AliasName, PathResolutionError, ResolveResult};
use indexmap::IndexMap;
use serde::Serialize;

/// Validated mapping from dotted alias names to raw targets
///
/// Built once when project configuration loads and never mutated afterwards.
/// Entries keep the declaration order of the source namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AliasTable {
    entries: IndexMap<AliasName, String>,
}

impl AliasTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a namespace tree into a table
    ///
    /// # Errors
    ///
    /// Returns [`PathResolutionError::MalformedAliasTable`] naming the dotted
    /// path of the first leaf that is not a string, has an invalid composed
    /// name, or collides with an earlier entry.
    pub fn flatten(root: &AliasValue) -> ResolveResult<Self> {
        let mut table = Self::new();
        match root {
            AliasValue::Namespace(children) => {
                for (key, child) in children {
                    table.descend(key.clone(), child)?;
                }
            }
            other => {
                return Err(PathResolutionError::malformed(
                    "<root>",
                    format!("alias namespace must be an object, found {}", other.kind_name()),
                ));
            }
        }
        Ok(table)
    }

    /// Build a table from already-flat `(name, target)` pairs
    ///
    /// # Errors
    ///
    /// Returns error if a name is invalid or repeated
    pub fn from_entries<N, T, I>(entries: I) -> ResolveResult<Self>
    where
        N: Into<String>,
        T: Into<String>,
        I: IntoIterator<Item = (N, T)>,
    {
        let mut table = Self::new();
        for (name, target) in entries {
            table.insert(name.into(), target.into())?;
        }
        Ok(table)
    }

    fn descend(&mut self, path: String, value: &AliasValue) -> ResolveResult<()> {
        match value {
            AliasValue::Leaf(target) => self.insert(path, target.clone()),
            AliasValue::Namespace(children) => {
                for (key, child) in children {
                    self.descend(format!("{path}.{key}"), child)?;
                }
                Ok(())
            }
            AliasValue::Invalid(_) => Err(PathResolutionError::malformed(
                path,
                format!("expected a path string or namespace, found {}", value.kind_name()),
            )),
        }
    }

    fn insert(&mut self, path: String, target: String) -> ResolveResult<()> {
        let name = AliasName::new(path.clone())
            .map_err(|e| PathResolutionError::malformed(path.clone(), e.to_string()))?;
        if self.entries.contains_key(&name) {
            return Err(PathResolutionError::malformed(path, "alias defined more than once"));
        }
        self.entries.insert(name, target);
        Ok(())
    }

    /// Get the raw target of an alias
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Check if an alias is defined
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over `(name, target)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&AliasName, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Iterate over alias names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &AliasName> {
        self.entries.keys()
    }

    /// Get the number of aliases
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoforge_core::ErrorKind;
    use serde_json::json;

    fn ns(value: serde_json::Value) -> AliasValue {
        AliasValue::from(value)
    }

    #[test]
    fn test_flatten_nested() {
        let table = AliasTable::flatten(&ns(json!({
            "data": {"input": "data/in", "output": "data/out"},
            "cad": {"survey": {"raw": "survey/raw"}},
            "root": "."
        })))
        .unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.get("data.input"), Some("data/in"));
        assert_eq!(table.get("cad.survey.raw"), Some("survey/raw"));
        assert_eq!(table.get("root"), Some("."));
        assert_eq!(table.get("data"), None);
    }

    #[test]
    fn test_flatten_preserves_order() {
        let table = AliasTable::flatten(&ns(json!({"z": "1", "a": {"m": "2"}, "b": "3"}))).unwrap();
        let names: Vec<_> = table.names().map(AliasName::as_str).collect();
        assert_eq!(names, vec!["z", "a.m", "b"]);
    }

    #[test]
    fn test_flatten_empty_namespace() {
        let table = AliasTable::flatten(&ns(json!({"empty": {}}))).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_flatten_rejects_non_string_leaf() {
        let err = AliasTable::flatten(&ns(json!({"data": {"count": 3}}))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedAliasTable);
        assert_eq!(err.reference(), "data.count");
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_flatten_rejects_array_leaf() {
        let err = AliasTable::flatten(&ns(json!({"a": {"b": {"c": ["x"]}}}))).unwrap_err();
        assert_eq!(err.reference(), "a.b.c");
    }

    #[test]
    fn test_flatten_rejects_bad_names() {
        let err = AliasTable::flatten(&ns(json!({"bad key": "x"}))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedAliasTable);
        assert_eq!(err.reference(), "bad key");

        let err = AliasTable::flatten(&ns(json!({"data": {"": "x"}}))).unwrap_err();
        assert_eq!(err.reference(), "data.");
    }

    #[test]
    fn test_flatten_rejects_collisions() {
        let err = AliasTable::flatten(&ns(json!({"a.b": "x", "a": {"b": "y"}}))).unwrap_err();
        assert_eq!(err.reference(), "a.b");
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_flatten_rejects_leaf_root() {
        let err = AliasTable::flatten(&AliasValue::leaf("x")).unwrap_err();
        assert_eq!(err.reference(), "<root>");
    }

    #[test]
    fn test_from_entries() {
        let table = AliasTable::from_entries([("a", "@b"), ("b", "shared/dir")]).unwrap();
        assert_eq!(table.get("a"), Some("@b"));
        assert!(table.contains("b"));
        assert!(AliasTable::from_entries([("a..b", "x")]).is_err());
    }

    fn leaf_name() -> impl proptest::strategy::Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,6}"
    }

    proptest::proptest! {
        #[test]
        fn prop_flatten_lookup_roundtrip(
            tree in proptest::collection::btree_map(
                leaf_name(),
                proptest::collection::btree_map(leaf_name(), "[a-z/._-]{0,12}", 0..5),
                0..5,
            )
        ) {
            let mut root = serde_json::Map::new();
            for (outer, inner) in &tree {
                let mut child = serde_json::Map::new();
                for (k, v) in inner {
                    child.insert(k.clone(), serde_json::Value::String(v.clone()));
                }
                root.insert(outer.clone(), serde_json::Value::Object(child));
            }

            let root = AliasValue::from(serde_json::Value::Object(root));
            let table = AliasTable::flatten(&root).unwrap();
            let expected: usize = tree.values().map(|m| m.len()).sum();
            proptest::prop_assert_eq!(table.len(), expected);
            for (outer, inner) in &tree {
                for (k, v) in inner {
                    let name = format!("{outer}.{k}");
                    proptest::prop_assert_eq!(table.get(&name), Some(v.as_str()));
                }
            }
        }
    }
}
