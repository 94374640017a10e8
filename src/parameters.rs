//! Dotted-path lookups over the immutable parameter tree.

use std::collections::BTreeMap;

use crate::error::{DiError, DiResult};
use crate::value::Value;

/// Immutable nested parameter tree.
///
/// Paths are split on `.` and walked one segment at a time. A path may stop
/// at an inner node, in which case the whole sub-tree is returned. Map
/// segments are keys; list segments are decimal positions (`hosts.0`).
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{ParameterStore, Value};
///
/// let store = ParameterStore::new([(
///     "db".to_string(),
///     Value::map([("host", "localhost")]),
/// )].into_iter().collect());
///
/// assert_eq!(store.get("db.host").unwrap(), &Value::from("localhost"));
/// assert!(store.get("db").unwrap().as_map().is_some());
/// assert!(store.get("db.port").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterStore {
    root: BTreeMap<String, Value>,
}

impl ParameterStore {
    pub fn new(root: BTreeMap<String, Value>) -> Self {
        Self { root }
    }

    /// Resolves a dotted path.
    ///
    /// A segment counts as absent when the current node is a scalar, has no
    /// such key or position, or holds [`Value::Null`].
    pub fn get(&self, path: &str) -> DiResult<&Value> {
        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();
        let mut context = present(self.root.get(first)).ok_or_else(|| not_found(path))?;

        for segment in segments {
            context = present(child(context, segment)).ok_or_else(|| not_found(path))?;
        }

        Ok(context)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Top-level keys, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for ParameterStore {
    fn from(root: BTreeMap<String, Value>) -> Self {
        Self::new(root)
    }
}

fn child<'v>(node: &'v Value, segment: &str) -> Option<&'v Value> {
    match node {
        Value::Map(map) => map.get(segment),
        Value::List(items) => list_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

// Canonical decimal only: "01" and "+1" name no position.
fn list_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn not_found(path: &str) -> DiError {
    DiError::ParameterNotFound(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ParameterStore {
        let mut root = BTreeMap::new();
        root.insert("a".to_string(), Value::map([("b", 42)]));
        root.insert("name".to_string(), Value::from("app"));
        root.insert("empty".to_string(), Value::Null);
        ParameterStore::new(root)
    }

    #[test]
    fn test_leaf_lookup() {
        assert_eq!(store().get("a.b").unwrap(), &Value::Integer(42));
        assert_eq!(store().get("name").unwrap(), &Value::from("app"));
    }

    #[test]
    fn test_subtree_lookup() {
        assert_eq!(store().get("a").unwrap(), &Value::map([("b", 42)]));
    }

    #[test]
    fn test_missing_segments() {
        let store = store();
        for path in ["missing", "a.c", "a.b.c", "name.x", "", "a.", ".a"] {
            assert_eq!(
                store.get(path),
                Err(DiError::ParameterNotFound(path.to_string())),
                "path {:?}",
                path
            );
        }
    }

    #[test]
    fn test_null_counts_as_absent() {
        assert!(store().get("empty").is_err());
        assert!(!store().contains("empty"));
    }

    #[test]
    fn test_empty_store() {
        let store = ParameterStore::default();
        assert!(store.is_empty());
        assert_eq!(
            store.get("missing.path"),
            Err(DiError::ParameterNotFound("missing.path".to_string()))
        );
    }

    #[test]
    fn test_list_positions() {
        let mut root = BTreeMap::new();
        root.insert(
            "hosts".to_string(),
            Value::List(vec![
                Value::from("a"),
                Value::map([("name", "b")]),
                Value::Null,
            ]),
        );
        let store = ParameterStore::new(root);

        assert_eq!(store.get("hosts.0").unwrap(), &Value::from("a"));
        assert_eq!(store.get("hosts.1.name").unwrap(), &Value::from("b"));
        for path in ["hosts.2", "hosts.3", "hosts.01", "hosts.+1", "hosts.-1", "hosts.x", "hosts."] {
            assert_eq!(
                store.get(path),
                Err(DiError::ParameterNotFound(path.to_string())),
                "path {:?}",
                path
            );
        }
    }
}
