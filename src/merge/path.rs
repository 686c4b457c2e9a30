//! Dot-separated paths into JSON trees.

use crate::error::{LaikaError, Result};
use crate::protocol::constants::PATH_SEPARATOR;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A parsed dot-path such as `shared.user.name`.
///
/// Segments address object keys; on arrays a segment that is a valid index
/// addresses that element.
///
/// # Examples
///
/// ```
/// use laika_http::merge::DotPath;
/// use serde_json::json;
///
/// let path: DotPath = "shared.user.name".parse().unwrap();
/// assert_eq!(path.segments(), &["shared", "user", "name"]);
///
/// let tree = json!({ "shared": { "user": { "name": "A" } } });
/// assert_eq!(path.lookup(&tree), Some(&json!("A")));
///
/// assert!("shared..name".parse::<DotPath>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DotPath {
    segments: Vec<String>,
}

impl DotPath {
    /// Path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether the path names a top-level key.
    pub fn is_top_level(&self) -> bool {
        self.segments.len() == 1
    }

    /// The top-level key this path lives under.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Whether `self` is a strict prefix of `other`.
    pub fn is_prefix_of(&self, other: &DotPath) -> bool {
        self.segments.len() < other.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    /// Resolve the path against `root`.
    ///
    /// Returns `None` as soon as a segment is missing. A `null` leaf is found.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| match node {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// Write `value` at the path, creating intermediate objects where a
    /// segment is missing or does not hold a container.
    pub fn insert(&self, root: &mut Value, value: Value) {
        let Some((last, parents)) = self.segments.split_last() else {
            return;
        };

        let mut node = root;
        for segment in parents {
            node = child_mut(node, segment);
        }

        let index = match &*node {
            Value::Array(items) => array_index(items, last),
            _ => None,
        };
        match (index, node) {
            (Some(i), Value::Array(items)) => items[i] = value,
            (_, node) => {
                ensure_object(node).insert(last.clone(), value);
            }
        }
    }
}

impl FromStr for DotPath {
    type Err = LaikaError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LaikaError::InvalidPath("empty path".into()));
        }

        let segments: Vec<String> = trimmed.split(PATH_SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(LaikaError::InvalidPath(format!("empty segment in '{}'", s)));
        }

        Ok(DotPath { segments })
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

fn array_index(items: &[Value], segment: &str) -> Option<usize> {
    segment.parse::<usize>().ok().filter(|i| *i < items.len())
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = match &*node {
        Value::Array(items) => array_index(items, segment),
        _ => None,
    };

    let slot = match (index, node) {
        (Some(i), Value::Array(items)) => &mut items[i],
        (_, other) => ensure_object(other)
            .entry(segment.to_string())
            .or_insert(Value::Null),
    };

    if !(slot.is_object() || slot.is_array()) {
        *slot = Value::Object(Map::new());
    }
    slot
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> DotPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        assert!(path("page").is_top_level());
        assert_eq!(path("a.b.c").segments().len(), 3);
        assert_eq!(path(" shared.user ").to_string(), "shared.user");
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<DotPath>().is_err());
        assert!(".a".parse::<DotPath>().is_err());
        assert!("a.".parse::<DotPath>().is_err());
        assert!("a..b".parse::<DotPath>().is_err());
    }

    #[test]
    fn test_prefix() {
        assert!(path("shared").is_prefix_of(&path("shared.user")));
        assert!(!path("shared.user").is_prefix_of(&path("shared")));
        assert!(!path("shared").is_prefix_of(&path("shared")));
        assert!(!path("share").is_prefix_of(&path("shared.user")));
    }

    #[test]
    fn test_lookup() {
        let tree = json!({ "a": { "b": null, "list": [ { "x": 1 } ] } });
        assert_eq!(path("a.b").lookup(&tree), Some(&Value::Null));
        assert_eq!(path("a.list.0.x").lookup(&tree), Some(&json!(1)));
        assert_eq!(path("a.list.5").lookup(&tree), None);
        assert_eq!(path("a.missing.deeper").lookup(&tree), None);
        assert_eq!(path("a.b.c").lookup(&tree), None);
    }

    #[test]
    fn test_insert_creates_intermediates() {
        let mut tree = json!({});
        path("components.posts.props.items").insert(&mut tree, json!([1, 2]));
        assert_eq!(tree, json!({ "components": { "posts": { "props": { "items": [1, 2] } } } }));
    }

    #[test]
    fn test_insert_replaces_scalars_on_the_way() {
        let mut tree = json!({ "shared": "flat" });
        path("shared.user").insert(&mut tree, json!("B"));
        assert_eq!(tree, json!({ "shared": { "user": "B" } }));
    }

    #[test]
    fn test_insert_into_array() {
        let mut tree = json!({ "rows": [ { "v": 1 }, { "v": 2 } ] });
        path("rows.1.v").insert(&mut tree, json!(20));
        assert_eq!(tree, json!({ "rows": [ { "v": 1 }, { "v": 20 } ] }));
    }
}
