//! The client-held state tree and its parts.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Accept `null` and `[]` wherever a defaultable value is expected.
///
/// Backends commonly encode an empty associative array as `[]`, and optional
/// sections as `null`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(T::default()),
        Value::Array(items) if items.is_empty() => Ok(T::default()),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

/// The full client-side snapshot ("payload") received from the server.
///
/// Every field defaults, so a body that only carries a few branches (a partial
/// response) still deserializes. Unknown top-level keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateTree {
    /// Opaque asset/version marker, interpreted by the server only
    pub version: Option<String>,

    /// Opaque token echoed back in `X-Laika-Token`
    pub token: Option<String>,

    /// Active theme
    #[serde(deserialize_with = "lenient")]
    pub theme: ThemeObject,

    /// The page currently being shown
    #[serde(deserialize_with = "lenient")]
    pub page: PageObject,

    /// Embedded components keyed by alias
    #[serde(deserialize_with = "lenient")]
    pub components: BTreeMap<String, ComponentDescriptor>,

    /// Cross-page data defined by the application
    #[serde(deserialize_with = "lenient")]
    pub shared: Map<String, Value>,

    /// Top-level keys this crate does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StateTree {
    /// Deserialize a tree from a JSON value.
    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize the tree into a JSON value.
    pub fn to_value(&self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Non-empty token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Theme descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeObject {
    /// Theme name
    pub name: Option<String>,
    /// Short description
    pub description: Option<String>,
    /// Homepage URL
    pub homepage: Option<String>,
    /// Author name
    pub author: Option<String>,
    /// Author code
    #[serde(rename = "authorCode")]
    pub author_code: Option<String>,
    /// Theme code
    pub code: Option<String>,
    /// Theme options as configured on the server
    #[serde(deserialize_with = "lenient")]
    pub options: Map<String, Value>,
}

/// Layout reference declared by a page: one name or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutName {
    /// A single layout
    One(String),
    /// Layouts from outermost to innermost
    Many(Vec<String>),
}

impl LayoutName {
    /// Layout names from outermost to innermost.
    pub fn names(&self) -> Vec<&str> {
        match self {
            LayoutName::One(name) => vec![name.as_str()],
            LayoutName::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// The page part of the state tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageObject {
    /// Page id
    pub id: Option<String>,
    /// Page URL
    pub url: Option<String>,
    /// Template file the page was rendered from
    pub file: Option<String>,

    /// Name the component resolver is asked for
    pub component: String,

    /// Props handed to the page component and its layouts
    #[serde(deserialize_with = "lenient")]
    pub props: Map<String, Value>,

    /// Layouts to wrap the component in
    pub layout: Option<LayoutName>,

    /// Theme reference, string or numeric depending on the backend
    pub theme: Option<Value>,

    /// Page title
    pub title: Option<String>,

    /// Page metadata
    #[serde(deserialize_with = "lenient")]
    pub meta: PageMeta,

    /// Raw markup rendered by a pass-through renderer
    pub content: Option<String>,
}

/// Page metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMeta {
    /// Title
    pub title: Option<String>,
    /// Title for the `<title>` tag
    pub meta_title: Option<String>,
    /// Meta description
    pub meta_description: Option<String>,
    /// Other metadata keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Data of an embedded component, registered under an alias.
///
/// A member may be known (listed in `methods` or `vars`) without its value
/// being loaded into `props`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentDescriptor {
    /// Alias the component is registered under
    pub alias: Option<String>,
    /// Component class name
    pub component: Option<String>,
    /// Component options
    #[serde(deserialize_with = "lenient")]
    pub options: Map<String, Value>,
    /// Loaded member values
    #[serde(deserialize_with = "lenient")]
    pub props: Map<String, Value>,
    /// Callable member names
    #[serde(deserialize_with = "lenient")]
    pub methods: Vec<String>,
    /// Variable member names
    #[serde(deserialize_with = "lenient")]
    pub vars: Vec<String>,
    /// Unknown keys, kept for merges
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ComponentDescriptor {
    /// Whether `key` has a loaded value.
    pub fn is_loaded(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    /// Whether `key` is known, loaded or not.
    pub fn declares(&self, key: &str) -> bool {
        self.is_loaded(key)
            || self.methods.iter().any(|m| m == key)
            || self.vars.iter().any(|v| v == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_body_deserializes() {
        let tree: StateTree = serde_json::from_value(json!({
            "shared": { "user": { "name": "B" } }
        }))
        .unwrap();
        assert_eq!(tree.shared["user"]["name"], "B");
        assert!(tree.page.component.is_empty());
    }

    #[test]
    fn test_empty_arrays_and_nulls_are_defaults() {
        let tree: StateTree = serde_json::from_value(json!({
            "theme": null,
            "components": [],
            "shared": [],
            "page": { "component": "Home", "props": [] }
        }))
        .unwrap();
        assert!(tree.components.is_empty());
        assert!(tree.shared.is_empty());
        assert_eq!(tree.page.component, "Home");
    }

    #[test]
    fn test_unknown_keys_round_trip() {
        let value = json!({
            "october": { "baseUrl": "https://example.com" },
            "page": { "component": "Home" }
        });
        let tree = StateTree::from_value(value).unwrap();
        assert_eq!(tree.extra["october"]["baseUrl"], "https://example.com");

        let back = tree.to_value().unwrap();
        assert_eq!(back["october"]["baseUrl"], "https://example.com");
    }

    #[test]
    fn test_layout_names() {
        let one: LayoutName = serde_json::from_value(json!("default")).unwrap();
        assert_eq!(one.names(), vec!["default"]);

        let many: LayoutName = serde_json::from_value(json!(["app", "sidebar"])).unwrap();
        assert_eq!(many.names(), vec!["app", "sidebar"]);
    }

    #[test]
    fn test_descriptor_presence() {
        let descriptor: ComponentDescriptor = serde_json::from_value(json!({
            "alias": "blogPosts",
            "props": { "posts": [] },
            "methods": ["onLoadMore"],
            "vars": ["pageParam"]
        }))
        .unwrap();

        assert!(descriptor.is_loaded("posts"));
        assert!(!descriptor.is_loaded("pageParam"));
        assert!(descriptor.declares("pageParam"));
        assert!(descriptor.declares("onLoadMore"));
        assert!(!descriptor.declares("missing"));
    }

    #[test]
    fn test_token_ignores_empty() {
        let mut tree = StateTree::default();
        assert_eq!(tree.token(), None);
        tree.token = Some(String::new());
        assert_eq!(tree.token(), None);
        tree.token = Some("abc".into());
        assert_eq!(tree.token(), Some("abc"));
    }
}
