//! Layout composition.
//!
//! A page component is wrapped by zero or more layouts. For a stack
//! `[L1, L2]` around component `C` with page props `P` the result is
//!
//! ```text
//! L1(P)
//! └── L2(P)
//!     └── C(P, key)
//! ```
//!
//! Every wrapper receives the page props; the render key sits on the page
//! node so that a key change remounts the page but keeps the layouts.

use crate::types::{LayoutName, PageObject};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A framework-neutral render tree node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    /// Component or layout name
    pub component: String,
    /// Props handed to the node
    pub props: Map<String, Value>,
    /// Render key, set on the page node only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<u64>,
    /// Child nodes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    /// A leaf node.
    pub fn new(component: impl Into<String>, props: Map<String, Value>) -> Self {
        RenderNode {
            component: component.into(),
            props,
            key: None,
            children: Vec::new(),
        }
    }

    /// Set the render key.
    pub fn with_key(mut self, key: Option<u64>) -> Self {
        self.key = key;
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: RenderNode) -> Self {
        self.children.push(child);
        self
    }
}

/// How a page component is wrapped.
#[derive(Clone)]
pub enum Layout {
    /// One named layout
    Single(String),
    /// Named layouts, outermost first
    Stack(Vec<String>),
    /// Arbitrary wrapping of the page node
    Custom(Arc<dyn Fn(RenderNode) -> RenderNode + Send + Sync>),
}

impl Layout {
    /// A layout computed by `wrap`.
    pub fn custom<F>(wrap: F) -> Self
    where
        F: Fn(RenderNode) -> RenderNode + Send + Sync + 'static,
    {
        Layout::Custom(Arc::new(wrap))
    }
}

impl From<LayoutName> for Layout {
    fn from(name: LayoutName) -> Self {
        match name {
            LayoutName::One(name) => Layout::Single(name),
            LayoutName::Many(names) => Layout::Stack(names),
        }
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Single(name) => f.debug_tuple("Single").field(name).finish(),
            Layout::Stack(names) => f.debug_tuple("Stack").field(names).finish(),
            Layout::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Build the render tree for `component` wrapped in `layout`.
///
/// # Examples
///
/// ```
/// use laika_http::view::{compose, Layout};
/// use serde_json::{json, Map};
///
/// let props: Map<_, _> = json!({ "title": "Blog" }).as_object().cloned().unwrap();
/// let layout = Layout::Stack(vec!["L1".into(), "L2".into()]);
/// let tree = compose("C", Some(&layout), &props, Some(1));
///
/// assert_eq!(tree.component, "L1");
/// assert_eq!(tree.children[0].component, "L2");
/// assert_eq!(tree.children[0].children[0].component, "C");
/// assert_eq!(tree.children[0].children[0].key, Some(1));
/// ```
pub fn compose(
    component: &str,
    layout: Option<&Layout>,
    props: &Map<String, Value>,
    key: Option<u64>,
) -> RenderNode {
    let page = RenderNode::new(component, props.clone()).with_key(key);
    match layout {
        None => page,
        Some(Layout::Single(name)) => RenderNode::new(name.as_str(), props.clone()).with_child(page),
        Some(Layout::Stack(names)) => names.iter().rev().fold(page, |child, name| {
            RenderNode::new(name.as_str(), props.clone()).with_child(child)
        }),
        Some(Layout::Custom(wrap)) => wrap(page),
    }
}

struct Composed {
    revision: u64,
    key: Option<u64>,
    tree: Arc<RenderNode>,
}

/// A resolved page component.
///
/// Holds the component's declared layout and caches its last composed tree,
/// keyed by store revision and render key.
pub struct ComponentDefinition {
    name: String,
    layout: RwLock<Option<Layout>>,
    composed: Mutex<Option<Composed>>,
}

impl ComponentDefinition {
    /// A definition without a declared layout.
    pub fn new(name: impl Into<String>) -> Self {
        ComponentDefinition {
            name: name.into(),
            layout: RwLock::new(None),
            composed: Mutex::new(None),
        }
    }

    /// Declare the layout this component always uses.
    pub fn with_layout(self, layout: Layout) -> Self {
        *self.layout.write() = Some(layout);
        self
    }

    /// The component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared layout.
    pub fn layout(&self) -> Option<Layout> {
        self.layout.read().clone()
    }

    /// Replace the declared layout and drop the cached tree.
    pub fn set_layout(&self, layout: Option<Layout>) {
        *self.layout.write() = layout;
        self.composed.lock().take();
    }

    /// Render tree for `page`.
    ///
    /// The declared layout wins; without one the page's own layout names are
    /// used.
    pub fn render(&self, page: &PageObject, revision: u64, key: Option<u64>) -> Arc<RenderNode> {
        let mut composed = self.composed.lock();
        if let Some(cached) = composed.as_ref() {
            if cached.revision == revision && cached.key == key {
                return cached.tree.clone();
            }
        }

        let layout = self
            .layout()
            .or_else(|| page.layout.clone().map(Layout::from));
        let tree = Arc::new(compose(&self.name, layout.as_ref(), &page.props, key));
        *composed = Some(Composed {
            revision,
            key,
            tree: tree.clone(),
        });
        tree
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("name", &self.name)
            .field("layout", &*self.layout.read())
            .finish()
    }
}
