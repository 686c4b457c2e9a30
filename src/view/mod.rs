//! The view side: component resolution, layout composition and the state
//! the renderer reads.
//!
//! # Module Organization
//!
//! ```text
//! view/
//! ├── resolver - ComponentResolver and the ResolveComponent callback
//! └── layout   - Layout, RenderNode, ComponentDefinition and compose()
//! ```

pub mod layout;
pub mod resolver;

pub use layout::{compose, ComponentDefinition, Layout, RenderNode};
pub use resolver::{ComponentResolver, ResolveComponent, Resolved};

use crate::error::Result;
use crate::store::PayloadStore;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// What the renderer shows: the resolved page component and its render key.
///
/// The render key changes on every navigation that does not preserve state,
/// forcing the page node to remount.
#[derive(Debug)]
pub struct ViewState {
    resolver: ComponentResolver,
    current: RwLock<Option<Arc<ComponentDefinition>>>,
    key: Mutex<Option<u64>>,
    key_counter: AtomicU64,
    layout_override: Mutex<Option<Layout>>,
}

impl ViewState {
    /// An empty view resolving through `resolver`.
    pub fn new(resolver: ComponentResolver) -> Self {
        ViewState {
            resolver,
            current: RwLock::new(None),
            key: Mutex::new(None),
            key_counter: AtomicU64::new(0),
            layout_override: Mutex::new(None),
        }
    }

    /// The component resolver.
    pub fn resolver(&self) -> &ComponentResolver {
        &self.resolver
    }

    /// The resolved page component.
    pub fn component(&self) -> Option<Arc<ComponentDefinition>> {
        self.current.read().clone()
    }

    /// The current render key.
    pub fn key(&self) -> Option<u64> {
        *self.key.lock()
    }

    /// Install `definition` as the current component.
    pub fn set_component(&self, definition: Arc<ComponentDefinition>) {
        *self.current.write() = Some(definition);
    }

    /// Make `name` the current component, resolving it when it changed.
    ///
    /// Returns whether the component changed. On failure the previous
    /// component stays in place.
    pub async fn sync_component(&self, name: &str) -> Result<bool> {
        match self.prepare_component(name).await? {
            Some(definition) => {
                self.set_component(definition);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resolve `name` without installing it.
    ///
    /// `None` when `name` is already the current component.
    pub async fn prepare_component(&self, name: &str) -> Result<Option<Arc<ComponentDefinition>>> {
        if self.current.read().as_ref().is_some_and(|c| c.name() == name) {
            return Ok(None);
        }
        self.resolver.resolve(name).await.map(Some)
    }

    /// Issue a new render key unless `preserve_state` is set.
    pub fn refresh_key(&self, preserve_state: bool) {
        if preserve_state {
            return;
        }
        let next = self.key_counter.fetch_add(1, Ordering::SeqCst) + 1;
        *self.key.lock() = Some(next);
    }

    /// Use `layout` for the next render.
    ///
    /// The override replaces the component's declared layout when it is
    /// consumed, so it sticks until changed again.
    pub fn set_layout(&self, layout: Layout) {
        *self.layout_override.lock() = Some(layout);
    }

    /// Compose the render tree for the current page.
    ///
    /// `None` until both a component and a state tree are present.
    pub fn render(&self, store: &PayloadStore) -> Option<Arc<RenderNode>> {
        let definition = self.component()?;
        let revision = store.revision();
        let tree = store.snapshot().ok()?;

        if let Some(layout) = self.layout_override.lock().take() {
            definition.set_layout(Some(layout));
        }
        Some(definition.render(&tree.page, revision, self.key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StateTree;
    use serde_json::json;

    fn view() -> ViewState {
        let resolver = ComponentResolver::new(|name: String| async move {
            Ok::<_, anyhow::Error>(ComponentDefinition::new(name))
        })
        .with_initial(
            "Home",
            ComponentDefinition::new("Home").with_layout(Layout::Stack(vec!["L1".into(), "L2".into()])),
        );
        ViewState::new(resolver)
    }

    fn store() -> PayloadStore {
        let store = PayloadStore::new();
        store.replace(
            StateTree::from_value(json!({
                "page": { "component": "Home", "props": { "p": 1 } }
            }))
            .unwrap(),
        );
        store
    }

    #[tokio::test]
    async fn test_sync_component() {
        let view = view();
        assert!(view.sync_component("Home").await.unwrap());
        assert!(!view.sync_component("Home").await.unwrap());
        assert_eq!(view.resolver().calls(), 0);

        assert!(view.sync_component("Blog").await.unwrap());
        assert_eq!(view.resolver().calls(), 1);
    }

    #[tokio::test]
    async fn test_prepare_component_leaves_view_alone() {
        let view = view();
        view.sync_component("Home").await.unwrap();

        assert!(view.prepare_component("Home").await.unwrap().is_none());
        let blog = view.prepare_component("Blog").await.unwrap().unwrap();
        assert_eq!(blog.name(), "Blog");
        assert_eq!(view.component().unwrap().name(), "Home");
    }

    #[test]
    fn test_refresh_key() {
        let view = view();
        assert_eq!(view.key(), None);
        view.refresh_key(false);
        assert_eq!(view.key(), Some(1));
        view.refresh_key(true);
        assert_eq!(view.key(), Some(1));
        view.refresh_key(false);
        assert_eq!(view.key(), Some(2));
    }

    #[tokio::test]
    async fn test_render_layout_stack() {
        let view = view();
        let store = store();
        assert!(view.render(&store).is_none());

        view.sync_component("Home").await.unwrap();
        view.refresh_key(false);
        let tree = view.render(&store).unwrap();

        let props = json!({ "p": 1 }).as_object().cloned().unwrap();
        let expected = RenderNode::new("L1", props.clone()).with_child(
            RenderNode::new("L2", props.clone())
                .with_child(RenderNode::new("Home", props).with_key(Some(1))),
        );
        assert_eq!(*tree, expected);
    }

    #[tokio::test]
    async fn test_layout_override_is_consumed() {
        let view = view();
        let store = store();
        view.sync_component("Home").await.unwrap();

        let before = view.render(&store).unwrap();
        view.set_layout(Layout::Single("Plain".into()));
        let after = view.render(&store).unwrap();

        assert_eq!(before.component, "L1");
        assert_eq!(after.component, "Plain");
        assert!(Arc::ptr_eq(&after, &view.render(&store).unwrap()));
    }
}
