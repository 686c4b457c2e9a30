//! Accessors for embedded components.
//!
//! Component data lives under `components.<alias>` in the state tree. A member
//! can be declared (listed in `methods` or `vars`) before its value is loaded;
//! [`ComponentHandle::load`] fetches missing values with a background partial
//! reload.

use crate::client::{Router, Visit, WeakRouter};
use crate::error::{LaikaError, Result};
use crate::store::PayloadStore;
use crate::types::{ComponentDescriptor, VisitOptions};
use lru::LruCache;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Handle to the component registered under one alias.
///
/// Reads always go to the latest tree; a handle holds no data of its own.
#[derive(Clone)]
pub struct ComponentHandle {
    alias: String,
    store: Arc<PayloadStore>,
    router: WeakRouter,
}

impl ComponentHandle {
    /// Handle for `alias`, reading from `store`.
    pub fn new(alias: impl Into<String>, store: Arc<PayloadStore>, router: WeakRouter) -> Self {
        ComponentHandle {
            alias: alias.into(),
            store,
            router,
        }
    }

    /// The alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The component's current descriptor.
    pub fn descriptor(&self) -> Option<ComponentDescriptor> {
        let tree = self.store.snapshot().ok()?;
        tree.components.get(&self.alias).cloned()
    }

    /// Loaded value of `key`, or `fallback`.
    pub fn get(&self, key: &str, fallback: Value) -> Value {
        self.descriptor()
            .and_then(|mut d| d.props.remove(key))
            .unwrap_or(fallback)
    }

    /// Loaded value of `key` deserialized as `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.descriptor()?.props.remove(key)?;
        serde_json::from_value(value).ok()
    }

    /// Whether `key` is a prop, method or var of the component.
    pub fn exists(&self, key: &str) -> bool {
        self.descriptor().is_some_and(|d| d.declares(key))
    }

    /// Whether `key` has a loaded value.
    pub fn loaded(&self, key: &str) -> bool {
        self.descriptor().is_some_and(|d| d.is_loaded(key))
    }

    /// Fetch the values of `keys` that are not loaded yet.
    ///
    /// Issues one background GET to the current location that replaces the
    /// history entry, preserves view state and asks only for the missing
    /// props. Returns `Ok(None)` without a request when everything is loaded.
    pub async fn load<S: AsRef<str>>(&self, keys: &[S]) -> Result<Option<Visit>> {
        let missing: Vec<String> = keys
            .iter()
            .map(|key| key.as_ref())
            .filter(|key| !self.loaded(key))
            .map(|key| format!("components.{}.props.{}", self.alias, key))
            .collect();

        if missing.is_empty() {
            return Ok(None);
        }

        let router: Router = self
            .router
            .upgrade()
            .ok_or(LaikaError::RuntimeNotReady("router dropped"))?;
        let location = router.history().location();

        tracing::debug!("loading {:?} for component '{}'", missing, self.alias);

        let options = VisitOptions::new()
            .background()
            .preserve_state()
            .replace()
            .with_only(missing);
        router.get(&location, options).await.map(Some)
    }
}

impl std::fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("alias", &self.alias)
            .finish()
    }
}

/// Lookup of component handles by alias.
pub struct Components {
    store: Arc<PayloadStore>,
    router: WeakRouter,
    cache: Mutex<LruCache<String, ComponentHandle>>,
}

impl Components {
    /// Facade caching up to `capacity` handles.
    pub fn new(store: Arc<PayloadStore>, router: WeakRouter, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Components {
            store,
            router,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Whether the current tree registers `alias`.
    pub fn has(&self, alias: &str) -> bool {
        self.store
            .snapshot()
            .is_ok_and(|tree| tree.components.contains_key(alias))
    }

    /// Handle for `alias`, if the current tree registers it.
    pub fn get(&self, alias: &str) -> Option<ComponentHandle> {
        if !self.has(alias) {
            return None;
        }

        let mut cache = self.cache.lock();
        if let Some(handle) = cache.get(alias) {
            return Some(handle.clone());
        }
        let handle = ComponentHandle::new(alias, self.store.clone(), self.router.clone());
        cache.put(alias.to_string(), handle.clone());
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::History;
    use crate::testing::{fixture_tree, test_router, ScriptedTransport};
    use crate::types::RawResponse;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let store = Arc::new(PayloadStore::new());
        store.replace(fixture_tree());
        let handle = ComponentHandle::new("posts", store, WeakRouter::dangling());

        assert_eq!(handle.get("count", json!(0)), json!(2));
        assert_eq!(handle.get("items", json!([])), json!([]));
        assert_eq!(handle.get_as::<u32>("count"), Some(2));
        assert!(handle.exists("items"));
        assert!(handle.exists("refresh"));
        assert!(!handle.loaded("items"));
        assert!(!handle.exists("nope"));
    }

    #[test]
    fn test_components_facade() {
        let store = Arc::new(PayloadStore::new());
        store.replace(fixture_tree());
        let components = Components::new(store, WeakRouter::dangling(), 0);

        assert!(components.has("posts"));
        assert!(components.get("missing").is_none());
        assert_eq!(components.get("posts").unwrap().alias(), "posts");
    }

    #[tokio::test]
    async fn test_load_without_router_fails() {
        let store = Arc::new(PayloadStore::new());
        store.replace(fixture_tree());
        let handle = ComponentHandle::new("posts", store, WeakRouter::dangling());

        let err = handle.load(&["items"]).await.unwrap_err();
        assert!(matches!(err, LaikaError::RuntimeNotReady(_)));
        assert!(handle.load(&["count"]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_fetches_missing_props() {
        let transport = Arc::new(ScriptedTransport::new());
        let (router, store, history) = test_router(transport.clone());
        history.push("/blog?page=2");
        transport.push(
            RawResponse::new(200, r#"{"components":{"posts":{"props":{"items":[1,2]}}}}"#)
                .with_header("X-Laika-Only", "components.posts.props.items"),
        );

        let handle = ComponentHandle::new("posts", store.clone(), router.downgrade());
        let visit = handle.load(&["count", "items"]).await.unwrap();

        assert!(matches!(visit, Some(Visit::Completed { partial: true, .. })));
        assert_eq!(handle.get("items", Value::Null), json!([1, 2]));
        assert_eq!(handle.get("count", Value::Null), json!(2));
        assert!(handle.exists("refresh"));

        let sent = transport.requests();
        assert_eq!(sent[0].url.as_str(), "http://localhost/blog?page=2");
        assert_eq!(sent[0].headers["x-laika-only"], "components.posts.props.items");
        assert_eq!(history.entries(), vec!["/", "/blog?page=2"]);
    }
}
