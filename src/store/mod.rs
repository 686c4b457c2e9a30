//! The live state tree.
//!
//! [`PayloadStore`] owns the one [`StateTree`] the application reads from.
//! Only two operations write it: [`replace`](PayloadStore::replace) for full
//! page loads and [`apply_partial`](PayloadStore::apply_partial) for partial
//! reloads. Each successful write bumps a revision counter that is published
//! on a `tokio::sync::watch` channel, so consumers re-read on change instead
//! of polling.
//!
//! # Examples
//!
//! ```
//! use laika_http::store::PayloadStore;
//! use laika_http::StateTree;
//! use serde_json::json;
//!
//! let store = PayloadStore::new();
//! assert!(store.page().is_err());
//!
//! store.replace(StateTree::from_value(json!({
//!     "page": { "component": "Home", "title": "Home" },
//!     "shared": { "user": { "name": "A", "age": 9 } }
//! })).unwrap());
//!
//! store
//!     .apply(json!({ "shared": { "user": { "name": "B" } } }), &["shared.user.name"])
//!     .unwrap();
//!
//! assert_eq!(store.shared().unwrap()["user"], json!({ "name": "B", "age": 9 }));
//! assert_eq!(store.revision(), 2);
//! ```

pub mod component;

pub use component::{ComponentHandle, Components};

use crate::error::{LaikaError, Result};
use crate::merge::{merge, parse_paths, DotPath};
use crate::types::{ComponentDescriptor, PageObject, StateTree, ThemeObject};
use futures::Stream;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Label used when the title transform yields an empty string.
pub const DEFAULT_TITLE_FALLBACK: &str = "Laika Unknown Title";

/// Receives the document title after every store update.
pub trait TitleSink: Send + Sync {
    /// Set the document title.
    fn set_title(&self, title: &str);
}

impl<F> TitleSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn set_title(&self, title: &str) {
        self(title)
    }
}

/// [`TitleSink`] that remembers every title it was given.
#[derive(Debug, Default)]
pub struct MemoryTitle {
    titles: Mutex<Vec<String>>,
}

impl MemoryTitle {
    /// An empty title log.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent title.
    pub fn current(&self) -> Option<String> {
        self.titles.lock().last().cloned()
    }

    /// All titles, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.titles.lock().clone()
    }
}

impl TitleSink for MemoryTitle {
    fn set_title(&self, title: &str) {
        self.titles.lock().push(title.to_string());
    }
}

/// Maps a page title to the document title.
pub type TitleTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Owner of the live [`StateTree`].
pub struct PayloadStore {
    tree: RwLock<Option<Arc<StateTree>>>,
    revision: watch::Sender<u64>,
    title_sink: Arc<dyn TitleSink>,
    title_transform: TitleTransform,
    title_fallback: String,
}

impl PayloadStore {
    /// An empty store with an in-memory title sink and the identity transform.
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        PayloadStore {
            tree: RwLock::new(None),
            revision,
            title_sink: Arc::new(MemoryTitle::new()),
            title_transform: Arc::new(|title: &str| title.to_string()),
            title_fallback: DEFAULT_TITLE_FALLBACK.to_string(),
        }
    }

    /// Deliver titles to `sink`.
    pub fn with_title_sink(mut self, sink: Arc<dyn TitleSink>) -> Self {
        self.title_sink = sink;
        self
    }

    /// Pass page titles through `transform` before they reach the sink.
    pub fn with_title_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.title_transform = Arc::new(transform);
        self
    }

    /// Label used when the transform returns an empty string.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.title_fallback = fallback.into();
        self
    }

    /// Install `tree` as the current state.
    pub fn replace(&self, tree: StateTree) -> Arc<StateTree> {
        let tree = Arc::new(tree);
        *self.tree.write() = Some(tree.clone());
        self.published(&tree);
        tree
    }

    /// Merge the branches of `next` named by `paths` into the current tree.
    ///
    /// Fails with [`LaikaError::RuntimeNotReady`] when no tree is installed.
    pub fn apply_partial(&self, next: &Value, paths: &[DotPath]) -> Result<Arc<StateTree>> {
        let tree = {
            let mut guard = self.tree.write();
            let current = guard
                .as_ref()
                .ok_or(LaikaError::RuntimeNotReady("no state tree to merge into"))?;
            let merged = Arc::new(StateTree::from_value(merge(
                &current.to_value()?,
                next,
                paths,
            ))?);
            *guard = Some(merged.clone());
            merged
        };
        self.published(&tree);
        Ok(tree)
    }

    /// Apply a response body.
    ///
    /// A non-empty `only` list merges into the current tree; an empty list, or
    /// a store without a tree yet, replaces the whole tree. When none of the
    /// listed paths parse, the current tree is kept as is.
    pub fn apply<S: AsRef<str>>(&self, body: Value, only: &[S]) -> Result<Arc<StateTree>> {
        match self.merge_plan(only) {
            Some(paths) if paths.is_empty() => self.snapshot(),
            Some(paths) => self.apply_partial(&body, &paths),
            None => Ok(self.replace(StateTree::from_value(body)?)),
        }
    }

    /// The tree [`apply`](Self::apply) would install, without installing it.
    pub fn preview<S: AsRef<str>>(&self, body: &Value, only: &[S]) -> Result<StateTree> {
        match self.merge_plan(only) {
            Some(paths) => self.snapshot()?.merged(body, &paths),
            None => StateTree::from_value(body.clone()),
        }
    }

    /// `None` for a full replace, else the paths to merge.
    fn merge_plan<S: AsRef<str>>(&self, only: &[S]) -> Option<Vec<DotPath>> {
        let listed: Vec<&str> = only
            .iter()
            .map(|raw| raw.as_ref())
            .filter(|raw| !raw.trim().is_empty())
            .collect();
        if listed.is_empty() || !self.is_ready() {
            return None;
        }
        let paths = parse_paths(listed.as_slice());
        if paths.is_empty() {
            tracing::warn!("no usable path in {:?}, keeping the current tree", listed);
        }
        Some(paths)
    }

    /// Whether a tree has been installed.
    pub fn is_ready(&self) -> bool {
        self.tree.read().is_some()
    }

    /// The current tree.
    pub fn snapshot(&self) -> Result<Arc<StateTree>> {
        self.tree
            .read()
            .clone()
            .ok_or(LaikaError::RuntimeNotReady("state tree not installed"))
    }

    /// The current page.
    pub fn page(&self) -> Result<PageObject> {
        Ok(self.snapshot()?.page.clone())
    }

    /// Data shared by every page.
    pub fn shared(&self) -> Result<Map<String, Value>> {
        Ok(self.snapshot()?.shared.clone())
    }

    /// Embedded components by alias.
    pub fn components(&self) -> Result<BTreeMap<String, ComponentDescriptor>> {
        Ok(self.snapshot()?.components.clone())
    }

    /// The active theme.
    pub fn theme(&self) -> Result<ThemeObject> {
        Ok(self.snapshot()?.theme.clone())
    }

    /// Token to echo on the next request.
    pub fn token(&self) -> Option<String> {
        self.tree
            .read()
            .as_ref()
            .and_then(|tree| tree.token().map(str::to_string))
    }

    /// Asset version of the current tree.
    pub fn version(&self) -> Option<String> {
        self.tree.read().as_ref().and_then(|tree| tree.version.clone())
    }

    /// Number of successful writes so far.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Receiver that observes every revision bump.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Stream of revisions, starting with the current one.
    pub fn changes(&self) -> impl Stream<Item = u64> + Send + Unpin + 'static {
        WatchStream::new(self.subscribe())
    }

    fn published(&self, tree: &StateTree) {
        let revision = {
            let mut next = 0;
            self.revision.send_modify(|r| {
                *r += 1;
                next = *r;
            });
            next
        };
        tracing::debug!("state tree updated to revision {}", revision);

        let Some(title) = tree.page.title.as_deref().filter(|t| !t.is_empty()) else {
            return;
        };
        let transformed = (self.title_transform)(title);
        if transformed.is_empty() {
            self.title_sink.set_title(&self.title_fallback);
        } else {
            self.title_sink.set_title(&transformed);
        }
    }
}

impl Default for PayloadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PayloadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadStore")
            .field("revision", &self.revision())
            .field("ready", &self.is_ready())
            .finish()
    }
}
