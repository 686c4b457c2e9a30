//! Page component resolution.

use crate::error::{LaikaError, Result};
use crate::view::layout::ComponentDefinition;
use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What a resolver callback may return.
///
/// Bundlers commonly hand back a module whose default export is the
/// component; both shapes are accepted.
#[derive(Debug)]
pub enum Resolved {
    /// The definition itself
    Component(ComponentDefinition),
    /// A module wrapping the definition
    Module {
        /// The wrapped definition
        default: ComponentDefinition,
    },
}

impl Resolved {
    /// The definition, unwrapped from its module if needed.
    pub fn unwrap_module(self) -> ComponentDefinition {
        match self {
            Resolved::Component(definition) => definition,
            Resolved::Module { default } => default,
        }
    }
}

impl From<ComponentDefinition> for Resolved {
    fn from(definition: ComponentDefinition) -> Self {
        Resolved::Component(definition)
    }
}

/// Application callback that turns a component name into a definition.
///
/// Implemented for async closures `Fn(String) -> impl Future<Output =
/// anyhow::Result<R>>` where `R` converts into [`Resolved`].
#[async_trait]
pub trait ResolveComponent: Send + Sync {
    /// Resolve `name`.
    async fn resolve(&self, name: &str) -> anyhow::Result<Resolved>;
}

#[async_trait]
impl<F, Fut, R> ResolveComponent for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    R: Into<Resolved> + Send + 'static,
{
    async fn resolve(&self, name: &str) -> anyhow::Result<Resolved> {
        Ok(self(name.to_string()).await?.into())
    }
}

/// Resolves page component names, short-circuiting the initial one.
pub struct ComponentResolver {
    callback: Arc<dyn ResolveComponent>,
    initial: Option<(String, Arc<ComponentDefinition>)>,
    calls: AtomicUsize,
}

impl ComponentResolver {
    /// Resolver backed by `callback`.
    pub fn new<R>(callback: R) -> Self
    where
        R: ResolveComponent + 'static,
    {
        Self::from_shared(Arc::new(callback))
    }

    /// Resolver backed by a shared callback.
    pub fn from_shared(callback: Arc<dyn ResolveComponent>) -> Self {
        ComponentResolver {
            callback,
            initial: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Definition for the initial page, supplied with the server render.
    ///
    /// Requests for `name` are answered with it and never reach the callback.
    pub fn with_initial(mut self, name: impl Into<String>, definition: ComponentDefinition) -> Self {
        self.initial = Some((name.into(), Arc::new(definition)));
        self
    }

    /// The out-of-band definition for `name`, if any.
    pub fn resolve_initial(&self, name: &str) -> Option<Arc<ComponentDefinition>> {
        match &self.initial {
            Some((initial, definition)) if initial == name => Some(definition.clone()),
            _ => None,
        }
    }

    /// Resolve `name`, invoking the callback at most once.
    pub async fn resolve(&self, name: &str) -> Result<Arc<ComponentDefinition>> {
        if let Some(definition) = self.resolve_initial(name) {
            return Ok(definition);
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("resolving component '{}'", name);

        match self.callback.resolve(name).await {
            Ok(resolved) => Ok(Arc::new(resolved.unwrap_module())),
            Err(source) => Err(LaikaError::Resolution {
                name: name.to_string(),
                source,
            }),
        }
    }

    /// Number of times the callback has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ComponentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentResolver")
            .field("initial", &self.initial.as_ref().map(|(name, _)| name))
            .field("calls", &self.calls())
            .finish()
    }
}
