//! The application context.
//!
//! [`LaikaApp`] owns everything one running application needs: the store,
//! the view state, the router, the progress indicator and the components
//! facade. There are no globals; pass the app (or the parts you need) around.
//!
//! # Examples
//!
//! ```ignore
//! use laika_http::{LaikaApp, VisitOptions};
//! use laika_http::view::ComponentDefinition;
//!
//! #[tokio::main]
//! async fn main() -> laika_http::Result<()> {
//!     let html = std::fs::read_to_string("index.html").unwrap();
//!     let app = LaikaApp::builder()
//!         .html(html)
//!         .resolver(|name: String| async move {
//!             Ok::<_, anyhow::Error>(ComponentDefinition::new(name))
//!         })
//!         .title(|title| format!("{} | Example", title))
//!         .build()
//!         .await?;
//!
//!     app.router().visit("/blog", VisitOptions::new()).await?;
//!     println!("{:#?}", app.render());
//!     Ok(())
//! }
//! ```

use crate::client::{
    ClientConfig, History, MemoryHistory, ReqwestTransport, Router, RouterHooks, Transport,
};
use crate::error::{LaikaError, Result};
use crate::progress::ProgressIndicator;
use crate::store::{Components, MemoryTitle, PayloadStore, TitleSink};
use crate::types::StateTree;
use crate::view::{ComponentDefinition, ComponentResolver, RenderNode, ResolveComponent, ViewState};
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// The `<script data-laika="payload">` element and its content.
static PAYLOAD_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*data-laika=["']payload["'][^>]*>(.*?)</script>"#)
        .expect("Invalid payload script regex")
});

/// Read the state tree embedded in a server-rendered page.
///
/// The payload is the JSON content of
/// `<script type="application/json" data-laika="payload">`.
///
/// # Examples
///
/// ```
/// use laika_http::app::read_initial_payload;
///
/// let html = r#"<head><script type="application/json" data-laika="payload">
///     {"page":{"component":"Home"}}
/// </script></head>"#;
/// let tree = read_initial_payload(html).unwrap();
/// assert_eq!(tree.page.component, "Home");
///
/// assert!(read_initial_payload("<head></head>").is_err());
/// ```
pub fn read_initial_payload(html: &str) -> Result<StateTree> {
    let content = PAYLOAD_SCRIPT
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| LaikaError::Payload("payload missing/empty".into()))?;
    let value = serde_json::from_str(content)?;
    StateTree::from_value(value)
}

/// Source of the state tree the app boots with.
#[derive(Debug, Clone)]
pub enum InitialPayload {
    /// An already parsed tree
    Tree(StateTree),
    /// A JSON document
    Json(String),
    /// A server-rendered page embedding the payload
    Html(String),
}

impl InitialPayload {
    fn into_tree(self) -> Result<StateTree> {
        match self {
            InitialPayload::Tree(tree) => Ok(tree),
            InitialPayload::Json(json) => StateTree::from_value(serde_json::from_str(&json)?),
            InitialPayload::Html(html) => read_initial_payload(&html),
        }
    }
}

/// Builder for [`LaikaApp`].
pub struct LaikaAppBuilder {
    config: ClientConfig,
    payload: Option<InitialPayload>,
    initial_component: Option<ComponentDefinition>,
    resolver: Option<Arc<dyn ResolveComponent>>,
    title: Option<Arc<dyn Fn(&str) -> String + Send + Sync>>,
    transport: Option<Arc<dyn Transport>>,
    history: Option<Arc<dyn History>>,
    title_sink: Option<Arc<dyn TitleSink>>,
    hooks: Vec<Arc<dyn RouterHooks>>,
}

impl LaikaAppBuilder {
    fn new() -> Self {
        LaikaAppBuilder {
            config: ClientConfig::default(),
            payload: None,
            initial_component: None,
            resolver: None,
            title: None,
            transport: None,
            history: None,
            title_sink: None,
            hooks: Vec::new(),
        }
    }

    /// Client configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// The state tree to boot with.
    pub fn payload(mut self, payload: InitialPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Boot from an already parsed tree.
    pub fn tree(self, tree: StateTree) -> Self {
        self.payload(InitialPayload::Tree(tree))
    }

    /// Boot from a JSON document.
    pub fn json(self, json: impl Into<String>) -> Self {
        self.payload(InitialPayload::Json(json.into()))
    }

    /// Boot from a server-rendered page.
    pub fn html(self, html: impl Into<String>) -> Self {
        self.payload(InitialPayload::Html(html.into()))
    }

    /// Definition of the initial page component, rendered without calling
    /// the resolver.
    pub fn initial_component(mut self, definition: ComponentDefinition) -> Self {
        self.initial_component = Some(definition);
        self
    }

    /// Callback resolving page component names.
    pub fn resolver<R: ResolveComponent + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Transform applied to page titles before they reach the title sink.
    pub fn title<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.title = Some(Arc::new(transform));
        self
    }

    /// Transport for visits. Defaults to reqwest.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// History collaborator. Defaults to an in-memory history.
    pub fn history(mut self, history: Arc<dyn History>) -> Self {
        self.history = Some(history);
        self
    }

    /// Where document titles go.
    pub fn title_sink(mut self, sink: Arc<dyn TitleSink>) -> Self {
        self.title_sink = Some(sink);
        self
    }

    /// Extra lifecycle hooks, run after the progress indicator.
    pub fn hook(mut self, hook: Arc<dyn RouterHooks>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Install the payload, resolve the initial component and wire the router.
    ///
    /// A failure to resolve the initial component is logged; the app still
    /// boots without a rendered page.
    pub async fn build(self) -> Result<LaikaApp> {
        let tree = self
            .payload
            .ok_or_else(|| LaikaError::Payload("payload missing/empty".into()))?
            .into_tree()?;
        let config = Arc::new(self.config);

        let mut store = PayloadStore::new()
            .with_fallback(config.title_fallback.clone())
            .with_title_sink(
                self.title_sink
                    .unwrap_or_else(|| Arc::new(MemoryTitle::new())),
            );
        if let Some(transform) = self.title {
            store = store.with_title_transform(move |title: &str| transform(title));
        }
        let store = Arc::new(store);

        let callback = self.resolver.unwrap_or_else(|| Arc::new(unconfigured_resolver));
        let mut resolver = ComponentResolver::from_shared(callback);
        if let Some(definition) = self.initial_component {
            resolver = resolver.with_initial(tree.page.component.clone(), definition);
        }
        let view = Arc::new(ViewState::new(resolver));

        let component = tree.page.component.clone();
        let location = tree.page.url.clone().unwrap_or_else(|| "/".to_string());
        store.replace(tree);

        if let Err(err) = view.sync_component(&component).await {
            tracing::error!("initial component: {}", err);
        }
        view.refresh_key(false);

        let progress = Arc::new(ProgressIndicator::new(config.progress.clone()));
        let mut hooks: Vec<Arc<dyn RouterHooks>> = vec![progress.clone()];
        hooks.extend(self.hooks);

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::with_config((*config).clone())));
        let history = self
            .history
            .unwrap_or_else(|| Arc::new(MemoryHistory::new(location)));

        let router = Router::new(
            config.clone(),
            transport,
            history,
            store.clone(),
            view.clone(),
            hooks,
        )?;
        let components = Components::new(
            store.clone(),
            router.downgrade(),
            config.component_cache_size,
        );

        tracing::debug!("laika app booted on component '{}'", component);

        Ok(LaikaApp {
            router,
            store,
            view,
            progress,
            components,
        })
    }
}

async fn unconfigured_resolver(name: String) -> anyhow::Result<ComponentDefinition> {
    anyhow::bail!("no component resolver configured, cannot resolve '{}'", name)
}

/// A running Laika application.
pub struct LaikaApp {
    router: Router,
    store: Arc<PayloadStore>,
    view: Arc<ViewState>,
    progress: Arc<ProgressIndicator>,
    components: Components,
}

impl LaikaApp {
    /// Start building an app.
    pub fn builder() -> LaikaAppBuilder {
        LaikaAppBuilder::new()
    }

    /// The router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The state store.
    pub fn store(&self) -> &Arc<PayloadStore> {
        &self.store
    }

    /// The view state.
    pub fn view(&self) -> &Arc<ViewState> {
        &self.view
    }

    /// The progress indicator.
    pub fn progress(&self) -> &Arc<ProgressIndicator> {
        &self.progress
    }

    /// Accessors for embedded components.
    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Render tree of the current page.
    pub fn render(&self) -> Option<Arc<RenderNode>> {
        self.view.render(&self.store)
    }

    /// Browser back/forward: reload the page from the server.
    pub fn handle_pop_state(&self) {
        tracing::debug!("history pop, reloading {}", self.router.history().location());
        self.router.history().reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_tree, ScriptedTransport};
    use crate::types::RawResponse;
    use crate::VisitOptions;
    use serde_json::json;

    #[test]
    fn test_read_initial_payload() {
        let html = r#"<html><head>
            <script data-laika='payload' type="application/json">{"token":"t1","page":{"component":"Home"}}</script>
        </head></html>"#;
        let tree = read_initial_payload(html).unwrap();
        assert_eq!(tree.token(), Some("t1"));

        let empty = r#"<script data-laika="payload">   </script>"#;
        assert!(matches!(read_initial_payload(empty), Err(LaikaError::Payload(_))));

        let broken = r#"<script data-laika="payload">{</script>"#;
        assert!(matches!(read_initial_payload(broken), Err(LaikaError::Decode(_))));
    }

    #[test]
    fn test_payload_script_pattern() {
        let first = r#"<script data-laika="payload">{"page":{"component":"A"}}</script>"#;
        let second = "<SCRIPT data-laika=\"payload\">\n{\"page\":{\"component\":\"B\"}}\n</SCRIPT>";

        assert_eq!(read_initial_payload(first).unwrap().page.component, "A");
        assert_eq!(read_initial_payload(second).unwrap().page.component, "B");
        assert!(!PAYLOAD_SCRIPT.is_match(r#"<script data-laika="other">{}</script>"#));
    }

    #[tokio::test]
    async fn test_build_requires_payload() {
        let err = LaikaApp::builder().build().await.err().unwrap();
        assert!(matches!(err, LaikaError::Payload(_)));
    }

    #[tokio::test]
    async fn test_boot_without_resolver_logs_and_continues() {
        let app = LaikaApp::builder().tree(fixture_tree()).build().await.unwrap();
        assert!(app.view().component().is_none());
        assert!(app.render().is_none());
        assert_eq!(app.store().page().unwrap().component, "Home");
    }

    #[tokio::test]
    async fn test_boot_and_navigate() {
        let transport = Arc::new(ScriptedTransport::new());
        let history = Arc::new(MemoryHistory::new("/"));
        let titles = Arc::new(MemoryTitle::new());

        let app = LaikaApp::builder()
            .json(json!({ "page": { "component": "Home", "title": "Home" } }).to_string())
            .initial_component(ComponentDefinition::new("Home"))
            .resolver(|name: String| async move {
                Ok::<_, anyhow::Error>(ComponentDefinition::new(name))
            })
            .title(|title| format!("{} - Site", title))
            .transport(transport.clone())
            .history(history.clone())
            .title_sink(titles.clone())
            .build()
            .await
            .unwrap();

        assert_eq!(app.view().resolver().calls(), 0);
        assert_eq!(app.render().unwrap().component, "Home");

        transport.push(RawResponse::new(
            200,
            json!({ "page": { "component": "Blog", "title": "Blog" } }).to_string(),
        ));
        app.router().visit("/blog", VisitOptions::new()).await.unwrap();

        assert_eq!(app.view().resolver().calls(), 1);
        assert_eq!(app.render().unwrap().component, "Blog");
        assert_eq!(titles.history(), vec!["Home - Site", "Blog - Site"]);
        assert!(app.progress().is_active());
        assert_eq!(app.progress().percent(), 100.0);

        app.handle_pop_state();
        assert_eq!(history.reloads(), 1);
    }

    #[tokio::test]
    async fn test_components_facade_is_wired() {
        let app = LaikaApp::builder().tree(fixture_tree()).build().await.unwrap();
        assert!(app.components().has("posts"));
        assert!(app.components().get("posts").unwrap().exists("items"));
    }
}
