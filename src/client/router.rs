//! The navigation lifecycle.
//!
//! ```text
//! Idle -> Before -> InFlight -> Success    -> Idle
//!                            -> Redirected -> Idle
//!                            -> Rejected   -> Idle
//!                            -> Failed     -> Idle
//! ```
//!
//! Within one visit the order is fixed: navigation id, `on_before` hooks,
//! dispatch, history write, component resolution, store update, `on_success`
//! hooks. Visits are not serialized against each other. Each gets a
//! monotonically increasing id, and each foreground visit opens a new
//! generation. With [`ClientConfig::discard_stale_responses`], a response
//! whose generation has been overtaken is dropped, both when it arrives and
//! again after its component resolved.
//!
//! Background visits (lazy field loads) never open a generation. They ride on
//! the one current at their start and are dropped if a foreground visit
//! started since.

use crate::client::config::ClientConfig;
use crate::client::history::History;
use crate::client::hooks::{HookSet, RouterHooks};
use crate::client::transport::Transport;
use crate::error::{LaikaError, Result};
use crate::protocol::{decode_response, encode_request};
use crate::store::PayloadStore;
use crate::types::{NavigationRequest, Outcome, PageResponse, RawResponse, VisitOptions};
use crate::view::ViewState;
use http::Method;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use url::Url;

/// Lifecycle state of the most recent visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    /// No navigation in progress
    Idle,
    /// Before hooks are running
    Before,
    /// Request dispatched, waiting for the response
    InFlight,
    /// Response applied to the store
    Success,
    /// Left the app through a protocol redirect
    Redirected,
    /// Left the app after a non-2xx response
    Rejected,
    /// Transport or decode failure
    Failed,
}

/// How a visit ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// The response was applied to the store
    Completed {
        /// Navigation id
        id: u64,
        /// Whether the response was merged as a partial patch
        partial: bool,
    },
    /// `409`: hard navigation to `location` was issued
    Redirected {
        /// Redirect target
        location: String,
    },
    /// Non-2xx: hard navigation to the requested URL was issued
    Rejected {
        /// HTTP status code
        status: u16,
    },
    /// A newer visit started before this response arrived; it was dropped
    Superseded {
        /// Navigation id
        id: u64,
    },
}

/// Which generation a visit belongs to.
#[derive(Debug, Clone, Copy)]
struct Ticket {
    id: u64,
    generation: u64,
    background: bool,
}

struct RouterInner {
    config: Arc<ClientConfig>,
    base_url: Url,
    transport: Arc<dyn Transport>,
    history: Arc<dyn History>,
    hooks: HookSet,
    store: Arc<PayloadStore>,
    view: Arc<ViewState>,
    next_id: AtomicU64,
    generation: AtomicU64,
    state: Mutex<NavigationState>,
}

/// Issues visits and applies their responses.
///
/// Cheap to clone; clones share the same lifecycle.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

/// Non-owning router reference held by component handles.
#[derive(Clone)]
pub struct WeakRouter {
    inner: Weak<RouterInner>,
}

impl WeakRouter {
    /// A reference that never upgrades.
    pub fn dangling() -> Self {
        WeakRouter { inner: Weak::new() }
    }

    /// The router, if it is still alive.
    pub fn upgrade(&self) -> Option<Router> {
        self.inner.upgrade().map(|inner| Router { inner })
    }
}

impl Router {
    /// Wire a router to its collaborators.
    pub fn new(
        config: Arc<ClientConfig>,
        transport: Arc<dyn Transport>,
        history: Arc<dyn History>,
        store: Arc<PayloadStore>,
        view: Arc<ViewState>,
        hooks: Vec<Arc<dyn RouterHooks>>,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Router {
            inner: Arc::new(RouterInner {
                config,
                base_url,
                transport,
                history,
                hooks: HookSet::new(hooks),
                store,
                view,
                next_id: AtomicU64::new(0),
                generation: AtomicU64::new(0),
                state: Mutex::new(NavigationState::Idle),
            }),
        })
    }

    /// A weak reference to this router.
    pub fn downgrade(&self) -> WeakRouter {
        WeakRouter {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> NavigationState {
        *self.inner.state.lock()
    }

    /// The history collaborator.
    pub fn history(&self) -> &Arc<dyn History> {
        &self.inner.history
    }

    /// The store this router applies responses to.
    pub fn store(&self) -> &Arc<PayloadStore> {
        &self.inner.store
    }

    /// GET visit.
    pub async fn get(&self, url: &str, options: VisitOptions) -> Result<Visit> {
        self.visit(url, options.with_method(Method::GET)).await
    }

    /// POST visit with a JSON body.
    pub async fn post(&self, url: &str, data: Value, options: VisitOptions) -> Result<Visit> {
        self.visit(url, options.with_method(Method::POST).with_data(data))
            .await
    }

    /// PUT visit with a JSON body.
    pub async fn put(&self, url: &str, data: Value, options: VisitOptions) -> Result<Visit> {
        self.visit(url, options.with_method(Method::PUT).with_data(data))
            .await
    }

    /// PATCH visit with a JSON body.
    pub async fn patch(&self, url: &str, data: Value, options: VisitOptions) -> Result<Visit> {
        self.visit(url, options.with_method(Method::PATCH).with_data(data))
            .await
    }

    /// DELETE visit with a JSON body.
    pub async fn delete(&self, url: &str, data: Value, options: VisitOptions) -> Result<Visit> {
        self.visit(url, options.with_method(Method::DELETE).with_data(data))
            .await
    }

    /// Send a protocol request and return the response untouched.
    ///
    /// No hooks, no history, no state changes.
    pub async fn raw(&self, url: &str, options: VisitOptions) -> Result<RawResponse> {
        let target = self.inner.base_url.join(url)?;
        let token = self.inner.store.token();
        let encoded = encode_request(target, &options, token.as_deref())?;
        self.inner.transport.send(encoded).await
    }

    /// Navigate to `url`.
    ///
    /// Protocol redirects and rejections are handled here through hard
    /// navigation and reported as [`Visit::Redirected`] / [`Visit::Rejected`].
    /// Transport and decode failures are returned as errors after the failure
    /// hooks ran; the store is left untouched.
    pub async fn visit(&self, url: &str, options: VisitOptions) -> Result<Visit> {
        let inner = &self.inner;
        let id = inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let target = inner.base_url.join(url)?;
        let token = inner.store.token();
        let encoded = encode_request(target.clone(), &options, token.as_deref())?;

        let ticket = if options.background {
            Ticket {
                id,
                generation: inner.generation.load(Ordering::SeqCst),
                background: true,
            }
        } else {
            inner.generation.store(id, Ordering::SeqCst);
            Ticket {
                id,
                generation: id,
                background: false,
            }
        };
        let request = NavigationRequest {
            id,
            url: target,
            target: url.to_string(),
            options,
        };

        self.transition(ticket, NavigationState::Before);
        inner.hooks.before(&request);

        self.transition(ticket, NavigationState::InFlight);
        tracing::debug!("navigation {}: {} {}", id, request.method(), request.url);

        let response = match inner.transport.send(encoded).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail(&request, ticket, err)),
        };

        if self.is_stale(ticket) {
            tracing::warn!(
                "navigation {}: response for {} arrived after a newer visit, discarding",
                id,
                request.url
            );
            return Ok(Visit::Superseded { id });
        }

        if request.options.writes_history() {
            if request.options.replace {
                inner.history.replace(&request.target);
            } else {
                inner.history.push(&request.target);
            }
        }

        let outcome = match decode_response(&response) {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.fail(&request, ticket, err)),
        };

        match outcome {
            Outcome::Redirect(location) => {
                self.transition(ticket, NavigationState::Redirected);
                inner.history.assign(&location);
                let err = LaikaError::ProtocolRedirect {
                    location: location.clone(),
                };
                inner.hooks.failure(&request, &err);
                self.transition(ticket, NavigationState::Idle);
                Ok(Visit::Redirected { location })
            }
            Outcome::Rejected(status) => {
                self.transition(ticket, NavigationState::Rejected);
                inner.history.assign(request.url.as_str());
                inner
                    .hooks
                    .failure(&request, &LaikaError::ProtocolRejected { status });
                self.transition(ticket, NavigationState::Idle);
                Ok(Visit::Rejected { status })
            }
            Outcome::Success(page) => {
                let partial = page.is_partial();
                match self.apply(&request, ticket, page).await {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::warn!(
                            "navigation {}: a newer visit started while resolving {}, discarding",
                            id,
                            request.url
                        );
                        return Ok(Visit::Superseded { id });
                    }
                    Err(err) => return Err(self.fail(&request, ticket, err)),
                }
                self.transition(ticket, NavigationState::Success);
                inner.hooks.success(&request, &response);
                self.transition(ticket, NavigationState::Idle);
                Ok(Visit::Completed { id, partial })
            }
        }
    }

    /// Resolve the next page component, then install it together with the
    /// tree. Returns `false` when the visit went stale while resolving.
    async fn apply(&self, request: &NavigationRequest, ticket: Ticket, page: PageResponse) -> Result<bool> {
        let inner = &self.inner;
        let next = inner.store.preview(&page.body, page.only.as_slice())?;
        let resolved = inner.view.prepare_component(&next.page.component).await;

        if self.is_stale(ticket) {
            return Ok(false);
        }

        inner.store.apply(page.body, page.only.as_slice())?;
        match resolved {
            Ok(Some(definition)) => inner.view.set_component(definition),
            Ok(None) => {}
            Err(err) => {
                tracing::error!("navigation {}: {}", request.id, err);
                inner.hooks.failure(request, &err);
            }
        }

        inner.view.refresh_key(request.options.preserve_state);
        Ok(true)
    }

    fn fail(&self, request: &NavigationRequest, ticket: Ticket, err: LaikaError) -> LaikaError {
        self.transition(ticket, NavigationState::Failed);
        if self.inner.config.enable_logging {
            tracing::warn!("navigation {} to {} failed: {}", request.id, request.url, err);
        }
        self.inner.hooks.failure(request, &err);
        self.transition(ticket, NavigationState::Idle);
        err
    }

    fn is_stale(&self, ticket: Ticket) -> bool {
        self.inner.config.discard_stale_responses
            && self.inner.generation.load(Ordering::SeqCst) != ticket.generation
    }

    /// Only the newest foreground visit drives the observable state.
    fn transition(&self, ticket: Ticket, next: NavigationState) {
        if ticket.background || self.inner.generation.load(Ordering::SeqCst) != ticket.id {
            return;
        }
        let mut state = self.inner.state.lock();
        tracing::trace!("navigation {}: {:?} -> {:?}", ticket.id, *state, next);
        *state = next;
    }
}
