//! Shared test doubles.

use crate::client::{ClientConfig, MemoryHistory, Router, RouterHooks, Transport};
use crate::error::{LaikaError, Result};
use crate::protocol::EncodedRequest;
use crate::store::PayloadStore;
use crate::types::{NavigationRequest, RawResponse, StateTree};
use crate::view::{ComponentDefinition, ComponentResolver, ViewState};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

pub(crate) fn fixture_tree() -> StateTree {
    StateTree::from_value(json!({
        "version": "v1",
        "token": "t1",
        "page": {
            "component": "Home",
            "title": "Home",
            "props": { "greeting": "hi" }
        },
        "shared": { "user": { "name": "A", "age": 9 } },
        "components": {
            "posts": {
                "alias": "posts",
                "component": "PostList",
                "props": { "count": 2 },
                "methods": ["refresh"],
                "vars": ["items"]
            }
        }
    }))
    .unwrap()
}

enum Scripted {
    Respond(RawResponse, Option<Arc<Notify>>),
    Fail(String),
}

/// Holds back a scripted response until released.
pub(crate) struct Gate(Arc<Notify>);

impl Gate {
    pub(crate) fn release(&self) {
        self.0.notify_one();
    }
}

/// Transport answering from a queue, in order.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    queue: Mutex<VecDeque<Scripted>>,
    sent: Mutex<Vec<EncodedRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, response: RawResponse) {
        self.queue.lock().push_back(Scripted::Respond(response, None));
    }

    pub(crate) fn push_gated(&self, response: RawResponse) -> Gate {
        let notify = Arc::new(Notify::new());
        self.queue
            .lock()
            .push_back(Scripted::Respond(response, Some(notify.clone())));
        Gate(notify)
    }

    pub(crate) fn fail(&self, message: &str) {
        self.queue.lock().push_back(Scripted::Fail(message.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<EncodedRequest> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: EncodedRequest) -> Result<RawResponse> {
        self.sent.lock().push(request);
        let next = self.queue.lock().pop_front();
        match next {
            Some(Scripted::Respond(response, gate)) => {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                Ok(response)
            }
            Some(Scripted::Fail(message)) => Err(LaikaError::Transport(message)),
            None => Err(LaikaError::Transport("no scripted response".into())),
        }
    }
}

/// Hooks that record what they saw as short strings.
#[derive(Default)]
pub(crate) struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl RecordingHooks {
    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl RouterHooks for RecordingHooks {
    fn on_before(&self, request: &NavigationRequest) -> anyhow::Result<()> {
        self.events.lock().push(format!("before:{}", request.id));
        Ok(())
    }

    fn on_success(&self, request: &NavigationRequest, _response: &RawResponse) -> anyhow::Result<()> {
        self.events.lock().push(format!("success:{}", request.id));
        Ok(())
    }

    fn on_failure(&self, request: &NavigationRequest, error: &LaikaError) -> anyhow::Result<()> {
        let kind = match error {
            LaikaError::ProtocolRedirect { .. } => "redirect",
            LaikaError::ProtocolRejected { .. } => "rejected",
            LaikaError::Transport(_) => "transport",
            LaikaError::Decode(_) => "decode",
            LaikaError::Resolution { .. } => "resolution",
            _ => "other",
        };
        self.events
            .lock()
            .push(format!("failure:{}:{}", request.id, kind));
        Ok(())
    }
}

/// A router over `transport` with the fixture tree installed and `Home`
/// resolved.
pub(crate) fn test_router(
    transport: Arc<ScriptedTransport>,
) -> (Router, Arc<PayloadStore>, Arc<MemoryHistory>) {
    let store = Arc::new(PayloadStore::new());
    store.replace(fixture_tree());

    let resolver = ComponentResolver::new(|name: String| async move {
        Ok::<_, anyhow::Error>(ComponentDefinition::new(name))
    })
    .with_initial("Home", ComponentDefinition::new("Home"));
    let view = Arc::new(ViewState::new(resolver));
    if let Some(home) = view.resolver().resolve_initial("Home") {
        view.set_component(home);
    }

    let history = Arc::new(MemoryHistory::new("/"));
    let router = Router::new(
        Arc::new(ClientConfig::default()),
        transport,
        history.clone(),
        store.clone(),
        view,
        Vec::new(),
    )
    .unwrap();
    (router, store, history)
}
