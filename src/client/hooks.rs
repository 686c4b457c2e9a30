//! Navigation lifecycle hooks.

use crate::error::LaikaError;
use crate::types::{NavigationRequest, RawResponse};
use std::sync::Arc;

/// Callbacks invoked by the router around each visit.
///
/// Hook errors are logged and never abort a navigation. Raw requests do not
/// invoke hooks.
pub trait RouterHooks: Send + Sync {
    /// Before any network activity.
    fn on_before(&self, _request: &NavigationRequest) -> anyhow::Result<()> {
        Ok(())
    }

    /// After a 2xx response has been applied.
    fn on_success(&self, _request: &NavigationRequest, _response: &RawResponse) -> anyhow::Result<()> {
        Ok(())
    }

    /// After a redirect, rejection, transport failure or resolution failure.
    fn on_failure(&self, _request: &NavigationRequest, _error: &LaikaError) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Ordered set of hooks.
#[derive(Clone, Default)]
pub(crate) struct HookSet {
    hooks: Vec<Arc<dyn RouterHooks>>,
}

impl HookSet {
    pub(crate) fn new(hooks: Vec<Arc<dyn RouterHooks>>) -> Self {
        HookSet { hooks }
    }

    pub(crate) fn before(&self, request: &NavigationRequest) {
        for hook in &self.hooks {
            if let Err(err) = hook.on_before(request) {
                tracing::warn!("before hook failed for navigation {}: {:#}", request.id, err);
            }
        }
    }

    pub(crate) fn success(&self, request: &NavigationRequest, response: &RawResponse) {
        for hook in &self.hooks {
            if let Err(err) = hook.on_success(request, response) {
                tracing::warn!("success hook failed for navigation {}: {:#}", request.id, err);
            }
        }
    }

    pub(crate) fn failure(&self, request: &NavigationRequest, error: &LaikaError) {
        for hook in &self.hooks {
            if let Err(err) = hook.on_failure(request, error) {
                tracing::warn!("failure hook failed for navigation {}: {:#}", request.id, err);
            }
        }
    }
}
