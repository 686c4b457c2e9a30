//! Navigation progress indicator.
//!
//! ```text
//! Inactive --start()--> Active (ticking toward the ceiling)
//! Active   --done()---> 100% --settle--> Inactive, 0%
//! ```
//!
//! The ticker never reaches the ceiling; only `done` shows 100%. At most one
//! timer (ticker or settle) runs at a time.

use crate::client::{ProgressConfig, RouterHooks};
use crate::error::LaikaError;
use crate::types::{NavigationRequest, RawResponse};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Snapshot of the indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    /// Whether the bar is shown
    pub active: bool,
    /// Fill, 0 to 100
    pub percent: f64,
    /// Bar color
    pub color: String,
}

/// Start/done/fail state machine behind a loading bar.
pub struct ProgressIndicator {
    config: ProgressConfig,
    state: Arc<Mutex<ProgressState>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl ProgressIndicator {
    /// An inactive indicator.
    pub fn new(config: ProgressConfig) -> Self {
        let state = ProgressState {
            active: false,
            percent: 0.0,
            color: config.color.clone(),
        };
        ProgressIndicator {
            config,
            state: Arc::new(Mutex::new(state)),
            timer: Mutex::new(None),
        }
    }

    /// Current state.
    pub fn state(&self) -> ProgressState {
        self.state.lock().clone()
    }

    /// Whether the bar is shown.
    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Current fill.
    pub fn percent(&self) -> f64 {
        self.state.lock().percent
    }

    /// Show the indicator and start ticking.
    ///
    /// Without a tokio runtime the indicator shows the initial percent and
    /// does not tick.
    pub fn start(&self) {
        self.cancel_timer();
        {
            let mut state = self.state.lock();
            state.active = true;
            state.percent = self.config.initial_percent;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let state = self.state.clone();
        let ceiling = self.config.ceiling_percent;
        let ratio = self.config.step_ratio;
        let period = Duration::from_millis(self.config.tick_ms.max(1));

        let ticker = handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut guard = state.lock();
                if !guard.active {
                    break;
                }
                guard.percent += (ceiling - guard.percent) * ratio;
            }
        });
        *self.timer.lock() = Some(ticker);
    }

    /// Finish the indicator.
    ///
    /// A no-op when inactive unless `force` is set. Otherwise jumps to 100%
    /// and resets to inactive, 0% after the settle delay.
    pub fn done(&self, force: bool) {
        self.cancel_timer();
        {
            let mut state = self.state.lock();
            if !state.active && !force {
                return;
            }
            state.percent = 100.0;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            reset(&self.state);
            return;
        };

        let state = self.state.clone();
        let settle = Duration::from_millis(self.config.settle_ms);
        let timer = handle.spawn(async move {
            tokio::time::sleep(settle).await;
            reset(&state);
        });
        *self.timer.lock() = Some(timer);
    }

    /// `done(true)`.
    pub fn fail(&self) {
        self.done(true);
    }

    fn cancel_timer(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.abort();
        }
    }
}

fn reset(state: &Mutex<ProgressState>) {
    let mut state = state.lock();
    state.active = false;
    state.percent = 0.0;
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self::new(ProgressConfig::default())
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

impl std::fmt::Debug for ProgressIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressIndicator")
            .field("state", &self.state())
            .finish()
    }
}

impl RouterHooks for ProgressIndicator {
    fn on_before(&self, request: &NavigationRequest) -> anyhow::Result<()> {
        if !request.options.background {
            self.start();
        }
        Ok(())
    }

    fn on_success(&self, request: &NavigationRequest, _response: &RawResponse) -> anyhow::Result<()> {
        if !request.options.background {
            self.done(false);
        }
        Ok(())
    }

    fn on_failure(&self, request: &NavigationRequest, _error: &LaikaError) -> anyhow::Result<()> {
        if !request.options.background {
            self.fail();
        }
        Ok(())
    }
}
