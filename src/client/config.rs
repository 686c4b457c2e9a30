//! Client configuration.

use serde::Deserialize;

/// Configuration for the Laika client.
///
/// Deserializable so applications can embed it in their own config files;
/// every field has a default.
///
/// # Examples
///
/// ```
/// use laika_http::client::ClientConfig;
///
/// let config = ClientConfig {
///     base_url: "https://example.com".into(),
///     discard_stale_responses: false,
///     ..Default::default()
/// };
/// assert_eq!(config.request_timeout_ms, 30_000);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL relative visit targets are resolved against
    pub base_url: String,

    /// Transport-level request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Emit transport warnings through `tracing`
    pub enable_logging: bool,

    /// Drop responses of visits that were overtaken by a newer visit
    pub discard_stale_responses: bool,

    /// Document title used when the title transform yields an empty string
    pub title_fallback: String,

    /// Number of component handles kept by the components facade
    pub component_cache_size: usize,

    /// Progress indicator timing
    pub progress: ProgressConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            request_timeout_ms: 30_000,
            enable_logging: true,
            discard_stale_responses: true,
            title_fallback: "Laika Unknown Title".to_string(),
            component_cache_size: 64,
            progress: ProgressConfig::default(),
        }
    }
}

/// Progress indicator timing and appearance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Percent shown right after `start()`
    pub initial_percent: f64,
    /// Value the simulated progress approaches but never reaches
    pub ceiling_percent: f64,
    /// Ticker interval in milliseconds
    pub tick_ms: u64,
    /// Fraction of the remaining distance covered per tick
    pub step_ratio: f64,
    /// Delay between reaching 100% and deactivating, in milliseconds
    pub settle_ms: u64,
    /// Bar colour
    pub color: String,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            initial_percent: 10.0,
            ceiling_percent: 90.0,
            tick_ms: 200,
            step_ratio: 0.08,
            settle_ms: 150,
            color: "#DE3163".to_string(),
        }
    }
}
