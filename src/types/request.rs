//! Navigation request types.

use http::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

/// Options for a single visit.
///
/// Built with chained setters in the same way as request builders elsewhere
/// in the crate:
///
/// ```
/// use laika_http::VisitOptions;
///
/// let options = VisitOptions::new()
///     .with_only(["shared.user"])
///     .preserve_state()
///     .replace();
/// assert!(options.preserve_state);
/// assert_eq!(options.only, vec!["shared.user".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitOptions {
    /// HTTP method, `GET` unless set
    pub method: Method,

    /// JSON body for non-GET requests (`{}` when absent)
    pub data: Option<Value>,

    /// Replace the current history entry instead of pushing a new one
    pub replace: bool,

    /// Keep the current render key so the view is not remounted
    pub preserve_state: bool,

    /// Paths the server may restrict its response to
    pub only: Vec<String>,

    /// Bypass server-side staleness checks
    pub force: bool,

    /// Top-level keys the server must include even if unchanged
    pub require: Vec<String>,

    /// Extra request headers, applied after the protocol defaults
    pub headers: BTreeMap<String, String>,

    /// Background field load: never writes browser history
    pub background: bool,
}

impl VisitOptions {
    /// Options for a plain GET visit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the JSON body.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Replace the current history entry.
    pub fn replace(mut self) -> Self {
        self.replace = true;
        self
    }

    /// Keep the render key.
    pub fn preserve_state(mut self) -> Self {
        self.preserve_state = true;
        self
    }

    /// Restrict the response to these paths.
    pub fn with_only<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Ask the server to skip staleness checks.
    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    /// Require these top-level keys in the response.
    pub fn with_require<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Add a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Mark as a background field load.
    pub fn background(mut self) -> Self {
        self.background = true;
        self
    }

    /// Whether a successful visit with these options writes browser history.
    pub fn writes_history(&self) -> bool {
        self.method == Method::GET && !self.background
    }
}

/// A visit in flight, as seen by lifecycle hooks.
#[derive(Debug, Clone)]
pub struct NavigationRequest {
    /// Monotonically increasing navigation id
    pub id: u64,

    /// Absolute target URL
    pub url: Url,

    /// URL exactly as the caller passed it, used for history entries
    pub target: String,

    /// Options the visit was started with
    pub options: VisitOptions,
}

impl NavigationRequest {
    /// HTTP method of the visit.
    pub fn method(&self) -> &Method {
        &self.options.method
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_get() {
        let options = VisitOptions::new();
        assert_eq!(options.method, Method::GET);
        assert!(options.writes_history());
    }

    #[test]
    fn test_history_rules() {
        assert!(!VisitOptions::new().background().writes_history());
        assert!(!VisitOptions::new()
            .with_method(Method::POST)
            .writes_history());
    }

    #[test]
    fn test_builder() {
        let options = VisitOptions::new()
            .with_method(Method::PUT)
            .with_data(serde_json::json!({ "name": "x" }))
            .force()
            .with_require(["shared"])
            .with_header("X-Custom", "1");

        assert_eq!(options.method, Method::PUT);
        assert!(options.force);
        assert_eq!(options.require, vec!["shared".to_string()]);
        assert_eq!(options.headers.get("X-Custom").map(String::as_str), Some("1"));
    }
}
