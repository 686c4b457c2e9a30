//! Laika response builder.
//!
//! # Response Kinds
//!
//! | Constructor | Status | Headers | Body |
//! |-------------|--------|---------|------|
//! | [`LaikaResponse::page`] | 200 | | full state tree |
//! | [`LaikaResponse::partial`] | 200 | `X-Laika-Only` | named branches only |
//! | [`LaikaResponse::redirect`] | 409 | `X-Laika-Location` | none |

use super::extract::LaikaRequest;
use crate::merge::{extract, parse_paths};
use crate::protocol::constants::headers;
use crate::protocol::format_list_header;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::collections::BTreeMap;

/// A response understood by the Laika client.
///
/// # Examples
///
/// ```
/// use laika_http::server::LaikaResponse;
/// use serde_json::json;
///
/// let tree = json!({
///     "page": { "component": "Home" },
///     "shared": { "user": { "name": "B", "age": 9 } }
/// });
/// let response = LaikaResponse::partial(&tree, &["shared.user.name"]);
/// assert_eq!(response.body(), Some(&json!({ "shared": { "user": { "name": "B" } } })));
/// ```
#[derive(Debug, Clone)]
pub struct LaikaResponse {
    status: StatusCode,
    headers: BTreeMap<String, String>,
    body: Option<Value>,
}

impl LaikaResponse {
    /// Full page response.
    pub fn page(body: Value) -> Self {
        LaikaResponse {
            status: StatusCode::OK,
            headers: BTreeMap::new(),
            body: Some(body),
        }
    }

    /// Partial response carrying only the branches named by `paths`.
    ///
    /// Invalid paths are skipped; when none remain the full tree is sent.
    pub fn partial<S: AsRef<str>>(tree: &Value, paths: &[S]) -> Self {
        let paths = parse_paths(paths);
        if paths.is_empty() {
            return Self::page(tree.clone());
        }
        let names: Vec<String> = paths.iter().map(ToString::to_string).collect();
        Self::page(extract(tree, &paths))
            .with_header(headers::ONLY.as_str(), format_list_header(&names))
    }

    /// Hard redirect out of the single-page app.
    pub fn redirect(location: impl Into<String>) -> Self {
        LaikaResponse {
            status: StatusCode::CONFLICT,
            headers: BTreeMap::new(),
            body: None,
        }
        .with_header(headers::LOCATION.as_str(), location)
    }

    /// Redirect that also works for plain browser requests (`303` with
    /// `Location`).
    pub fn redirect_for(request: &LaikaRequest, location: impl Into<String>) -> Self {
        if request.is_laika {
            return Self::redirect(location);
        }
        LaikaResponse {
            status: StatusCode::SEE_OTHER,
            headers: BTreeMap::new(),
            body: None,
        }
        .with_header(header::LOCATION.as_str(), location)
    }

    /// Full or partial response, depending on what `request` asked for.
    pub fn for_request(request: &LaikaRequest, tree: Value) -> Self {
        if request.is_partial() {
            Self::partial(&tree, &request.only)
        } else {
            Self::page(tree)
        }
    }

    /// Override the status code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Add a response header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// The status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// A header value, if set.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The JSON body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl IntoResponse for LaikaResponse {
    fn into_response(self) -> Response {
        let mut response = match self.body {
            Some(body) => (self.status, axum::Json(body)).into_response(),
            None => self.status.into_response(),
        };

        let map = response.headers_mut();
        map.insert(header::VARY, HeaderValue::from_static("x-laika"));
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    map.insert(name, value);
                }
                _ => tracing::warn!("dropping invalid response header {}: {}", name, value),
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use serde_json::json;

    #[test]
    fn test_redirect() {
        let response = LaikaResponse::redirect("/login").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(response.headers()["x-laika-location"], "/login");
    }

    #[test]
    fn test_redirect_for_plain_request() {
        let response = LaikaResponse::redirect_for(&LaikaRequest::default(), "/login");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.header("Location"), Some("/login"));
    }

    #[test]
    fn test_for_request_honours_only() {
        let mut map = HeaderMap::new();
        map.insert("x-laika", HeaderValue::from_static("1"));
        map.insert("x-laika-only", HeaderValue::from_static("shared.user.name, bad..path"));
        let request = LaikaRequest::from_headers(&map);

        let tree = json!({ "page": { "component": "Home" }, "shared": { "user": { "name": "B", "age": 9 } } });
        let response = LaikaResponse::for_request(&request, tree.clone());
        assert_eq!(response.header("X-Laika-Only"), Some("shared.user.name"));
        assert_eq!(response.body(), Some(&json!({ "shared": { "user": { "name": "B" } } })));

        let full = LaikaResponse::for_request(&LaikaRequest::default(), tree.clone());
        assert_eq!(full.body(), Some(&tree));
        assert!(full.header("X-Laika-Only").is_none());
    }

    #[test]
    fn test_into_response_headers() {
        let response = LaikaResponse::page(json!({}))
            .with_header("X-Custom", "yes")
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["vary"], "x-laika");
        assert_eq!(response.headers()["x-custom"], "yes");
    }
}
