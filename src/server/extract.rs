//! Axum extractor for Laika request headers.
//!
//! # Usage
//!
//! ```ignore
//! use axum::{routing::get, Router};
//! use laika_http::server::{LaikaRequest, LaikaResponse};
//! use serde_json::json;
//!
//! async fn blog(laika: LaikaRequest) -> LaikaResponse {
//!     LaikaResponse::for_request(&laika, json!({ "page": { "component": "Blog" } }))
//! }
//!
//! let app: Router = Router::new().route("/blog", get(blog));
//! ```

use crate::protocol::constants::headers;
use crate::protocol::{is_flag_set, parse_list_header};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::collections::BTreeMap;
use std::convert::Infallible;

/// Laika protocol information from the request headers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaikaRequest {
    /// `X-Laika: 1` was sent, the client expects JSON
    pub is_laika: bool,

    /// Echoed state tree token
    pub token: Option<String>,

    /// `X-Laika-Force` was set
    pub force: bool,

    /// Top-level keys the response must include
    pub require: Vec<String>,

    /// Paths the client wants; empty means the full tree
    pub only: Vec<String>,

    /// All headers, names lowercase
    pub headers: BTreeMap<String, String>,
}

impl LaikaRequest {
    /// Parse the protocol headers.
    #[must_use]
    pub fn from_headers(map: &HeaderMap) -> Self {
        let mut request = LaikaRequest::default();

        for (name, value) in map.iter() {
            let Ok(value) = value.to_str() else {
                continue;
            };
            let name = name.as_str();
            request.headers.insert(name.to_string(), value.to_string());

            if name == headers::LAIKA.as_str() {
                request.is_laika = is_flag_set(Some(value));
            } else if name == headers::TOKEN.as_str() {
                request.token = Some(value.to_string()).filter(|t| !t.is_empty());
            } else if name == headers::FORCE.as_str() {
                request.force = is_flag_set(Some(value));
            } else if name == headers::REQUIRE.as_str() {
                request.require = parse_list_header(Some(value));
            } else if name == headers::ONLY.as_str() {
                request.only = parse_list_header(Some(value));
            }
        }

        request
    }

    /// Whether the client asked for a subset of the tree.
    pub fn is_partial(&self) -> bool {
        self.is_laika && !self.only.is_empty()
    }
}

impl<S> FromRequestParts<S> for LaikaRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(LaikaRequest::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_from_headers() {
        let mut map = HeaderMap::new();
        map.insert("x-laika", HeaderValue::from_static("1"));
        map.insert("x-laika-token", HeaderValue::from_static("t1"));
        map.insert("x-laika-force", HeaderValue::from_static("1"));
        map.insert("x-laika-require", HeaderValue::from_static("shared, theme"));
        map.insert("x-laika-only", HeaderValue::from_static("shared.user.name"));

        let request = LaikaRequest::from_headers(&map);
        assert!(request.is_laika);
        assert!(request.force);
        assert!(request.is_partial());
        assert_eq!(request.token.as_deref(), Some("t1"));
        assert_eq!(request.require, vec!["shared", "theme"]);
        assert_eq!(request.only, vec!["shared.user.name"]);
        assert_eq!(request.headers["x-laika-token"], "t1");
    }

    #[test]
    fn test_plain_request() {
        let mut map = HeaderMap::new();
        map.insert("x-laika-only", HeaderValue::from_static("shared"));
        let request = LaikaRequest::from_headers(&map);
        assert!(!request.is_laika);
        assert!(!request.is_partial());
        assert!(request.token.is_none());
    }
}
