//! Response types.

use bytes::Bytes;
use serde_json::Value;
use std::collections::BTreeMap;

/// A response as delivered by a [`Transport`](crate::client::Transport).
///
/// Header names are normalized to lowercase.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lowercase names)
    pub headers: BTreeMap<String, String>,
    /// Response body
    pub body: Bytes,
}

impl RawResponse {
    /// Create a response with the given status and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        RawResponse {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Add a header. The name is stored lowercase.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Look up a header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether the status is 2xx.
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// A successful page response.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    /// Decoded JSON body, a full tree or only the changed branches
    pub body: Value,
    /// Changed paths; empty means full replace
    pub only: Vec<String>,
}

impl PageResponse {
    /// Whether this response carries a partial patch.
    pub fn is_partial(&self) -> bool {
        !self.only.is_empty()
    }
}

/// Decoded outcome of a navigation response.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `409` with a location: leave the app via hard navigation
    Redirect(String),
    /// Any other non-2xx status
    Rejected(u16),
    /// 2xx with a payload
    Success(PageResponse),
}
