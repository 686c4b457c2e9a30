//! Network transport for Laika requests.
//!
//! The router talks to the network through the [`Transport`] trait so that
//! applications can plug in their own HTTP stack. [`ReqwestTransport`] is the
//! default.
//!
//! # Examples
//!
//! ```ignore
//! use laika_http::client::{ReqwestTransport, Transport};
//! use laika_http::protocol::encode_request;
//! use laika_http::VisitOptions;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = ReqwestTransport::new();
//!     let url = url::Url::parse("http://localhost:3000/blog")?;
//!     let request = encode_request(url, &VisitOptions::new(), None)?;
//!     let response = transport.send(request).await?;
//!     println!("Status: {}", response.status);
//!     Ok(())
//! }
//! ```

use crate::client::config::ClientConfig;
use crate::error::{LaikaError, Result};
use crate::protocol::EncodedRequest;
use crate::types::RawResponse;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Sends encoded requests and returns raw responses.
///
/// Implementations report network failures as [`LaikaError::Transport`];
/// HTTP error statuses are *responses*, not errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request.
    async fn send(&self, request: EncodedRequest) -> Result<RawResponse>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl ReqwestTransport {
    /// Create a transport with default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a transport with custom configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .unwrap_or_default();

        ReqwestTransport {
            client,
            config: Arc::new(config),
        }
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: EncodedRequest) -> Result<RawResponse> {
        let method = request.method.clone();
        let url = request.url.clone();

        let mut req_builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = match req_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                if self.config.enable_logging {
                    tracing::warn!("{} {} failed: {}", method, url, e);
                }
                return Err(LaikaError::Transport(e.to_string()));
            }
        };

        let status = response.status().as_u16();

        let mut headers = BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_string(), val.to_string());
            }
        }

        let body = response.bytes().await?;

        tracing::debug!("{} {} -> {}", method, url, status);

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
