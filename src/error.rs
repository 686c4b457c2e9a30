//! Error types for the Laika client.
//!
//! The variants follow the protocol's failure taxonomy:
//!
//! | Variant | Raised by | Recovery |
//! |---------|-----------|----------|
//! | [`LaikaError::ProtocolRedirect`] | `409` + `X-Laika-Location` | hard navigation to the location |
//! | [`LaikaError::ProtocolRejected`] | any other non-2xx | hard navigation to the requested URL |
//! | [`LaikaError::Transport`] / [`LaikaError::Decode`] | network or body errors | reported to the caller, state untouched |
//! | [`LaikaError::Resolution`] | component resolver callback | logged, previous view retained |
//! | [`LaikaError::RuntimeNotReady`] | API used before boot | none, fails fast |

use thiserror::Error;

/// Result type for Laika operations.
pub type Result<T> = std::result::Result<T, LaikaError>;

/// Errors produced by the Laika client, store and view layers.
#[derive(Debug, Error)]
pub enum LaikaError {
    /// Server answered `409` with a hard-redirect target.
    #[error("Laika redirect to {location}")]
    ProtocolRedirect {
        /// Value of the `X-Laika-Location` header
        location: String,
    },

    /// Server answered with a non-2xx status that is not a protocol redirect.
    #[error("Laika request rejected with status {status}")]
    ProtocolRejected {
        /// HTTP status code
        status: u16,
    },

    /// The transport failed before a response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not a valid JSON payload.
    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The component resolver callback failed.
    #[error("Failed to resolve component '{name}': {source}")]
    Resolution {
        /// Component name that was requested
        name: String,
        /// Error returned by the resolver
        #[source]
        source: anyhow::Error,
    },

    /// An API was used before the application finished booting.
    #[error("Laika runtime not ready: {0}")]
    RuntimeNotReady(&'static str),

    /// A dot-path could not be parsed.
    #[error("Invalid dot-path: {0}")]
    InvalidPath(String),

    /// A request header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A navigation target could not be turned into an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The embedded initial payload is missing or malformed.
    #[error("Invalid payload: {0}")]
    Payload(String),
}

impl LaikaError {
    /// Whether this error came from the network layer (transport or body decoding).
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, LaikaError::Transport(_) | LaikaError::Decode(_))
    }

    /// Whether the error can only be recovered by leaving the single-page app.
    pub fn requires_hard_navigation(&self) -> bool {
        matches!(
            self,
            LaikaError::ProtocolRedirect { .. } | LaikaError::ProtocolRejected { .. }
        )
    }
}

impl From<reqwest::Error> for LaikaError {
    fn from(err: reqwest::Error) -> Self {
        LaikaError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let redirect = LaikaError::ProtocolRedirect {
            location: "/login".into(),
        };
        assert!(redirect.requires_hard_navigation());
        assert!(!redirect.is_transport_failure());

        let transport = LaikaError::Transport("connection reset".into());
        assert!(transport.is_transport_failure());
        assert!(!transport.requires_hard_navigation());
    }

    #[test]
    fn test_display() {
        let err = LaikaError::ProtocolRejected { status: 500 };
        assert_eq!(err.to_string(), "Laika request rejected with status 500");

        let err = LaikaError::RuntimeNotReady("payload not installed");
        assert_eq!(err.to_string(), "Laika runtime not ready: payload not installed");
    }
}
