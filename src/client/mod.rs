//! Laika client: the navigation lifecycle and its collaborators.
//!
//! The client turns a visit into a protocol request, dispatches it through a
//! [`Transport`], and applies the outcome:
//!
//! - **2xx** responses update the [`PayloadStore`](crate::store::PayloadStore),
//!   either replacing the tree or merging the branches named in
//!   `X-Laika-Only`
//! - **409** responses with `X-Laika-Location` leave the app through
//!   [`History::assign`]
//! - **other non-2xx** responses leave the app by hard-navigating to the
//!   requested URL
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── router    - Router, the navigation state machine
//! ├── transport - Transport trait and the reqwest implementation
//! ├── history   - History trait and MemoryHistory
//! ├── hooks     - RouterHooks lifecycle callbacks
//! └── config    - Client configuration
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Router`] | Issues visits and applies their outcomes |
//! | [`Visit`] | How a visit ended |
//! | [`Transport`] | Network seam |
//! | [`History`] | Browser history seam |
//! | [`RouterHooks`] | `on_before` / `on_success` / `on_failure` callbacks |
//! | [`ClientConfig`] | Client configuration options |
//!
//! # Examples
//!
//! ```
//! use laika_http::client::{ClientConfig, ReqwestTransport};
//!
//! let config = ClientConfig {
//!     base_url: "https://example.com".into(),
//!     request_timeout_ms: 5_000,
//!     ..Default::default()
//! };
//! let transport = ReqwestTransport::with_config(config);
//! assert_eq!(transport.config().request_timeout_ms, 5_000);
//! ```

mod config;
mod history;
mod hooks;
mod router;
mod transport;

pub use config::{ClientConfig, ProgressConfig};
pub use history::{History, MemoryHistory};
pub use hooks::RouterHooks;
pub use router::{NavigationState, Router, Visit, WeakRouter};
pub use transport::{ReqwestTransport, Transport};
