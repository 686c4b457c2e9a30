#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Laika: server-driven navigation for single-page apps
//!
//! The server owns routing and data. It answers every navigation with a JSON
//! "payload" describing the page to show; the client keeps the latest payload
//! as its state tree, resolves the named page component, wraps it in its
//! layouts and hands the result to a renderer.
//!
//! ## Protocol
//!
//! - Requests carry `X-Laika: 1`, the echoed `X-Laika-Token`, and optionally
//!   `X-Laika-Force`, `X-Laika-Require` and `X-Laika-Only`
//! - **2xx**: JSON body; with `X-Laika-Only` the body holds only the named
//!   branches and is merged into the current tree
//! - **409** + `X-Laika-Location`: leave the app via full navigation
//! - **other non-2xx**: full navigation to the requested URL
//!
//! ## Client Usage
//!
//! ```ignore
//! use laika_http::{LaikaApp, VisitOptions};
//! use laika_http::view::ComponentDefinition;
//!
//! #[tokio::main]
//! async fn main() -> laika_http::Result<()> {
//!     let app = LaikaApp::builder()
//!         .html(std::fs::read_to_string("index.html").unwrap())
//!         .resolver(|name: String| async move {
//!             Ok::<_, anyhow::Error>(ComponentDefinition::new(name))
//!         })
//!         .build()
//!         .await?;
//!
//!     // Partial reload of one shared field
//!     app.router()
//!         .visit("/", VisitOptions::new().with_only(["shared.user"]).preserve_state())
//!         .await?;
//!
//!     println!("{:?}", app.store().shared()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Server Usage
//!
//! ```ignore
//! use axum::{routing::get, Router};
//! use laika_http::server::{LaikaRequest, LaikaResponse};
//! use serde_json::json;
//!
//! async fn home(laika: LaikaRequest) -> LaikaResponse {
//!     LaikaResponse::for_request(&laika, json!({
//!         "page": { "component": "Home", "title": "Home" },
//!         "shared": { "user": { "name": "Ada" } }
//!     }))
//! }
//!
//! let app: Router = Router::new().route("/", get(home));
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - State tree, visit options, responses
//! - **[error]** - Error types and result handling
//! - **[protocol]** - Header constants, request encoding, response decoding
//! - **[merge]** - Dot-paths and partial payload merging
//! - **[client]** - Router, transport, history and hooks
//! - **[store]** - The live state tree and component handles
//! - **[view]** - Component resolution and layout composition
//! - **[progress]** - Navigation progress indicator
//! - **[app]** - Application context
//! - **[server]** - Axum extractor and response builder

pub mod app;
pub mod client;
pub mod error;
pub mod merge;
pub mod progress;
pub mod protocol;
pub mod server;
pub mod store;
pub mod types;
pub mod view;

pub use app::{LaikaApp, LaikaAppBuilder};
pub use client::{ClientConfig, Router, Visit};
pub use error::{LaikaError, Result};
pub use merge::DotPath;
pub use store::PayloadStore;
pub use types::{PageObject, StateTree, VisitOptions};

#[cfg(test)]
mod testing;
