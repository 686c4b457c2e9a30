//! Axum helpers for serving Laika clients.
//!
//! - [`LaikaRequest`] extracts the protocol headers of an incoming request
//! - [`LaikaResponse`] answers with a full tree, a partial tree, or a hard
//!   redirect
//!
//! # Example
//!
//! ```ignore
//! use axum::{routing::get, Router};
//! use laika_http::server::{LaikaRequest, LaikaResponse};
//! use serde_json::json;
//!
//! async fn account(laika: LaikaRequest) -> LaikaResponse {
//!     if laika.token.is_none() {
//!         return LaikaResponse::redirect_for(&laika, "/login");
//!     }
//!     LaikaResponse::for_request(&laika, json!({ "page": { "component": "Account" } }))
//! }
//!
//! let app: Router = Router::new().route("/account", get(account));
//! ```

mod extract;
mod response;

pub use extract::LaikaRequest;
pub use response::LaikaResponse;
