//! Basic Laika server example
//!
//! Serves an HTML shell with the embedded payload to browsers and JSON
//! payloads to Laika clients.
//!
//! Run with: cargo run --example server_basic

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::{get, Router},
};
use laika_http::server::{LaikaRequest, LaikaResponse};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Default)]
struct AppState {
    visits: Arc<AtomicU64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = Router::new()
        .route("/", get(home))
        .route("/blog", get(blog))
        .route("/account", get(account))
        .with_state(AppState::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn shared(state: &AppState) -> Value {
    json!({
        "user": { "name": "Ada", "age": 36 },
        "visits": state.visits.fetch_add(1, Ordering::SeqCst) + 1
    })
}

/// Browsers get the HTML shell, Laika clients the JSON tree.
fn respond(laika: &LaikaRequest, tree: Value) -> Response {
    if laika.is_laika {
        return LaikaResponse::for_request(laika, tree).into_response();
    }
    let title = tree["page"]["title"].as_str().unwrap_or_default().to_string();
    Html(format!(
        "<!doctype html><html><head><title>{}</title>\
         <script type=\"application/json\" data-laika=\"payload\">{}</script>\
         </head><body><div class=\"app\"></div></body></html>",
        title, tree
    ))
    .into_response()
}

async fn home(State(state): State<AppState>, laika: LaikaRequest) -> Response {
    tracing::info!(only = ?laika.only, "GET /");
    let tree = json!({
        "version": "1",
        "token": "demo-token",
        "page": { "component": "Home", "title": "Home", "url": "/", "props": { "greeting": "Hello" } },
        "shared": shared(&state)
    });
    respond(&laika, tree)
}

async fn blog(State(state): State<AppState>, laika: LaikaRequest) -> Response {
    tracing::info!(only = ?laika.only, "GET /blog");
    let tree = json!({
        "version": "1",
        "token": "demo-token",
        "page": {
            "component": "Blog",
            "title": "Blog",
            "url": "/blog",
            "layout": ["Main", "Sidebar"],
            "props": { "posts": ["First post", "Second post"] }
        },
        "shared": shared(&state)
    });
    respond(&laika, tree)
}

async fn account(laika: LaikaRequest) -> LaikaResponse {
    tracing::info!(token = ?laika.token, "GET /account, redirecting to /login");
    LaikaResponse::redirect_for(&laika, "/login")
}
