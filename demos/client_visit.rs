//! Laika client example
//!
//! Boots from the server-rendered page of the `server_basic` example, then
//! navigates, reloads one shared field and follows a protocol redirect.
//!
//! Run `cargo run --example server_basic` first, then:
//! cargo run --example client_visit

use laika_http::client::ClientConfig;
use laika_http::view::ComponentDefinition;
use laika_http::{LaikaApp, Visit, VisitOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let base_url = "http://127.0.0.1:3000";
    let html = reqwest::get(base_url).await?.text().await?;

    let app = LaikaApp::builder()
        .config(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
        .html(html)
        .resolver(|name: String| async move {
            tracing::info!("resolving {}", name);
            Ok::<_, anyhow::Error>(ComponentDefinition::new(name))
        })
        .title(|title| format!("{} | Laika demo", title))
        .build()
        .await?;

    let mut changes = app.store().subscribe();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            tracing::info!("store revision {}", *changes.borrow());
        }
    });

    println!("Initial page: {}", app.store().page()?.component);

    let visit = app.router().visit("/blog", VisitOptions::new()).await?;
    println!("Visit /blog: {:?}", visit);
    println!("{}", serde_json::to_string_pretty(&app.render().as_deref())?);

    let visit = app
        .router()
        .visit(
            "/blog",
            VisitOptions::new().with_only(["shared.visits"]).preserve_state(),
        )
        .await?;
    println!("Partial reload: {:?}", visit);
    println!("Shared data: {}", serde_json::Value::Object(app.store().shared()?));

    if let Visit::Redirected { location } = app.router().visit("/account", VisitOptions::new()).await? {
        println!("Server sent us to {}", location);
    }

    Ok(())
}
