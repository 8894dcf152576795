mod agent;
mod core;
mod feedback;
mod llm;
mod logging;
mod moderation;
mod rag;
mod server;
mod state;
mod tools;

use std::env;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let state = AppState::initialize()?;
    logging::init(&state.paths);

    // Catalog ingestion is best-effort: the moderation pipeline must come up
    // even when the embedding capability or the data directory is missing.
    match rag::loader::load_catalog(&state.store, &state.paths.data_dir).await {
        Ok(count) => tracing::info!("Catalog loaded: {} chunks indexed", count),
        Err(err) => tracing::warn!("Catalog ingestion failed: {}", err),
    }

    let port = env::var("PORT")
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(4444);
    let bind_addr = format!("127.0.0.1:{}", port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    tracing::info!("Listening on {}", addr);

    let app: Router = server::router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
