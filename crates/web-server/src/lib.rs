//! # Poolshare Web Server
//!
//! A small JSON API over the allocation engine, serving the browser
//! dashboard. The snapshot is loaded once at startup into shared state;
//! every request is a pure read, so handlers need no coordination.

use allocation::AllocationEngine;
use axum::{Router, routing::get};
use core_types::Snapshot;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub snapshot: Snapshot,
    pub engine: AllocationEngine,
}

/// The main function to configure and run the web server.
///
/// Loads the snapshot file, then serves it read-only until shutdown. A new
/// snapshot export requires a restart; there is deliberately no reload
/// endpoint.
pub async fn run_server(addr: SocketAddr, snapshot_path: &Path) -> anyhow::Result<()> {
    // Note: Tracing is already initialized in main.rs, so we don't need to
    // initialize it again here.
    let snapshot = snapshot_store::load_snapshot(snapshot_path)?;
    let app_state = Arc::new(AppState {
        snapshot,
        engine: AllocationEngine::new(),
    });

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/breakdown/operator", get(handlers::get_operator_breakdown))
        .route(
            "/api/breakdown/investors/:name",
            get(handlers::get_investor_breakdown),
        )
        .with_state(app_state)
        .layer(cors)
        // This middleware will automatically log information about every
        // incoming request.
        .layer(TraceLayer::new_for_http());

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
