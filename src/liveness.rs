use axum::{Json, Router, routing::get};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Liveness probe. Always healthy once the process is up; runs as its own
/// task and never touches scan state.
pub async fn serve(bind_addr: &str) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/healthz", get(healthz_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    info!("starting liveness endpoint on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", bind_addr, e))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Liveness server error: {}", e))?;

    Ok(())
}

async fn healthz_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
