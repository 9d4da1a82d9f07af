//! HTTP server for triaged

use crate::pipeline::TicketPipeline;
use crate::routes;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub pipeline: TicketPipeline,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(pipeline: TicketPipeline) -> Self {
        Self {
            pipeline,
            start_time: Instant::now(),
        }
    }
}

/// Run the HTTP server
pub async fn run(state: AppState, bind: &str) -> Result<()> {
    let state = Arc::new(state);

    let app = Router::new()
        .merge(routes::ticket_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("  Listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}
