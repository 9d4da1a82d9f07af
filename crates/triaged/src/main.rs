//! Triage Daemon - support ticket intake service
//!
//! Classifies, extracts, deduplicates, drafts, and routes incoming
//! support tickets over a localhost HTTP API.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use triaged::dedupe::DuplicateRegistry;
use triaged::llm_client::HttpChatClient;
use triaged::pipeline::TicketPipeline;
use triaged::router::RoutingTable;
use triaged::server::{self, AppState};
use triage_common::TriageConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Triage Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = TriageConfig::load()?;
    if config.llm.api_key.is_none() {
        // Not fatal: routing and health work without a credential; LLM
        // endpoints will fail with a configuration error until it is set.
        tracing::warn!("no LLM API key configured (set LLM_API_KEY)");
    }

    let client = Arc::new(HttpChatClient::new(config.llm.clone())?);
    let registry = Arc::new(DuplicateRegistry::new());
    let routing = Arc::new(RoutingTable::new());
    let pipeline = TicketPipeline::new(client, registry, routing);

    let state = AppState::new(pipeline);
    server::run(state, &config.server.bind).await
}
