//! HTTP client for communicating with triaged.

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use triage_common::{
    ErrorResponse, HealthResponse, ProcessTicketResult, RoutingResult, TicketClassification,
};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7870";

/// Client for the triaged HTTP API.
pub struct TriagedClient {
    base_url: String,
    http: reqwest::Client,
}

impl TriagedClient {
    /// Base URL from TRIAGED_URL, falling back to the default local bind.
    pub fn new() -> Self {
        let base_url = std::env::var("TRIAGED_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| connection_error(&self.base_url, e))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(anyhow!("{message}"));
        }
        Ok(response.json().await?)
    }

    /// Run the full intake pipeline for one ticket.
    pub async fn process(&self, ticket_text: &str) -> Result<ProcessTicketResult> {
        self.post("/v1/tickets/process", &json!({ "ticketText": ticket_text }))
            .await
    }

    /// Classify a ticket without the rest of the pipeline.
    pub async fn classify(&self, text: &str) -> Result<TicketClassification> {
        self.post("/v1/tickets/classify", &json!({ "text": text }))
            .await
    }

    /// Pure routing lookup for a category/severity pair.
    pub async fn route(&self, category: &str, severity: &str) -> Result<RoutingResult> {
        self.post(
            "/v1/tickets/route",
            &json!({ "category": category, "severity": severity }),
        )
        .await
    }

    /// Daemon health.
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/v1/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| connection_error(&self.base_url, e))?;
        Self::decode(response).await
    }
}

impl Default for TriagedClient {
    fn default() -> Self {
        Self::new()
    }
}

fn connection_error(base_url: &str, err: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "Cannot reach the triage daemon at {base_url}: {err}\n\n\
         Is triaged running? Start it with:\n\
         triaged\n\n\
         Or point TRIAGED_URL at the right address."
    )
}
