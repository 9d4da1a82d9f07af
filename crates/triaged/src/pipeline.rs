//! Ticket intake pipeline: classify + extract -> dedup -> draft -> route.
//!
//! One non-deterministic step (the chat client) orchestrated around
//! deterministic local steps. Any provider failure fails the whole
//! invocation; there are no partial results and no retries.

use crate::classify::classify_ticket;
use crate::dedupe::{build_signature, DuplicateRegistry};
use crate::draft::{propose_draft, DraftContext};
use crate::extract::extract_fields;
use crate::llm_client::ChatClient;
use crate::router::RoutingTable;
use std::sync::Arc;
use tracing::info;
use triage_common::{AnalyzeTicketResult, LlmError, ProcessTicketResult};

/// Pipeline-level failures surfaced to the host boundary.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("ticketText is required and cannot be empty")]
    EmptyTicket,

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// The ticket intake pipeline. Owns its collaborators behind seams so
/// tests can inject a fake chat client and a fresh registry.
#[derive(Clone)]
pub struct TicketPipeline {
    client: Arc<dyn ChatClient>,
    registry: Arc<DuplicateRegistry>,
    routing: Arc<RoutingTable>,
}

impl TicketPipeline {
    pub fn new(
        client: Arc<dyn ChatClient>,
        registry: Arc<DuplicateRegistry>,
        routing: Arc<RoutingTable>,
    ) -> Self {
        Self {
            client,
            registry,
            routing,
        }
    }

    pub fn client(&self) -> &dyn ChatClient {
        self.client.as_ref()
    }

    pub fn registry(&self) -> &DuplicateRegistry {
        self.registry.as_ref()
    }

    pub fn routing(&self) -> &RoutingTable {
        self.routing.as_ref()
    }

    /// Classification and field extraction in one round trip. The two
    /// calls are data-independent and run concurrently.
    pub async fn analyze(&self, raw_text: &str) -> Result<AnalyzeTicketResult, LlmError> {
        let (classification, extracted_fields) = tokio::try_join!(
            classify_ticket(self.client.as_ref(), raw_text),
            extract_fields(self.client.as_ref(), raw_text),
        )?;
        Ok(AnalyzeTicketResult {
            classification,
            extracted_fields,
        })
    }

    /// Run the full intake pipeline for one ticket.
    ///
    /// Order: reject empty input; classify + extract concurrently; build
    /// the signature and resolve it atomically against the registry; route
    /// (pure, cannot fail); draft. Classification and extraction feed the
    /// draft, so it serializes after them; routing and dedup do not depend
    /// on the draft and complete before it.
    ///
    /// Whitespace-only text is not rejected: every understanding step
    /// short-circuits to its default and the empty signature records
    /// nothing, so the result carries no ticket id.
    pub async fn process(&self, ticket_text: &str) -> Result<ProcessTicketResult, PipelineError> {
        if ticket_text.is_empty() {
            return Err(PipelineError::EmptyTicket);
        }

        let analysis = self.analyze(ticket_text).await?;

        let signature = build_signature(ticket_text);
        let deduplication = self.registry.resolve(&signature);
        let routing = self.routing.route(&analysis.classification);

        let draft = propose_draft(
            self.client.as_ref(),
            ticket_text,
            &DraftContext {
                classification: analysis.classification,
                extracted_fields: Some(analysis.extracted_fields.clone()),
            },
        )
        .await?;

        info!(
            category = %analysis.classification.category,
            severity = %analysis.classification.severity,
            team_id = %routing.team_id,
            duplicate = deduplication.is_possible_duplicate,
            "ticket processed"
        );

        Ok(ProcessTicketResult {
            classification: analysis.classification,
            extracted_fields: analysis.extracted_fields,
            draft,
            routing,
            deduplication,
        })
    }
}
