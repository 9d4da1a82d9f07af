//! Golden tests for the full ticket intake pipeline.
//!
//! Drives TicketPipeline end-to-end with a fake chat client: no network,
//! deterministic responses. The fake consumes one queued response per LLM
//! call in pipeline order (classify, extract, draft).

use std::sync::Arc;
use triaged::dedupe::DuplicateRegistry;
use triaged::llm_client::FakeChatClient;
use triaged::pipeline::{PipelineError, TicketPipeline};
use triaged::router::RoutingTable;
use triage_common::{LlmError, TicketCategory, TicketSeverity};

const BILLING_TICKET: &str = "I was charged twice for order #12345 on March 1st. \
    Please refund the duplicate charge. Contact me at john@example.com.";

const CLASSIFY_BILLING_HIGH: &str = r#"{"category": "Billing", "severity": "High"}"#;

const EXTRACT_BILLING: &str = r##"{
    "customerEmail": "john@example.com",
    "customerId": null,
    "orderId": "#12345",
    "productOrFeature": null,
    "summary": "Charged twice for order #12345; requesting refund of the duplicate charge.",
    "affectedComponentOrError": null
}"##;

const DRAFT_REPLY: &str =
    "We're looking into the duplicate charge for order #12345. We'll get back to you \
     as soon as we know more. Thank you.";

fn pipeline_with(responses: Vec<Result<String, LlmError>>) -> (TicketPipeline, Arc<FakeChatClient>) {
    let client = Arc::new(FakeChatClient::new(responses));
    let pipeline = TicketPipeline::new(
        client.clone(),
        Arc::new(DuplicateRegistry::new()),
        Arc::new(RoutingTable::new()),
    );
    (pipeline, client)
}

fn billing_round() -> Vec<Result<String, LlmError>> {
    vec![
        Ok(CLASSIFY_BILLING_HIGH.to_string()),
        Ok(EXTRACT_BILLING.to_string()),
        Ok(DRAFT_REPLY.to_string()),
    ]
}

#[tokio::test]
async fn end_to_end_billing_scenario() {
    let mut responses = billing_round();
    responses.extend(billing_round());
    let (pipeline, client) = pipeline_with(responses);

    let first = pipeline.process(BILLING_TICKET).await.unwrap();

    assert_eq!(first.classification.category, TicketCategory::Billing);
    assert_eq!(first.classification.severity, TicketSeverity::High);
    assert!(first
        .extracted_fields
        .order_id
        .as_deref()
        .unwrap()
        .contains("12345"));
    assert_eq!(
        first.extracted_fields.customer_email.as_deref(),
        Some("john@example.com")
    );
    assert_eq!(first.routing.team_id, "billing");
    assert_eq!(first.draft, DRAFT_REPLY);

    assert!(!first.deduplication.is_possible_duplicate);
    let first_id = first
        .deduplication
        .current_ticket_id
        .clone()
        .expect("new ticket gets an id");
    assert!(first_id.starts_with("TKT-"));
    assert_eq!(first.deduplication.related_ticket_id, None);

    // Identical text again: flagged as duplicate of the first ticket.
    let second = pipeline.process(BILLING_TICKET).await.unwrap();
    assert!(second.deduplication.is_possible_duplicate);
    assert_eq!(second.deduplication.related_ticket_id, Some(first_id));
    assert_eq!(second.deduplication.current_ticket_id, None);

    // Three provider calls per invocation, nothing more.
    assert_eq!(client.call_count(), 6);
}

#[tokio::test]
async fn whitespace_and_case_variants_are_duplicates() {
    let mut responses = billing_round();
    responses.extend(billing_round());
    let (pipeline, _client) = pipeline_with(responses);

    let first = pipeline
        .process("Hello   World,\nmy order is late.")
        .await
        .unwrap();
    let second = pipeline
        .process("hello world, my order is late.")
        .await
        .unwrap();

    assert!(second.deduplication.is_possible_duplicate);
    assert_eq!(
        second.deduplication.related_ticket_id,
        first.deduplication.current_ticket_id
    );
}

#[tokio::test]
async fn empty_ticket_is_rejected_before_any_provider_call() {
    let (pipeline, client) = pipeline_with(billing_round());

    let err = pipeline.process("").await.unwrap_err();
    assert!(matches!(err, PipelineError::EmptyTicket));
    assert_eq!(client.call_count(), 0);
    assert!(pipeline.registry().is_empty());
}

#[tokio::test]
async fn whitespace_only_ticket_short_circuits_every_step() {
    let (pipeline, client) = pipeline_with(billing_round());

    let result = pipeline.process("   \n\t  ").await.unwrap();

    // No provider calls: classify, extract, and draft all short-circuit.
    assert_eq!(client.call_count(), 0);
    assert_eq!(result.classification.category, TicketCategory::Other);
    assert_eq!(result.classification.severity, TicketSeverity::Medium);
    assert!(result.extracted_fields.is_empty());
    assert!(result.draft.contains("provide more details"));

    // Empty signature: nothing recorded, no ticket id either way.
    assert!(!result.deduplication.is_possible_duplicate);
    assert_eq!(result.deduplication.related_ticket_id, None);
    assert_eq!(result.deduplication.current_ticket_id, None);
    assert!(pipeline.registry().is_empty());
}

#[tokio::test]
async fn provider_failure_fails_the_whole_invocation() {
    let (pipeline, _client) = pipeline_with(vec![Err(LlmError::RateLimited)]);

    let err = pipeline.process(BILLING_TICKET).await.unwrap_err();
    assert!(matches!(err, PipelineError::Llm(LlmError::RateLimited)));

    // Analysis failed before the dedup step, so nothing was recorded.
    assert!(pipeline.registry().is_empty());
}

#[tokio::test]
async fn draft_timeout_fails_the_invocation_after_dedup_recorded() {
    let (pipeline, _client) = pipeline_with(vec![
        Ok(CLASSIFY_BILLING_HIGH.to_string()),
        Ok(EXTRACT_BILLING.to_string()),
        Err(LlmError::Timeout(30)),
    ]);

    let err = pipeline.process(BILLING_TICKET).await.unwrap_err();
    assert!(matches!(err, PipelineError::Llm(LlmError::Timeout(30))));

    // Dedup resolves before the draft call, so the ticket is recorded
    // even though the invocation failed. Same ordering as the original
    // pipeline: no partial result is returned either way.
    assert_eq!(pipeline.registry().len(), 1);
}

#[tokio::test]
async fn invalid_classification_content_falls_back_and_routes_to_default() {
    let (pipeline, _client) = pipeline_with(vec![
        Ok(r#"{"category": "Spam", "severity": "Whatever"}"#.to_string()),
        Ok(r#"{}"#.to_string()),
        Ok("Thanks for reaching out; we're looking into your request.".to_string()),
    ]);

    let result = pipeline.process("hello, something odd happened").await.unwrap();
    assert_eq!(result.classification.category, TicketCategory::Other);
    assert_eq!(result.classification.severity, TicketSeverity::Medium);
    assert_eq!(result.routing.team_id, "support");
    assert!(result.extracted_fields.is_empty());
}

#[tokio::test]
async fn malformed_json_from_provider_is_an_error() {
    let (pipeline, _client) = pipeline_with(vec![Ok("not json at all".to_string())]);

    let err = pipeline.process(BILLING_TICKET).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Llm(LlmError::InvalidJson(_))
    ));
}

#[tokio::test]
async fn analyze_runs_both_understanding_calls() {
    let (pipeline, client) = pipeline_with(vec![
        Ok(CLASSIFY_BILLING_HIGH.to_string()),
        Ok(EXTRACT_BILLING.to_string()),
    ]);

    let analysis = pipeline.analyze(BILLING_TICKET).await.unwrap();
    assert_eq!(analysis.classification.category, TicketCategory::Billing);
    assert_eq!(
        analysis.extracted_fields.customer_email.as_deref(),
        Some("john@example.com")
    );
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn distinct_tickets_get_distinct_ids() {
    let mut responses = billing_round();
    responses.extend(billing_round());
    let (pipeline, _client) = pipeline_with(responses);

    let a = pipeline.process("Ticket A: login broken").await.unwrap();
    let b = pipeline.process("Ticket B: billing question").await.unwrap();

    let id_a = a.deduplication.current_ticket_id.unwrap();
    let id_b = b.deduplication.current_ticket_id.unwrap();
    assert_ne!(id_a, id_b);
    assert_eq!(pipeline.registry().len(), 2);
}
