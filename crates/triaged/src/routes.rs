//! API routes for triaged.
//!
//! Status mapping: input errors are 400, configuration errors 500,
//! provider failures 502. Success logs carry category/severity/team only,
//! never ticket content.

use crate::classify::classify_ticket;
use crate::draft::{propose_draft, DraftContext};
use crate::extract::extract_fields;
use crate::pipeline::PipelineError;
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info};
use triage_common::{
    AckResponse, AnalyzeTicketResult, AssignRequest, DraftRequest, DraftResponse, ErrorResponse,
    ExtractedFields, FeedbackRequest, HealthResponse, LlmError, ProcessTicketRequest,
    ProcessTicketResult, RouteRequest, RoutingResult, TicketCategory, TicketClassification,
    TicketSeverity, TicketTextRequest,
};

type AppStateArc = Arc<AppState>;
type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Provider failures map to 502, configuration problems to 500.
fn llm_error_response(err: LlmError) -> ApiError {
    let status = if err.is_configuration() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::BAD_GATEWAY
    };
    error!("  LLM step failed: {}", err);
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn pipeline_error_response(err: PipelineError) -> ApiError {
    match err {
        PipelineError::EmptyTicket => bad_request(err.to_string()),
        PipelineError::Llm(llm) => llm_error_response(llm),
    }
}

// ============================================================================
// Ticket Routes
// ============================================================================

pub fn ticket_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/tickets/process", post(process_ticket))
        .route("/v1/tickets/classify", post(classify))
        .route("/v1/tickets/extract", post(extract))
        .route("/v1/tickets/analyze", post(analyze))
        .route("/v1/tickets/draft", post(draft))
        .route("/v1/tickets/route", post(route_ticket))
        .route("/v1/tickets/assign", post(assign))
        .route("/v1/tickets/feedback", post(feedback))
}

/// Full pipeline: classify + extract, dedup, draft, route.
async fn process_ticket(
    State(state): State<AppStateArc>,
    Json(req): Json<ProcessTicketRequest>,
) -> Result<Json<ProcessTicketResult>, ApiError> {
    let result = state
        .pipeline
        .process(&req.ticket_text)
        .await
        .map_err(pipeline_error_response)?;
    Ok(Json(result))
}

async fn classify(
    State(state): State<AppStateArc>,
    Json(req): Json<TicketTextRequest>,
) -> Result<Json<TicketClassification>, ApiError> {
    require_text(&req.text)?;
    let classification = classify_ticket(state.pipeline.client(), &req.text)
        .await
        .map_err(llm_error_response)?;
    Ok(Json(classification))
}

async fn extract(
    State(state): State<AppStateArc>,
    Json(req): Json<TicketTextRequest>,
) -> Result<Json<ExtractedFields>, ApiError> {
    require_text(&req.text)?;
    let fields = extract_fields(state.pipeline.client(), &req.text)
        .await
        .map_err(llm_error_response)?;
    Ok(Json(fields))
}

async fn analyze(
    State(state): State<AppStateArc>,
    Json(req): Json<TicketTextRequest>,
) -> Result<Json<AnalyzeTicketResult>, ApiError> {
    require_text(&req.text)?;
    let analysis = state
        .pipeline
        .analyze(&req.text)
        .await
        .map_err(llm_error_response)?;
    Ok(Json(analysis))
}

async fn draft(
    State(state): State<AppStateArc>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<DraftResponse>, ApiError> {
    require_text(&req.text)?;

    let category = req.category.as_deref().and_then(TicketCategory::parse);
    let severity = req.severity.as_deref().and_then(TicketSeverity::parse);
    let (Some(category), Some(severity)) = (category, severity) else {
        return Err(bad_request(
            "Missing or invalid 'category' or 'severity'. Use values from \
             POST /v1/tickets/classify or /v1/tickets/analyze.",
        ));
    };

    let context = DraftContext {
        classification: TicketClassification { category, severity },
        extracted_fields: req.extracted_fields,
    };
    let draft = propose_draft(state.pipeline.client(), &req.text, &context)
        .await
        .map_err(llm_error_response)?;
    Ok(Json(DraftResponse { draft }))
}

/// Pure routing lookup. Invalid values fall back to Other/Medium rather
/// than failing, so the endpoint is usable with hand-typed input.
async fn route_ticket(
    State(state): State<AppStateArc>,
    Json(req): Json<RouteRequest>,
) -> Json<RoutingResult> {
    let category = req
        .category
        .as_deref()
        .and_then(TicketCategory::parse)
        .unwrap_or_default();
    let severity = req
        .severity
        .as_deref()
        .and_then(TicketSeverity::parse)
        .unwrap_or_default();

    let routing = state
        .pipeline
        .routing()
        .route(&TicketClassification { category, severity });

    info!(
        "  Routed {} / {} -> {}",
        category, severity, routing.team_id
    );
    Json(routing)
}

/// Records assignment of a ticket to a team with the (possibly edited)
/// draft. Human in the loop: no auto-send, this just records the decision.
async fn assign(Json(req): Json<AssignRequest>) -> Result<Json<AckResponse>, ApiError> {
    if req.draft.trim().is_empty() || req.team_id.trim().is_empty() {
        return Err(bad_request("Missing 'draft' or 'teamId' in request body."));
    }

    info!(
        team_id = %req.team_id,
        team_name = req.team_name.as_deref().unwrap_or("-"),
        ticket_id = req.ticket_id.as_deref().unwrap_or("-"),
        draft_chars = req.draft.len(),
        "assignment recorded"
    );

    Ok(Json(AckResponse {
        ok: true,
        message: "Assignment recorded.".to_string(),
    }))
}

/// Records reviewer feedback on classification and/or draft quality.
async fn feedback(Json(req): Json<FeedbackRequest>) -> Result<Json<AckResponse>, ApiError> {
    if !req.has_signal() {
        return Err(bad_request(
            "Provide at least one of: classificationCorrect, draftHelpful, comment.",
        ));
    }

    let comment_preview: String = req
        .comment
        .as_deref()
        .unwrap_or("")
        .chars()
        .take(200)
        .collect();
    info!(
        ticket_id = req.ticket_id.as_deref().unwrap_or("-"),
        classification_correct = ?req.classification_correct,
        draft_helpful = ?req.draft_helpful,
        comment = %comment_preview,
        "feedback recorded"
    );

    Ok(Json(AckResponse {
        ok: true,
        message: "Thank you for your feedback.".to_string(),
    }))
}

fn require_text(text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(bad_request("Missing or empty 'text' in request body."));
    }
    Ok(())
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
