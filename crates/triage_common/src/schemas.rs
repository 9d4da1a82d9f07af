//! Wire schemas for the triage HTTP API.
//!
//! Field names are camelCase on the wire (`ticketText`, `teamId`, ...);
//! the Rust side stays snake_case via serde renames.

use crate::categories::{TicketCategory, TicketSeverity};
use serde::{Deserialize, Serialize};

/// Result of the classification step (category + severity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketClassification {
    pub category: TicketCategory,
    pub severity: TicketSeverity,
}

impl TicketClassification {
    /// The documented fallback classification: Other / Medium.
    pub fn fallback() -> Self {
        Self {
            category: TicketCategory::Other,
            severity: TicketSeverity::Medium,
        }
    }
}

/// Fields extracted from a ticket. Each is either a non-empty trimmed
/// string or absent; extraction never invents values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    /// Customer email if mentioned.
    pub customer_email: Option<String>,
    /// Customer or account ID if mentioned.
    pub customer_id: Option<String>,
    /// Order or transaction ID if mentioned.
    pub order_id: Option<String>,
    /// Product or feature name.
    pub product_or_feature: Option<String>,
    /// Short summary (1-2 sentences).
    pub summary: Option<String>,
    /// Affected component or error message (for technical tickets).
    pub affected_component_or_error: Option<String>,
}

impl ExtractedFields {
    /// True when no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.customer_email.is_none()
            && self.customer_id.is_none()
            && self.order_id.is_none()
            && self.product_or_feature.is_none()
            && self.summary.is_none()
            && self.affected_component_or_error.is_none()
    }
}

/// Result of the routing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingResult {
    pub team_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Deduplication outcome. Exactly one of `related_ticket_id` (duplicate
/// path) or `current_ticket_id` (new-ticket path) is populated; both are
/// absent only when the signature was empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeduplicationResult {
    pub is_possible_duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_ticket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_ticket_id: Option<String>,
}

/// Full pipeline result returned by POST /v1/tickets/process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTicketResult {
    pub classification: TicketClassification,
    pub extracted_fields: ExtractedFields,
    pub draft: String,
    pub routing: RoutingResult,
    pub deduplication: DeduplicationResult,
}

/// Classification + extraction bundle returned by POST /v1/tickets/analyze.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTicketResult {
    pub classification: TicketClassification,
    pub extracted_fields: ExtractedFields,
}

/// Request body for POST /v1/tickets/process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTicketRequest {
    pub ticket_text: String,
}

/// Request body for classify/extract/analyze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketTextRequest {
    pub text: String,
}

/// Request body for POST /v1/tickets/draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    pub text: String,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub extracted_fields: Option<ExtractedFields>,
}

/// Response body for POST /v1/tickets/draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftResponse {
    pub draft: String,
}

/// Request body for POST /v1/tickets/route. Values are plain strings so
/// unknown categories/severities can fall back instead of failing to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub category: Option<String>,
    pub severity: Option<String>,
}

/// Request body for POST /v1/tickets/assign. Human in the loop: records
/// the decision, never auto-sends the draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub draft: String,
    pub team_id: String,
    pub team_name: Option<String>,
    pub ticket_id: Option<String>,
}

/// Request body for POST /v1/tickets/feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub ticket_id: Option<String>,
    pub classification_correct: Option<bool>,
    pub draft_helpful: Option<bool>,
    pub comment: Option<String>,
}

impl FeedbackRequest {
    /// At least one of the three signals must be present.
    pub fn has_signal(&self) -> bool {
        self.classification_correct.is_some()
            || self.draft_helpful.is_some()
            || self
                .comment
                .as_deref()
                .map(|c| !c.trim().is_empty())
                .unwrap_or(false)
    }
}

/// Generic acknowledgement for assign/feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub ok: bool,
    pub message: String,
}

/// Error envelope for all non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_fields_wire_names_are_camel_case() {
        let fields = ExtractedFields {
            customer_email: Some("a@b.com".to_string()),
            order_id: Some("12345".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["customerEmail"], "a@b.com");
        assert_eq!(json["orderId"], "12345");
        assert!(json["productOrFeature"].is_null());
    }

    #[test]
    fn dedup_result_omits_absent_ids() {
        let dedup = DeduplicationResult {
            is_possible_duplicate: false,
            related_ticket_id: None,
            current_ticket_id: Some("TKT-X-1".to_string()),
        };
        let json = serde_json::to_value(&dedup).unwrap();
        assert_eq!(json["isPossibleDuplicate"], false);
        assert_eq!(json["currentTicketId"], "TKT-X-1");
        assert!(json.get("relatedTicketId").is_none());
    }

    #[test]
    fn feedback_signal_detection() {
        let empty = FeedbackRequest {
            ticket_id: None,
            classification_correct: None,
            draft_helpful: None,
            comment: Some("   ".to_string()),
        };
        assert!(!empty.has_signal());

        let with_flag = FeedbackRequest {
            classification_correct: Some(false),
            ..empty.clone()
        };
        assert!(with_flag.has_signal());
    }

    #[test]
    fn process_request_uses_ticket_text_key() {
        let req: ProcessTicketRequest =
            serde_json::from_str(r#"{"ticketText": "hello"}"#).unwrap();
        assert_eq!(req.ticket_text, "hello");
    }
}
