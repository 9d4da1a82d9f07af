//! Ticket classification: one JSON-mode LLM call mapped onto the closed
//! category/severity enumerations.
//!
//! Invalid or missing values inside a well-formed reply fall back to
//! Other/Medium; a malformed reply or provider failure is an error.

use crate::llm_client::{ChatClient, ChatOptions};
use once_cell::sync::Lazy;
use tracing::warn;
use triage_common::{
    ChatMessage, LlmError, TicketCategory, TicketClassification, TicketSeverity,
};

static CLASSIFY_SYSTEM_PROMPT: Lazy<String> = Lazy::new(|| {
    let categories = TicketCategory::names_joined();
    let severities = TicketSeverity::names_joined();
    let criteria = TicketSeverity::ALL
        .iter()
        .map(|s| format!("{} = {}", s.name(), s.criterion()))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "You are a support ticket classifier. Given a support ticket, respond with exactly one \
         JSON object in this form, with no other text:\n\
         {{\"category\": \"<one of: {categories}>\", \"severity\": \"<one of: {severities}>\"}}\n\n\
         Rules:\n\
         - category: must be exactly one of: {categories}.\n\
         - severity: must be exactly one of: {severities}.\n\
         - Use \"Other\" only when the ticket does not fit any other category.\n\
         - Severity: {criteria}"
    )
});

/// Classify a ticket into category and severity.
///
/// Empty input short-circuits to the fallback classification without
/// calling the provider.
pub async fn classify_ticket(
    client: &dyn ChatClient,
    raw_text: &str,
) -> Result<TicketClassification, LlmError> {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        return Ok(TicketClassification::fallback());
    }

    let messages = [
        ChatMessage::system(CLASSIFY_SYSTEM_PROMPT.as_str()),
        ChatMessage::user(format!("Classify this support ticket:\n\n{trimmed}")),
    ];

    let value = client.chat_json(&messages, ChatOptions::json()).await?;

    let category = match value.get("category").and_then(|v| v.as_str()) {
        Some(raw) => TicketCategory::parse(raw).unwrap_or_else(|| {
            warn!("classifier returned unknown category '{}', using Other", raw);
            TicketCategory::Other
        }),
        None => TicketCategory::Other,
    };

    let severity = match value.get("severity").and_then(|v| v.as_str()) {
        Some(raw) => TicketSeverity::parse(raw).unwrap_or_else(|| {
            warn!("classifier returned unknown severity '{}', using Medium", raw);
            TicketSeverity::Medium
        }),
        None => TicketSeverity::Medium,
    };

    Ok(TicketClassification { category, severity })
}
