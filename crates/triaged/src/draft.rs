//! Reply drafting: one free-text LLM call seeded with the classification
//! and the populated extracted fields. The draft is a candidate for human
//! review, never auto-sent.

use crate::llm_client::{ChatClient, ChatOptions};
use triage_common::{ChatMessage, ExtractedFields, LlmError, TicketClassification};

const DRAFT_SYSTEM_PROMPT: &str = "\
You are a professional support agent. Write a SHORT reply: 1-2 paragraphs only, 3-5 sentences \
total. People skim, so keep it concise.

How to start:
- Do NOT start with \"Dear [name]\", \"Dear Customer\", or \"Hi [name]\". Forbidden.
- Start your first sentence with the specific issue from the ticket (e.g. \"We're looking into \
the duplicate charge for order #12345.\").

Content: in 3-5 sentences total, (1) acknowledge their issue with a concrete detail, (2) say \
we're looking into it or escalating, (3) say we'll get back to them, (4) brief sign-off \
(\"Thank you\" or \"Best regards\"). Do NOT promise refunds or specific timelines. Do not invent \
company or agent names. Output only the reply text.";

/// Reply used when the ticket text is empty; no provider call is made.
const EMPTY_TICKET_REPLY: &str = "Thank you for contacting support. Could you please provide \
more details about your issue so we can assist you?";

/// Generation cap for drafts; replies are longer than classification JSON.
const DRAFT_MAX_TOKENS: u32 = 2048;

/// Each context field is clipped to this many characters before it enters
/// the prompt, keeping the context block bounded.
const CONTEXT_FIELD_MAX_CHARS: usize = 200;

/// Classification and extraction results carried into the draft prompt.
#[derive(Debug, Clone)]
pub struct DraftContext {
    pub classification: TicketClassification,
    pub extracted_fields: Option<ExtractedFields>,
}

fn clip(value: &str) -> String {
    value.chars().take(CONTEXT_FIELD_MAX_CHARS).collect()
}

/// Renders the context block; only populated fields appear.
fn build_context_block(context: &DraftContext) -> String {
    let mut parts = vec![
        format!("Category: {}", context.classification.category),
        format!("Severity: {}", context.classification.severity),
    ];

    if let Some(fields) = &context.extracted_fields {
        let mut extracted = Vec::new();
        if let Some(summary) = &fields.summary {
            extracted.push(format!("Summary: {}", clip(summary)));
        }
        if let Some(order_id) = &fields.order_id {
            extracted.push(format!("Order/Reference: {}", clip(order_id)));
        }
        if let Some(email) = &fields.customer_email {
            extracted.push(format!("Customer email: {}", clip(email)));
        }
        if let Some(product) = &fields.product_or_feature {
            extracted.push(format!("Product/Feature: {}", clip(product)));
        }
        if let Some(component) = &fields.affected_component_or_error {
            extracted.push(format!("Technical detail: {}", clip(component)));
        }
        if !extracted.is_empty() {
            parts.push("Extracted context:".to_string());
            parts.extend(extracted);
        }
    }

    parts.join("\n")
}

/// Propose a reply draft for a ticket.
///
/// Empty input short-circuits to a generic "please provide more details"
/// reply without calling the provider. The returned text is trimmed.
pub async fn propose_draft(
    client: &dyn ChatClient,
    ticket_text: &str,
    context: &DraftContext,
) -> Result<String, LlmError> {
    let trimmed = ticket_text.trim();
    if trimmed.is_empty() {
        return Ok(EMPTY_TICKET_REPLY.to_string());
    }

    let context_block = build_context_block(context);
    let user_content = format!(
        "Ticket from customer:\n\n{trimmed}\n\n---\nContext (use in reply):\n{context_block}\n\n\
         Write a SHORT reply: 3-5 sentences total, 1-2 paragraphs. Do NOT start with \"Dear\" or \
         \"Hi [name]\". Start with the specific issue (e.g. duplicate charge, order #). Then: \
         we're looking into it, we'll get back to you, sign-off. Output only the reply text."
    );

    let messages = [
        ChatMessage::system(DRAFT_SYSTEM_PROMPT),
        ChatMessage::user(user_content),
    ];

    let draft = client
        .chat(
            &messages,
            ChatOptions::default().with_max_tokens(DRAFT_MAX_TOKENS),
        )
        .await?;

    Ok(draft.trim().to_string())
}
