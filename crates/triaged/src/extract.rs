//! Structured field extraction: one JSON-mode LLM call producing six
//! optional fields. Each field independently defaults to absent when the
//! reply lacks it, gives a non-string, or gives a blank string.

use crate::llm_client::{ChatClient, ChatOptions};
use serde_json::Value;
use triage_common::{ChatMessage, ExtractedFields, LlmError};

const EXTRACT_SYSTEM_PROMPT: &str = "\
You are a support ticket parser. Extract the following fields from the ticket. Respond with \
exactly one JSON object using these keys only. Use null for any field not mentioned or not found.

Required keys (all must be present; use null if not in the ticket):
- customerEmail: string or null - customer's email address if mentioned
- customerId: string or null - customer ID, account ID, or user ID if mentioned
- orderId: string or null - order number, transaction ID, or reference if mentioned
- productOrFeature: string or null - product name, plan name, or feature if mentioned
- summary: string or null - one or two sentence summary of the issue
- affectedComponentOrError: string or null - for technical issues: component, service, or error \
message; otherwise null

Output only valid JSON, no other text.";

/// Non-empty trimmed string, or absent. Non-strings are absent too.
fn to_trimmed_opt(value: Option<&Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Extract structured fields from a ticket.
///
/// Empty input short-circuits to all-absent without calling the provider.
pub async fn extract_fields(
    client: &dyn ChatClient,
    raw_text: &str,
) -> Result<ExtractedFields, LlmError> {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        return Ok(ExtractedFields::default());
    }

    let messages = [
        ChatMessage::system(EXTRACT_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Extract fields from this support ticket:\n\n{trimmed}"
        )),
    ];

    let value = client.chat_json(&messages, ChatOptions::json()).await?;

    Ok(ExtractedFields {
        customer_email: to_trimmed_opt(value.get("customerEmail")),
        customer_id: to_trimmed_opt(value.get("customerId")),
        order_id: to_trimmed_opt(value.get("orderId")),
        product_or_feature: to_trimmed_opt(value.get("productOrFeature")),
        summary: to_trimmed_opt(value.get("summary")),
        affected_component_or_error: to_trimmed_opt(value.get("affectedComponentOrError")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::FakeChatClient;

    #[tokio::test]
    async fn empty_input_short_circuits_without_a_call() {
        let client = FakeChatClient::always_text("{}");
        let fields = extract_fields(&client, "").await.unwrap();
        assert!(fields.is_empty());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn populated_fields_are_trimmed() {
        let client = FakeChatClient::always_text(
            r#"{
                "customerEmail": "  john@example.com ",
                "customerId": null,
                "orderId": "12345",
                "productOrFeature": "",
                "summary": "Charged twice for order #12345.",
                "affectedComponentOrError": 42
            }"#,
        );
        let fields = extract_fields(&client, "I was charged twice").await.unwrap();
        assert_eq!(fields.customer_email.as_deref(), Some("john@example.com"));
        assert_eq!(fields.customer_id, None);
        assert_eq!(fields.order_id.as_deref(), Some("12345"));
        // Blank string and non-string both count as absent.
        assert_eq!(fields.product_or_feature, None);
        assert_eq!(fields.affected_component_or_error, None);
        assert!(fields.summary.is_some());
    }

    #[tokio::test]
    async fn missing_keys_are_absent() {
        let client = FakeChatClient::always_text(r#"{"orderId": "A-1"}"#);
        let fields = extract_fields(&client, "order A-1 is late").await.unwrap();
        assert_eq!(fields.order_id.as_deref(), Some("A-1"));
        assert_eq!(fields.customer_email, None);
        assert_eq!(fields.summary, None);
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let client = FakeChatClient::always_error(LlmError::EmptyResponse);
        let err = extract_fields(&client, "anything").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }
}
