//! Canonical ticket categories and severities.
//!
//! These are the closed enumerations the classifier is allowed to produce.
//! The prompt builder and the routing table both reference this module so
//! the lists never drift apart.

use serde::{Deserialize, Serialize};

/// Ticket category assigned by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketCategory {
    Billing,
    Technical,
    Account,
    Refund,
    #[serde(rename = "Feature Request")]
    FeatureRequest,
    Other,
}

impl TicketCategory {
    /// All categories, in prompt order.
    pub const ALL: [TicketCategory; 6] = [
        Self::Billing,
        Self::Technical,
        Self::Account,
        Self::Refund,
        Self::FeatureRequest,
        Self::Other,
    ];

    /// Display name, identical to the wire value.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Billing => "Billing",
            Self::Technical => "Technical",
            Self::Account => "Account",
            Self::Refund => "Refund",
            Self::FeatureRequest => "Feature Request",
            Self::Other => "Other",
        }
    }

    /// Exact-match parse. Anything else is rejected so callers apply the
    /// documented fallback instead of propagating a raw provider value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == value)
    }

    /// Comma-separated list for prompts.
    pub fn names_joined() -> String {
        Self::ALL
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for TicketCategory {
    fn default() -> Self {
        Self::Other
    }
}

impl std::fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ticket severity assigned by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TicketSeverity {
    /// All severities, mildest first.
    pub const ALL: [TicketSeverity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Short criterion shown to the classifier.
    pub fn criterion(&self) -> &'static str {
        match self {
            Self::Low => "General inquiry, no urgency.",
            Self::Medium => "Issue affecting use but workaround exists.",
            Self::High => "Significant impact; no workaround or many users affected.",
            Self::Critical => {
                "Outage, data loss, or security incident; immediate response required."
            }
        }
    }

    /// Exact-match parse; invalid values fall back at the call site.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == value)
    }

    pub fn names_joined() -> String {
        Self::ALL
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for TicketSeverity {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for TicketSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_round_trips_all_names() {
        for c in TicketCategory::ALL {
            assert_eq!(TicketCategory::parse(c.name()), Some(c));
        }
    }

    #[test]
    fn category_parse_rejects_unknown_and_case_mismatch() {
        assert_eq!(TicketCategory::parse("billing"), None);
        assert_eq!(TicketCategory::parse("Sales"), None);
        assert_eq!(TicketCategory::parse(""), None);
    }

    #[test]
    fn feature_request_uses_spaced_wire_name() {
        assert_eq!(TicketCategory::FeatureRequest.name(), "Feature Request");
        let json = serde_json::to_string(&TicketCategory::FeatureRequest).unwrap();
        assert_eq!(json, "\"Feature Request\"");
    }

    #[test]
    fn severity_parse_round_trips_all_names() {
        for s in TicketSeverity::ALL {
            assert_eq!(TicketSeverity::parse(s.name()), Some(s));
        }
        assert_eq!(TicketSeverity::parse("URGENT"), None);
    }

    #[test]
    fn defaults_are_the_classification_fallbacks() {
        assert_eq!(TicketCategory::default(), TicketCategory::Other);
        assert_eq!(TicketSeverity::default(), TicketSeverity::Medium);
    }
}
