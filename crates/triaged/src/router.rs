//! Deterministic ticket routing.
//!
//! Pure lookup from (category, severity) to a handling team, with a fixed
//! default for pairs the table does not name. No state, no I/O, total over
//! the closed enumerations.

use std::collections::HashMap;
use triage_common::{RoutingResult, TicketCategory, TicketClassification, TicketSeverity};

/// Team assignment for a (category, severity) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAssignment {
    pub team_id: &'static str,
    pub team_name: &'static str,
}

const BILLING: TeamAssignment = TeamAssignment {
    team_id: "billing",
    team_name: "Billing Team",
};
const BILLING_ESCALATION: TeamAssignment = TeamAssignment {
    team_id: "billing-escalation",
    team_name: "Billing Escalation",
};
const SUPPORT: TeamAssignment = TeamAssignment {
    team_id: "support",
    team_name: "Support Team",
};
const ENGINEERING: TeamAssignment = TeamAssignment {
    team_id: "engineering",
    team_name: "Engineering",
};
const PLATFORM_ONCALL: TeamAssignment = TeamAssignment {
    team_id: "platform-oncall",
    team_name: "Platform On-Call",
};
const PRODUCT: TeamAssignment = TeamAssignment {
    team_id: "product",
    team_name: "Product Team",
};

/// Routing table keyed by (category, severity), constructed at process
/// start and injected into the pipeline. Edit the entries here to change
/// routing without touching pipeline code.
#[derive(Debug)]
pub struct RoutingTable {
    entries: HashMap<(TicketCategory, TicketSeverity), TeamAssignment>,
    default_team: TeamAssignment,
}

impl Default for RoutingTable {
    fn default() -> Self {
        use TicketCategory::*;
        use TicketSeverity::*;

        let mut entries = HashMap::new();
        let mut add = |category: TicketCategory, severity: TicketSeverity, team: TeamAssignment| {
            entries.insert((category, severity), team);
        };

        for severity in [Low, Medium, High] {
            add(Billing, severity, BILLING);
            add(Refund, severity, BILLING);
        }
        add(Billing, Critical, BILLING_ESCALATION);
        add(Refund, Critical, BILLING_ESCALATION);

        add(Technical, Low, SUPPORT);
        add(Technical, Medium, SUPPORT);
        add(Technical, High, ENGINEERING);
        add(Technical, Critical, PLATFORM_ONCALL);

        for severity in [Low, Medium, High] {
            add(Account, severity, SUPPORT);
            add(Other, severity, SUPPORT);
        }
        add(Account, Critical, PLATFORM_ONCALL);
        add(Other, Critical, PLATFORM_ONCALL);

        for severity in TicketSeverity::ALL {
            add(FeatureRequest, severity, PRODUCT);
        }

        Self {
            entries,
            default_team: SUPPORT,
        }
    }
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a classification to a team. Unknown pairs get the default
    /// team; `reason` always names the category and severity used.
    pub fn route(&self, classification: &TicketClassification) -> RoutingResult {
        let assignment = self
            .entries
            .get(&(classification.category, classification.severity))
            .unwrap_or(&self.default_team);

        RoutingResult {
            team_id: assignment.team_id.to_string(),
            team_name: Some(assignment.team_name.to_string()),
            reason: Some(format!(
                "Category: {}, Severity: {}",
                classification.category, classification.severity
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(category: TicketCategory, severity: TicketSeverity) -> TicketClassification {
        TicketClassification { category, severity }
    }

    #[test]
    fn billing_high_goes_to_billing_team() {
        let table = RoutingTable::new();
        let result = table.route(&classification(
            TicketCategory::Billing,
            TicketSeverity::High,
        ));
        assert_eq!(result.team_id, "billing");
        assert_eq!(result.team_name.as_deref(), Some("Billing Team"));
        let reason = result.reason.unwrap();
        assert!(reason.contains("Billing"));
        assert!(reason.contains("High"));
    }

    #[test]
    fn technical_critical_goes_to_platform_oncall() {
        let table = RoutingTable::new();
        let result = table.route(&classification(
            TicketCategory::Technical,
            TicketSeverity::Critical,
        ));
        assert_eq!(result.team_id, "platform-oncall");
        assert_eq!(result.team_name.as_deref(), Some("Platform On-Call"));
    }

    #[test]
    fn feature_requests_go_to_product_at_any_severity() {
        let table = RoutingTable::new();
        for severity in TicketSeverity::ALL {
            let result = table.route(&classification(TicketCategory::FeatureRequest, severity));
            assert_eq!(result.team_id, "product");
        }
    }

    #[test]
    fn other_medium_is_the_support_default() {
        let table = RoutingTable::new();
        let result = table.route(&classification(
            TicketCategory::Other,
            TicketSeverity::Medium,
        ));
        assert_eq!(result.team_id, "support");
        assert_eq!(result.team_name.as_deref(), Some("Support Team"));
    }

    #[test]
    fn routing_is_total_over_both_enumerations() {
        let table = RoutingTable::new();
        for category in TicketCategory::ALL {
            for severity in TicketSeverity::ALL {
                let result = table.route(&classification(category, severity));
                assert!(!result.team_id.is_empty());
                let reason = result.reason.expect("reason always populated");
                assert!(reason.contains(category.name()));
                assert!(reason.contains(severity.name()));
            }
        }
    }

    #[test]
    fn refund_mirrors_billing() {
        let table = RoutingTable::new();
        let refund_high = table.route(&classification(
            TicketCategory::Refund,
            TicketSeverity::High,
        ));
        assert_eq!(refund_high.team_id, "billing");

        let refund_critical = table.route(&classification(
            TicketCategory::Refund,
            TicketSeverity::Critical,
        ));
        assert_eq!(refund_critical.team_id, "billing-escalation");
    }
}
