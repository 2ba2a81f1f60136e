//! Active store alerts surfaced on the dashboard.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Warning,
    Opportunity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertImpact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub impact: AlertImpact,
    pub suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_revenue: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Current alerts for a store. Alert detection runs upstream; this surfaces
/// the reference set for the demo profile.
pub fn active_alerts(store_id: &str, now: DateTime<Utc>) -> Vec<Alert> {
    debug!(store_id, "assembling active alerts");

    vec![
        Alert {
            id: "alert_001".to_string(),
            kind: AlertKind::Warning,
            title: "Cart abandonment spike".to_string(),
            message: "Cart abandonment increased 12% this week".to_string(),
            impact: AlertImpact::High,
            suggestion: "Review shipping costs and checkout flow".to_string(),
            potential_revenue: None,
            created_at: now - Duration::hours(2),
        },
        Alert {
            id: "alert_002".to_string(),
            kind: AlertKind::Opportunity,
            title: "Email list growth opportunity".to_string(),
            message: "Exit intent popup could capture 15% more emails".to_string(),
            impact: AlertImpact::Medium,
            suggestion: "Implement exit-intent popup with 10% discount".to_string(),
            potential_revenue: Some("$2,400/month".to_string()),
            created_at: now - Duration::days(1),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_alerts() {
        let now = Utc::now();
        let alerts = active_alerts("demo", now);

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::Warning);
        assert_eq!(alerts[0].impact, AlertImpact::High);
        assert_eq!(alerts[0].created_at, now - Duration::hours(2));
        assert_eq!(alerts[1].kind, AlertKind::Opportunity);
        assert_eq!(alerts[1].potential_revenue.as_deref(), Some("$2,400/month"));
    }

    #[test]
    fn test_alert_kind_serialization() {
        let json = serde_json::to_string(&AlertKind::Opportunity).unwrap();
        assert_eq!(json, "\"opportunity\"");
    }
}
