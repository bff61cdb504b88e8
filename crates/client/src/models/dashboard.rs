use serde::Deserialize;

/// Headline counters for the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_projects: i64,
    pub pending_deliverables: i64,
    pub open_tickets: i64,
    pub active_users: i64,
}
