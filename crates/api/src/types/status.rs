use serde::Serialize;

/// Point-in-time view of a consumer, used for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentStatus {
    pub kind: &'static str,
    pub wants_data: bool,
    pub searching: bool,
    /// Rows or points currently held.
    pub items: u64,
    /// Total the backend reported, when it reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}
