use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Restocked,
    Dismissed,
}

/// Demand that could not be served at checkout because stock ran short.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingProductReport {
    pub id: u64,
    pub product_id: u64,
    pub product_name: String,
    /// Shortfall: what the cart asked for minus what was on the shelf.
    pub requested_quantity: u32,
    pub customer_id: Option<u64>,
    pub customer_name: String,
    pub status: ReportStatus,
    pub request_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ReportCreate {
    pub product_id: u64,
    pub product_name: String,
    pub requested_quantity: u32,
    pub customer_id: Option<u64>,
    pub customer_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportStatusUpdate {
    pub status: ReportStatus,
}
