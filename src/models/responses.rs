use serde::{Deserialize, Serialize};

/// Outcome of a session operation, tagged by `outcome`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse<T> {
    #[serde(rename = "requesterId")]
    pub requester_id: String,
    #[serde(flatten)]
    pub outcome: T,
    /// Notifications that could not be delivered; the state change still holds
    #[serde(rename = "deliveryErrors", default, skip_serializing_if = "Vec::is_empty")]
    pub delivery_errors: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub waiting: usize,
    pub pairs: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
