use serde::{Deserialize, Serialize};

use super::ResponseStatus;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub timestamp: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub timestamp: f64,
    /// Correlates the response with the server log for internal failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_id: Option<String>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub hand_connected: bool,
    pub face_connected: bool,
    pub camera_running: bool,
    pub hand_port: String,
    pub face_port: String,
    pub camera_index: u32,
    /// Always `"running"` when the server answers
    pub server: String,
    pub timestamp: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ResponseStatus,
    pub timestamp: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResponse {
    pub status: ResponseStatus,
    pub message: String,
    /// Local wall clock, `YYYY-MM-DD HH:MM:SS`
    pub time: String,
    pub timestamp: f64,
}
