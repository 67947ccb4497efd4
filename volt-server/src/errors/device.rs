use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Arduino {device} not connected: {reason}")]
    NotConnected { device: &'static str, reason: String },

    #[error("Send to Arduino {device} failed: {reason}")]
    Transport { device: &'static str, reason: String },

    #[error("Device task failed: {0}")]
    TaskFailed(String),
}

impl DeviceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeviceError::NotConnected { .. } => StatusCode::SERVICE_UNAVAILABLE,
            DeviceError::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            DeviceError::TaskFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
