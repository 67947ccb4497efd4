use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Failed to initialize camera: no index produced a frame")]
    NoCameraAvailable,

    #[error("Camera backend not available in this build: {0}")]
    BackendUnavailable(&'static str),

    #[error("Failed to open camera {index}: {reason}")]
    Open { index: u32, reason: String },

    #[error("Failed to read frame: {0}")]
    Read(String),

    #[error("Failed to decode frame: {0}")]
    Decode(String),

    #[error("Camera not running or no frame available")]
    NoFrame,

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Camera task failed: {0}")]
    TaskFailed(String),
}

impl CameraError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CameraError::NoFrame => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
