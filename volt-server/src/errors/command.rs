use axum::http::StatusCode;

/// Request problems caught before any device is touched.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No data in request")]
    MissingBody,

    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    #[error("No valid face commands")]
    NoValidFaceFields,

    #[error("Unknown expression: {0}")]
    UnknownExpression(String),

    #[error("Unknown gesture: {0}")]
    UnknownGesture(String),

    #[error("Another gesture is already running")]
    GestureInProgress,
}

impl CommandError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CommandError::MissingBody => StatusCode::BAD_REQUEST,
            CommandError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            CommandError::NoValidFaceFields => StatusCode::BAD_REQUEST,
            CommandError::UnknownExpression(_) => StatusCode::BAD_REQUEST,
            CommandError::UnknownGesture(_) => StatusCode::NOT_FOUND,
            CommandError::GestureInProgress => StatusCode::CONFLICT,
        }
    }
}
