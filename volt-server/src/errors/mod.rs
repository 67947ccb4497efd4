pub mod api;
pub mod camera;
pub mod command;
pub mod device;

pub use api::ApiError;
pub use camera::CameraError;
pub use command::CommandError;
pub use device::DeviceError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;
use volt_api::models::{ErrorResponse, ResponseStatus};

use crate::handles::unix_timestamp;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, error_id) = match self {
            ApiError::CommandError(e) => (e.status_code(), e.to_string(), None),
            ApiError::DeviceError(e) => {
                tracing::warn!("Device error: {}", e);
                (e.status_code(), e.to_string(), None)
            }
            ApiError::CameraError(e) => (e.status_code(), e.to_string(), None),
            ApiError::InternalError(e) => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(error_id.to_string()),
                )
            }
        };

        let body = Json(ErrorResponse {
            status: ResponseStatus::Error,
            message,
            timestamp: unix_timestamp(),
            error_id,
        });

        (status, body).into_response()
    }
}
