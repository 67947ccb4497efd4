use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use volt_api::models::{CommandResponse, ErrorResponse, ResponseStatus};

use crate::errors::ApiError;
use crate::handles::unix_timestamp;
use crate::services::StartOutcome;
use crate::services::camera::{CameraService, mjpeg};

#[derive(Clone)]
pub struct CameraState {
    pub camera: Arc<CameraService>,
}

pub fn camera_router(state: CameraState) -> Router {
    Router::new()
        .route("/camera/start", post(start_camera))
        .route("/camera/stop", post(stop_camera))
        .route("/camera/stream", get(camera_stream))
        .route("/camera/snapshot", get(camera_snapshot))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/camera/start",
    tag = "camera",
    responses(
        (status = 200, description = "Camera running", body = CommandResponse),
        (status = 500, description = "No camera could be opened", body = ErrorResponse)
    )
)]
pub async fn start_camera(State(state): State<CameraState>) -> Result<Json<CommandResponse>, ApiError> {
    let message = match state.camera.start().await? {
        StartOutcome::Started { index } => format!("Camera {index} started"),
        StartOutcome::AlreadyRunning => "Camera already running".to_string(),
    };

    Ok(Json(CommandResponse {
        status: ResponseStatus::Success,
        message,
        timestamp: unix_timestamp(),
    }))
}

#[utoipa::path(
    post,
    path = "/camera/stop",
    tag = "camera",
    responses(
        (status = 200, description = "Camera stopped", body = CommandResponse)
    )
)]
pub async fn stop_camera(State(state): State<CameraState>) -> Json<CommandResponse> {
    state.camera.stop().await;

    Json(CommandResponse {
        status: ResponseStatus::Success,
        message: "Camera stopped".to_string(),
        timestamp: unix_timestamp(),
    })
}

#[utoipa::path(
    get,
    path = "/camera/stream",
    tag = "camera",
    responses(
        (status = 200, description = "multipart/x-mixed-replace MJPEG stream, ends when the camera stops")
    )
)]
pub async fn camera_stream(State(state): State<CameraState>) -> Response {
    (
        [
            (header::CONTENT_TYPE, mjpeg::MJPEG_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        ],
        Body::from_stream(state.camera.stream()),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/camera/snapshot",
    tag = "camera",
    responses(
        (status = 200, description = "Latest frame as image/jpeg"),
        (status = 503, description = "Camera not running or no frame yet", body = ErrorResponse)
    )
)]
pub async fn camera_snapshot(State(state): State<CameraState>) -> Result<Response, ApiError> {
    let jpeg = state.camera.snapshot().await?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], jpeg).into_response())
}
