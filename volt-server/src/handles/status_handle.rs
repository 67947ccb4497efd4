use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use time::OffsetDateTime;
use time::macros::format_description;
use volt_api::models::{HealthResponse, ResponseStatus, StatusResponse, TestResponse};

use crate::errors::ApiError;
use crate::handles::unix_timestamp;
use crate::services::StatusService;

#[derive(Clone)]
pub struct StatusState {
    pub status: Arc<StatusService>,
}

pub fn status_router(state: StatusState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/health", get(health_check))
        .route("/test", get(self_test))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/status",
    tag = "system",
    responses(
        (status = 200, description = "Link and camera state", body = StatusResponse)
    )
)]
pub async fn get_status(State(state): State<StatusState>) -> Json<StatusResponse> {
    Json(state.status.snapshot().await)
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: ResponseStatus::Healthy,
        timestamp: unix_timestamp(),
    })
}

#[utoipa::path(
    get,
    path = "/test",
    tag = "system",
    responses(
        (status = 200, description = "Server clock", body = TestResponse)
    )
)]
pub async fn self_test() -> Result<Json<TestResponse>, ApiError> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let time = now
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .map_err(|e| anyhow!("Failed to format time: {}", e))?;

    Ok(Json(TestResponse {
        status: ResponseStatus::Ok,
        message: "Volt bridge is running".to_string(),
        time,
        timestamp: unix_timestamp(),
    }))
}
