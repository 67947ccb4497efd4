use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use volt_api::models::*;

use crate::errors::ApiError;
use crate::handles::{JsonBody, sent_message, unix_timestamp};
use crate::services::DeviceLink;

#[derive(Clone)]
pub struct DebugState {
    pub hand: Arc<DeviceLink>,
    pub face: Arc<DeviceLink>,
}

pub fn debug_router(state: DebugState) -> Router {
    Router::new()
        .route("/debug/send", post(debug_send))
        .with_state(state)
}

/// Forwards a raw line. Device failures are reported in the body, not the status code.
#[utoipa::path(
    post,
    path = "/debug/send",
    tag = "debug",
    request_body = DebugSendRequest,
    responses(
        (status = 200, description = "Outcome of the write", body = CommandResponse),
        (status = 400, description = "Missing or malformed body", body = ErrorResponse)
    )
)]
pub async fn debug_send(
    State(state): State<DebugState>,
    JsonBody(body): JsonBody<DebugSendRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let link = match body.target {
        DebugTarget::Hand => &state.hand,
        DebugTarget::Face => &state.face,
    };

    let (status, message) = match link.send(body.command.as_str()).await {
        Ok(ack) => (ResponseStatus::Success, sent_message(ack)),
        Err(e) => {
            tracing::warn!("Debug send to {} failed: {}", body.target, e);
            (ResponseStatus::Error, e.to_string())
        }
    };

    Ok(Json(CommandResponse {
        status,
        message,
        timestamp: unix_timestamp(),
    }))
}
