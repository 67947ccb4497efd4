use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use volt_api::models::*;
use volt_api::protocol::{Gesture, HandPose};

use crate::errors::{ApiError, CommandError};
use crate::handles::{JsonBody, sent_message, unix_timestamp};
use crate::services::{DeviceLink, GestureService};

#[derive(Clone)]
pub struct HandState {
    pub hand: Arc<DeviceLink>,
    pub gestures: Arc<GestureService>,
}

pub fn hand_router(state: HandState) -> Router {
    Router::new()
        .route("/hand", post(set_hand))
        .route("/hand_gesture", post(play_gesture))
        .route("/gestures", get(list_gestures))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/hand",
    tag = "hand",
    request_body = HandRequest,
    responses(
        (status = 200, description = "Pose sent to the hand", body = HandResponse),
        (status = 400, description = "Missing body or invalid angle", body = ErrorResponse),
        (status = 500, description = "Serial write failed", body = ErrorResponse),
        (status = 503, description = "Hand not connected", body = ErrorResponse)
    )
)]
pub async fn set_hand(
    State(state): State<HandState>,
    JsonBody(body): JsonBody<HandRequest>,
) -> Result<Json<HandResponse>, ApiError> {
    let pose = HandPose::from_request(&body);

    let ack = state.hand.send(pose.to_command()).await?;

    Ok(Json(HandResponse {
        status: ResponseStatus::Success,
        message: sent_message(ack),
        angles: pose,
        timestamp: unix_timestamp(),
    }))
}

#[utoipa::path(
    post,
    path = "/hand_gesture",
    tag = "hand",
    request_body = GestureRequest,
    responses(
        (status = 200, description = "Gesture played", body = GestureResponse),
        (status = 400, description = "Missing body", body = ErrorResponse),
        (status = 404, description = "Unknown gesture", body = ErrorResponse),
        (status = 409, description = "Another gesture is running", body = ErrorResponse),
        (status = 503, description = "Hand not connected", body = ErrorResponse)
    )
)]
pub async fn play_gesture(
    State(state): State<HandState>,
    JsonBody(body): JsonBody<GestureRequest>,
) -> Result<Json<GestureResponse>, ApiError> {
    let gesture: Gesture = body
        .gesture
        .parse()
        .map_err(|_| CommandError::UnknownGesture(body.gesture.clone()))?;

    let steps = state.gestures.run(gesture).await?;

    Ok(Json(GestureResponse {
        status: ResponseStatus::Success,
        message: format!("Gesture {gesture} played"),
        gesture: gesture.name().to_string(),
        steps,
        timestamp: unix_timestamp(),
    }))
}

#[utoipa::path(
    get,
    path = "/gestures",
    tag = "hand",
    responses(
        (status = 200, description = "Available gestures", body = Vec<GestureInfo>)
    )
)]
pub async fn list_gestures() -> Json<Vec<GestureInfo>> {
    Json(Gesture::ALL.iter().map(Gesture::info).collect())
}
