use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use volt_api::models::*;
use volt_api::protocol::{self, Expression, FaceCommand};

use crate::errors::{ApiError, CommandError};
use crate::handles::{JsonBody, OptionalJsonBody, sent_message, unix_timestamp};
use crate::services::DeviceLink;

/// Gaze target used for an axis the client leaves out.
const DEFAULT_LOOK_X: i64 = protocol::FRAME_WIDTH as i64 / 2;
const DEFAULT_LOOK_Y: i64 = protocol::FRAME_HEIGHT as i64 / 2;

#[derive(Clone)]
pub struct FaceState {
    pub face: Arc<DeviceLink>,
}

pub fn face_router(state: FaceState) -> Router {
    Router::new()
        .route("/face", post(set_face))
        .route("/face_expression", post(set_face_expression))
        .route("/face_look", post(face_look))
        .route("/expressions", get(list_expressions))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/face",
    tag = "face",
    request_body = FaceRequest,
    responses(
        (status = 200, description = "Face command sent", body = CommandResponse),
        (status = 400, description = "Missing body or no valid fields", body = ErrorResponse),
        (status = 500, description = "Serial write failed", body = ErrorResponse),
        (status = 503, description = "Face not connected", body = ErrorResponse)
    )
)]
pub async fn set_face(
    State(state): State<FaceState>,
    JsonBody(body): JsonBody<FaceRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = FaceCommand::from_request(&body)
        .to_command()
        .ok_or(CommandError::NoValidFaceFields)?;

    let ack = state.face.send(command).await?;

    Ok(Json(CommandResponse {
        status: ResponseStatus::Success,
        message: sent_message(ack),
        timestamp: unix_timestamp(),
    }))
}

#[utoipa::path(
    post,
    path = "/face_expression",
    tag = "face",
    request_body = ExpressionRequest,
    responses(
        (status = 200, description = "Expression shown", body = ExpressionResponse),
        (status = 400, description = "Missing body or unknown expression", body = ErrorResponse),
        (status = 503, description = "Face not connected", body = ErrorResponse)
    )
)]
pub async fn set_face_expression(
    State(state): State<FaceState>,
    JsonBody(body): JsonBody<ExpressionRequest>,
) -> Result<Json<ExpressionResponse>, ApiError> {
    let expression: Expression = body
        .expression
        .parse()
        .map_err(|_| CommandError::UnknownExpression(body.expression.clone()))?;

    let ack = state.face.send(expression.pose().to_command()).await?;

    Ok(Json(ExpressionResponse {
        status: ResponseStatus::Success,
        message: sent_message(ack),
        expression: expression.name().to_string(),
        timestamp: unix_timestamp(),
    }))
}

/// Device failures are reported in the body next to the computed angles.
#[utoipa::path(
    post,
    path = "/face_look",
    tag = "face",
    request_body = LookRequest,
    responses(
        (status = 200, description = "Computed angles and the outcome of the write", body = LookResponse),
        (status = 400, description = "Invalid coordinate", body = ErrorResponse)
    )
)]
pub async fn face_look(
    State(state): State<FaceState>,
    OptionalJsonBody(body): OptionalJsonBody<LookRequest>,
) -> Result<Json<LookResponse>, ApiError> {
    let angles = protocol::gaze_angles(
        body.x.unwrap_or(DEFAULT_LOOK_X),
        body.y.unwrap_or(DEFAULT_LOOK_Y),
        protocol::FRAME_WIDTH,
        protocol::FRAME_HEIGHT,
    );

    let (status, message) = match state.face.send(angles.to_command()).await {
        Ok(_) => (
            ResponseStatus::Success,
            format!("Eyes at pan {} tilt {}", angles.pan, angles.tilt),
        ),
        Err(e) => {
            tracing::warn!("Face look failed: {}", e);
            (ResponseStatus::Error, e.to_string())
        }
    };

    Ok(Json(LookResponse {
        status,
        angles,
        message,
    }))
}

#[utoipa::path(
    get,
    path = "/expressions",
    tag = "face",
    responses(
        (status = 200, description = "Available expressions", body = Vec<ExpressionInfo>)
    )
)]
pub async fn list_expressions() -> Json<Vec<ExpressionInfo>> {
    Json(Expression::ALL.iter().map(Expression::info).collect())
}
