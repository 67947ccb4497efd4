use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;
use volt_api::models::*;
use volt_api::protocol::{GazeAngles, HandPose};

use crate::handles::*;

#[derive(OpenApi)]
#[openapi(
    info(title = "Volt bridge", description = "HTTP bridge to the Volt hand, face and camera"),
    paths(
        set_hand,
        play_gesture,
        list_gestures,
        set_face,
        set_face_expression,
        face_look,
        list_expressions,
        start_camera,
        stop_camera,
        camera_stream,
        camera_snapshot,
        get_status,
        health_check,
        self_test,
        debug_send,
    ),
    components(schemas(
        CommandResponse,
        DebugSendRequest,
        DebugTarget,
        ErrorResponse,
        ExpressionInfo,
        ExpressionRequest,
        ExpressionResponse,
        FaceRequest,
        GazeAngles,
        GestureInfo,
        GestureRequest,
        GestureResponse,
        HandPose,
        HandRequest,
        HandResponse,
        HealthResponse,
        LookRequest,
        LookResponse,
        ResponseStatus,
        StatusResponse,
        TestResponse,
    )),
    tags(
        (name = "hand", description = "Hand poses and gestures"),
        (name = "face", description = "Eyes, mouth and expressions"),
        (name = "camera", description = "Capture loop control and frames"),
        (name = "system", description = "Status and liveness"),
        (name = "debug", description = "Raw serial access"),
    )
)]
pub struct ApiDoc;

pub fn docs_router() -> Router {
    Router::new().route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();

        for path in ["/hand", "/hand_gesture", "/face_look", "/camera/stream", "/debug/send"] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
