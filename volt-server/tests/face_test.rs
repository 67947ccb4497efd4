use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::mock_app::{FACE_PROBE, MockApp, into_json};
use volt_server::services::mock::FakeConnector;

#[tokio::test]
async fn test_set_face_omits_absent_fields() {
    let app = MockApp::new();

    let (status, body) = app.post_json("/face", json!({ "eyes": 85 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("success"));

    let (status, _) = app.post_json("/face", json!({ "mouth": 60 })).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.face.sent(), vec![FACE_PROBE, "E85", "M60"]);
}

#[tokio::test]
async fn test_set_face_clamps() {
    let app = MockApp::new();

    app.post_json("/face", json!({ "eyes": 10, "mouth": 500 })).await;

    assert_eq!(app.face.sent().last().unwrap(), "E70 M80");
}

#[tokio::test]
async fn test_set_face_without_valid_fields() {
    let app = MockApp::new();

    let (status, body) = app.post_json("/face", json!({ "nose": 3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("No valid face commands"));

    let (status, body) = app.post_raw("/face", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("No data in request"));

    assert_eq!(app.face.open_count(), 0);
}

#[tokio::test]
async fn test_set_face_when_disconnected() {
    let app = MockApp::with_connectors(FakeConnector::new(), FakeConnector::offline());

    let (status, _) = app.post_json("/face", json!({ "eyes": 90 })).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_face_expression_is_case_insensitive() {
    let app = MockApp::new();

    let (status, body) = app
        .post_json("/face_expression", json!({ "expression": "HaPpY" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expression"], json!("happy"));
    assert_eq!(app.face.sent().last().unwrap(), "E85 M60");
}

#[tokio::test]
async fn test_unknown_expression_never_reaches_device() {
    let app = MockApp::new();

    let (status, body) = app
        .post_json("/face_expression", json!({ "expression": "ecstatic" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Unknown expression: ecstatic"));
    assert_eq!(app.face.open_count(), 0);
    assert!(app.face.sent().is_empty());
}

#[tokio::test]
async fn test_face_look_defaults_to_center() {
    let app = MockApp::new();

    let response = app.request(Method::POST, "/face_look", None).await;
    let (status, body) = into_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("success"));
    assert_eq!(body["angles"], json!({ "pan": 90, "tilt": 80 }));
    assert_eq!(app.face.sent().last().unwrap(), "E90 T80");
}

#[tokio::test]
async fn test_face_look_mirrors_horizontal_axis() {
    let app = MockApp::new();

    let (_, body) = app.post_json("/face_look", json!({ "x": 0, "y": 0 })).await;
    assert_eq!(body["angles"], json!({ "pan": 110, "tilt": 60 }));

    let (_, body) = app.post_json("/face_look", json!({ "x": 640, "y": 480 })).await;
    assert_eq!(body["angles"], json!({ "pan": 70, "tilt": 100 }));

    assert_eq!(app.face.sent()[1..], ["E110 T60", "E70 T100"]);
}

#[tokio::test]
async fn test_face_look_reports_device_failure_in_body() {
    let app = MockApp::with_connectors(FakeConnector::new(), FakeConnector::offline());

    let (status, body) = app.post_json("/face_look", json!({ "x": 160, "y": 120 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("error"));
    assert_eq!(body["angles"], json!({ "pan": 100, "tilt": 70 }));
    assert!(body["message"].as_str().unwrap().contains("Face not connected"));
    assert!(app.face.sent().is_empty());
}

#[tokio::test]
async fn test_list_expressions() {
    let app = MockApp::new();

    let (status, body) = app.get_json("/expressions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 7);
    assert_eq!(body[2], json!({ "name": "surprise", "eyes": 110, "mouth": 40 }));
}
