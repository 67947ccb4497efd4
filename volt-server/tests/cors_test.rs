use axum::http::{HeaderMap, Method, StatusCode, header};

mod common;
use common::mock_app::MockApp;

fn assert_cors(headers: &HeaderMap) {
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, OPTIONS, PUT, DELETE"
    );
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization"
    );
}

#[tokio::test]
async fn test_preflight_is_answered_for_every_route() {
    let app = MockApp::new();

    for uri in ["/hand", "/face", "/face_look", "/camera/start", "/status", "/debug/send"] {
        let response = app.request(Method::OPTIONS, uri, None).await;

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_cors(response.headers());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    assert_eq!(app.hand.open_count(), 0);
}

#[tokio::test]
async fn test_success_and_error_responses_carry_headers() {
    let app = MockApp::new();

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(response.headers());

    let response = app.request(Method::POST, "/hand", Some("")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_cors(response.headers());
}

#[tokio::test]
async fn test_openapi_document() {
    let app = MockApp::new();

    let (status, body) = app.get_json("/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/hand"]["post"].is_object());
    assert!(body["paths"]["/status"]["get"].is_object());
}
