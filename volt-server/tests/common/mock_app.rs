#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

use volt_server::app::{AppServices, create_app};
use volt_server::configs::{CameraBackendKind, CameraSettings};
use volt_server::services::camera::SyntheticBackend;
use volt_server::services::mock::{FakeConnector, link_settings};
use volt_server::services::{CameraService, DeviceKind, DeviceLink, GestureService};

pub const HAND_PORT: &str = "/dev/ttyUSB0";
pub const FACE_PORT: &str = "/dev/ttyUSB1";

pub const HAND_PROBE: &str = "0,0,0,0,180,180,0";
pub const FACE_PROBE: &str = "E90 M0";

pub struct MockApp {
    pub router: Router,
    pub services: AppServices,
    pub hand: FakeConnector,
    pub face: FakeConnector,
    pub camera: SyntheticBackend,
}

impl MockApp {
    pub fn new() -> Self {
        Self::build(FakeConnector::new(), FakeConnector::new(), SyntheticBackend::new())
    }

    pub fn with_connectors(hand: FakeConnector, face: FakeConnector) -> Self {
        Self::build(hand, face, SyntheticBackend::new())
    }

    pub fn with_camera(camera: SyntheticBackend) -> Self {
        Self::build(FakeConnector::new(), FakeConnector::new(), camera)
    }

    fn build(hand: FakeConnector, face: FakeConnector, camera: SyntheticBackend) -> Self {
        let hand_link = Arc::new(DeviceLink::new(
            DeviceKind::Hand,
            link_settings(HAND_PORT),
            Arc::new(hand.clone()),
        ));
        let face_link = Arc::new(DeviceLink::new(
            DeviceKind::Face,
            link_settings(FACE_PORT),
            Arc::new(face.clone()),
        ));
        let camera_service = Arc::new(CameraService::new(camera_settings(), Arc::new(camera.clone())));
        let gestures = Arc::new(GestureService::with_step_delay(
            Arc::clone(&hand_link),
            Duration::ZERO,
        ));

        let services = AppServices::with_gestures(hand_link, face_link, camera_service, gestures);
        let router = create_app(&services);

        Self {
            router,
            services,
            hand,
            face,
            camera,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }

        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, &body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = self.request(Method::POST, uri, Some(body)).await;
        into_json(response).await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.request(Method::GET, uri, None).await;
        into_json(response).await
    }
}

pub async fn into_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&body).unwrap())
}

pub fn camera_settings() -> CameraSettings {
    CameraSettings {
        backend: CameraBackendKind::Synthetic,
        index: 0,
        fallback_indices: vec![0, 2, 3],
        capture_width: 640,
        capture_height: 480,
        capture_fps: 30,
        frame_width: 320,
        frame_height: 240,
        frame_interval_ms: 5,
        stream_interval_ms: 5,
        stream_quality: 80,
        snapshot_quality: 95,
        open_attempts: 5,
        retry_backoff_ms: 20,
    }
}
