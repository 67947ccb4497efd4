use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::configs::Settings;
use crate::docs::docs_router;
use crate::errors::CameraError;
use crate::handles::*;
use crate::middlewares::cors;
use crate::services::camera::backend_from_settings;
use crate::services::{
    CameraService, DeviceKind, DeviceLink, GestureService, LinkConnector, SerialConnector,
    StatusService,
};

/// Long-lived services shared by every handler.
#[derive(Clone)]
pub struct AppServices {
    pub hand: Arc<DeviceLink>,
    pub face: Arc<DeviceLink>,
    pub camera: Arc<CameraService>,
    pub gestures: Arc<GestureService>,
    pub status: Arc<StatusService>,
}

impl AppServices {
    pub fn new(hand: Arc<DeviceLink>, face: Arc<DeviceLink>, camera: Arc<CameraService>) -> Self {
        Self::with_gestures(
            Arc::clone(&hand),
            face,
            camera,
            Arc::new(GestureService::new(hand)),
        )
    }

    pub fn with_gestures(
        hand: Arc<DeviceLink>,
        face: Arc<DeviceLink>,
        camera: Arc<CameraService>,
        gestures: Arc<GestureService>,
    ) -> Self {
        let status = Arc::new(StatusService::new(
            Arc::clone(&hand),
            Arc::clone(&face),
            Arc::clone(&camera),
        ));

        Self {
            hand,
            face,
            camera,
            gestures,
            status,
        }
    }

    /// Real serial ports and the configured camera backend.
    pub fn from_settings(settings: &Settings) -> Result<Self, CameraError> {
        let connector: Arc<dyn LinkConnector> = Arc::new(SerialConnector::new());

        let hand = Arc::new(DeviceLink::new(
            DeviceKind::Hand,
            settings.hand.clone(),
            Arc::clone(&connector),
        ));
        let face = Arc::new(DeviceLink::new(DeviceKind::Face, settings.face.clone(), connector));

        let backend = backend_from_settings(&settings.camera)?;
        let camera = Arc::new(CameraService::new(settings.camera.clone(), backend));

        Ok(Self::new(hand, face, camera))
    }

    /// Stops the capture loop and releases both ports.
    pub async fn shutdown(&self) {
        self.camera.stop().await;
        tokio::join!(self.hand.close(), self.face.close());
    }
}

pub fn create_app(services: &AppServices) -> Router {
    let hand = hand_router(HandState {
        hand: Arc::clone(&services.hand),
        gestures: Arc::clone(&services.gestures),
    });

    let face = face_router(FaceState {
        face: Arc::clone(&services.face),
    });

    let camera = camera_router(CameraState {
        camera: Arc::clone(&services.camera),
    });

    let status = status_router(StatusState {
        status: Arc::clone(&services.status),
    });

    let debug = debug_router(DebugState {
        hand: Arc::clone(&services.hand),
        face: Arc::clone(&services.face),
    });

    Router::new()
        .merge(hand)
        .merge(face)
        .merge(camera)
        .merge(status)
        .merge(debug)
        .merge(docs_router())
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
}
