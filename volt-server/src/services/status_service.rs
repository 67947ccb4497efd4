use std::sync::Arc;

use volt_api::models::StatusResponse;

use crate::handles::unix_timestamp;
use crate::services::{CameraService, DeviceLink};

pub struct StatusService {
    hand: Arc<DeviceLink>,
    face: Arc<DeviceLink>,
    camera: Arc<CameraService>,
}

impl StatusService {
    pub fn new(hand: Arc<DeviceLink>, face: Arc<DeviceLink>, camera: Arc<CameraService>) -> Self {
        Self { hand, face, camera }
    }

    /// Probes both links concurrently. A link that is down gets one
    /// reconnect attempt, so polling the status also repairs it.
    pub async fn snapshot(&self) -> StatusResponse {
        let (hand_connected, face_connected) = tokio::join!(self.hand.probe(), self.face.probe());

        StatusResponse {
            hand_connected,
            face_connected,
            camera_running: self.camera.is_running(),
            hand_port: self.hand.port_path().to_string(),
            face_port: self.face.port_path().to_string(),
            camera_index: self.camera.camera_index(),
            server: "running".to_string(),
            timestamp: unix_timestamp(),
        }
    }
}
