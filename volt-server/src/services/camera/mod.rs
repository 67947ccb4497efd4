//! Camera capture loop and frame delivery.

pub mod mjpeg;
pub mod service;
pub mod source;
pub mod synthetic;
#[cfg(all(target_os = "linux", feature = "v4l"))]
pub mod v4l;

use std::sync::Arc;

pub use service::{CameraService, Frame, FrameSlot, StartOutcome};
pub use source::{CameraBackend, CameraSource, CaptureHints};
pub use synthetic::SyntheticBackend;

use crate::configs::{CameraBackendKind, CameraSettings};
use crate::errors::CameraError;

/// Builds the backend named in the settings.
pub fn backend_from_settings(settings: &CameraSettings) -> Result<Arc<dyn CameraBackend>, CameraError> {
    match settings.backend {
        CameraBackendKind::Synthetic => Ok(Arc::new(SyntheticBackend::new())),
        #[cfg(all(target_os = "linux", feature = "v4l"))]
        CameraBackendKind::V4l => Ok(Arc::new(v4l::V4lBackend::new())),
        #[cfg(not(all(target_os = "linux", feature = "v4l")))]
        CameraBackendKind::V4l => Err(CameraError::BackendUnavailable("v4l")),
    }
}
