pub mod camera;
pub mod device_link;
pub mod gesture_service;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod serial_transport;
pub mod status_service;

pub use camera::{CameraBackend, CameraService, CameraSource, StartOutcome};
pub use device_link::{DeviceKind, DeviceLink, LinkConnector, LinkTransport};
pub use gesture_service::GestureService;
pub use serial_transport::SerialConnector;
pub use status_service::StatusService;
