pub mod settings;

pub use settings::{CameraBackendKind, CameraSettings, LinkSettings, Logger, Server, Settings};
