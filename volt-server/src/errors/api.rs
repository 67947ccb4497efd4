use super::{CameraError, CommandError, DeviceError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    CommandError(#[from] CommandError),

    #[error("{0}")]
    DeviceError(#[from] DeviceError),

    #[error("{0}")]
    CameraError(#[from] CameraError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
