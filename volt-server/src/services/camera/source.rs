use image::RgbImage;

use crate::errors::CameraError;

/// Resolution and rate requested from the device. Backends treat these as
/// hints and may deliver something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureHints {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// An open camera. Dropping it releases the device.
pub trait CameraSource: Send {
    fn read_frame(&mut self) -> Result<RgbImage, CameraError>;
}

pub trait CameraBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn open(&self, index: u32, hints: CaptureHints) -> Result<Box<dyn CameraSource>, CameraError>;
}
