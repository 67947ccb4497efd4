//! Video4Linux capture of `/dev/video<index>`.

use image::{ImageFormat, RgbImage};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::video::capture::Parameters;
use v4l::FourCC;

use crate::errors::CameraError;
use crate::services::camera::{CameraBackend, CameraSource, CaptureHints};

const MJPG: &[u8; 4] = b"MJPG";
const YUYV: &[u8; 4] = b"YUYV";

const BUFFER_COUNT: u32 = 4;

#[derive(Debug, Default)]
pub struct V4lBackend;

impl V4lBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for V4lBackend {
    fn name(&self) -> &'static str {
        "v4l"
    }

    fn open(&self, index: u32, hints: CaptureHints) -> Result<Box<dyn CameraSource>, CameraError> {
        let open_err = |reason: String| CameraError::Open { index, reason };

        let device = Device::new(index as usize).map_err(|e| open_err(e.to_string()))?;

        // Prefer compressed frames, the Pi's USB bus cannot carry raw 640x480@30.
        let mut format = device.format().map_err(|e| open_err(e.to_string()))?;
        format.width = hints.width;
        format.height = hints.height;
        format.fourcc = FourCC::new(MJPG);
        let format = match device.set_format(&format) {
            Ok(applied) if applied.fourcc == FourCC::new(MJPG) => applied,
            _ => {
                format.fourcc = FourCC::new(YUYV);
                device.set_format(&format).map_err(|e| open_err(e.to_string()))?
            }
        };

        if format.fourcc != FourCC::new(MJPG) && format.fourcc != FourCC::new(YUYV) {
            return Err(open_err(format!("unsupported pixel format {}", format.fourcc)));
        }

        if let Err(e) = device.set_params(&Parameters::with_fps(hints.fps)) {
            tracing::debug!("Camera {} ignored frame rate hint: {}", index, e);
        }

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)
            .map_err(|e| open_err(e.to_string()))?;

        tracing::debug!(
            "Camera {} negotiated {}x{} {}",
            index,
            format.width,
            format.height,
            format.fourcc
        );

        Ok(Box::new(V4lSource {
            stream,
            _device: device,
            width: format.width,
            height: format.height,
            fourcc: format.fourcc,
        }))
    }
}

struct V4lSource {
    // Dropped before the device it was created from.
    stream: MmapStream<'static>,
    _device: Device,
    width: u32,
    height: u32,
    fourcc: FourCC,
}

impl CameraSource for V4lSource {
    fn read_frame(&mut self) -> Result<RgbImage, CameraError> {
        let (buf, meta) = self
            .stream
            .next()
            .map_err(|e| CameraError::Read(e.to_string()))?;

        let used = (meta.bytesused as usize).min(buf.len());
        let data = &buf[..used];

        if self.fourcc == FourCC::new(MJPG) {
            image::load_from_memory_with_format(data, ImageFormat::Jpeg)
                .map(|img| img.to_rgb8())
                .map_err(|e| CameraError::Decode(e.to_string()))
        } else {
            yuyv_to_rgb(data, self.width, self.height)
        }
    }
}

fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Result<RgbImage, CameraError> {
    let expected = width as usize * height as usize * 2;
    if data.len() < expected {
        return Err(CameraError::Decode(format!(
            "short YUYV frame: {} of {} bytes",
            data.len(),
            expected
        )));
    }

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for chunk in data[..expected].chunks_exact(4) {
        let (y0, u, y1, v) = (chunk[0], chunk[1], chunk[2], chunk[3]);
        rgb.extend_from_slice(&yuv_pixel(y0, u, v));
        rgb.extend_from_slice(&yuv_pixel(y1, u, v));
    }

    RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| CameraError::Decode("YUYV buffer size mismatch".into()))
}

/// BT.601 full-range conversion.
fn yuv_pixel(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = f32::from(y);
    let u = f32::from(u) - 128.0;
    let v = f32::from(v) - 128.0;

    [
        (y + 1.402 * v).clamp(0.0, 255.0) as u8,
        (y - 0.344_136 * u - 0.714_136 * v).clamp(0.0, 255.0) as u8,
        (y + 1.772 * u).clamp(0.0, 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_gray() {
        let frame = yuyv_to_rgb(&[128, 128, 128, 128], 2, 1).unwrap();

        assert_eq!(frame.get_pixel(0, 0).0, [128, 128, 128]);
        assert_eq!(frame.get_pixel(1, 0).0, [128, 128, 128]);
    }

    #[test]
    fn test_yuyv_short_frame() {
        assert!(yuyv_to_rgb(&[0; 6], 2, 2).is_err());
    }
}
