//! Multipart MJPEG framing for `GET /camera/stream`.
//!
//! Browsers render `multipart/x-mixed-replace` natively, replacing the image
//! every time a new part arrives.

use bytes::Bytes;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

use crate::errors::CameraError;

pub const MJPEG_BOUNDARY: &str = "frame";
pub const MJPEG_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

pub fn encode_jpeg(frame: &RgbImage, quality: u8) -> Result<Bytes, CameraError> {
    let mut jpeg = Vec::new();

    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode_image(frame)
        .map_err(|e| CameraError::Encode(e.to_string()))?;

    Ok(Bytes::from(jpeg))
}

/// One multipart section: boundary, part headers, then the JPEG.
pub fn part(jpeg: &[u8]) -> Bytes {
    let header = format!(
        "--{MJPEG_BOUNDARY}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
        jpeg.len()
    );

    let mut bytes = Vec::with_capacity(header.len() + jpeg.len() + 2);
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(jpeg);
    bytes.extend_from_slice(b"\r\n");

    Bytes::from(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg() {
        let frame = RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));

        let jpeg = encode_jpeg(&frame, 80).unwrap();

        // SOI marker
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_content_type_names_boundary() {
        assert!(MJPEG_CONTENT_TYPE.ends_with(&format!("boundary={MJPEG_BOUNDARY}")));
    }

    #[test]
    fn test_part_layout() {
        let part = part(b"JPEG");

        assert_eq!(
            &part[..],
            b"--frame\r\nContent-Type: image/jpeg\r\nContent-Length: 4\r\n\r\nJPEG\r\n"
        );
    }
}
