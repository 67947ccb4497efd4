use serde::{Deserialize, Serialize};

use super::{PAN_RANGE, TILT_RANGE};

/// Eye servo angles for a gaze target.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazeAngles {
    pub pan: u16,
    pub tilt: u16,
}

impl GazeAngles {
    pub fn to_command(&self) -> String {
        format!("E{} T{}", self.pan, self.tilt)
    }
}

/// Maps a pixel in a `width` x `height` frame onto the eye servos.
///
/// The camera image is mirrored relative to the face, so the left edge
/// (`x = 0`) maps to the largest pan angle. Halves round to even.
pub fn gaze_angles(x: i64, y: i64, width: u32, height: u32) -> GazeAngles {
    let width = f64::from(width.max(1));
    let height = f64::from(height.max(1));

    let pan = f64::from(PAN_RANGE.min) + (1.0 - x as f64 / width) * PAN_RANGE.span();
    let tilt = f64::from(TILT_RANGE.min) + (y as f64 / height) * TILT_RANGE.span();

    GazeAngles {
        pan: PAN_RANGE.clamp(pan.round_ties_even() as i64),
        tilt: TILT_RANGE.clamp(tilt.round_ties_even() as i64),
    }
}
