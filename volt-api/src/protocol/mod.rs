//! Command translation for the hand and face microcontrollers.
//!
//! Everything here is pure: requests are clamped into the safe servo ranges
//! and rendered as the single ASCII lines the firmware parses. Line
//! terminators are added by the device link, not here.

mod face;
mod gesture;
mod hand;
mod look;

pub use face::*;
pub use gesture::*;
pub use hand::*;
pub use look::*;

use core::fmt;

/// Closed range of a servo channel in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoRange {
    pub min: u16,
    pub max: u16,
}

impl ServoRange {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Saturates `value` into the range. Never fails.
    pub fn clamp(&self, value: i64) -> u16 {
        value.clamp(self.min as i64, self.max as i64) as u16
    }

    pub fn span(&self) -> f64 {
        f64::from(self.max - self.min)
    }
}

pub const WRIST_RANGE: ServoRange = ServoRange::new(0, 90);
pub const FINGER_RANGE: ServoRange = ServoRange::new(0, 180);

pub const EYES_RANGE: ServoRange = ServoRange::new(70, 110);
pub const EYES_CENTER: u16 = 90;
pub const MOUTH_RANGE: ServoRange = ServoRange::new(0, 80);

pub const PAN_RANGE: ServoRange = ServoRange::new(70, 110);
pub const TILT_RANGE: ServoRange = ServoRange::new(60, 100);

/// Reference frame the eye-tracking coordinates are expressed in.
pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;

/// Lookup of a preset name that is not in its closed table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset {
    pub kind: &'static str,
    pub name: String,
}

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.name)
    }
}

impl std::error::Error for UnknownPreset {}
