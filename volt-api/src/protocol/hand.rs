use core::fmt;

use serde::{Deserialize, Serialize};

use super::{FINGER_RANGE, WRIST_RANGE};
use crate::models::HandRequest;

/// Seven clamped joint angles, in wire order.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandPose {
    pub wrist: u16,
    pub f1: u16,
    pub f2: u16,
    pub f3: u16,
    pub f4: u16,
    pub f5: u16,
    pub f6: u16,
}

impl HandPose {
    /// Fully open hand. f4 and f5 are mounted inverted, 180 is open.
    pub const OPEN: HandPose = HandPose::new(0, 0, 0, 0, 180, 180, 0);

    pub const fn new(wrist: u16, f1: u16, f2: u16, f3: u16, f4: u16, f5: u16, f6: u16) -> Self {
        Self {
            wrist,
            f1,
            f2,
            f3,
            f4,
            f5,
            f6,
        }
    }

    /// Fills absent channels from [`HandPose::OPEN`] and clamps the rest.
    pub fn from_request(req: &HandRequest) -> Self {
        let finger = |value: Option<i64>, default: u16| {
            value.map_or(default, |v| FINGER_RANGE.clamp(v))
        };

        Self {
            wrist: req
                .wrist
                .map_or(Self::OPEN.wrist, |v| WRIST_RANGE.clamp(v)),
            f1: finger(req.f1, Self::OPEN.f1),
            f2: finger(req.f2, Self::OPEN.f2),
            f3: finger(req.f3, Self::OPEN.f3),
            f4: finger(req.f4, Self::OPEN.f4),
            f5: finger(req.f5, Self::OPEN.f5),
            f6: finger(req.f6, Self::OPEN.f6),
        }
    }

    pub fn channels(&self) -> [u16; 7] {
        [
            self.wrist, self.f1, self.f2, self.f3, self.f4, self.f5, self.f6,
        ]
    }

    pub fn to_command(&self) -> String {
        self.to_string()
    }
}

impl Default for HandPose {
    fn default() -> Self {
        Self::OPEN
    }
}

impl fmt::Display for HandPose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [wrist, f1, f2, f3, f4, f5, f6] = self.channels();
        write!(f, "{wrist},{f1},{f2},{f3},{f4},{f5},{f6}")
    }
}
