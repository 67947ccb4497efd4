use core::fmt;
use core::str::FromStr;
use core::time::Duration;

use super::{HandPose, UnknownPreset};
use crate::models::GestureInfo;

/// Pause between consecutive poses of a gesture.
pub const GESTURE_STEP_DELAY: Duration = Duration::from_millis(400);

const FIST: HandPose = HandPose::new(0, 180, 180, 180, 0, 0, 180);
const WAVE_OUT: HandPose = HandPose::new(50, 0, 0, 180, 180, 180, 0);
const WAVE_IN: HandPose = HandPose::new(0, 0, 0, 180, 180, 180, 0);
const OK: HandPose = HandPose::new(0, 180, 180, 180, 0, 180, 0);
const THUMBS_UP: HandPose = HandPose::new(0, 180, 180, 180, 180, 180, 0);
const POINT: HandPose = HandPose::new(0, 180, 180, 180, 180, 0, 180);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Open,
    Fist,
    Wave,
    Ok,
    ThumbsUp,
    Point,
}

impl Gesture {
    pub const ALL: [Gesture; 6] = [
        Gesture::Open,
        Gesture::Fist,
        Gesture::Wave,
        Gesture::Ok,
        Gesture::ThumbsUp,
        Gesture::Point,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Open => "open",
            Gesture::Fist => "fist",
            Gesture::Wave => "wave",
            Gesture::Ok => "ok",
            Gesture::ThumbsUp => "thumbs_up",
            Gesture::Point => "point",
        }
    }

    pub fn steps(&self) -> &'static [HandPose] {
        match self {
            Gesture::Open => &[HandPose::OPEN],
            Gesture::Fist => &[FIST],
            Gesture::Wave => &[WAVE_OUT, WAVE_IN, WAVE_OUT, WAVE_IN, WAVE_OUT, WAVE_IN],
            Gesture::Ok => &[OK],
            Gesture::ThumbsUp => &[THUMBS_UP],
            Gesture::Point => &[POINT],
        }
    }

    pub fn info(&self) -> GestureInfo {
        GestureInfo {
            name: self.name().to_string(),
            steps: self.steps().len(),
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gesture {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gesture::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset {
                kind: "gesture",
                name: s.to_string(),
            })
    }
}
