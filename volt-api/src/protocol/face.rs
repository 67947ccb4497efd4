use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{EYES_CENTER, EYES_RANGE, MOUTH_RANGE, UnknownPreset};
use crate::models::{ExpressionInfo, FaceRequest};

/// Partial face update. Only present fields are sent to the firmware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceCommand {
    pub eyes: Option<u16>,
    pub mouth: Option<u16>,
}

impl FaceCommand {
    pub fn from_request(req: &FaceRequest) -> Self {
        Self {
            eyes: req.eyes.map(|v| EYES_RANGE.clamp(v)),
            mouth: req.mouth.map(|v| MOUTH_RANGE.clamp(v)),
        }
    }

    /// `E<eyes> M<mouth>` with absent tokens dropped, `None` when empty.
    pub fn to_command(&self) -> Option<String> {
        let tokens: Vec<String> = [
            self.eyes.map(|v| format!("E{v}")),
            self.mouth.map(|v| format!("M{v}")),
        ]
        .into_iter()
        .flatten()
        .collect();

        (!tokens.is_empty()).then(|| tokens.join(" "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacePose {
    pub eyes: u16,
    pub mouth: u16,
}

impl FacePose {
    pub const NEUTRAL: FacePose = FacePose {
        eyes: EYES_CENTER,
        mouth: 0,
    };

    pub fn to_command(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FacePose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "E{} M{}", self.eyes, self.mouth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expression {
    Neutral,
    Happy,
    Surprise,
    Sad,
    Blink,
    Angry,
    Talking,
}

impl Expression {
    pub const ALL: [Expression; 7] = [
        Expression::Neutral,
        Expression::Happy,
        Expression::Surprise,
        Expression::Sad,
        Expression::Blink,
        Expression::Angry,
        Expression::Talking,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Expression::Neutral => "neutral",
            Expression::Happy => "happy",
            Expression::Surprise => "surprise",
            Expression::Sad => "sad",
            Expression::Blink => "blink",
            Expression::Angry => "angry",
            Expression::Talking => "talking",
        }
    }

    pub fn pose(&self) -> FacePose {
        let (eyes, mouth) = match self {
            Expression::Neutral => return FacePose::NEUTRAL,
            Expression::Happy => (85, 60),
            Expression::Surprise => (110, 40),
            Expression::Sad => (70, 20),
            Expression::Blink => (100, 0),
            Expression::Angry => (75, 10),
            Expression::Talking => (90, 60),
        };
        FacePose { eyes, mouth }
    }

    pub fn info(&self) -> ExpressionInfo {
        let pose = self.pose();
        ExpressionInfo {
            name: self.name().to_string(),
            eyes: pose.eyes,
            mouth: pose.mouth,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Expression {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset {
                kind: "expression",
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_command_omits_absent_fields() {
        let eyes_only = FaceCommand::from_request(&FaceRequest {
            eyes: Some(85),
            mouth: None,
        });
        assert_eq!(eyes_only.to_command().as_deref(), Some("E85"));

        let mouth_only = FaceCommand::from_request(&FaceRequest {
            eyes: None,
            mouth: Some(60),
        });
        assert_eq!(mouth_only.to_command().as_deref(), Some("M60"));

        assert_eq!(FaceCommand::default().to_command(), None);
    }

    #[test]
    fn test_face_command_clamps() {
        let cmd = FaceCommand::from_request(&FaceRequest {
            eyes: Some(10),
            mouth: Some(500),
        });
        assert_eq!(cmd.to_command().as_deref(), Some("E70 M80"));
    }

    #[test]
    fn test_expression_lookup_is_case_insensitive() {
        assert_eq!("HaPpY".parse::<Expression>(), Ok(Expression::Happy));
        assert_eq!(Expression::Happy.pose().to_command(), "E85 M60");
        assert_eq!(Expression::Neutral.pose().to_command(), "E90 M0");

        let err = "ecstatic".parse::<Expression>().unwrap_err();
        assert_eq!(err.to_string(), "unknown expression: ecstatic");
    }

    #[test]
    fn test_expression_poses_stay_in_range() {
        for expression in Expression::ALL {
            let pose = expression.pose();
            assert_eq!(EYES_RANGE.clamp(pose.eyes.into()), pose.eyes);
            assert_eq!(MOUTH_RANGE.clamp(pose.mouth.into()), pose.mouth);
        }
    }
}
