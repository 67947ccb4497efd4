use serde::{Deserialize, Serialize};

use super::{ResponseStatus, angle};
use crate::protocol::HandPose;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRequest {
    /// Wrist angle, 0-90
    #[serde(default, deserialize_with = "angle::deserialize")]
    pub wrist: Option<i64>,
    /// Finger channel 1, 0-180
    #[serde(default, deserialize_with = "angle::deserialize")]
    pub f1: Option<i64>,
    /// Finger channel 2, 0-180
    #[serde(default, deserialize_with = "angle::deserialize")]
    pub f2: Option<i64>,
    /// Finger channel 3, 0-180
    #[serde(default, deserialize_with = "angle::deserialize")]
    pub f3: Option<i64>,
    /// Finger channel 4, 0-180 (180 = open)
    #[serde(default, deserialize_with = "angle::deserialize")]
    pub f4: Option<i64>,
    /// Finger channel 5, 0-180 (180 = open)
    #[serde(default, deserialize_with = "angle::deserialize")]
    pub f5: Option<i64>,
    /// Finger channel 6, 0-180
    #[serde(default, deserialize_with = "angle::deserialize")]
    pub f6: Option<i64>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandResponse {
    pub status: ResponseStatus,
    pub message: String,
    /// Angles actually sent, after clamping
    pub angles: HandPose,
    pub timestamp: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureRequest {
    /// Gesture name, see `GET /gestures`
    pub gesture: String,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub gesture: String,
    /// Number of poses written to the hand
    pub steps: usize,
    pub timestamp: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureInfo {
    pub name: String,
    pub steps: usize,
}
