use serde::{Deserialize, Serialize};

use super::{ResponseStatus, angle};
use crate::protocol::GazeAngles;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRequest {
    /// Eye pan angle, 70-110
    #[serde(default, deserialize_with = "angle::deserialize")]
    pub eyes: Option<i64>,
    /// Mouth opening, 0-80
    #[serde(default, deserialize_with = "angle::deserialize")]
    pub mouth: Option<i64>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpressionRequest {
    /// Expression name, see `GET /expressions`
    #[serde(default)]
    pub expression: String,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub expression: String,
    pub timestamp: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionInfo {
    pub name: String,
    pub eyes: u16,
    pub mouth: u16,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookRequest {
    /// Horizontal pixel in a 640x480 frame, defaults to 320
    #[serde(default, deserialize_with = "angle::deserialize")]
    pub x: Option<i64>,
    /// Vertical pixel in a 640x480 frame, defaults to 240
    #[serde(default, deserialize_with = "angle::deserialize")]
    pub y: Option<i64>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookResponse {
    pub status: ResponseStatus,
    pub angles: GazeAngles,
    pub message: String,
}
