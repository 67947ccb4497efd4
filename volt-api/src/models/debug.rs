use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugTarget {
    #[default]
    Hand,
    Face,
}

impl fmt::Display for DebugTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DebugTarget::Hand => write!(f, "hand"),
            DebugTarget::Face => write!(f, "face"),
        }
    }
}

/// Raw line forwarded to one of the microcontrollers untouched.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugSendRequest {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub target: DebugTarget,
}
