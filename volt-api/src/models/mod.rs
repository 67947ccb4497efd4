mod debug;
mod face;
mod hand;
mod system;

pub use debug::*;
pub use face::*;
pub use hand::*;
pub use system::*;

use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
    Ok,
    Healthy,
}

/// Lenient angle decoding for request bodies.
///
/// Clients send integers, floats or numeric strings. Floats are truncated
/// toward zero and anything beyond the `i64` range saturates, so clamping
/// later always sees a well-defined value.
pub(crate) mod angle {
    use serde::de::{self, Deserializer, Error as _};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAngle {
        Int(i64),
        Float(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawAngle>::deserialize(deserializer)?;

        raw.map(|value| match value {
            RawAngle::Int(v) => Ok(v),
            RawAngle::Float(v) => from_float(v),
            RawAngle::Text(text) => {
                let text = text.trim();
                match text.parse::<i64>() {
                    Ok(v) => Ok(v),
                    Err(_) => text
                        .parse::<f64>()
                        .map_err(|_| D::Error::custom(format!("invalid angle: {text:?}")))
                        .and_then(from_float::<D::Error>),
                }
            }
        })
        .transpose()
    }

    fn from_float<E: de::Error>(value: f64) -> Result<i64, E> {
        if value.is_finite() {
            // `as` saturates at the i64 bounds
            Ok(value.trunc() as i64)
        } else {
            Err(E::custom("angle must be a finite number"))
        }
    }
}
