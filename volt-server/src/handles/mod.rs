mod camera_handle;
mod debug_handle;
mod extract;
mod face_handle;
mod hand_handle;
mod status_handle;

pub use camera_handle::*;
pub use debug_handle::*;
pub use extract::*;
pub use face_handle::*;
pub use hand_handle::*;
pub use status_handle::*;

use time::OffsetDateTime;

/// Current Unix time in fractional seconds.
pub fn unix_timestamp() -> f64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as f64 / 1e9
}

pub(crate) fn sent_message(ack: Option<String>) -> String {
    match ack {
        Some(ack) => format!("Command sent, device replied: {ack}"),
        None => "Command sent".to_string(),
    }
}
