//! Wire models and device command protocol for the Volt hand/face bridge.
//!
//! `models` holds the JSON bodies exchanged with the HTTP bridge and
//! `protocol` turns validated requests into the ASCII lines understood by
//! the hand and face microcontrollers.

pub mod models;
pub mod protocol;
