use std::env;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

/// Serial parameters of one microcontroller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSettings {
    pub port_path: String,
    pub baud_rate: u32,
    /// The boards reset when the port opens; nothing is written before this elapses.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_ack_wait_ms")]
    pub ack_wait_ms: u64,
    #[serde(default = "default_probe_wait_ms")]
    pub probe_wait_ms: u64,
}

impl LinkSettings {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn ack_wait(&self) -> Duration {
        Duration::from_millis(self.ack_wait_ms)
    }

    pub fn probe_wait(&self) -> Duration {
        Duration::from_millis(self.probe_wait_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraBackendKind {
    V4l,
    Synthetic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    pub backend: CameraBackendKind,
    pub index: u32,
    #[serde(default)]
    pub fallback_indices: Vec<u32>,
    pub capture_width: u32,
    pub capture_height: u32,
    pub capture_fps: u32,
    /// Size frames are stored and served at.
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_interval_ms: u64,
    pub stream_interval_ms: u64,
    pub stream_quality: u8,
    pub snapshot_quality: u8,
    pub open_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl CameraSettings {
    /// Primary index first, then the fallbacks, without repeats.
    pub fn candidate_indices(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.fallback_indices.len() + 1);
        for index in std::iter::once(self.index).chain(self.fallback_indices.iter().copied()) {
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        indices
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms.max(1))
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub hand: LinkSettings,
    pub face: LinkSettings,
    pub camera: CameraSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let settings: Settings = Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("VOLT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("camera.fallback_indices")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, link) in [("hand", &self.hand), ("face", &self.face)] {
            if link.port_path.trim().is_empty() {
                return Err(ConfigError::Message(format!("{name}.port_path is empty")));
            }
            if link.baud_rate == 0 {
                return Err(ConfigError::Message(format!("{name}.baud_rate must be positive")));
            }
        }

        let camera = &self.camera;
        if camera.frame_width == 0 || camera.frame_height == 0 {
            return Err(ConfigError::Message("camera frame size must be positive".into()));
        }
        if !(1..=100).contains(&camera.stream_quality) || !(1..=100).contains(&camera.snapshot_quality) {
            return Err(ConfigError::Message("camera JPEG quality must be within 1-100".into()));
        }
        if camera.open_attempts == 0 {
            return Err(ConfigError::Message("camera.open_attempts must be positive".into()));
        }

        Ok(())
    }
}

fn default_settle_ms() -> u64 {
    2000
}

fn default_ack_wait_ms() -> u64 {
    150
}

fn default_probe_wait_ms() -> u64 {
    600
}
