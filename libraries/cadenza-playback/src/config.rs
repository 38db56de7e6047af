/// Player configuration
use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the playback manager
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Canonical media file extension used to resolve playable URLs (default: "mp3")
    #[serde(default = "default_media_extension")]
    pub media_extension: String,

    /// Progress ticks per second (default: 5)
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Volume used when nothing has been persisted yet (0-100, default: 30)
    #[serde(default = "default_volume")]
    pub default_volume: u8,

    /// Fixed seed for shuffle selection; entropy-seeded when unset
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            media_extension: default_media_extension(),
            fps: default_fps(),
            default_volume: default_volume(),
            shuffle_seed: None,
        }
    }
}

impl PlayerConfig {
    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables are prefixed with `CADENZA_` and override file
    /// values, e.g. `CADENZA_MEDIA_EXTENSION=ogg`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(PlaybackError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENZA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(PlaybackError::Config("fps must be at least 1".to_string()));
        }

        if self.media_extension.trim_start_matches('.').is_empty() {
            return Err(PlaybackError::Config(
                "media_extension must not be empty".to_string(),
            ));
        }

        if self.default_volume > 100 {
            return Err(PlaybackError::Config(format!(
                "default_volume must be 0-100, got {}",
                self.default_volume
            )));
        }

        Ok(())
    }

    /// Interval between progress ticks
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }

    /// Seconds added to the current time per tick
    pub fn tick_step(&self) -> f64 {
        1.0 / f64::from(self.fps.max(1))
    }
}

fn default_media_extension() -> String {
    "mp3".to_string()
}

fn default_fps() -> u32 {
    5
}

fn default_volume() -> u8 {
    30
}
