//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the neon-config.toml
//! file. It covers the clock zone and date style, the display surface and layout
//! ratios, and the text style template used for measuring and drawing.

use crate::style::TextStyle;
use crate::ticker::{parse_zone, ClockError, DateStyle};
use crate::FitBox;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "neon-config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config IO: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config format: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration loaded from neon-config.toml
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Timezone and date formatting
    #[serde(default)]
    pub clock: ClockConfig,
    /// Surface size and layout
    #[serde(default)]
    pub display: DisplayConfig,
    /// Font template
    #[serde(default)]
    pub style: StyleConfig,
}

/// Clock configuration. Exactly one zone per running instance.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClockConfig {
    /// IANA timezone identifier (e.g. "Asia/Tokyo")
    pub zone: String,
    /// Date line language
    pub date_style: DateStyle,
}

/// Display surface and layout configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Share of the surface width text may use
    pub width_ratio: f32,
    /// Share of the surface height the time may use
    pub height_ratio: f32,
    /// Space reserved above the text column, in pixels
    pub top_padding: u32,
    /// Gap between the date and the time, in pixels
    pub line_spacing: u32,
}

/// Font template settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StyleConfig {
    pub family: String,
    pub weight: u16,
    pub letter_spacing: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            zone: "Asia/Tokyo".to_string(),
            date_style: DateStyle::Japanese,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 1080,  // Portrait phone panel
            height: 2400, // Portrait phone panel
            width_ratio: 0.94,
            height_ratio: 0.72,
            top_padding: 32,
            line_spacing: 12,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            family: "Inter".to_string(),
            weight: 700,
            letter_spacing: 0.0,
        }
    }
}

impl ClockConfig {
    /// Resolve the configured zone. Fails for unknown identifiers.
    pub fn zone(&self) -> Result<Tz, ClockError> {
        parse_zone(&self.zone)
    }
}

impl DisplayConfig {
    /// The whole surface as a box.
    pub fn surface(&self) -> FitBox {
        FitBox::new(self.width as f32, self.height as f32)
    }
}

impl StyleConfig {
    /// Text style template; the size is filled in by the sizer.
    pub fn template(&self) -> TextStyle {
        TextStyle {
            family: self.family.clone(),
            weight: self.weight,
            letter_spacing: self.letter_spacing,
            ..TextStyle::default()
        }
    }
}

impl Config {
    /// Load configuration from neon-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_path(&path) {
            Ok(config) => {
                info!(zone = %config.clock.zone, "loaded configuration");
                config
            }
            Err(ConfigError::Io(_)) => {
                info!("no config file found, using default configuration (Asia/Tokyo)");
                Self::default()
            }
            Err(e) => {
                warn!("{e}");
                warn!("using default configuration (Asia/Tokyo)");
                Self::default()
            }
        }
    }

    /// Load configuration from specified path, reporting any failure
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str::<Config>(&contents)?)
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}
