//! Configuration
//!
//! User settings read from `config.json` in the platform config
//! directory. Every field is optional in the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{ByteOrder, RenderOptions, TextEncoding};
use crate::color::palette::{Palette, PaletteError};
use crate::color::ColorMode;
use crate::input::Conversion;

const APP_DIR: &str = "bytes-as-braille";
const CONFIG_FILE: &str = "config.json";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub byte_order: ByteOrder,
    pub encoding: TextEncoding,
    pub show_ascii: bool,
    pub colorblind: bool,
    pub rainbow: bool,
    /// Built-in palette name or path to a palette file
    pub palette: String,
    /// Overrides terminal detection
    pub color_mode: Option<ColorMode>,
    /// Write a JSON trace log
    pub logs: bool,
    /// Trace level name such as "info" or "trace"
    pub log_level: Option<String>,
    /// Trace log destination, defaults to the temp directory
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Big,
            encoding: TextEncoding::Utf8,
            show_ascii: false,
            colorblind: false,
            rainbow: true,
            palette: "classic".to_string(),
            color_mode: None,
            logs: false,
            log_level: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Default config file location, if the platform has one
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location; a missing file gives defaults
    pub fn load() -> ConfigResult<Self> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            encoding: Some(self.encoding),
            byte_order: self.byte_order,
            show_ascii: self.show_ascii,
            colorblind: self.colorblind,
            rainbow: self.rainbow,
        }
    }

    pub fn conversion(&self) -> Conversion {
        Conversion {
            byte_order: self.byte_order,
            encoding: self.encoding,
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        if self.colorblind {
            return ColorMode::None;
        }
        self.color_mode.unwrap_or_else(ColorMode::detect)
    }

    pub fn palette(&self) -> ConfigResult<Palette> {
        Ok(Palette::resolve(&self.palette)?)
    }
}
