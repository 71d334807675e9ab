//! Palettes
//!
//! Byte value to color mapping used when rendering glyphs.

use std::collections::BTreeMap;
use std::path::Path;

use crossterm::style::Color;
use serde::Deserialize;
use thiserror::Error;

/// Palette errors
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("Unknown color: {0}")]
    InvalidColor(String),

    #[error("Invalid byte key: {0}")]
    InvalidKey(String),

    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    #[error("Invalid palette file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PaletteResult<T> = Result<T, PaletteError>;

/// Color and weight for one byte value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub color: Color,
    pub bold: bool,
}

impl Swatch {
    pub fn new(color: Color) -> Self {
        Self { color, bold: false }
    }

    pub fn bold(color: Color) -> Self {
        Self { color, bold: true }
    }
}

/// Byte value to swatch mapping, with an optional default
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: BTreeMap<u8, Swatch>,
    default: Option<Swatch>,
}

impl Palette {
    /// Palette without any entry
    pub fn mono() -> Self {
        Self::default()
    }

    /// Grey NUL, red control bytes, white printable ASCII, green otherwise
    pub fn classic() -> Self {
        let mut palette = Self::default()
            .with(0x00, Swatch::bold(Color::Grey))
            .with(0x7f, Swatch::bold(Color::Red))
            .with_default(Swatch::new(Color::Green));
        for b in 0x01..=0x1f {
            palette.set(b, Swatch::bold(Color::Red));
        }
        for b in 0x20..=0x7e {
            palette.set(b, Swatch::new(Color::White));
        }
        palette
    }

    /// Look up a built-in palette by name
    pub fn builtin(name: &str) -> PaletteResult<Self> {
        match name {
            "classic" => Ok(Self::classic()),
            "mono" | "none" => Ok(Self::mono()),
            other => Err(PaletteError::UnknownPalette(other.to_string())),
        }
    }

    /// Built-in palette name, or a path to a JSON palette file
    pub fn resolve(name_or_path: &str) -> PaletteResult<Self> {
        match Self::builtin(name_or_path) {
            Ok(palette) => Ok(palette),
            Err(_) if Path::new(name_or_path).is_file() => Self::load(name_or_path),
            Err(e) => Err(e),
        }
    }

    /// Load a palette from a JSON file
    pub fn load(path: impl AsRef<Path>) -> PaletteResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a palette from JSON
    ///
    /// ```json
    /// { "default": { "color": "green" },
    ///   "bytes": { "0x00": { "color": "grey", "bold": true },
    ///              "0x01-0x1f": { "color": "#ff0000" } } }
    /// ```
    pub fn from_json(json: &str) -> PaletteResult<Self> {
        let raw: RawPalette = serde_json::from_str(json)?;
        let mut palette = Self::default();
        if let Some(default) = raw.default {
            palette.default = Some(default.resolve()?);
        }
        for (key, swatch) in raw.bytes {
            let swatch = swatch.resolve()?;
            for b in parse_key(&key)? {
                palette.set(b, swatch);
            }
        }
        Ok(palette)
    }

    pub fn with(mut self, b: u8, swatch: Swatch) -> Self {
        self.set(b, swatch);
        self
    }

    pub fn with_default(mut self, swatch: Swatch) -> Self {
        self.default = Some(swatch);
        self
    }

    pub fn set(&mut self, b: u8, swatch: Swatch) {
        self.entries.insert(b, swatch);
    }

    /// Explicit entry for a byte value
    pub fn get(&self, b: u8) -> Option<Swatch> {
        self.entries.get(&b).copied()
    }

    /// Swatch for bytes without an explicit entry
    pub fn default_swatch(&self) -> Option<Swatch> {
        self.default
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.default.is_none()
    }
}

#[derive(Debug, Deserialize)]
struct RawPalette {
    default: Option<RawSwatch>,
    #[serde(default)]
    bytes: BTreeMap<String, RawSwatch>,
}

#[derive(Debug, Deserialize)]
struct RawSwatch {
    color: String,
    #[serde(default)]
    bold: bool,
}

impl RawSwatch {
    fn resolve(&self) -> PaletteResult<Swatch> {
        Ok(Swatch {
            color: parse_color(&self.color)?,
            bold: self.bold,
        })
    }
}

/// Color names as understood by crossterm, or `#rrggbb`
pub fn parse_color(name: &str) -> PaletteResult<Color> {
    if let Some(hex_digits) = name.strip_prefix('#') {
        let rgb = hex::decode(hex_digits).map_err(|_| PaletteError::InvalidColor(name.to_string()))?;
        return match rgb.as_slice() {
            &[r, g, b] => Ok(Color::Rgb { r, g, b }),
            _ => Err(PaletteError::InvalidColor(name.to_string())),
        };
    }
    let normalized = name.to_ascii_lowercase().replace(['-', ' '], "_");
    let normalized = match normalized.as_str() {
        "gray" => "grey".to_string(),
        "dark_gray" => "dark_grey".to_string(),
        _ => normalized,
    };
    Color::try_from(normalized.as_str()).map_err(|_| PaletteError::InvalidColor(name.to_string()))
}

fn parse_key(key: &str) -> PaletteResult<std::ops::RangeInclusive<u8>> {
    let invalid = || PaletteError::InvalidKey(key.to_string());
    let byte = |s: &str| -> PaletteResult<u8> {
        let s = s.trim();
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(digits) => u8::from_str_radix(digits, 16),
            None => s.parse::<u8>(),
        }
        .map_err(|_| invalid())
    };

    match key.split_once('-') {
        Some((start, end)) => {
            let (start, end) = (byte(start)?, byte(end)?);
            if start > end {
                return Err(invalid());
            }
            Ok(start..=end)
        }
        None => {
            let b = byte(key)?;
            Ok(b..=b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_classic_palette() {
        let palette = Palette::classic();
        assert_eq!(palette.get(0x00), Some(Swatch::bold(Color::Grey)));
        assert_eq!(palette.get(0x1b), Some(Swatch::bold(Color::Red)));
        assert_eq!(palette.get(b'A'), Some(Swatch::new(Color::White)));
        assert_eq!(palette.get(0x80), None);
        assert_eq!(palette.default_swatch(), Some(Swatch::new(Color::Green)));
    }

    #[test]
    fn test_builtin_lookup() {
        assert!(Palette::builtin("mono").unwrap().is_empty());
        assert!(matches!(
            Palette::builtin("neon"),
            Err(PaletteError::UnknownPalette(_))
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r##"{
            "default": { "color": "green" },
            "bytes": {
                "0x00": { "color": "grey", "bold": true },
                "0x01-0x03": { "color": "#ff8000" },
                "200": { "color": "dark-blue" }
            }
        }"##;
        let palette = Palette::from_json(json).unwrap();
        assert_eq!(palette.get(0), Some(Swatch::bold(Color::Grey)));
        assert_eq!(palette.get(2), Some(Swatch::new(Color::Rgb { r: 255, g: 128, b: 0 })));
        assert_eq!(palette.get(4), None);
        assert_eq!(palette.get(200), Some(Swatch::new(Color::DarkBlue)));
        assert_eq!(palette.default_swatch(), Some(Swatch::new(Color::Green)));
    }

    #[test]
    fn test_invalid_entries() {
        assert!(matches!(
            Palette::from_json(r#"{"bytes": {"0x00": {"color": "chartreuse"}}}"#),
            Err(PaletteError::InvalidColor(_))
        ));
        assert!(matches!(
            Palette::from_json(r#"{"bytes": {"0x1ff": {"color": "red"}}}"#),
            Err(PaletteError::InvalidKey(_))
        ));
        assert!(matches!(
            Palette::from_json(r#"{"bytes": {"9-3": {"color": "red"}}}"#),
            Err(PaletteError::InvalidKey(_))
        ));
        assert!(matches!(Palette::from_json("[]"), Err(PaletteError::Json(_))));
    }

    #[test]
    fn test_resolve_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"bytes": {{"0xff": {{"color": "magenta"}}}}}}"#).unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let palette = Palette::resolve(&path).unwrap();
        assert_eq!(palette.get(0xff), Some(Swatch::new(Color::Magenta)));

        assert!(Palette::resolve("classic").is_ok());
        assert!(Palette::resolve("/nonexistent/palette.json").is_err());
    }
}
