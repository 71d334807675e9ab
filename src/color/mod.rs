//! Terminal Colors
//!
//! Color-capability detection and the colorizer used to style glyphs.
//! The backend is chosen once; rendering code only sees [`Colorizer`].

pub mod palette;

use std::env;
use std::fmt;
use std::str::FromStr;

use crossterm::style::{Color, Stylize};
use serde::{Deserialize, Serialize};

/// Color mode capabilities of the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// 24-bit true color
    #[default]
    TrueColor,
    /// 256 color mode
    Color256,
    /// Basic 16 ANSI colors
    Ansi16,
    /// No color support
    None,
}

impl ColorMode {
    /// Detect the terminal's color capabilities from environment variables
    pub fn detect() -> Self {
        // https://no-color.org/
        if env::var_os("NO_COLOR").is_some() {
            return Self::None;
        }

        if let Ok(colorterm) = env::var("COLORTERM") {
            if colorterm == "truecolor" || colorterm == "24bit" {
                return Self::TrueColor;
            }
        }

        if let Ok(program) = env::var("TERM_PROGRAM") {
            let program = program.to_lowercase();
            if matches!(program.as_str(), "vscode" | "wezterm" | "iterm.app" | "warpterminal") {
                return Self::TrueColor;
            }
        }

        match env::var("TERM") {
            Ok(term) if term == "dumb" => Self::None,
            Ok(term) if term.contains("256color") || term.contains("256-color") => Self::Color256,
            _ => Self::Ansi16,
        }
    }

    pub fn supports_color(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Resolve the colorizer backend for this mode
    pub fn colorizer(self) -> Box<dyn Colorizer> {
        tracing::debug!(mode = %self, "colorizer selected");
        match self {
            Self::None => Box::new(PlainColorizer),
            mode => Box::new(AnsiColorizer { mode }),
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "truecolor" | "24bit" => Ok(Self::TrueColor),
            "256" | "color256" => Ok(Self::Color256),
            "ansi" | "ansi16" | "16" => Ok(Self::Ansi16),
            "none" | "off" => Ok(Self::None),
            other => Err(format!("unknown color mode: {other}")),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrueColor => write!(f, "truecolor"),
            Self::Color256 => write!(f, "256"),
            Self::Ansi16 => write!(f, "ansi"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Styling capability injected into the renderer
///
/// Absence of color is never an error: [`PlainColorizer`] returns the
/// text unchanged.
pub trait Colorizer: Send + Sync {
    /// Style `text` with a foreground color, optionally bold
    fn style(&self, text: &str, color: Color, bold: bool) -> String;

    /// Whether this backend emits any styling at all
    fn enabled(&self) -> bool {
        true
    }
}

/// ANSI escape backend, downsampling colors to what the terminal supports
#[derive(Debug, Clone, Copy)]
pub struct AnsiColorizer {
    mode: ColorMode,
}

impl AnsiColorizer {
    pub fn new(mode: ColorMode) -> Self {
        Self { mode }
    }

    fn adapt(&self, color: Color) -> Color {
        match (self.mode, color) {
            (ColorMode::Color256, Color::Rgb { r, g, b }) => Color::AnsiValue(rgb_to_256(r, g, b)),
            (ColorMode::Ansi16, Color::Rgb { r, g, b }) => rgb_to_ansi16(r, g, b),
            (_, color) => color,
        }
    }
}

impl Colorizer for AnsiColorizer {
    fn style(&self, text: &str, color: Color, bold: bool) -> String {
        let styled = text.with(self.adapt(color));
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }
}

/// Passthrough backend
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainColorizer;

impl Colorizer for PlainColorizer {
    fn style(&self, text: &str, _color: Color, _bold: bool) -> String {
        text.to_string()
    }

    fn enabled(&self) -> bool {
        false
    }
}

/// Color with hue `byte / 255` at full saturation and value
pub fn rainbow(byte: u8) -> Color {
    let (r, g, b) = hsv_to_rgb(f64::from(byte) / 255.0, 1.0, 1.0);
    Color::Rgb {
        r: (r * 255.0) as u8,
        g: (g * 255.0) as u8,
        b: (b * 255.0) as u8,
    }
}

/// HSV to RGB, all components in `0.0..=1.0`
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Convert a 24-bit RGB color to the closest ANSI 256 color
pub fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        // grey ramp ends at 238 (index 255)
        if r > 238 {
            return 231;
        }
        return ((u16::from(r) - 8) / 10 + 232) as u8;
    }

    let r_idx = (u16::from(r) * 5 / 255) as u8;
    let g_idx = (u16::from(g) * 5 / 255) as u8;
    let b_idx = (u16::from(b) * 5 / 255) as u8;

    16 + 36 * r_idx + 6 * g_idx + b_idx
}

/// Convert a 24-bit RGB color to the nearest of the 16 named ANSI colors
pub fn rgb_to_ansi16(r: u8, g: u8, b: u8) -> Color {
    const NAMED: [(Color, (i32, i32, i32)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Red, (255, 0, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::Yellow, (255, 255, 0)),
        (Color::Blue, (0, 0, 255)),
        (Color::Magenta, (255, 0, 255)),
        (Color::Cyan, (0, 255, 255)),
        (Color::White, (255, 255, 255)),
    ];

    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    NAMED
        .iter()
        .min_by_key(|(_, (nr, ng, nb))| (r - nr).pow(2) + (g - ng).pow(2) + (b - nb).pow(2))
        .map(|(color, _)| *color)
        .unwrap_or(Color::White)
}
