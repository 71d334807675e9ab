//! Input Modes
//!
//! Modal state for the byte input prompt and the per-mode conversion of
//! the edit buffer to bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::integer::literal_to_bytes;
use crate::codec::{decode, ByteOrder, CodecResult, TextEncoding};

/// How the edit buffer becomes bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Integers become bytes, glyphs become their byte values
    #[default]
    Default,
    /// Text is taken literally, no numeric interpretation
    Integer,
    /// Integers become bytes, glyphs are kept as UTF-8 text
    Braille,
}

impl InputMode {
    /// Get mode indicator for the menu and logs
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Default => "STD",
            Self::Integer => "INT",
            Self::Braille => "BRAILLE",
        }
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" | "std" | "s" => Ok(Self::Default),
            "integer" | "int" | "i" => Ok(Self::Integer),
            "braille" | "b" => Ok(Self::Braille),
            other => Err(format!("unknown input mode: {other}")),
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.indicator())
    }
}

/// Prompt shown for each mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub default: String,
    pub integer: String,
    pub braille: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            default: ">⠝> ".to_string(),
            integer: ">⠊> ".to_string(),
            braille: ">⠃> ".to_string(),
        }
    }
}

impl Prompts {
    /// Custom prompt for the default mode, stock prompts otherwise
    pub fn with_default(prompt: impl Into<String>) -> Self {
        Self {
            default: prompt.into(),
            ..Self::default()
        }
    }

    pub fn for_mode(&self, mode: InputMode) -> &str {
        match mode {
            InputMode::Default => &self.default,
            InputMode::Integer => &self.integer,
            InputMode::Braille => &self.braille,
        }
    }
}

/// Buffer to bytes conversion settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Conversion {
    /// Byte order of integer literals
    pub byte_order: ByteOrder,
    /// Encoding for characters that are not glyphs
    pub encoding: TextEncoding,
}

impl Conversion {
    /// Convert buffer text to bytes according to `mode`
    pub fn convert(&self, mode: InputMode, text: &str) -> CodecResult<Vec<u8>> {
        match mode {
            InputMode::Default => match literal_to_bytes(text, self.byte_order) {
                Ok(bytes) => Ok(bytes),
                Err(_) => decode(text, ByteOrder::Big, self.encoding),
            },
            InputMode::Integer => Ok(text.as_bytes().to_vec()),
            InputMode::Braille => {
                Ok(literal_to_bytes(text, self.byte_order).unwrap_or_else(|_| text.as_bytes().to_vec()))
            }
        }
    }

    /// Best-effort conversion for live preview
    pub fn preview(&self, mode: InputMode, text: &str) -> Vec<u8> {
        self.convert(mode, text).unwrap_or_else(|_| text.as_bytes().to_vec())
    }
}

/// Stage of an input session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Editing,
    /// Waiting for the key after Ctrl-D
    ModeMenu,
    Done,
    Aborted,
}

/// Mode state with associated data
#[derive(Debug, Clone)]
pub struct ModeState {
    pub mode: InputMode,
    pub stage: Stage,
    /// Append/remove-from-end only
    pub buffer: String,
}

impl Default for ModeState {
    fn default() -> Self {
        Self::new(InputMode::Default)
    }
}

impl ModeState {
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            stage: Stage::Editing,
            buffer: String::new(),
        }
    }

    /// Switch mode and go back to editing, keeping the buffer
    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        self.stage = Stage::Editing;
    }

    pub fn open_menu(&mut self) {
        self.stage = Stage::ModeMenu;
    }

    pub fn resume(&mut self) {
        self.stage = Stage::Editing;
    }

    pub fn push_char(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn push_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    /// Remove the last character, if any
    pub fn delete_char(&mut self) {
        self.buffer.pop();
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    pub fn get_buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.stage, Stage::Done | Stage::Aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;

    #[test]
    fn test_default_mode_integers() {
        let conv = Conversion::default();
        assert_eq!(conv.convert(InputMode::Default, "123").unwrap(), vec![0x7b]);
        assert_eq!(conv.convert(InputMode::Default, "0xdead").unwrap(), vec![0xde, 0xad]);
    }

    #[test]
    fn test_default_mode_glyph_fallback() {
        let conv = Conversion::default();
        assert_eq!(conv.convert(InputMode::Default, "⣿⠀a").unwrap(), vec![0xff, 0x00, b'a']);
        // negative integers fall back to text
        assert_eq!(conv.convert(InputMode::Default, "-1").unwrap(), b"-1".to_vec());
        assert_eq!(conv.convert(InputMode::Default, "").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_default_mode_little_endian() {
        let conv = Conversion {
            byte_order: ByteOrder::Little,
            ..Default::default()
        };
        assert_eq!(conv.convert(InputMode::Default, "256").unwrap(), vec![0x01, 0x00]);
        // glyphs are always read in big order here
        assert_eq!(conv.convert(InputMode::Default, "⢀⠠").unwrap(), vec![0x01, 0x02]);
    }

    #[test]
    fn test_integer_mode_is_literal() {
        let conv = Conversion::default();
        assert_eq!(conv.convert(InputMode::Integer, "5").unwrap(), b"5".to_vec());
        assert_eq!(conv.convert(InputMode::Integer, "⣿").unwrap(), "⣿".as_bytes().to_vec());
    }

    #[test]
    fn test_braille_mode() {
        let conv = Conversion::default();
        assert_eq!(conv.convert(InputMode::Braille, "65").unwrap(), vec![0x41]);
        assert_eq!(conv.convert(InputMode::Braille, "⣿").unwrap(), "⣿".as_bytes().to_vec());
        assert_eq!(conv.convert(InputMode::Braille, "-7").unwrap(), b"-7".to_vec());
    }

    #[test]
    fn test_preview_never_fails() {
        let conv = Conversion {
            encoding: TextEncoding::Ascii,
            ..Default::default()
        };
        assert!(matches!(
            conv.convert(InputMode::Default, "é"),
            Err(CodecError::Decode { ch: 'é', .. })
        ));
        assert_eq!(conv.preview(InputMode::Default, "é"), "é".as_bytes().to_vec());
    }

    #[test]
    fn test_mode_transitions() {
        let mut state = ModeState::new(InputMode::Default);
        state.push_str("12");

        state.open_menu();
        assert_eq!(state.stage, Stage::ModeMenu);

        state.set_mode(InputMode::Integer);
        assert_eq!(state.mode, InputMode::Integer);
        assert_eq!(state.stage, Stage::Editing);
        assert_eq!(state.get_buffer(), "12");
    }

    #[test]
    fn test_delete_on_empty_buffer() {
        let mut state = ModeState::default();
        state.delete_char();
        assert_eq!(state.get_buffer(), "");

        state.push_char('⣿');
        state.push_char('a');
        state.delete_char();
        assert_eq!(state.get_buffer(), "⣿");
    }

    #[test]
    fn test_prompts() {
        let prompts = Prompts::with_default("bytes? ");
        assert_eq!(prompts.for_mode(InputMode::Default), "bytes? ");
        assert_eq!(prompts.for_mode(InputMode::Integer), ">⠊> ");
        assert_eq!(Prompts::default().for_mode(InputMode::Braille), ">⠃> ");
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("int".parse::<InputMode>().unwrap(), InputMode::Integer);
        assert_eq!("braille".parse::<InputMode>().unwrap(), InputMode::Braille);
        assert!("hex".parse::<InputMode>().is_err());
    }
}
