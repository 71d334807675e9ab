//! Binary Clock
//!
//! A formatted timestamp where every decimal digit is drawn as the glyph
//! of its value.

use std::fmt::Write;

use chrono::{DateTime, Local, TimeZone};
use thiserror::Error;

use crate::codec::Renderer;

pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ClockError {
    #[error("Invalid time format: {0:?}")]
    InvalidFormat(String),
}

pub type ClockResult<T> = Result<T, ClockError>;

/// Render `time` with `format`, digits as glyphs, anything else as is
pub fn render_clock<Tz>(time: &DateTime<Tz>, format: &str, renderer: &Renderer) -> ClockResult<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut text = String::new();
    write!(text, "{}", time.format(format)).map_err(|_| ClockError::InvalidFormat(format.to_string()))?;

    let glyphs = renderer.glyphs_only();
    let mut out = String::with_capacity(text.len() * 3);
    for c in text.chars() {
        match c.to_digit(10) {
            Some(d) => out.push_str(&glyphs.render(&[d as u8])),
            None => out.push(c),
        }
    }
    Ok(out)
}

/// Current local time as a binary clock
pub fn binary_clock(format: &str, renderer: &Renderer) -> ClockResult<String> {
    render_clock(&Local::now(), format, renderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{byte_to_glyph, ByteOrder, RenderOptions};
    use crate::color::palette::Palette;
    use crate::color::PlainColorizer;
    use chrono::Utc;

    fn plain(options: RenderOptions, palette: &Palette) -> Renderer<'_> {
        Renderer::new(options, palette, &PlainColorizer)
    }

    #[test]
    fn test_digits_become_glyphs() {
        let palette = Palette::mono();
        let renderer = plain(RenderOptions::default(), &palette);
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 12, 5, 0).unwrap();

        let out = render_clock(&time, "%H:%M", &renderer).unwrap();
        let expected: String = [
            byte_to_glyph(1).to_string(),
            byte_to_glyph(2).to_string(),
            ":".to_string(),
            byte_to_glyph(0).to_string(),
            byte_to_glyph(5).to_string(),
        ]
        .concat();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_text_decoding_ignored() {
        // with decoding on, byte 9 would come back as a tab
        let palette = Palette::mono();
        let renderer = plain(RenderOptions::default().show_ascii(true), &palette);
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();
        let out = render_clock(&time, "%d", &renderer).unwrap();
        assert_eq!(out, format!("{}{}", byte_to_glyph(0), byte_to_glyph(9)));
    }

    #[test]
    fn test_little_order_applies() {
        let palette = Palette::mono();
        let renderer = plain(RenderOptions::default().byte_order(ByteOrder::Little), &palette);
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 7).unwrap();
        let out = render_clock(&time, "%S", &renderer).unwrap();
        assert_eq!(out, format!("{}{}", byte_to_glyph(255), byte_to_glyph(255 - 7)));
    }

    #[test]
    fn test_literal_text_kept() {
        let palette = Palette::mono();
        let renderer = plain(RenderOptions::default(), &palette);
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(render_clock(&time, "at %%", &renderer).unwrap(), "at %");
    }

    #[test]
    fn test_invalid_format() {
        let palette = Palette::mono();
        let renderer = plain(RenderOptions::default(), &palette);
        let result = render_clock(&Utc::now(), "%Q", &renderer);
        assert!(matches!(result, Err(ClockError::InvalidFormat(_))));
    }
}
