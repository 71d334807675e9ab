//! Encoding
//!
//! Bytes to display string: valid text is shown as text, everything else
//! one glyph (or printable character) per byte. Unlisted bytes are only
//! colored by the rainbow hue, and only when they are drawn as glyphs.

use crate::color::palette::{Palette, Swatch};
use crate::color::{rainbow, Colorizer, PlainColorizer};

use super::glyphs::{byte_to_glyph, PRINTABLE_ASCII};
use super::{ByteOrder, TextEncoding};

/// Rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Try decoding the whole input as text first; `None` always renders glyphs
    pub encoding: Option<TextEncoding>,
    pub byte_order: ByteOrder,
    /// Show printable ASCII bytes as themselves instead of dots
    pub show_ascii: bool,
    /// Disable all styling
    pub colorblind: bool,
    /// Derive a hue from the byte value when the palette has no entry
    pub rainbow: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            encoding: Some(TextEncoding::Utf8),
            byte_order: ByteOrder::Big,
            show_ascii: false,
            colorblind: false,
            rainbow: true,
        }
    }
}

impl RenderOptions {
    /// Glyphs only, no text decoding, no styling
    pub fn glyphs(byte_order: ByteOrder) -> Self {
        Self {
            encoding: None,
            byte_order,
            show_ascii: false,
            colorblind: true,
            rainbow: false,
        }
    }

    pub fn encoding(mut self, encoding: Option<TextEncoding>) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn show_ascii(mut self, show_ascii: bool) -> Self {
        self.show_ascii = show_ascii;
        self
    }

    pub fn colorblind(mut self, colorblind: bool) -> Self {
        self.colorblind = colorblind;
        self
    }

    pub fn rainbow(mut self, rainbow: bool) -> Self {
        self.rainbow = rainbow;
        self
    }
}

/// Renders bytestrings with a fixed palette and colorizer
pub struct Renderer<'a> {
    pub options: RenderOptions,
    palette: &'a Palette,
    colorizer: &'a dyn Colorizer,
}

impl<'a> Renderer<'a> {
    pub fn new(options: RenderOptions, palette: &'a Palette, colorizer: &'a dyn Colorizer) -> Self {
        Self { options, palette, colorizer }
    }

    /// Same palette and colorizer, text decoding disabled
    pub fn glyphs_only(&self) -> Renderer<'a> {
        Renderer::new(self.options.encoding(None), self.palette, self.colorizer)
    }

    fn coloring(&self) -> bool {
        !self.options.colorblind && self.colorizer.enabled()
    }

    /// Render a bytestring
    pub fn render(&self, bytes: &[u8]) -> String {
        if let Some(text) = self.options.encoding.and_then(|enc| enc.decode(bytes)) {
            return match self.palette.default_swatch() {
                Some(swatch) if self.coloring() => self.paint(&text, swatch),
                _ => text,
            };
        }

        let mut out = String::with_capacity(bytes.len() * 3);
        match self.options.byte_order {
            ByteOrder::Big => bytes.iter().for_each(|&b| self.push_byte(&mut out, b)),
            ByteOrder::Little => bytes.iter().rev().for_each(|&b| self.push_byte(&mut out, 255 - b)),
        }
        out
    }

    fn push_byte(&self, out: &mut String, b: u8) {
        let ascii = self.options.show_ascii && PRINTABLE_ASCII.contains(&b);
        let ch = if ascii { char::from(b) } else { byte_to_glyph(b) };

        if !self.coloring() {
            out.push(ch);
            return;
        }

        let mut buf = [0u8; 4];
        let text = ch.encode_utf8(&mut buf);
        // the default swatch belongs to the text fast path only
        let swatch = self
            .palette
            .get(b)
            .or_else(|| (!ascii && self.options.rainbow).then(|| Swatch::new(rainbow(b))));
        match swatch {
            Some(swatch) => out.push_str(&self.paint(text, swatch)),
            None => out.push(ch),
        }
    }

    fn paint(&self, text: &str, swatch: Swatch) -> String {
        self.colorizer.style(text, swatch.color, swatch.bold)
    }
}

/// Render a bytestring (see [`Renderer::render`])
pub fn encode(bytes: &[u8], options: &RenderOptions, palette: &Palette, colorizer: &dyn Colorizer) -> String {
    Renderer::new(*options, palette, colorizer).render(bytes)
}

/// Render a bytestring without any styling
pub fn to_braille(bytes: &[u8], options: &RenderOptions) -> String {
    let palette = Palette::mono();
    encode(bytes, &options.colorblind(true), &palette, &PlainColorizer)
}
