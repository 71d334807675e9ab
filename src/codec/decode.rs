//! Decoding
//!
//! Glyph strings back to bytes. Characters that are not glyphs are
//! encoded with the text encoding, so mixed Braille/plain input works.

use super::glyphs::{glyph_to_byte, is_glyph};
use super::{ByteOrder, CodecError, CodecResult, TextEncoding};

/// Convert a glyph string back to bytes
///
/// With [`ByteOrder::Little`] the characters are read in reverse and
/// Braille glyphs are one's-complemented, undoing what the encoder does.
/// Plain text characters are never complemented.
pub fn decode(text: &str, byte_order: ByteOrder, encoding: TextEncoding) -> CodecResult<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());

    match byte_order {
        ByteOrder::Big => {
            for c in text.chars() {
                push_char(&mut out, c, encoding, false)?;
            }
        }
        ByteOrder::Little => {
            for c in text.chars().rev() {
                push_char(&mut out, c, encoding, true)?;
            }
        }
    }

    Ok(out)
}

fn push_char(out: &mut Vec<u8>, c: char, encoding: TextEncoding, complement: bool) -> CodecResult<()> {
    match glyph_to_byte(c) {
        Some(b) if complement && is_glyph(c) => out.push(255 - b),
        Some(b) => out.push(b),
        None if encoding.encode_char(c, out) => {}
        None => return Err(CodecError::Decode { ch: c, encoding }),
    }
    Ok(())
}
