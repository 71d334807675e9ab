//! Byte/Glyph Codec
//!
//! Renders bytestrings as Braille cells and parses them back.

pub mod decode;
pub mod encode;
pub mod glyphs;
pub mod integer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Cannot decode {ch:?}: not a Braille glyph and not representable in {encoding}")]
    Decode { ch: char, encoding: TextEncoding },

    #[error("Invalid byte order: {0:?} (expected \"big\" or \"little\")")]
    InvalidByteOrder(String),

    #[error("Unknown text encoding: {0:?}")]
    UnknownEncoding(String),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Order in which bytes are laid out as glyphs
///
/// `Little` reverses the sequence *and* one's-complements every byte
/// before the table lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    #[default]
    Big,
    Little,
}

impl FromStr for ByteOrder {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "big" => Ok(Self::Big),
            "little" => Ok(Self::Little),
            other => Err(CodecError::InvalidByteOrder(other.to_string())),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Big => write!(f, "big"),
            Self::Little => write!(f, "little"),
        }
    }
}

/// Text codec used for the "already valid text" fast path and for
/// characters that are not glyphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    #[default]
    #[serde(alias = "utf-8")]
    Utf8,
    #[serde(alias = "us-ascii")]
    Ascii,
    #[serde(alias = "latin-1", alias = "iso-8859-1")]
    Latin1,
}

impl TextEncoding {
    /// Decode the whole byte sequence, or nothing at all
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Ascii => bytes.is_ascii().then(|| bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Append the encoded form of `c` to `out`, returning false if `c`
    /// has no representation in this encoding.
    pub fn encode_char(&self, c: char, out: &mut Vec<u8>) -> bool {
        match self {
            Self::Utf8 => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                true
            }
            Self::Ascii => match u8::try_from(c) {
                Ok(b) if b.is_ascii() => {
                    out.push(b);
                    true
                }
                _ => false,
            },
            Self::Latin1 => match u8::try_from(c) {
                Ok(b) => {
                    out.push(b);
                    true
                }
                Err(_) => false,
            },
        }
    }
}

impl FromStr for TextEncoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Self::Latin1),
            _ => Err(CodecError::UnknownEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => write!(f, "utf-8"),
            Self::Ascii => write!(f, "ascii"),
            Self::Latin1 => write!(f, "latin-1"),
        }
    }
}

// Re-exports
pub use decode::decode;
pub use encode::{encode, to_braille, RenderOptions, Renderer};
pub use glyphs::{byte_to_glyph, glyph_to_byte};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order_parse() {
        assert_eq!("big".parse::<ByteOrder>().unwrap(), ByteOrder::Big);
        assert_eq!("little".parse::<ByteOrder>().unwrap(), ByteOrder::Little);
        assert!(matches!(
            "middle".parse::<ByteOrder>(),
            Err(CodecError::InvalidByteOrder(s)) if s == "middle"
        ));
    }

    #[test]
    fn test_encoding_parse() {
        assert_eq!("UTF-8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("iso-8859-1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert!("ebcdic".parse::<TextEncoding>().is_err());
    }

    #[test]
    fn test_encoding_names_in_config_files() {
        for (name, expected) in [
            ("\"utf-8\"", TextEncoding::Utf8),
            ("\"utf8\"", TextEncoding::Utf8),
            ("\"us-ascii\"", TextEncoding::Ascii),
            ("\"latin-1\"", TextEncoding::Latin1),
            ("\"iso-8859-1\"", TextEncoding::Latin1),
        ] {
            assert_eq!(serde_json::from_str::<TextEncoding>(name).unwrap(), expected, "{name}");
        }
        assert!(serde_json::from_str::<TextEncoding>("\"ebcdic\"").is_err());
    }

    #[test]
    fn test_text_decode_is_all_or_nothing() {
        assert_eq!(TextEncoding::Utf8.decode(b"hi").as_deref(), Some("hi"));
        assert_eq!(TextEncoding::Utf8.decode(b"hi\xff"), None);
        assert_eq!(TextEncoding::Ascii.decode(b"\x80"), None);
        assert_eq!(TextEncoding::Latin1.decode(b"\xe9").as_deref(), Some("é"));
    }

    #[test]
    fn test_encode_char() {
        let mut out = Vec::new();
        assert!(TextEncoding::Utf8.encode_char('é', &mut out));
        assert_eq!(out, "é".as_bytes());

        out.clear();
        assert!(!TextEncoding::Ascii.encode_char('é', &mut out));
        assert!(TextEncoding::Latin1.encode_char('é', &mut out));
        assert_eq!(out, [0xe9]);
        assert!(!TextEncoding::Latin1.encode_char('€', &mut out));
    }
}
