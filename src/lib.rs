//! Bytes as Braille
//!
//! Show arbitrary bytestrings as Braille cells, one cell per byte, and
//! type them back in from a raw terminal.

pub mod clock;
pub mod codec;
pub mod color;
pub mod config;
pub mod input;
pub mod telemetry;

// Re-exports
pub use codec::{decode, encode, to_braille, ByteOrder, CodecError, RenderOptions, Renderer, TextEncoding};
pub use color::palette::{Palette, Swatch};
pub use color::{ColorMode, Colorizer};
pub use config::Config;
pub use input::{InputError, InputMode, Prompt};
