//! Input Module
//!
//! Raw-terminal byte input with a modal edit line.

pub mod handler;
pub mod keymap;
pub mod keys;
pub mod modes;
pub mod prompt;
pub mod terminal;

use std::io;

use thiserror::Error;

use crate::codec::CodecError;

/// Input errors
#[derive(Debug, Error)]
pub enum InputError {
    #[error("End of input")]
    EndOfInput,

    #[error("Interrupted")]
    Interrupted,

    #[error("Conversion failed: {0}")]
    Codec(#[from] CodecError),

    #[error("Terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type InputResult<T> = Result<T, InputError>;

// Re-exports
pub use handler::{InputHandler, Outcome};
pub use keys::{ByteSource, KeyDecoder, KeyEvent, KeySource};
pub use modes::{Conversion, InputMode, ModeState, Prompts};
pub use prompt::Prompt;
pub use terminal::RawModeGuard;
