//! Byte Prompt
//!
//! Interactive line that lets the user type bytes, with a live glyph
//! preview. The blocking and async drivers share one session type and
//! differ only in how they wait for the next key.

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::codec::{RenderOptions, Renderer};
use crate::color::palette::Palette;
use crate::color::{ColorMode, Colorizer};

use super::handler::{InputHandler, Outcome};
use super::keymap::MENU_HELP;
use super::keys::{KeyDecoder, KeyEvent, KeySource, POLL_INTERVAL};
use super::modes::{Conversion, InputMode, ModeState, Prompts, Stage};
use super::terminal::{terminal_width, RawModeGuard, StdinBytes};
use super::{InputError, InputResult};

/// Input prompt configuration
#[derive(Clone)]
pub struct Prompt {
    pub prompts: Prompts,
    /// Mode the session starts in
    pub mode: InputMode,
    pub conversion: Conversion,
    pub palette: Palette,
    colorizer: Arc<dyn Colorizer>,
    width: Option<u16>,
}

impl Default for Prompt {
    fn default() -> Self {
        Self {
            prompts: Prompts::default(),
            mode: InputMode::Default,
            conversion: Conversion::default(),
            palette: Palette::mono(),
            colorizer: Arc::from(ColorMode::detect().colorizer()),
            width: None,
        }
    }
}

impl std::fmt::Debug for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prompt")
            .field("prompts", &self.prompts)
            .field("mode", &self.mode)
            .field("conversion", &self.conversion)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

impl Prompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default-mode prompt
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompts = Prompts::with_default(prompt);
        self
    }

    pub fn mode(mut self, mode: InputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Byte order and text encoding used to turn the buffer into bytes
    pub fn conversion(mut self, conversion: Conversion) -> Self {
        self.conversion = conversion;
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn colorizer(mut self, colorizer: Arc<dyn Colorizer>) -> Self {
        self.colorizer = colorizer;
        self
    }

    /// Fixed line width instead of asking the terminal
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Read bytes from the terminal, blocking
    ///
    /// Returns `None` when nothing was entered, [`InputError::EndOfInput`]
    /// on Ctrl-D twice.
    pub fn read(&self) -> InputResult<Option<Vec<u8>>> {
        let _raw = RawModeGuard::acquire()?;
        let mut keys = KeyDecoder::new(StdinBytes::open()?);
        self.read_with(&mut keys, io::stdout().lock())
    }

    /// Read bytes from the terminal without blocking the async runtime
    pub async fn read_async(&self) -> InputResult<Option<Vec<u8>>> {
        let _raw = RawModeGuard::acquire()?;
        let keys = KeyDecoder::new(StdinBytes::open()?);
        self.read_with_async(keys, io::stdout()).await
    }

    /// Run a session over any key source and output
    pub fn read_with<S, W>(&self, keys: &mut S, out: W) -> InputResult<Option<Vec<u8>>>
    where
        S: KeySource + ?Sized,
        W: Write,
    {
        let mut session = Session::new(self, out);
        loop {
            session.redraw()?;
            let key = keys.read_event()?;
            if let ControlFlow::Break(bytes) = session.apply(&key)? {
                return Ok(bytes);
            }
        }
    }

    /// Async flavour of [`Prompt::read_with`]
    ///
    /// The blocking pool only waits one poll interval for input at a time,
    /// so other tasks keep running between keystrokes. Dropping the future
    /// stops input from being consumed: a wait still in flight returns
    /// without reading.
    pub async fn read_with_async<S, W>(&self, keys: S, out: W) -> InputResult<Option<Vec<u8>>>
    where
        S: KeySource + Send + 'static,
        W: Write,
    {
        let cancel = CancelOnDrop::default();
        let mut session = Session::new(self, out);
        let mut keys = Some(keys);
        loop {
            session.redraw()?;
            let key = loop {
                let Some(mut source) = keys.take() else {
                    return Err(InputError::Io(io::Error::other("key source lost")));
                };
                let cancelled = Arc::clone(&cancel.0);
                let (source, key) = tokio::task::spawn_blocking(move || {
                    let key = match source.poll_ready(POLL_INTERVAL) {
                        Ok(true) if !cancelled.load(Ordering::Acquire) => source.read_event().map(Some),
                        Ok(_) => Ok(None),
                        Err(e) => Err(e),
                    };
                    (source, key)
                })
                .await
                .map_err(|e| InputError::Io(io::Error::other(e)))?;
                keys = Some(source);

                if let Some(key) = key? {
                    break key;
                }
            };

            if let ControlFlow::Break(bytes) = session.apply(&key)? {
                return Ok(bytes);
            }
        }
    }
}

/// Raised when an async read is dropped
#[derive(Default)]
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// One input call: owns the mode state and the output
struct Session<'p, W> {
    prompt: &'p Prompt,
    state: ModeState,
    out: W,
}

impl<'p, W: Write> Session<'p, W> {
    fn new(prompt: &'p Prompt, out: W) -> Self {
        Self {
            prompt,
            state: ModeState::new(prompt.mode),
            out,
        }
    }

    /// Erase the line and draw the prompt with the current preview
    fn redraw(&mut self) -> io::Result<()> {
        if self.state.stage != Stage::Editing {
            return Ok(());
        }

        let conversion = self.prompt.conversion;
        let bytes = conversion.preview(self.state.mode, self.state.get_buffer());
        let options = RenderOptions::default()
            .encoding(Some(conversion.encoding))
            .byte_order(conversion.byte_order)
            .show_ascii(true)
            .rainbow(false);
        let preview = Renderer::new(options, &self.prompt.palette, self.prompt.colorizer.as_ref()).render(&bytes);

        let width = self.prompt.width.unwrap_or_else(terminal_width);
        let blank = " ".repeat(usize::from(width.saturating_sub(1)));
        write!(
            self.out,
            "\r{blank}\r{}{preview}",
            self.prompt.prompts.for_mode(self.state.mode)
        )?;
        self.out.flush()
    }

    fn apply(&mut self, key: &KeyEvent) -> InputResult<ControlFlow<Option<Vec<u8>>>> {
        let outcome = InputHandler::handle_key_event(key, &mut self.state, &self.prompt.conversion)?;
        match outcome {
            Outcome::Continue => Ok(ControlFlow::Continue(())),
            Outcome::ShowMenu => {
                write!(self.out, "\r\n{MENU_HELP}\r\n")?;
                self.out.flush()?;
                Ok(ControlFlow::Continue(()))
            }
            Outcome::Commit(bytes) => {
                self.finish_line()?;
                Ok(ControlFlow::Break(bytes))
            }
            Outcome::EndOfInput => {
                self.finish_line()?;
                Err(InputError::EndOfInput)
            }
            Outcome::Interrupted => {
                self.finish_line()?;
                Err(InputError::Interrupted)
            }
        }
    }

    fn finish_line(&mut self) -> io::Result<()> {
        write!(self.out, "\r\n")?;
        self.out.flush()
    }
}
