//! Terminal
//!
//! Raw mode acquisition and byte-wise standard input.

use std::io;
#[cfg(unix)]
use std::io::BufRead;
#[cfg(unix)]
use std::os::fd::AsRawFd;
#[cfg(unix)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crossterm::terminal;
#[cfg(unix)]
use mio::unix::SourceFd;
#[cfg(unix)]
use mio::{Events, Interest, Poll, Token};

use super::keys::ByteSource;

/// Width assumed when the terminal size is unknown
pub const FALLBACK_WIDTH: u16 = 80;

/// Raw mode for the lifetime of the guard
///
/// Restores the previous terminal configuration on drop, so every exit
/// path (errors, panics, dropped futures) leaves the terminal as found.
#[derive(Debug)]
pub struct RawModeGuard {
    restore: bool,
}

impl RawModeGuard {
    pub fn acquire() -> io::Result<Self> {
        let already_raw = terminal::is_raw_mode_enabled()?;
        if !already_raw {
            terminal::enable_raw_mode()?;
            tracing::trace!("raw mode enabled");
        }
        Ok(Self { restore: !already_raw })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.restore {
            let _ = terminal::disable_raw_mode();
            tracing::trace!("raw mode restored");
        }
    }
}

/// Current terminal width in columns
pub fn terminal_width() -> u16 {
    terminal::size().map(|(cols, _)| cols).unwrap_or(FALLBACK_WIDTH)
}

/// Standard input, one byte at a time
///
/// Bytes already pulled into the process-wide stdin buffer stay there
/// between reads, so dropping a `StdinBytes` never loses input.
#[cfg(unix)]
#[derive(Debug)]
pub struct StdinBytes {
    poll: Poll,
    events: Events,
    stdin: io::Stdin,
}

#[cfg(unix)]
const STDIN_TOKEN: Token = Token(0);

/// Bytes left in the std stdin buffer, invisible to readiness polling
#[cfg(unix)]
static BUFFERED: AtomicUsize = AtomicUsize::new(0);

#[cfg(unix)]
impl StdinBytes {
    pub fn open() -> io::Result<Self> {
        let poll = Poll::new()?;
        let stdin = io::stdin();
        poll.registry()
            .register(&mut SourceFd(&stdin.as_raw_fd()), STDIN_TOKEN, Interest::READABLE)?;
        Ok(Self {
            poll,
            events: Events::with_capacity(4),
            stdin,
        })
    }
}

#[cfg(unix)]
impl ByteSource for StdinBytes {
    fn wait_ready(&mut self, timeout: Duration) -> io::Result<bool> {
        if BUFFERED.load(Ordering::Acquire) > 0 {
            return Ok(true);
        }

        // readiness is edge-triggered: re-arm so pending input is reported again
        self.poll
            .registry()
            .reregister(&mut SourceFd(&self.stdin.as_raw_fd()), STDIN_TOKEN, Interest::READABLE)?;
        match self.poll.poll(&mut self.events, Some(timeout)) {
            Ok(()) => Ok(self.events.iter().any(|event| event.token() == STDIN_TOKEN)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let mut stdin = self.stdin.lock();
        let (byte, left) = match stdin.fill_buf()? {
            [] => return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "standard input closed")),
            [byte, rest @ ..] => (*byte, rest.len()),
        };
        stdin.consume(1);
        BUFFERED.store(left, Ordering::Release);
        Ok(byte)
    }
}

/// Standard input rebuilt from crossterm key events
#[cfg(not(unix))]
#[derive(Debug, Default)]
pub struct StdinBytes {
    pending: Option<u8>,
}

#[cfg(not(unix))]
impl StdinBytes {
    pub fn open() -> io::Result<Self> {
        Ok(Self::default())
    }
}

#[cfg(not(unix))]
impl ByteSource for StdinBytes {
    fn wait_ready(&mut self, timeout: Duration) -> io::Result<bool> {
        use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
        use std::time::Instant;

        if self.pending.is_some() {
            return Ok(true);
        }
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(false);
            }
            let Event::Key(key) = event::read()? else { continue };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            self.pending = match key.code {
                KeyCode::Enter => Some(b'\r'),
                KeyCode::Backspace => Some(0x7f),
                KeyCode::Esc => Some(0x1b),
                KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) && c.is_ascii_alphabetic() => {
                    Some(c.to_ascii_uppercase() as u8 - b'@')
                }
                KeyCode::Char(c) if c.is_ascii() => Some(c as u8),
                _ => None,
            };
            if self.pending.is_some() {
                return Ok(true);
            }
        }
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        self.pending.take().ok_or_else(|| io::Error::from(io::ErrorKind::WouldBlock))
    }
}
