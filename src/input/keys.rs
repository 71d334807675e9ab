//! Key Decoder
//!
//! Turns raw terminal bytes into logical key events.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// End of transmission (Ctrl-D)
pub const EOT: u8 = 0x04;
/// End of text (Ctrl-C)
pub const ETX: u8 = 0x03;
pub const ESC: u8 = 0x1b;
pub const DEL: u8 = 0x7f;
pub const BS: u8 = 0x08;

/// How long a single poll waits for a byte
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Bytes read after ESC at most
const ESCAPE_TAIL: usize = 3;

/// Logical key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Printable(char),
    Control(u8),
    /// ESC and the bytes that followed it, unvalidated
    Escape(String),
    Backspace,
    Enter,
}

/// Source of raw terminal bytes
pub trait ByteSource {
    /// Wait at most `timeout` until a byte can be read; consumes nothing
    fn wait_ready(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Read one byte; only called after `wait_ready` returned true
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Wait at most `timeout` for one byte; `Ok(None)` on timeout
    fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        if self.wait_ready(timeout)? {
            self.read_byte().map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Source of key events
pub trait KeySource {
    /// Wait at most `timeout` for input without consuming any
    fn poll_ready(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Block until the next key event
    fn read_event(&mut self) -> io::Result<KeyEvent>;
}

impl<T: KeySource + ?Sized> KeySource for &mut T {
    fn poll_ready(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll_ready(timeout)
    }

    fn read_event(&mut self) -> io::Result<KeyEvent> {
        (**self).read_event()
    }
}

/// Scripted events, for replaying input
impl KeySource for VecDeque<KeyEvent> {
    fn poll_ready(&mut self, _timeout: Duration) -> io::Result<bool> {
        // an empty script reports end of input from read_event
        Ok(true)
    }

    fn read_event(&mut self) -> io::Result<KeyEvent> {
        self.pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more key events"))
    }
}

/// Key decoder over a byte source
#[derive(Debug)]
pub struct KeyDecoder<B> {
    bytes: B,
    poll_interval: Duration,
    pushback: VecDeque<u8>,
}

impl<B: ByteSource> KeyDecoder<B> {
    pub fn new(bytes: B) -> Self {
        Self {
            bytes,
            poll_interval: POLL_INTERVAL,
            pushback: VecDeque::new(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn into_inner(self) -> B {
        self.bytes
    }

    /// Next byte, waiting at most one poll interval
    fn try_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pushback.pop_front() {
            return Ok(Some(b));
        }
        self.bytes.poll_byte(self.poll_interval)
    }

    /// Next byte, polling until one arrives
    fn next_byte(&mut self) -> io::Result<u8> {
        loop {
            if let Some(b) = self.try_byte()? {
                return Ok(b);
            }
        }
    }

    fn escape_sequence(&mut self) -> io::Result<KeyEvent> {
        let mut seq = vec![ESC];
        while seq.len() <= ESCAPE_TAIL {
            let Some(b) = self.try_byte()? else { break };
            seq.push(b);
            if sequence_complete(&seq) {
                break;
            }
        }
        Ok(KeyEvent::Escape(String::from_utf8_lossy(&seq).into_owned()))
    }

    fn utf8_char(&mut self, lead: u8, len: usize) -> io::Result<KeyEvent> {
        let mut buf = vec![lead];
        while buf.len() < len {
            match self.try_byte()? {
                Some(b) if b & 0xc0 == 0x80 => buf.push(b),
                Some(b) => {
                    buf.push(b);
                    break;
                }
                None => break,
            }
        }

        if let Some(c) = std::str::from_utf8(&buf).ok().and_then(|s| s.chars().next()) {
            return Ok(KeyEvent::Printable(c));
        }
        // not UTF-8 after all: replay the rest byte by byte
        self.pushback.extend(&buf[1..]);
        Ok(KeyEvent::Printable(char::from(lead)))
    }
}

impl<B: ByteSource> KeySource for KeyDecoder<B> {
    fn poll_ready(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.pushback.is_empty() {
            return Ok(true);
        }
        self.bytes.wait_ready(timeout)
    }

    fn read_event(&mut self) -> io::Result<KeyEvent> {
        let b = self.next_byte()?;
        match b {
            ESC => self.escape_sequence(),
            EOT | ETX => Ok(KeyEvent::Control(b)),
            DEL | BS => Ok(KeyEvent::Backspace),
            b'\n' | b'\r' => Ok(KeyEvent::Enter),
            0xc2..=0xdf => self.utf8_char(b, 2),
            0xe0..=0xef => self.utf8_char(b, 3),
            0xf0..=0xf4 => self.utf8_char(b, 4),
            _ => Ok(KeyEvent::Printable(char::from(b))),
        }
    }
}

/// CSI sequences end on their final byte, SS3 after one byte
fn sequence_complete(seq: &[u8]) -> bool {
    match seq {
        [ESC, b'[', .., last] => (0x40..=0x7e).contains(last),
        [ESC, b'O', _] => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bytes that are all immediately available
    struct Buffered(VecDeque<u8>);

    impl ByteSource for Buffered {
        fn wait_ready(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read_byte(&mut self) -> io::Result<u8> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
        }
    }

    /// One entry per wait: `None` is a timeout, `Some(b)` a byte arriving
    struct Scripted {
        script: VecDeque<Option<u8>>,
        ready: Option<u8>,
        waits: usize,
    }

    impl Scripted {
        fn new(script: &[Option<u8>]) -> Self {
            Self {
                script: script.iter().copied().collect(),
                ready: None,
                waits: 0,
            }
        }
    }

    impl ByteSource for Scripted {
        fn wait_ready(&mut self, _timeout: Duration) -> io::Result<bool> {
            if self.ready.is_some() {
                return Ok(true);
            }
            self.waits += 1;
            self.ready = self.script.pop_front().flatten();
            Ok(self.ready.is_some())
        }

        fn read_byte(&mut self) -> io::Result<u8> {
            self.ready
                .take()
                .ok_or_else(|| io::Error::from(io::ErrorKind::WouldBlock))
        }
    }

    fn decoder(bytes: &[u8]) -> KeyDecoder<Buffered> {
        KeyDecoder::new(Buffered(bytes.iter().copied().collect()))
    }

    #[test]
    fn test_plain_keys() {
        let mut keys = decoder(b"a\x7f\x08\r\n\x04\x03\t");
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('a'));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Backspace);
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Backspace);
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Enter);
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Enter);
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Control(EOT));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Control(ETX));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('\t'));
    }

    #[test]
    fn test_arrow_keys() {
        let mut keys = decoder(b"\x1b[A\x1b[5~x");
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Escape("\x1b[A".into()));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Escape("\x1b[5~".into()));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('x'));
    }

    #[test]
    fn test_escape_reads_at_most_three_more_bytes() {
        let mut keys = decoder(b"\x1b[123x");
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Escape("\x1b[12".into()));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('3'));
    }

    #[test]
    fn test_lone_escape() {
        let mut keys = decoder(b"\x1b");
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Escape("\x1b".into()));
    }

    #[test]
    fn test_ss3_sequence() {
        let mut keys = decoder(b"\x1bOHa");
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Escape("\x1bOH".into()));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('a'));
    }

    #[test]
    fn test_utf8_glyph() {
        let mut keys = decoder("⣿é".as_bytes());
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('⣿'));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('é'));
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        let mut keys = decoder(b"\xc3a");
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('\u{c3}'));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('a'));
    }

    #[test]
    fn test_keeps_polling_until_byte_arrives() {
        let mut keys = KeyDecoder::new(Scripted::new(&[None, None, None, Some(b'a')]));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('a'));
        assert_eq!(keys.into_inner().waits, 4);
    }

    #[test]
    fn test_timeout_ends_escape_sequence() {
        let mut keys = KeyDecoder::new(Scripted::new(&[Some(ESC), None, Some(b'['), Some(b'A')]));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Escape("\x1b".into()));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('['));
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('A'));
    }

    #[test]
    fn test_poll_ready_consumes_nothing() {
        let mut keys = KeyDecoder::new(Scripted::new(&[None, Some(b'z')]));
        assert!(!keys.poll_ready(POLL_INTERVAL).unwrap());
        assert!(keys.poll_ready(POLL_INTERVAL).unwrap());
        assert!(keys.poll_ready(POLL_INTERVAL).unwrap());
        assert_eq!(keys.read_event().unwrap(), KeyEvent::Printable('z'));
    }

    #[test]
    fn test_scripted_events() {
        let mut script: VecDeque<KeyEvent> = [KeyEvent::Enter].into_iter().collect();
        assert_eq!(script.read_event().unwrap(), KeyEvent::Enter);
        assert_eq!(script.read_event().unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }
}
