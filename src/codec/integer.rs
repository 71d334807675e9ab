//! Integer Literals
//!
//! Base-prefixed integer literals (`0x`, `0o`, `0b` or decimal) of any
//! size, and their conversion to width-bounded byte strings.

use thiserror::Error;

use super::ByteOrder;

/// Integer literal errors, always recovered by the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegerError {
    #[error("Not an integer literal")]
    Invalid,

    #[error("Negative integers have no unsigned byte representation")]
    Negative,

    #[error("Integer needs {needed} bytes, only {width} available")]
    Overflow { needed: usize, width: usize },
}

/// Parsed integer literal of arbitrary size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntLiteral {
    negative: bool,
    /// Big-endian magnitude without leading zero bytes (empty for zero)
    magnitude: Vec<u8>,
}

impl IntLiteral {
    pub fn is_zero(&self) -> bool {
        self.magnitude.is_empty()
    }

    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// Big-endian magnitude without leading zero bytes
    pub fn magnitude(&self) -> &[u8] {
        &self.magnitude
    }

    /// Fixed-width unsigned representation in the given byte order
    pub fn to_bytes(&self, width: usize, order: ByteOrder) -> Result<Vec<u8>, IntegerError> {
        if self.is_negative() {
            return Err(IntegerError::Negative);
        }
        let needed = self.magnitude.len();
        if needed > width {
            return Err(IntegerError::Overflow { needed, width });
        }

        let mut out = vec![0u8; width - needed];
        out.extend_from_slice(&self.magnitude);
        if order == ByteOrder::Little {
            out.reverse();
        }
        Ok(out)
    }
}

/// Parse an integer literal, detecting the base from its prefix
///
/// Surrounding whitespace, a leading sign and single underscores between
/// digits are accepted. Decimal literals may not have leading zeros unless
/// every digit is zero.
pub fn parse_int_literal(text: &str) -> Result<IntLiteral, IntegerError> {
    let s = text.trim();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let lower = s.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits, prefixed) = match lower.as_deref() {
        Some("0x") => (16, &s[2..], true),
        Some("0o") => (8, &s[2..], true),
        Some("0b") => (2, &s[2..], true),
        _ => (10, s, false),
    };

    // a single underscore may follow the base prefix
    let digits = match digits.strip_prefix('_') {
        Some(rest) if prefixed => rest,
        _ => digits,
    };

    let values = split_digits(digits, radix)?;
    if !prefixed && values.len() > 1 && values[0] == 0 && values.iter().any(|&d| d != 0) {
        return Err(IntegerError::Invalid);
    }

    let mut magnitude = Vec::new();
    for digit in values {
        push_digit(&mut magnitude, radix, digit);
    }

    Ok(IntLiteral { negative, magnitude })
}

/// Minimal byte string for an integer literal, sized to the literal's
/// character count, with leading zero bytes stripped
pub fn literal_to_bytes(text: &str, order: ByteOrder) -> Result<Vec<u8>, IntegerError> {
    let literal = parse_int_literal(text)?;
    let bytes = literal.to_bytes(text.chars().count(), order)?;
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    Ok(bytes[start..].to_vec())
}

fn split_digits(digits: &str, radix: u32) -> Result<Vec<u32>, IntegerError> {
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return Err(IntegerError::Invalid);
    }
    digits
        .chars()
        .filter(|&c| c != '_')
        .map(|c| c.to_digit(radix).ok_or(IntegerError::Invalid))
        .collect()
}

fn push_digit(magnitude: &mut Vec<u8>, radix: u32, digit: u32) {
    let mut carry = digit;
    for byte in magnitude.iter_mut().rev() {
        let value = u32::from(*byte) * radix + carry;
        *byte = (value & 0xff) as u8;
        carry = value >> 8;
    }
    while carry > 0 {
        magnitude.insert(0, (carry & 0xff) as u8);
        carry >>= 8;
    }
}
