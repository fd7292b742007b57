//! Hexadecimal encoding and decoding utilities.

use std::fmt;

/// Encode bytes as lowercase hex string.
///
/// ```
/// use snmp_mibtypes::format::hex::encode;
///
/// assert_eq!(encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    Bytes(bytes).to_string()
}

/// Hex with a `0x` prefix and spaces between octets (`0x74 65 73 05`).
pub fn spaced(bytes: &[u8]) -> String {
    let body: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("0x{}", body.join(" "))
}

/// Decode a hex string to bytes.
///
/// Whitespace, `:` separators and a leading `0x` are ignored.
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    let digits: Vec<u8> = s
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':')
        .collect();
    if digits.len() % 2 != 0 {
        return Err(DecodeError::OddLength);
    }
    digits
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).map_err(|_| DecodeError::InvalidChar)?;
            u8::from_str_radix(text, 16).map_err(|_| DecodeError::InvalidChar)
        })
        .collect()
}

/// Error type for hex decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input has odd length (must be pairs of hex digits)
    OddLength,
    /// Invalid hexadecimal character
    InvalidChar,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddLength => write!(f, "odd number of hex digits"),
            Self::InvalidChar => write!(f, "invalid hex digit"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Lazy hex formatter - only formats when actually displayed.
///
/// Keeps disabled log statements allocation-free.
pub struct Bytes<'a>(pub &'a [u8]);

impl fmt::Debug for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
