//! BER decoding.
//!
//! Zero-copy decoding using `Bytes` to avoid allocations.

use super::length::decode_length;
use super::tag;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// BER decoder that reads from a byte buffer.
pub struct Decoder {
    data: Bytes,
    offset: usize,
}

impl Decoder {
    /// Create a new decoder from bytes.
    pub fn new(data: Bytes) -> Self {
        Self { data, offset: 0 }
    }

    /// Create a decoder from a byte slice (copies the data).
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Get the current offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get remaining bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Check if we've reached the end.
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Peek at the next tag without consuming it.
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    /// Read a tag byte.
    pub fn read_tag(&mut self) -> Result<u8> {
        let Some(&byte) = self.data.get(self.offset) else {
            tracing::debug!(target: "snmp_mibtypes::ber", { offset = self.offset }, "unexpected end of input");
            return Err(Error::decode(self.offset, DecodeErrorKind::TruncatedData));
        };
        self.offset += 1;
        Ok(byte)
    }

    /// Read a length.
    pub fn read_length(&mut self) -> Result<usize> {
        let (len, consumed) = decode_length(&self.data[self.offset..], self.offset)?;
        self.offset += consumed;
        Ok(len)
    }

    /// Read raw bytes without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        // saturating_add keeps a huge length from wrapping past the check
        if self.offset.saturating_add(len) > self.data.len() {
            let kind = DecodeErrorKind::InsufficientData {
                needed: len,
                available: self.remaining(),
            };
            tracing::debug!(target: "snmp_mibtypes::ber", { offset = self.offset, kind = %kind }, "insufficient data");
            return Err(Error::decode(self.offset, kind));
        }
        let bytes = self.data.slice(self.offset..self.offset + len);
        self.offset += len;
        Ok(bytes)
    }

    /// Read and expect a specific tag, returning the content length.
    pub fn expect_tag(&mut self, expected: u8) -> Result<usize> {
        let actual = self.read_tag()?;
        if actual != expected {
            return Err(Error::decode(
                self.offset - 1,
                DecodeErrorKind::UnexpectedTag { expected, actual },
            ));
        }
        self.read_length()
    }

    /// Read any primitive TLV, returning its tag and content.
    pub fn read_tlv(&mut self) -> Result<(u8, Bytes)> {
        let tag = self.read_tag()?;
        let len = self.read_length()?;
        let content = self.read_bytes(len)?;
        Ok((tag, content))
    }

    /// Read a NULL.
    pub fn read_null(&mut self) -> Result<()> {
        let len = self.expect_tag(tag::universal::NULL)?;
        if len != 0 {
            return Err(Error::decode(self.offset, DecodeErrorKind::InvalidNull));
        }
        Ok(())
    }

    /// Read an OBJECT IDENTIFIER.
    pub fn read_oid(&mut self) -> Result<Oid> {
        let len = self.expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
        let bytes = self.read_bytes(len)?;
        Oid::from_ber(&bytes)
    }

    /// Read a SEQUENCE, returning a decoder for its contents.
    pub fn read_sequence(&mut self) -> Result<Decoder> {
        let len = self.expect_tag(tag::universal::SEQUENCE)?;
        let content = self.read_bytes(len)?;
        Ok(Decoder::new(content))
    }
}

/// Decode signed INTEGER content octets.
pub fn decode_signed(content: &[u8], offset: usize) -> Result<i64> {
    let Some(&first) = content.first() else {
        return Err(Error::decode(offset, DecodeErrorKind::ZeroLengthInteger));
    };
    if content.len() > 8 {
        return Err(Error::decode(offset, DecodeErrorKind::IntegerOverflow));
    }

    let init: i64 = if first & 0x80 != 0 { -1 } else { 0 };
    Ok(content
        .iter()
        .fold(init, |acc, &byte| (acc << 8) | i64::from(byte)))
}

/// Decode unsigned content octets (Counter32, Gauge32, TimeTicks, Counter64).
///
/// A value with its high bit set but no leading zero octet is read as
/// unsigned, matching what common agents emit.
pub fn decode_unsigned(content: &[u8], offset: usize) -> Result<u64> {
    if content.is_empty() {
        return Err(Error::decode(offset, DecodeErrorKind::ZeroLengthInteger));
    }
    if content.len() > 9 {
        return Err(Error::decode(
            offset,
            DecodeErrorKind::Integer64TooLong {
                length: content.len(),
            },
        ));
    }
    if content.len() == 9 && content[0] != 0 {
        return Err(Error::decode(offset, DecodeErrorKind::IntegerOverflow));
    }

    Ok(content
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)))
}
