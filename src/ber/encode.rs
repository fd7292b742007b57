//! BER encoding.
//!
//! Uses a reverse buffer approach: writes from end backwards to avoid
//! needing to pre-calculate lengths.

use super::length::encode_length;
use super::tag;
use bytes::Bytes;
use smallvec::SmallVec;

/// Buffer for BER encoding that writes backwards.
///
/// Content is written first, then the length and tag are prepended.
pub struct EncodeBuf {
    buf: Vec<u8>,
}

impl EncodeBuf {
    /// Create a new encode buffer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    /// Create a new encode buffer with specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Push bytes that appear in forward order in the output.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes.iter().rev());
    }

    /// Push a BER length encoding.
    pub fn push_length(&mut self, len: usize) {
        let (bytes, count) = encode_length(len);
        self.buf.extend_from_slice(&bytes[..count]);
    }

    /// Push a BER tag.
    pub fn push_tag(&mut self, tag: u8) {
        self.buf.push(tag);
    }

    /// Get the current length of encoded data.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Encode a primitive TLV from already-encoded content octets.
    pub fn push_tlv(&mut self, tag: u8, content: &[u8]) {
        self.push_bytes(content);
        self.push_length(content.len());
        self.push_tag(tag);
    }

    /// Encode a constructed type.
    ///
    /// Calls the closure to encode contents, then wraps with length and tag.
    pub fn push_constructed<F>(&mut self, tag: u8, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let start_len = self.len();
        f(self);
        let content_len = self.len() - start_len;
        self.push_length(content_len);
        self.push_tag(tag);
    }

    /// Encode a SEQUENCE.
    pub fn push_sequence<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    /// Encode an INTEGER.
    pub fn push_integer(&mut self, value: i32) {
        self.push_tlv(tag::universal::INTEGER, &signed_content(i64::from(value)));
    }

    /// Encode an unsigned integer with an application tag.
    pub fn push_unsigned(&mut self, tag: u8, value: u64) {
        self.push_tlv(tag, &unsigned_content(value));
    }

    /// Encode an OCTET STRING.
    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_tlv(tag::universal::OCTET_STRING, data);
    }

    /// Encode a NULL.
    pub fn push_null(&mut self) {
        self.push_length(0);
        self.push_tag(tag::universal::NULL);
    }

    /// Encode an OBJECT IDENTIFIER.
    pub fn push_oid(&mut self, oid: &crate::oid::Oid) {
        self.push_tlv(tag::universal::OBJECT_IDENTIFIER, &oid.to_ber_smallvec());
    }

    /// Finalize and return the encoded bytes.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }
}

impl Default for EncodeBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal two's complement content octets for a signed integer.
pub fn signed_content(value: i64) -> SmallVec<[u8; 9]> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < 7 {
        let next_high = bytes[start + 1] & 0x80 != 0;
        let redundant = (bytes[start] == 0x00 && !next_high) || (bytes[start] == 0xFF && next_high);
        if !redundant {
            break;
        }
        start += 1;
    }
    SmallVec::from_slice(&bytes[start..])
}

/// Minimal content octets for an unsigned integer.
///
/// A leading zero octet is added when the high bit is set so the value is
/// not read back as negative.
pub fn unsigned_content(value: u64) -> SmallVec<[u8; 9]> {
    let bytes = value.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    let mut out = SmallVec::new();
    if bytes[start] & 0x80 != 0 {
        out.push(0);
    }
    out.extend_from_slice(&bytes[start..]);
    out
}
