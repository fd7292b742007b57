//! MSB-first bitmaps.
//!
//! Bit 0 is the most significant bit of octet 0, bit 8 the most significant
//! bit of octet 1, and so on. This is the layout of SMI `BITS` on the wire
//! and of octet strings used as bitmaps.

/// Mutable view of a byte buffer as a bitmap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    bytes: Vec<u8>,
}

#[inline]
fn locate(bit: u32) -> (usize, u8) {
    ((bit >> 3) as usize, 0x80 >> (bit % 8))
}

impl Bitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing octets.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Smallest bitmap with exactly `bits` set: `⌈(max + 1) / 8⌉` octets.
    pub fn from_positions(bits: impl IntoIterator<Item = u32>) -> Self {
        let mut bitmap = Self::new();
        bitmap.add(bits);
        bitmap
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Whether `bit` is set. Bits past the end are unset.
    pub fn test(&self, bit: u32) -> bool {
        let (byte, mask) = locate(bit);
        self.bytes.get(byte).is_some_and(|b| b & mask != 0)
    }

    /// Whether every bit in `bits` is set.
    pub fn test_all(&self, bits: impl IntoIterator<Item = u32>) -> bool {
        bits.into_iter().all(|bit| self.test(bit))
    }

    /// Set bits, growing the buffer with zero octets as needed.
    pub fn add(&mut self, bits: impl IntoIterator<Item = u32>) {
        for bit in bits {
            let (byte, mask) = locate(bit);
            if byte >= self.bytes.len() {
                self.bytes.resize(byte + 1, 0);
            }
            self.bytes[byte] |= mask;
        }
    }

    /// Clear bits. Bits past the end are ignored and the buffer never shrinks.
    pub fn remove(&mut self, bits: impl IntoIterator<Item = u32>) {
        for bit in bits {
            let (byte, mask) = locate(bit);
            if let Some(b) = self.bytes.get_mut(byte) {
                *b &= !mask;
            }
        }
    }

    /// Set bits in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = u32> + '_ {
        self.bytes.iter().enumerate().flat_map(|(i, &byte)| {
            (0..8u32)
                .filter(move |b| byte & (0x80 >> b) != 0)
                .map(move |b| (i as u32) * 8 + b)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_numbering() {
        let bitmap = Bitmap::from_positions([1, 7]);
        assert_eq!(bitmap.as_bytes(), &[0x41]);
        let bitmap = Bitmap::from_positions([0, 8]);
        assert_eq!(bitmap.as_bytes(), &[0x80, 0x80]);
    }

    #[test]
    fn test_from_positions_length() {
        assert!(Bitmap::from_positions([]).as_bytes().is_empty());
        assert_eq!(Bitmap::from_positions([7]).as_bytes().len(), 1);
        assert_eq!(Bitmap::from_positions([8]).as_bytes().len(), 2);
        assert_eq!(Bitmap::from_positions([23]).as_bytes().len(), 3);
    }

    #[test]
    fn test_test_and_test_all() {
        let bitmap = Bitmap::from_bytes(*b"\x17\x00\x01");
        for bit in [3, 5, 6, 7, 23] {
            assert!(bitmap.test(bit), "bit {}", bit);
        }
        for bit in [0, 1, 2, 4, 8, 22, 24, 1000] {
            assert!(!bitmap.test(bit), "bit {}", bit);
        }
        assert!(bitmap.test_all([3, 5, 23]));
        assert!(!bitmap.test_all([3, 4]));
        assert!(!bitmap.test_all([3, 31]));
        assert!(bitmap.test_all([]));
    }

    #[test]
    fn test_add_remove_sequence() {
        let mut bitmap = Bitmap::from_bytes(*b"\x17\x00\x01");
        bitmap.add([2, 10]);
        bitmap.remove([22]);
        bitmap.remove([23, 22]);
        assert_eq!(bitmap.as_bytes(), b"\x37\x20\x00");
        bitmap.add([31]);
        assert_eq!(bitmap.as_bytes(), b"\x37\x20\x00\x01");
    }

    #[test]
    fn test_remove_never_shrinks() {
        let mut bitmap = Bitmap::from_positions([15]);
        bitmap.remove([15, 40]);
        assert_eq!(bitmap.as_bytes(), &[0, 0]);
    }

    #[test]
    fn test_positions() {
        let bitmap = Bitmap::from_bytes(*b"\x37\x20\x00\x01");
        let bits: Vec<u32> = bitmap.positions().collect();
        assert_eq!(bits, vec![2, 3, 5, 6, 7, 10, 31]);
    }
}
