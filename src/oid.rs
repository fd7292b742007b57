//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for common OIDs.
//! Ordering is lexicographic on the arcs, which is the order agents walk in.

use crate::error::{DecodeErrorKind, Error, OidErrorKind, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a value".
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// Stored as a sequence of arc values (u32). Uses SmallVec to avoid
/// heap allocation for OIDs with 16 or fewer arcs.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    ///
    /// ```
    /// use snmp_mibtypes::oid::Oid;
    ///
    /// let oid = Oid::new([1, 3, 6, 1]);
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1]);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted notation.
    ///
    /// Empty components are skipped, so `".1.3..6"` parses as `1.3.6`.
    /// Arc constraints are not validated; call [`validate()`](Self::validate)
    /// for that.
    ///
    /// ```
    /// use snmp_mibtypes::oid::Oid;
    ///
    /// let oid = Oid::parse(".1.3.6.1.2.1").unwrap();
    /// assert_eq!(oid.to_string(), "1.3.6.1.2.1");
    /// assert!(Oid::parse("1.3.x").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let mut arcs = SmallVec::new();

        for part in s.split('.') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let arc: u32 = part.parse().map_err(|_| {
                Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s.to_string())
            })?;
            arcs.push(arc);
        }

        Ok(Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID has no arcs.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Check if this OID starts with all arcs of `prefix`.
    ///
    /// Every OID starts with itself and with the empty OID.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.arcs.starts_with(&prefix.arcs)
    }

    /// The arcs following `prefix`, if this OID starts with it.
    pub fn strip_prefix(&self, prefix: &Oid) -> Option<&[u32]> {
        self.arcs.strip_prefix(prefix.arcs.as_slice())
    }

    /// Parent OID (all arcs except the last), or `None` for an empty OID.
    pub fn parent(&self) -> Option<Oid> {
        if self.arcs.is_empty() {
            return None;
        }
        Some(Self::from_slice(&self.arcs[..self.arcs.len() - 1]))
    }

    /// Child OID with one more arc.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Self { arcs }
    }

    /// New OID with `suffix` appended.
    pub fn join(&self, suffix: &[u32]) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.extend_from_slice(suffix);
        Self { arcs }
    }

    /// Append arcs in place.
    pub fn extend_from_slice(&mut self, suffix: &[u32]) {
        self.arcs.extend_from_slice(suffix);
    }

    /// Validate arc constraints per X.690 Section 8.19.4.
    ///
    /// - a non-empty OID has at least two arcs
    /// - arc1 must be 0, 1, or 2
    /// - arc2 must be <= 39 when arc1 is 0 or 1
    /// - `arc1 * 40 + arc2` must fit a `u32` subidentifier
    pub fn validate(&self) -> Result<()> {
        let (first, second) = match self.arcs.as_slice() {
            [] => return Ok(()),
            [_] => return Err(Error::invalid_oid(OidErrorKind::TooFewArcs)),
            [first, second, ..] => (*first, *second),
        };

        if first > 2 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidFirstArc(first)));
        }

        if first_subidentifier(first, second).is_none() {
            return Err(Error::invalid_oid(OidErrorKind::InvalidSecondArc {
                first,
                second,
            }));
        }

        if self.arcs.len() > MAX_OID_LEN {
            return Err(Error::invalid_oid(OidErrorKind::TooManyArcs {
                count: self.arcs.len(),
                max: MAX_OID_LEN,
            }));
        }

        Ok(())
    }

    /// Encode the OID content octets after [`validate()`](Self::validate).
    ///
    /// Unlike [`to_ber`](Self::to_ber), an OID the wire cannot carry is an
    /// error instead of a different OID.
    pub fn try_to_ber(&self) -> Result<SmallVec<[u8; 64]>> {
        self.validate()?;
        let mut bytes = SmallVec::new();

        if let [first, second, rest @ ..] = self.arcs.as_slice() {
            let subid = first_subidentifier(*first, *second).ok_or_else(|| {
                Error::invalid_oid(OidErrorKind::InvalidSecondArc {
                    first: *first,
                    second: *second,
                })
            })?;
            encode_subidentifier(&mut bytes, subid);
            for &arc in rest {
                encode_subidentifier(&mut bytes, arc);
            }
        }

        Ok(bytes)
    }

    /// Encode the OID content octets (X.690 Section 8.19).
    ///
    /// The first two arcs share one subidentifier (`arc1 * 40 + arc2`); the
    /// rest are base-128 with continuation bits. Arc constraints are not
    /// checked here.
    pub fn to_ber_smallvec(&self) -> SmallVec<[u8; 64]> {
        let mut bytes = SmallVec::new();

        match self.arcs.as_slice() {
            [] => {}
            [first] => encode_subidentifier(&mut bytes, first.saturating_mul(40)),
            [first, second, rest @ ..] => {
                encode_subidentifier(
                    &mut bytes,
                    first.saturating_mul(40).saturating_add(*second),
                );
                for &arc in rest {
                    encode_subidentifier(&mut bytes, arc);
                }
            }
        }

        bytes
    }

    /// Encode the OID content octets into a `Vec`.
    pub fn to_ber(&self) -> Vec<u8> {
        self.to_ber_smallvec().to_vec()
    }

    /// Decode OID content octets.
    ///
    /// Enforces [`MAX_OID_LEN`] per RFC 2578 Section 3.5.
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();
        let (first_subid, consumed) = decode_subidentifier(data, 0)?;

        if first_subid < 40 {
            arcs.push(0);
            arcs.push(first_subid);
        } else if first_subid < 80 {
            arcs.push(1);
            arcs.push(first_subid - 40);
        } else {
            arcs.push(2);
            arcs.push(first_subid - 80);
        }

        let mut i = consumed;
        while i < data.len() {
            let (arc, bytes_consumed) = decode_subidentifier(&data[i..], i)?;
            arcs.push(arc);
            i += bytes_consumed;

            if arcs.len() > MAX_OID_LEN {
                return Err(Error::decode(
                    i,
                    DecodeErrorKind::OidTooLong {
                        count: arcs.len(),
                        max: MAX_OID_LEN,
                    },
                ));
            }
        }

        Ok(Self { arcs })
    }
}

/// Combined first subidentifier, `None` when the pair cannot be encoded.
fn first_subidentifier(first: u32, second: u32) -> Option<u32> {
    match first {
        0 | 1 if second < 40 => Some(first * 40 + second),
        2 => second.checked_add(80),
        _ => None,
    }
}

fn encode_subidentifier(bytes: &mut SmallVec<[u8; 64]>, value: u32) {
    if value == 0 {
        bytes.push(0);
        return;
    }

    let groups = (32 - value.leading_zeros()).div_ceil(7);
    for i in (0..groups).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
    }
}

/// Decode a subidentifier, returning (value, bytes_consumed).
fn decode_subidentifier(data: &[u8], base_offset: usize) -> Result<(u32, usize)> {
    let mut value: u32 = 0;

    for (i, &byte) in data.iter().enumerate() {
        if value > (u32::MAX >> 7) {
            return Err(Error::decode(
                base_offset + i,
                DecodeErrorKind::IntegerOverflow,
            ));
        }
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(Error::decode(
        base_offset + data.len(),
        DecodeErrorKind::InvalidOidEncoding,
    ))
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl From<Vec<u32>> for Oid {
    fn from(arcs: Vec<u32>) -> Self {
        Self::new(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl AsRef<[u32]> for Oid {
    fn as_ref(&self) -> &[u32] {
        &self.arcs
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Oid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Oid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Oid::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Macro to create an OID at compile time.
///
/// ```
/// use snmp_mibtypes::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}
