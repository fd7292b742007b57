//! Schema-bound typed values.
//!
//! A [`TypedValue`] pairs a [`Schema`] handle with validated [`Data`]. Values
//! are built from [`RawValue`] input, which is checked against the node's
//! syntax: kind, declared ranges, named numbers and display hint.
//!
//! Integer data is stored wide, so a value may be valid for its schema yet
//! too large for its wire encoding. That surfaces as an overflow error from
//! [`TypedValue::pack`].
//!
//! # Example
//!
//! ```
//! use snmp_mibtypes::oid;
//! use snmp_mibtypes::schema::{BaseType, SchemaDescriptor, Syntax};
//! use snmp_mibtypes::value::TypedValue;
//! use std::sync::Arc;
//!
//! let schema = Arc::new(SchemaDescriptor::scalar(
//!     "LAB-MIB",
//!     "labIpAddress",
//!     oid!(1, 3, 6, 1, 4, 1, 99999, 1, 5),
//!     Syntax::new(BaseType::OctetString).with_type_name("IpAddress"),
//! ));
//! let addr = TypedValue::build(&schema, "10.00.4.05").unwrap();
//! assert!(addr.matches("10.0.4.5"));
//! assert_eq!(addr.to_string(), "10.0.4.5");
//! ```

mod bits;
mod build;
mod display;
mod raw;
pub mod wire;

pub use raw::RawValue;
pub use wire::Packed;

use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::schema::{Schema, ValueKind};
use build::Builder;
use bytes::Bytes;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Validated content of a typed value, one variant per [`ValueKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Data {
    Integer32(i128),
    Integer64(i128),
    Unsigned32(i128),
    Unsigned64(i128),
    OctetString(Bytes),
    IpAddress([u8; 4]),
    ObjectIdentifier(Oid),
    Enum(i64),
    Boolean(i64),
    /// Set bit positions, ascending.
    Bits(BTreeSet<u32>),
    /// Whole centiseconds.
    TimeInterval(Duration),
}

impl Data {
    /// The kind this data belongs to.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Integer32(_) => ValueKind::Integer32,
            Self::Integer64(_) => ValueKind::Integer64,
            Self::Unsigned32(_) => ValueKind::Unsigned32,
            Self::Unsigned64(_) => ValueKind::Unsigned64,
            Self::OctetString(_) => ValueKind::OctetString,
            Self::IpAddress(_) => ValueKind::IpAddress,
            Self::ObjectIdentifier(_) => ValueKind::ObjectIdentifier,
            Self::Enum(_) => ValueKind::Enum,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Bits(_) => ValueKind::Bits,
            Self::TimeInterval(_) => ValueKind::TimeInterval,
        }
    }
}

/// Centiseconds in a duration.
pub(crate) fn centiseconds(d: &Duration) -> u128 {
    d.as_millis() / 10
}

/// A value bound to the schema node it was built for.
///
/// Equality and ordering compare data only, never the schema binding.
#[derive(Debug, Clone)]
pub struct TypedValue {
    schema: Schema,
    data: Data,
}

impl TypedValue {
    /// Build a value for `schema`.
    ///
    /// What each kind accepts:
    ///
    /// | kind | accepted input |
    /// |------|----------------|
    /// | integers | `Int`, numeric `Text` |
    /// | octet string | `Bytes`, `Text` (through the display hint if any), `Int`, `List` of octets |
    /// | IP address | 4-element `List`, dotted-quad `Text`, 4 `Bytes`, `Int` |
    /// | object identifier | `Oid`, dotted `Text`, `List` of arcs, a schema node |
    /// | enumeration | number, label, numeric `Text` |
    /// | truth value | as enumeration, plus `Bool` |
    /// | bits | number, label, `List` of either, bitmap `Bytes` |
    /// | time interval | `Int` centiseconds, `Duration` |
    pub fn build(schema: &Schema, raw: impl Into<RawValue>) -> Result<Self> {
        let data = Builder::new(schema)?.build(raw.into())?;
        Ok(Self {
            schema: Schema::clone(schema),
            data,
        })
    }

    /// Replace the data with a freshly built value. On error nothing changes.
    pub fn set(&mut self, raw: impl Into<RawValue>) -> Result<()> {
        self.data = Builder::new(&self.schema)?.build(raw.into())?;
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn into_data(self) -> Data {
        self.data
    }

    pub fn kind(&self) -> ValueKind {
        self.data.kind()
    }

    /// Numeric value of integer, enumeration, truth value and time kinds.
    ///
    /// Time intervals report centiseconds.
    pub fn as_int(&self) -> Option<i128> {
        match &self.data {
            Data::Integer32(v) | Data::Integer64(v) | Data::Unsigned32(v) | Data::Unsigned64(v) => {
                Some(*v)
            }
            Data::Enum(v) | Data::Boolean(v) => Some(i128::from(*v)),
            Data::TimeInterval(d) => i128::try_from(centiseconds(d)).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(|v| i64::try_from(v).ok())
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_int().and_then(|v| u64::try_from(v).ok())
    }

    /// Raw octets of an octet string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.data {
            Data::OctetString(b) => Some(b),
            _ => None,
        }
    }

    /// Text form of an octet string.
    ///
    /// With a display hint this is the rendered text; without one it is the
    /// content when it is printable UTF-8. `None` otherwise.
    pub fn as_text(&self) -> Option<String> {
        let Data::OctetString(bytes) = &self.data else {
            return None;
        };
        match self.display_hint() {
            Some(hint) => crate::format::display_hint::DisplayHint::parse(hint)
                .and_then(|h| h.render(bytes))
                .ok(),
            None => std::str::from_utf8(bytes)
                .ok()
                .filter(|s| s.chars().all(|c| !c.is_control() || c.is_whitespace()))
                .map(str::to_owned),
        }
    }

    pub fn as_oid(&self) -> Option<&Oid> {
        match &self.data {
            Data::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    pub fn as_ip(&self) -> Option<Ipv4Addr> {
        match &self.data {
            Data::IpAddress(octets) => Some(Ipv4Addr::from(*octets)),
            _ => None,
        }
    }

    /// Truth value: `true(1)` is true, anything else false.
    pub fn as_bool(&self) -> Option<bool> {
        match &self.data {
            Data::Boolean(v) => Some(*v == 1),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match &self.data {
            Data::TimeInterval(d) => Some(*d),
            _ => None,
        }
    }

    /// Set bit positions of a bits value.
    pub fn bits(&self) -> Option<&BTreeSet<u32>> {
        match &self.data {
            Data::Bits(bits) => Some(bits),
            _ => None,
        }
    }

    /// Label of an enumeration or truth value, if its number is defined.
    pub fn label(&self) -> Option<&str> {
        match &self.data {
            Data::Enum(v) | Data::Boolean(v) => self.schema.syntax()?.named_numbers.label(*v),
            _ => None,
        }
    }

    pub(crate) fn display_hint(&self) -> Option<&str> {
        self.schema.syntax()?.display_hint.as_deref()
    }

    /// Raw form that builds back to this value.
    pub fn to_raw(&self) -> RawValue {
        match &self.data {
            Data::Integer32(v) | Data::Integer64(v) | Data::Unsigned32(v) | Data::Unsigned64(v) => {
                RawValue::Int(*v)
            }
            Data::OctetString(b) => RawValue::Bytes(b.clone()),
            Data::IpAddress(octets) => RawValue::Bytes(Bytes::copy_from_slice(octets)),
            Data::ObjectIdentifier(oid) => RawValue::Oid(oid.clone()),
            Data::Enum(v) | Data::Boolean(v) => RawValue::Int(i128::from(*v)),
            Data::Bits(bits) => {
                RawValue::List(bits.iter().map(|b| RawValue::Int(i128::from(*b))).collect())
            }
            Data::TimeInterval(d) => RawValue::Duration(*d),
        }
    }

    /// Whether `raw`, built for the same schema, equals this value.
    ///
    /// Input that does not build is simply unequal.
    pub fn matches(&self, raw: impl Into<RawValue>) -> bool {
        Self::build(&self.schema, raw).is_ok_and(|other| other.data == self.data)
    }

    /// Order against raw input built for the same schema.
    ///
    /// Enumerations, truth values and bits have no order.
    pub fn cmp_raw(&self, raw: impl Into<RawValue>) -> Result<Ordering> {
        let kind = self.kind();
        if matches!(kind, ValueKind::Enum | ValueKind::Boolean | ValueKind::Bits) {
            return Err(Error::not_implemented("ordering", kind.name()));
        }
        let other = Self::build(&self.schema, raw)?;
        self.partial_cmp(&other)
            .ok_or_else(|| Error::not_implemented("ordering", kind.name()))
    }

    /// Substring test on an octet string.
    ///
    /// Uses the text form when there is one, the raw octets otherwise.
    pub fn contains(&self, needle: &str) -> Result<bool> {
        let Data::OctetString(bytes) = &self.data else {
            return Err(Error::not_implemented("substring test", self.kind().name()));
        };
        if let Some(text) = self.as_text() {
            return Ok(text.contains(needle));
        }
        let needle = needle.as_bytes();
        Ok(needle.is_empty() || bytes.windows(needle.len()).any(|w| w == needle))
    }

    /// Whether `raw` names an OID at or below this one.
    pub fn contains_oid(&self, raw: impl Into<RawValue>) -> Result<bool> {
        let Data::ObjectIdentifier(oid) = &self.data else {
            return Err(Error::not_implemented("OID containment", self.kind().name()));
        };
        let other = Self::build(&self.schema, raw)?;
        Ok(other.as_oid().is_some_and(|o| o.starts_with(oid)))
    }
}

impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for TypedValue {}

impl PartialOrd for TypedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (&self.data, &other.data) {
            (Data::OctetString(a), Data::OctetString(b)) => match (self.as_text(), other.as_text())
            {
                (Some(x), Some(y)) => Some(x.cmp(&y)),
                _ => Some(a.cmp(b)),
            },
            (Data::IpAddress(a), Data::IpAddress(b)) => Some(a.cmp(b)),
            (Data::ObjectIdentifier(a), Data::ObjectIdentifier(b)) => Some(a.cmp(b)),
            (Data::TimeInterval(a), Data::TimeInterval(b)) => Some(a.cmp(b)),
            (a, b) if a.kind() == b.kind() && a.kind().is_integer() => {
                Some(self.as_int()?.cmp(&other.as_int()?))
            }
            _ => None,
        }
    }
}

impl From<&TypedValue> for RawValue {
    fn from(value: &TypedValue) -> Self {
        value.to_raw()
    }
}

impl From<TypedValue> for RawValue {
    fn from(value: TypedValue) -> Self {
        value.to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCategory, ValueErrorKind};
    use crate::oid;
    use crate::schema::{BaseType, SchemaDescriptor, Syntax};
    use std::sync::Arc;

    fn scalar(name: &str, arc: u32, syntax: Syntax) -> Schema {
        Arc::new(SchemaDescriptor::scalar(
            "LAB-MIB",
            name,
            oid!(1, 3, 6, 1, 4, 1, 99999, 1).child(arc),
            syntax,
        ))
    }

    fn integer() -> Schema {
        scalar(
            "labInteger",
            1,
            Syntax::new(BaseType::Integer32)
                .with_range(6, 18)
                .with_range(20, 23)
                .with_range(27, 1336),
        )
    }

    fn status() -> Schema {
        scalar(
            "labEnum",
            2,
            Syntax::new(BaseType::Enum).with_named_numbers([("up", 1), ("down", 2), ("testing", 3)]),
        )
    }

    fn truth() -> Schema {
        scalar(
            "labBoolean",
            3,
            Syntax::new(BaseType::Enum)
                .with_type_name("TruthValue")
                .with_named_numbers([("true", 1), ("false", 2)]),
        )
    }

    fn ticks() -> Schema {
        scalar(
            "labTimeticks",
            4,
            Syntax::new(BaseType::Unsigned32).with_type_name("TimeTicks"),
        )
    }

    fn string() -> Schema {
        scalar(
            "labString",
            5,
            Syntax::new(BaseType::OctetString)
                .with_type_name("DisplayString")
                .with_display_hint("255a")
                .with_range(0, 255),
        )
    }

    fn object_id() -> Schema {
        scalar("labObjectId", 6, Syntax::new(BaseType::ObjectIdentifier))
    }

    #[test]
    fn test_integer_ranges() {
        let schema = integer();
        assert_eq!(TypedValue::build(&schema, 18).unwrap().as_int(), Some(18));
        assert_eq!(TypedValue::build(&schema, " 21 ").unwrap().as_int(), Some(21));
        let err = TypedValue::build(&schema, 19).unwrap_err();
        assert_eq!(err.value_kind(), Some(ValueErrorKind::OutOfRange { value: 19 }));
        let err = TypedValue::build(&schema, "abc").unwrap_err();
        assert_eq!(err.value_kind(), Some(ValueErrorKind::InvalidNumber));
        let err = TypedValue::build(&schema, Oid::empty()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Type);
    }

    #[test]
    fn test_set_keeps_value_on_error() {
        let mut value = TypedValue::build(&integer(), 10).unwrap();
        assert!(value.set(1337).is_err());
        assert_eq!(value.as_int(), Some(10));
        value.set(1336).unwrap();
        assert_eq!(value.as_int(), Some(1336));
    }

    #[test]
    fn test_enum_labels_and_numbers() {
        let schema = status();
        let up = TypedValue::build(&schema, "up").unwrap();
        assert_eq!(up.as_int(), Some(1));
        assert_eq!(up.label(), Some("up"));
        assert!(up.matches(1));
        assert!(up.matches("up"));
        assert!(!up.matches("down"));

        let unknown = TypedValue::build(&schema, 7).unwrap();
        assert_eq!(unknown.label(), None);

        let err = TypedValue::build(&schema, "sideways").unwrap_err();
        assert_eq!(err.value_kind(), Some(ValueErrorKind::UnknownLabel));
        assert_eq!(up.cmp_raw(2).unwrap_err().category(), ErrorCategory::NotImplemented);
    }

    #[test]
    fn test_truth_value() {
        let schema = truth();
        assert_eq!(TypedValue::build(&schema, true).unwrap().as_bool(), Some(true));
        let off = TypedValue::build(&schema, false).unwrap();
        assert_eq!(off.as_int(), Some(2));
        assert_eq!(off.as_bool(), Some(false));
        let zero = TypedValue::build(&schema, 0).unwrap();
        assert_eq!(zero.as_int(), Some(2));
        assert!(zero.matches("false"));
    }

    #[test]
    fn test_time_interval() {
        let schema = ticks();
        let value = TypedValue::build(&schema, 12345).unwrap();
        assert_eq!(value.as_duration(), Some(Duration::from_millis(123_450)));
        assert_eq!(value.as_int(), Some(12345));

        let truncated = TypedValue::build(&schema, Duration::from_millis(1_239)).unwrap();
        assert_eq!(truncated.as_int(), Some(123));

        assert_eq!(value.cmp_raw(12344).unwrap(), Ordering::Greater);
        assert_eq!(value.cmp_raw(Duration::from_secs(200)).unwrap(), Ordering::Less);

        let err = TypedValue::build(&schema, -1).unwrap_err();
        assert_eq!(err.value_kind(), Some(ValueErrorKind::NegativeDuration));
    }

    #[test]
    fn test_octet_string_text_and_contains() {
        let schema = string();
        let value = TypedValue::build(&schema, "Hello world!").unwrap();
        assert_eq!(value.as_bytes(), Some(b"Hello world!".as_slice()));
        assert_eq!(value.as_text().as_deref(), Some("Hello world!"));
        assert!(value.contains("world").unwrap());
        assert!(!value.contains("moon").unwrap());
        assert!(value.cmp_raw("Hello").unwrap().is_gt());

        let long = "x".repeat(256);
        let err = TypedValue::build(&schema, long).unwrap_err();
        assert_eq!(err.value_kind(), Some(ValueErrorKind::LengthOutOfRange { length: 256 }));
    }

    #[test]
    fn test_octet_string_from_list() {
        let schema = string();
        let value = TypedValue::build(&schema, [0x74, 0x65]).unwrap();
        assert_eq!(value.as_bytes(), Some(b"te".as_slice()));
        assert!(TypedValue::build(&schema, [300]).is_err());
    }

    #[test]
    fn test_object_identifier() {
        let schema = object_id();
        let value = TypedValue::build(&schema, "1.3.6.1.4.1.9").unwrap();
        assert_eq!(value.as_oid(), Some(&oid!(1, 3, 6, 1, 4, 1, 9)));
        assert!(value.matches([1, 3, 6, 1, 4, 1, 9]));
        assert!(value.matches(".1.3.6.1.4.1.9."));
        assert!(value.contains_oid("1.3.6.1.4.1.9.1.2").unwrap());
        assert!(value.contains_oid("1.3.6.1.4.1.9").unwrap());
        assert!(!value.contains_oid("1.3.6.1.4.1").unwrap());

        let node = scalar("labInteger", 1, Syntax::new(BaseType::Integer32));
        let value = TypedValue::build(&schema, node.as_ref()).unwrap();
        assert_eq!(value.as_oid(), Some(node.oid()));

        let err = TypedValue::build(&schema, true).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Type);
    }

    #[test]
    fn test_equality_ignores_schema() {
        let a = TypedValue::build(&integer(), 10).unwrap();
        let other = scalar("labOther", 9, Syntax::new(BaseType::Integer32));
        let b = TypedValue::build(&other, 10).unwrap();
        assert_eq!(a, b);
        assert!(a < TypedValue::build(&other, 11).unwrap());
    }

    #[test]
    fn test_to_raw_rebuilds() {
        for (schema, raw) in [
            (integer(), RawValue::from(12)),
            (status(), RawValue::from("testing")),
            (ticks(), RawValue::from(99)),
            (string(), RawValue::from("abc")),
            (object_id(), RawValue::from("1.3.6")),
        ] {
            let value = TypedValue::build(&schema, raw).unwrap();
            let again = TypedValue::build(&schema, value.to_raw()).unwrap();
            assert_eq!(value, again);
        }
    }
}
