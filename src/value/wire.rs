//! BER packing of typed values.
//!
//! | kind | tag |
//! |------|-----|
//! | Integer32, Integer64 | INTEGER, or Counter64 above the 32-bit signed range |
//! | enumeration, truth value | INTEGER |
//! | Unsigned32 | Counter32 for `Counter32`/`Counter` types, else Gauge32 |
//! | Unsigned64 | Counter64 |
//! | time interval | TimeTicks |
//! | octet string | OCTET STRING, or Opaque for `Opaque` types |
//! | IP address | IpAddress |
//! | object identifier | OBJECT IDENTIFIER |
//! | bits | OCTET STRING holding the MSB-first bitmap |

use super::{Data, RawValue, TypedValue, centiseconds};
use crate::ber::{
    Decoder, EncodeBuf, decode_signed, decode_unsigned, signed_content, tag, unsigned_content,
};
use crate::bitset::Bitmap;
use crate::error::{Error, Result, ValueErrorKind};
use crate::format::hex;
use crate::oid::Oid;
use crate::schema::{Schema, SchemaDescriptor, ValueKind};
use bytes::Bytes;

/// Tag and content octets of a packed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed {
    pub tag: u8,
    pub content: Bytes,
}

impl Packed {
    pub fn new(tag: u8, content: impl Into<Bytes>) -> Self {
        Self {
            tag,
            content: content.into(),
        }
    }

    /// Write the full TLV.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_tlv(self.tag, &self.content);
    }

    /// Read one primitive TLV.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let (tag, content) = decoder.read_tlv()?;
        Ok(Self { tag, content })
    }

    /// Encoded TLV bytes.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = EncodeBuf::with_capacity(self.content.len() + 6);
        self.encode(&mut buf);
        buf.finish()
    }
}

impl TypedValue {
    /// Pack for the wire.
    ///
    /// Fails with an overflow error when the value does not fit its tag.
    pub fn pack(&self) -> Result<Packed> {
        let overflow =
            |value: i128, target| Error::overflow(self.schema.qualified_name(), value, target);
        let syntax = self.schema.syntax();
        let is_type = |name: &str| syntax.is_some_and(|s| s.is_type(name));

        let packed = match &self.data {
            Data::Integer32(v) | Data::Integer64(v) => {
                if let Ok(small) = i32::try_from(*v) {
                    Packed::new(tag::universal::INTEGER, signed(i64::from(small)))
                } else {
                    let big = u64::try_from(*v).map_err(|_| overflow(*v, "Counter64"))?;
                    Packed::new(tag::application::COUNTER64, unsigned(big))
                }
            }
            Data::Unsigned32(v) => {
                let v32 = u32::try_from(*v).map_err(|_| overflow(*v, "Unsigned32"))?;
                let tag = if is_type("Counter32") || is_type("Counter") {
                    tag::application::COUNTER32
                } else {
                    tag::application::GAUGE32
                };
                Packed::new(tag, unsigned(u64::from(v32)))
            }
            Data::Unsigned64(v) => {
                let v = u64::try_from(*v).map_err(|_| overflow(*v, "Counter64"))?;
                Packed::new(tag::application::COUNTER64, unsigned(v))
            }
            Data::Enum(v) | Data::Boolean(v) => {
                let v32 = i32::try_from(*v).map_err(|_| overflow(i128::from(*v), "INTEGER"))?;
                Packed::new(tag::universal::INTEGER, signed(i64::from(v32)))
            }
            Data::TimeInterval(d) => {
                let centis = centiseconds(d);
                let ticks = u32::try_from(centis)
                    .map_err(|_| overflow(i128::try_from(centis).unwrap_or(i128::MAX), "TimeTicks"))?;
                Packed::new(tag::application::TIMETICKS, unsigned(u64::from(ticks)))
            }
            Data::OctetString(bytes) => {
                let tag = if is_type("Opaque") {
                    tag::application::OPAQUE
                } else {
                    tag::universal::OCTET_STRING
                };
                Packed::new(tag, bytes.clone())
            }
            Data::IpAddress(octets) => {
                Packed::new(tag::application::IP_ADDRESS, Bytes::copy_from_slice(octets))
            }
            Data::ObjectIdentifier(oid) => {
                let content = oid.try_to_ber()?;
                Packed::new(
                    tag::universal::OBJECT_IDENTIFIER,
                    Bytes::copy_from_slice(&content),
                )
            }
            Data::Bits(bits) => Packed::new(
                tag::universal::OCTET_STRING,
                Bitmap::from_positions(bits.iter().copied()).into_bytes(),
            ),
        };

        tracing::trace!(
            target: "snmp_mibtypes::value",
            node = %self.schema.qualified_name(),
            tag = tag::tag_name(packed.tag),
            content = %hex::Bytes(&packed.content),
            "packed value"
        );
        Ok(packed)
    }

    /// Rebuild a value for `schema` from a wire tag and content octets.
    ///
    /// Tags that carry no value (NULL, exceptions, unknown tags) are
    /// unsupported; known tags of the wrong family are a type mismatch.
    pub fn unpack(tag: u8, content: &[u8], schema: &Schema) -> Result<TypedValue> {
        let kind = schema.value_syntax()?.kind();
        let raw = match unpack_raw(tag, content, kind, schema) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(
                    target: "snmp_mibtypes::value",
                    node = %schema.qualified_name(),
                    tag = tag::tag_name(tag),
                    error = %err,
                    "cannot unpack value"
                );
                return Err(err);
            }
        };
        TypedValue::build(schema, raw)
    }

    /// Rebuild a value from a [`Packed`].
    pub fn unpack_packed(packed: &Packed, schema: &Schema) -> Result<TypedValue> {
        Self::unpack(packed.tag, &packed.content, schema)
    }
}

fn signed(value: i64) -> Bytes {
    Bytes::copy_from_slice(&signed_content(value))
}

fn unsigned(value: u64) -> Bytes {
    Bytes::copy_from_slice(&unsigned_content(value))
}

fn is_known_tag(t: u8) -> bool {
    matches!(
        t,
        tag::universal::INTEGER
            | tag::universal::OCTET_STRING
            | tag::universal::OBJECT_IDENTIFIER
            | tag::application::IP_ADDRESS
            | tag::application::COUNTER32
            | tag::application::GAUGE32
            | tag::application::TIMETICKS
            | tag::application::OPAQUE
            | tag::application::COUNTER64
    )
}

fn unpack_raw(t: u8, content: &[u8], kind: ValueKind, node: &SchemaDescriptor) -> Result<RawValue> {
    if !is_known_tag(t) {
        return Err(Error::UnsupportedType { tag: t });
    }
    let mismatch = || Error::TypeMismatch {
        tag: t,
        kind: kind.name(),
    };

    match kind {
        ValueKind::Integer32
        | ValueKind::Integer64
        | ValueKind::Unsigned32
        | ValueKind::Unsigned64
        | ValueKind::Enum
        | ValueKind::Boolean
        | ValueKind::TimeInterval => match t {
            tag::universal::INTEGER => Ok(RawValue::Int(i128::from(decode_signed(content, 0)?))),
            tag::application::COUNTER32
            | tag::application::GAUGE32
            | tag::application::TIMETICKS
            | tag::application::COUNTER64 => {
                Ok(RawValue::Int(i128::from(decode_unsigned(content, 0)?)))
            }
            _ => Err(mismatch()),
        },
        ValueKind::OctetString => match t {
            tag::universal::OCTET_STRING | tag::application::OPAQUE => {
                Ok(RawValue::Bytes(Bytes::copy_from_slice(content)))
            }
            _ => Err(mismatch()),
        },
        ValueKind::Bits => match t {
            tag::universal::OCTET_STRING => Ok(RawValue::Bytes(Bytes::copy_from_slice(content))),
            _ => Err(mismatch()),
        },
        ValueKind::IpAddress => match t {
            tag::application::IP_ADDRESS | tag::universal::OCTET_STRING => {
                if content.len() != 4 {
                    return Err(Error::invalid_value(
                        node.qualified_name(),
                        ValueErrorKind::InvalidLength {
                            length: content.len(),
                        },
                    ));
                }
                Ok(RawValue::Bytes(Bytes::copy_from_slice(content)))
            }
            _ => Err(mismatch()),
        },
        ValueKind::ObjectIdentifier => match t {
            tag::universal::OBJECT_IDENTIFIER => Ok(RawValue::Oid(Oid::from_ber(content)?)),
            _ => Err(mismatch()),
        },
    }
}
