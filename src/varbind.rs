//! Variable binding (VarBind) type.
//!
//! A VarBind pairs an instance OID with a typed value. Values are bound to
//! the schema node that owns the OID, so decoding needs a
//! [`SchemaProvider`].

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{Error, Result};
use crate::index::IndexCodec;
use crate::oid::Oid;
use crate::schema::SchemaProvider;
use crate::value::{Packed, RawValue, TypedValue};

/// Variable binding - an OID and an optional typed value.
///
/// `None` stands for NULL: request varbinds, and responses carrying an
/// exception (noSuchObject, noSuchInstance, endOfMibView).
#[derive(Debug, Clone, PartialEq)]
pub struct VarBind {
    /// The instance OID.
    pub oid: Oid,
    /// The value.
    pub value: Option<TypedValue>,
}

impl VarBind {
    /// Create a new VarBind.
    pub fn new(oid: Oid, value: TypedValue) -> Self {
        Self {
            oid,
            value: Some(value),
        }
    }

    /// Create a VarBind with a NULL value (for GET requests).
    pub fn null(oid: Oid) -> Self {
        Self { oid, value: None }
    }

    /// VarBind for a table cell: `column` followed by the encoded index.
    pub fn instance(
        column: &Oid,
        codec: &IndexCodec,
        index: &[RawValue],
        value: TypedValue,
    ) -> Result<Self> {
        Ok(Self::new(codec.instance_oid(column, index)?, value))
    }

    /// Encode to BER.
    ///
    /// The OID is validated and the value packed first, so a failure
    /// leaves `buf` untouched.
    pub fn encode(&self, buf: &mut EncodeBuf) -> Result<()> {
        self.oid.validate()?;
        let packed = self.value.as_ref().map(TypedValue::pack).transpose()?;
        buf.push_sequence(|buf| {
            match &packed {
                Some(packed) => packed.encode(buf),
                None => buf.push_null(),
            }
            buf.push_oid(&self.oid);
        });
        Ok(())
    }

    /// Decode from BER, binding the value to the node that owns the OID.
    pub fn decode<P>(decoder: &mut Decoder, provider: &P) -> Result<Self>
    where
        P: SchemaProvider + ?Sized,
    {
        let mut seq = decoder.read_sequence()?;
        let oid = seq.read_oid()?;
        let packed = Packed::decode(&mut seq)?;

        if packed.tag == tag::universal::NULL || tag::is_exception(packed.tag) {
            tracing::trace!(
                target: "snmp_mibtypes::value",
                oid = %oid,
                tag = tag::tag_name(packed.tag),
                "varbind without value"
            );
            return Ok(Self::null(oid));
        }

        let schema = provider
            .resolve_oid(&oid)
            .ok_or_else(|| Error::no_such_definition("", oid.to_string()))?;
        let value = TypedValue::unpack_packed(&packed, &schema)?;
        Ok(Self::new(oid, value))
    }
}

impl std::fmt::Display for VarBind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} = {}", self.oid, value),
            None => write!(f, "{} = NULL", self.oid),
        }
    }
}

/// Encode a list of VarBinds.
pub fn encode_varbind_list(buf: &mut EncodeBuf, varbinds: &[VarBind]) -> Result<()> {
    let packed = varbinds
        .iter()
        .map(|vb| {
            vb.oid.validate()?;
            vb.value.as_ref().map(TypedValue::pack).transpose()
        })
        .collect::<Result<Vec<_>>>()?;

    buf.push_sequence(|buf| {
        // Reverse buffer: last varbind first
        for (vb, packed) in varbinds.iter().zip(&packed).rev() {
            buf.push_sequence(|buf| {
                match packed {
                    Some(packed) => packed.encode(buf),
                    None => buf.push_null(),
                }
                buf.push_oid(&vb.oid);
            });
        }
    });
    Ok(())
}

/// Decode a list of VarBinds.
pub fn decode_varbind_list<P>(decoder: &mut Decoder, provider: &P) -> Result<Vec<VarBind>>
where
    P: SchemaProvider + ?Sized,
{
    let mut seq = decoder.read_sequence()?;
    let mut varbinds = Vec::new();

    while !seq.is_empty() {
        varbinds.push(VarBind::decode(&mut seq, provider)?);
    }

    Ok(varbinds)
}

/// Encode a list of OIDs as VarBinds with NULL values (for GET requests).
pub fn encode_null_varbinds(buf: &mut EncodeBuf, oids: &[Oid]) -> Result<()> {
    oids.iter().try_for_each(Oid::validate)?;
    buf.push_sequence(|buf| {
        for oid in oids.iter().rev() {
            buf.push_sequence(|buf| {
                buf.push_null();
                buf.push_oid(oid);
            });
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::oid;
    use crate::schema::{BaseType, Registry, SchemaDescriptor, Syntax, TableIndexSpec};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.insert(SchemaDescriptor::scalar(
            "LAB-MIB",
            "labCounter",
            oid!(1, 3, 6, 1, 4, 1, 99999, 1, 7),
            Syntax::new(BaseType::Unsigned32).with_type_name("Counter32"),
        ));
        registry.insert(SchemaDescriptor::table(
            "LAB-MIB",
            "labPortTable",
            oid!(1, 3, 6, 1, 4, 1, 99999, 2),
            TableIndexSpec::new(["labPortIndex"]),
        ));
        registry.insert(SchemaDescriptor::column(
            "LAB-MIB",
            "labPortIndex",
            oid!(1, 3, 6, 1, 4, 1, 99999, 2, 1, 1),
            "labPortTable",
            Syntax::new(BaseType::Integer32).with_range(1, 65535),
        ));
        registry.insert(SchemaDescriptor::column(
            "LAB-MIB",
            "labPortName",
            oid!(1, 3, 6, 1, 4, 1, 99999, 2, 1, 2),
            "labPortTable",
            Syntax::new(BaseType::OctetString),
        ));
        registry
    }

    #[test]
    fn test_varbind_roundtrip() {
        let registry = registry();
        let value = registry.build("LAB-MIB", "labCounter", 42).unwrap();
        let vb = VarBind::new(oid!(1, 3, 6, 1, 4, 1, 99999, 1, 7, 0), value);

        let mut buf = EncodeBuf::new();
        vb.encode(&mut buf).unwrap();
        let bytes = buf.finish();

        let mut decoder = Decoder::new(bytes);
        let decoded = VarBind::decode(&mut decoder, &registry).unwrap();

        assert_eq!(vb, decoded);
        assert_eq!(decoded.to_string(), "1.3.6.1.4.1.99999.1.7.0 = 42");
    }

    #[test]
    fn test_varbind_list_roundtrip() {
        let registry = registry();
        let table = registry.resolve("LAB-MIB", "labPortTable").unwrap();
        let codec = IndexCodec::for_table(&registry, &table).unwrap();
        let name = registry.resolve("LAB-MIB", "labPortName").unwrap();

        let varbinds = vec![
            VarBind::instance(
                name.oid(),
                &codec,
                &[RawValue::from(1)],
                TypedValue::build(&name, "eth0").unwrap(),
            )
            .unwrap(),
            VarBind::null(oid!(1, 3, 6, 1, 4, 1, 99999, 1, 7, 0)),
        ];
        assert_eq!(varbinds[0].oid, name.oid().child(1));

        let mut buf = EncodeBuf::new();
        encode_varbind_list(&mut buf, &varbinds).unwrap();
        let bytes = buf.finish();

        let mut decoder = Decoder::new(bytes);
        let decoded = decode_varbind_list(&mut decoder, &registry).unwrap();

        assert_eq!(varbinds, decoded);
    }

    #[test]
    fn test_varbind_exception_decodes_as_null() {
        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            buf.push_tlv(tag::context::NO_SUCH_INSTANCE, &[]);
            buf.push_oid(&oid!(1, 3, 6, 1, 4, 1, 99999, 1, 7, 0));
        });

        let mut decoder = Decoder::new(buf.finish());
        let decoded = VarBind::decode(&mut decoder, &registry()).unwrap();
        assert!(decoded.value.is_none());
        assert_eq!(decoded.to_string(), "1.3.6.1.4.1.99999.1.7.0 = NULL");
    }

    #[test]
    fn test_varbind_unknown_oid() {
        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            buf.push_integer(1);
            buf.push_oid(&oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
        });

        let mut decoder = Decoder::new(buf.finish());
        let err = VarBind::decode(&mut decoder, &registry()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Schema);
    }

    #[test]
    fn test_varbind_overflow_leaves_buffer_untouched() {
        let registry = registry();
        let schema = registry.resolve("LAB-MIB", "labCounter").unwrap();
        let value = TypedValue::build(&schema, 1u64 << 40).unwrap();
        let vb = VarBind::new(oid!(1, 3, 6, 1, 4, 1, 99999, 1, 7, 0), value);

        let mut buf = EncodeBuf::new();
        let err = vb.encode(&mut buf).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Overflow);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_unencodable_oid_leaves_buffer_untouched() {
        let vb = VarBind::null(oid!(1, 50, 3));
        let mut buf = EncodeBuf::new();
        let err = vb.encode(&mut buf).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Value);
        assert!(encode_varbind_list(&mut buf, &[vb]).is_err());
        assert!(encode_null_varbinds(&mut buf, &[oid!(7, 1)]).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_null_varbinds() {
        let mut buf = EncodeBuf::new();
        encode_null_varbinds(&mut buf, &[oid!(1, 3, 6, 1, 4, 1, 99999, 1, 7, 0)]).unwrap();

        let mut decoder = Decoder::new(buf.finish());
        let decoded = decode_varbind_list(&mut decoder, &registry()).unwrap();
        assert_eq!(decoded, vec![VarBind::null(oid!(1, 3, 6, 1, 4, 1, 99999, 1, 7, 0))]);
    }
}
