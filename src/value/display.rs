use super::{Data, TypedValue, centiseconds};
use crate::format::{display_hint, hex};
use std::fmt;
use std::net::Ipv4Addr;

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Data::Integer32(v) | Data::Integer64(v) | Data::Unsigned32(v) | Data::Unsigned64(v) => {
                match self
                    .display_hint()
                    .and_then(|hint| display_hint::apply_integer(hint, *v))
                {
                    Some(text) => f.write_str(&text),
                    None => write!(f, "{}", v),
                }
            }
            Data::OctetString(bytes) => match self.as_text() {
                Some(text) => f.write_str(&text),
                None => f.write_str(&hex::spaced(bytes)),
            },
            Data::IpAddress(octets) => write!(f, "{}", Ipv4Addr::from(*octets)),
            Data::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Data::Enum(v) | Data::Boolean(v) => match self.label() {
                Some(label) => write!(f, "{}({})", label, v),
                None => write!(f, "{}", v),
            },
            Data::Bits(bits) => {
                let labels = self.schema.syntax().map(|s| &s.named_numbers);
                for (i, bit) in bits.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match labels.and_then(|l| l.label(i64::from(*bit))) {
                        Some(label) => write!(f, "{}({})", label, bit)?,
                        None => write!(f, "{}", bit)?,
                    }
                }
                Ok(())
            }
            Data::TimeInterval(d) => {
                let total = centiseconds(d);
                let (centis, seconds) = (total % 100, total / 100);
                write!(
                    f,
                    "{}d {}h {}m {}.{:02}s",
                    seconds / 86_400,
                    seconds / 3_600 % 24,
                    seconds / 60 % 60,
                    seconds % 60,
                    centis
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::oid;
    use crate::schema::{BaseType, Schema, SchemaDescriptor, Syntax};
    use crate::value::TypedValue;
    use std::sync::Arc;

    fn render(syntax: Syntax, raw: impl Into<crate::value::RawValue>) -> String {
        let schema: Schema = Arc::new(SchemaDescriptor::scalar(
            "LAB-MIB",
            "labNode",
            oid!(1, 3, 6, 1, 4, 1, 99999, 1, 1),
            syntax,
        ));
        TypedValue::build(&schema, raw).unwrap().to_string()
    }

    #[test]
    fn test_integer_rendering() {
        assert_eq!(render(Syntax::new(BaseType::Integer32), -42), "-42");
        assert_eq!(
            render(Syntax::new(BaseType::Integer32).with_display_hint("d-2"), 1804),
            "18.04"
        );
        assert_eq!(
            render(Syntax::new(BaseType::Unsigned32).with_display_hint("x"), 255),
            "ff"
        );
    }

    #[test]
    fn test_octet_string_rendering() {
        assert_eq!(render(Syntax::new(BaseType::OctetString), "test"), "test");
        assert_eq!(
            render(Syntax::new(BaseType::OctetString), b"tes\x05"),
            "0x74 65 73 05"
        );
        assert_eq!(
            render(
                Syntax::new(BaseType::OctetString).with_display_hint("1x:"),
                b"test"
            ),
            "74:65:73:74"
        );
        // data that does not fit the hint falls back to hex
        assert_eq!(
            render(
                Syntax::new(BaseType::OctetString).with_display_hint("2d."),
                &[1u8, 2, 3]
            ),
            "0x01 02 03"
        );
    }

    #[test]
    fn test_enum_and_bits_rendering() {
        let status = Syntax::new(BaseType::Enum).with_named_numbers([("up", 1), ("down", 2)]);
        assert_eq!(render(status.clone(), "down"), "down(2)");
        assert_eq!(render(status, 5), "5");

        let bits = Syntax::new(BaseType::Bits).with_named_numbers([
            ("first", 0),
            ("second", 1),
            ("third", 2),
            ("last", 7),
        ]);
        assert_eq!(
            render(bits, vec!["last", "second", "third"]),
            "second(1), third(2), last(7)"
        );
    }

    #[test]
    fn test_time_interval_rendering() {
        let ticks = Syntax::new(BaseType::Unsigned32).with_type_name("TimeTicks");
        assert_eq!(render(ticks.clone(), 123_456), "0d 0h 20m 34.56s");
        assert_eq!(render(ticks, 8_640_000 + 360_000 + 6_001), "1d 1h 1m 0.01s");
    }

    #[test]
    fn test_address_rendering() {
        let ip = Syntax::new(BaseType::OctetString).with_type_name("IpAddress");
        assert_eq!(render(ip, [192, 168, 0, 1]), "192.168.0.1");
        assert_eq!(
            render(Syntax::new(BaseType::ObjectIdentifier), "1.3.6.1"),
            "1.3.6.1"
        );
    }
}
