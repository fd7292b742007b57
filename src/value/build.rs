//! Conversion of raw input into validated [`Data`].

use super::{Data, RawValue};
use crate::bitset::Bitmap;
use crate::error::{Error, Result, ValueErrorKind};
use crate::format::display_hint::{self, DisplayHint};
use crate::oid::Oid;
use crate::schema::{SchemaDescriptor, Syntax, ValueKind};
use bytes::Bytes;
use std::collections::BTreeSet;
use std::time::Duration;

/// Validation context: the node being built and its effective syntax.
pub(super) struct Builder<'a> {
    node: &'a SchemaDescriptor,
    syntax: &'a Syntax,
}

impl<'a> Builder<'a> {
    pub(super) fn new(node: &'a SchemaDescriptor) -> Result<Self> {
        Ok(Self {
            node,
            syntax: node.value_syntax()?,
        })
    }

    fn invalid(&self, kind: ValueErrorKind) -> Error {
        Error::invalid_value(self.node.qualified_name(), kind)
    }

    fn wrong_type(&self, expected: &'static str, raw: &RawValue) -> Error {
        Error::wrong_type(self.node.qualified_name(), expected, raw.kind_name())
    }

    pub(super) fn build(&self, raw: RawValue) -> Result<Data> {
        let data = match self.syntax.kind() {
            ValueKind::Integer32 => Data::Integer32(self.integer(raw)?),
            ValueKind::Integer64 => Data::Integer64(self.integer(raw)?),
            ValueKind::Unsigned32 => Data::Unsigned32(self.integer(raw)?),
            ValueKind::Unsigned64 => Data::Unsigned64(self.integer(raw)?),
            ValueKind::OctetString => Data::OctetString(self.octet_string(raw)?),
            ValueKind::IpAddress => Data::IpAddress(self.ip_address(raw)?),
            ValueKind::ObjectIdentifier => Data::ObjectIdentifier(self.object_identifier(raw)?),
            ValueKind::Enum => Data::Enum(self.enumeration(raw)?),
            ValueKind::Boolean => Data::Boolean(self.truth_value(raw)?),
            ValueKind::Bits => Data::Bits(self.bits(raw)?),
            ValueKind::TimeInterval => Data::TimeInterval(self.time_interval(raw)?),
        };
        Ok(data)
    }

    fn check_range(&self, value: i128) -> Result<()> {
        if self.syntax.in_range(value) {
            Ok(())
        } else {
            Err(self.invalid(ValueErrorKind::OutOfRange { value }))
        }
    }

    fn parse_number(&self, text: &str) -> Result<i128> {
        let trimmed = text.trim();
        if let Ok(value) = trimmed.parse::<i128>() {
            return Ok(value);
        }
        self.syntax
            .display_hint
            .as_deref()
            .and_then(|hint| display_hint::parse_integer(hint, trimmed))
            .ok_or_else(|| self.invalid(ValueErrorKind::InvalidNumber))
    }

    fn integer(&self, raw: RawValue) -> Result<i128> {
        let value = match raw {
            RawValue::Int(v) => v,
            RawValue::Text(ref s) => self.parse_number(s)?,
            other => return Err(self.wrong_type("integer", &other)),
        };
        self.check_range(value)?;
        Ok(value)
    }

    fn octet_string(&self, raw: RawValue) -> Result<Bytes> {
        let bytes = match raw {
            RawValue::Bytes(b) => b,
            RawValue::Text(s) => match &self.syntax.display_hint {
                Some(hint) => Bytes::from(DisplayHint::parse(hint)?.parse_text(&s)?),
                None => Bytes::from(s.into_bytes()),
            },
            RawValue::Int(v) => Bytes::from(v.to_string().into_bytes()),
            RawValue::List(items) => items
                .into_iter()
                .map(|item| self.octet(item))
                .collect::<Result<Vec<u8>>>()?
                .into(),
            other => return Err(self.wrong_type("octet string", &other)),
        };

        let length = bytes.len();
        if !self.syntax.in_range(length as i128) {
            return Err(self.invalid(ValueErrorKind::LengthOutOfRange { length }));
        }
        Ok(bytes)
    }

    fn octet(&self, raw: RawValue) -> Result<u8> {
        match raw {
            RawValue::Int(v) => u8::try_from(v).map_err(|_| {
                self.invalid(ValueErrorKind::OctetOutOfRange {
                    value: u32::try_from(v).unwrap_or(u32::MAX),
                })
            }),
            other => Err(self.wrong_type("octet", &other)),
        }
    }

    fn ip_address(&self, raw: RawValue) -> Result<[u8; 4]> {
        let octets: Vec<u8> = match raw {
            RawValue::List(items) => items
                .into_iter()
                .map(|item| self.octet(item))
                .collect::<Result<_>>()?,
            RawValue::Text(s) => s
                .trim()
                .split('.')
                .map(|part| {
                    let value: u32 = part
                        .parse()
                        .map_err(|_| self.invalid(ValueErrorKind::InvalidIpAddress))?;
                    u8::try_from(value)
                        .map_err(|_| self.invalid(ValueErrorKind::OctetOutOfRange { value }))
                })
                .collect::<Result<_>>()?,
            RawValue::Bytes(b) => b.to_vec(),
            RawValue::Int(v) => u32::try_from(v)
                .map_err(|_| self.invalid(ValueErrorKind::InvalidIpAddress))?
                .to_be_bytes()
                .to_vec(),
            other => return Err(self.wrong_type("IP address", &other)),
        };

        <[u8; 4]>::try_from(octets.as_slice())
            .map_err(|_| self.invalid(ValueErrorKind::InvalidIpAddress))
    }

    fn object_identifier(&self, raw: RawValue) -> Result<Oid> {
        match raw {
            RawValue::Oid(oid) => Ok(oid),
            RawValue::Text(s) => Oid::parse(&s),
            RawValue::List(items) => items
                .into_iter()
                .map(|item| match item {
                    RawValue::Int(v) => {
                        u32::try_from(v).map_err(|_| self.invalid(ValueErrorKind::NumberTooLarge))
                    }
                    other => Err(self.wrong_type("subidentifier", &other)),
                })
                .collect::<Result<Vec<u32>>>()
                .map(Oid::from),
            other => Err(self.wrong_type("object identifier", &other)),
        }
    }

    fn enumeration(&self, raw: RawValue) -> Result<i64> {
        let labels = &self.syntax.named_numbers;
        match raw {
            RawValue::Int(v) => {
                i64::try_from(v).map_err(|_| self.invalid(ValueErrorKind::NumberTooLarge))
            }
            RawValue::Text(s) => labels
                .number(&s)
                .or_else(|| s.trim().parse().ok())
                .ok_or_else(|| self.invalid(ValueErrorKind::UnknownLabel)),
            other => Err(self.wrong_type("enumeration", &other)),
        }
    }

    fn truth_value(&self, raw: RawValue) -> Result<i64> {
        let number = match raw {
            RawValue::Bool(true) => 1,
            RawValue::Bool(false) => 2,
            other => self.enumeration(other)?,
        };
        Ok(if number == 0 { 2 } else { number })
    }

    /// Resolve one bit by number or label.
    fn bit(&self, raw: RawValue) -> Result<u32> {
        let labels = &self.syntax.named_numbers;
        let number = match raw {
            RawValue::Int(v) => i64::try_from(v).ok(),
            RawValue::Text(ref s) => labels.number(s).or_else(|| s.trim().parse().ok()),
            other => return Err(self.wrong_type("bit", &other)),
        };
        number
            .filter(|n| labels.contains_number(*n))
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| self.invalid(ValueErrorKind::UnknownBit))
    }

    pub(super) fn bits(&self, raw: RawValue) -> Result<BTreeSet<u32>> {
        match raw {
            RawValue::Bytes(b) => Bitmap::from_bytes(b.to_vec())
                .positions()
                .map(|bit| self.bit(RawValue::Int(i128::from(bit))))
                .collect(),
            RawValue::List(items) => items.into_iter().map(|item| self.bit(item)).collect(),
            single => Ok(BTreeSet::from([self.bit(single)?])),
        }
    }

    fn time_interval(&self, raw: RawValue) -> Result<Duration> {
        let centis = match raw {
            RawValue::Int(v) => v,
            RawValue::Text(ref s) => self.parse_number(s)?,
            RawValue::Duration(d) => (d.as_millis() / 10) as i128,
            other => return Err(self.wrong_type("time interval", &other)),
        };
        if centis < 0 {
            return Err(self.invalid(ValueErrorKind::NegativeDuration));
        }
        self.check_range(centis)?;
        let millis = u64::try_from(centis)
            .ok()
            .and_then(|c| c.checked_mul(10))
            .ok_or_else(|| self.invalid(ValueErrorKind::NumberTooLarge))?;
        Ok(Duration::from_millis(millis))
    }
}
