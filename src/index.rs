//! Table index codec.
//!
//! Table rows are addressed by appending the encoded index to a column OID.
//! Each index column encodes to subidentifiers according to its syntax:
//!
//! | kind | encoding |
//! |------|----------|
//! | integers, enumeration, truth value, time interval | one arc |
//! | IP address | four arcs |
//! | fixed-size octet string | one arc per octet |
//! | other octet string | length, then one arc per octet |
//! | object identifier | length, then the arcs |
//!
//! An IMPLIED last column drops the length prefix and consumes every
//! remaining arc when decoding.
//!
//! ```
//! use snmp_mibtypes::index::IndexCodec;
//! use snmp_mibtypes::oid;
//! use snmp_mibtypes::schema::{BaseType, SchemaDescriptor, Syntax};
//! use std::sync::Arc;
//!
//! let name = Arc::new(SchemaDescriptor::column(
//!     "LAB-MIB",
//!     "labName",
//!     oid!(1, 3, 6, 1, 4, 1, 99999, 3, 1, 1),
//!     "labNameTable",
//!     Syntax::new(BaseType::OctetString),
//! ));
//! let codec = IndexCodec::new(vec![name], true);
//! let arcs = codec.encode(&["hello".into()]).unwrap();
//! assert_eq!(arcs, vec![104, 101, 108, 108, 111]);
//!
//! let (consumed, index) = codec.decode(&arcs).unwrap();
//! assert_eq!(consumed, 5);
//! assert_eq!(index.to_string(), "hello");
//! ```

use crate::error::{Error, Result, ValueErrorKind};
use crate::format::hex;
use crate::oid::Oid;
use crate::schema::{Schema, SchemaDescriptor, SchemaProvider, ValueKind};
use crate::value::{Data, RawValue, TypedValue, centiseconds};
use std::fmt;

/// How to treat octet arcs above 255 when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Reject the index.
    #[default]
    Strict,
    /// Keep the low 8 bits and log a warning. Some agents emit such indexes.
    Lossy,
}

fn index_error(node: &SchemaDescriptor, kind: ValueErrorKind) -> Error {
    Error::invalid_value(node.qualified_name(), kind)
}

fn single_arc(value: &TypedValue, number: i128) -> Result<Vec<u32>> {
    u32::try_from(number)
        .map(|arc| vec![arc])
        .map_err(|_| index_error(value.schema(), ValueErrorKind::IndexArcOutOfRange))
}

fn length_arc(value: &TypedValue, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| index_error(value.schema(), ValueErrorKind::IndexArcOutOfRange))
}

/// Encode one index column.
///
/// `implied` drops the length prefix of variable-length values.
pub fn encode_column(value: &TypedValue, implied: bool) -> Result<Vec<u32>> {
    let fixed = value.schema().syntax().and_then(|s| s.fixed_len()).is_some();

    match value.data() {
        Data::Integer32(v) | Data::Integer64(v) | Data::Unsigned32(v) | Data::Unsigned64(v) => {
            single_arc(value, *v)
        }
        Data::Enum(v) | Data::Boolean(v) => single_arc(value, i128::from(*v)),
        Data::TimeInterval(d) => {
            single_arc(value, i128::try_from(centiseconds(d)).unwrap_or(i128::MAX))
        }
        Data::IpAddress(octets) => Ok(octets.iter().map(|&o| u32::from(o)).collect()),
        Data::OctetString(bytes) => {
            let mut arcs = Vec::with_capacity(bytes.len() + 1);
            if !implied && !fixed {
                arcs.push(length_arc(value, bytes.len())?);
            }
            arcs.extend(bytes.iter().map(|&b| u32::from(b)));
            Ok(arcs)
        }
        Data::ObjectIdentifier(oid) => {
            let mut arcs = Vec::with_capacity(oid.len() + 1);
            if !implied {
                arcs.push(length_arc(value, oid.len())?);
            }
            arcs.extend_from_slice(oid.arcs());
            Ok(arcs)
        }
        Data::Bits(_) => Err(Error::not_implemented("index encoding", "bits")),
    }
}

/// Take `needed` arcs from the front of `arcs`.
fn take<'a>(node: &SchemaDescriptor, arcs: &'a [u32], needed: usize) -> Result<&'a [u32]> {
    arcs.get(..needed).ok_or_else(|| {
        index_error(
            node,
            ValueErrorKind::IndexTooShort {
                needed,
                available: arcs.len(),
            },
        )
    })
}

fn octets(node: &SchemaDescriptor, arcs: &[u32], mode: DecodeMode) -> Result<Vec<u8>> {
    let mut masked = false;
    let octets = arcs
        .iter()
        .map(|&arc| match u8::try_from(arc) {
            Ok(octet) => Ok(octet),
            Err(_) if mode == DecodeMode::Lossy => {
                masked = true;
                Ok((arc & 0xFF) as u8)
            }
            Err(_) => Err(index_error(node, ValueErrorKind::OctetOutOfRange { value: arc })),
        })
        .collect::<Result<Vec<u8>>>()?;

    if masked {
        tracing::warn!(
            target: "snmp_mibtypes::index",
            node = %node.qualified_name(),
            arcs = ?arcs,
            octets = %hex::Bytes(&octets),
            "index arcs above 255 masked to octets"
        );
    }
    Ok(octets)
}

/// Decode one index column from the front of `arcs`.
///
/// Returns the number of arcs consumed and the value.
pub fn decode_column(
    schema: &Schema,
    arcs: &[u32],
    implied: bool,
    mode: DecodeMode,
) -> Result<(usize, TypedValue)> {
    let syntax = schema.value_syntax()?;

    let (consumed, value) = match syntax.kind() {
        ValueKind::Integer32
        | ValueKind::Integer64
        | ValueKind::Unsigned32
        | ValueKind::Unsigned64
        | ValueKind::Enum
        | ValueKind::Boolean
        | ValueKind::TimeInterval => {
            let arc = take(schema, arcs, 1)?[0];
            (1, TypedValue::build(schema, RawValue::Int(i128::from(arc)))?)
        }
        ValueKind::IpAddress => {
            let quad = take(schema, arcs, 4)?;
            let octets = octets(schema, quad, DecodeMode::Strict)?;
            (4, TypedValue::build(schema, octets)?)
        }
        ValueKind::OctetString => {
            let (consumed, body) = if implied {
                (arcs.len(), arcs)
            } else if let Some(len) = syntax.fixed_len() {
                (len, take(schema, arcs, len)?)
            } else {
                let (&len, rest) = arcs
                    .split_first()
                    .ok_or_else(|| index_error(schema, ValueErrorKind::EmptyIndex))?;
                let len = len as usize;
                (len + 1, take(schema, rest, len)?)
            };
            let octets = octets(schema, body, mode)?;
            (consumed, TypedValue::build(schema, octets)?)
        }
        ValueKind::ObjectIdentifier => {
            let (consumed, body) = if implied {
                (arcs.len(), arcs)
            } else {
                let (&len, rest) = arcs
                    .split_first()
                    .ok_or_else(|| index_error(schema, ValueErrorKind::EmptyIndex))?;
                let len = len as usize;
                (len + 1, take(schema, rest, len)?)
            };
            (consumed, TypedValue::build(schema, Oid::from_slice(body))?)
        }
        ValueKind::Bits => return Err(Error::not_implemented("index decoding", "bits")),
    };

    tracing::trace!(
        target: "snmp_mibtypes::index",
        column = %schema.qualified_name(),
        consumed,
        value = %value,
        "decoded index column"
    );
    Ok((consumed, value))
}

/// Decoded table index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexValue {
    /// Index of a single-column table.
    Scalar(TypedValue),
    /// Index of a multi-column table, in declared order.
    Tuple(Vec<TypedValue>),
}

impl IndexValue {
    /// Index components in declared order.
    pub fn values(&self) -> &[TypedValue] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::Tuple(values) => values,
        }
    }

    pub fn into_values(self) -> Vec<TypedValue> {
        match self {
            Self::Scalar(value) => vec![value],
            Self::Tuple(values) => values,
        }
    }

    /// Raw forms of the components, suitable for [`IndexCodec::encode`].
    pub fn to_raw(&self) -> Vec<RawValue> {
        self.values().iter().map(TypedValue::to_raw).collect()
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{}", value),
            Self::Tuple(values) => {
                f.write_str("(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Encoder and decoder for the index of one table.
#[derive(Debug, Clone)]
pub struct IndexCodec {
    columns: Vec<Schema>,
    implied: bool,
    mode: DecodeMode,
    name: Box<str>,
}

impl IndexCodec {
    /// Codec over explicit index columns. `implied` applies to the last one.
    pub fn new(columns: Vec<Schema>, implied: bool) -> Self {
        let name = columns
            .first()
            .map(|c| match c.table_name() {
                Some(table) => format!("{}::{}", c.module(), table),
                None => c.qualified_name(),
            })
            .unwrap_or_default()
            .into();
        Self {
            columns,
            implied,
            mode: DecodeMode::Strict,
            name,
        }
    }

    /// Codec for a table's INDEX clause.
    pub fn for_table<P>(provider: &P, table: &SchemaDescriptor) -> Result<Self>
    where
        P: SchemaProvider + ?Sized,
    {
        let columns = provider.index_columns(table)?;
        let implied = table.index().is_some_and(|spec| spec.implied);
        Ok(Self {
            name: table.qualified_name().into(),
            ..Self::new(columns, implied)
        })
    }

    pub fn with_mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn columns(&self) -> &[Schema] {
        &self.columns
    }

    pub fn is_implied(&self) -> bool {
        self.implied
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    fn implied_at(&self, position: usize) -> bool {
        self.implied && position + 1 == self.columns.len()
    }

    fn check_arity(&self, actual: usize) -> Result<()> {
        if actual == self.columns.len() {
            return Ok(());
        }
        Err(Error::invalid_value(
            self.name.clone(),
            ValueErrorKind::IndexArity {
                expected: self.columns.len(),
                actual,
            },
        ))
    }

    /// Build typed index values, one per column.
    pub fn build(&self, raw: &[RawValue]) -> Result<Vec<TypedValue>> {
        self.check_arity(raw.len())?;
        self.columns
            .iter()
            .zip(raw)
            .map(|(column, raw)| TypedValue::build(column, raw.clone()))
            .collect()
    }

    /// Encode raw index values.
    pub fn encode(&self, raw: &[RawValue]) -> Result<Vec<u32>> {
        self.encode_values(&self.build(raw)?)
    }

    /// Encode typed index values.
    pub fn encode_values(&self, values: &[TypedValue]) -> Result<Vec<u32>> {
        self.check_arity(values.len())?;
        let mut arcs = Vec::new();
        for (position, value) in values.iter().enumerate() {
            arcs.extend(encode_column(value, self.implied_at(position))?);
        }
        Ok(arcs)
    }

    /// Encode a decoded index back to arcs.
    pub fn encode_index(&self, index: &IndexValue) -> Result<Vec<u32>> {
        self.encode_values(index.values())
    }

    /// Decode an index from the front of `arcs`.
    ///
    /// Returns the number of arcs consumed and the index.
    pub fn decode(&self, arcs: &[u32]) -> Result<(usize, IndexValue)> {
        let mut consumed = 0;
        let mut values = Vec::with_capacity(self.columns.len());
        for (position, column) in self.columns.iter().enumerate() {
            let (used, value) =
                decode_column(column, &arcs[consumed..], self.implied_at(position), self.mode)?;
            consumed += used;
            values.push(value);
        }

        let index = if values.len() == 1 {
            IndexValue::Scalar(values.remove(0))
        } else {
            IndexValue::Tuple(values)
        };
        Ok((consumed, index))
    }

    /// Instance OID of a row: `column` followed by the encoded index.
    pub fn instance_oid(&self, column: &Oid, raw: &[RawValue]) -> Result<Oid> {
        Ok(column.join(&self.encode(raw)?))
    }

    /// Decode the index of an instance OID under `column`.
    ///
    /// The suffix must decode completely.
    pub fn split_instance(&self, column: &Oid, instance: &Oid) -> Result<IndexValue> {
        let not_instance = || {
            Error::invalid_value(self.name.clone(), ValueErrorKind::NotAnInstance)
        };
        let suffix = instance.strip_prefix(column).ok_or_else(not_instance)?;
        let (consumed, index) = self.decode(suffix)?;
        if consumed != suffix.len() {
            return Err(not_instance());
        }
        Ok(index)
    }

    /// Encode a partial index: values for the leading columns only.
    ///
    /// Used to restrict a walk to rows sharing an index prefix. The filter
    /// must name fewer values than there are columns; IMPLIED never applies.
    pub fn filter_prefix(&self, raw: &[RawValue]) -> Result<Vec<u32>> {
        if raw.len() >= self.columns.len() {
            return Err(Error::invalid_value(
                self.name.clone(),
                ValueErrorKind::FilterTooLong {
                    columns: self.columns.len(),
                },
            ));
        }
        let mut arcs = Vec::new();
        for (column, raw) in self.columns.iter().zip(raw) {
            let value = TypedValue::build(column, raw.clone())?;
            arcs.extend(encode_column(&value, false)?);
        }
        Ok(arcs)
    }
}
