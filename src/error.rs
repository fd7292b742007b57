//! Error types for snmp-mibtypes.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.
//! [`Error::category`] maps every error onto the coarse value/type/overflow
//! taxonomy callers usually branch on.

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed or out-of-range input.
    Value,
    /// Structurally wrong input kind or wire tag.
    Type,
    /// Numeric value exceeds the wire encoding's range.
    Overflow,
    /// Operation not supported by the value kind.
    NotImplemented,
    /// Schema lookup or schema configuration failure.
    Schema,
    /// Malformed BER data.
    Decode,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value => write!(f, "value error"),
            Self::Type => write!(f, "type error"),
            Self::Overflow => write!(f, "overflow error"),
            Self::NotImplemented => write!(f, "not implemented"),
            Self::Schema => write!(f, "schema error"),
            Self::Decode => write!(f, "decode error"),
        }
    }
}

/// Value validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueErrorKind {
    /// Integer outside every declared range.
    OutOfRange { value: i128 },
    /// Octet string length outside every declared size range.
    LengthOutOfRange { length: usize },
    /// Text is not a number.
    InvalidNumber,
    /// Number does not fit the target representation.
    NumberTooLarge,
    /// IP address with the wrong component count or a bad octet.
    InvalidIpAddress,
    /// Octet value above 255.
    OctetOutOfRange { value: u32 },
    /// Label not present in the enumeration.
    UnknownLabel,
    /// Bit number or label not present in the bit table.
    UnknownBit,
    /// Negative time interval.
    NegativeDuration,
    /// Index suffix shorter than the column requires.
    IndexTooShort { needed: usize, available: usize },
    /// Variable-length index column with no length prefix left.
    EmptyIndex,
    /// Index value that cannot be a subidentifier.
    IndexArcOutOfRange,
    /// Wrong number of index values for the table.
    IndexArity { expected: usize, actual: usize },
    /// Table filter must name fewer values than there are index columns.
    FilterTooLong { columns: usize },
    /// Instance OID is not under the column OID.
    NotAnInstance,
    /// Wire content has the wrong size for the kind.
    InvalidLength { length: usize },
}

impl std::fmt::Display for ValueErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { value } => write!(f, "{} is outside the allowed range", value),
            Self::LengthOutOfRange { length } => {
                write!(f, "length {} is outside the allowed size", length)
            }
            Self::InvalidNumber => write!(f, "not a number"),
            Self::NumberTooLarge => write!(f, "number too large"),
            Self::InvalidIpAddress => write!(f, "not a valid IPv4 address"),
            Self::OctetOutOfRange { value } => write!(f, "{} is not a valid octet", value),
            Self::UnknownLabel => write!(f, "not a valid enumeration label"),
            Self::UnknownBit => write!(f, "not a valid bit"),
            Self::NegativeDuration => write!(f, "time interval cannot be negative"),
            Self::IndexTooShort { needed, available } => {
                write!(
                    f,
                    "index needs {} subidentifiers but only {} remain",
                    needed, available
                )
            }
            Self::EmptyIndex => write!(f, "empty index"),
            Self::IndexArcOutOfRange => write!(f, "value does not fit a subidentifier"),
            Self::IndexArity { expected, actual } => {
                write!(f, "expected {} index values, got {}", expected, actual)
            }
            Self::FilterTooLong { columns } => {
                write!(f, "filter must have fewer than {} values", columns)
            }
            Self::NotAnInstance => write!(f, "OID is not an instance of this column"),
            Self::InvalidLength { length } => write!(f, "invalid content length {}", length),
        }
    }
}

/// DISPLAY-HINT error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintErrorKind {
    /// Hint string is empty.
    Empty,
    /// Octet length digits missing.
    MissingLength,
    /// Octet length of zero.
    ZeroLength,
    /// Format character missing or not one of `a`, `t`, `x`, `o`, `d`.
    InvalidFormat,
    /// Numeric field wider than 8 octets.
    FieldTooWide { length: usize },
    /// Data ends inside a numeric field.
    TruncatedField { needed: usize, available: usize },
    /// Repeat count larger than the remaining data.
    RepeatOverrun,
}

impl std::fmt::Display for HintErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty display hint"),
            Self::MissingLength => write!(f, "missing octet length"),
            Self::ZeroLength => write!(f, "octet length must be positive"),
            Self::InvalidFormat => write!(f, "invalid format character"),
            Self::FieldTooWide { length } => {
                write!(f, "numeric field of {} octets is too wide", length)
            }
            Self::TruncatedField { needed, available } => {
                write!(f, "field needs {} octets but only {} remain", needed, available)
            }
            Self::RepeatOverrun => write!(f, "repeat count exceeds remaining data"),
        }
    }
}

/// Schema lookup and configuration error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// Node is not a table.
    NotATable,
    /// Node is not a table column.
    NotAColumn,
    /// Table has no index columns.
    NoIndex,
    /// Overriding type selects a different value kind.
    IncompatibleOverride,
}

impl std::fmt::Display for SchemaErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotATable => write!(f, "not a table"),
            Self::NotAColumn => write!(f, "not a table column"),
            Self::NoIndex => write!(f, "table has no index"),
            Self::IncompatibleOverride => write!(f, "incompatible type override"),
        }
    }
}

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Expected different tag.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Data truncated unexpectedly.
    TruncatedData,
    /// Invalid BER length encoding.
    InvalidLength,
    /// Indefinite length not supported.
    IndefiniteLength,
    /// Integer value overflow.
    IntegerOverflow,
    /// Zero-length integer.
    ZeroLengthInteger,
    /// Invalid OID encoding.
    InvalidOidEncoding,
    /// NULL with non-zero length.
    InvalidNull,
    /// Length field too long.
    LengthTooLong { octets: usize },
    /// Length exceeds maximum.
    LengthExceedsMax { length: usize, max: usize },
    /// Integer64 too long.
    Integer64TooLong { length: usize },
    /// OID has more subidentifiers than allowed.
    OidTooLong { count: usize, max: usize },
    /// Insufficient data for read.
    InsufficientData { needed: usize, available: usize },
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::InvalidLength => write!(f, "invalid length encoding"),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::IntegerOverflow => write!(f, "integer overflow"),
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::InvalidOidEncoding => write!(f, "invalid OID encoding"),
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::Integer64TooLong { length } => {
                write!(f, "integer64 too long: {} bytes", length)
            }
            Self::OidTooLong { count, max } => {
                write!(f, "OID has {} subidentifiers, exceeds maximum {}", count, max)
            }
            Self::InsufficientData { needed, available } => {
                write!(f, "need {} bytes but only {} remaining", needed, available)
            }
        }
    }
}

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Invalid arc value.
    InvalidArc,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u32),
    /// Second arc too large for first arc value.
    InvalidSecondArc { first: u32, second: u32 },
    /// OID has too many arcs (exceeds MAX_OID_LEN).
    TooManyArcs { count: usize, max: usize },
    /// A single arc has no BER encoding.
    TooFewArcs,
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => {
                write!(f, "second arc {} too large for first arc {}", second, first)
            }
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
            Self::TooFewArcs => write!(f, "OID needs at least two arcs"),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Input rejected by a node's syntax.
    #[error("invalid value for {node}: {kind}")]
    InvalidValue { node: Box<str>, kind: ValueErrorKind },

    /// Input of a kind the node's syntax cannot take.
    #[error("{node} expects {expected}, got {actual}")]
    WrongType {
        node: Box<str>,
        expected: &'static str,
        actual: &'static str,
    },

    /// Value does not fit its wire encoding.
    #[error("{value} does not fit {target} for {node}")]
    Overflow {
        node: Box<str>,
        value: i128,
        target: &'static str,
    },

    /// Operation not supported by the value kind.
    #[error("{operation} is not supported on {kind} values")]
    NotImplemented {
        operation: &'static str,
        kind: &'static str,
    },

    /// Malformed DISPLAY-HINT string or data that does not fit it.
    #[error("display hint {hint:?}: {kind}")]
    InvalidDisplayHint { hint: Box<str>, kind: HintErrorKind },

    /// Text that does not match a DISPLAY-HINT.
    #[error("{text:?} does not match display hint {hint:?}")]
    DisplayMismatch { hint: Box<str>, text: Box<str> },

    /// Invalid OID format.
    #[error("invalid OID: {kind}")]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>, // Only allocated when parsing string input
    },

    /// Wire tag incompatible with the node's syntax.
    #[error("wire tag 0x{tag:02X} cannot carry {kind} values")]
    TypeMismatch { tag: u8, kind: &'static str },

    /// Wire tag that carries no value.
    #[error("unsupported wire tag 0x{tag:02X}")]
    UnsupportedType { tag: u8 },

    /// BER decoding error.
    #[error("decode error at offset {offset}: {kind}")]
    Decode {
        offset: usize,
        kind: DecodeErrorKind,
    },

    /// Name not known to the schema provider.
    #[error("no such definition: {module}::{name}")]
    NoSuchDefinition { module: Box<str>, name: Box<str> },

    /// Node unusable for the requested schema operation.
    #[error("{node}: {kind}")]
    Schema { node: Box<str>, kind: SchemaErrorKind },

    /// Schema document could not be loaded.
    #[error("cannot load schema: {message}")]
    SchemaLoad { message: Box<str> },
}

impl Error {
    /// Create a value error.
    pub fn invalid_value(node: impl Into<Box<str>>, kind: ValueErrorKind) -> Self {
        Self::InvalidValue {
            node: node.into(),
            kind,
        }
    }

    /// Create a wrong-type error.
    pub fn wrong_type(
        node: impl Into<Box<str>>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::WrongType {
            node: node.into(),
            expected,
            actual,
        }
    }

    /// Create an overflow error.
    pub fn overflow(node: impl Into<Box<str>>, value: i128, target: &'static str) -> Self {
        Self::Overflow {
            node: node.into(),
            value,
            target,
        }
    }

    /// Create a not-implemented error.
    pub fn not_implemented(operation: &'static str, kind: &'static str) -> Self {
        Self::NotImplemented { operation, kind }
    }

    /// Create a display hint error.
    pub fn hint(hint: impl Into<Box<str>>, kind: HintErrorKind) -> Self {
        Self::InvalidDisplayHint {
            hint: hint.into(),
            kind,
        }
    }

    /// Create a decode error.
    pub fn decode(offset: usize, kind: DecodeErrorKind) -> Self {
        Self::Decode { offset, kind }
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Create a missing-definition error.
    pub fn no_such_definition(module: impl Into<Box<str>>, name: impl Into<Box<str>>) -> Self {
        Self::NoSuchDefinition {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Create a schema error.
    pub fn schema(node: impl Into<Box<str>>, kind: SchemaErrorKind) -> Self {
        Self::Schema {
            node: node.into(),
            kind,
        }
    }

    /// Classify the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidValue { .. }
            | Self::InvalidDisplayHint { .. }
            | Self::DisplayMismatch { .. }
            | Self::InvalidOid { .. } => ErrorCategory::Value,
            Self::WrongType { .. } | Self::TypeMismatch { .. } => ErrorCategory::Type,
            Self::Overflow { .. } => ErrorCategory::Overflow,
            Self::NotImplemented { .. } | Self::UnsupportedType { .. } => {
                ErrorCategory::NotImplemented
            }
            Self::NoSuchDefinition { .. } | Self::Schema { .. } | Self::SchemaLoad { .. } => {
                ErrorCategory::Schema
            }
            Self::Decode { .. } => ErrorCategory::Decode,
        }
    }

    /// The value kind the error is about, if any.
    pub fn value_kind(&self) -> Option<ValueErrorKind> {
        match self {
            Self::InvalidValue { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
