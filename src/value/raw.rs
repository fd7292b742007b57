//! Untyped input accepted by [`TypedValue::build`](super::TypedValue::build).

use crate::oid::Oid;
use crate::schema::SchemaDescriptor;
use bytes::Bytes;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Raw input for a typed value.
///
/// Which variants a node accepts depends on its syntax; see
/// [`TypedValue::build`](super::TypedValue::build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Int(i128),
    Text(String),
    Bytes(Bytes),
    Bool(bool),
    List(Vec<RawValue>),
    Oid(Oid),
    /// Time interval, truncated to centiseconds when built.
    Duration(Duration),
}

impl RawValue {
    /// Short name of the variant, used in type errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Bool(_) => "boolean",
            Self::List(_) => "list",
            Self::Oid(_) => "OID",
            Self::Duration(_) => "duration",
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{:?}", s),
            Self::Bytes(b) => write!(f, "{}", crate::format::hex::spaced(b)),
            Self::Bool(b) => write!(f, "{}", b),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Oid(oid) => write!(f, "{}", oid),
            Self::Duration(d) => write!(f, "{:?}", d),
        }
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RawValue {
                fn from(v: $t) -> Self {
                    Self::Int(v as i128)
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, i128, u16, u32, u64, usize);

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for RawValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<&[u8]> for RawValue {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(b))
    }
}

impl<const N: usize> From<&[u8; N]> for RawValue {
    fn from(b: &[u8; N]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(b))
    }
}

impl From<Bytes> for RawValue {
    fn from(b: Bytes) -> Self {
        Self::Bytes(b)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Oid> for RawValue {
    fn from(oid: Oid) -> Self {
        Self::Oid(oid)
    }
}

impl From<&Oid> for RawValue {
    fn from(oid: &Oid) -> Self {
        Self::Oid(oid.clone())
    }
}

impl From<Duration> for RawValue {
    fn from(d: Duration) -> Self {
        Self::Duration(d)
    }
}

impl From<Ipv4Addr> for RawValue {
    fn from(addr: Ipv4Addr) -> Self {
        Self::Bytes(Bytes::copy_from_slice(&addr.octets()))
    }
}

/// A schema node stands for its OID.
impl From<&SchemaDescriptor> for RawValue {
    fn from(node: &SchemaDescriptor) -> Self {
        Self::Oid(node.oid().clone())
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(items: Vec<RawValue>) -> Self {
        Self::List(items)
    }
}

macro_rules! from_list {
    ($($t:ty),*) => {
        $(
            impl From<Vec<$t>> for RawValue {
                fn from(items: Vec<$t>) -> Self {
                    Self::List(items.into_iter().map(Into::into).collect())
                }
            }

            impl From<&[$t]> for RawValue {
                fn from(items: &[$t]) -> Self {
                    Self::List(items.iter().cloned().map(Into::into).collect())
                }
            }

            impl<const N: usize> From<[$t; N]> for RawValue {
                fn from(items: [$t; N]) -> Self {
                    Self::List(items.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

from_list!(i32, u32, i64, u64, &str, String);
