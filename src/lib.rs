#![allow(clippy::result_large_err)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # snmp-mibtypes
//!
//! MIB-typed SNMP values and the table index OID codec.
//!
//! ## Features
//!
//! - Values bound to a schema node, validated against its syntax on construction
//! - DISPLAY-HINT rendering and parsing (RFC 2579)
//! - BER packing and unpacking of typed values
//! - Table index encoding and decoding, including IMPLIED and fixed-size columns
//! - Pluggable schema source through [`SchemaProvider`]
//!
//! ## Quick Start
//!
//! ```rust
//! use snmp_mibtypes::{IndexCodec, Registry, SchemaProvider, oid};
//! use snmp_mibtypes::schema::{BaseType, SchemaDescriptor, Syntax, TableIndexSpec};
//!
//! let mut registry = Registry::new();
//! let table = registry.insert(SchemaDescriptor::table(
//!     "LAB-MIB",
//!     "labIfTable",
//!     oid!(1, 3, 6, 1, 4, 1, 99999, 2),
//!     TableIndexSpec::new(["labIfIndex"]),
//! ));
//! registry.insert(SchemaDescriptor::column(
//!     "LAB-MIB",
//!     "labIfIndex",
//!     oid!(1, 3, 6, 1, 4, 1, 99999, 2, 1, 1),
//!     "labIfTable",
//!     Syntax::new(BaseType::Integer32).with_range(1, 65535),
//! ));
//! let descr = registry.insert(SchemaDescriptor::column(
//!     "LAB-MIB",
//!     "labIfDescr",
//!     oid!(1, 3, 6, 1, 4, 1, 99999, 2, 1, 2),
//!     "labIfTable",
//!     Syntax::new(BaseType::OctetString).with_range(0, 255),
//! ));
//!
//! let value = registry.build("LAB-MIB", "labIfDescr", "uplink").unwrap();
//! assert_eq!(value.to_string(), "uplink");
//!
//! let codec = IndexCodec::for_table(&registry, &table).unwrap();
//! let instance = codec.instance_oid(descr.oid(), &[3.into()]).unwrap();
//! assert_eq!(instance.to_string(), "1.3.6.1.4.1.99999.2.1.2.3");
//! ```

pub mod ber;
pub mod bitset;
pub mod error;
pub mod format;
pub mod index;
pub mod oid;
pub mod prelude;
pub mod schema;
pub mod value;
pub mod varbind;

#[cfg(feature = "cli")]
#[cfg_attr(docsrs, doc(cfg(feature = "cli")))]
pub mod cli;

// Re-exports for convenience
pub use error::{
    DecodeErrorKind, Error, ErrorCategory, HintErrorKind, OidErrorKind, Result, SchemaErrorKind,
    ValueErrorKind,
};
pub use format::display_hint::DisplayHint;
pub use index::{DecodeMode, IndexCodec, IndexValue};
pub use oid::Oid;
pub use schema::{Registry, Schema, SchemaDescriptor, SchemaProvider, Syntax, ValueKind};
pub use value::{Data, Packed, RawValue, TypedValue};
pub use varbind::VarBind;
