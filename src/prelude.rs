//! Prelude module for convenient imports.
//!
//! ```rust
//! use snmp_mibtypes::prelude::*;
//! ```
//!
//! This imports:
//! - Values: [`TypedValue`], [`RawValue`], [`Oid`], [`VarBind`]
//! - Schema: [`Schema`], [`SchemaProvider`], [`Registry`]
//! - Index handling: [`IndexCodec`], [`IndexValue`]
//! - Error handling: [`Error`], [`Result`]
//! - The [`oid!`] macro for compile-time OID construction

pub use crate::error::{Error, Result};
pub use crate::index::{IndexCodec, IndexValue};
pub use crate::oid::Oid;
pub use crate::schema::{Registry, Schema, SchemaProvider};
pub use crate::value::{RawValue, TypedValue};
pub use crate::varbind::VarBind;

#[doc(no_inline)]
pub use crate::oid;
