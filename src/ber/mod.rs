//! BER (Basic Encoding Rules) primitives for SNMP values.
//!
//! Only the subset needed to carry typed values is implemented: primitive
//! TLVs, SEQUENCE wrapping for varbinds, and the SNMP application tags.
//! Parsing is permissive in the same places net-snmp is.

mod decode;
mod encode;
mod length;
pub mod tag;

pub use decode::*;
pub use encode::*;
pub use length::*;
pub use tag::*;
