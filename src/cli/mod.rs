//! CLI utilities for snmp-mibtypes.
//!
//! Argument structures and output formatting for the `mibtypes-index` tool.
//!
//! This module is only available with the `cli` feature.

pub mod args;
pub mod output;
