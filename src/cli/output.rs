//! Output formatting for CLI tools.
//!
//! Supports human-readable and JSON output formats.

use crate::ber::tag;
use crate::cli::args::OutputFormat;
use crate::format::hex;
use crate::index::IndexValue;
use crate::value::{Packed, TypedValue};
use serde::Serialize;
use std::io::{self, Write};

/// A single typed value, ready for output.
#[derive(Debug, Serialize)]
pub struct ValueReport {
    pub node: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_hex: Option<String>,
}

impl ValueReport {
    pub fn new(value: &TypedValue, packed: Option<&Packed>) -> Self {
        Self {
            node: value.schema().qualified_name(),
            value_type: type_name(value),
            value: value.to_string(),
            tag: packed.map(|p| tag::tag_name(p.tag).to_owned()),
            raw_hex: packed.map(|p| hex::encode(&p.content)),
        }
    }
}

/// An encoded or decoded table index, ready for output.
#[derive(Debug, Serialize)]
pub struct IndexReport {
    pub table: String,
    pub arcs: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed: Option<usize>,
    pub values: Vec<ValueReport>,
}

impl IndexReport {
    pub fn new(table: &str, arcs: &[u32], index: &IndexValue) -> Self {
        Self {
            table: table.to_owned(),
            arcs: format_arcs(arcs),
            consumed: None,
            values: index
                .values()
                .iter()
                .map(|value| ValueReport::new(value, None))
                .collect(),
        }
    }

    /// Record how many arcs of a longer suffix the index used.
    pub fn with_consumed(mut self, consumed: usize) -> Self {
        self.consumed = Some(consumed);
        self
    }
}

/// Output context for formatting.
pub struct OutputContext {
    pub format: OutputFormat,
}

impl OutputContext {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Write a value report to stdout.
    pub fn write_value(&self, report: &ValueReport) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        match self.format {
            OutputFormat::Human => write_value_human(&mut stdout, report),
            OutputFormat::Json => write_json(&mut stdout, report),
        }
    }

    /// Write an index report to stdout.
    pub fn write_index(&self, report: &IndexReport) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        match self.format {
            OutputFormat::Human => write_index_human(&mut stdout, report),
            OutputFormat::Json => write_json(&mut stdout, report),
        }
    }
}

fn write_value_human<W: Write>(w: &mut W, report: &ValueReport) -> io::Result<()> {
    writeln!(w, "{} = {}: {}", report.node, report.value_type, report.value)?;
    if let Some(ref tag) = report.tag {
        writeln!(w, "    Tag:     {}", tag)?;
    }
    if let Some(ref raw) = report.raw_hex {
        writeln!(w, "    Raw:     {}", raw)?;
    }
    Ok(())
}

fn write_index_human<W: Write>(w: &mut W, report: &IndexReport) -> io::Result<()> {
    writeln!(w, "{} index {}", report.table, report.arcs)?;
    if let Some(consumed) = report.consumed {
        writeln!(w, "    Consumed: {} arc(s)", consumed)?;
    }
    for value in &report.values {
        write!(w, "  ")?;
        write_value_human(w, value)?;
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize>(w: &mut W, report: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
    writeln!(w, "{}", json)
}

/// Declared type name, falling back to the value kind.
fn type_name(value: &TypedValue) -> String {
    value
        .schema()
        .type_name()
        .map(str::to_owned)
        .unwrap_or_else(|| value.kind().name().to_owned())
}

/// Format arcs as a dotted string.
pub fn format_arcs(arcs: &[u32]) -> String {
    arcs.iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Parse a dotted arc list. An empty string is an empty list.
pub fn parse_arcs(s: &str) -> crate::Result<Vec<u32>> {
    let s = s.trim().trim_start_matches('.');
    if s.is_empty() {
        return Ok(Vec::new());
    }
    crate::oid::Oid::parse(s).map(|oid| oid.arcs().to_vec())
}

/// Write an error message to stderr.
pub fn write_error(err: &crate::Error) {
    eprintln!("Error: {}", err);
}
