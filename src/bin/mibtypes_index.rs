//! mibtypes-index: Encode and decode table indexes and typed values.
//!
//! Part of the snmp-mibtypes CLI utilities.

use clap::{Parser, Subcommand};
use snmp_mibtypes::cli::args::{OutputArgs, SchemaArgs, resolve_qualified};
use snmp_mibtypes::cli::output::{
    IndexReport, OutputContext, ValueReport, format_arcs, parse_arcs, write_error,
};
use snmp_mibtypes::format::hex;
use snmp_mibtypes::{DecodeMode, Error, IndexCodec, RawValue, Registry, TypedValue};
use std::process::ExitCode;

/// Encode and decode table indexes and typed values against a JSON schema.
#[derive(Debug, Parser)]
#[command(name = "mibtypes-index", version, about)]
struct Args {
    #[command(flatten)]
    schema: SchemaArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode index values of a table to an OID suffix.
    Encode {
        /// Table as MODULE::NAME.
        table: String,
        /// One value per index column, as text.
        #[arg(required = true, value_name = "VALUE")]
        values: Vec<String>,
    },
    /// Decode an OID suffix to the index values of a table.
    Decode {
        /// Table as MODULE::NAME.
        table: String,
        /// Dotted OID suffix.
        suffix: String,
        /// Mask index arcs above 255 instead of rejecting them.
        #[arg(long = "lossy")]
        lossy: bool,
    },
    /// Render raw octets as a node's value.
    Render {
        /// Node as MODULE::NAME.
        node: String,
        /// Content octets in hex.
        hex: String,
    },
    /// Parse text as a node's value and show its wire form.
    Parse {
        /// Node as MODULE::NAME.
        node: String,
        /// Value text.
        text: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    args.output.init_tracing();

    let registry = match args.schema.load() {
        Ok(registry) => registry,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let report = match run(&registry, &args.command) {
        Ok(report) => report,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let ctx = OutputContext::new(args.output.format);
    let written = match &report {
        Report::Index(report) => ctx.write_index(report),
        Report::Value(report) => ctx.write_value(report),
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

enum Report {
    Index(IndexReport),
    Value(ValueReport),
}

fn run(registry: &Registry, command: &Command) -> snmp_mibtypes::Result<Report> {
    match command {
        Command::Encode { table, values } => {
            let table = resolve_qualified(registry, table)?;
            let codec = IndexCodec::for_table(registry, &table)?;
            let raw: Vec<RawValue> = values.iter().map(RawValue::from).collect();
            let index = codec.build(&raw)?;
            let arcs = codec.encode_values(&index)?;
            let (_, decoded) = codec.decode(&arcs)?;
            tracing::debug!(
                target: "snmp_mibtypes::index",
                table = %table.qualified_name(),
                arcs = %format_arcs(&arcs),
                "encoded index"
            );
            Ok(Report::Index(IndexReport::new(
                &table.qualified_name(),
                &arcs,
                &decoded,
            )))
        }
        Command::Decode {
            table,
            suffix,
            lossy,
        } => {
            let table = resolve_qualified(registry, table)?;
            let mode = if *lossy {
                DecodeMode::Lossy
            } else {
                DecodeMode::Strict
            };
            let codec = IndexCodec::for_table(registry, &table)?.with_mode(mode);
            let arcs = parse_arcs(suffix)?;
            let (consumed, index) = codec.decode(&arcs)?;
            let report = IndexReport::new(&table.qualified_name(), &arcs[..consumed], &index)
                .with_consumed(consumed);
            Ok(Report::Index(report))
        }
        Command::Render { node, hex: content } => {
            let schema = resolve_qualified(registry, node)?;
            let bytes = hex::decode(content)
                .map_err(|_| Error::wrong_type(schema.qualified_name(), "hex octets", "text"))?;
            let value = TypedValue::build(&schema, bytes)?;
            let packed = value.pack()?;
            Ok(Report::Value(ValueReport::new(&value, Some(&packed))))
        }
        Command::Parse { node, text } => {
            let schema = resolve_qualified(registry, node)?;
            let value = TypedValue::build(&schema, text.as_str())?;
            let packed = value.pack()?;
            Ok(Report::Value(ValueReport::new(&value, Some(&packed))))
        }
    }
}
