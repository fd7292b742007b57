//! Command-line argument structures for the `mibtypes-index` tool.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::schema::{Registry, Schema, SchemaProvider};

/// Output format for CLI tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with type information.
    #[default]
    Human,
    /// JSON output for scripting.
    Json,
}

/// Schema source arguments.
#[derive(Debug, Parser)]
pub struct SchemaArgs {
    /// JSON registry document with the types and nodes to use.
    #[arg(short = 's', long = "schema", value_name = "FILE")]
    pub schema: PathBuf,
}

impl SchemaArgs {
    /// Load the registry document.
    pub fn load(&self) -> Result<Registry> {
        let json = std::fs::read_to_string(&self.schema).map_err(|e| Error::SchemaLoad {
            message: format!("{}: {}", self.schema.display(), e).into(),
        })?;
        Registry::from_json(&json)
    }
}

/// Resolve `MODULE::NAME` against a provider.
pub fn resolve_qualified<P>(provider: &P, qualified: &str) -> Result<Schema>
where
    P: SchemaProvider + ?Sized,
{
    match qualified.split_once("::") {
        Some((module, name)) if !module.is_empty() && !name.is_empty() => {
            provider.resolve(module, name)
        }
        _ => Err(Error::no_such_definition("", qualified)),
    }
}

/// Output control arguments.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Output format: human or json.
    #[arg(short = 'O', long = "output", default_value = "human")]
    pub format: OutputFormat,

    /// Enable debug logging (snmp_mibtypes=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (snmp_mibtypes=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl OutputArgs {
    /// Initialize tracing based on debug/trace flags.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "snmp_mibtypes=trace"
        } else if self.debug {
            "snmp_mibtypes=debug"
        } else {
            "snmp_mibtypes=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    }
}
