//! Schema descriptors and the provider seam.
//!
//! A [`SchemaDescriptor`] is the read-only metadata of one MIB node: where it
//! lives, what it is, and (for scalars and columns) its value [`Syntax`].
//! Descriptors are shared as [`Schema`] handles and never mutated once
//! published; a type override produces a fresh descriptor instead.

mod registry;
mod syntax;

pub use registry::Registry;
pub use syntax::{BaseType, NamedNumber, NamedNumbers, Range, Syntax, ValueKind};

use crate::error::{Error, Result, SchemaErrorKind};
use crate::oid::Oid;
use crate::value::{RawValue, TypedValue};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shared handle to a descriptor.
pub type Schema = Arc<SchemaDescriptor>;

/// What a node is in the MIB tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum NodeKind {
    Node,
    Scalar,
    Table,
    Row,
    Column,
}

/// MAX-ACCESS of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Access {
    #[default]
    NotAccessible,
    AccessibleForNotify,
    ReadOnly,
    ReadWrite,
    ReadCreate,
}

impl Access {
    pub fn is_readable(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite | Self::ReadCreate)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, Self::ReadWrite | Self::ReadCreate)
    }
}

/// INDEX clause of a table.
///
/// Column names are resolved in the table's module unless written as
/// `MODULE::name`. `implied` applies to the last column only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableIndexSpec {
    pub columns: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub implied: bool,
}

impl TableIndexSpec {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            implied: false,
        }
    }

    /// Mark the last column as IMPLIED.
    pub fn implied(mut self) -> Self {
        self.implied = true;
        self
    }
}

/// Metadata of one MIB node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchemaDescriptor {
    module: String,
    name: String,
    oid: Oid,
    kind: NodeKind,
    #[cfg_attr(feature = "serde", serde(default))]
    access: Access,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    syntax: Option<Syntax>,
    /// Owning table, for columns.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    table: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    index: Option<TableIndexSpec>,
    /// Declared syntax, kept while a type override is in effect.
    #[cfg_attr(feature = "serde", serde(skip))]
    declared: Option<Box<Syntax>>,
}

impl SchemaDescriptor {
    fn new(module: &str, name: &str, oid: Oid, kind: NodeKind) -> Self {
        Self {
            module: module.to_owned(),
            name: name.to_owned(),
            oid,
            kind,
            access: Access::NotAccessible,
            syntax: None,
            table: None,
            index: None,
            declared: None,
        }
    }

    /// Plain tree node without a value.
    pub fn node(module: &str, name: &str, oid: Oid) -> Self {
        Self::new(module, name, oid, NodeKind::Node)
    }

    /// Scalar object, read-only until [`with_access`](Self::with_access).
    pub fn scalar(module: &str, name: &str, oid: Oid, syntax: Syntax) -> Self {
        Self {
            access: Access::ReadOnly,
            syntax: Some(syntax),
            ..Self::new(module, name, oid, NodeKind::Scalar)
        }
    }

    /// Table with its INDEX clause.
    pub fn table(module: &str, name: &str, oid: Oid, index: TableIndexSpec) -> Self {
        Self {
            index: Some(index),
            ..Self::new(module, name, oid, NodeKind::Table)
        }
    }

    /// Conceptual row of `table`.
    pub fn row(module: &str, name: &str, oid: Oid, table: &str) -> Self {
        Self {
            table: Some(table.to_owned()),
            ..Self::new(module, name, oid, NodeKind::Row)
        }
    }

    /// Column of `table`, read-only until [`with_access`](Self::with_access).
    pub fn column(module: &str, name: &str, oid: Oid, table: &str, syntax: Syntax) -> Self {
        Self {
            access: Access::ReadOnly,
            syntax: Some(syntax),
            table: Some(table.to_owned()),
            ..Self::new(module, name, oid, NodeKind::Column)
        }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `MODULE::name`.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }

    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Effective syntax, including any type override.
    pub fn syntax(&self) -> Option<&Syntax> {
        self.syntax.as_ref()
    }

    /// Effective syntax, or an error for nodes that carry no value.
    pub fn value_syntax(&self) -> Result<&Syntax> {
        self.syntax
            .as_ref()
            .ok_or_else(|| Error::schema(self.qualified_name(), SchemaErrorKind::NotAColumn))
    }

    /// Owning table name, for columns and rows.
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// INDEX clause, for tables.
    pub fn index(&self) -> Option<&TableIndexSpec> {
        self.index.as_ref()
    }

    /// Effective type name.
    pub fn type_name(&self) -> Option<&str> {
        self.syntax.as_ref()?.type_name.as_deref()
    }

    /// Type name as declared in the MIB, ignoring overrides.
    pub fn declared_type_name(&self) -> Option<&str> {
        match &self.declared {
            Some(declared) => declared.type_name.as_deref(),
            None => self.type_name(),
        }
    }

    pub fn has_type_override(&self) -> bool {
        self.declared.is_some()
    }

    /// Typed view of this node under another named type.
    ///
    /// The new type supplies the type name and display hint; ranges and named
    /// numbers stay those of the declared syntax. The override must select
    /// the same [`ValueKind`].
    pub fn with_type_override(&self, named: &Syntax) -> Result<SchemaDescriptor> {
        let declared = match &self.declared {
            Some(declared) => declared.as_ref(),
            None => self.value_syntax()?,
        };

        let mut syntax = declared.clone();
        syntax.type_name = named.type_name.clone();
        syntax.parent_type = named.parent_type.clone();
        syntax.display_hint = named.display_hint.clone();

        if named.base != declared.base || syntax.kind() != declared.kind() {
            return Err(Error::schema(
                self.qualified_name(),
                SchemaErrorKind::IncompatibleOverride,
            ));
        }

        tracing::debug!(
            target: "snmp_mibtypes::schema",
            node = %self.qualified_name(),
            declared = ?declared.type_name,
            effective = ?syntax.type_name,
            "type override"
        );

        Ok(SchemaDescriptor {
            syntax: Some(syntax),
            declared: Some(Box::new(declared.clone())),
            ..self.clone()
        })
    }

    /// Plain view of this node with any override removed.
    pub fn without_type_override(&self) -> SchemaDescriptor {
        match &self.declared {
            Some(declared) => SchemaDescriptor {
                syntax: Some(declared.as_ref().clone()),
                declared: None,
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}

/// Split `MODULE::name`; bare names resolve in `default_module`.
pub(crate) fn split_qualified<'a>(name: &'a str, default_module: &'a str) -> (&'a str, &'a str) {
    name.split_once("::").unwrap_or((default_module, name))
}

/// Read-only source of schema descriptors.
///
/// [`Registry`] is the in-memory implementation; a MIB compiler can provide
/// its own.
pub trait SchemaProvider {
    /// Resolve a node by module and name.
    fn resolve(&self, module: &str, name: &str) -> Result<Schema>;

    /// Node with the longest registered OID that prefixes `oid`.
    fn resolve_oid(&self, oid: &Oid) -> Option<Schema>;

    /// Named type (textual convention) by name.
    fn lookup_type(&self, type_name: &str) -> Option<Syntax>;

    /// Resolve a node and build a typed value for it.
    fn build(&self, module: &str, name: &str, raw: impl Into<RawValue>) -> Result<TypedValue>
    where
        Self: Sized,
    {
        let schema = self.resolve(module, name)?;
        TypedValue::build(&schema, raw)
    }

    /// Table owning a column or row.
    fn table_of(&self, node: &SchemaDescriptor) -> Result<Schema> {
        let table = node
            .table_name()
            .ok_or_else(|| Error::schema(node.qualified_name(), SchemaErrorKind::NotAColumn))?;
        self.resolve(node.module(), table)
    }

    /// Index columns of a table, in declared order.
    fn index_columns(&self, table: &SchemaDescriptor) -> Result<Vec<Schema>> {
        if table.kind() != NodeKind::Table {
            return Err(Error::schema(
                table.qualified_name(),
                SchemaErrorKind::NotATable,
            ));
        }
        let spec = table
            .index()
            .filter(|spec| !spec.columns.is_empty())
            .ok_or_else(|| Error::schema(table.qualified_name(), SchemaErrorKind::NoIndex))?;

        spec.columns
            .iter()
            .map(|column| {
                let (module, name) = split_qualified(column, table.module());
                self.resolve(module, name)
            })
            .collect()
    }

    /// Position of a column in its table's index, if it is an index column.
    fn index_position(&self, column: &SchemaDescriptor) -> Result<Option<usize>> {
        let table = self.table_of(column)?;
        Ok(self
            .index_columns(&table)?
            .iter()
            .position(|c| c.module() == column.module() && c.name() == column.name()))
    }

    /// Typed view of `schema` under the named type.
    fn override_type(&self, schema: &SchemaDescriptor, type_name: &str) -> Result<Schema> {
        let named = self
            .lookup_type(type_name)
            .ok_or_else(|| Error::no_such_definition(schema.module(), type_name))?;
        Ok(Arc::new(schema.with_type_override(&named)?))
    }
}
