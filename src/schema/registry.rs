//! In-memory schema registry.

use super::{NodeKind, Schema, SchemaDescriptor, SchemaProvider, Syntax};
use crate::error::{Error, Result};
use crate::oid::Oid;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Explicit schema store keyed by module and name.
///
/// Descriptors are immutable once inserted, so a `Registry` (or an
/// `Arc<Registry>`) can be read from many threads without locking. Mutation
/// (`insert`, `remove`, `reset`) needs `&mut self` and belongs to setup.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    nodes: HashMap<(String, String), Schema>,
    by_oid: HashMap<Oid, Schema>,
    types: HashMap<String, Syntax>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a node, returning its shared handle.
    pub fn insert(&mut self, descriptor: SchemaDescriptor) -> Schema {
        let schema = Arc::new(descriptor);
        let key = (schema.module().to_owned(), schema.name().to_owned());
        if let Some(previous) = self.nodes.insert(key, Arc::clone(&schema)) {
            self.unlink_oid(&previous);
        }
        self.by_oid.insert(schema.oid().clone(), Arc::clone(&schema));
        tracing::trace!(target: "snmp_mibtypes::schema", node = %schema.qualified_name(), oid = %schema.oid(), "registered node");
        schema
    }

    /// Register a named type (textual convention). Types without a name are ignored.
    pub fn define_type(&mut self, syntax: Syntax) {
        if let Some(name) = syntax.type_name.clone() {
            self.types.insert(name, syntax);
        }
    }

    /// Remove a node.
    pub fn remove(&mut self, module: &str, name: &str) -> Option<Schema> {
        let schema = self.nodes.remove(&(module.to_owned(), name.to_owned()))?;
        self.unlink_oid(&schema);
        Some(schema)
    }

    /// Drop the OID entry of `schema` unless another node has taken it since.
    fn unlink_oid(&mut self, schema: &Schema) {
        if self
            .by_oid
            .get(schema.oid())
            .is_some_and(|current| Arc::ptr_eq(current, schema))
        {
            self.by_oid.remove(schema.oid());
        }
    }

    /// Drop every node and type.
    pub fn reset(&mut self) {
        tracing::debug!(target: "snmp_mibtypes::schema", nodes = self.nodes.len(), types = self.types.len(), "registry reset");
        self.nodes.clear();
        self.by_oid.clear();
        self.types.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Module names, sorted.
    pub fn modules(&self) -> Vec<&str> {
        let modules: BTreeSet<&str> = self.nodes.keys().map(|(m, _)| m.as_str()).collect();
        modules.into_iter().collect()
    }

    /// Nodes of a module in OID order.
    pub fn nodes(&self, module: &str) -> Vec<Schema> {
        let mut nodes: Vec<Schema> = self
            .nodes
            .values()
            .filter(|n| n.module() == module)
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.oid().cmp(b.oid()));
        nodes
    }

    /// Tables of a module in OID order.
    pub fn tables(&self, module: &str) -> Vec<Schema> {
        self.nodes(module)
            .into_iter()
            .filter(|n| n.kind() == NodeKind::Table)
            .collect()
    }

    /// Columns of a table in OID order.
    pub fn columns(&self, table: &SchemaDescriptor) -> Vec<Schema> {
        self.nodes(table.module())
            .into_iter()
            .filter(|n| n.kind() == NodeKind::Column && n.table_name() == Some(table.name()))
            .collect()
    }
}

impl SchemaProvider for Registry {
    fn resolve(&self, module: &str, name: &str) -> Result<Schema> {
        self.nodes
            .get(&(module.to_owned(), name.to_owned()))
            .cloned()
            .ok_or_else(|| Error::no_such_definition(module, name))
    }

    fn resolve_oid(&self, oid: &Oid) -> Option<Schema> {
        let arcs = oid.arcs();
        (1..=arcs.len())
            .rev()
            .find_map(|len| self.by_oid.get(&Oid::from_slice(&arcs[..len])))
            .cloned()
    }

    fn lookup_type(&self, type_name: &str) -> Option<Syntax> {
        self.types.get(type_name).cloned()
    }
}

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use serde::{Deserialize, Serialize};

    /// On-disk registry document.
    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Document {
        #[serde(default)]
        types: Vec<Syntax>,
        #[serde(default)]
        nodes: Vec<SchemaDescriptor>,
    }

    impl Registry {
        /// Build a registry from a JSON document `{"types": [...], "nodes": [...]}`.
        pub fn from_json(json: &str) -> Result<Self> {
            let mut registry = Self::new();
            registry.load_json(json)?;
            Ok(registry)
        }

        /// Add the types and nodes of a JSON document.
        ///
        /// Nothing is added when the document fails to parse.
        pub fn load_json(&mut self, json: &str) -> Result<()> {
            let document: Document = serde_json::from_str(json).map_err(|e| Error::SchemaLoad {
                message: e.to_string().into(),
            })?;

            if let Some(unnamed) = document.types.iter().position(|t| t.type_name.is_none()) {
                return Err(Error::SchemaLoad {
                    message: format!("type #{} has no type_name", unnamed).into(),
                });
            }

            let (types, nodes) = (document.types.len(), document.nodes.len());
            for syntax in document.types {
                self.define_type(syntax);
            }
            for node in document.nodes {
                self.insert(node);
            }
            tracing::debug!(target: "snmp_mibtypes::schema", types, nodes, "loaded schema document");
            Ok(())
        }

        /// Serialize every type and node to a JSON document.
        pub fn to_json(&self) -> Result<String> {
            let mut document = Document::default();
            let mut types: Vec<&Syntax> = self.types.values().collect();
            types.sort_by(|a, b| a.type_name.cmp(&b.type_name));
            document.types = types.into_iter().cloned().collect();
            let mut nodes: Vec<&Schema> = self.nodes.values().collect();
            nodes.sort_by(|a, b| a.oid().cmp(b.oid()));
            document.nodes = nodes.into_iter().map(|n| n.as_ref().clone()).collect();
            serde_json::to_string_pretty(&document).map_err(|e| Error::SchemaLoad {
                message: e.to_string().into(),
            })
        }
    }
}
