//! Common test fixtures: a small lab MIB.
//!
//! ```text
//! LAB-MIB (1.3.6.1.4.1.99999)
//!   .1        scalars
//!   .2.1.*    labIfTable     INDEX { labIfIndex }
//!   .3.1.*    labRouteTable  INDEX { labRouteDest, labRouteIfIndex }
//!   .4.1.*    labNameTable   INDEX { labNameOwner, IMPLIED labNameObject }
//!   .5.1.*    labInetTable   INDEX { labInetAddressType, labInetAddress }
//! ```

use snmp_mibtypes::schema::{
    Access, BaseType, Registry, Schema, SchemaDescriptor, SchemaProvider, Syntax, TableIndexSpec,
};
use snmp_mibtypes::{Oid, oid};

pub const MODULE: &str = "LAB-MIB";

/// Root of the lab enterprise subtree.
pub fn lab() -> Oid {
    oid!(1, 3, 6, 1, 4, 1, 99999)
}

fn scalar(arc: u32) -> Oid {
    lab().join(&[1, arc])
}

fn column(table: u32, arc: u32) -> Oid {
    lab().join(&[table, 1, arc])
}

// =============================================================================
// Named types
// =============================================================================

pub fn display_string() -> Syntax {
    Syntax::new(BaseType::OctetString)
        .with_type_name("DisplayString")
        .with_display_hint("255a")
        .with_range(0, 255)
}

pub fn truth_value() -> Syntax {
    Syntax::new(BaseType::Enum)
        .with_type_name("TruthValue")
        .with_named_numbers([("true", 1), ("false", 2)])
}

pub fn inet_address() -> Syntax {
    Syntax::new(BaseType::OctetString)
        .with_type_name("InetAddress")
        .with_range(0, 255)
}

pub fn inet_address_ipv4() -> Syntax {
    Syntax::new(BaseType::OctetString)
        .with_type_name("InetAddressIPv4")
        .with_parent_type("InetAddress")
        .with_display_hint("1d.1d.1d.1d")
        .with_size(4)
}

pub fn inet_address_ipv6() -> Syntax {
    Syntax::new(BaseType::OctetString)
        .with_type_name("InetAddressIPv6")
        .with_parent_type("InetAddress")
        .with_display_hint("2x:2x:2x:2x:2x:2x:2x:2x")
        .with_size(16)
}

// =============================================================================
// Registry
// =============================================================================

fn add_scalars(registry: &mut Registry) {
    let scalars = [
        ("labInteger", 1, Syntax::new(BaseType::Integer32)),
        (
            "labUnsigned",
            2,
            Syntax::new(BaseType::Unsigned32).with_type_name("Gauge32"),
        ),
        ("labOctetString", 3, Syntax::new(BaseType::OctetString)),
        (
            "labIpAddress",
            4,
            Syntax::new(BaseType::OctetString).with_type_name("IpAddress"),
        ),
        ("labObjectId", 5, Syntax::new(BaseType::ObjectIdentifier)),
        (
            "labEnum",
            6,
            Syntax::new(BaseType::Enum).with_named_numbers([
                ("up", 1),
                ("down", 2),
                ("testing", 3),
            ]),
        ),
        ("labTruth", 7, truth_value()),
        (
            "labTimeTicks",
            8,
            Syntax::new(BaseType::Unsigned32).with_type_name("TimeTicks"),
        ),
        (
            "labCounter",
            9,
            Syntax::new(BaseType::Unsigned32).with_type_name("Counter32"),
        ),
        (
            "labCounter64",
            10,
            Syntax::new(BaseType::Unsigned64).with_type_name("Counter64"),
        ),
        (
            "labBits",
            11,
            Syntax::new(BaseType::Bits).with_named_numbers([
                ("first", 0),
                ("second", 1),
                ("third", 2),
                ("last", 7),
            ]),
        ),
        (
            "labMacAddress",
            12,
            Syntax::new(BaseType::OctetString)
                .with_type_name("MacAddress")
                .with_display_hint("1x:")
                .with_size(6),
        ),
        (
            "labRanged",
            13,
            Syntax::new(BaseType::Integer32)
                .with_range(1, 10)
                .with_range(20, 30),
        ),
        ("labString", 14, display_string()),
        ("labInteger64", 15, Syntax::new(BaseType::Integer64)),
        (
            "labOpaque",
            16,
            Syntax::new(BaseType::OctetString).with_type_name("Opaque"),
        ),
        (
            "labTemperature",
            17,
            Syntax::new(BaseType::Integer32).with_display_hint("d-2"),
        ),
    ];

    registry.insert(SchemaDescriptor::node(MODULE, "lab", lab()));
    registry.insert(SchemaDescriptor::node(MODULE, "labScalars", lab().child(1)));
    for (name, arc, syntax) in scalars {
        registry.insert(
            SchemaDescriptor::scalar(MODULE, name, scalar(arc), syntax)
                .with_access(Access::ReadWrite),
        );
    }
}

fn add_table(
    registry: &mut Registry,
    name: &str,
    arc: u32,
    index: TableIndexSpec,
    columns: Vec<(&str, Syntax)>,
) {
    let entry = name.replace("Table", "Entry");
    registry.insert(SchemaDescriptor::table(MODULE, name, lab().child(arc), index));
    registry.insert(SchemaDescriptor::row(MODULE, &entry, lab().join(&[arc, 1]), name));
    for (position, (column_name, syntax)) in columns.into_iter().enumerate() {
        registry.insert(
            SchemaDescriptor::column(
                MODULE,
                column_name,
                column(arc, position as u32 + 1),
                name,
                syntax,
            )
            .with_access(Access::ReadOnly),
        );
    }
}

/// The lab MIB registry.
pub fn lab_registry() -> Registry {
    let mut registry = Registry::new();
    registry.define_type(display_string());
    registry.define_type(truth_value());
    registry.define_type(inet_address());
    registry.define_type(inet_address_ipv4());
    registry.define_type(inet_address_ipv6());

    add_scalars(&mut registry);

    add_table(
        &mut registry,
        "labIfTable",
        2,
        TableIndexSpec::new(["labIfIndex"]),
        vec![
            (
                "labIfIndex",
                Syntax::new(BaseType::Integer32).with_range(1, 65535),
            ),
            ("labIfDescr", display_string()),
            (
                "labIfStatus",
                Syntax::new(BaseType::Enum).with_named_numbers([("up", 1), ("down", 2)]),
            ),
        ],
    );

    add_table(
        &mut registry,
        "labRouteTable",
        3,
        TableIndexSpec::new(["labRouteDest", "labRouteIfIndex"]),
        vec![
            (
                "labRouteDest",
                Syntax::new(BaseType::OctetString).with_type_name("IpAddress"),
            ),
            (
                "labRouteIfIndex",
                Syntax::new(BaseType::Integer32).with_range(1, 65535),
            ),
            (
                "labRouteNextHop",
                Syntax::new(BaseType::OctetString).with_type_name("IpAddress"),
            ),
        ],
    );

    add_table(
        &mut registry,
        "labNameTable",
        4,
        TableIndexSpec::new(["labNameOwner", "labNameObject"]).implied(),
        vec![
            (
                "labNameOwner",
                Syntax::new(BaseType::OctetString).with_range(0, 32),
            ),
            ("labNameObject", Syntax::new(BaseType::ObjectIdentifier)),
            ("labNameValue", Syntax::new(BaseType::Integer32)),
        ],
    );

    add_table(
        &mut registry,
        "labInetTable",
        5,
        TableIndexSpec::new(["labInetAddressType", "labInetAddress"]),
        vec![
            (
                "labInetAddressType",
                Syntax::new(BaseType::Enum)
                    .with_type_name("InetAddressType")
                    .with_named_numbers([("unknown", 0), ("ipv4", 1), ("ipv6", 2)]),
            ),
            ("labInetAddress", inet_address()),
            (
                "labInetPrefixLength",
                Syntax::new(BaseType::Unsigned32).with_range(0, 128),
            ),
        ],
    );

    registry
}

/// Resolve a lab MIB node, panicking if it is missing.
pub fn node(registry: &Registry, name: &str) -> Schema {
    registry
        .resolve(MODULE, name)
        .unwrap_or_else(|e| panic!("{}: {}", name, e))
}
