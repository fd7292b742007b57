//! Table index encoding and decoding against the lab MIB tables.

mod common;

use common::{capture_logs, lab_registry, node};
use snmp_mibtypes::error::{ErrorCategory, ValueErrorKind};
use snmp_mibtypes::schema::SchemaProvider;
use snmp_mibtypes::{DecodeMode, IndexCodec, IndexValue, RawValue, oid};

fn codec(table: &str) -> IndexCodec {
    let registry = lab_registry();
    let table = node(&registry, table);
    IndexCodec::for_table(&registry, &table).unwrap()
}

// =============================================================================
// Single integer index
// =============================================================================

#[test]
fn integer_index() {
    let codec = codec("labIfTable");
    assert_eq!(codec.columns().len(), 1);
    assert_eq!(codec.encode(&[RawValue::from(3)]).unwrap(), vec![3]);

    let (consumed, index) = codec.decode(&[3, 99]).unwrap();
    assert_eq!(consumed, 1);
    assert!(matches!(index, IndexValue::Scalar(ref v) if v.as_int() == Some(3)));

    // ranges still apply to index columns
    let err = codec.encode(&[RawValue::from(0)]).unwrap_err();
    assert_eq!(err.value_kind(), Some(ValueErrorKind::OutOfRange { value: 0 }));
    let err = codec.decode(&[70000]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Value);
}

#[test]
fn instance_oids() {
    let registry = lab_registry();
    let table = node(&registry, "labIfTable");
    let descr = node(&registry, "labIfDescr");
    let codec = IndexCodec::for_table(&registry, &table).unwrap();

    let instance = codec.instance_oid(descr.oid(), &[RawValue::from(12)]).unwrap();
    assert_eq!(instance, oid!(1, 3, 6, 1, 4, 1, 99999, 2, 1, 2, 12));

    let index = codec.split_instance(descr.oid(), &instance).unwrap();
    assert_eq!(index.to_string(), "12");

    // resolving the instance finds the column
    assert_eq!(registry.resolve_oid(&instance).unwrap().name(), "labIfDescr");
}

// =============================================================================
// Composite index
// =============================================================================

#[test]
fn composite_ip_index() {
    let codec = codec("labRouteTable");
    let raw = [RawValue::from("192.168.1.0"), RawValue::from(4)];
    let arcs = codec.encode(&raw).unwrap();
    assert_eq!(arcs, vec![192, 168, 1, 0, 4]);

    let (consumed, index) = codec.decode(&arcs).unwrap();
    assert_eq!(consumed, 5);
    let values = index.values();
    assert!(values[0].matches("192.168.1.0"));
    assert!(values[1].matches(4));
    assert_eq!(index.to_string(), "(192.168.1.0, 4)");

    let err = codec.decode(&[192, 168, 1]).unwrap_err();
    assert_eq!(
        err.value_kind(),
        Some(ValueErrorKind::IndexTooShort {
            needed: 4,
            available: 3
        })
    );
}

#[test]
fn filter_prefix_restricts_leading_columns() {
    let codec = codec("labRouteTable");
    assert_eq!(
        codec.filter_prefix(&[RawValue::from("10.0.0.1")]).unwrap(),
        vec![10, 0, 0, 1]
    );
    let err = codec
        .filter_prefix(&[RawValue::from("10.0.0.1"), RawValue::from(1)])
        .unwrap_err();
    assert_eq!(err.value_kind(), Some(ValueErrorKind::FilterTooLong { columns: 2 }));
}

// =============================================================================
// IMPLIED last column
// =============================================================================

#[test]
fn implied_object_identifier() {
    let codec = codec("labNameTable");
    assert!(codec.is_implied());

    let raw = [RawValue::from("ops"), RawValue::from("1.3.6.1.2.1")];
    let arcs = codec.encode(&raw).unwrap();
    assert_eq!(arcs, vec![3, 111, 112, 115, 1, 3, 6, 1, 2, 1]);

    let (consumed, index) = codec.decode(&arcs).unwrap();
    assert_eq!(consumed, arcs.len());
    assert_eq!(index.values()[1].as_oid(), Some(&oid!(1, 3, 6, 1, 2, 1)));
    assert_eq!(codec.encode_index(&index).unwrap(), arcs);

    // the filter never treats its last value as implied
    assert_eq!(
        codec.filter_prefix(&[RawValue::from("ops")]).unwrap(),
        vec![3, 111, 112, 115]
    );
}

#[test]
fn lossy_mode_masks_wide_octets() {
    let strict = codec("labNameTable");
    let arcs = [2, 0x141, 0x42, 1, 3];
    let err = strict.decode(&arcs).unwrap_err();
    assert_eq!(err.value_kind(), Some(ValueErrorKind::OctetOutOfRange { value: 0x141 }));

    let lossy = strict.with_mode(DecodeMode::Lossy);
    let (consumed, index) = lossy.decode(&arcs).unwrap();
    assert_eq!(consumed, 5);
    assert_eq!(index.values()[0].as_bytes(), Some(b"AB".as_slice()));
}

#[test]
fn lossy_masking_is_logged() {
    let lossy = codec("labNameTable").with_mode(DecodeMode::Lossy);

    let (decoded, logs) = capture_logs("snmp_mibtypes=warn", || lossy.decode(&[2, 0x141, 0x42, 1, 3]));
    assert_eq!(decoded.unwrap().0, 5);
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("index arcs above 255 masked to octets"), "{logs}");
    assert!(logs.contains("labNameOwner"), "{logs}");

    let (decoded, logs) = capture_logs("snmp_mibtypes=warn", || lossy.decode(&[2, 0x41, 0x42, 1, 3]));
    assert!(decoded.is_ok());
    assert!(logs.is_empty(), "{logs}");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn arity_and_instance_errors() {
    let codec = codec("labRouteTable");
    let err = codec.encode(&[RawValue::from("10.0.0.1")]).unwrap_err();
    assert_eq!(
        err.value_kind(),
        Some(ValueErrorKind::IndexArity {
            expected: 2,
            actual: 1
        })
    );

    let column = oid!(1, 3, 6, 1, 4, 1, 99999, 3, 1, 3);
    let err = codec
        .split_instance(&column, &oid!(1, 3, 6, 1, 4, 1, 99999, 2, 1, 1, 1))
        .unwrap_err();
    assert_eq!(err.value_kind(), Some(ValueErrorKind::NotAnInstance));
}

#[test]
fn tables_without_index_are_rejected() {
    let registry = lab_registry();
    let scalar = node(&registry, "labInteger");
    let err = IndexCodec::for_table(&registry, &scalar).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Schema);
}
