#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_mibtypes::schema::{BaseType, SchemaDescriptor, Syntax};
use snmp_mibtypes::{DecodeMode, IndexCodec, Schema, oid};
use std::sync::Arc;

fn column(arc: u32, syntax: Syntax) -> Schema {
    Arc::new(SchemaDescriptor::column(
        "FUZZ-MIB",
        &format!("fuzzColumn{}", arc),
        oid!(1, 3, 6, 1, 4, 1, 99999, 9, 1).child(arc),
        "fuzzTable",
        syntax,
    ))
}

fuzz_target!(|data: &[u8]| {
    let arcs: Vec<u32> = data
        .chunks(2)
        .map(|c| c.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
        .collect();

    let columns = vec![
        column(1, Syntax::new(BaseType::Integer32)),
        column(2, Syntax::new(BaseType::OctetString).with_type_name("IpAddress")),
        column(3, Syntax::new(BaseType::OctetString).with_size(6)),
        column(4, Syntax::new(BaseType::OctetString)),
        column(5, Syntax::new(BaseType::ObjectIdentifier)),
    ];

    for implied in [false, true] {
        for mode in [DecodeMode::Strict, DecodeMode::Lossy] {
            let codec = IndexCodec::new(columns.clone(), implied).with_mode(mode);
            if let Ok((consumed, index)) = codec.decode(&arcs) {
                assert!(consumed <= arcs.len());
                let encoded = codec.encode_index(&index).expect("decoded index re-encodes");
                if mode == DecodeMode::Strict {
                    assert_eq!(encoded.as_slice(), &arcs[..consumed]);
                }
            }
        }
    }
});
