#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_mibtypes::oid::Oid;

fuzz_target!(|data: &[u8]| {
    // Fuzz OID from BER encoding
    if let Ok(oid) = Oid::from_ber(data) {
        // Anything decoded must re-encode
        let _ = oid.to_ber();
    }

    // Fuzz OID from dotted string notation (if data is valid UTF-8)
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(oid) = Oid::parse(s)
    {
        assert_eq!(Oid::parse(&oid.to_string()).ok(), Some(oid.clone()));

        // An OID that encodes must decode to itself
        if let Ok(content) = oid.try_to_ber() {
            assert_eq!(Oid::from_ber(&content).ok(), Some(oid));
        }
    }
});
