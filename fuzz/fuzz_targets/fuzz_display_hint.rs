#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_mibtypes::format::display_hint::{DisplayHint, apply_integer, parse_integer};

// Input layout: hint string, NUL, data octets.
fuzz_target!(|data: &[u8]| {
    let Some(split) = data.iter().position(|&b| b == 0) else {
        return;
    };
    let Ok(hint) = std::str::from_utf8(&data[..split]) else {
        return;
    };
    let octets = &data[split + 1..];

    if let Ok(parsed) = DisplayHint::parse(hint)
        && let Ok(text) = parsed.render(octets)
    {
        let _ = parsed.parse_text(&text);
    }

    let value = octets
        .iter()
        .take(16)
        .fold(0i128, |acc, &b| acc.wrapping_shl(8) | i128::from(b));
    if let Some(text) = apply_integer(hint, value) {
        let _ = parse_integer(hint, &text);
    }
});
