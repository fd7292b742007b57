//! BER tag definitions for SNMP.
//!
//! Tag encoding follows X.690 Section 8.1.2:
//! - Bits 7-6: Class (00=Universal, 01=Application, 10=Context-specific, 11=Private)
//! - Bit 5: Primitive (0) or Constructed (1)
//! - Bits 4-0: Tag number (0-30, or 31 for long form)

/// Tag class bits (bits 7-6)
pub mod class {
    pub const UNIVERSAL: u8 = 0x00;
    pub const APPLICATION: u8 = 0x40;
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
}

/// Constructed bit (bit 5)
pub const CONSTRUCTED: u8 = 0x20;

/// Universal tags (class bits 00)
pub mod universal {
    pub const INTEGER: u8 = 0x02;
    pub const OCTET_STRING: u8 = 0x04;
    pub const NULL: u8 = 0x05;
    pub const OBJECT_IDENTIFIER: u8 = 0x06;
    pub const SEQUENCE: u8 = 0x30; // Constructed
}

/// Application tags (class bits 01) - SNMP-specific types
pub mod application {
    pub const IP_ADDRESS: u8 = 0x40;
    pub const COUNTER32: u8 = 0x41;
    pub const GAUGE32: u8 = 0x42; // Also Unsigned32
    pub const TIMETICKS: u8 = 0x43;
    pub const OPAQUE: u8 = 0x44;
    pub const COUNTER64: u8 = 0x46;
}

/// Context-specific tags (class bits 10) - Exception values
pub mod context {
    pub const NO_SUCH_OBJECT: u8 = 0x80;
    pub const NO_SUCH_INSTANCE: u8 = 0x81;
    pub const END_OF_MIB_VIEW: u8 = 0x82;
}

/// Check if a tag indicates a constructed type
#[inline]
pub const fn is_constructed(tag: u8) -> bool {
    tag & CONSTRUCTED != 0
}

/// Get the class of a tag
#[inline]
pub const fn tag_class(tag: u8) -> u8 {
    tag & 0xC0
}

/// Check if a tag is one of the varbind exception markers.
#[inline]
pub const fn is_exception(tag: u8) -> bool {
    matches!(
        tag,
        context::NO_SUCH_OBJECT | context::NO_SUCH_INSTANCE | context::END_OF_MIB_VIEW
    )
}

/// Short human name for a value tag, used in logs and CLI output.
pub fn tag_name(tag: u8) -> &'static str {
    match tag {
        universal::INTEGER => "INTEGER",
        universal::OCTET_STRING => "OCTET STRING",
        universal::NULL => "NULL",
        universal::OBJECT_IDENTIFIER => "OBJECT IDENTIFIER",
        universal::SEQUENCE => "SEQUENCE",
        application::IP_ADDRESS => "IpAddress",
        application::COUNTER32 => "Counter32",
        application::GAUGE32 => "Gauge32",
        application::TIMETICKS => "TimeTicks",
        application::OPAQUE => "Opaque",
        application::COUNTER64 => "Counter64",
        context::NO_SUCH_OBJECT => "noSuchObject",
        context::NO_SUCH_INSTANCE => "noSuchInstance",
        context::END_OF_MIB_VIEW => "endOfMibView",
        _ => "unknown",
    }
}
