//! Text rendering of raw SNMP data.
//!
//! [`display_hint`] implements RFC 2579 DISPLAY-HINT for octet strings (both
//! directions) and integers; [`hex`] holds the hex helpers used for
//! fallback output and logging.
//!
//! ```
//! use snmp_mibtypes::format::display_hint::DisplayHint;
//!
//! let mac = DisplayHint::parse("1x:").unwrap();
//! assert_eq!(mac.render(&[0x00, 0x1a, 0x2b]).unwrap(), "00:1a:2b");
//! assert_eq!(mac.parse_text("00:1a:2b").unwrap(), vec![0x00, 0x1a, 0x2b]);
//! ```

pub mod display_hint;
pub mod hex;
