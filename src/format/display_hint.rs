//! RFC 2579 DISPLAY-HINT rendering and parsing.
//!
//! An OCTET STRING hint is a list of specs, each of the form
//! `[*]<length><format>[separator][terminator]`:
//!
//! - `*` (optional): the next data octet is the repeat count for this spec
//! - `length`: octets consumed per application
//! - `format`: `d` (decimal), `x` (hex), `o` (octal), `a` (ASCII), `t` (UTF-8)
//! - `separator` (optional): emitted between applications
//! - `terminator` (optional, `*` specs only): emitted after the repeat group
//!
//! The last spec repeats until the data is exhausted. Separators never
//! follow the final octet.
//!
//! Octal fields are written with a leading `0`. Without a separator after
//! an `o` field, consecutive fields run together and [`DisplayHint::parse_text`]
//! cannot split them back: `"1o"` renders `[0, 8]` as `"00010"`, which
//! parses as `[1, 0]`. Give octal specs a separator when the text must
//! parse back.
//!
//! ```
//! use snmp_mibtypes::format::display_hint::DisplayHint;
//!
//! let hint = DisplayHint::parse("1d.1d.1d.1d").unwrap();
//! assert_eq!(hint.render(&[192, 168, 1, 1]).unwrap(), "192.168.1.1");
//!
//! let hint = DisplayHint::parse("*1d./1d").unwrap();
//! assert_eq!(hint.render(&[3, 10, 20, 30, 40]).unwrap(), "10.20.30/40");
//! assert_eq!(hint.parse_text("10.20.30/40").unwrap(), vec![3, 10, 20, 30, 40]);
//! ```

use crate::error::{Error, HintErrorKind, Result};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Ascii,
    Utf8,
    Hex,
    Octal,
    Decimal,
}

impl Format {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'a' => Some(Self::Ascii),
            't' => Some(Self::Utf8),
            'x' => Some(Self::Hex),
            'o' => Some(Self::Octal),
            'd' => Some(Self::Decimal),
            _ => None,
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, Self::Hex | Self::Octal | Self::Decimal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Spec {
    star: bool,
    length: usize,
    format: Format,
    separator: Option<char>,
    terminator: Option<char>,
}

/// A compiled OCTET STRING display hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayHint {
    hint: Box<str>,
    specs: Vec<Spec>,
}

fn is_delimiter(c: char) -> bool {
    !c.is_ascii_digit() && c != '*'
}

/// Largest value a numeric field of `length` octets can hold.
fn field_max(length: usize) -> u128 {
    (1u128 << (8 * length)) - 1
}

impl DisplayHint {
    /// Compile a hint string.
    pub fn parse(hint: &str) -> Result<Self> {
        if hint.is_empty() {
            return Err(Error::hint(hint, HintErrorKind::Empty));
        }

        let mut chars = hint.chars().peekable();
        let mut specs = Vec::new();

        while chars.peek().is_some() {
            let star = chars.next_if_eq(&'*').is_some();

            let mut length = 0usize;
            let mut digits = 0;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                chars.next();
                length = length.saturating_mul(10).saturating_add(d as usize);
                digits += 1;
            }
            if digits == 0 {
                return Err(Error::hint(hint, HintErrorKind::MissingLength));
            }
            if length == 0 {
                return Err(Error::hint(hint, HintErrorKind::ZeroLength));
            }

            let format = chars
                .next()
                .and_then(Format::from_char)
                .ok_or_else(|| Error::hint(hint, HintErrorKind::InvalidFormat))?;
            if format.is_numeric() && length > 8 {
                return Err(Error::hint(hint, HintErrorKind::FieldTooWide { length }));
            }

            let separator = chars.next_if(|c| is_delimiter(*c));
            let terminator = if star {
                chars.next_if(|c| is_delimiter(*c))
            } else {
                None
            };

            specs.push(Spec {
                star,
                length,
                format,
                separator,
                terminator,
            });
        }

        Ok(Self {
            hint: hint.into(),
            specs,
        })
    }

    /// The hint string this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.hint
    }

    fn spec(&self, index: usize) -> &Spec {
        &self.specs[index.min(self.specs.len() - 1)]
    }

    /// Render octets as text.
    ///
    /// Fails when the data ends inside a numeric field or a `*` count runs
    /// past the end of the data.
    pub fn render(&self, data: &[u8]) -> Result<String> {
        let mut out = String::with_capacity(data.len() * 3);
        let mut pos = 0;
        let mut index = 0;

        while pos < data.len() {
            let spec = self.spec(index);
            index += 1;

            let repeat = if spec.star {
                pos += 1;
                data[pos - 1] as usize
            } else {
                1
            };

            for r in 0..repeat {
                if pos >= data.len() {
                    return Err(Error::hint(self.as_str(), HintErrorKind::RepeatOverrun));
                }

                let take = match spec.format {
                    Format::Utf8 => utf8_field_len(&data[pos..], spec.length),
                    _ => spec.length.min(data.len() - pos),
                };
                if spec.format.is_numeric() && take < spec.length {
                    return Err(Error::hint(
                        self.as_str(),
                        HintErrorKind::TruncatedField {
                            needed: spec.length,
                            available: take,
                        },
                    ));
                }
                write_field(&mut out, spec.format, &data[pos..pos + take]);
                pos += take;

                let last = r + 1 == repeat;
                if let Some(sep) = spec.separator
                    && pos < data.len()
                    && !(last && spec.terminator.is_some())
                {
                    out.push(sep);
                }
            }

            if let Some(term) = spec.terminator
                && pos < data.len()
            {
                out.push(term);
            }
        }

        Ok(out)
    }

    /// Parse text produced by [`render`](Self::render) back into octets.
    pub fn parse_text(&self, text: &str) -> Result<Vec<u8>> {
        let mismatch = || Error::DisplayMismatch {
            hint: self.hint.clone(),
            text: text.into(),
        };

        let mut out = Vec::with_capacity(text.len());
        let mut rest = text;
        let mut index = 0;

        while !rest.is_empty() {
            let spec = self.spec(index);
            index += 1;

            if !spec.star {
                rest = parse_field(spec, rest, &mut out).ok_or_else(mismatch)?;
                if let Some(sep) = spec.separator {
                    rest = rest.strip_prefix(sep).unwrap_or(rest);
                }
                continue;
            }

            let count_at = out.len();
            out.push(0);
            let mut count = 0usize;
            loop {
                if let Some(term) = spec.terminator
                    && let Some(after) = rest.strip_prefix(term)
                {
                    rest = after;
                    break;
                }
                if rest.is_empty() {
                    break;
                }
                rest = parse_field(spec, rest, &mut out).ok_or_else(mismatch)?;
                count += 1;
                match spec.separator.and_then(|sep| rest.strip_prefix(sep)) {
                    Some(after) => rest = after,
                    None => {
                        if let Some(after) = spec.terminator.and_then(|t| rest.strip_prefix(t)) {
                            rest = after;
                        }
                        break;
                    }
                }
            }
            out[count_at] = u8::try_from(count).map_err(|_| mismatch())?;
        }

        Ok(out)
    }
}

impl std::fmt::Display for DisplayHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hint)
    }
}

fn write_field(out: &mut String, format: Format, chunk: &[u8]) {
    let number = || chunk.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    match format {
        Format::Decimal => {
            let _ = write!(out, "{}", number());
        }
        Format::Octal => {
            let _ = write!(out, "0{:o}", number());
        }
        Format::Hex => {
            for b in chunk {
                let _ = write!(out, "{:02x}", b);
            }
        }
        Format::Ascii => out.extend(chunk.iter().map(|&b| char::from(b))),
        Format::Utf8 => out.push_str(&String::from_utf8_lossy(chunk)),
    }
}

/// Octets of the longest run of whole characters within `max` octets.
///
/// Falls back to the raw window when not even one character fits.
fn utf8_field_len(data: &[u8], max: usize) -> usize {
    let window = &data[..max.min(data.len())];
    let valid = match std::str::from_utf8(window) {
        Ok(text) => text.len(),
        Err(err) => err.valid_up_to(),
    };
    if valid > 0 { valid } else { window.len() }
}

/// Parse one field at the start of `text`, appending its octets.
fn parse_field<'a>(spec: &Spec, text: &'a str, out: &mut Vec<u8>) -> Option<&'a str> {
    match spec.format {
        Format::Decimal => parse_number(spec.length, text, 10, out),
        Format::Hex => parse_number(spec.length, text, 16, out),
        Format::Octal => parse_number(spec.length, text, 8, out),
        Format::Ascii => {
            let mut end = 0;
            for (taken, (i, c)) in text.char_indices().enumerate() {
                if taken == spec.length {
                    break;
                }
                out.push(u8::try_from(u32::from(c)).ok()?);
                end = i + c.len_utf8();
            }
            (end > 0).then(|| &text[end..])
        }
        Format::Utf8 => {
            let mut end = 0;
            for (i, c) in text.char_indices() {
                if i + c.len_utf8() > spec.length {
                    break;
                }
                end = i + c.len_utf8();
            }
            out.extend_from_slice(&text.as_bytes()[..end]);
            (end > 0).then(|| &text[end..])
        }
    }
}

fn parse_number<'a>(length: usize, text: &'a str, radix: u32, out: &mut Vec<u8>) -> Option<&'a str> {
    let max = field_max(length);
    let max_digits = match radix {
        16 => 2 * length,
        8 => format!("{:o}", max).len() + 1,
        _ => max.to_string().len(),
    };

    let end = text
        .char_indices()
        .take(max_digits)
        .take_while(|(_, c)| c.is_digit(radix))
        .last()
        .map(|(i, c)| i + c.len_utf8())?;

    let value = u128::from_str_radix(&text[..end], radix).ok()?;
    if value > max {
        return None;
    }
    out.extend_from_slice(&value.to_be_bytes()[16 - length..]);
    Some(&text[end..])
}

/// Apply an INTEGER display hint (`d`, `d-N`, `x`, `o`, `b`).
///
/// Returns `None` for hints that are not integer hints.
///
/// ```
/// use snmp_mibtypes::format::display_hint::apply_integer;
///
/// assert_eq!(apply_integer("d-2", 1804), Some("18.04".to_string()));
/// assert_eq!(apply_integer("d-2", 5), Some("0.05".to_string()));
/// assert_eq!(apply_integer("x", 255), Some("ff".to_string()));
/// ```
pub fn apply_integer(hint: &str, value: i128) -> Option<String> {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    match hint {
        "x" => Some(format!("{}{:x}", sign, abs)),
        "o" => Some(format!("{}{:o}", sign, abs)),
        "b" => Some(format!("{}{:b}", sign, abs)),
        "d" => Some(value.to_string()),
        hint => {
            let places: usize = hint.strip_prefix("d-")?.parse().ok()?;
            if places == 0 {
                return Some(value.to_string());
            }
            let digits = format!("{:0>width$}", abs, width = places + 1);
            let (int_part, frac_part) = digits.split_at(digits.len() - places);
            Some(format!("{}{}.{}", sign, int_part, frac_part))
        }
    }
}

/// Inverse of [`apply_integer`].
pub fn parse_integer(hint: &str, text: &str) -> Option<i128> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, text),
    };
    let radix_value = |radix| u128::from_str_radix(body, radix).ok();

    let abs = match hint {
        "x" => radix_value(16)?,
        "o" => radix_value(8)?,
        "b" => radix_value(2)?,
        "d" => radix_value(10)?,
        hint => {
            let places: usize = hint.strip_prefix("d-")?.parse().ok()?;
            let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
            if frac_part.len() > places || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let int_part = if int_part.is_empty() { "0" } else { int_part };
            let combined = format!("{}{:0<width$}", int_part, frac_part, width = places);
            combined.parse::<u128>().ok()?
        }
    };

    let value = i128::try_from(abs).ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(hint: &str, data: &[u8]) -> String {
        DisplayHint::parse(hint).unwrap().render(data).unwrap()
    }

    fn parse(hint: &str, text: &str) -> Vec<u8> {
        DisplayHint::parse(hint).unwrap().parse_text(text).unwrap()
    }

    // ========================================================================
    // Hint compilation
    // ========================================================================

    #[test]
    fn test_invalid_hints() {
        let kind = |hint| match DisplayHint::parse(hint) {
            Err(Error::InvalidDisplayHint { kind, .. }) => kind,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(kind(""), HintErrorKind::Empty);
        assert_eq!(kind("x"), HintErrorKind::MissingLength);
        assert_eq!(kind("0a"), HintErrorKind::ZeroLength);
        assert_eq!(kind("1z"), HintErrorKind::InvalidFormat);
        assert_eq!(kind("1"), HintErrorKind::InvalidFormat);
        assert_eq!(kind("9d"), HintErrorKind::FieldTooWide { length: 9 });
    }

    #[test]
    fn test_text_formats_may_be_long() {
        assert!(DisplayHint::parse("255a").is_ok());
        assert!(DisplayHint::parse("255t").is_ok());
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    #[test]
    fn test_render_text_groups() {
        assert_eq!(render("255a", b"test"), "test");
        assert_eq!(render("1x:", b"test"), "74:65:73:74");
        assert_eq!(render("2a:", b"test"), "te:st");
        assert_eq!(render("3a:", b"test"), "tes:t");
        assert_eq!(render("4a", b"test"), "test");
    }

    #[test]
    fn test_render_mixed_groups() {
        assert_eq!(render("2o+1a", b"test"), "072145+st");
    }

    #[test]
    fn test_render_star_group() {
        assert_eq!(
            render("*2a:+255a", b"\x03testtest..."),
            "te:st:te+st..."
        );
        assert_eq!(render("*1d./1d", &[3, 10, 20, 30, 40]), "10.20.30/40");
    }

    #[test]
    fn test_render_common_conventions() {
        assert_eq!(render("1d.1d.1d.1d", &[127, 0, 0, 1]), "127.0.0.1");
        assert_eq!(
            render("1x:", &[0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e]),
            "00:1a:2b:3c:4d:5e"
        );
        assert_eq!(
            render("2d-1d-1d,1d:1d:1d.1d", &[0x07, 0xE6, 8, 15, 8, 1, 15, 0]),
            "2022-8-15,8:1:15.0"
        );
        assert_eq!(render("255t", "héllo".as_bytes()), "héllo");
    }

    #[test]
    fn test_render_empty_data() {
        assert_eq!(render("1d", &[]), "");
    }

    #[test]
    fn test_render_truncated_numeric_field() {
        let hint = DisplayHint::parse("2d.").unwrap();
        assert!(matches!(
            hint.render(&[1, 2, 3]),
            Err(Error::InvalidDisplayHint {
                kind: HintErrorKind::TruncatedField {
                    needed: 2,
                    available: 1
                },
                ..
            })
        ));
    }

    #[test]
    fn test_render_repeat_overrun() {
        let hint = DisplayHint::parse("*1d.").unwrap();
        assert!(matches!(
            hint.render(&[5, 1, 2]),
            Err(Error::InvalidDisplayHint {
                kind: HintErrorKind::RepeatOverrun,
                ..
            })
        ));
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    #[test]
    fn test_parse_text_groups() {
        assert_eq!(parse("255a", "test"), b"test");
        assert_eq!(parse("1x:", "74:65:73:74"), b"test");
        assert_eq!(parse("2a:", "te:st"), b"test");
        assert_eq!(parse("3a:", "tes:t"), b"test");
        assert_eq!(parse("2o+1a", "072145+st"), b"test");
        assert_eq!(parse("*2a:+255a", "te:st:te+st..."), b"\x03testtest...");
    }

    #[test]
    fn test_parse_accepts_uppercase_hex() {
        assert_eq!(parse("1x:", "0A:FF"), vec![0x0a, 0xff]);
    }

    #[test]
    fn test_parse_rejects_mismatch() {
        let hint = DisplayHint::parse("1d.1d.1d.1d").unwrap();
        assert_eq!(hint.parse_text("10.0.4.5").unwrap(), vec![10, 0, 4, 5]);
        assert!(matches!(
            hint.parse_text("01:02:03:04"),
            Err(Error::DisplayMismatch { .. })
        ));
        assert!(hint.parse_text("256.0.0.1").is_err());
    }

    #[test]
    fn test_parse_rejects_wide_ascii() {
        assert!(DisplayHint::parse("255a").unwrap().parse_text("€").is_err());
    }

    #[test]
    fn test_utf8_respects_octet_length() {
        let hint = DisplayHint::parse("2t:").unwrap();
        assert_eq!(hint.render("aé".as_bytes()).unwrap(), "a:é");
        assert_eq!(hint.parse_text("é:a").unwrap(), "éa".as_bytes());

        let hint = DisplayHint::parse("4t-").unwrap();
        let text = hint.render("aé日".as_bytes()).unwrap();
        assert_eq!(text, "aé-日");
        assert_eq!(hint.parse_text(&text).unwrap(), "aé日".as_bytes());
        assert_eq!(
            DisplayHint::parse("3t").unwrap().render("日本".as_bytes()).unwrap(),
            "日本"
        );
    }

    #[test]
    fn test_octal_needs_separator_to_parse_back() {
        let hint = DisplayHint::parse("1o.").unwrap();
        let text = hint.render(&[0, 8]).unwrap();
        assert_eq!(text, "00.010");
        assert_eq!(hint.parse_text(&text).unwrap(), vec![0, 8]);

        let hint = DisplayHint::parse("1o").unwrap();
        let text = hint.render(&[0, 8]).unwrap();
        assert_eq!(text, "00010");
        assert_ne!(hint.parse_text(&text).unwrap(), vec![0, 8]);
    }

    // ========================================================================
    // Integer hints
    // ========================================================================

    #[test]
    fn test_apply_integer() {
        assert_eq!(apply_integer("d-2", 18), Some("0.18".into()));
        assert_eq!(apply_integer("d-2", 8), Some("0.08".into()));
        assert_eq!(apply_integer("d-2", 288), Some("2.88".into()));
        assert_eq!(apply_integer("d-2", 28801), Some("288.01".into()));
        assert_eq!(apply_integer("d-2", -500), Some("-5.00".into()));
        assert_eq!(apply_integer("d-1", 255), Some("25.5".into()));
        assert_eq!(apply_integer("d-0", 7), Some("7".into()));
        assert_eq!(apply_integer("o", 8), Some("10".into()));
        assert_eq!(apply_integer("b", 5), Some("101".into()));
        assert_eq!(apply_integer("x", -255), Some("-ff".into()));
        assert_eq!(apply_integer("1x:", 5), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("d-2", "18.04"), Some(1804));
        assert_eq!(parse_integer("d-2", "0.18"), Some(18));
        assert_eq!(parse_integer("d-2", "2.8"), Some(280));
        assert_eq!(parse_integer("d-2", "-5.00"), Some(-500));
        assert_eq!(parse_integer("d-2", "1.234"), None);
        assert_eq!(parse_integer("x", "ff"), Some(255));
        assert_eq!(parse_integer("b", "101"), Some(5));
        assert_eq!(parse_integer("d", "12a"), None);
    }
}
