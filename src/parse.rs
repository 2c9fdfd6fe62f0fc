//! Line-oriented reader for UCD property files.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// Largest Unicode scalar value.
pub const MAX_CODEPOINT: u32 = 0x10_FFFF;

#[allow(clippy::expect_used)]
static DATA_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9A-Fa-f.]+)\s*;\s*([A-Za-z_]+)\b").expect("data line pattern"));

/// One `lo..hi ; Property` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyRow {
    pub lo: u32,
    pub hi: u32,
    pub property: String,
}

/// Lazily parse `text`, yielding one row per data line.
///
/// `resource` only labels diagnostics. When `wanted` is given, rows with any
/// other property name are dropped before their codepoint field is looked at.
pub fn parse_rows<'a>(
    resource: &'a str,
    text: &'a str,
    wanted: Option<&'a [&'a str]>,
) -> PropertyRows<'a> {
    PropertyRows {
        resource,
        lines: text.lines().enumerate(),
        wanted,
    }
}

/// Iterator returned by [`parse_rows`].
pub struct PropertyRows<'a> {
    resource: &'a str,
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    wanted: Option<&'a [&'a str]>,
}

impl Iterator for PropertyRows<'_> {
    type Item = Result<PropertyRow>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, raw) in self.lines.by_ref() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(caps) = DATA_LINE.captures(line) else {
                continue;
            };
            let (field, property) = (&caps[1], &caps[2]);
            if let Some(wanted) = self.wanted {
                if !wanted.iter().any(|name| *name == property) {
                    continue;
                }
            }
            return Some(
                parse_codepoint_range(self.resource, index + 1, field).map(|(lo, hi)| {
                    PropertyRow {
                        lo,
                        hi,
                        property: property.to_string(),
                    }
                }),
            );
        }
        None
    }
}

/// Parse `HEX` or `HEX..HEX` and check it describes a valid codepoint range.
pub fn parse_codepoint_range(resource: &str, line: usize, field: &str) -> Result<(u32, u32)> {
    let format_error = || Error::Format {
        resource: resource.to_string(),
        line,
        field: field.to_string(),
    };
    let range_error = || Error::Range {
        resource: resource.to_string(),
        line,
        field: field.to_string(),
    };

    let (lo_text, hi_text) = field.split_once("..").unwrap_or((field, field));
    let lo = parse_hex(lo_text).ok_or_else(format_error)?;
    let hi = parse_hex(hi_text).ok_or_else(format_error)?;
    // Values past u32 are still "out of range" rather than malformed.
    let (Some(lo), Some(hi)) = (lo, hi) else {
        return Err(range_error());
    };
    if lo > hi || hi > MAX_CODEPOINT {
        return Err(range_error());
    }
    Ok((lo, hi))
}

/// `None` when `text` is not hex at all, `Some(None)` when it overflows `u32`.
fn parse_hex(text: &str) -> Option<Option<u32>> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(u32::from_str_radix(text, 16).ok())
}
