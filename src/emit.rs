//! Renders validated range sets into the C include fragment the runtime builds against.

use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::config::UNICODE_VERSION;
use crate::filter::GraphemeBreak;
use crate::ranges::{Range, ValuedRange};

/// Format a codepoint the way the checked-in tables spell it.
///
/// BMP values are zero-padded to four digits, the rest use as many digits as needed.
#[must_use]
pub fn format_u32(value: u32) -> String {
    if value <= 0xFFFF {
        format!("0x{value:04X}u")
    } else {
        format!("0x{value:X}u")
    }
}

/// Inverse of [`format_u32`]. Only its exact spelling is accepted: uppercase
/// digits, four-digit padding below `0x10000`, no sign or extra zeros.
#[must_use]
pub fn parse_u32_literal(text: &str) -> Option<u32> {
    let digits = text.strip_prefix("0x")?.strip_suffix('u')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    (format_u32(value) == text).then_some(value)
}

/// One named table, fully rendered and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmittedTable {
    name: &'static str,
    element_type: &'static str,
    entries: Vec<String>,
}

impl EmittedTable {
    /// Table of plain `{lo, hi}` entries.
    #[must_use]
    pub fn ranges(name: &'static str, ranges: &[Range]) -> Self {
        let entries = ranges
            .iter()
            .map(|range| format!("{{{}, {}}}", format_u32(range.lo), format_u32(range.hi)))
            .collect();
        Self {
            name,
            element_type: "zr_unicode_range_t",
            entries,
        }
    }

    /// Table of `{lo, hi, class, pad}` entries for grapheme break values.
    #[must_use]
    pub fn grapheme_ranges(name: &'static str, ranges: &[ValuedRange<GraphemeBreak>]) -> Self {
        let entries = ranges
            .iter()
            .map(|range| {
                format!(
                    "{{{}, {}, (uint8_t){}, {{0u, 0u, 0u}}}}",
                    format_u32(range.lo),
                    format_u32(range.hi),
                    range.value.symbol()
                )
            })
            .collect();
        Self {
            name,
            element_type: "zr_unicode_range8_t",
            entries,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn render_into(&self, out: &mut String) {
        let _ = writeln!(out, "static const {} {}[] = {{", self.element_type, self.name);
        for entry in &self.entries {
            let _ = writeln!(out, "  {entry},");
        }
        out.push_str("};");
    }
}

fn header() -> String {
    format!(
        "/*
  src/unicode/zr_unicode_data_tables_15_1_0.inc — Generated Unicode {UNICODE_VERSION} tables.

  Why: Provides immutable, deterministic property ranges for grapheme iteration and width.

  Generated by: ucd-tablegen
*/
"
    )
}

/// Render the complete artifact: header, then each table separated by a blank line.
#[must_use]
pub fn render_artifact(tables: &[EmittedTable]) -> String {
    let mut out = header();
    out.push('\n');
    for (index, table) in tables.iter().enumerate() {
        if index > 0 {
            out.push_str("\n\n");
        }
        table.render_into(&mut out);
    }
    out.push('\n');
    out
}

/// Replace `path` with `contents` in one step.
///
/// The bytes go to a temporary sibling first and are renamed over `path`, so
/// readers see either the old file or the complete new one.
///
/// # Errors
/// Propagates any I/O failure; `path` is untouched in that case.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn formats_bmp_padded_and_supplementary_minimal() {
        assert_eq!(format_u32(0x0), "0x0000u");
        assert_eq!(format_u32(0xA9), "0x00A9u");
        assert_eq!(format_u32(0xFFFF), "0xFFFFu");
        assert_eq!(format_u32(0x10000), "0x10000u");
        assert_eq!(format_u32(0x1F600), "0x1F600u");
        assert_eq!(format_u32(0x10FFFF), "0x10FFFFu");
    }

    #[test]
    fn formatted_literals_parse_back_at_boundaries() {
        for value in [0x0, 0xFFFF, 0x10000, 0x10FFFF] {
            assert_eq!(parse_u32_literal(&format_u32(value)), Some(value));
        }
        assert_eq!(parse_u32_literal("0xu"), None);
        assert_eq!(parse_u32_literal("0x41"), None);
        assert_eq!(parse_u32_literal("41u"), None);
    }

    #[test]
    fn literal_parser_rejects_non_canonical_spellings() {
        assert_eq!(parse_u32_literal("0x0041u"), Some(0x41));
        assert_eq!(parse_u32_literal("0x+41u"), None);
        assert_eq!(parse_u32_literal("0x+0041u"), None);
        assert_eq!(parse_u32_literal("0x00041u"), None);
        assert_eq!(parse_u32_literal("0x41u"), None);
        assert_eq!(parse_u32_literal("0x00a9u"), None);
        assert_eq!(parse_u32_literal("0x01F600u"), None);
        assert_eq!(parse_u32_literal("0x1F600u"), Some(0x1F600));
    }

    #[test]
    fn renders_tables_in_input_order() {
        let gcb = EmittedTable::grapheme_ranges(
            "kGcbRanges",
            &[
                ValuedRange::new(0x0A, 0x0A, GraphemeBreak::LF),
                ValuedRange::new(0x1F1E6, 0x1F1FF, GraphemeBreak::RegionalIndicator),
            ],
        );
        let wide = EmittedTable::ranges("kEawWideRanges", &[Range::new(0x1100, 0x115F)]);
        let empty = EmittedTable::ranges("kEmpty", &[]);
        assert_eq!(gcb.len(), 2);
        assert!(empty.is_empty());

        let artifact = render_artifact(&[gcb, wide, empty]);
        expect![[r#"
            /*
              src/unicode/zr_unicode_data_tables_15_1_0.inc — Generated Unicode 15.1.0 tables.

              Why: Provides immutable, deterministic property ranges for grapheme iteration and width.

              Generated by: ucd-tablegen
            */

            static const zr_unicode_range8_t kGcbRanges[] = {
              {0x000Au, 0x000Au, (uint8_t)ZR_GCB_LF, {0u, 0u, 0u}},
              {0x1F1E6u, 0x1F1FFu, (uint8_t)ZR_GCB_REGIONAL_INDICATOR, {0u, 0u, 0u}},
            };

            static const zr_unicode_range_t kEawWideRanges[] = {
              {0x1100u, 0x115Fu},
            };

            static const zr_unicode_range_t kEmpty[] = {
            };
        "#]]
        .assert_eq(&artifact);
    }

    #[test]
    fn rendering_is_deterministic() {
        let build = || {
            render_artifact(&[EmittedTable::ranges(
                "kExtendedPictographicRanges",
                &[Range::new(0xA9, 0xA9), Range::new(0x1F000, 0x1F0FF)],
            )])
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tables.inc");
        write_atomic(&path, b"first\n").unwrap();
        write_atomic(&path, b"second\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
