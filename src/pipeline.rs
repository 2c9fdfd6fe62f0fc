//! Drives one generator run: load, parse, merge, validate, emit, write.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::config::{GeneratorConfig, UcdResource};
use crate::emit::{EmittedTable, render_artifact, write_atomic};
use crate::error::{Error, Result};
use crate::filter::{Category, GraphemeBreak, select_grapheme_ranges, select_ranges};
use crate::parse::{PropertyRow, parse_rows};
use crate::provider::{CachedProvider, ResourceProvider};
use crate::ranges::{
    Range, ValuedRange, merge_ranges, merge_valued_ranges, validate_ranges,
    validate_valued_ranges,
};

/// Merged and validated range sets, ready for emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSet {
    pub grapheme_break: Vec<ValuedRange<GraphemeBreak>>,
    pub extended_pictographic: Vec<Range>,
    pub emoji_presentation: Vec<Range>,
    pub east_asian_wide: Vec<Range>,
}

impl TableSet {
    /// Render every table in the fixed artifact order.
    #[must_use]
    pub fn emit(&self) -> Vec<EmittedTable> {
        vec![
            EmittedTable::grapheme_ranges("kGcbRanges", &self.grapheme_break),
            EmittedTable::ranges("kExtendedPictographicRanges", &self.extended_pictographic),
            EmittedTable::ranges("kEmojiPresentationRanges", &self.emoji_presentation),
            EmittedTable::ranges("kEawWideRanges", &self.east_asian_wide),
        ]
    }
}

/// What a completed run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    pub out: PathBuf,
    /// `(table name, entry count)` in artifact order.
    pub tables: Vec<(&'static str, usize)>,
    /// `true` when the artifact was written, `false` for a passing `--check`.
    pub written: bool,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        if !self.written {
            return format!("{} is up to date", self.out.display());
        }
        let counts = self
            .tables
            .iter()
            .map(|(name, count)| format!("{name}={count}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "generated {} tables ({counts}) into {}",
            self.tables.len(),
            self.out.display()
        )
    }
}

/// Run the generator against the on-disk cache described by `config`.
///
/// # Errors
/// Any fatal error from a pipeline stage; nothing is written in that case.
pub fn run(config: &GeneratorConfig) -> Result<GenerationReport> {
    let provider = CachedProvider::new(&config.ucd_dir, config.offline);
    run_with_provider(config, &provider)
}

/// [`run`] with a caller-supplied resource provider.
///
/// # Errors
/// See [`run`]. With `config.check` set, a differing or missing output file is
/// [`Error::Stale`].
pub fn run_with_provider(
    config: &GeneratorConfig,
    provider: &dyn ResourceProvider,
) -> Result<GenerationReport> {
    let started = Instant::now();
    info!(
        target: "pipeline",
        stage = "tablegen.run.start",
        ucd_dir = %config.ucd_dir.display(),
        out = %config.out.display(),
        offline = config.offline,
        check = config.check
    );

    let tables = build_tables(provider)?.emit();
    let artifact = render_artifact(&tables);
    let report = GenerationReport {
        out: config.out.clone(),
        tables: tables.iter().map(|table| (table.name(), table.len())).collect(),
        written: !config.check,
    };

    if config.check {
        check_up_to_date(&config.out, &artifact)?;
    } else {
        write_atomic(&config.out, artifact.as_bytes())?;
    }

    info!(
        target: "pipeline",
        stage = "tablegen.run.complete",
        status = "ok",
        out = %config.out.display(),
        bytes = artifact.len(),
        written = report.written,
        elapsed_ms = started.elapsed().as_millis() as u64
    );
    Ok(report)
}

/// Load, parse, merge and validate every table.
///
/// # Errors
/// The first fatal error of any stage.
pub fn build_tables(provider: &dyn ResourceProvider) -> Result<TableSet> {
    let gcb_rows = load_rows(
        provider,
        UcdResource::GraphemeBreakProperty,
        &[Category::GraphemeBreak],
    )?;
    let grapheme_break = merge_valued_ranges(select_grapheme_ranges(&gcb_rows)?);
    validate_valued_ranges(Category::GraphemeBreak.label(), &grapheme_break)?;
    log_merged(Category::GraphemeBreak, gcb_rows.len(), grapheme_break.len());

    let emoji_rows = load_rows(
        provider,
        UcdResource::EmojiData,
        &[Category::ExtendedPictographic, Category::EmojiPresentation],
    )?;
    let extended_pictographic = merged_category(&emoji_rows, Category::ExtendedPictographic)?;
    let emoji_presentation = merged_category(&emoji_rows, Category::EmojiPresentation)?;

    let eaw_rows = load_rows(provider, UcdResource::EastAsianWidth, &[Category::EastAsianWide])?;
    let east_asian_wide = merged_category(&eaw_rows, Category::EastAsianWide)?;

    Ok(TableSet {
        grapheme_break,
        extended_pictographic,
        emoji_presentation,
        east_asian_wide,
    })
}

/// Parse `resource`, keeping only the properties of `categories`.
fn load_rows(
    provider: &dyn ResourceProvider,
    resource: UcdResource,
    categories: &[Category],
) -> Result<Vec<PropertyRow>> {
    debug_assert!(categories.iter().all(|category| category.resource() == resource));
    let wanted: Vec<&str> = categories
        .iter()
        .flat_map(|category| category.property_names().iter().copied())
        .collect();
    let text = provider.load(resource)?;
    let rows = parse_rows(resource.file_name(), &text, Some(wanted.as_slice()))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        target: "pipeline",
        stage = "tablegen.parse",
        resource = resource.file_name(),
        lines = text.lines().count(),
        rows = rows.len()
    );
    Ok(rows)
}

fn merged_category(rows: &[PropertyRow], category: Category) -> Result<Vec<Range>> {
    let selected = select_ranges(rows, category);
    let selected_len = selected.len();
    let merged = merge_ranges(selected);
    validate_ranges(category.label(), &merged)?;
    log_merged(category, selected_len, merged.len());
    Ok(merged)
}

fn log_merged(category: Category, rows: usize, ranges: usize) {
    info!(
        target: "pipeline",
        stage = "tablegen.merge",
        table = category.label(),
        resource = category.resource().file_name(),
        rows,
        ranges
    );
}

fn check_up_to_date(path: &Path, artifact: &str) -> Result<()> {
    match fs::read(path) {
        Ok(existing) if existing == artifact.as_bytes() => Ok(()),
        Ok(_) => Err(Error::Stale {
            path: path.to_path_buf(),
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(Error::Stale {
            path: path.to_path_buf(),
        }),
        Err(err) => Err(Error::Io(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticProvider;

    const GCB: &str = "\
# GraphemeBreakProperty-15.1.0.txt
0600..0605    ; Prepend # Cf   [6] ARABIC NUMBER SIGN..ARABIC NUMBER MARK ABOVE
000D          ; CR # Cc       <control-000D>
000A          ; LF # Cc       <control-000A>
0000..0009    ; Control # Cc  [10] <control-0000>..<control-0009>
000B..000C    ; Control # Cc   [2] <control-000B>..<control-000C>
000E..001F    ; Control # Cc  [18] <control-000E>..<control-001F>
0300..036F    ; Extend # Mn [112] COMBINING GRAVE ACCENT..COMBINING LATIN SMALL LETTER X
200D          ; ZWJ # Cf       ZERO WIDTH JOINER
";

    const EMOJI: &str = "\
# emoji-data.txt
1F600..1F64F  ; Emoji_Presentation   # E1.0 [80] grinning face..person with folded hands
00A9          ; Extended_Pictographic# E0.6   [1] copyright
00AE          ; Extended_Pictographic# E0.6   [1] registered
1F600..1F64F  ; Extended_Pictographic# E1.0 [80] grinning face..person with folded hands
1F650..1F67F  ; Extended_Pictographic# E0.0 [48] <reserved-1F650>..<reserved-1F67F>
1F600..1F64F  ; Emoji                # E1.0 [80] grinning face..person with folded hands
";

    const EAW: &str = "\
0000..001F     ; N  # Cc    [32] <control-0000>..<control-001F>
1100..115F     ; W  # Lo    [96] HANGUL CHOSEONG KIYEOK..HANGUL CHOSEONG FILLER
3000           ; F  # Zs         IDEOGRAPHIC SPACE
3001..3003     ; W  # Po     [3] IDEOGRAPHIC COMMA..DITTO MARK
FF01..FF60     ; F  # Po    [96] FULLWIDTH EXCLAMATION MARK..FULLWIDTH RIGHT WHITE PARENTHESIS
20000..2FFFD   ; W  # Lo [65534] CJK UNIFIED IDEOGRAPH-20000..<reserved-2FFFD>
";

    fn provider() -> StaticProvider {
        StaticProvider::new()
            .with(UcdResource::GraphemeBreakProperty, GCB)
            .with(UcdResource::EmojiData, EMOJI)
            .with(UcdResource::EastAsianWidth, EAW)
    }

    #[test]
    fn builds_sorted_minimal_tables() {
        let tables = build_tables(&provider()).unwrap();
        assert_eq!(
            tables.grapheme_break,
            vec![
                ValuedRange::new(0x00, 0x09, GraphemeBreak::Control),
                ValuedRange::new(0x0A, 0x0A, GraphemeBreak::LF),
                ValuedRange::new(0x0B, 0x0C, GraphemeBreak::Control),
                ValuedRange::new(0x0D, 0x0D, GraphemeBreak::CR),
                ValuedRange::new(0x0E, 0x1F, GraphemeBreak::Control),
                ValuedRange::new(0x300, 0x36F, GraphemeBreak::Extend),
                ValuedRange::new(0x600, 0x605, GraphemeBreak::Prepend),
                ValuedRange::new(0x200D, 0x200D, GraphemeBreak::ZWJ),
            ]
        );
        assert_eq!(
            tables.extended_pictographic,
            vec![
                Range::new(0xA9, 0xA9),
                Range::new(0xAE, 0xAE),
                Range::new(0x1F600, 0x1F67F)
            ]
        );
        assert_eq!(tables.emoji_presentation, vec![Range::new(0x1F600, 0x1F64F)]);
        assert_eq!(
            tables.east_asian_wide,
            vec![
                Range::new(0x1100, 0x115F),
                Range::new(0x3000, 0x3003),
                Range::new(0xFF01, 0xFF60),
                Range::new(0x20000, 0x2FFFD)
            ]
        );
    }

    #[test]
    fn run_writes_artifact_and_reports_counts() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            ucd_dir: dir.path().join("ucd"),
            out: dir.path().join("out").join("tables.inc"),
            offline: true,
            check: false,
        };
        let report = run_with_provider(&config, &provider()).unwrap();
        assert!(report.written);
        assert_eq!(
            report.tables,
            vec![
                ("kGcbRanges", 8),
                ("kExtendedPictographicRanges", 3),
                ("kEmojiPresentationRanges", 1),
                ("kEawWideRanges", 4)
            ]
        );
        let written = fs::read_to_string(&config.out).unwrap();
        assert!(written.contains("  {0x20000u, 0x2FFFDu},\n"));
        assert!(written.contains("  {0x200Du, 0x200Du, (uint8_t)ZR_GCB_ZWJ, {0u, 0u, 0u}},\n"));
        assert!(report.summary().starts_with("generated 4 tables (kGcbRanges=8"));
    }

    #[test]
    fn check_mode_compares_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GeneratorConfig {
            ucd_dir: dir.path().to_path_buf(),
            out: dir.path().join("tables.inc"),
            offline: true,
            check: true,
        };
        assert!(matches!(
            run_with_provider(&config, &provider()),
            Err(Error::Stale { .. })
        ));
        assert!(!config.out.exists());

        config.check = false;
        run_with_provider(&config, &provider()).unwrap();
        config.check = true;
        let report = run_with_provider(&config, &provider()).unwrap();
        assert!(!report.written);
        assert!(report.summary().ends_with("is up to date"));

        fs::write(&config.out, "edited by hand\n").unwrap();
        assert!(matches!(
            run_with_provider(&config, &provider()),
            Err(Error::Stale { .. })
        ));
    }

    #[test]
    fn fatal_error_leaves_previous_artifact_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("tables.inc");
        fs::write(&out, "previous\n").unwrap();
        let config = GeneratorConfig {
            ucd_dir: dir.path().to_path_buf(),
            out: out.clone(),
            offline: true,
            check: false,
        };
        let broken = provider().with(UcdResource::EastAsianWidth, "110000 ; W\n");
        let err = run_with_provider(&config, &broken).unwrap_err();
        assert!(matches!(err, Error::Range { .. }), "{err:?}");
        assert_eq!(fs::read_to_string(&out).unwrap(), "previous\n");
    }

    #[test]
    fn missing_resource_is_a_fetch_error() {
        let partial = StaticProvider::new().with(UcdResource::GraphemeBreakProperty, GCB);
        assert!(matches!(build_tables(&partial), Err(Error::Fetch { .. })));
    }

    #[test]
    fn output_is_identical_across_runs_and_input_orders() {
        let shuffled: String = GCB.lines().rev().map(|line| format!("{line}\n")).collect();
        let reversed = provider().with(UcdResource::GraphemeBreakProperty, shuffled);
        let a = render_artifact(&build_tables(&provider()).unwrap().emit());
        let b = render_artifact(&build_tables(&reversed).unwrap().emit());
        assert_eq!(a, b);
    }
}
