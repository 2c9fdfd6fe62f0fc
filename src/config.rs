//! Pinned resource locations and run configuration.

use std::path::PathBuf;

/// Unicode version every table is generated from.
pub const UNICODE_VERSION: &str = "15.1.0";

/// Base location of the pinned UCD release.
pub const UCD_BASE_URL: &str = "https://www.unicode.org/Public/15.1.0/ucd";

pub const DEFAULT_UCD_DIR: &str = "out/unicode-ucd-15.1.0";
pub const DEFAULT_OUT_PATH: &str = "src/unicode/zr_unicode_data_tables_15_1_0.inc";

/// The UCD files the generator reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UcdResource {
    GraphemeBreakProperty,
    EmojiData,
    EastAsianWidth,
}

impl UcdResource {
    /// File name inside the cache directory.
    pub const fn file_name(self) -> &'static str {
        match self {
            UcdResource::GraphemeBreakProperty => "GraphemeBreakProperty.txt",
            UcdResource::EmojiData => "emoji-data.txt",
            UcdResource::EastAsianWidth => "EastAsianWidth.txt",
        }
    }

    /// Path below [`UCD_BASE_URL`].
    pub const fn url_path(self) -> &'static str {
        match self {
            UcdResource::GraphemeBreakProperty => "auxiliary/GraphemeBreakProperty.txt",
            UcdResource::EmojiData => "emoji/emoji-data.txt",
            UcdResource::EastAsianWidth => "EastAsianWidth.txt",
        }
    }

    pub fn url(self) -> String {
        format!("{UCD_BASE_URL}/{}", self.url_path())
    }
}

/// Settings for one generator run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Cache directory holding (or receiving) the raw UCD files.
    pub ucd_dir: PathBuf,
    /// Destination of the generated table fragment.
    pub out: PathBuf,
    /// Never touch the network; a missing cache file is fatal.
    pub offline: bool,
    /// Compare against `out` instead of writing it.
    pub check: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ucd_dir: PathBuf::from(DEFAULT_UCD_DIR),
            out: PathBuf::from(DEFAULT_OUT_PATH),
            offline: false,
            check: false,
        }
    }
}
