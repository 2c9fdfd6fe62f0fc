use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::cli::CliError;

/// Every fatal condition the generator can hit. None of them are recovered from:
/// the run aborts before the output artifact is touched.
#[derive(Debug)]
pub enum Error {
    /// Input that reached a structured stage but does not parse: a non-hex
    /// codepoint field, or a resource that is not UTF-8 (`line` is 0 then).
    Format {
        resource: String,
        line: usize,
        field: String,
    },
    /// Codepoint outside `0..=0x10FFFF` or an inverted `lo..hi` pair.
    Range {
        resource: String,
        line: usize,
        field: String,
    },
    /// Two merged entries of `table` overlap starting at `lo`.
    Overlap { table: String, lo: u32 },
    /// A property name has no emission-time identifier.
    UnmappedSymbol { table: String, property: String },
    /// A resource could not be downloaded or stored in the cache.
    Fetch { resource: String, message: String },
    /// `--check` found the checked-in artifact out of date.
    Stale { path: PathBuf },
    Io(io::Error),
    Cli(CliError),
}

/// Convenience result alias used across the generator.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn fetch(resource: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            resource: resource.into(),
            message: message.to_string(),
        }
    }

    /// Short machine-friendly name of the error class, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Format { .. } => "format",
            Error::Range { .. } => "range",
            Error::Overlap { .. } => "overlap",
            Error::UnmappedSymbol { .. } => "unmapped-symbol",
            Error::Fetch { .. } => "fetch",
            Error::Stale { .. } => "stale",
            Error::Io(_) => "io",
            Error::Cli(_) => "cli",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Format {
                resource,
                line,
                field,
            } => write!(
                f,
                "format error: {resource}:{line}: cannot parse `{field}`"
            ),
            Error::Range {
                resource,
                line,
                field,
            } => write!(
                f,
                "range error: {resource}:{line}: invalid codepoint range `{field}`"
            ),
            Error::Overlap { table, lo } => {
                write!(f, "overlap error: {table}: overlapping ranges at U+{lo:04X}")
            }
            Error::UnmappedSymbol { table, property } => {
                write!(f, "unmapped symbol: {table}: no identifier for property `{property}`")
            }
            Error::Fetch { resource, message } => {
                write!(f, "fetch error: {resource}: {message}")
            }
            Error::Stale { path } => write!(
                f,
                "{} is out of date; rerun ucd-tablegen without --check",
                path.display()
            ),
            Error::Io(err) => write!(f, "I/O error: {err}"),
            Error::Cli(err) => write!(f, "{err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Cli(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<CliError> for Error {
    fn from(error: CliError) -> Self {
        Error::Cli(error)
    }
}
