//! Argument parsing for the `ucd-tablegen` binary.

use std::env;
use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use crate::config::{DEFAULT_OUT_PATH, DEFAULT_UCD_DIR, GeneratorConfig, UNICODE_VERSION};
use crate::logging::{FORMAT_ENV, LEVEL_ENV, LogFormat, LogOptions, parse_level};

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate(GeneratorConfig),
    Help,
    Version,
}

/// A fully parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub command: Command,
    pub log_options: LogOptions,
}

#[derive(Debug)]
pub struct CliError {
    message: String,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn with_usage(message: impl Into<String>) -> Self {
        let mut owned = message.into();
        owned.push_str("\n\n");
        owned.push_str(&Cli::usage());
        Self::new(owned)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for CliError {}

fn is_help_flag(value: &str) -> bool {
    matches!(value, "-h" | "--help")
}

impl Cli {
    /// Parse arguments from the environment.
    ///
    /// # Errors
    /// Returns a [`CliError`] for unknown flags or missing flag values.
    pub fn parse() -> Result<Self, CliError> {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse arguments from an iterator (useful for testing).
    ///
    /// # Errors
    /// Returns a [`CliError`] when the iterator does not describe a valid invocation.
    pub fn parse_from<I, T>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut iter = args.into_iter().map(Into::into);
        let mut config = GeneratorConfig::default();
        let mut log_format = None;
        let mut log_level = None;

        while let Some(arg) = iter.next() {
            // `--flag=value` is accepted alongside `--flag value`.
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg, None),
            };
            let mut value = |name: &str| -> Result<String, CliError> {
                match inline.clone().or_else(|| iter.next()) {
                    Some(value) if !value.trim().is_empty() => Ok(value),
                    _ => Err(CliError::with_usage(format!("expected a value after {name}"))),
                }
            };

            match flag.as_str() {
                flag if is_help_flag(flag) => {
                    return Ok(Cli {
                        command: Command::Help,
                        log_options: LogOptions::resolve(log_format, log_level),
                    });
                }
                "-V" | "--version" => {
                    return Ok(Cli {
                        command: Command::Version,
                        log_options: LogOptions::resolve(log_format, log_level),
                    });
                }
                "--ucd-dir" => config.ucd_dir = PathBuf::from(value("--ucd-dir")?),
                "--out" => config.out = PathBuf::from(value("--out")?),
                "--offline" => config.offline = true,
                "--check" => config.check = true,
                "--log-format" => {
                    let raw = value("--log-format")?;
                    let format = LogFormat::parse(&raw).ok_or_else(|| {
                        CliError::with_usage(format!("unsupported log format '{raw}'"))
                    })?;
                    log_format = Some(format);
                }
                "--log-level" => {
                    let raw = value("--log-level")?;
                    let level = parse_level(&raw).ok_or_else(|| {
                        CliError::with_usage(format!("unsupported log level '{raw}'"))
                    })?;
                    log_level = Some(level);
                }
                other => {
                    return Err(CliError::with_usage(format!(
                        "unsupported argument '{other}'"
                    )));
                }
            }
        }

        Ok(Cli {
            command: Command::Generate(config),
            log_options: LogOptions::resolve(log_format, log_level),
        })
    }

    pub fn usage() -> String {
        format!(
            "USAGE:\n  ucd-tablegen [OPTIONS]\n\n\
             Regenerates the Unicode {UNICODE_VERSION} property tables from UCD sources.\n\n\
             OPTIONS:\n\
             \x20 --ucd-dir <DIR>      UCD cache directory (default: {DEFAULT_UCD_DIR})\n\
             \x20 --out <FILE>         Generated table path (default: {DEFAULT_OUT_PATH})\n\
             \x20 --offline            Fail instead of downloading missing UCD files\n\
             \x20 --check              Verify <FILE> is up to date without writing it\n\
             \x20 --log-format <FMT>   text | json (env: {FORMAT_ENV})\n\
             \x20 --log-level <LEVEL>  error | warn | info | debug | trace (env: {LEVEL_ENV})\n\
             \x20 -h, --help           Print this message\n\
             \x20 -V, --version        Print the version\n\n\
             NOTES:\n\
             \x20 The header of <FILE> names ucd-tablegen as its generator. A table written by\n\
             \x20 another generator fails --check until it has been regenerated once."
        )
    }
}
