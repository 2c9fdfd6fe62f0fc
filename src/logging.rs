//! Stderr subscriber for pipeline events.
//!
//! Flags win over `UCD_TABLEGEN_LOG_FORMAT` / `UCD_TABLEGEN_LOG_LEVEL`, which win
//! over [`LogOptions::DEFAULT`]. `RUST_LOG` directives still apply on top of the
//! chosen level.

use std::env;
use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

pub const FORMAT_ENV: &str = "UCD_TABLEGEN_LOG_FORMAT";
pub const LEVEL_ENV: &str = "UCD_TABLEGEN_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line text.
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("text") {
            Some(Self::Text)
        } else if value.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

/// `error`, `warn`, `info`, `debug` or `trace`, in any case.
pub fn parse_level(value: &str) -> Option<Level> {
    value.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    pub format: LogFormat,
    pub level: Level,
}

impl LogOptions {
    pub const DEFAULT: Self = Self {
        format: LogFormat::Text,
        level: Level::INFO,
    };

    /// Fill whatever the command line left unset from the environment.
    #[must_use]
    pub fn resolve(format: Option<LogFormat>, level: Option<Level>) -> Self {
        let env_format = env::var(FORMAT_ENV).ok();
        let env_level = env::var(LEVEL_ENV).ok();
        Self::layered(format, level, env_format.as_deref(), env_level.as_deref())
    }

    // Unparsable environment values fall through to the default.
    fn layered(
        format: Option<LogFormat>,
        level: Option<Level>,
        env_format: Option<&str>,
        env_level: Option<&str>,
    ) -> Self {
        Self {
            format: format
                .or_else(|| env_format.and_then(LogFormat::parse))
                .unwrap_or(Self::DEFAULT.format),
            level: level
                .or_else(|| env_level.and_then(parse_level))
                .unwrap_or(Self::DEFAULT.level),
        }
    }
}

/// Install the global stderr subscriber. Later calls are no-ops.
pub fn init_logging(options: LogOptions) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(options.level).into())
            .from_env_lossy();
        let builder = fmt::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true);

        // Fails only when another subscriber already owns the global slot.
        let _ = match options.format {
            LogFormat::Json => {
                tracing::subscriber::set_global_default(builder.with_ansi(false).json().finish())
            }
            LogFormat::Text => {
                let ansi = env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
                tracing::subscriber::set_global_default(builder.with_ansi(ansi).compact().finish())
            }
        };
    });
}
