//! Logging infrastructure for netservice.
//!
//! Library crates in the workspace only emit `tracing` events. Binaries and
//! test suites that want to see them call [`init`] once with a [`LogConfig`].

use std::io;
use std::path::PathBuf;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter, TestWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Environment variable names read by [`LogConfig::from_env`].
pub mod vars {
    pub const LOG_LEVEL: &str = "NETSERVICE_LOG_LEVEL";
    pub const LOG_FORMAT: &str = "NETSERVICE_LOG_FORMAT";
    pub const LOG_FILE: &str = "NETSERVICE_LOG_FILE";
    pub const LOG_SOURCE: &str = "NETSERVICE_LOG_SOURCE";
    pub const LOG_SPANS: &str = "NETSERVICE_LOG_SPANS";
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Log file path (if file logging enabled).
    pub file_path: Option<PathBuf>,
    /// Include source location.
    pub source_location: bool,
    /// Include span open/close events.
    pub span_events: bool,
    /// Extra filter directives appended after the level, e.g. `netservice=trace`.
    pub directives: Option<String>,
    /// Write console output through the libtest capture instead of stderr.
    pub test_writer: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        }
    }
}

impl LogLevel {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON structured format.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            file_path: None,
            source_location: false,
            span_events: false,
            directives: None,
            test_writer: false,
        }
    }
}

fn env_flag(var: &str) -> Option<bool> {
    std::env::var(var)
        .ok()
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

impl LogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let level = std::env::var(vars::LOG_LEVEL).or_else(|_| std::env::var(vars::RUST_LOG));
        if let Some(l) = level.ok().as_deref().and_then(LogLevel::parse) {
            config.level = l;
        }

        if let Ok(format) = std::env::var(vars::LOG_FORMAT) {
            config.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            };
        }

        if let Ok(file_path) = std::env::var(vars::LOG_FILE) {
            config.file_path = Some(PathBuf::from(file_path));
        }

        if let Some(source_location) = env_flag(vars::LOG_SOURCE) {
            config.source_location = source_location;
        }

        if let Some(span_events) = env_flag(vars::LOG_SPANS) {
            config.span_events = span_events;
        }

        config
    }

    fn filter_directives(&self) -> String {
        match &self.directives {
            Some(extra) => format!("{},{}", self.level.as_filter_str(), extra),
            None => self.level.as_filter_str().to_string(),
        }
    }

    fn console_writer(&self) -> BoxMakeWriter {
        if self.test_writer {
            BoxMakeWriter::new(TestWriter::new())
        } else {
            BoxMakeWriter::new(io::stderr)
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Initialize logging with the given configuration.
///
/// `RUST_LOG` directives, when present, take precedence over `config.level`
/// and `config.directives`.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));
    let ansi = !config.test_writer;

    let file = match &config.file_path {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        ),
        None => None,
    };

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => {
            let console_layer = fmt::layer()
                .with_writer(config.console_writer())
                .with_ansi(ansi)
                .with_target(true)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_span_events(config.span_events());

            let file_layer = file.map(|file| {
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(config.source_location)
                    .with_line_number(config.source_location)
                    .with_span_events(config.span_events())
            });

            registry
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LogError::InitError(e.to_string()))?;
        }
        LogFormat::Compact => {
            let console_layer = fmt::layer()
                .compact()
                .with_writer(config.console_writer())
                .with_ansi(ansi)
                .with_span_events(config.span_events());

            let file_layer = file.map(|file| {
                fmt::layer()
                    .compact()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_span_events(config.span_events())
            });

            registry
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LogError::InitError(e.to_string()))?;
        }
        LogFormat::Json => {
            let console_layer = fmt::layer()
                .json()
                .with_writer(config.console_writer())
                .with_span_events(config.span_events());

            let file_layer = file.map(|file| {
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_span_events(config.span_events())
            });

            registry
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LogError::InitError(e.to_string()))?;
        }
    }

    Ok(())
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}

/// Request spans and timing.
pub mod spans;
