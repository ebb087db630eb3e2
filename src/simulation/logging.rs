//! Logging and tracing configuration
//!
//! The simulator binary installs one global subscriber: a console layer on stderr
//! (pretty or JSON) and, optionally, a JSON file layer that rolls daily. Simulation
//! code only emits events; it never configures output itself.

use std::io;
use tracing::{info, Level};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::types::CliArgs;

/// Prefix of log files written by the binary
pub const LOG_FILE_PREFIX: &str = "warehouse-sim";

type LoggingResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleFormat {
    /// Multi-line human-readable output
    Pretty,
    /// One JSON object per event
    Json,
}

/// Daily rolling JSON log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Directory the files are written to
    pub directory: String,
    /// File name prefix; the date is appended per file
    pub prefix: String,
}

/// Subscriber settings for one process
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level applied to this crate and the binary
    pub level: Level,
    /// Console layer format
    pub console: ConsoleFormat,
    /// Colored console output (pretty format only)
    pub ansi: bool,
    /// Log span open and close, used to time runs and sweeps
    pub span_events: bool,
    /// Optional file layer
    pub file: Option<LogFile>,
    /// Filter directive overriding both `level` and `RUST_LOG`
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            console: ConsoleFormat::Pretty,
            ansi: true,
            span_events: false,
            file: None,
            env_filter: None,
        }
    }
}

/// Keeps the background file writer alive; drop it to flush file output
#[derive(Debug)]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration matching the CLI verbosity flags
    pub fn for_cli(verbose: bool, debug: bool) -> Self {
        match (verbose, debug) {
            (_, true) => Self::new().with_level(Level::DEBUG).with_span_events(),
            (true, false) => Self::new().with_level(Level::INFO),
            (false, false) => Self::new(),
        }
    }

    /// Verbosity flags plus the optional `--log-dir` file layer
    pub fn from_cli_args(args: &CliArgs) -> Self {
        let config = Self::for_cli(args.verbose, args.debug);
        match &args.log_dir {
            Some(directory) => config.with_log_file(directory.as_str(), LOG_FILE_PREFIX),
            None => config,
        }
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Emit JSON on the console
    pub fn with_json_console(mut self) -> Self {
        self.console = ConsoleFormat::Json;
        self
    }

    /// Also write JSON logs to `directory`, one file per day named `<prefix>.<date>`
    pub fn with_log_file(mut self, directory: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.file = Some(LogFile { directory: directory.into(), prefix: prefix.into() });
        self
    }

    /// Log span open and close
    pub fn with_span_events(mut self) -> Self {
        self.span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directive used when neither a custom filter nor `RUST_LOG` is set
    pub fn default_directive(&self) -> String {
        format!(
            "{}={level},warehouse_sim={level}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            level = self.level
        )
    }

    fn fmt_span(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn filter(&self) -> LoggingResult<EnvFilter> {
        Ok(match &self.env_filter {
            Some(directive) => EnvFilter::try_new(directive)?,
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive())),
        })
    }

    /// Install the global subscriber
    ///
    /// Fails if a subscriber is already installed or the filter directive is invalid.
    pub fn init(self) -> LoggingResult<LoggingGuard> {
        let filter = self.filter()?;

        let console = match self.console {
            ConsoleFormat::Json => fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_span_events(self.fmt_span())
                .boxed(),
            ConsoleFormat::Pretty => fmt::layer()
                .pretty()
                .with_writer(io::stderr)
                .with_ansi(self.ansi)
                .with_span_events(self.fmt_span())
                .boxed(),
        };

        let mut file_guard = None;
        let file = self.file.as_ref().map(|file| {
            let (writer, guard) = non_blocking(rolling::daily(&file.directory, &file.prefix));
            file_guard = Some(guard);
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_span_events(self.fmt_span())
                .boxed()
        });

        Registry::default().with(filter).with(console).with(file).try_init()?;

        match &self.file {
            Some(file) => info!("Logging at {} to console and {}/{}", self.level, file.directory, file.prefix),
            None => info!("Logging at {} to console", self.level),
        }
        Ok(LoggingGuard { _file_guard: file_guard })
    }

    /// Quiet plain-text logging for tests
    pub fn init_test() -> LoggingResult<LoggingGuard> {
        Self::new().without_ansi().init()
    }
}

/// Structured event tagged as coming from the simulation engine
#[macro_export]
macro_rules! sim_event {
    ($level:ident, $message:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::$level!(
            message = $message,
            component = "engine",
            $($key = $value,)*
        );
    };
    ($level:ident, $message:expr) => {
        tracing::$level!(message = $message, component = "engine");
    };
}

/// Info-level span timing one run or sweep
#[macro_export]
macro_rules! perf_span {
    ($name:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info_span!(
            $name,
            component = "timing",
            $($key = $value,)*
        )
    };
    ($name:expr) => {
        tracing::info_span!($name, component = "timing")
    };
}
