//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so they never interleave with page output on stdout.
//! `RUST_LOG` overrides the level derived from the CLI flags.

use crate::cli::Verbosity;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter for this crate.
    pub level: Level,
    /// Whether to include the module path in log lines.
    pub with_target: bool,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Map CLI verbosity to a level.
    ///
    /// The interactive shell owns the terminal, so the default stays at
    /// `warn`; `-v` shows debug, `-vv` trace.
    pub fn from_verbosity(verbosity: Verbosity) -> Self {
        let level = match verbosity {
            Verbosity::Quiet => Level::ERROR,
            Verbosity::Normal => Level::WARN,
            Verbosity::Verbose => Level::DEBUG,
            Verbosity::VeryVerbose => Level::TRACE,
        };
        Self {
            level,
            with_target: matches!(verbosity, Verbosity::VeryVerbose),
            ..Default::default()
        }
    }

    /// Filter directive for this config
    pub fn directive(&self) -> String {
        format!("smartmed={},warn", self.level.to_string().to_lowercase())
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging(config: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .with_ansi(config.with_ansi)
        .compact();

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
