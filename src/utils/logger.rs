//! Diagnostic logging for a fan-out run
//!
//! Stdout is reserved for the one-line-per-command report, so every
//! diagnostic goes to stderr. The level comes from `log_level` in the config
//! file or `ARTISAN_FANOUT_LOG`; unknown or missing values fall back to warn,
//! which keeps a normal run silent on stderr.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log level configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    /// Per-command spawn, exit status and captured output
    Debug,
    /// Run start and completion summary
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Install the stderr subscriber, filtered to this crate at `level`
pub fn init_logger(level: LogLevel) {
    let filter = EnvFilter::new(format!("artisan_fanout={}", level.to_tracing_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
