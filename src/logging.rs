//! Logging setup through the `tracing` crate.
//!
//! The builder and the client emit `tracing` events; nothing is printed unless
//! a subscriber is installed, either by the application or with [`init_logging`].

use tracing::Level;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "MULTIMODAL_LOG";

/// Log levels, mapping onto the tracing level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Normal operational messages, including the verbose builder output
    Info,
    /// Request and connection lifecycle
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }

    fn filter(self) -> String {
        format!("gemini_multimodal={}", self.to_tracing_level())
    }
}

fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level.filter()))
}

/// Installs a global subscriber logging this crate at `level`.
///
/// `MULTIMODAL_LOG` takes precedence when set:
///
/// ```bash
/// MULTIMODAL_LOG=gemini_multimodal=debug cargo run --example simple
/// ```
///
/// # Errors
///
/// Fails if another global subscriber is already installed.
pub fn try_init_logging(level: LogLevel) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter(level))
        .try_init()?;

    tracing::debug!(?level, "logging initialized");
    Ok(())
}

/// Like [`try_init_logging`], but keeps an already installed subscriber.
pub fn init_logging(level: LogLevel) {
    if let Err(e) = try_init_logging(level) {
        tracing::debug!("keeping the existing subscriber: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_targets_this_crate() {
        assert_eq!(LogLevel::Info.filter(), "gemini_multimodal=INFO");
        assert_eq!(LogLevel::Trace.filter(), "gemini_multimodal=TRACE");
    }

    #[test]
    fn second_initialization_is_refused() {
        let _ = try_init_logging(LogLevel::Warn);
        assert!(try_init_logging(LogLevel::Debug).is_err());
        init_logging(LogLevel::Info);
    }
}
