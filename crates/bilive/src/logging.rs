//! Subscriber setup for binaries built on bilive.
//!
//! The library crates only emit `tracing` events; installing a subscriber
//! is left to the application:
//!
//! ```rust,no_run
//! use bilive::logging::{init_tracing, LogConfig, LogFormat};
//!
//! init_tracing(LogConfig::default().with_format(LogFormat::Json))
//!     .expect("failed to initialize tracing");
//! ```

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// Multi-line human-readable output.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Subscriber configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for the bilive crates when `RUST_LOG` is not set.
    pub default_level: Level,
    pub format: LogFormat,
    /// Include the module path of each event.
    pub include_target: bool,
    /// Explicit filter directive; overrides `RUST_LOG` and `default_level`.
    pub env_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            format: LogFormat::Compact,
            include_target: true,
            env_filter: None,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// The filter this config installs.
    ///
    /// # Errors
    /// [`LoggingError::EnvFilter`] if `env_filter` is not a valid directive.
    pub fn filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Some(directive) = &self.env_filter {
            return Ok(EnvFilter::try_new(directive)?);
        }
        Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(self.default_level))))
    }
}

/// `bilive*` crates at `level`, everything else at warn.
fn default_directive(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut directive = String::from("warn");
    for krate in [
        "bilive",
        "bilive_transport",
        "bilive_protocol",
        "bilive_session",
        "bilive_tick",
    ] {
        directive.push(',');
        directive.push_str(krate);
        directive.push('=');
        directive.push_str(&level);
    }
    directive
}

/// Installs the global subscriber described by `config`.
///
/// Call once at startup. `RUST_LOG` overrides the default level.
///
/// # Errors
/// - [`LoggingError::SetGlobalSubscriber`] if a subscriber is already set.
/// - [`LoggingError::EnvFilter`] if the directive is invalid.
pub fn init_tracing(config: LogConfig) -> Result<(), LoggingError> {
    let filter = config.filter()?;
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.include_target);

    match config.format {
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.compact());
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.pretty());
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.json());
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_workspace_crates() {
        let directive = default_directive(Level::DEBUG);
        assert!(directive.starts_with("warn,"));
        assert!(directive.contains("bilive_session=debug"));
        assert!(directive.contains("bilive_protocol=debug"));
    }

    #[test]
    fn test_explicit_filter_is_parsed() {
        let config = LogConfig::default().with_env_filter("bilive=trace");
        assert!(config.filter().is_ok());

        let bad = LogConfig::default().with_env_filter("bilive=loud");
        assert!(matches!(bad.filter(), Err(LoggingError::EnvFilter(_))));
    }
}
