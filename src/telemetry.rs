//! Structured logging setup.

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter::ParseError, fmt, layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback filter directive is malformed.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    /// A global subscriber is already installed.
    #[error("failed to install subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Builder for the process-wide `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
#[derive(Debug, Clone)]
pub struct TelemetryBuilder {
    log_level: String,
    json: bool,
}

impl Default for TelemetryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryBuilder {
    /// Creates a builder logging at `info` in human-readable form.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: "info".to_owned(),
            json: false,
        }
    }

    /// Sets the filter used when `RUST_LOG` is unset.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Emits one JSON object per event.
    #[must_use]
    pub const fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Installs the subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] when the level directive is malformed or a
    /// subscriber is already installed.
    pub fn try_init(self) -> Result<(), TelemetryError> {
        let env_filter =
            EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&self.log_level))?;
        let fmt_layer = if self.json {
            fmt::layer().json().boxed()
        } else {
            fmt::layer().boxed()
        };
        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
        Ok(())
    }
}
