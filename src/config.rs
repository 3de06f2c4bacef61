//! Engine configuration layered from defaults and environment variables.
//!
//! Variables use the `TASKLANE` prefix and `__` as separator, for example
//! `TASKLANE__BULK_CONCURRENCY=4` or `TASKLANE__CYCLE_DETECTION=direct`.

use config::{Config, Environment};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BULK_CONCURRENCY: u16 = 8;
const DEFAULT_SUBSTRATE_DEADLINE_MS: u64 = 10_000;
const DEFAULT_NOTIFICATION_BUFFER: u16 = 256;

/// How far the dependency graph looks when rejecting cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleDetection {
    /// Reject only self-blocks and reverse edges (two-node cycles).
    Direct,
    /// Reject any edge whose task is already reachable from its blocker.
    #[default]
    Transitive,
}

/// Runtime settings for the task engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of bulk items processed concurrently.
    pub bulk_concurrency: usize,
    /// Deadline applied to each persistence call, in milliseconds.
    pub substrate_deadline_ms: u64,
    /// Capacity of the notification queue.
    pub notification_buffer: usize,
    /// Cycle rejection policy for blocker edges.
    #[serde(default)]
    pub cycle_detection: CycleDetection,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bulk_concurrency: usize::from(DEFAULT_BULK_CONCURRENCY),
            substrate_deadline_ms: DEFAULT_SUBSTRATE_DEADLINE_MS,
            notification_buffer: usize::from(DEFAULT_NOTIFICATION_BUFFER),
            cycle_detection: CycleDetection::default(),
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum EngineConfigError {
    /// A source could not be read or deserialised.
    #[error("failed to load engine configuration: {0}")]
    Load(#[from] config::ConfigError),
    /// A value is out of range.
    #[error("invalid engine configuration: {field} {reason}")]
    Invalid {
        /// Offending setting.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl EngineConfig {
    /// Loads settings from `TASKLANE__*` process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`EngineConfigError`] when a variable cannot be parsed or a
    /// value fails validation.
    pub fn from_env() -> Result<Self, EngineConfigError> {
        Self::load(Environment::with_prefix("TASKLANE").separator("__"))
    }

    /// Loads settings from an explicit environment source.
    ///
    /// # Errors
    ///
    /// Returns [`EngineConfigError`] when a variable cannot be parsed or a
    /// value fails validation.
    pub fn load(environment: Environment) -> Result<Self, EngineConfigError> {
        let settings: Self = Config::builder()
            .set_default("bulk_concurrency", DEFAULT_BULK_CONCURRENCY)?
            .set_default("substrate_deadline_ms", DEFAULT_SUBSTRATE_DEADLINE_MS)?
            .set_default("notification_buffer", DEFAULT_NOTIFICATION_BUFFER)?
            .set_default("cycle_detection", "transitive")?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every limit is usable.
    ///
    /// # Errors
    ///
    /// Returns [`EngineConfigError::Invalid`] for zero concurrency, a zero
    /// deadline, or an empty notification buffer.
    pub const fn validate(&self) -> Result<(), EngineConfigError> {
        if self.bulk_concurrency == 0 {
            return Err(EngineConfigError::Invalid {
                field: "bulk_concurrency",
                reason: "must be at least 1",
            });
        }
        if self.substrate_deadline_ms == 0 {
            return Err(EngineConfigError::Invalid {
                field: "substrate_deadline_ms",
                reason: "must be at least 1",
            });
        }
        if self.notification_buffer == 0 {
            return Err(EngineConfigError::Invalid {
                field: "notification_buffer",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Returns the per-call persistence deadline.
    #[must_use]
    pub const fn substrate_deadline(&self) -> Duration {
        Duration::from_millis(self.substrate_deadline_ms)
    }
}
