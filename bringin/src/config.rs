//! Configuration management for the BringIn client core.
//!
//! Loads configuration from environment variables (and an optional `.env`
//! file) with defaults matching the shipped client.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "bringin=debug,bringin_runtime=info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Tracing filter directive (`BRINGIN_LOG`)
    pub log_filter: String,
    /// How long the simulated owner QR scan takes (`BRINGIN_SCAN_DELAY_MS`)
    pub scan_delay: Duration,
    /// Pause on the scan success screen (`BRINGIN_SCAN_CONFIRM_MS`)
    pub scan_confirm: Duration,
    /// Lifetime of the "copied" badge (`BRINGIN_COPY_FEEDBACK_MS`)
    pub copy_feedback: Duration,
    /// Party size that triggers the call-ahead advisory (`BRINGIN_LARGE_PARTY`)
    pub large_party: u32,
    /// Seat session length in minutes shown to guests (`BRINGIN_SESSION_MINUTES`)
    pub session_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            scan_delay: Duration::from_millis(2000),
            scan_confirm: Duration::from_millis(1500),
            copy_feedback: Duration::from_millis(1200),
            large_party: 5,
            session_minutes: 120,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            log_filter: lookup("BRINGIN_LOG")
                .filter(|filter| !filter.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            scan_delay: millis(&lookup, "BRINGIN_SCAN_DELAY_MS")?.unwrap_or(defaults.scan_delay),
            scan_confirm: millis(&lookup, "BRINGIN_SCAN_CONFIRM_MS")?
                .unwrap_or(defaults.scan_confirm),
            copy_feedback: millis(&lookup, "BRINGIN_COPY_FEEDBACK_MS")?
                .unwrap_or(defaults.copy_feedback),
            large_party: positive(&lookup, "BRINGIN_LARGE_PARTY")?.unwrap_or(defaults.large_party),
            session_minutes: positive(&lookup, "BRINGIN_SESSION_MINUTES")?
                .unwrap_or(defaults.session_minutes),
        })
    }
}

fn millis<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|error| ConfigError {
            var,
            value: raw.clone(),
            reason: error.to_string(),
        })
}

fn positive<F>(lookup: &F, var: &'static str) -> Result<Option<u32>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(ConfigError {
            var,
            value: raw,
            reason: "must be at least 1".to_string(),
        }),
        Ok(value) => Ok(Some(value)),
        Err(error) => Err(ConfigError {
            var,
            value: raw.clone(),
            reason: error.to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn missing_values_take_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.scan_delay, Duration::from_secs(2));
        assert_eq!(config.large_party, 5);
    }

    #[test]
    fn values_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("BRINGIN_SCAN_DELAY_MS", "10"),
            ("BRINGIN_COPY_FEEDBACK_MS", " 5 "),
            ("BRINGIN_LARGE_PARTY", "7"),
            ("BRINGIN_SESSION_MINUTES", "90"),
            ("BRINGIN_LOG", "bringin=trace"),
        ]))
        .unwrap();

        assert_eq!(config.session_minutes, 90);
        assert_eq!(config.scan_delay, Duration::from_millis(10));
        assert_eq!(config.copy_feedback, Duration::from_millis(5));
        assert_eq!(config.large_party, 7);
        assert_eq!(config.log_filter, "bringin=trace");
        assert_eq!(config.scan_confirm, Duration::from_millis(1500));
    }

    #[test]
    fn malformed_values_are_errors() {
        let error = Config::from_lookup(lookup(&[("BRINGIN_SCAN_DELAY_MS", "soon")])).unwrap_err();
        assert_eq!(error.var, "BRINGIN_SCAN_DELAY_MS");
        assert_eq!(error.value, "soon");

        let error = Config::from_lookup(lookup(&[("BRINGIN_LARGE_PARTY", "0")])).unwrap_err();
        assert_eq!(error.reason, "must be at least 1");
    }
}
