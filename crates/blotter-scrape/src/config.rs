//! Configuration for scrape runs

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest allowed worker pool
pub const MIN_CONCURRENCY: usize = 1;

/// Largest allowed worker pool
pub const MAX_CONCURRENCY: usize = 10;

/// Operator-facing knobs for one scrape run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Search tasks executing at once (1-10)
    pub max_concurrency: usize,

    /// Lower bound of the randomized inter-request delay (seconds)
    pub min_delay_secs: u64,

    /// Upper bound of the randomized inter-request delay (seconds)
    pub max_delay_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 3,
            min_delay_secs: 2,
            max_delay_secs: 5,
        }
    }
}

impl ScrapeConfig {
    /// Apply the corrections promised to the operator before a run
    ///
    /// Concurrency is clamped to [1, 10] and a `max_delay` at or below
    /// `min_delay` is raised to `min_delay + 1`, mirroring how the
    /// search form corrects its inputs.
    pub fn normalized(mut self) -> Self {
        self.max_concurrency = self.max_concurrency.clamp(MIN_CONCURRENCY, MAX_CONCURRENCY);
        if self.max_delay_secs <= self.min_delay_secs {
            self.max_delay_secs = self.min_delay_secs + 1;
        }
        self
    }

    /// Validate the configuration without correcting it
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency < MIN_CONCURRENCY || self.max_concurrency > MAX_CONCURRENCY {
            return Err(format!(
                "max_concurrency must be between {} and {}",
                MIN_CONCURRENCY, MAX_CONCURRENCY
            ));
        }
        if self.max_delay_secs <= self.min_delay_secs {
            return Err("max_delay_secs must be greater than min_delay_secs".to_string());
        }
        Ok(())
    }

    /// Delay bounds as durations
    pub fn delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_secs(self.min_delay_secs),
            Duration::from_secs(self.max_delay_secs),
        )
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScrapeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_concurrency, 3);
        assert_eq!(config.min_delay_secs, 2);
        assert_eq!(config.max_delay_secs, 5);
    }

    #[test]
    fn test_normalized_corrects_delay_bounds() {
        let config = ScrapeConfig {
            max_concurrency: 3,
            min_delay_secs: 5,
            max_delay_secs: 5,
        }
        .normalized();
        assert_eq!(config.max_delay_secs, 6);

        let config = ScrapeConfig {
            max_concurrency: 3,
            min_delay_secs: 5,
            max_delay_secs: 2,
        }
        .normalized();
        assert_eq!(config.max_delay_secs, 6);
    }

    #[test]
    fn test_normalized_clamps_concurrency() {
        let config = ScrapeConfig {
            max_concurrency: 0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(config.max_concurrency, 1);

        let config = ScrapeConfig {
            max_concurrency: 50,
            ..Default::default()
        }
        .normalized();
        assert_eq!(config.max_concurrency, 10);
    }

    #[test]
    fn test_validate_rejects_inverted_delays() {
        let config = ScrapeConfig {
            max_concurrency: 3,
            min_delay_secs: 5,
            max_delay_secs: 3,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ScrapeConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ScrapeConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
