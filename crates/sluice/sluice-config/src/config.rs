use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Settings for the process that drives a circuit.
///
/// Every field is optional in the file; an empty file yields
/// [`DriverConfig::default`].
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
    /// Pause between two ticks, in microseconds. `0` ticks back-to-back.
    #[serde(default = "defaults::tick_interval_us")]
    pub tick_interval_us: u64,
    /// Stop after this many ticks. Absent means run until stopped.
    #[serde(default)]
    pub max_ticks: Option<u64>,
    /// How long a draining reader waits for new elements before checking
    /// whether it should give up.
    #[serde(default = "defaults::drain_timeout_ms")]
    pub drain_timeout_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}

mod defaults {
    pub fn log_level() -> String {
        "info".into()
    }

    pub fn tick_interval_us() -> u64 {
        0
    }

    pub fn drain_timeout_ms() -> u64 {
        100
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level(),
            tick_interval_us: defaults::tick_interval_us(),
            max_ticks: None,
            drain_timeout_ms: defaults::drain_timeout_ms(),
        }
    }
}

impl DriverConfig {
    pub fn load(path: impl AsRef<Path> + ToString) -> Result<Self, ConfigError> {
        let toml_to_str = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&toml_to_str)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let driver_config: DriverConfig = toml::from_str(text)?;
        Ok(driver_config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros(self.tick_interval_us)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_the_default() {
        assert_eq!(DriverConfig::from_toml_str("").unwrap(), DriverConfig::default());
    }

    #[test]
    fn durations_follow_their_units() {
        let config = DriverConfig {
            tick_interval_us: 250,
            drain_timeout_ms: 3,
            ..DriverConfig::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_micros(250));
        assert_eq!(config.drain_timeout(), Duration::from_millis(3));
    }
}
