//! Configuration management module
//!
//! Handles loading, saving, and validation of run configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Result, StressError, APP_NAME, CONFIG_FILE};

pub mod persistence;

const MAX_CONCURRENCY: usize = 10_000;
const MAX_STARTUP_JITTER: Duration = Duration::from_secs(60);

/// Run configuration containing all load parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Total number of job invocations
    pub count: usize,
    /// Number of concurrent workers
    pub concurrency: usize,
    /// Caller metric names, in the order jobs report values
    pub metric_names: Vec<String>,
    /// Upper bound of the startup delay drawn once per run
    #[serde(with = "millis_serde")]
    pub startup_jitter_max: Duration,
    /// Seed for the startup delay; entropy when absent
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            concurrency: 10,
            metric_names: Vec::new(),
            startup_jitter_max: Duration::from_millis(500),
            seed: None,
        }
    }
}

impl RunConfig {
    /// Create a new run configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(StressError::ConfigError(
                "Count must be greater than 0".to_string(),
            ));
        }

        if self.concurrency == 0 {
            return Err(StressError::ConfigError(
                "Concurrency must be greater than 0".to_string(),
            ));
        }

        if self.concurrency > MAX_CONCURRENCY {
            return Err(StressError::ConfigError(format!(
                "Concurrency too high: {} (max: {})",
                self.concurrency, MAX_CONCURRENCY
            )));
        }

        if self.startup_jitter_max > MAX_STARTUP_JITTER {
            return Err(StressError::ConfigError(format!(
                "Startup jitter too long: {}ms (max: {}ms)",
                self.startup_jitter_max.as_millis(),
                MAX_STARTUP_JITTER.as_millis()
            )));
        }

        for (i, name) in self.metric_names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(StressError::ConfigError(format!(
                    "Metric name at position {} is empty",
                    i
                )));
            }
            if self.metric_names[..i].contains(name) {
                return Err(StressError::ConfigError(format!(
                    "Duplicate metric name: {}",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Set the number of job invocations
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the number of workers
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the caller metric names
    pub fn with_metric_names<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.metric_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the startup delay upper bound
    pub fn with_startup_jitter(mut self, max: Duration) -> Self {
        self.startup_jitter_max = max;
        self
    }

    /// Set the startup delay seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load configuration from the standard config file location
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            StressError::ConfigError(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            StressError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the standard config file location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StressError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| {
            StressError::ConfigError(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/stressmeter/stressmeter.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            StressError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

mod millis_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
