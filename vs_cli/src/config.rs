//! CLI configuration management.
//!
//! Consolidates environment variable reads and command-line overrides into
//! one validated configuration.

use std::str::FromStr;

use vgc_swiss::PhaseConfig;

/// How snapshots and reports are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Compact,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "compact" => Ok(OutputFormat::Compact),
            other => Err(ConfigError::Invalid {
                var: "VS_OUTPUT".to_string(),
                reason: format!("expected pretty or compact, got {other}"),
            }),
        }
    }
}

/// Complete CLI configuration loaded from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Pairing seed; a fresh one is drawn per run when unset
    pub seed: Option<u64>,
    /// Games per match for new tournaments and result validation
    pub best_of: u32,
    /// Round length for new tournaments
    pub round_minutes: u32,
    pub output: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        let defaults = PhaseConfig::default();
        Self {
            seed: None,
            best_of: defaults.best_of,
            round_minutes: defaults.round_time_minutes,
            output: OutputFormat::Pretty,
        }
    }
}

impl CliConfig {
    /// Load configuration from `VS_*` environment variables.
    ///
    /// Command-line values take precedence over the environment.
    ///
    /// # Errors
    ///
    /// Returns error if `VS_SEED` or `VS_OUTPUT` is set but cannot be parsed
    pub fn from_env(
        seed_override: Option<u64>,
        best_of_override: Option<u32>,
        output_override: Option<OutputFormat>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let seed = match seed_override {
            Some(seed) => Some(seed),
            None => match std::env::var("VS_SEED") {
                Ok(raw) => Some(raw.parse().map_err(|_| ConfigError::Invalid {
                    var: "VS_SEED".to_string(),
                    reason: format!("not an unsigned integer: {raw}"),
                })?),
                Err(_) => None,
            },
        };

        let output = match output_override {
            Some(output) => output,
            None => match std::env::var("VS_OUTPUT") {
                Ok(raw) => raw.parse()?,
                Err(_) => defaults.output,
            },
        };

        Ok(Self {
            seed,
            best_of: best_of_override.unwrap_or_else(|| parse_env_or("VS_BEST_OF", defaults.best_of)),
            round_minutes: parse_env_or("VS_ROUND_MINUTES", defaults.round_minutes),
            output,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        let settings = PhaseConfig {
            best_of: self.best_of,
            round_time_minutes: self.round_minutes,
            ..PhaseConfig::default()
        };
        settings.validate().map_err(ConfigError::Settings)
    }

    /// Seed for this run: the configured one, or a fresh random one.
    pub fn pairing_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Invalid tournament settings: {0}")]
    Settings(String),
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
