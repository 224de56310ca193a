//! Loss configuration via TOML files.
//!
//! Lets a surrounding training loop pick the loss variant and diagnostics
//! logging behavior from a `[loss]` section, with sensible defaults for any
//! missing key. The loss computation itself never reads configuration.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which loss reduction the training loop should use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossVariant {
    Mse,
    Covariance,
}

impl FromStr for LossVariant {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "mse" => Ok(LossVariant::Mse),
            "covariance" => Ok(LossVariant::Covariance),
            other => Err(ConfigError::Parse(format!(
                "unknown loss variant '{}', expected 'mse' or 'covariance'",
                other
            ))),
        }
    }
}

/// Loss settings loaded from a TOML file.
///
/// # Examples
///
/// ```
/// use scattering_loss::LossConfig;
///
/// let config = LossConfig::load_from_file("config/loss.toml")
///     .unwrap_or_else(|_| LossConfig::default());
/// println!("Variant: {:?}", config.variant);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LossConfig {
    /// Loss reduction to use
    pub variant: LossVariant,
    /// Whether to append diagnostics to the JSONL log after each step
    pub log_diagnostics: bool,
    /// Directory the JSONL log is written under
    pub log_dir: String,
}

impl Default for LossConfig {
    fn default() -> Self {
        Self {
            variant: LossVariant::Mse,
            log_diagnostics: false,
            log_dir: "logs".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    loss: RawLossSection,
}

#[derive(Debug, Default, Deserialize)]
struct RawLossSection {
    variant: Option<String>,
    log_diagnostics: Option<bool>,
    log_dir: Option<String>,
}

impl LossConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let defaults = Self::default();

        let variant = match raw.loss.variant {
            Some(value) => value.parse()?,
            None => defaults.variant,
        };

        Ok(Self {
            variant,
            log_diagnostics: raw.loss.log_diagnostics.unwrap_or(defaults.log_diagnostics),
            log_dir: raw.loss.log_dir.unwrap_or(defaults.log_dir),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_section_missing() {
        let config = LossConfig::from_str("").unwrap();
        assert_eq!(config, LossConfig::default());
    }

    #[test]
    fn parses_loss_section() {
        let toml = "[loss]\nvariant = \"covariance\"\nlog_diagnostics = true\nlog_dir = \"out\"";
        let config = LossConfig::from_str(toml).unwrap();
        assert_eq!(config.variant, LossVariant::Covariance);
        assert!(config.log_diagnostics);
        assert_eq!(config.log_dir, "out");
    }

    #[test]
    fn rejects_unknown_variant() {
        let toml = "[loss]\nvariant = \"huber\"";
        assert!(LossConfig::from_str(toml).is_err());
    }
}
