//! Application configuration.
//!
//! Settings are layered: serde defaults first, then an optional YAML file.
//! Environment and command-line overrides are applied by the caller.

use crate::client::ClientConfig;
use crate::error::{Result, SweepError};
use config::{Config as ConfigRs, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[cfg(test)]
mod tests;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: Registry,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub throttle: Throttle,
    #[serde(default)]
    pub output: Output,
}

impl Config {
    /// Parses a `Config` from a YAML string, filling gaps with defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = ConfigRs::builder()
            .add_source(ConfigRs::try_from(&Config::default())?)
            .add_source(File::from_str(s, FileFormat::Yaml));

        Self::from_builder(builder, None)
    }

    /// Loads a `Config` from an optional file path.
    ///
    /// With no path the defaults are returned. A path that does not exist is
    /// an error, since the caller asked for that file explicitly.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigRs::builder().add_source(ConfigRs::try_from(&Config::default())?);

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).format(FileFormat::Yaml).required(true));
        }

        Self::from_builder(builder, path)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: Option<&Path>,
    ) -> Result<Self> {
        let config: Config = builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                SweepError::config_with_source(
                    "Failed to deserialize configuration".to_string(),
                    path.map(|p| p.display().to_string()),
                    e,
                )
            })?;

        if config.throttle.interval_ms == 0 {
            return Err(SweepError::config(
                "throttle.interval_ms must be greater than zero".to_string(),
                path.map(|p| p.display().to_string()),
            ));
        }

        Ok(config)
    }

    /// HTTP client settings derived from this configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(self.network.timeout)
            .with_insecure(self.registry.insecure)
    }
}

/// Target registry settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registry {
    #[serde(default = "default_registry_url")]
    pub url: String,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            insecure: false,
        }
    }
}

fn default_registry_url() -> String {
    "http://localhost:5000".to_string()
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Per-request timeout in seconds
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
        }
    }
}

fn default_network_timeout() -> u64 {
    5
}

/// Request admission pacing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Throttle {
    /// Minimum spacing between two admitted registry requests
    #[serde(default = "default_throttle_interval_ms")]
    pub interval_ms: u64,
}

impl Throttle {
    /// The admission interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self {
            interval_ms: default_throttle_interval_ms(),
        }
    }
}

fn default_throttle_interval_ms() -> u64 {
    100 // 10 requests per second
}

/// Output formatting settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Output {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub color: ColorChoice,
}

/// Enum for output formats.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,

    Json,

    Yaml,
}

/// Enum for color output choices.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,

    Always,

    Never,
}

impl FromStr for OutputFormat {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(SweepError::validation(format!(
                "Unknown output format '{}' (expected pretty, json or yaml)",
                other
            ))),
        }
    }
}

impl FromStr for ColorChoice {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(SweepError::validation(format!(
                "Unknown color choice '{}' (expected auto, always or never)",
                other
            ))),
        }
    }
}
