//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use libsweep::config::{ColorChoice, Config};
use libsweep::{Result, SweepError};
use std::env;
use std::path::PathBuf;

/// Environment variable naming an alternative config file
pub const ENV_CONFIG: &str = "SWEEP_CONFIG";
/// Environment variable overriding the registry URL
pub const ENV_URL: &str = "SWEEP_URL";
/// Environment variable overriding the color choice
pub const ENV_COLOR: &str = "SWEEP_COLOR";
/// Environment variable overriding the log filter
pub const ENV_LOG: &str = "SWEEP_LOG";

/// Output verbosity selected by repeated `-v` flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    Normal,
    Verbose,
    VeryVerbose,
    Trace,
}

impl VerbosityLevel {
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Normal,
            1 => VerbosityLevel::Verbose,
            2 => VerbosityLevel::VeryVerbose,
            _ => VerbosityLevel::Trace,
        }
    }

    /// Default `tracing` filter for this level
    pub fn log_filter(self) -> &'static str {
        match self {
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "info",
            VerbosityLevel::VeryVerbose => "debug",
            VerbosityLevel::Trace => "trace",
        }
    }
}

/// Values given on the command line, each overriding everything else
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub url: Option<String>,
    pub insecure: bool,
    pub color: Option<ColorChoice>,
}

/// Application context with resolved configuration and runtime state
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
    pub verbosity: VerbosityLevel,
}

impl AppContext {
    /// Build context with precedence: defaults < config file < env vars < CLI flags
    pub fn build(overrides: CliOverrides, verbosity: VerbosityLevel) -> Result<Self> {
        let explicit_path = overrides
            .config_path
            .clone()
            .or_else(|| env::var_os(ENV_CONFIG).map(PathBuf::from));

        // 1 + 2. Defaults, then the config file
        let mut config = match explicit_path {
            Some(path) => Config::load(Some(path.as_path()))?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Config::load(Some(path.as_path()))?,
                None => Config::default(),
            },
        };

        // 3. Environment
        apply_env(&mut config, |key| env::var(key).ok())?;

        // 4. Flags
        if let Some(url) = overrides.url {
            config.registry.url = url;
        }
        if overrides.insecure {
            config.registry.insecure = true;
        }
        if let Some(color) = overrides.color {
            config.output.color = color;
        }

        Ok(Self { config, verbosity })
    }

    /// Context over an already resolved configuration
    #[cfg(test)]
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            verbosity: VerbosityLevel::Normal,
        }
    }
}

/// `$XDG_CONFIG_HOME/sweep/config.yaml` or the platform equivalent
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sweep").join("config.yaml"))
}

fn apply_env<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_URL).filter(|u| !u.trim().is_empty()) {
        config.registry.url = url;
    }
    if let Some(color) = lookup(ENV_COLOR) {
        config.output.color = color.parse().map_err(|e: SweepError| {
            SweepError::config(format!("Invalid {}: {}", ENV_COLOR, e), None)
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
