//! Diagnostic logging for the CLI.
//!
//! Library events go through `tracing` to stderr. The filter comes from
//! `SWEEP_LOG` when set, otherwise from the `-v` count.

use crate::context::{ENV_LOG, VerbosityLevel};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter for `verbosity`, unless `SWEEP_LOG` overrides it
pub fn filter_for(verbosity: VerbosityLevel) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()))
}

/// Install the global subscriber. Output: stderr, compact format.
pub fn init(verbosity: VerbosityLevel) {
    tracing_subscriber::registry()
        .with(filter_for(verbosity))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_follows_verbosity() {
        if std::env::var_os(ENV_LOG).is_none() {
            assert_eq!(filter_for(VerbosityLevel::Normal).to_string(), "warn");
            assert_eq!(filter_for(VerbosityLevel::VeryVerbose).to_string(), "debug");
        }
    }
}
