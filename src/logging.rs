//! Logging setup
//!
//! Structured logging through `tracing`. Diagnostics always go to stderr so
//! that command output on stdout (composed bundles, context blocks) stays
//! machine-readable.
//!
//! The filter comes from `BUNDLEKIT_LOG` when set (any `EnvFilter` directive,
//! e.g. `bundlekit::cache=debug`), otherwise from the verbosity flag.

use std::str::FromStr;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{BundlekitError, Result};

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "BUNDLEKIT_LOG";

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = BundlekitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(BundlekitError::ConfigInvalid {
                message: format!("unknown log format '{other}' (expected text or json)"),
            }),
        }
    }
}

/// Logging options collected from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOptions {
    pub verbose: bool,
    pub format: LogFormat,
    pub color: bool,
}

/// Build the filter: `BUNDLEKIT_LOG` first, then `debug` or `warn` by verbosity
fn build_env_filter(verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    EnvFilter::new(default_level(verbose))
}

fn default_level(verbose: bool) -> &'static str {
    if verbose { "bundlekit=debug" } else { "warn" }
}

/// Install the global subscriber
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(options: LoggingOptions) -> Result<()> {
    let filter = build_env_filter(options.verbose);
    let base = Registry::default().with(filter);

    let result = match options.format {
        LogFormat::Json => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(options.color)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| BundlekitError::ConfigInvalid {
        message: format!("Failed to initialize logging: {e}"),
    })
}
