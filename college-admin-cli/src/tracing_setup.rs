//! Tracing setup for the college-admin CLI
//!
//! Usage:
//!   college-admin --debug ...                      # Debug logging to stderr
//!   RUST_LOG=college_admin_core=debug college-admin  # Fine-grained log control
//!
//! Logs always go to stderr so `--json` output on stdout stays pipeable.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (unless RUST_LOG is explicitly set)
    pub debug: bool,
}

impl TracingConfig {
    fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            // Flow notices already tell the user what happened
            "warn"
        }
    }
}

/// Initialize console tracing
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
