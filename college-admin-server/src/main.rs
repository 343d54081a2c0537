use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use college_admin_server::{run_server, ServerArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    init_tracing(args.debug)?;

    let config = args.to_config().context("invalid server arguments")?;
    run_server(config).await.context("static host failed")
}

/// Console logging; `RUST_LOG` wins over `--debug`
fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
