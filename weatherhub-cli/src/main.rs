//! Binary crate for the `weatherhub` command-line tool.
//!
//! This crate is the view collaborator of the core: it subscribes console
//! printers to the coordinator's signals, issues refresh requests back to
//! it, and handles interactive configuration.

use clap::Parser;
use tokio::task::LocalSet;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cmd = cli::Cli::parse();
    // The core spawns its auto-update tick task locally.
    LocalSet::new().run_until(cmd.run()).await
}
