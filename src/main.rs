//! catalognav - browse a remote video catalog from the terminal
//!
//! # Usage
//!
//! ```bash
//! catalognav root
//! catalognav browse movies --page 2
//! catalognav search "kitab" --json
//! catalognav open "plugin://plugin.video.videoaz/?action=list_videos&cat=videos"
//! ```

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, ExitCode, Output};

#[tokio::main]
async fn main() {
    // Logs go to stderr so JSON on stdout stays parseable. Override via RUST_LOG.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let exit_code = run_cli(cli).await;
    std::process::exit(exit_code.into());
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let nav = commands::build_navigator(cli.config.as_deref());

    match cli.command {
        Command::Open(cmd) => commands::open_cmd(cmd, &nav, &output).await,

        Command::Root => commands::root_cmd(&nav, &output).await,

        Command::Browse(cmd) => commands::browse_cmd(cmd, &nav, &output).await,

        Command::Search(cmd) => commands::search_cmd(cmd, &nav, &output).await,

        Command::History => commands::history_cmd(&nav, &output).await,
    }
}
