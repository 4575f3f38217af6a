//! `songlink` - insert a link to the song playing on Spotify
//!
//! Stands in for the editor command and settings panel: `connect` and
//! `disconnect` manage the account, `link` prints the Markdown link.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod commands;
mod context;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use context::AppContext;
use songlink_infra::{config, init_tracing};

#[derive(Parser)]
#[command(name = "songlink")]
#[command(about = "Insert a link to the song playing on Spotify")]
#[command(version)]
struct Cli {
    /// Config file (TOML or JSON); probed from the working directory if omitted
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect a Spotify account
    Connect,
    /// Print a Markdown link to the song playing now
    Link,
    /// Show the connected Spotify profile
    Profile,
    /// Show whether an account is connected
    Status,
    /// Forget the stored Spotify token
    Disconnect,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", commands::user_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = config::load(cli.config).context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Could not load .env file"),
    }

    let ctx = AppContext::new(config)?;
    let mut stdout = io::stdout().lock();

    commands::notify_once(&ctx, &mut io::stderr()).await?;

    match cli.command {
        Commands::Connect => commands::connect(&ctx, &mut io::stdin().lock(), &mut stdout).await,
        Commands::Link => commands::link(&ctx, &mut stdout).await,
        Commands::Profile => commands::profile(&ctx, &mut stdout).await,
        Commands::Status => commands::status(&ctx, &mut stdout).await,
        Commands::Disconnect => commands::disconnect(&ctx, &mut stdout).await,
    }
}
