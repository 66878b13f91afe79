//! Jimeng Console - Main Entry Point
//!
//! Command line front end for the generation API: parses arguments,
//! opens the key-value store and dispatches to the command handlers.

mod cli;
mod commands;

use std::sync::Arc;

use clap::Parser;
use jimeng_infrastructure::FileKeyValueStore;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let store = match cli.store {
        Some(path) => FileKeyValueStore::new(path),
        None => FileKeyValueStore::open_default()?,
    };
    tracing::debug!(path = %store.path().display(), "using store");
    let store = Arc::new(store);

    match cli.command {
        Command::Config(command) => commands::config(store, command),
        Command::Generate(command) => commands::generate(store, command).await,
        Command::Tools { tool } => commands::tools(store, tool).await,
        Command::History(command) => commands::history(store, command),
    }
}
