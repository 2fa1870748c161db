// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mediagate - releases stored media to members of required channels.
//!
//! This is the binary entry point.

mod inspect;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mediagate_config::MediagateConfig;

/// Mediagate - a channel-membership gate for stored media.
#[derive(Parser, Debug)]
#[command(name = "mediagate", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot (default).
    Serve,
    /// Validate configuration and print a summary.
    CheckConfig,
    /// Inspect the media catalog.
    Catalog {
        #[command(subcommand)]
        action: CatalogCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommands {
    /// List every stored code with its kind.
    List,
}

fn load_config(path: Option<&PathBuf>) -> MediagateConfig {
    let loaded = match path {
        Some(path) => mediagate_config::load_and_validate_path(path),
        None => mediagate_config::load_and_validate(),
    };

    match loaded {
        Ok(config) => config,
        Err(errors) => {
            mediagate_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::CheckConfig => {
            print!("{}", inspect::config_summary(&config));
            Ok(())
        }
        Commands::Catalog {
            action: CatalogCommands::List,
        } => inspect::list_catalog(&config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
