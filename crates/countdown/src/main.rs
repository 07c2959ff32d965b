// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Countdown - a Telegram bot that counts down to shared events.

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use countdown_config::CountdownConfig;

/// Countdown - a Telegram bot that counts down to shared events.
#[derive(Parser, Debug)]
#[command(name = "countdown", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot and poll Telegram for updates.
    Serve,
    /// Open the database and report adapter health without polling.
    Check,
    /// Print the effective configuration with secrets masked.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            countdown_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Check) => serve::run_check(config).await,
        Some(Commands::Config) => match countdown_config::to_redacted_toml(&config) {
            Ok(rendered) => {
                print!("{rendered}");
                Ok(())
            }
            Err(err) => {
                countdown_config::render_errors(&[err]);
                std::process::exit(1);
            }
        },
        None => {
            println!("countdown: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load(
    path: Option<&std::path::Path>,
) -> Result<CountdownConfig, Vec<countdown_config::ConfigError>> {
    match path {
        Some(path) => countdown_config::load_and_validate_path(path),
        None => countdown_config::load_and_validate(),
    }
}
