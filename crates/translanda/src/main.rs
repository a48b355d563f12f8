// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TransLanda - travel agency assistant bot.
//!
//! This is the binary entry point for the TransLanda bot.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shell;

use clap::{Parser, Subcommand};

/// TransLanda - travel agency assistant bot.
#[derive(Parser, Debug)]
#[command(name = "translanda", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the Telegram bot and the liveness listener (default).
    Serve,
    /// Chat with the bot locally, without Telegram.
    Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // A missing .env is normal outside development.
    let _ = dotenvy::dotenv();

    let config = match translanda_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            translanda_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    serve::init_tracing(&config.agent.log_level);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Shell => shell::run_shell(config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
