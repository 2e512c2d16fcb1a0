mod cli;
mod config;
mod error;
mod reconcile;
mod services;
mod storage;
mod table;
mod transform;

use anyhow::Result;
use clap::Parser;

use cli::commands::{handle_compare_command, handle_explode_command, handle_structure_command};
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env = env_logger::Env::default().default_filter_or(log_level(cli.verbose));
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Structure(args) => {
            let config = Config::load(cli.config.as_deref())?;
            handle_structure_command(args, &config).await
        }
        Commands::Compare(args) => {
            let config = Config::load(cli.config.as_deref())?;
            handle_compare_command(args, &config).await
        }
        Commands::Explode(args) => handle_explode_command(args),
    }
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
