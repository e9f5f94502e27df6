//! My Money CLI - Personal finance tracker
//!
//! Usage:
//!   mymoney add -a 250 -d "team lunch"    Add a transaction with an AI-suggested category
//!   mymoney suggest "uber to office"      Ask the AI for a category
//!   mymoney balance                       Show totals from the local mirror
//!   mymoney shell                         Interactive session

mod cli;
mod commands;
mod terminal;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use mymoney_core::HttpApi;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.data_dir.as_deref(), cli.api_url.as_deref())?;
    let api = HttpApi::from_config(&config);

    match cli.command {
        Commands::Add(args) => commands::cmd_add(api, config, &args).await,
        Commands::Edit { id, fields } => commands::cmd_edit(api, config, id, &fields).await,
        Commands::Delete { id } => commands::cmd_delete(api, config, id).await,
        Commands::List { limit } => commands::cmd_list(&config, limit),
        Commands::Balance { json } => commands::cmd_balance(&config, json),
        Commands::Sync => commands::cmd_sync(api, config).await,
        Commands::Suggest { description, json } => {
            commands::cmd_suggest(&api, &config, &description, json).await
        }
        Commands::Learn {
            description,
            category,
        } => commands::cmd_learn(&api, &config, &description, &category).await,
        Commands::Insights { json } => commands::cmd_insights(&api, &config, json).await,
        Commands::Shell => commands::cmd_shell(api, config).await,
        Commands::Config => commands::cmd_config(&config),
    }
}
