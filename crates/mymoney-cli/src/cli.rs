//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// My Money - Personal finance tracker with AI categorization
#[derive(Parser)]
#[command(name = "mymoney")]
#[command(about = "Track income and expenses with AI category suggestions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory for the local mirror and config overrides
    ///
    /// Defaults to MYMONEY_DATA_DIR, then the platform data directory.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Backend URL (overrides config and MYMONEY_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a transaction (asks the AI for a category)
    Add(TransactionArgs),

    /// Edit a mirrored transaction; omitted fields keep their value
    Edit {
        /// Transaction ID
        id: i64,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },

    /// List mirrored transactions
    List {
        /// Maximum number to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show balance summary from the local mirror
    Balance {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the local mirror with the backend's transaction list
    Sync,

    /// Ask the AI to categorize a description
    Suggest {
        /// Transaction description
        description: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Teach the AI the correct category for a description
    Learn {
        /// Transaction description
        description: String,

        /// Correct category
        category: String,
    },

    /// Show AI spending insights
    Insights {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session driving the form line by line
    Shell,

    /// Show the resolved configuration
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct TransactionArgs {
    /// Amount in rupees
    #[arg(short, long)]
    pub amount: String,

    /// Description (used for the AI suggestion)
    #[arg(short, long)]
    pub description: String,

    /// Category; when omitted the AI suggestion is used
    #[arg(short, long)]
    pub category: Option<String>,

    /// Transaction type: income or expense
    #[arg(short = 't', long = "type", default_value = "expense")]
    pub kind: String,

    /// Date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    #[arg(short, long)]
    pub amount: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub category: Option<String>,

    /// Transaction type: income or expense
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,

    /// Date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}
