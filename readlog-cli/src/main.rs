//! Readlog CLI - fill in and check reading-log entries from the terminal

mod archive;
mod commands;
mod input;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the data directory
const DATA_DIR_ENV: &str = "READLOG_DATA_DIR";

#[derive(Parser)]
#[command(name = "readlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the saved draft and submitted entries
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the form steps and their fields
    Steps,

    /// Validate a draft JSON file
    Validate {
        /// Draft file path
        input: String,

        /// Only check the fields of this step (1-based)
        #[arg(short, long)]
        step: Option<usize>,

        /// Output issues as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the app preview for a draft JSON file
    Preview {
        /// Draft file path
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fill in a book entry step by step
    Fill {
        /// Starting query string, e.g. "?step=2"
        #[arg(long)]
        url: Option<String>,
    },

    /// Print the saved in-progress draft
    Draft,

    /// Discard the saved in-progress draft
    Reset,
}

/// `--data-dir`, then `READLOG_DATA_DIR`, then `./readlog_data`
fn data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("./readlog_data"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "readlog_cli=debug,readlog_core=debug"
    } else {
        "readlog_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = data_dir(cli.data_dir);
    tracing::debug!("Using data directory {}", data_dir.display());

    match cli.command {
        Commands::Steps => commands::steps(),

        Commands::Validate { input, step, json } => commands::validate(&input, step, json),

        Commands::Preview { input, json } => commands::preview(&input, json),

        Commands::Fill { url } => commands::fill(&data_dir, url.as_deref()).await,

        Commands::Draft => commands::draft(&data_dir).await,

        Commands::Reset => commands::reset(&data_dir).await,
    }
}
