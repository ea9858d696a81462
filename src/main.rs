use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scam_triage::Result;
use scam_triage::commands::{ingest, init_config, search, show_config, triage};
use scam_triage::config::{Config, get_config_dir};
use scam_triage::triage::DEFAULT_TOP_K;

#[derive(Parser)]
#[command(name = "scam-triage")]
#[command(about = "Telecom fraud triage with a retrieval-augmented answer pipeline")]
#[command(version)]
struct Cli {
    /// Override the configuration directory
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the knowledge base index from the configured directory
    Ingest,
    /// Search the knowledge base
    Search {
        /// Search query
        query: String,
        /// Number of snippets to retrieve
        #[arg(short, long, default_value_t = DEFAULT_TOP_K)]
        k: usize,
    },
    /// Triage a fraud complaint or call transcript
    Triage {
        /// Complaint or transcript text
        text: String,
        /// Number of knowledge snippets to retrieve
        #[arg(short, long, default_value_t = DEFAULT_TOP_K)]
        k: usize,
        /// Optional risk probability from the call classifier
        #[arg(long)]
        risk_score: Option<f64>,
    },
    /// Show or initialize the configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => get_config_dir().map_err(|e| scam_triage::TriageError::Config(e.to_string()))?,
    };
    let config = Config::load(&config_dir)?;

    match cli.command {
        Commands::Ingest => {
            ingest(&config).await?;
        }
        Commands::Search { query, k } => {
            search(&config, &query, k).await?;
        }
        Commands::Triage {
            text,
            k,
            risk_score,
        } => {
            triage(&config, &text, k, risk_score).await?;
        }
        Commands::Config { show } => {
            if show {
                show_config(&config)?;
            } else {
                init_config(&config)?;
            }
        }
    }

    Ok(())
}
