//! storyqa CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use storyqa::{
    commands::{
        cmd_ask, cmd_chat, cmd_init, cmd_smoke, print_answer, print_smoke_report, AskOptions,
        InitOptions, SmokeOptions,
    },
    config::{load_dotenv, Config, Secrets},
    error::Result,
    progress::LogWriterFactory,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "storyqa")]
#[command(version, about = "Question answering over a hosted vector index", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question from retrieved context
    Ask {
        /// The question
        query: String,

        /// Number of fragments to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Also print the retrieved fragments
        #[arg(long)]
        sources: bool,
    },

    /// Start an interactive single-turn chat
    Chat,

    /// POST a question to an HTTP endpoint and print the response
    Smoke {
        /// Endpoint URL (defaults to smoke.url from config)
        #[arg(long)]
        url: Option<String>,

        /// Question to send (defaults to smoke.question from config)
        #[arg(short, long)]
        question: Option<String>,
    },

    /// Write a default config file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(LogWriterFactory::default()))
        .with(filter)
        .init();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "storyqa", &mut std::io::stdout());
        }

        Commands::Init { force } => {
            let path = cmd_init(InitOptions::for_path(cli.config.as_deref(), force)).await?;
            println!("✓ storyqa initialized successfully");
            println!("  Config: {}", path.display());
            println!("\nNext steps:");
            println!("  1. Put OPENAI_API_KEY and PINECONE_API_KEY in your environment or .env");
            println!("  2. Set index.name to your Pinecone index");
            println!("  3. Ask: storyqa ask \"Who won the competition?\"");
        }

        Commands::Ask {
            query,
            top_k,
            sources,
        } => {
            let (config, secrets) = load_settings(cli.config.as_deref())?;
            info!("=== Starting RAG QA Query System ===");
            let options = AskOptions {
                top_k,
                show_progress: !cli.json && std::io::stderr().is_terminal(),
            };

            let answer = cmd_ask(&config, &secrets, &query, options).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                print_answer(&answer, sources);
            }
            info!("=== Finished RAG QA Query System ===");
        }

        Commands::Chat => {
            let (config, secrets) = load_settings(cli.config.as_deref())?;
            let summary = cmd_chat(&config, &secrets).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }

        Commands::Smoke { url, question } => {
            let (config, _) = load_settings(cli.config.as_deref())?;
            let report = cmd_smoke(&config, SmokeOptions { url, question }).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_smoke_report(&report);
            }
        }
    }

    Ok(())
}

/// Load `.env`, the effective config, and provider secrets
fn load_settings(path: Option<&Path>) -> Result<(Config, Secrets)> {
    load_dotenv();
    let config = Config::resolve(path)?;
    let secrets = Secrets::from_env(&config);
    Ok((config, secrets))
}
