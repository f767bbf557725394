mod commands;
mod config;
mod console;

use clap::{Parser, Subcommand};
use config::CliConfig;
use fairdice_core::config::{NEGATIVE_FACES_EXAMPLE, USAGE_EXAMPLE};
use fairdice_core::DiceError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fairdice")]
#[command(about = "Provably fair non-transitive dice game")]
#[command(version)]
struct Cli {
    /// Data directory for saved transcripts
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game against the house
    Play {
        /// Dice as comma-separated faces, e.g. 2,2,4,4,9,9 (at least 3).
        /// Put dice with a leading negative face after `--`.
        #[arg(num_args = 0..)]
        dice: Vec<String>,
        /// Save a verifiable transcript to the data directory
        #[arg(short, long)]
        save_transcript: bool,
        /// Save the transcript to this file instead
        #[arg(short, long)]
        transcript: Option<PathBuf>,
    },
    /// Show the win probability table for a set of dice
    Table {
        /// Dice as comma-separated faces
        #[arg(num_args = 0..)]
        dice: Vec<String>,
    },
    /// Check a published HMAC against a revealed key and value
    Verify {
        /// Commitment shown before your move
        #[arg(long)]
        hmac: String,
        /// Key shown at reveal (hex)
        #[arg(long)]
        key: String,
        /// Number shown at reveal
        #[arg(long, allow_hyphen_values = true)]
        value: i64,
    },
    /// Verify every run in a saved transcript
    Audit {
        /// Transcript file
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = CliConfig::new(cli.data_dir, cli.verbose);

    // Initialize logging; game output owns stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_filter()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Play {
            dice,
            save_transcript,
            transcript,
        } => commands::play(&config, &dice, save_transcript, transcript),
        Commands::Table { dice } => commands::show_table(&dice),
        Commands::Verify { hmac, key, value } => commands::verify(&hmac, &key, value),
        Commands::Audit { path } => commands::audit(&path),
    };

    if let Err(e) = result {
        match e.downcast_ref::<DiceError>() {
            Some(DiceError::Aborted) => {
                tracing::info!("Exited at user request");
                return;
            }
            Some(DiceError::Configuration(msg)) => {
                eprintln!("Error: {}", msg);
                eprintln!("Each die is a comma-separated list of integer faces, for example:");
                eprintln!("  {}", USAGE_EXAMPLE);
                eprintln!("Dice starting with a negative face go after `--`:");
                eprintln!("  {}", NEGATIVE_FACES_EXAMPLE);
            }
            _ => {
                eprintln!("Error: {:#}", e);
            }
        }
        std::process::exit(1);
    }
}
