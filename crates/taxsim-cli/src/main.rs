//! Taxonomic similarity CLI.
//!
//! # Commands
//!
//! - `concepts`: Pairwise concept-similarity matrix over a code list
//! - `sets`: Pairwise set-similarity matrix over concept-sets
//! - `sample`: Draw random concept codes from a taxonomy
//!
//! Taxonomies and inputs come from JSON files; matrices are written as JSON
//! or CSV to stdout or a file. Logs go to stderr so piped output stays clean.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod error;

/// Semantic similarity matrices over taxonomic hierarchies
#[derive(Parser, Debug)]
#[command(name = "taxsim")]
#[command(version = "0.1.0")]
#[command(about = "Compute concept and concept-set similarity matrices over a taxonomy")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pairwise concept-similarity matrix over a list of codes
    Concepts(commands::concepts::ConceptsArgs),
    /// Pairwise set-similarity matrix over a list of concept-sets
    Sets(commands::sets::SetsArgs),
    /// Draw random concept codes from a taxonomy
    Sample(commands::sample::SampleArgs),
}

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    // Dispatch to command handlers
    let exit_code = match cli.command {
        Commands::Concepts(args) => commands::concepts::handle_concepts(args),
        Commands::Sets(args) => commands::sets::handle_sets(args),
        Commands::Sample(args) => commands::sample::handle_sample(args),
    };

    std::process::exit(exit_code);
}
