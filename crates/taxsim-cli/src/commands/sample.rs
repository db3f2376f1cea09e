//! Sample command: draw random concept codes from a taxonomy.
//!
//! Useful for building benchmark and demo inputs without shipping real
//! patient data; a fixed seed makes a draw reproducible.

use std::path::PathBuf;

use clap::Args;
use tracing::{error, warn};

use crate::commands::{emit, load_taxonomy};
use crate::error::CliResult;

/// Arguments for the sample command.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Taxonomy JSON file: {"root": "...", "edges": [["parent","child"], ...]}
    #[arg(long)]
    pub taxonomy: PathBuf,

    /// Number of concept codes to draw
    #[arg(long)]
    pub count: usize,

    /// RNG seed; the same seed always reproduces the same draw
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Output file (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Execute the sample command.
///
/// # Returns
///
/// Exit code 0 on success, 1 on any failure (logged to stderr).
pub fn handle_sample(args: SampleArgs) -> i32 {
    match run(args) {
        Ok(()) => 0,
        Err(e) => {
            error!("concept sampling failed: {e}");
            1
        }
    }
}

fn run(args: SampleArgs) -> CliResult<()> {
    let tax = load_taxonomy(&args.taxonomy)?;
    let codes = tax.sample_concepts(args.count, args.seed);
    if codes.len() < args.count {
        warn!(
            requested = args.count,
            drawn = codes.len(),
            "taxonomy holds fewer concepts than requested"
        );
    }
    emit(serde_json::to_string_pretty(&codes)?, args.output.as_deref())
}
