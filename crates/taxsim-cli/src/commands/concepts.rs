//! Concept-matrix command: pairwise CS over an ordered code list.

use std::path::PathBuf;

use clap::Args;
use tracing::{error, info};

use taxsim_core::config::{ConceptMatrixConfig, CsMode, IcMode, WorkerCount};
use taxsim_engine::concept_similarity_matrix;

use crate::commands::{emit, load_codes, load_taxonomy, render_matrix, OutputFormat};
use crate::error::CliResult;

/// Arguments for the concepts command.
#[derive(Args, Debug)]
pub struct ConceptsArgs {
    /// Taxonomy JSON file: {"root": "...", "edges": [["parent","child"], ...]}
    #[arg(long)]
    pub taxonomy: PathBuf,

    /// JSON file holding the array of concept codes to compare
    #[arg(long)]
    pub codes: PathBuf,

    /// Information-content policy (levels, content-based)
    #[arg(long, default_value = "levels")]
    pub ic_mode: IcMode,

    /// Concept-similarity algorithm
    #[arg(long, default_value = "wu_palmer")]
    pub cs_mode: CsMode,

    /// Worker threads for the matrix ("auto" or a positive count)
    #[arg(long, default_value = "auto")]
    pub workers: WorkerCount,

    /// Divide the final matrix by its largest absolute entry
    #[arg(long)]
    pub normalize: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Execute the concepts command.
///
/// # Returns
///
/// Exit code 0 on success, 1 on any failure (logged to stderr).
pub fn handle_concepts(args: ConceptsArgs) -> i32 {
    match run(args) {
        Ok(()) => 0,
        Err(e) => {
            error!("concept matrix failed: {e}");
            1
        }
    }
}

fn run(args: ConceptsArgs) -> CliResult<()> {
    let tax = load_taxonomy(&args.taxonomy)?;
    let codes = load_codes(&args.codes)?;

    let mut config = ConceptMatrixConfig::new(args.ic_mode, args.cs_mode);
    config.workers = args.workers;
    config.normalize = args.normalize;

    let matrix = concept_similarity_matrix(&tax, &codes, &config)?;
    info!(
        concepts = codes.len(),
        cs_mode = %config.cs_mode,
        ic_mode = %config.ic_mode,
        "concept similarity matrix ready"
    );
    emit(render_matrix(&matrix, &codes, args.format)?, args.output.as_deref())
}
