//! Set-matrix command: pairwise SetSim over a list of concept-sets.

use std::path::PathBuf;

use clap::Args;
use tracing::{error, info};

use taxsim_core::config::{CsMode, IcMode, SetMatrixConfig, SetSimMode, WorkerCount};
use taxsim_engine::set_similarity_matrix;

use crate::commands::{emit, load_sets, load_taxonomy, render_matrix, OutputFormat};
use crate::error::CliResult;

/// Arguments for the sets command.
#[derive(Args, Debug)]
pub struct SetsArgs {
    /// Taxonomy JSON file: {"root": "...", "edges": [["parent","child"], ...]}
    #[arg(long)]
    pub taxonomy: PathBuf,

    /// JSON file holding an array of concept-code arrays, one per set
    #[arg(long)]
    pub sets: PathBuf,

    /// Information-content policy (levels, content-based)
    #[arg(long, default_value = "levels")]
    pub ic_mode: IcMode,

    /// Concept-similarity algorithm backing the CS-aggregating measures
    #[arg(long, default_value = "wu_palmer")]
    pub cs_mode: CsMode,

    /// Set-similarity measure
    #[arg(long, default_value = "bipartite_matching")]
    pub setsim_mode: SetSimMode,

    /// Worker threads for the matrix ("auto" or a positive count)
    #[arg(long, default_value = "auto")]
    pub workers: WorkerCount,

    /// Divide the final matrix by its largest absolute entry
    #[arg(long)]
    pub normalize: bool,

    /// Divide each raw set score by the larger set size
    #[arg(long)]
    pub scale_to_set_sizes: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Execute the sets command.
///
/// # Returns
///
/// Exit code 0 on success, 1 on any failure (logged to stderr).
pub fn handle_sets(args: SetsArgs) -> i32 {
    match run(args) {
        Ok(()) => 0,
        Err(e) => {
            error!("set matrix failed: {e}");
            1
        }
    }
}

fn run(args: SetsArgs) -> CliResult<()> {
    let tax = load_taxonomy(&args.taxonomy)?;
    let sets = load_sets(&args.sets)?;

    let mut config = SetMatrixConfig::new(args.ic_mode, args.cs_mode, args.setsim_mode);
    config.workers = args.workers;
    config.normalize = args.normalize;
    config.scale_to_set_sizes = args.scale_to_set_sizes;

    let matrix = set_similarity_matrix(&tax, &sets, &config)?;
    info!(
        sets = sets.len(),
        setsim_mode = %config.setsim_mode,
        cs_mode = %config.cs_mode,
        "set similarity matrix ready"
    );

    let labels: Vec<String> = sets.iter().map(|set| set.join("+")).collect();
    emit(render_matrix(&matrix, &labels, args.format)?, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_fixture(dir: &Path) -> (PathBuf, PathBuf) {
        let taxonomy = dir.join("taxonomy.json");
        fs::write(
            &taxonomy,
            r#"{"root": "0", "edges": [
                ["0", "1"], ["0", "2"], ["0", "3"], ["0", "4"],
                ["1", "11"], ["1", "12"],
                ["1", "10"], ["10", "20"], ["20", "30"], ["20", "31"]
            ]}"#,
        )
        .unwrap();
        let sets = dir.join("sets.json");
        fs::write(
            &sets,
            r#"[["1", "2", "12", "3", "31"], ["1", "11"], ["30", "31"]]"#,
        )
        .unwrap();
        (taxonomy, sets)
    }

    fn base_args(taxonomy: PathBuf, sets: PathBuf) -> SetsArgs {
        SetsArgs {
            taxonomy,
            sets,
            ic_mode: IcMode::Levels,
            cs_mode: CsMode::WuPalmer,
            setsim_mode: SetSimMode::BipartiteMatching,
            workers: WorkerCount::Fixed(2),
            normalize: false,
            scale_to_set_sizes: false,
            format: OutputFormat::Json,
            output: None,
        }
    }

    #[test]
    fn test_sets_bipartite_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (taxonomy, sets) = write_fixture(dir.path());
        let output = dir.path().join("matrix.json");

        let mut args = base_args(taxonomy, sets);
        args.output = Some(output.clone());
        run(args).unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(doc["labels"][0], "1+2+12+3+31");
        assert_eq!(doc["labels"][1], "1+11");
        assert_eq!(doc["matrix"][0][0].as_f64().unwrap(), 5.0);
        assert!((doc["matrix"][0][1].as_f64().unwrap() - 1.5).abs() < 1e-12);
        assert!((doc["matrix"][1][2].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-12);
        println!("[VERIFIED] sets command writes the bipartite matrix");
    }

    #[test]
    fn test_sets_jaccard_with_scaling() {
        let dir = tempfile::tempdir().unwrap();
        let (taxonomy, _) = write_fixture(dir.path());
        let sets = dir.path().join("pairs.json");
        fs::write(&sets, r#"[["1", "2", "3"], ["2", "3", "4"]]"#).unwrap();
        let output = dir.path().join("matrix.json");

        let mut args = base_args(taxonomy, sets);
        args.setsim_mode = SetSimMode::Jaccard;
        args.scale_to_set_sizes = true;
        args.output = Some(output.clone());
        run(args).unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        // jaccard 0.5 scaled by the larger set size 3.
        assert!((doc["matrix"][0][1].as_f64().unwrap() - 0.5 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_sets_empty_set_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (taxonomy, _) = write_fixture(dir.path());
        let sets = dir.path().join("empty.json");
        fs::write(&sets, r#"[["1"], []]"#).unwrap();

        let args = base_args(taxonomy, sets);
        assert_eq!(handle_sets(args), 1);
    }
}
