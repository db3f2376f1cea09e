//! Command handlers and shared file plumbing.
//!
//! # Modules
//!
//! - `concepts`: Pairwise concept-similarity matrix over a code list
//! - `sets`: Pairwise set-similarity matrix over concept-sets
//! - `sample`: Draw random concept codes from a taxonomy

pub mod concepts;
pub mod sample;
pub mod sets;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use taxsim_core::taxonomy::Taxonomy;
use taxsim_engine::SimilarityMatrix;

use crate::error::{CliError, CliResult};

/// On-disk taxonomy description: a root code plus `[parent, child]` edges,
/// parents listed before their children.
#[derive(Debug, Deserialize)]
pub struct TaxonomyFile {
    pub root: String,
    pub edges: Vec<(String, String)>,
}

/// Load a taxonomy from a JSON file and build the concept tree.
pub fn load_taxonomy(path: &Path) -> CliResult<Taxonomy> {
    let raw = fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    let file: TaxonomyFile = serde_json::from_str(&raw).map_err(|e| CliError::json(path, e))?;
    let tax = Taxonomy::from_edges(file.root, &file.edges)?;
    debug!(path = %path.display(), concepts = tax.len(), "taxonomy loaded");
    Ok(tax)
}

/// Load a JSON array of concept codes.
pub fn load_codes(path: &Path) -> CliResult<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    serde_json::from_str(&raw).map_err(|e| CliError::json(path, e))
}

/// Load a JSON array of concept-code arrays, one inner array per set.
pub fn load_sets(path: &Path) -> CliResult<Vec<Vec<String>>> {
    let raw = fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    serde_json::from_str(&raw).map_err(|e| CliError::json(path, e))
}

/// Output format for matrix commands.
#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `{"labels": [...], "matrix": [[...], ...]}` document
    Json,
    /// Matrix body with a label header row and label row prefixes
    Csv,
}

#[derive(Debug, Serialize)]
struct MatrixDocument<'a> {
    labels: &'a [String],
    matrix: Vec<Vec<f64>>,
}

/// Render a labelled matrix in the requested format.
pub fn render_matrix(
    matrix: &SimilarityMatrix,
    labels: &[String],
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => {
            let doc = MatrixDocument {
                labels,
                matrix: matrix.to_rows(),
            };
            Ok(serde_json::to_string_pretty(&doc)?)
        }
        OutputFormat::Csv => Ok(render_csv(matrix, labels)),
    }
}

fn render_csv(matrix: &SimilarityMatrix, labels: &[String]) -> String {
    let mut out = String::new();
    // Empty corner cell, then one column per label.
    out.push(',');
    out.push_str(&labels.join(","));
    out.push('\n');
    for (i, label) in labels.iter().enumerate() {
        let cells: Vec<String> = matrix.row(i).iter().map(|v| v.to_string()).collect();
        out.push_str(label);
        out.push(',');
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Write rendered output to a file, or to stdout when no path is given.
pub fn emit(rendered: String, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => {
            fs::write(path, rendered).map_err(|e| CliError::write(path, e))?;
            debug!(path = %path.display(), "output written");
            Ok(())
        }
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}
