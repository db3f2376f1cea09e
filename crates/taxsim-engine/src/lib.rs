//! Row-parallel pairwise similarity matrices.
//!
//! Takes an ordered list of concepts (or concept-sets), a taxonomy, and a
//! similarity configuration, and produces the full symmetric N×N matrix.
//! Only the upper triangle is computed; rows are partitioned into
//! geometrically growing blocks so each worker thread sees a comparable
//! number of cells, and the orchestrator merges worker results by block
//! index before mirroring.
//!
//! - [`partition`]: Row-block boundaries for upper-triangle work
//! - [`matrix`]: The dense symmetric result container
//! - [`engine`]: Orchestration, from validation to the finished matrix
//!
//! # Example
//!
//! ```
//! use taxsim_core::config::{ConceptMatrixConfig, CsMode, IcMode};
//! use taxsim_core::taxonomy::Taxonomy;
//! use taxsim_engine::concept_similarity_matrix;
//!
//! let mut tax = Taxonomy::new("root");
//! tax.add_concept("a", "root").unwrap();
//! tax.add_concept("b", "a").unwrap();
//! tax.add_concept("c", "a").unwrap();
//!
//! let codes = vec!["b".to_string(), "c".to_string()];
//! let config = ConceptMatrixConfig::new(IcMode::Levels, CsMode::WuPalmer);
//! let matrix = concept_similarity_matrix(&tax, &codes, &config).unwrap();
//! assert_eq!(matrix.get(0, 1), 0.5);
//! assert_eq!(matrix.get(1, 0), 0.5);
//! ```

pub mod engine;
pub mod matrix;
pub mod partition;

pub use engine::{concept_similarity_matrix, pairwise_matrix, set_similarity_matrix};
pub use matrix::SimilarityMatrix;
