//! Taxonomic similarity primitives.
//!
//! This crate provides the building blocks for computing semantic similarity
//! between concepts positioned in a rooted taxonomy (e.g. diagnosis codes in a
//! medical classification tree): hierarchy queries, information-content
//! scoring, pairwise concept-similarity algorithms, and set-similarity
//! aggregation including optimal bipartite matching.
//!
//! # Modules
//!
//! - [`taxonomy`]: Rooted concept tree with depth/ancestor/LCA queries
//! - [`ic`]: Information-content policies and the per-taxonomy [`ic::IcIndex`]
//! - [`cs`]: Pairwise concept-similarity algorithms
//! - [`setsim`]: Set-similarity measures over two concept-sets
//! - [`assignment`]: Hungarian solver backing the bipartite-matching measure
//! - [`config`]: Mode enums and matrix-computation configuration
//! - [`error`]: Error types and result alias
//!
//! # Example
//!
//! ```
//! use taxsim_core::config::{CsMode, IcMode};
//! use taxsim_core::ic::IcIndex;
//! use taxsim_core::taxonomy::Taxonomy;
//!
//! let mut tax = Taxonomy::new("root");
//! tax.add_concept("a", "root").unwrap();
//! tax.add_concept("b", "a").unwrap();
//! tax.add_concept("c", "a").unwrap();
//!
//! let index = IcIndex::new(&tax, IcMode::Levels);
//! let sim = taxsim_core::cs::concept_similarity(&tax, &index, "b", "c", CsMode::WuPalmer).unwrap();
//! assert_eq!(sim, 0.5);
//! ```

pub mod assignment;
pub mod config;
pub mod cs;
pub mod error;
pub mod ic;
pub mod setsim;
pub mod taxonomy;

// Re-export the types nearly every caller needs
pub use config::{ConceptMatrixConfig, CsMode, IcMode, SetMatrixConfig, SetSimMode, WorkerCount};
pub use error::{TaxsimError, TaxsimResult};
pub use ic::IcIndex;
pub use taxonomy::Taxonomy;
