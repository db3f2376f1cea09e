//! Information-content scoring.
//!
//! Two policies convert a concept's hierarchy position into a non-negative
//! specificity score:
//!
//! - [`IcMode::Levels`]: IC is the concept's tree depth.
//! - [`IcMode::ContentBased`]: IC rewards concepts that subsume few leaves
//!   relative to their ancestor count. For a non-root concept with `a`
//!   strict ancestors, `s` leaf descendants, and `L` total taxonomy leaves:
//!   `ic = -ln((s/a + 1) / (L + 1))`. The root scores 0, as do root children
//!   (whose strict-ancestor count is 0; the guard avoids dividing by zero).
//!
//! Matrix computations evaluate IC across every pair, so [`IcIndex`]
//! precomputes the score of every node once per `(taxonomy, mode)` pair and
//! carries the taxonomy-wide maximum needed by `leacock_chodorow`. The index
//! is an explicit value shared by reference across workers; nothing here is
//! global or lazily mutated.

use std::collections::HashMap;

use tracing::debug;

use crate::config::IcMode;
use crate::error::{TaxsimError, TaxsimResult};
use crate::taxonomy::Taxonomy;

/// Information content of a single concept under a policy.
pub fn concept_ic(tax: &Taxonomy, code: &str, mode: IcMode) -> TaxsimResult<f64> {
    match mode {
        IcMode::Levels => Ok(tax.depth(code)? as f64),
        IcMode::ContentBased => content_based_ic(tax, code),
    }
}

fn content_based_ic(tax: &Taxonomy, code: &str) -> TaxsimResult<f64> {
    let depth = tax.depth(code)?;
    if depth == 0 {
        return Ok(0.0);
    }
    // Strict ancestors exclude the concept and the root.
    let ancestors = depth - 1;
    if ancestors == 0 {
        return Ok(0.0);
    }
    let leaves = tax.leaves_under(code)? as f64;
    let total = tax.total_leaves() as f64;
    Ok(-((leaves / ancestors as f64 + 1.0) / (total + 1.0)).ln())
}

/// Precomputed IC table for one `(taxonomy, ic_mode)` pair.
#[derive(Debug, Clone)]
pub struct IcIndex {
    mode: IcMode,
    values: HashMap<String, f64>,
    max_ic: f64,
}

impl IcIndex {
    /// Compute the IC of every concept and the taxonomy-wide maximum.
    ///
    /// One pass over the tree: leaf counts are accumulated by walking each
    /// leaf's parent chain, ancestor counts fall out of stored depths.
    pub fn new(tax: &Taxonomy, mode: IcMode) -> Self {
        let values = match mode {
            IcMode::Levels => tax
                .codes()
                .map(|code| {
                    let depth = tax.depth(code).unwrap_or(0);
                    (code.to_string(), depth as f64)
                })
                .collect(),
            IcMode::ContentBased => Self::content_based_table(tax),
        };
        let max_ic = values.values().copied().fold(0.0_f64, f64::max);

        debug!(
            mode = %mode,
            concepts = values.len(),
            max_ic,
            "information content index built"
        );
        Self {
            mode,
            values,
            max_ic,
        }
    }

    fn content_based_table(tax: &Taxonomy) -> HashMap<String, f64> {
        // Leaf-descendant counts for every internal node, accumulated by
        // walking each leaf's parent chain (root included).
        let mut leaf_counts: HashMap<&str, usize> = HashMap::new();
        for code in tax.codes() {
            let is_leaf = tax
                .children(code)
                .map(|children| children.is_empty())
                .unwrap_or(false);
            if !is_leaf {
                continue;
            }
            let mut current = tax.parent(code).ok().flatten();
            while let Some(parent) = current {
                *leaf_counts.entry(parent).or_insert(0) += 1;
                current = tax.parent(parent).ok().flatten();
            }
        }

        let total = tax.total_leaves() as f64;
        tax.codes()
            .map(|code| {
                let depth = tax.depth(code).unwrap_or(0);
                let ic = if depth <= 1 {
                    // Root and root children score 0 (zero strict ancestors).
                    0.0
                } else {
                    let ancestors = (depth - 1) as f64;
                    let leaves = leaf_counts.get(code).copied().unwrap_or(0) as f64;
                    -((leaves / ancestors + 1.0) / (total + 1.0)).ln()
                };
                (code.to_string(), ic)
            })
            .collect()
    }

    /// The policy this index was built under.
    pub fn mode(&self) -> IcMode {
        self.mode
    }

    /// Information content of a concept.
    pub fn ic(&self, code: &str) -> TaxsimResult<f64> {
        self.values
            .get(code)
            .copied()
            .ok_or_else(|| TaxsimError::unknown_concept(code))
    }

    /// The maximum IC over all concepts. Equals the tree depth under the
    /// `levels` policy.
    pub fn max_ic(&self) -> f64 {
        self.max_ic
    }
}
