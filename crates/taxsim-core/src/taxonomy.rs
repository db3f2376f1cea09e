//! Rooted concept taxonomy and the read-only queries the similarity
//! algorithms are built from.
//!
//! A [`Taxonomy`] is a single-rooted tree of string-coded concepts (e.g.
//! diagnosis codes). It is built once, then shared immutably across matrix
//! workers; every structural fact a hot-path query needs (depth, leaf count,
//! maximum depth) is maintained eagerly at construction time so lookups never
//! require interior mutability.
//!
//! # Invariants
//!
//! - Exactly one root; every other node has exactly one parent.
//! - Acyclic by construction: a parent must exist before a child is attached,
//!   so an edge can never point downward.
//! - Depth of the root is 0; a child's depth is its parent's depth plus one.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{TaxsimError, TaxsimResult};

#[derive(Debug, Clone)]
struct ConceptNode {
    /// `None` only for the root.
    parent: Option<String>,
    /// Child codes in insertion order.
    children: Vec<String>,
    /// Edge distance from the root.
    depth: usize,
}

/// A rooted tree of concepts keyed by string code.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    nodes: HashMap<String, ConceptNode>,
    root: String,
    max_depth: usize,
    leaf_count: usize,
}

impl Taxonomy {
    /// Create a taxonomy containing only its root concept.
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        let mut nodes = HashMap::new();
        nodes.insert(
            root.clone(),
            ConceptNode {
                parent: None,
                children: Vec::new(),
                depth: 0,
            },
        );
        Self {
            nodes,
            root,
            max_depth: 0,
            // A childless root counts as the tree's only leaf.
            leaf_count: 1,
        }
    }

    /// Build a taxonomy from `(parent, child)` edges.
    ///
    /// Edges must be ordered so that every parent is attached before its
    /// children; a forward reference fails with `UnknownParent`.
    pub fn from_edges<S: AsRef<str>>(
        root: impl Into<String>,
        edges: &[(S, S)],
    ) -> TaxsimResult<Self> {
        let mut tax = Self::new(root);
        for (parent, child) in edges {
            tax.add_concept(child.as_ref(), parent.as_ref())?;
        }
        debug!(
            concepts = tax.len(),
            depth = tax.max_depth,
            leaves = tax.leaf_count,
            "taxonomy built from edge list"
        );
        Ok(tax)
    }

    /// Attach a new concept under an existing parent.
    ///
    /// # Errors
    ///
    /// - `DuplicateConcept` if `code` is already present.
    /// - `UnknownParent` if `parent` is not.
    pub fn add_concept(&mut self, code: impl Into<String>, parent: &str) -> TaxsimResult<()> {
        let code = code.into();
        if self.nodes.contains_key(&code) {
            return Err(TaxsimError::DuplicateConcept { code });
        }
        let (depth, parent_was_leaf) = match self.nodes.get_mut(parent) {
            Some(node) => {
                let was_leaf = node.children.is_empty();
                node.children.push(code.clone());
                (node.depth + 1, was_leaf)
            }
            None => {
                return Err(TaxsimError::UnknownParent {
                    parent: parent.to_string(),
                    code,
                })
            }
        };
        if parent_was_leaf {
            // Parent stops being a leaf once it gains its first child.
            self.leaf_count -= 1;
        }

        self.nodes.insert(
            code,
            ConceptNode {
                parent: Some(parent.to_string()),
                children: Vec::new(),
                depth,
            },
        );
        self.leaf_count += 1;
        self.max_depth = self.max_depth.max(depth);
        Ok(())
    }

    /// The root concept code.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Number of concepts, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the taxonomy holds no concepts. Construction always inserts
    /// the root, so this is false for every reachable value.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a concept code resolves to a node.
    pub fn contains(&self, code: &str) -> bool {
        self.nodes.contains_key(code)
    }

    /// Iterate over all concept codes in arbitrary order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// The parent of a concept; `None` for the root.
    pub fn parent(&self, code: &str) -> TaxsimResult<Option<&str>> {
        Ok(self.node(code)?.parent.as_deref())
    }

    /// The direct children of a concept, in insertion order.
    pub fn children(&self, code: &str) -> TaxsimResult<&[String]> {
        Ok(&self.node(code)?.children)
    }

    /// Edge distance from the root (root = 0).
    pub fn depth(&self, code: &str) -> TaxsimResult<usize> {
        Ok(self.node(code)?.depth)
    }

    /// Alias of [`depth`](Self::depth) used by distance-style algorithms.
    pub fn level(&self, code: &str) -> TaxsimResult<usize> {
        self.depth(code)
    }

    /// All concepts strictly between `code` and the root, nearest parent
    /// first. Excludes both the concept itself and the root, so a root
    /// child's ancestor list is empty.
    pub fn ancestors(&self, code: &str) -> TaxsimResult<Vec<String>> {
        let mut chain = Vec::new();
        let mut current = self.node(code)?.parent.as_deref();
        while let Some(parent) = current {
            if parent == self.root {
                break;
            }
            chain.push(parent.to_string());
            current = self
                .nodes
                .get(parent)
                .and_then(|node| node.parent.as_deref());
        }
        Ok(chain)
    }

    /// Number of leaf descendants of a concept; 0 if the concept is itself a
    /// leaf. Callers needing "subtree leaves including self" add 1 explicitly.
    pub fn leaves_under(&self, code: &str) -> TaxsimResult<usize> {
        let node = self.node(code)?;
        let mut count = 0;
        let mut stack: Vec<&str> = node.children.iter().map(String::as_str).collect();
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                if node.children.is_empty() {
                    count += 1;
                } else {
                    stack.extend(node.children.iter().map(String::as_str));
                }
            }
        }
        Ok(count)
    }

    /// The deepest node present in both concepts' strict-ancestor chains;
    /// the root when they share no ancestor below it.
    ///
    /// Strict-ancestor chains exclude the concepts themselves, so for
    /// `a == b` (or one concept on the other's path) this returns the deeper
    /// concept's parent, not the concept. In a single-parent tree the common
    /// portion of two chains has a unique deepest element, which the chain
    /// walk finds deterministically.
    pub fn lowest_common_ancestor(&self, a: &str, b: &str) -> TaxsimResult<String> {
        let chain_a = self.ancestors(a)?;
        let chain_b: HashSet<String> = self.ancestors(b)?.into_iter().collect();
        for candidate in chain_a {
            if chain_b.contains(&candidate) {
                return Ok(candidate);
            }
        }
        Ok(self.root.clone())
    }

    /// Maximum depth over all nodes. Maintained at construction time because
    /// it is read on every pairwise comparison.
    pub fn tree_depth(&self) -> usize {
        self.max_depth
    }

    /// Total number of leaves in the hierarchy (the `L` constant of the
    /// content-based IC formula). Maintained at construction time.
    pub fn total_leaves(&self) -> usize {
        self.leaf_count
    }

    /// Draw `count` distinct non-root concept codes uniformly at random.
    ///
    /// Deterministic for a given seed: candidates are sorted before the draw
    /// so the result does not depend on map iteration order. Returns fewer
    /// than `count` codes when the taxonomy is smaller than requested.
    pub fn sample_concepts(&self, count: usize, seed: u64) -> Vec<String> {
        let mut candidates: Vec<&String> = self
            .nodes
            .keys()
            .filter(|code| **code != self.root)
            .collect();
        candidates.sort();

        let mut rng = StdRng::seed_from_u64(seed);
        candidates
            .choose_multiple(&mut rng, count.min(candidates.len()))
            .map(|code| (*code).clone())
            .collect()
    }

    fn node(&self, code: &str) -> TaxsimResult<&ConceptNode> {
        self.nodes
            .get(code)
            .ok_or_else(|| TaxsimError::unknown_concept(code))
    }
}

/// Shared test fixture: root `0`; children `1..9` of root; `10..13` under
/// `1`; `20` under `10`; `30,31` under `20`. Tree depth 4, 13 leaves.
#[cfg(test)]
pub(crate) fn fixture_taxonomy() -> Taxonomy {
    let mut tax = Taxonomy::new("0");
    for code in 1..=9 {
        tax.add_concept(code.to_string(), "0").unwrap();
    }
    for code in 10..=13 {
        tax.add_concept(code.to_string(), "1").unwrap();
    }
    tax.add_concept("20", "10").unwrap();
    tax.add_concept("30", "20").unwrap();
    tax.add_concept("31", "20").unwrap();
    tax
}
