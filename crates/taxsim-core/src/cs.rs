//! Pairwise concept-similarity algorithms.
//!
//! Every algorithm is a pure function of the two concepts' IC values, their
//! lowest common ancestor, and a couple of taxonomy-wide constants (tree
//! depth, maximum IC). Similarity-style modes score identical concepts 1.0
//! and distance-style modes 0.0 without touching the formulas; `batet`
//! defines no self-comparison and fails instead.
//!
//! The [`IcIndex`] handed in must have been built from the same taxonomy;
//! the index supplies per-concept IC and the cached maximum, the taxonomy
//! supplies structure (LCA, levels, ancestor sets).

use std::collections::HashSet;

use crate::config::{CsMode, IcMode};
use crate::error::{TaxsimError, TaxsimResult};
use crate::ic::IcIndex;
use crate::taxonomy::Taxonomy;

/// Similarity or distance between two concepts under the given algorithm.
///
/// # Errors
///
/// - `UnknownConcept` if either code is absent from the index.
/// - `InvalidConfiguration` if the mode does not support the index's IC
///   policy (`simple_wu_palmer` outside `levels`).
/// - `InvalidInput` for a `batet` comparison of a concept with itself.
pub fn concept_similarity(
    tax: &Taxonomy,
    index: &IcIndex,
    c1: &str,
    c2: &str,
    mode: CsMode,
) -> TaxsimResult<f64> {
    if mode.requires_levels_ic() && index.mode() != IcMode::Levels {
        return Err(TaxsimError::invalid_config(format!(
            "cs_mode '{mode}' is only defined under ic_mode 'levels'"
        )));
    }

    let ic1 = index.ic(c1)?;
    let ic2 = index.ic(c2)?;

    if c1 == c2 {
        return mode.self_comparison().ok_or_else(|| {
            TaxsimError::invalid_input(format!(
                "cs_mode '{mode}' defines no value for comparing '{c1}' with itself"
            ))
        });
    }

    match mode {
        CsMode::WuPalmer => {
            let ic_lca = lca_ic(tax, index, c1, c2)?;
            Ok(wu_palmer(ic1, ic2, ic_lca))
        }
        CsMode::Li => {
            let ic_lca = lca_ic(tax, index, c1, c2)?;
            Ok(li(ic1, ic2, ic_lca))
        }
        CsMode::SimpleWuPalmer => {
            let ic_lca = lca_ic(tax, index, c1, c2)?;
            Ok(simple_wu_palmer(tax.tree_depth() as f64, ic_lca))
        }
        CsMode::LeacockChodorow => {
            let ic_lca = lca_ic(tax, index, c1, c2)?;
            Ok(leacock_chodorow(ic1, ic2, ic_lca, index.max_ic()))
        }
        CsMode::NguyenAlmubaid => nguyen_almubaid(tax, c1, c2),
        CsMode::Batet => batet(tax, c1, c2),
    }
}

fn lca_ic(tax: &Taxonomy, index: &IcIndex, c1: &str, c2: &str) -> TaxsimResult<f64> {
    let lca = tax.lowest_common_ancestor(c1, c2)?;
    index.ic(&lca)
}

/// `2·icLca / (ic1 + ic2)`, similarity in 0..1.
fn wu_palmer(ic1: f64, ic2: f64, ic_lca: f64) -> f64 {
    let denom = ic1 + ic2;
    if denom == 0.0 {
        // Both concepts carry zero IC (root children under content-based).
        return 0.0;
    }
    2.0 * ic_lca / denom
}

/// `exp(0.2·(ic1+ic2-2·icLca)) · tanh(0.6·icLca)`.
fn li(ic1: f64, ic2: f64, ic_lca: f64) -> f64 {
    (0.2 * (ic1 + ic2 - 2.0 * ic_lca)).exp() * (0.6 * ic_lca).tanh()
}

/// `1 - (D - icLca)/D` over tree depth `D`; levels IC only.
fn simple_wu_palmer(tree_depth: f64, ic_lca: f64) -> f64 {
    if tree_depth == 0.0 {
        // Single-node taxonomy; the only comparable pair is the root with
        // itself, which the self-case already answered.
        return 1.0;
    }
    1.0 - (tree_depth - ic_lca) / tree_depth
}

/// `-ln((ic1+ic2-2·icLca+1) / (2·maxIc))`.
fn leacock_chodorow(ic1: f64, ic2: f64, ic_lca: f64, max_ic: f64) -> f64 {
    if max_ic <= 0.0 {
        // Degenerate flat taxonomy where every concept scores zero IC.
        return 0.0;
    }
    -((ic1 + ic2 - 2.0 * ic_lca + 1.0) / (2.0 * max_ic)).ln()
}

/// `ln((pathLen-1)·(D - level(lca)) + 1)` with
/// `pathLen = level(c1)+level(c2)-2·level(lca)`.
///
/// Always computed over tree levels, whatever IC policy the caller selected.
/// For distinct concepts `pathLen >= 2`, so the logarithm's argument stays
/// at or above 1 and the distance non-negative.
fn nguyen_almubaid(tax: &Taxonomy, c1: &str, c2: &str) -> TaxsimResult<f64> {
    let lca = tax.lowest_common_ancestor(c1, c2)?;
    let lca_level = tax.level(&lca)? as f64;
    let path_len = tax.level(c1)? as f64 + tax.level(c2)? as f64 - 2.0 * lca_level;
    let depth = tax.tree_depth() as f64;
    Ok(((path_len - 1.0) * (depth - lca_level) + 1.0).ln())
}

/// `-log2((|A| + |B| - |A∩B|) / (|A| + |B|))` over inclusive ancestor sets
/// `A = ancestors(c1)∪{c1}`, `B = ancestors(c2)∪{c2}`.
fn batet(tax: &Taxonomy, c1: &str, c2: &str) -> TaxsimResult<f64> {
    let mut set1: HashSet<String> = tax.ancestors(c1)?.into_iter().collect();
    set1.insert(c1.to_string());
    let mut set2: HashSet<String> = tax.ancestors(c2)?.into_iter().collect();
    set2.insert(c2.to_string());

    let shared = set1.intersection(&set2).count() as f64;
    let a = set1.len() as f64;
    let b = set2.len() as f64;
    Ok(-((a + b - shared) / (a + b)).log2())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::fixture_taxonomy;

    const EPS: f64 = 1e-12;

    fn levels_index(tax: &Taxonomy) -> IcIndex {
        IcIndex::new(tax, IcMode::Levels)
    }

    fn cs(tax: &Taxonomy, index: &IcIndex, c1: &str, c2: &str, mode: CsMode) -> f64 {
        concept_similarity(tax, index, c1, c2, mode).unwrap()
    }

    #[test]
    fn test_wu_palmer_fixture_values() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        assert_eq!(cs(&tax, &index, "1", "1", CsMode::WuPalmer), 1.0);
        assert_eq!(cs(&tax, &index, "1", "9", CsMode::WuPalmer), 0.0);
        assert_eq!(cs(&tax, &index, "30", "31", CsMode::WuPalmer), 0.75);
        assert!((cs(&tax, &index, "13", "31", CsMode::WuPalmer) - 1.0 / 3.0).abs() < EPS);
        println!("[VERIFIED] wu_palmer matches fixture expectations");
    }

    #[test]
    fn test_wu_palmer_content_based() {
        let tax = fixture_taxonomy();
        let index = IcIndex::new(&tax, IcMode::ContentBased);
        // ic(30)=ic(31)=ln 14, lca 20 has ic ln 7.
        let expected = 7f64.ln() / 14f64.ln();
        assert!((cs(&tax, &index, "30", "31", CsMode::WuPalmer) - expected).abs() < EPS);
        // Root children all carry zero IC; the zero-denominator guard fires.
        assert_eq!(cs(&tax, &index, "1", "9", CsMode::WuPalmer), 0.0);
    }

    #[test]
    fn test_li_fixture_values() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        let expected = 0.4f64.exp() * 1.8f64.tanh();
        assert!((cs(&tax, &index, "30", "31", CsMode::Li) - expected).abs() < EPS);
        assert_eq!(cs(&tax, &index, "30", "30", CsMode::Li), 1.0);
    }

    #[test]
    fn test_simple_wu_palmer() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        assert_eq!(cs(&tax, &index, "30", "31", CsMode::SimpleWuPalmer), 0.75);
        assert_eq!(cs(&tax, &index, "1", "9", CsMode::SimpleWuPalmer), 0.0);
        assert_eq!(cs(&tax, &index, "13", "31", CsMode::SimpleWuPalmer), 0.25);
    }

    #[test]
    fn test_simple_wu_palmer_requires_levels() {
        let tax = fixture_taxonomy();
        let index = IcIndex::new(&tax, IcMode::ContentBased);
        let err = concept_similarity(&tax, &index, "30", "31", CsMode::SimpleWuPalmer).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_leacock_chodorow_fixture_values() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        assert!((cs(&tax, &index, "13", "31", CsMode::LeacockChodorow) - (8f64 / 5.0).ln()).abs() < EPS);
        assert!((cs(&tax, &index, "30", "31", CsMode::LeacockChodorow) - (8f64 / 3.0).ln()).abs() < EPS);
        assert_eq!(cs(&tax, &index, "13", "13", CsMode::LeacockChodorow), 1.0);
    }

    #[test]
    fn test_nguyen_almubaid_fixture_values() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        assert!((cs(&tax, &index, "13", "31", CsMode::NguyenAlmubaid) - 10f64.ln()).abs() < EPS);
        assert!((cs(&tax, &index, "30", "31", CsMode::NguyenAlmubaid) - 2f64.ln()).abs() < EPS);
        // Distance-style self-comparison is zero.
        assert_eq!(cs(&tax, &index, "31", "31", CsMode::NguyenAlmubaid), 0.0);
    }

    #[test]
    fn test_nguyen_almubaid_ignores_ic_policy() {
        let tax = fixture_taxonomy();
        let levels = levels_index(&tax);
        let content = IcIndex::new(&tax, IcMode::ContentBased);
        assert_eq!(
            cs(&tax, &levels, "13", "31", CsMode::NguyenAlmubaid),
            cs(&tax, &content, "13", "31", CsMode::NguyenAlmubaid),
        );
    }

    #[test]
    fn test_batet_fixture_values() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        assert!((cs(&tax, &index, "30", "31", CsMode::Batet) - (-(5f64 / 8.0).log2())).abs() < EPS);
        assert!((cs(&tax, &index, "13", "31", CsMode::Batet) - (-(5f64 / 6.0).log2())).abs() < EPS);
        // Disjoint inclusive-ancestor sets: distance 0 by the formula.
        assert_eq!(cs(&tax, &index, "1", "9", CsMode::Batet), 0.0);
    }

    #[test]
    fn test_batet_rejects_self_comparison() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        let err = concept_similarity(&tax, &index, "31", "31", CsMode::Batet).unwrap_err();
        assert!(err.is_input_error());
        assert!(format!("{err}").contains("batet"));
    }

    #[test]
    fn test_symmetry_across_modes() {
        let tax = fixture_taxonomy();
        let pairs = [("30", "31"), ("13", "31"), ("1", "9"), ("2", "20")];
        for mode in [
            CsMode::WuPalmer,
            CsMode::Li,
            CsMode::SimpleWuPalmer,
            CsMode::LeacockChodorow,
            CsMode::NguyenAlmubaid,
            CsMode::Batet,
        ] {
            let index = levels_index(&tax);
            for (a, b) in pairs {
                let forward = cs(&tax, &index, a, b, mode);
                let backward = cs(&tax, &index, b, a, mode);
                assert_eq!(forward, backward, "cs({a},{b}) asymmetric under {mode}");
            }
        }
        println!("[VERIFIED] cs(a,b) == cs(b,a) for all algorithms");
    }

    #[test]
    fn test_unknown_concept_rejected() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        let err = concept_similarity(&tax, &index, "1", "99", CsMode::WuPalmer).unwrap_err();
        assert_eq!(err, TaxsimError::unknown_concept("99"));
    }
}
