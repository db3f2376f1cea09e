//! Similarity measures over concept-sets.
//!
//! A concept-set is an unordered collection of codes, e.g. the diagnoses
//! recorded for one patient. The count-based measures (`jaccard`, `dice`,
//! `cosine`, `overlap`) only look at set cardinalities; the remaining three
//! combine pairwise concept similarity: `mean_cs` averages over the cross
//! product, `hierarchical` scores the symmetric difference, and
//! `bipartite_matching` solves an optimal assignment over the cross-pair CS
//! matrix. The matching measure is by far the most expensive single
//! comparison, which is what makes the row-parallel matrix engine worthwhile.
//!
//! Inputs are de-duplicated (first occurrence wins) before any measure runs,
//! so repeated codes never skew cardinalities or averages.

use std::collections::HashSet;

use crate::assignment;
use crate::config::{CsMode, SetSimMode};
use crate::cs::concept_similarity;
use crate::error::{TaxsimError, TaxsimResult};
use crate::ic::IcIndex;
use crate::taxonomy::Taxonomy;

/// De-duplicate a concept-set, keeping the first occurrence of each code.
pub fn dedup_preserving_order(codes: &[String]) -> Vec<String> {
    dedup(codes).into_iter().map(str::to_owned).collect()
}

fn dedup(codes: &[String]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(codes.len());
    let mut out = Vec::with_capacity(codes.len());
    for code in codes {
        if seen.insert(code.as_str()) {
            out.push(code.as_str());
        }
    }
    out
}

/// Divide a raw set score by the larger de-duplicated set size.
///
/// One scaling policy for every measure; a self-match under
/// `bipartite_matching` scales to exactly 1.0 this way.
pub fn scale_to_set_sizes(raw: f64, len1: usize, len2: usize) -> f64 {
    raw / len1.max(len2).max(1) as f64
}

/// Similarity or distance between two concept-sets.
///
/// The count-based modes ignore `cs_mode` entirely; the CS-backed modes
/// evaluate [`concept_similarity`] per cross pair and propagate its errors.
///
/// # Errors
///
/// - `InvalidInput` if either set is empty, or a CS-backed mode compares a
///   concept with itself under `batet` (overlapping sets).
/// - `UnknownConcept` if any member code is absent from the taxonomy.
/// - `InvalidConfiguration` for an IC/CS combination the algorithm rejects.
pub fn set_similarity(
    tax: &Taxonomy,
    index: &IcIndex,
    s1: &[String],
    s2: &[String],
    setsim_mode: SetSimMode,
    cs_mode: CsMode,
) -> TaxsimResult<f64> {
    let a = dedup(s1);
    let b = dedup(s2);
    if a.is_empty() || b.is_empty() {
        return Err(TaxsimError::invalid_input(
            "set similarity requires two non-empty concept-sets",
        ));
    }
    for code in a.iter().chain(b.iter()) {
        if !tax.contains(code) {
            return Err(TaxsimError::unknown_concept(*code));
        }
    }

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    match setsim_mode {
        SetSimMode::Jaccard => {
            let i = intersection_count(&a, &b);
            Ok(i / (n1 + n2 - i))
        }
        SetSimMode::Dice => {
            let i = intersection_count(&a, &b);
            Ok(2.0 * i / (n1 + n2))
        }
        SetSimMode::Cosine => {
            let i = intersection_count(&a, &b);
            Ok(i / (n1 * n2).sqrt())
        }
        SetSimMode::Overlap => {
            let i = intersection_count(&a, &b);
            Ok(i / n1.min(n2))
        }
        SetSimMode::MeanCs => mean_cs(tax, index, &a, &b, cs_mode),
        SetSimMode::Hierarchical => hierarchical(tax, index, &a, &b, cs_mode),
        SetSimMode::BipartiteMatching => bipartite_matching(tax, index, &a, &b, cs_mode),
    }
}

fn intersection_count(a: &[&str], b: &[&str]) -> f64 {
    let members: HashSet<&str> = b.iter().copied().collect();
    a.iter().filter(|code| members.contains(**code)).count() as f64
}

/// Average CS over the full cross product `S1 × S2`.
fn mean_cs(
    tax: &Taxonomy,
    index: &IcIndex,
    a: &[&str],
    b: &[&str],
    cs_mode: CsMode,
) -> TaxsimResult<f64> {
    let mut sum = 0.0;
    for x in a {
        for y in b {
            sum += concept_similarity(tax, index, x, y, cs_mode)?;
        }
    }
    Ok(sum / (a.len() * b.len()) as f64)
}

/// Symmetric-difference distance.
///
/// Each set's exclusive members are compared against the entire opposite
/// set; the two sums are divided by the opposite set's size and the total
/// by `|S1 ∪ S2|`. Identical sets have no exclusive members and score 0.
/// Exclusive members never coincide with a member of the opposite set, so
/// no cross pair is a self-comparison.
fn hierarchical(
    tax: &Taxonomy,
    index: &IcIndex,
    a: &[&str],
    b: &[&str],
    cs_mode: CsMode,
) -> TaxsimResult<f64> {
    let in_a: HashSet<&str> = a.iter().copied().collect();
    let in_b: HashSet<&str> = b.iter().copied().collect();
    let union = in_a.union(&in_b).count() as f64;

    let mut from_a = 0.0;
    for x in a {
        if in_b.contains(x) {
            continue;
        }
        for y in b {
            from_a += concept_similarity(tax, index, x, y, cs_mode)?;
        }
    }
    let mut from_b = 0.0;
    for x in b {
        if in_a.contains(x) {
            continue;
        }
        for y in a {
            from_b += concept_similarity(tax, index, x, y, cs_mode)?;
        }
    }

    Ok((from_a / b.len() as f64 + from_b / a.len() as f64) / union)
}

/// Optimal one-to-one pairing over the cross-pair CS matrix.
///
/// Distance-style CS modes take the minimum-cost matching, similarity-style
/// modes the maximum-weight matching; the score is the matched-pair sum.
fn bipartite_matching(
    tax: &Taxonomy,
    index: &IcIndex,
    a: &[&str],
    b: &[&str],
    cs_mode: CsMode,
) -> TaxsimResult<f64> {
    // The solver wants rows <= columns; CS is symmetric, so swapping the
    // sets leaves the matched weights unchanged.
    let (rows, cols) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut weights = Vec::with_capacity(rows.len());
    for x in rows {
        let mut row = Vec::with_capacity(cols.len());
        for y in cols {
            row.push(concept_similarity(tax, index, x, y, cs_mode)?);
        }
        weights.push(row);
    }

    let matching = if cs_mode.is_distance() {
        assignment::solve_min(&weights)?
    } else {
        assignment::solve_max(&weights)?
    };
    Ok(matching.total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IcMode;
    use crate::taxonomy::fixture_taxonomy;

    fn codes(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|code| code.to_string()).collect()
    }

    fn levels_index(tax: &Taxonomy) -> IcIndex {
        IcIndex::new(tax, IcMode::Levels)
    }

    #[test]
    fn test_count_measures() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        let s1 = codes(&["1", "2", "3"]);
        let s2 = codes(&["2", "3", "4"]);

        let jaccard =
            set_similarity(&tax, &index, &s1, &s2, SetSimMode::Jaccard, CsMode::WuPalmer).unwrap();
        let dice =
            set_similarity(&tax, &index, &s1, &s2, SetSimMode::Dice, CsMode::WuPalmer).unwrap();
        let cosine =
            set_similarity(&tax, &index, &s1, &s2, SetSimMode::Cosine, CsMode::WuPalmer).unwrap();
        let overlap =
            set_similarity(&tax, &index, &s1, &s2, SetSimMode::Overlap, CsMode::WuPalmer).unwrap();

        assert_eq!(jaccard, 0.5);
        assert!((dice - 2.0 / 3.0).abs() < 1e-12);
        assert!((cosine - 2.0 / 3.0).abs() < 1e-12);
        assert!((overlap - 2.0 / 3.0).abs() < 1e-12);
        println!("[VERIFIED] count-based measures agree on the shared-pair fixture");
    }

    #[test]
    fn test_duplicates_collapse_before_counting() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        let s1 = codes(&["1", "1", "2"]);
        let s2 = codes(&["2", "3"]);

        let jaccard =
            set_similarity(&tax, &index, &s1, &s2, SetSimMode::Jaccard, CsMode::WuPalmer).unwrap();
        assert!((jaccard - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_cs() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);

        let siblings = set_similarity(
            &tax,
            &index,
            &codes(&["30"]),
            &codes(&["31"]),
            SetSimMode::MeanCs,
            CsMode::WuPalmer,
        )
        .unwrap();
        assert!((siblings - 0.75).abs() < 1e-12);

        // Identical two-element sets: two self pairs at 1.0 and two cross
        // pairs at 1/3 average to 2/3.
        let same = codes(&["13", "31"]);
        let value = set_similarity(
            &tax,
            &index,
            &same,
            &same,
            SetSimMode::MeanCs,
            CsMode::WuPalmer,
        )
        .unwrap();
        assert!((value - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_hierarchical_distance() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);

        let value = set_similarity(
            &tax,
            &index,
            &codes(&["30"]),
            &codes(&["31"]),
            SetSimMode::Hierarchical,
            CsMode::WuPalmer,
        )
        .unwrap();
        assert!((value - 0.75).abs() < 1e-12);

        let same = codes(&["13", "30", "31"]);
        let zero = set_similarity(
            &tax,
            &index,
            &same,
            &same,
            SetSimMode::Hierarchical,
            CsMode::WuPalmer,
        )
        .unwrap();
        assert_eq!(zero, 0.0);
    }

    #[test]
    fn test_hierarchical_skips_shared_members() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);

        // "31" is shared, so no cross pair compares a concept with itself
        // and batet stays well-defined despite the overlap.
        let value = set_similarity(
            &tax,
            &index,
            &codes(&["30", "31"]),
            &codes(&["31"]),
            SetSimMode::Hierarchical,
            CsMode::Batet,
        )
        .unwrap();
        let expected = -(5.0f64 / 8.0).log2() / 2.0;
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_bipartite_matching_self_match() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        let set = codes(&["1", "2", "12", "3", "31"]);

        let raw = set_similarity(
            &tax,
            &index,
            &set,
            &set,
            SetSimMode::BipartiteMatching,
            CsMode::WuPalmer,
        )
        .unwrap();
        assert!((raw - 5.0).abs() < 1e-12);
        assert!((scale_to_set_sizes(raw, set.len(), set.len()) - 1.0).abs() < 1e-12);
        println!("[VERIFIED] self-match pairs every concept with itself");
    }

    #[test]
    fn test_bipartite_matching_rectangular() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        let wide = codes(&["1", "2", "12", "3", "31"]);

        // Best pairing: 1 with itself (1.0) plus 11 with its sibling 12 (0.5).
        let value = set_similarity(
            &tax,
            &index,
            &wide,
            &codes(&["1", "11"]),
            SetSimMode::BipartiteMatching,
            CsMode::WuPalmer,
        )
        .unwrap();
        assert!((value - 1.5).abs() < 1e-12);

        // Best pairing: 31 with itself (1.0) plus 30 with 12 (1/3); keeping
        // the sibling pair 30/31 at 0.75 would strand 31 on a 1/3 cell.
        let value = set_similarity(
            &tax,
            &index,
            &wide,
            &codes(&["30", "31"]),
            SetSimMode::BipartiteMatching,
            CsMode::WuPalmer,
        )
        .unwrap();
        assert!((value - 4.0 / 3.0).abs() < 1e-12);

        let value = set_similarity(
            &tax,
            &index,
            &codes(&["1", "11"]),
            &codes(&["30", "31"]),
            SetSimMode::BipartiteMatching,
            CsMode::WuPalmer,
        )
        .unwrap();
        assert!((value - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_bipartite_matching_minimizes_distances() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);

        let value = set_similarity(
            &tax,
            &index,
            &codes(&["30"]),
            &codes(&["31"]),
            SetSimMode::BipartiteMatching,
            CsMode::NguyenAlmubaid,
        )
        .unwrap();
        assert!((value - 2.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_overlapping_sets_fail_under_batet_mean() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);
        let set = codes(&["30", "31"]);

        let err = set_similarity(
            &tax,
            &index,
            &set,
            &set,
            SetSimMode::MeanCs,
            CsMode::Batet,
        )
        .unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_empty_and_unknown_inputs() {
        let tax = fixture_taxonomy();
        let index = levels_index(&tax);

        let err = set_similarity(
            &tax,
            &index,
            &codes(&[]),
            &codes(&["1"]),
            SetSimMode::Jaccard,
            CsMode::WuPalmer,
        )
        .unwrap_err();
        assert!(err.is_input_error());

        let err = set_similarity(
            &tax,
            &index,
            &codes(&["1"]),
            &codes(&["1", "nope"]),
            SetSimMode::Jaccard,
            CsMode::WuPalmer,
        )
        .unwrap_err();
        assert_eq!(err, TaxsimError::unknown_concept("nope"));
    }

    #[test]
    fn test_dedup_preserving_order() {
        let deduped = dedup_preserving_order(&codes(&["7", "3", "7", "1", "3"]));
        assert_eq!(deduped, codes(&["7", "3", "1"]));
    }

    #[test]
    fn test_scale_policy() {
        assert_eq!(scale_to_set_sizes(6.0, 2, 3), 2.0);
        assert_eq!(scale_to_set_sizes(6.0, 3, 2), 2.0);
        assert_eq!(scale_to_set_sizes(0.0, 4, 4), 0.0);
    }
}
