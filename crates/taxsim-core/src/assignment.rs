//! Optimal assignment over a rectangular weight matrix.
//!
//! Backs the `bipartite_matching` set measure: given the pairwise CS matrix
//! of two concept-sets, find the one-to-one pairing with minimum total cost
//! (distance-style CS) or maximum total weight (similarity-style CS).
//!
//! Hungarian algorithm in the potentials formulation, O(n²·m) for an `n×m`
//! matrix with `n <= m`; callers with more rows than columns transpose
//! first. With `n < m`, the `m - n` surplus columns stay unmatched.

use crate::error::{TaxsimError, TaxsimResult};

/// An optimal one-to-one pairing of matrix rows to columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Matched column index per row.
    pub row_to_col: Vec<usize>,
    /// Sum of the matched entries of the original matrix.
    pub total: f64,
}

/// Minimum-cost assignment.
pub fn solve_min(costs: &[Vec<f64>]) -> TaxsimResult<Assignment> {
    validate(costs)?;
    let row_to_col = hungarian(costs);
    let total = matched_total(costs, &row_to_col);
    Ok(Assignment { row_to_col, total })
}

/// Maximum-weight assignment.
///
/// Solved by negating the matrix; the reported total is over the original
/// weights.
pub fn solve_max(costs: &[Vec<f64>]) -> TaxsimResult<Assignment> {
    validate(costs)?;
    let negated: Vec<Vec<f64>> = costs
        .iter()
        .map(|row| row.iter().map(|w| -w).collect())
        .collect();
    let row_to_col = hungarian(&negated);
    let total = matched_total(costs, &row_to_col);
    Ok(Assignment { row_to_col, total })
}

fn validate(costs: &[Vec<f64>]) -> TaxsimResult<()> {
    let rows = costs.len();
    if rows == 0 {
        return Err(TaxsimError::invalid_input(
            "assignment requires a non-empty matrix",
        ));
    }
    let cols = costs[0].len();
    if cols == 0 {
        return Err(TaxsimError::invalid_input(
            "assignment requires at least one column",
        ));
    }
    if rows > cols {
        return Err(TaxsimError::invalid_input(format!(
            "assignment requires rows <= columns, got {rows}x{cols}"
        )));
    }
    for row in costs {
        if row.len() != cols {
            return Err(TaxsimError::invalid_input(
                "assignment matrix rows must all have the same length",
            ));
        }
        if row.iter().any(|w| !w.is_finite()) {
            return Err(TaxsimError::invalid_input(
                "assignment weights must be finite",
            ));
        }
    }
    Ok(())
}

/// Minimum-cost matching for `n <= m`; returns the matched column per row.
///
/// Row and column potentials `u`/`v` keep reduced costs non-negative while
/// each row is grown into the matching along a shortest augmenting path.
/// Indices are 1-based internally; slot 0 is the virtual unmatched marker.
fn hungarian(costs: &[Vec<f64>]) -> Vec<usize> {
    let n = costs.len();
    let m = costs[0].len();

    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; m + 1];
    // p[j] = row matched to column j (0 = free).
    let mut p = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;
            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let cur = costs[i0 - 1][j - 1] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Unwind the augmenting path back to the virtual column.
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut row_to_col = vec![0usize; n];
    for j in 1..=m {
        if p[j] > 0 {
            row_to_col[p[j] - 1] = j - 1;
        }
    }
    row_to_col
}

fn matched_total(costs: &[Vec<f64>], row_to_col: &[usize]) -> f64 {
    row_to_col
        .iter()
        .enumerate()
        .map(|(row, col)| costs[row][*col])
        .sum()
}
