//! Dense pairwise result matrix.

use serde::{Deserialize, Serialize};

/// An `n×n` real matrix in row-major storage.
///
/// The engine fills the upper triangle (diagonal included) and mirrors it,
/// so a finished matrix is always symmetric. Exported as plain nested rows
/// via [`SimilarityMatrix::to_rows`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// A zero-filled `n×n` matrix.
    pub fn zeroed(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Cell value; panics when an index is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "matrix index out of range");
        self.data[i * self.n + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.n && j < self.n, "matrix index out of range");
        self.data[i * self.n + j] = value;
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Write the cells of row `i` from the diagonal rightward.
    ///
    /// `values[0]` lands on `M[i][i]`; the slice must hold exactly `n - i`
    /// entries.
    pub fn set_row_tail(&mut self, i: usize, values: &[f64]) {
        assert_eq!(values.len(), self.n - i, "row tail has the wrong length");
        let offset = i * self.n + i;
        self.data[offset..offset + values.len()].copy_from_slice(values);
    }

    /// Copy the strict upper triangle onto the lower one.
    pub fn mirror_upper(&mut self) {
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                self.data[j * self.n + i] = self.data[i * self.n + j];
            }
        }
    }

    /// Largest absolute cell value (0 for an all-zero matrix).
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }

    /// Multiply every cell by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.data {
            *value *= factor;
        }
    }

    /// The matrix as owned nested rows, for export.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n).map(|i| self.row(i).to_vec()).collect()
    }
}
