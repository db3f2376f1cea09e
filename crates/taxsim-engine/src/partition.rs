//! Row partitioning for upper-triangle matrix work.
//!
//! Row `i` of an upper-triangle computation has `n - i` cells, so equal row
//! counts would load the first worker far more than the last. Blocks instead
//! grow along a geometric curve: block starts are drawn from a log-spaced
//! ramp over two decades, anchored so the first block starts at row 0. Early
//! (expensive) rows land in small blocks, late (cheap) rows in large ones.

use std::ops::Range;

/// Split rows `0..n` into `workers` contiguous blocks of growing size.
///
/// Blocks are returned in row order and cover `0..n` exactly; with more
/// workers than rows some blocks come out empty, which callers skip.
pub fn row_blocks(n: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    if workers == 1 {
        return vec![0..n];
    }

    let scale = n as f64 / 10.0;
    let span = (workers - 1) as f64;
    let anchor = scale * 10f64.powf(-1.0);
    let starts: Vec<usize> = (0..workers)
        .map(|k| {
            let raw = scale * 10f64.powf(-1.0 + 2.0 * k as f64 / span);
            // Rounding must never push a start past the end of the matrix.
            ((raw - anchor).ceil() as usize).min(n)
        })
        .collect();

    (0..workers)
        .map(|k| {
            let stop = if k + 1 < workers { starts[k + 1] } else { n };
            starts[k]..stop
        })
        .collect()
}
