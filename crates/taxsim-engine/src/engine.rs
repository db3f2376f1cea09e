//! Matrix orchestration.
//!
//! The engine computes the upper triangle (diagonal included) of a symmetric
//! pairwise matrix, fanning contiguous row blocks out to scoped worker
//! threads. Workers compute their rows into private buffers and report over
//! a channel; only the orchestrator writes the shared matrix, by block index,
//! after results arrive. The triangle is then mirrored and optionally
//! normalized.
//!
//! Row-block boundaries come from [`row_blocks`](crate::partition::row_blocks)
//! and depend only on `(n, workers)`, and each worker walks its rows in
//! order, so sequential and parallel runs evaluate the same pairs in the
//! same per-row order and produce bit-identical matrices.

use std::ops::Range;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use tracing::debug;

use taxsim_core::config::{ConceptMatrixConfig, SetMatrixConfig};
use taxsim_core::cs::concept_similarity;
use taxsim_core::error::{TaxsimError, TaxsimResult};
use taxsim_core::ic::IcIndex;
use taxsim_core::setsim::{self, set_similarity};
use taxsim_core::taxonomy::Taxonomy;

use crate::matrix::SimilarityMatrix;
use crate::partition::row_blocks;

/// Pairwise CS matrix over an ordered concept list.
///
/// Row/column `k` of the result corresponds to `codes[k]`. Every code is
/// resolved against the taxonomy before any work is scheduled, so an unknown
/// concept fails identically whatever the worker count.
///
/// # Errors
///
/// - `InvalidConfiguration` from [`ConceptMatrixConfig::validate`].
/// - `InvalidInput` for an empty code list.
/// - `UnknownConcept` for a code absent from the taxonomy.
/// - `WorkerFailure` if a row-block worker panics.
pub fn concept_similarity_matrix(
    tax: &Taxonomy,
    codes: &[String],
    config: &ConceptMatrixConfig,
) -> TaxsimResult<SimilarityMatrix> {
    config.validate()?;
    if codes.is_empty() {
        return Err(TaxsimError::invalid_input(
            "concept matrix requires a non-empty code list",
        ));
    }
    for code in codes {
        if !tax.contains(code) {
            return Err(TaxsimError::unknown_concept(code.as_str()));
        }
    }

    let index = IcIndex::new(tax, config.ic_mode);
    let workers = config.workers.resolve();
    let started = Instant::now();

    let mut matrix = pairwise_matrix(codes.len(), workers, |i, j| {
        concept_similarity(tax, &index, &codes[i], &codes[j], config.cs_mode)
    })?;
    finish(&mut matrix, config.normalize);

    debug!(
        concepts = codes.len(),
        workers,
        cs_mode = %config.cs_mode,
        ic_mode = %config.ic_mode,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "concept similarity matrix computed"
    );
    Ok(matrix)
}

/// Pairwise SetSim matrix over an ordered list of concept-sets.
///
/// Each set is de-duplicated up front (first occurrence wins), so per-pair
/// evaluation and size scaling both see the collapsed sets.
///
/// # Errors
///
/// - `InvalidConfiguration` from [`SetMatrixConfig::validate`].
/// - `InvalidInput` for an empty set list or an empty member set.
/// - `UnknownConcept` for a member code absent from the taxonomy.
/// - `WorkerFailure` if a row-block worker panics.
pub fn set_similarity_matrix(
    tax: &Taxonomy,
    sets: &[Vec<String>],
    config: &SetMatrixConfig,
) -> TaxsimResult<SimilarityMatrix> {
    config.validate()?;
    if sets.is_empty() {
        return Err(TaxsimError::invalid_input(
            "set matrix requires a non-empty list of concept-sets",
        ));
    }

    let sets: Vec<Vec<String>> = sets.iter().map(|s| setsim::dedup_preserving_order(s)).collect();
    for (position, set) in sets.iter().enumerate() {
        if set.is_empty() {
            return Err(TaxsimError::invalid_input(format!(
                "concept-set at position {position} is empty"
            )));
        }
        for code in set {
            if !tax.contains(code) {
                return Err(TaxsimError::unknown_concept(code.as_str()));
            }
        }
    }

    let index = IcIndex::new(tax, config.ic_mode);
    let workers = config.workers.resolve();
    let started = Instant::now();

    let mut matrix = pairwise_matrix(sets.len(), workers, |i, j| {
        let raw = set_similarity(
            tax,
            &index,
            &sets[i],
            &sets[j],
            config.setsim_mode,
            config.cs_mode,
        )?;
        Ok(if config.scale_to_set_sizes {
            setsim::scale_to_set_sizes(raw, sets[i].len(), sets[j].len())
        } else {
            raw
        })
    })?;
    finish(&mut matrix, config.normalize);

    debug!(
        sets = sets.len(),
        workers,
        setsim_mode = %config.setsim_mode,
        cs_mode = %config.cs_mode,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "set similarity matrix computed"
    );
    Ok(matrix)
}

/// Upper-triangle pairwise computation with row-block fan-out.
///
/// Calls `pair_fn(i, j)` for every `i <= j` and stores the result at
/// `M[i][j]`; the lower triangle is left for [`SimilarityMatrix::mirror_upper`].
/// With `workers <= 1` everything runs on the calling thread. `pair_fn`
/// errors abort the whole computation; the reported error is the one the
/// sequential path would have hit first.
pub fn pairwise_matrix<F>(n: usize, workers: usize, pair_fn: F) -> TaxsimResult<SimilarityMatrix>
where
    F: Fn(usize, usize) -> TaxsimResult<f64> + Sync,
{
    if workers <= 1 {
        let mut matrix = SimilarityMatrix::zeroed(n);
        let rows = compute_block(&(0..n), n, &pair_fn)?;
        write_block(&mut matrix, 0, &rows);
        return Ok(matrix);
    }

    let blocks = row_blocks(n, workers);
    let mut matrix = SimilarityMatrix::zeroed(n);
    let mut failures: Vec<(usize, TaxsimError)> = Vec::new();
    let pair_fn = &pair_fn;

    thread::scope(|scope| {
        let (sender, receiver) = mpsc::channel();
        let mut spawned = 0;

        for (block_idx, block) in blocks.iter().enumerate() {
            if block.is_empty() {
                continue;
            }
            let sender = sender.clone();
            let block = block.clone();
            scope.spawn(move || {
                let outcome = catch_unwind(AssertUnwindSafe(|| compute_block(&block, n, pair_fn)))
                    .unwrap_or_else(|_| {
                        Err(TaxsimError::worker_failure(block_idx, "row-block worker panicked"))
                    });
                // The orchestrator holds the receiver until every block has
                // reported, so this send cannot fail.
                let _ = sender.send((block_idx, outcome));
            });
            spawned += 1;
        }
        drop(sender);

        for _ in 0..spawned {
            match receiver.recv() {
                Ok((block_idx, Ok(rows))) => {
                    write_block(&mut matrix, blocks[block_idx].start, &rows);
                }
                Ok((block_idx, Err(err))) => failures.push((block_idx, err)),
                Err(_) => {
                    failures.push((
                        blocks.len(),
                        TaxsimError::worker_failure(
                            blocks.len(),
                            "result channel closed before all blocks reported",
                        ),
                    ));
                    break;
                }
            }
        }
    });

    // Workers drain in completion order; report the earliest block's error
    // so parallel runs fail the same way sequential ones do.
    match failures.into_iter().min_by_key(|(block_idx, _)| *block_idx) {
        Some((_, err)) => Err(err),
        None => Ok(matrix),
    }
}

/// Rows `rows.start..rows.end` of the upper triangle, diagonal first.
///
/// Row `i` comes back as the `n - i` cells `M[i][i..n]`.
fn compute_block<F>(rows: &Range<usize>, n: usize, pair_fn: &F) -> TaxsimResult<Vec<Vec<f64>>>
where
    F: Fn(usize, usize) -> TaxsimResult<f64>,
{
    let mut out = Vec::with_capacity(rows.len());
    for i in rows.clone() {
        let mut row = Vec::with_capacity(n - i);
        for j in i..n {
            row.push(pair_fn(i, j)?);
        }
        out.push(row);
    }
    Ok(out)
}

fn write_block(matrix: &mut SimilarityMatrix, start_row: usize, rows: &[Vec<f64>]) {
    for (offset, row) in rows.iter().enumerate() {
        matrix.set_row_tail(start_row + offset, row);
    }
}

fn finish(matrix: &mut SimilarityMatrix, normalize: bool) {
    matrix.mirror_upper();
    if normalize {
        let max = matrix.max_abs();
        if max > 0.0 {
            matrix.scale(1.0 / max);
        }
    }
}
