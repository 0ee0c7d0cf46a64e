//! The bitonic stage/step schedule.
//!
//! For P workers the network has log2(P) stages. Within stage `s` every
//! worker walks steps `s-1..=0`, exchanging with the partner found by flipping
//! bit `step` of its own rank (one hypercube dimension per step), and finishes
//! the stage by elbow-merging its now-bitonic row into the stage's target
//! direction. After the final stage every row is sorted and the rank-ordered
//! concatenation of all rows is one ascending sequence.

use log::debug;
use std::time::Instant;

use crate::errors::{Result, RowsortError};
use crate::sort::elbow::elbow_merge;
use crate::sort::exchange::merge_exchange;
use crate::sort::local::{sort_row, Direction};
use crate::transport::{TagScheme, Transport, Value};

/// Default number of chunks a row is split into per exchange.
pub const DEFAULT_CHUNK_DIVISOR: usize = 8;

/// Tuning options for the distributed sort.
#[derive(Debug, Clone, Copy)]
pub struct SortOptions {
    /// Number of chunks each row exchange is split into. Bounds message size
    /// and lets transfer latency overlap with merge work.
    pub chunk_divisor: usize,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self { chunk_divisor: DEFAULT_CHUNK_DIVISOR }
    }
}

/// Sorts `row` collectively across the whole worker group.
///
/// Every worker calls this with its own row; when all calls return, each row
/// is ascending and rows concatenated in rank order form one globally
/// ascending sequence. The row length must be uniform across workers and the
/// group size must be a power of two — both are agreed on before the call.
///
/// # Errors
///
/// Returns [`RowsortError::InvalidParameter`] for a non-power-of-two group or
/// a zero chunk divisor, [`RowsortError::TagCapacity`] if the configuration
/// exceeds the tag space, and propagates any allocation or transport failure,
/// all of which are fatal to the whole run.
pub fn bitonic_sort<T: Transport>(
    transport: &mut T,
    row: &mut [Value],
    options: &SortOptions,
) -> Result<()> {
    let rank = transport.rank();
    let size = transport.group_size();

    if !size.is_power_of_two() {
        return Err(RowsortError::InvalidParameter {
            parameter: "worker count".to_string(),
            reason: format!("must be a power of two, got {size}"),
        });
    }
    if options.chunk_divisor == 0 {
        return Err(RowsortError::InvalidParameter {
            parameter: "chunk-divisor".to_string(),
            reason: "must be >= 1".to_string(),
        });
    }

    let stages = size.trailing_zeros();
    let tags = TagScheme::new(stages, options.chunk_divisor)?;

    let start = Instant::now();
    sort_row(row, Direction::from_rank(rank));
    debug!(
        "rank {rank}: initial {} sort took {:.6}s",
        Direction::from_rank(rank),
        start.elapsed().as_secs_f64()
    );
    transport.barrier()?;

    let mut scratch: Vec<Value> = Vec::new();
    scratch.try_reserve_exact(row.len()).map_err(|source| {
        RowsortError::ResourceExhaustion { rank, what: "elbow scratch buffer".to_string(), source }
    })?;

    for stage in 1..=stages {
        let num_chunks = 1usize << (stages - stage);
        let chunk_size = size / num_chunks;
        let direction =
            if (rank / chunk_size) % 2 == 0 { Direction::Ascending } else { Direction::Descending };

        for step in (0..stage).rev() {
            let partner = rank ^ (1 << step);
            if partner >= size {
                // Unreachable for a power-of-two group; kept as a guard.
                continue;
            }
            let effective = if rank < partner { direction } else { direction.flip() };
            merge_exchange(
                transport,
                row,
                partner,
                effective,
                stage,
                step,
                &tags,
                options.chunk_divisor,
            )?;
        }

        let start = Instant::now();
        elbow_merge(row, direction, &mut scratch);
        debug!(
            "rank {rank}: stage {stage} elbow merge ({direction}) took {:.6}s",
            start.elapsed().as_secs_f64()
        );
    }
    Ok(())
}
