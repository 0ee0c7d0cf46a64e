//! Sort randomly generated rows across an in-process worker group.
//!
//! Spawns one worker thread per rank, fills each worker's row with seeded
//! random values, runs the distributed bitonic sort, and validates that the
//! rank-ordered concatenation of all rows is globally ascending.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rowsort_lib::logging::OperationTimer;
use rowsort_lib::rows::{format_row, random_row};
use rowsort_lib::sort::{bitonic_sort, SortOptions, DEFAULT_CHUNK_DIVISOR};
use rowsort_lib::transport::{ThreadGroup, Transport, Value};
use rowsort_lib::validate::{local_direction, validate_global_order};
use std::time::Instant;

/// Widest row supported: 2^30 values keeps one row under 4 GiB.
const MAX_LOG2_VALUES: u32 = 30;

/// Largest worker group: 2^10 threads in one process.
const MAX_LOG2_WORKERS: u32 = 10;

/// Sort rows of random integers across a group of workers.
///
/// Runs the full distributed bitonic sort with one thread per worker.
#[derive(Debug, Parser)]
#[command(
    name = "sort",
    about = "Sort rows of random integers across a group of workers",
    long_about = r"
Sort a randomly generated, row-partitioned sequence with the distributed
bitonic sorting engine.

Each of the 2^P workers owns one row of 2^Q integers. Workers first sort
their rows in alternating directions, then walk the log2(P) stages of the
bitonic merge network: every step exchanges the full row with one hypercube
partner in bounded-size chunks and keeps the half that belongs locally, and
every stage ends with a linear-time elbow merge. Afterwards the rows,
read in rank order, form one globally ascending sequence, which is checked
by the built-in validator.

EXAMPLES:

  # 8 workers, 2^20 values each
  rowsort sort 20 3

  # Reproducible run with a fixed seed, printing every sorted row
  rowsort sort 4 2 --seed 42 --print-rows

  # Coarser chunking: split each exchange into 16 pieces
  rowsort sort 24 2 --chunk-divisor 16
"
)]
pub struct Sort {
    /// log2 of the row length (each worker holds 2^Q values).
    #[arg(value_name = "Q")]
    pub log2_values: u32,

    /// log2 of the worker count (2^P workers).
    #[arg(value_name = "P")]
    pub log2_workers: u32,

    /// Seed for the random row data; a random seed is drawn if omitted.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Number of chunks each row exchange is split into.
    #[arg(long = "chunk-divisor", default_value_t = DEFAULT_CHUNK_DIVISOR)]
    pub chunk_divisor: usize,

    /// Exclusive upper bound for the generated values.
    #[arg(long = "max-value", default_value_t = 300)]
    pub max_value: Value,

    /// Print every rank's sorted row in rank order.
    #[arg(long = "print-rows")]
    pub print_rows: bool,
}

impl crate::commands::command::Command for Sort {
    fn execute(&self) -> Result<()> {
        if self.log2_values > MAX_LOG2_VALUES {
            bail!("Q must be <= {MAX_LOG2_VALUES}, got {}", self.log2_values);
        }
        if self.log2_workers > MAX_LOG2_WORKERS {
            bail!("P must be <= {MAX_LOG2_WORKERS}, got {}", self.log2_workers);
        }
        if self.max_value <= 0 {
            bail!("--max-value must be positive, got {}", self.max_value);
        }

        let row_len = 1usize << self.log2_values;
        let workers = 1usize << self.log2_workers;
        let seed = self.seed.unwrap_or_else(rand::random);
        let options = SortOptions { chunk_divisor: self.chunk_divisor };

        info!(
            "Sorting {workers} x {row_len} values (seed {seed}, chunk divisor {})",
            self.chunk_divisor
        );
        let timer = OperationTimer::new("Distributed bitonic sort");

        let outcomes = ThreadGroup::run(workers, |mut transport| {
            let rank = transport.rank();
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(rank as u64));
            let mut row = random_row(row_len, self.max_value, &mut rng);

            transport.barrier()?;
            let start = Instant::now();
            bitonic_sort(&mut transport, &mut row, &options)?;
            transport.barrier()?;

            if let Some(slowest) = transport.reduce_max(start.elapsed().as_secs_f64())? {
                info!("Sorting all rows: done in {slowest:.6}s (slowest worker)");
            }

            match local_direction(&row) {
                Some(direction) => info!("rank {rank} is sorted in order: {direction}"),
                None => warn!("rank {rank} is not sorted"),
            }

            let aggregate = validate_global_order(&mut transport, &row)?;
            if let Some(passed) = aggregate {
                if passed {
                    info!("Validation passed: all rows sorted and globally ordered");
                } else {
                    error!("Validation failed: concatenated rows are not globally sorted");
                }
            }
            Ok((row, aggregate))
        })
        .context("distributed sort failed")?;

        timer.log_completion((workers * row_len) as u64);

        if self.print_rows {
            for (rank, (row, _)) in outcomes.iter().enumerate() {
                println!("{}", format_row(rank, row));
            }
        }

        // Rank 0 is the coordinator; its aggregate is the authoritative outcome.
        match outcomes.first().and_then(|(_, aggregate)| *aggregate) {
            Some(true) => Ok(()),
            Some(false) => bail!("validation failed: output is not globally sorted"),
            None => bail!("coordinator reported no validation outcome"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::command::Command;

    fn sort_args(args: &[&str]) -> Sort {
        Sort::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let sort = sort_args(&["sort", "4", "2"]);
        assert_eq!(sort.log2_values, 4);
        assert_eq!(sort.log2_workers, 2);
        assert_eq!(sort.chunk_divisor, DEFAULT_CHUNK_DIVISOR);
        assert_eq!(sort.max_value, 300);
        assert!(sort.seed.is_none());
        assert!(!sort.print_rows);
    }

    #[test]
    fn test_missing_positionals_rejected() {
        assert!(Sort::try_parse_from(["sort", "4"]).is_err());
        assert!(Sort::try_parse_from(["sort"]).is_err());
    }

    #[test]
    fn test_small_run_end_to_end() {
        let sort = sort_args(&["sort", "5", "2", "--seed", "42"]);
        sort.execute().unwrap();
    }

    #[test]
    fn test_limits_enforced() {
        assert!(sort_args(&["sort", "31", "1"]).execute().is_err());
        assert!(sort_args(&["sort", "4", "11"]).execute().is_err());
        assert!(sort_args(&["sort", "4", "1", "--max-value", "0"]).execute().is_err());
    }
}
