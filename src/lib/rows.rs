//! Row generation and rendering helpers for the CLI and tests.

use rand::Rng;

use crate::transport::Value;

/// Fills a fresh row with `len` values drawn uniformly from `0..max_value`.
///
/// The caller seeds the RNG per rank so every worker gets an independent,
/// reproducible row.
#[must_use]
pub fn random_row<R: Rng>(len: usize, max_value: Value, rng: &mut R) -> Vec<Value> {
    (0..len).map(|_| rng.random_range(0..max_value)).collect()
}

/// Renders one rank's row as a single line, e.g. `Rank 2: 1, 4, 9`.
#[must_use]
pub fn format_row(rank: usize, row: &[Value]) -> String {
    let values: Vec<String> = row.iter().map(ToString::to_string).collect();
    format!("Rank {rank}: {}", values.join(", "))
}
