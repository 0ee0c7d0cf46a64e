//! Directed local sorting and the elementwise compare-exchange.

use std::cmp::Reverse;
use std::fmt;

use crate::transport::Value;

/// Target order of a row or merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// The direction the bitonic network expects a freshly sorted row to
    /// have: even ranks ascending, odd ranks descending.
    #[must_use]
    pub fn from_rank(rank: usize) -> Self {
        if rank % 2 == 0 { Direction::Ascending } else { Direction::Descending }
    }

    /// The opposite direction.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    #[must_use]
    pub fn is_ascending(self) -> bool {
        matches!(self, Direction::Ascending)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => write!(f, "ascending"),
            Direction::Descending => write!(f, "descending"),
        }
    }
}

/// Sorts one row in place in the given direction.
///
/// No stability requirement, so this uses the unstable sort. Invoked once per
/// worker before the first stage to establish the alternating building blocks
/// the bitonic network expects.
pub fn sort_row(row: &mut [Value], direction: Direction) {
    match direction {
        Direction::Ascending => row.sort_unstable(),
        Direction::Descending => row.sort_unstable_by_key(|&v| Reverse(v)),
    }
}

/// Elementwise compare-exchange between the local chunk and a partner's chunk.
///
/// Ascending keeps the smaller of each positional pair locally; descending
/// keeps the larger. The partner runs the same merge with the opposite
/// effective direction, so between them every pair is split exactly once.
pub fn compare_exchange(local: &mut [Value], incoming: &[Value], direction: Direction) {
    debug_assert_eq!(local.len(), incoming.len());
    match direction {
        Direction::Ascending => {
            for (mine, theirs) in local.iter_mut().zip(incoming) {
                if *mine > *theirs {
                    *mine = *theirs;
                }
            }
        }
        Direction::Descending => {
            for (mine, theirs) in local.iter_mut().zip(incoming) {
                if *mine < *theirs {
                    *mine = *theirs;
                }
            }
        }
    }
}
