//! Post-sort validation of local and global order.
//!
//! Validation never mutates data and never aborts the run: local and boundary
//! failures are logged with the offending rank, then folded into a logical
//! AND reduction whose aggregate at the coordinator is the authoritative
//! outcome.

use log::warn;

use crate::errors::{Result, RowsortError};
use crate::sort::Direction;
use crate::transport::{Tag, Transport, Value};

/// Detects whether a row is monotonic, and in which direction.
///
/// Returns `Some(Ascending)` for ascending rows (constant rows count as
/// ascending), `Some(Descending)` for strictly-descending-or-equal rows, and
/// `None` for unsorted rows.
#[must_use]
pub fn local_direction(row: &[Value]) -> Option<Direction> {
    let ascending = row.windows(2).all(|w| w[0] <= w[1]);
    let descending = row.windows(2).all(|w| w[0] >= w[1]);
    if ascending {
        Some(Direction::Ascending)
    } else if descending {
        Some(Direction::Descending)
    } else {
        None
    }
}

/// Checks local monotonicity and cross-worker boundary order.
///
/// Each worker verifies its own row is ascending; every worker except the
/// last then sends its last element to its successor, and every worker except
/// the first checks that its predecessor's last element is <= its own first
/// element. The local pass/fail booleans are AND-reduced to the coordinator
/// (rank 0), which receives `Some(aggregate)`; all other workers receive
/// `None`.
///
/// # Errors
///
/// Only transport failures are errors; order violations are reported through
/// the returned boolean.
pub fn validate_global_order<T: Transport>(
    transport: &mut T,
    row: &[Value],
) -> Result<Option<bool>> {
    let rank = transport.rank();
    let size = transport.group_size();

    let mut ok = row.windows(2).all(|w| w[0] <= w[1]);
    if !ok {
        warn!("validation failed: rank {rank}'s row is not sorted");
    }

    // Boundary check: pass the last element one rank forward.
    if !row.is_empty() {
        if rank + 1 < size {
            transport.send(rank + 1, Tag::BOUNDARY, &row[row.len() - 1..])?;
        }
        if rank > 0 {
            let boundary = transport.recv(rank - 1, Tag::BOUNDARY)?;
            let predecessor_last = match boundary.as_slice() {
                [value] => *value,
                other => {
                    return Err(RowsortError::TransportFailure {
                        rank,
                        operation: "recv",
                        detail: format!(
                            "boundary message from worker {} had {} elements",
                            rank - 1,
                            other.len()
                        ),
                    });
                }
            };
            if predecessor_last > row[0] {
                warn!(
                    "validation failed: rank {rank}'s first element ({}) is smaller than \
                     rank {}'s last element ({predecessor_last})",
                    row[0],
                    rank - 1
                );
                ok = false;
            }
        }
    }

    transport.reduce_and(ok)
}
