//! Linear-time local merge of a bitonic row ("elbow" rotation merge).
//!
//! After a stage's merge-exchange steps a worker's row is bitonic: read
//! circularly it has a single local minimum and a single local maximum. The
//! rotation point at the minimum (ascending target) or maximum (descending
//! target) is the elbow. Two cursors walk the row circularly outward from the
//! elbow in opposite directions; each is the head of a run that is monotonic
//! in the target direction, so a plain two-run merge restores full monotonic
//! order in one pass — no comparison sort needed.

use crate::sort::local::Direction;
use crate::transport::Value;

/// Index of the elbow for the given target direction.
fn find_elbow(row: &[Value], direction: Direction) -> usize {
    let positions = row.iter().enumerate();
    let elbow = match direction {
        Direction::Ascending => positions.min_by_key(|&(_, v)| v),
        Direction::Descending => positions.max_by_key(|&(_, v)| v),
    };
    elbow.map_or(0, |(i, _)| i)
}

/// Merges a bitonic row into full monotonic order in place.
///
/// `scratch` is reused across invocations; it is cleared and refilled here and
/// must have capacity for `row.len()` elements (the scheduler reserves it once
/// per run). O(n) time, O(n) auxiliary space.
///
/// The input must genuinely be bitonic. The two cursors start adjacent and
/// move apart, so together they tile the row exactly once regardless of the
/// comparison outcomes — but a non-bitonic input silently produces unordered
/// output rather than an error.
pub fn elbow_merge(row: &mut [Value], direction: Direction, scratch: &mut Vec<Value>) {
    let n = row.len();
    if n <= 1 {
        return;
    }

    let elbow = find_elbow(row, direction);
    let mut left = elbow;
    let mut right = (elbow + 1) % n;

    scratch.clear();
    for _ in 0..n {
        let take_left = match direction {
            Direction::Ascending => row[left] <= row[right],
            Direction::Descending => row[left] >= row[right],
        };
        if take_left {
            scratch.push(row[left]);
            left = (left + n - 1) % n;
        } else {
            scratch.push(row[right]);
            right = (right + 1) % n;
        }
    }
    row.copy_from_slice(scratch);
}
