//! Partitioning a row into transport-sized chunks.

use std::ops::Range;

/// Splits `0..len` into at most `divisor` contiguous spans.
///
/// Every span except possibly the last has `len.div_ceil(divisor)` elements;
/// the last is truncated to the remainder and zero-length trailing spans are
/// skipped entirely. The spans form an exact covering partition of the row:
/// no gap, no overlap.
///
/// # Panics
///
/// Panics in debug builds if `divisor` is zero; callers validate the divisor
/// before the schedule starts.
pub fn chunk_spans(len: usize, divisor: usize) -> impl Iterator<Item = Range<usize>> {
    debug_assert!(divisor > 0);
    let chunk_elements = len.div_ceil(divisor).max(1);
    (0..len).step_by(chunk_elements).map(move |start| start..(start + chunk_elements).min(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sizes(len: usize, divisor: usize) -> Vec<usize> {
        chunk_spans(len, divisor).map(|span| span.len()).collect()
    }

    #[test]
    fn test_divisor_eight_length_ten() {
        // A covering partition transferring exactly 10 elements.
        assert_eq!(sizes(10, 8), vec![2, 2, 2, 2, 2]);
    }

    #[rstest]
    #[case(0, 8)]
    #[case(1, 8)]
    #[case(8, 8)]
    #[case(10, 8)]
    #[case(17, 4)]
    #[case(5, 16)]
    #[case(1024, 8)]
    fn test_exact_cover(#[case] len: usize, #[case] divisor: usize) {
        let mut next = 0;
        for span in chunk_spans(len, divisor) {
            assert_eq!(span.start, next, "gap or overlap at {next}");
            assert!(span.end > span.start, "zero-length span emitted");
            next = span.end;
        }
        assert_eq!(next, len, "partition does not cover the row");
        assert!(sizes(len, divisor).len() <= divisor.max(1));
    }

    #[test]
    fn test_empty_row_has_no_chunks() {
        assert_eq!(chunk_spans(0, 8).count(), 0);
    }

    #[test]
    fn test_divisor_larger_than_row() {
        // One element per chunk, surplus chunks skipped.
        assert_eq!(sizes(3, 16), vec![1, 1, 1]);
    }
}
