//! Message tags for disambiguating in-flight transfers.
//!
//! Every point-to-point message carries a [`Tag`]. Data messages pack their
//! (stage, step, chunk) coordinates into disjoint bit ranges of one integer so
//! that chunks belonging to different steps are never confused, even when
//! several transfers to the same partner are in flight at once. Collective
//! operations use reserved control tags that can never collide with data tags.
//!
//! The packing is validated up front: [`TagScheme::new`] computes the bit
//! width each field needs for the configured stage count and chunk divisor and
//! refuses configurations whose packed tags would not fit the data-tag space.

use crate::errors::{Result, RowsortError};

/// Bits available for packed data tags. The top bit is reserved to mark
/// control tags.
const DATA_TAG_BITS: u32 = 31;

/// An integer message tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub(crate) u32);

impl Tag {
    const CONTROL: u32 = 1 << DATA_TAG_BITS;

    /// Boundary-element exchange during global-order validation.
    pub const BOUNDARY: Tag = Tag(Self::CONTROL | 1);
    /// Logical AND reduction to the coordinator.
    pub const REDUCE_AND: Tag = Tag(Self::CONTROL | 2);
    /// Numeric maximum reduction to the coordinator.
    pub const REDUCE_MAX: Tag = Tag(Self::CONTROL | 3);
}

/// Packs (stage, step, chunk) triples into unique data tags.
///
/// Field layout, from the least significant bit: step, stage, chunk. The
/// widths are sized for the largest value each field can take during one run,
/// so distinct triples always map to distinct tags.
#[derive(Debug, Clone, Copy)]
pub struct TagScheme {
    step_bits: u32,
    stage_bits: u32,
}

/// Bits needed to represent values in `0..=max_value`.
fn bits_for(max_value: u64) -> u32 {
    u64::BITS - max_value.leading_zeros()
}

impl TagScheme {
    /// Builds a scheme for a schedule of `stages` stages and at most
    /// `chunk_divisor` chunks per exchange.
    ///
    /// # Errors
    ///
    /// Returns [`RowsortError::TagCapacity`] if the packed tag for the largest
    /// (stage, step, chunk) triple would not fit the data-tag space.
    pub fn new(stages: u32, chunk_divisor: usize) -> Result<Self> {
        let step_bits = bits_for(u64::from(stages.saturating_sub(1)));
        let stage_bits = bits_for(u64::from(stages));
        let chunk_bits = bits_for(chunk_divisor.saturating_sub(1) as u64);

        let required = step_bits + stage_bits + chunk_bits;
        if required > DATA_TAG_BITS {
            return Err(RowsortError::TagCapacity {
                required,
                available: DATA_TAG_BITS,
                stages,
                chunks: chunk_divisor,
            });
        }
        Ok(Self { step_bits, stage_bits })
    }

    /// The tag for chunk `chunk` of the exchange at (`stage`, `step`).
    #[must_use]
    pub fn data(&self, stage: u32, step: u32, chunk: usize) -> Tag {
        debug_assert!(step < (1 << self.step_bits.max(1)));
        debug_assert!(stage < (1 << self.stage_bits));
        Tag(((chunk as u32) << (self.stage_bits + self.step_bits))
            | (stage << self.step_bits)
            | step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bits_for() {
        assert_eq!(bits_for(0), 0);
        assert_eq!(bits_for(1), 1);
        assert_eq!(bits_for(7), 3);
        assert_eq!(bits_for(8), 4);
    }

    #[test]
    fn test_data_tags_unique() {
        // 16 workers -> 4 stages, divisor 8: every triple gets its own tag.
        let scheme = TagScheme::new(4, 8).unwrap();
        let mut seen = HashSet::new();
        for stage in 1..=4 {
            for step in 0..stage {
                for chunk in 0..8 {
                    assert!(
                        seen.insert(scheme.data(stage, step, chunk)),
                        "duplicate tag for stage {stage} step {step} chunk {chunk}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_data_tags_never_control() {
        let scheme = TagScheme::new(16, 1024).unwrap();
        for stage in [1, 8, 16] {
            for step in 0..stage {
                for chunk in [0, 511, 1023] {
                    let tag = scheme.data(stage, step, chunk);
                    assert_eq!(tag.0 & Tag::CONTROL, 0);
                    assert_ne!(tag, Tag::BOUNDARY);
                    assert_ne!(tag, Tag::REDUCE_AND);
                    assert_ne!(tag, Tag::REDUCE_MAX);
                }
            }
        }
    }

    #[test]
    fn test_capacity_exceeded() {
        let result = TagScheme::new(20, 1 << 24);
        assert!(matches!(result, Err(RowsortError::TagCapacity { .. })));
    }

    #[test]
    fn test_single_worker_schedule() {
        // P = 1 means zero stages; the scheme is never used but must build.
        TagScheme::new(0, 8).unwrap();
    }
}
