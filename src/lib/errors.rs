//! Custom error types for rowsort operations.

use std::collections::TryReserveError;
use thiserror::Error;

/// Result type alias for rowsort operations
pub type Result<T> = std::result::Result<T, RowsortError>;

/// Error type for rowsort operations
#[derive(Error, Debug)]
pub enum RowsortError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// A row-sized scratch or snapshot buffer could not be allocated.
    ///
    /// Fatal for the whole run: a worker without its buffers cannot keep
    /// the lock-step schedule.
    #[error("Rank {rank}: failed to allocate {what}: {source}")]
    ResourceExhaustion {
        /// Rank of the worker that failed
        rank: usize,
        /// What the allocation was for (e.g., "elbow scratch buffer")
        what: String,
        /// The underlying allocation error
        source: TryReserveError,
    },

    /// A send, receive, wait, or collective operation failed.
    ///
    /// Fatal for the whole run: a stalled worker breaks the lock-step
    /// protocol for every other worker.
    #[error("Rank {rank}: transport {operation} failed: {detail}")]
    TransportFailure {
        /// Rank of the worker that observed the failure
        rank: usize,
        /// The transport operation that failed (e.g., "send", "recv")
        operation: &'static str,
        /// Explanation of the failure
        detail: String,
    },

    /// The (stage, step, chunk) tag packing does not fit the data-tag space
    /// for the configured worker count and chunk divisor.
    #[error(
        "Tag packing for {stages} stages and {chunks} chunks needs {required} bits, \
         only {available} available"
    )]
    TagCapacity {
        /// Bits required to pack the largest (stage, step, chunk) triple
        required: u32,
        /// Bits available in the data-tag space
        available: u32,
        /// Number of stages in the configured schedule
        stages: u32,
        /// Configured chunk divisor
        chunks: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter() {
        let error = RowsortError::InvalidParameter {
            parameter: "chunk-divisor".to_string(),
            reason: "must be >= 1".to_string(),
        };
        let msg = format!("{error}");
        assert!(msg.contains("Invalid parameter 'chunk-divisor'"));
        assert!(msg.contains("must be >= 1"));
    }

    #[test]
    fn test_transport_failure() {
        let error = RowsortError::TransportFailure {
            rank: 3,
            operation: "recv",
            detail: "all peers disconnected".to_string(),
        };
        let msg = format!("{error}");
        assert!(msg.contains("Rank 3"));
        assert!(msg.contains("recv"));
        assert!(msg.contains("all peers disconnected"));
    }

    #[test]
    fn test_tag_capacity() {
        let error =
            RowsortError::TagCapacity { required: 40, available: 31, stages: 20, chunks: 1 << 24 };
        let msg = format!("{error}");
        assert!(msg.contains("needs 40 bits"));
        assert!(msg.contains("only 31 available"));
    }
}
