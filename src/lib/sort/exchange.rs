//! Pairwise merge-exchange with chunked, overlapped transport.
//!
//! One merge step exchanges the full row content with a single partner and
//! keeps, elementwise, the half that belongs on this worker's side of the
//! split. The row is shipped in bounded-size chunks so transfer latency
//! overlaps with the compare-exchange work: all chunk transfers are issued up
//! front, then each receive is awaited exactly when its chunk is merged.

use log::debug;
use std::time::Instant;

use crate::errors::{Result, RowsortError};
use crate::sort::chunks::chunk_spans;
use crate::sort::local::{compare_exchange, Direction};
use crate::transport::{TagScheme, Transport, Value};

/// Exchanges the row with `partner` and merges it under `direction`.
///
/// Afterwards this worker holds, at every position, the minimum (ascending)
/// or maximum (descending) of its own and the partner's element. The partner
/// performs the same step with the opposite effective direction, so together
/// the pair realizes one level of the bitonic merge.
///
/// The outgoing payload is a snapshot of the row taken before any receive can
/// mutate it; the snapshot is owned by the transport for the duration of each
/// send, and all sends are awaited before this function returns.
///
/// # Errors
///
/// Any allocation or transport failure is fatal to the whole run.
pub fn merge_exchange<T: Transport>(
    transport: &mut T,
    row: &mut [Value],
    partner: usize,
    direction: Direction,
    stage: u32,
    step: u32,
    tags: &TagScheme,
    chunk_divisor: usize,
) -> Result<()> {
    let rank = transport.rank();

    let mut snapshot: Vec<Value> = Vec::new();
    snapshot.try_reserve_exact(row.len()).map_err(|source| {
        RowsortError::ResourceExhaustion {
            rank,
            what: "merge-exchange send snapshot".to_string(),
            source,
        }
    })?;
    snapshot.extend_from_slice(row);

    let spans: Vec<_> = chunk_spans(row.len(), chunk_divisor).collect();
    let mut sends = Vec::with_capacity(spans.len());
    let mut recvs = Vec::with_capacity(spans.len());

    let start = Instant::now();
    for (chunk, span) in spans.iter().enumerate() {
        let tag = tags.data(stage, step, chunk);
        sends.push(transport.start_send(partner, tag, snapshot[span.clone()].to_vec())?);
        recvs.push(transport.start_recv(partner, tag)?);
    }

    for ((chunk, span), ticket) in spans.iter().enumerate().zip(recvs) {
        let incoming = transport.complete_recv(ticket)?;
        if incoming.len() != span.len() {
            return Err(RowsortError::TransportFailure {
                rank,
                operation: "recv",
                detail: format!(
                    "chunk {chunk} from worker {partner}: expected {} elements, got {}",
                    span.len(),
                    incoming.len()
                ),
            });
        }
        compare_exchange(&mut row[span.clone()], &incoming, direction);
    }
    debug!(
        "rank {rank}: stage {stage} step {step}: merged {} chunks with worker {partner} in {:.6}s",
        spans.len(),
        start.elapsed().as_secs_f64()
    );

    // The snapshot chunks must stay untouched until their transfers finish,
    // so the sends are only awaited after the last chunk has been merged.
    let start = Instant::now();
    transport.complete_sends(sends)?;
    debug!(
        "rank {rank}: stage {stage} step {step}: waiting for sends took {:.6}s",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
