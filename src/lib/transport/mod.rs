//! Abstract transport capability consumed by the sorting engine.
//!
//! The engine never talks to a concrete substrate directly. Everything it
//! needs — tagged point-to-point messaging, a collective barrier, and the two
//! reductions — is expressed by the [`Transport`] trait, and a worker's rank
//! and group size come from its transport handle rather than from any
//! process-wide state.
//!
//! Non-blocking transfers are represented as tickets: [`Transport::start_send`]
//! and [`Transport::start_recv`] return immediately, and the caller later
//! redeems the ticket to block on completion. Receives are redeemed
//! individually as soon as their data is needed; sends are redeemed in bulk
//! once all chunks of an exchange have been merged. Every issued transfer is
//! unconditionally awaited, so no cancellation is required.

pub mod tags;
pub mod thread;

use crate::errors::Result;

pub use tags::{Tag, TagScheme};
pub use thread::{ThreadGroup, ThreadTransport};

/// The element type rows are made of.
pub type Value = i32;

/// A pending non-blocking send. Redeem with [`Transport::complete_sends`].
#[derive(Debug)]
#[must_use = "every issued send must be awaited before its buffer is reused"]
pub struct SendTicket {
    pub(crate) dest: usize,
    pub(crate) tag: Tag,
}

/// A pending non-blocking receive. Redeem with [`Transport::complete_recv`].
#[derive(Debug)]
#[must_use = "every issued receive must be awaited"]
pub struct RecvTicket {
    pub(crate) src: usize,
    pub(crate) tag: Tag,
}

/// Point-to-point and collective communication for one worker.
///
/// Implementations are free to buffer, reorder delivery, or deliver
/// out-of-order across tags, but a (source, tag) pair must behave as a FIFO
/// stream and messages with different tags must never be confused.
pub trait Transport {
    /// This worker's zero-based identity.
    fn rank(&self) -> usize;

    /// Total number of cooperating workers.
    fn group_size(&self) -> usize;

    /// Blocking tagged send of `payload` to `dest`.
    fn send(&mut self, dest: usize, tag: Tag, payload: &[Value]) -> Result<()>;

    /// Blocking tagged receive from `src`.
    fn recv(&mut self, src: usize, tag: Tag) -> Result<Vec<Value>>;

    /// Issues a non-blocking send of `payload` to `dest`.
    ///
    /// The payload is moved into the transport, so the caller's live buffers
    /// are free to change while the transfer is in flight.
    fn start_send(&mut self, dest: usize, tag: Tag, payload: Vec<Value>) -> Result<SendTicket>;

    /// Issues a non-blocking receive from `src`.
    fn start_recv(&mut self, src: usize, tag: Tag) -> Result<RecvTicket>;

    /// Blocks until the receive behind `ticket` has completed and returns its
    /// payload.
    fn complete_recv(&mut self, ticket: RecvTicket) -> Result<Vec<Value>>;

    /// Blocks until every send behind `tickets` has completed.
    fn complete_sends(&mut self, tickets: Vec<SendTicket>) -> Result<()>;

    /// Collective barrier: returns once every worker has arrived.
    fn barrier(&mut self) -> Result<()>;

    /// Logical AND reduction to the coordinator (rank 0).
    ///
    /// Returns `Some(aggregate)` on the coordinator and `None` elsewhere.
    fn reduce_and(&mut self, value: bool) -> Result<Option<bool>>;

    /// Numeric maximum reduction to the coordinator (rank 0).
    ///
    /// Returns `Some(aggregate)` on the coordinator and `None` elsewhere.
    fn reduce_max(&mut self, value: f64) -> Result<Option<f64>>;
}
