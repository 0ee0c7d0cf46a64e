//! Channel-backed transport for an in-process worker group.
//!
//! [`ThreadGroup::run`] spawns one thread per rank and wires every pair of
//! workers through unbounded crossbeam channels. Each worker owns a single
//! inbox; messages that arrive before the worker asks for their (source, tag)
//! pair are stashed and replayed on the matching receive, which gives the
//! tagged, out-of-order-safe semantics the engine relies on.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  Packet   ┌──────────┐  Packet   ┌──────────┐
//! │ Worker 0 │──────────>│ Worker 1 │──────────>│ Worker 2 │ ...
//! │ (thread) │<──────────│ (thread) │<──────────│ (thread) │
//! └──────────┘           └──────────┘           └──────────┘
//!      │                      │                      │
//!      └──────────── shared std::sync::Barrier ──────┘
//! ```
//!
//! A channel send completes as soon as the packet is enqueued, so
//! [`Transport::start_send`] finishes the transfer eagerly and
//! [`Transport::complete_sends`] only consumes the tickets. Receives do the
//! real blocking: [`Transport::complete_recv`] pulls from the inbox until the
//! requested (source, tag) pair arrives.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Barrier};
use std::thread;

use crate::errors::{Result, RowsortError};
use crate::transport::tags::Tag;
use crate::transport::{RecvTicket, SendTicket, Transport, Value};

/// What one message carries.
#[derive(Debug)]
enum Payload {
    /// A row chunk or boundary element.
    Values(Vec<Value>),
    /// One worker's contribution to a logical AND reduction.
    Flag(bool),
    /// One worker's contribution to a numeric maximum reduction.
    Time(f64),
}

/// One message between two workers.
#[derive(Debug)]
struct Packet {
    src: usize,
    tag: Tag,
    payload: Payload,
}

/// Transport handle owned by one worker thread.
pub struct ThreadTransport {
    rank: usize,
    peers: Vec<Sender<Packet>>,
    inbox: Receiver<Packet>,
    /// Messages received ahead of the (source, tag) pair the worker asked for.
    stash: HashMap<(usize, Tag), VecDeque<Payload>>,
    barrier: Arc<Barrier>,
}

impl ThreadTransport {
    fn send_packet(&mut self, dest: usize, tag: Tag, payload: Payload) -> Result<()> {
        let sender = self.peers.get(dest).ok_or_else(|| RowsortError::TransportFailure {
            rank: self.rank,
            operation: "send",
            detail: format!("destination {dest} is outside the group"),
        })?;
        sender.send(Packet { src: self.rank, tag, payload }).map_err(|_| {
            RowsortError::TransportFailure {
                rank: self.rank,
                operation: "send",
                detail: format!("worker {dest} disconnected"),
            }
        })
    }

    /// Returns the next payload for (`src`, `tag`), stashing mismatches.
    fn recv_packet(&mut self, src: usize, tag: Tag) -> Result<Payload> {
        if let Some(queue) = self.stash.get_mut(&(src, tag)) {
            if let Some(payload) = queue.pop_front() {
                return Ok(payload);
            }
        }
        loop {
            let packet = self.inbox.recv().map_err(|_| RowsortError::TransportFailure {
                rank: self.rank,
                operation: "recv",
                detail: format!("all peers disconnected while waiting for worker {src}"),
            })?;
            if packet.src == src && packet.tag == tag {
                return Ok(packet.payload);
            }
            self.stash.entry((packet.src, packet.tag)).or_default().push_back(packet.payload);
        }
    }

    fn recv_values(&mut self, src: usize, tag: Tag) -> Result<Vec<Value>> {
        match self.recv_packet(src, tag)? {
            Payload::Values(values) => Ok(values),
            other => Err(self.payload_mismatch(src, tag, &other)),
        }
    }

    fn payload_mismatch(&self, src: usize, tag: Tag, payload: &Payload) -> RowsortError {
        RowsortError::TransportFailure {
            rank: self.rank,
            operation: "recv",
            detail: format!("unexpected payload {payload:?} from worker {src} for tag {tag:?}"),
        }
    }
}

impl Transport for ThreadTransport {
    fn rank(&self) -> usize {
        self.rank
    }

    fn group_size(&self) -> usize {
        self.peers.len()
    }

    fn send(&mut self, dest: usize, tag: Tag, payload: &[Value]) -> Result<()> {
        self.send_packet(dest, tag, Payload::Values(payload.to_vec()))
    }

    fn recv(&mut self, src: usize, tag: Tag) -> Result<Vec<Value>> {
        self.recv_values(src, tag)
    }

    fn start_send(&mut self, dest: usize, tag: Tag, payload: Vec<Value>) -> Result<SendTicket> {
        // The channel buffers the payload, so the transfer is complete from
        // the sender's point of view as soon as it is enqueued.
        self.send_packet(dest, tag, Payload::Values(payload))?;
        Ok(SendTicket { dest, tag })
    }

    fn start_recv(&mut self, src: usize, tag: Tag) -> Result<RecvTicket> {
        Ok(RecvTicket { src, tag })
    }

    fn complete_recv(&mut self, ticket: RecvTicket) -> Result<Vec<Value>> {
        self.recv_values(ticket.src, ticket.tag)
    }

    fn complete_sends(&mut self, tickets: Vec<SendTicket>) -> Result<()> {
        // Sends completed when they were enqueued; consuming the tickets
        // keeps the engine's issue/await pairing honest.
        drop(tickets);
        Ok(())
    }

    fn barrier(&mut self) -> Result<()> {
        self.barrier.wait();
        Ok(())
    }

    fn reduce_and(&mut self, value: bool) -> Result<Option<bool>> {
        if self.rank == 0 {
            let mut aggregate = value;
            for src in 1..self.group_size() {
                match self.recv_packet(src, Tag::REDUCE_AND)? {
                    Payload::Flag(flag) => aggregate &= flag,
                    other => return Err(self.payload_mismatch(src, Tag::REDUCE_AND, &other)),
                }
            }
            Ok(Some(aggregate))
        } else {
            self.send_packet(0, Tag::REDUCE_AND, Payload::Flag(value))?;
            Ok(None)
        }
    }

    fn reduce_max(&mut self, value: f64) -> Result<Option<f64>> {
        if self.rank == 0 {
            let mut aggregate = value;
            for src in 1..self.group_size() {
                match self.recv_packet(src, Tag::REDUCE_MAX)? {
                    Payload::Time(time) => aggregate = aggregate.max(time),
                    other => return Err(self.payload_mismatch(src, Tag::REDUCE_MAX, &other)),
                }
            }
            Ok(Some(aggregate))
        } else {
            self.send_packet(0, Tag::REDUCE_MAX, Payload::Time(value))?;
            Ok(None)
        }
    }
}

/// Spawns and joins an in-process group of worker threads.
pub struct ThreadGroup;

impl ThreadGroup {
    /// Runs `worker` on `group_size` threads, one per rank, each wired with
    /// its own [`ThreadTransport`].
    ///
    /// Results are returned in rank order. The first worker error (or panic)
    /// fails the whole run, matching the no-partial-failure semantics of the
    /// lock-step protocol.
    ///
    /// # Errors
    ///
    /// Returns an error if `group_size` is zero, if any worker returns an
    /// error, or if any worker thread panics.
    pub fn run<R, F>(group_size: usize, worker: F) -> Result<Vec<R>>
    where
        F: Fn(ThreadTransport) -> Result<R> + Send + Sync,
        R: Send,
    {
        if group_size == 0 {
            return Err(RowsortError::InvalidParameter {
                parameter: "group_size".to_string(),
                reason: "must be >= 1".to_string(),
            });
        }

        let mut senders = Vec::with_capacity(group_size);
        let mut inboxes = Vec::with_capacity(group_size);
        for _ in 0..group_size {
            let (tx, rx) = unbounded();
            senders.push(tx);
            inboxes.push(rx);
        }
        let barrier = Arc::new(Barrier::new(group_size));

        let results: Vec<Result<R>> = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(group_size);
            for (rank, inbox) in inboxes.into_iter().enumerate() {
                let transport = ThreadTransport {
                    rank,
                    peers: senders.clone(),
                    inbox,
                    stash: HashMap::new(),
                    barrier: Arc::clone(&barrier),
                };
                let worker = &worker;
                handles.push(scope.spawn(move || worker(transport)));
            }
            drop(senders);

            handles
                .into_iter()
                .enumerate()
                .map(|(rank, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(RowsortError::TransportFailure {
                            rank,
                            operation: "join",
                            detail: "worker thread panicked".to_string(),
                        })
                    })
                })
                .collect()
        });

        results.into_iter().collect()
    }
}
