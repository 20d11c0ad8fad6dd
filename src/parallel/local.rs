//! In-process transport: every rank is a thread, messages travel over
//! `crossbeam-channel` channels.
//!
//! A world of size one is the single-process configuration; its
//! self-sends (periodic neighbors of a 1×1 decomposition) are queued
//! locally without touching a channel.
//!
//! Each endpoint also owns the only sender of a hang-up channel that
//! nothing is ever sent on. When a rank drops its endpoint, for example
//! after returning early with an error, peers blocked on a receive from it
//! see the disconnect and fail with [`CommError::Disconnected`] instead of
//! waiting forever.
//!
//! # Example
//!
//! ```
//! use les_rs::parallel::{Communicator, LocalWorld};
//!
//! let ranks = LocalWorld::run(3, |comm| comm.rank() * 10);
//! assert_eq!(ranks, vec![0, 10, 20]);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::thread;

use crossbeam_channel::{self as channel, select, Receiver, Sender};

use super::comm::{Communicator, Element, Payload, Tag};
use super::CommError;

#[derive(Debug)]
struct Envelope {
    from: usize,
    tag: Tag,
    payload: Payload,
}

/// Endpoint of one rank in a [`LocalWorld`].
///
/// Not `Sync`: an endpoint belongs to exactly one rank.
#[derive(Debug)]
pub struct LocalComm {
    rank: usize,
    size: usize,
    /// Outgoing channels, `None` at our own rank.
    peers: Vec<Option<Sender<Envelope>>>,
    inbox: Receiver<Envelope>,
    /// Disconnects when the endpoint of that rank is dropped.
    hangups: Vec<Receiver<()>>,
    _alive: Sender<()>,
    /// Arrived messages not yet matched by a receive, in arrival order.
    pending: RefCell<VecDeque<Envelope>>,
}

impl LocalComm {
    fn check_rank(&self, rank: usize) -> Result<(), CommError> {
        if rank < self.size {
            Ok(())
        } else {
            Err(CommError::InvalidRank {
                rank,
                size: self.size,
            })
        }
    }

    fn take_pending(&self, from: usize, tag: Tag) -> Option<Envelope> {
        let mut pending = self.pending.borrow_mut();
        let pos = pending.iter().position(|e| e.from == from && e.tag == tag)?;
        pending.remove(pos)
    }

    /// Move everything already in the inbox to the pending queue.
    fn drain_inbox(&self) {
        let mut pending = self.pending.borrow_mut();
        pending.extend(self.inbox.try_iter());
    }

    fn wait_for(&self, from: usize, tag: Tag) -> Result<Envelope, CommError> {
        let disconnected = CommError::Disconnected { rank: from, tag };
        if let Some(envelope) = self.take_pending(from, tag) {
            return Ok(envelope);
        }
        // self-sends never pass through the inbox
        if from == self.rank {
            return Err(disconnected);
        }
        loop {
            select! {
                recv(self.inbox) -> envelope => {
                    let envelope = envelope.map_err(|_| disconnected.clone())?;
                    if envelope.from == from && envelope.tag == tag {
                        return Ok(envelope);
                    }
                    self.pending.borrow_mut().push_back(envelope);
                }
                recv(self.hangups[from]) -> _ => {
                    // the peer is gone; whatever it sent is already queued
                    self.drain_inbox();
                    return self.take_pending(from, tag).ok_or(disconnected);
                }
            }
        }
    }
}

impl Communicator for LocalComm {
    #[inline]
    fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    fn send<T: Element>(&self, dest: usize, tag: Tag, data: &[T]) -> Result<(), CommError> {
        self.check_rank(dest)?;
        let envelope = Envelope {
            from: self.rank,
            tag,
            payload: T::into_payload(data.to_vec()),
        };
        match &self.peers[dest] {
            Some(sender) => sender
                .send(envelope)
                .map_err(|_| CommError::Disconnected { rank: dest, tag }),
            None => {
                self.pending.borrow_mut().push_back(envelope);
                Ok(())
            }
        }
    }

    fn recv<T: Element>(&self, from: usize, tag: Tag, buf: &mut [T]) -> Result<(), CommError> {
        self.check_rank(from)?;
        let envelope = self.wait_for(from, tag)?;
        let data = T::from_payload(envelope.payload).map_err(|other| CommError::TypeMismatch {
            from,
            tag,
            expected: T::TYPE_NAME,
            actual: other.type_name(),
        })?;
        if data.len() != buf.len() {
            return Err(CommError::LengthMismatch {
                from,
                tag,
                expected: buf.len(),
                actual: data.len(),
            });
        }
        buf.copy_from_slice(&data);
        Ok(())
    }
}

/// Factory for a group of in-process ranks.
pub struct LocalWorld;

impl LocalWorld {
    /// Create connected endpoints for `size` ranks, ordered by rank.
    pub fn create(size: usize) -> Vec<LocalComm> {
        let (senders, receivers): (Vec<_>, Vec<_>) =
            (0..size).map(|_| channel::unbounded()).unzip();
        let (alive, hangups): (Vec<_>, Vec<_>) = (0..size).map(|_| channel::bounded(0)).unzip();

        receivers
            .into_iter()
            .zip(alive)
            .enumerate()
            .map(|(rank, (inbox, alive))| LocalComm {
                rank,
                size,
                peers: senders
                    .iter()
                    .enumerate()
                    .map(|(dest, s)| (dest != rank).then(|| s.clone()))
                    .collect(),
                inbox,
                hangups: hangups.clone(),
                _alive: alive,
                pending: RefCell::new(VecDeque::new()),
            })
            .collect()
    }

    /// Endpoint of a single-process world.
    pub fn single() -> LocalComm {
        // `create(1)` always yields exactly one endpoint
        let mut comms = Self::create(1);
        comms.remove(0)
    }

    /// Run `f` once per rank, each on its own thread, and collect the
    /// results in rank order.
    ///
    /// A rank that returns while peers still expect messages from it drops
    /// its endpoint, so those peers fail instead of blocking. A panic on
    /// any rank is propagated to the caller after all threads have
    /// finished.
    pub fn run<R, F>(size: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(LocalComm) -> R + Sync,
    {
        let comms = Self::create(size);
        let f = &f;
        thread::scope(|scope| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| {
                    thread::Builder::new()
                        .name(format!("rank-{}", comm.rank))
                        .spawn_scoped(scope, move || f(comm))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle {
                    Ok(handle) => match handle.join() {
                        Ok(result) => result,
                        Err(panic) => std::panic::resume_unwind(panic),
                    },
                    Err(err) => panic!("failed to spawn rank thread: {}", err),
                })
                .collect()
        })
    }
}
