//! Error types for the process topology and the communication layer.

use thiserror::Error;

use super::comm::Tag;

/// Errors raised while setting up the process decomposition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// A decomposition factor is zero.
    #[error("Decomposition factors must be positive, got npx = {npx}, npy = {npy}")]
    ZeroFactor { npx: usize, npy: usize },

    /// `npx * npy` differs from the number of processes.
    #[error("npx = {npx} times npy = {npy} does not match the {nprocs} available processes")]
    Mismatch {
        npx: usize,
        npy: usize,
        nprocs: usize,
    },

    /// Rank outside `0..nprocs`.
    #[error("Rank {rank} out of range for {nprocs} processes")]
    RankOutOfRange { rank: usize, nprocs: usize },

    /// Communicator size differs from the size the topology was built for.
    #[error("Communicator has {comm_size} ranks, topology expects {nprocs}")]
    SizeMismatch { comm_size: usize, nprocs: usize },
}

/// Errors reported by the transport underneath collectives and halo exchange.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommError {
    /// Peer rank does not exist.
    #[error("Rank {rank} is not part of a group of {size}")]
    InvalidRank { rank: usize, size: usize },

    /// Peer hung up before the operation completed.
    #[error("Connection to rank {rank} closed during {tag:?}")]
    Disconnected { rank: usize, tag: Tag },

    /// Message payload has a different element type than requested.
    #[error("Message from rank {from} ({tag:?}) carries {actual}, expected {expected}")]
    TypeMismatch {
        from: usize,
        tag: Tag,
        expected: &'static str,
        actual: &'static str,
    },

    /// Message payload has a different length than the receive buffer.
    #[error("Message from rank {from} ({tag:?}) has {actual} elements, expected {expected}")]
    LengthMismatch {
        from: usize,
        tag: Tag,
        expected: usize,
        actual: usize,
    },
}
