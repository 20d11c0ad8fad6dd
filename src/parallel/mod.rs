//! Process topology and inter-rank communication.
//!
//! This module provides:
//! - [`Topology`]: row-major 2-D Cartesian decomposition with neighbor ranks
//! - [`Communicator`]: message transport, with the in-process
//!   [`LocalComm`] implementation (one thread per rank) and, with the `mpi`
//!   feature, `MpiComm` (one process per rank)
//! - [`ProcessGroup`]: collectives, halo exchange and the wall-clock budget
//!
//! # Layout
//!
//! Ranks are numbered row-major over `npx` columns (x) and `npy` rows (y):
//!
//! ```text
//!     6  7  8
//!     3  4  5      ^ north (+y)
//!     0  1  2      > east  (+x)
//! ```

mod clock;
mod comm;
#[cfg(feature = "mpi")]
mod distributed;
mod error;
mod group;
mod halo;
mod local;
mod topology;

pub use clock::{WallClock, DEFAULT_MARGIN};
pub use comm::{
    Communicator, Datatype, Element, Payload, ReduceOp, Reducible, Tag, REDUCE_ROOT,
};
#[cfg(feature = "mpi")]
pub use distributed::MpiComm;
pub use error::{CommError, TopologyError};
pub use group::ProcessGroup;
pub use local::{LocalComm, LocalWorld};
pub use topology::{Decomposition, Periodicity, Topology};
