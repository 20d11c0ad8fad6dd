//! Per-rank process group: topology, collectives and wall clock.
//!
//! Exactly one [`ProcessGroup`] exists per rank. It is passed by reference
//! to everything that needs cross-rank visibility; there is no global
//! communication state.
//!
//! Collectives must be called by every rank of the group in the same order.
//! They are carried out by the [`Communicator`]: the in-process transport
//! combines reductions on rank 0 in ascending rank order, so all ranks hold
//! bit-identical results; the MPI transport uses the library's collectives.
//!
//! # Example
//!
//! ```
//! use les_rs::parallel::{Decomposition, LocalWorld, Periodicity, ProcessGroup};
//!
//! let totals = LocalWorld::run(4, |comm| {
//!     let group = ProcessGroup::new(comm, Decomposition::from_npx_npy(2, 2), Periodicity::periodic())
//!         .unwrap();
//!     let mut value = [group.rank() as i64];
//!     group.sum(&mut value).unwrap();
//!     value[0]
//! });
//! assert_eq!(totals, vec![6, 6, 6, 6]);
//! ```

use std::cell::RefCell;
use std::time::Duration;

use super::clock::WallClock;
use super::comm::{Communicator, Element, ReduceOp, Reducible};
use super::halo::HaloBuffers;
use super::local::{LocalComm, LocalWorld};
use super::topology::{Decomposition, Periodicity, Topology};
use super::{CommError, TopologyError};
use crate::config::{ConfigError, Input};
use crate::logging::Reporter;

/// Topology, transport and clock of one rank.
#[derive(Debug)]
pub struct ProcessGroup<C: Communicator = LocalComm> {
    comm: C,
    topology: Topology,
    clock: WallClock,
    reporter: Reporter,
    /// Pack and receive planes, reused across halo exchanges.
    pub(super) halo: RefCell<HaloBuffers>,
}

impl<C: Communicator> ProcessGroup<C> {
    /// Build the group for `comm`'s rank.
    ///
    /// Fails if the decomposition does not match the communicator size.
    pub fn new(
        comm: C,
        decomposition: Decomposition,
        periodicity: Periodicity,
    ) -> Result<Self, TopologyError> {
        let nprocs = decomposition.total();
        decomposition.validate(comm.size()).map_err(|err| match err {
            TopologyError::Mismatch { .. } => TopologyError::SizeMismatch {
                comm_size: comm.size(),
                nprocs,
            },
            other => other,
        })?;
        let topology = Topology::new(decomposition, nprocs, comm.rank(), periodicity)?;
        let reporter = Reporter::new(comm.rank());

        tracing::debug!(rank = comm.rank(), "{}", topology);

        Ok(Self {
            comm,
            topology,
            clock: WallClock::start(),
            reporter,
            halo: RefCell::default(),
        })
    }

    /// Build the group from `[master] npx, npy, wallclocklimit` and
    /// `[grid] periodic_x, periodic_y`.
    pub fn from_input(comm: C, input: &Input) -> crate::Result<Self> {
        let npx = input.get_item_or("master", "npx", None, 1usize)?;
        let npy = input.get_item_or("master", "npy", None, 1usize)?;
        let hours = input.get_item_or("master", "wallclocklimit", None, 0.0f64)?;
        let periodicity = Periodicity {
            x: input.get_item_or("grid", "periodic_x", None, true)?,
            y: input.get_item_or("grid", "periodic_y", None, true)?,
        };

        let mut group = Self::new(comm, Decomposition::from_npx_npy(npx, npy), periodicity)?;
        group.clock = group
            .clock
            .with_limit_hours(hours)
            .map_err(|_| ConfigError::InvalidValue {
                block: "master".to_string(),
                item: "wallclocklimit".to_string(),
                value: hours.to_string(),
                expected: "duration in hours",
            })?;
        Ok(group)
    }

    /// Replace the wall-clock budget.
    pub fn set_wall_clock_limit(&mut self, limit: Duration) {
        self.clock = self.clock.with_limit(limit);
    }

    /// Replace the safety margin of the wall-clock budget.
    pub fn set_wall_clock_margin(&mut self, margin: Duration) {
        self.clock = self.clock.with_margin(margin);
    }

    /// Process topology of this rank.
    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Own rank.
    #[inline]
    pub fn rank(&self) -> usize {
        self.topology.rank()
    }

    /// Number of ranks.
    #[inline]
    pub fn nprocs(&self) -> usize {
        self.topology.nprocs()
    }

    /// Rank-0 filtered diagnostics.
    #[inline]
    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Underlying transport.
    #[inline]
    pub fn comm(&self) -> &C {
        &self.comm
    }

    /// Copy `buf` from `root` to every rank.
    pub fn broadcast<T: Element>(&self, buf: &mut [T], root: usize) -> Result<(), CommError> {
        self.comm.broadcast(buf, root)
    }

    /// Element-wise sum over all ranks, in place.
    pub fn sum<T: Reducible>(&self, buf: &mut [T]) -> Result<(), CommError> {
        self.comm.all_reduce(buf, ReduceOp::Sum)
    }

    /// Element-wise maximum over all ranks, in place.
    pub fn max<T: Reducible>(&self, buf: &mut [T]) -> Result<(), CommError> {
        self.comm.all_reduce(buf, ReduceOp::Max)
    }

    /// Element-wise minimum over all ranks, in place.
    pub fn min<T: Reducible>(&self, buf: &mut [T]) -> Result<(), CommError> {
        self.comm.all_reduce(buf, ReduceOp::Min)
    }

    /// Element-wise reduction over all ranks, in place.
    pub fn all_reduce<T: Reducible>(&self, buf: &mut [T], op: ReduceOp) -> Result<(), CommError> {
        self.comm.all_reduce(buf, op)
    }

    /// Block until every rank has reached this point.
    pub fn barrier(&self) -> Result<(), CommError> {
        self.comm.barrier()
    }

    /// Seconds since the group was created.
    pub fn wall_clock_time(&self) -> f64 {
        self.clock.elapsed().as_secs_f64()
    }

    /// Whether the wall-clock budget (minus its safety margin) is used up
    /// on any rank. Collective; every rank gets the same answer.
    pub fn at_wall_clock_limit(&self) -> Result<bool, CommError> {
        let mut flag = [i32::from(self.clock.at_limit())];
        self.max(&mut flag)?;
        Ok(flag[0] != 0)
    }
}

impl ProcessGroup<LocalComm> {
    /// Single-process, doubly periodic group.
    pub fn single() -> Self {
        let comm = LocalWorld::single();
        Self {
            reporter: Reporter::new(0),
            comm,
            topology: Topology::single(),
            clock: WallClock::start(),
            halo: RefCell::default(),
        }
    }
}
