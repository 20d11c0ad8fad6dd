//! MPI transport for runs across processes (feature `mpi`).
//!
//! Point-to-point messages map onto MPI tagged sends and receives; the
//! collectives call MPI's broadcast, all-reduce and barrier directly.
//!
//! # Example
//!
//! ```no_run
//! use les_rs::parallel::{Decomposition, MpiComm, Periodicity, ProcessGroup};
//!
//! let universe = mpi::initialize().unwrap();
//! let comm = MpiComm::new(universe.world());
//! let group = ProcessGroup::new(comm, Decomposition::from_npx_npy(2, 2), Periodicity::periodic())
//!     .unwrap();
//! let mut steps = [group.rank() as i64];
//! group.max(&mut steps).unwrap();
//! ```

use mpi::collective::SystemOperation;
use mpi::point_to_point::send_receive_into_with_tags;
use mpi::topology::SimpleCommunicator;
use mpi::traits::{
    Communicator as MpiCommunicator, CommunicatorCollectives, Destination, Root, Source,
};

use super::comm::{Communicator, Element, ReduceOp, Reducible, Tag};
use super::CommError;
use crate::types::Side;

/// Endpoint of one MPI process.
pub struct MpiComm {
    world: SimpleCommunicator,
    rank: usize,
    size: usize,
}

impl MpiComm {
    /// Wrap a communicator, usually `universe.world()`.
    pub fn new(world: SimpleCommunicator) -> Self {
        let rank = world.rank() as usize;
        let size = world.size() as usize;
        Self { world, rank, size }
    }

    /// Terminate every process of the run with `code`.
    pub fn abort(&self, code: i32) -> ! {
        self.world.abort(code)
    }

    fn check_rank(&self, rank: usize) -> Result<i32, CommError> {
        if rank < self.size {
            Ok(rank as i32)
        } else {
            Err(CommError::InvalidRank {
                rank,
                size: self.size,
            })
        }
    }
}

fn wire_tag(tag: Tag) -> mpi::Tag {
    match tag {
        Tag::Broadcast => 1,
        Tag::Reduce => 2,
        Tag::Halo(Side::South) => 10,
        Tag::Halo(Side::East) => 11,
        Tag::Halo(Side::North) => 12,
        Tag::Halo(Side::West) => 13,
    }
}

fn operation(op: ReduceOp) -> SystemOperation {
    match op {
        ReduceOp::Sum => SystemOperation::sum(),
        ReduceOp::Max => SystemOperation::max(),
        ReduceOp::Min => SystemOperation::min(),
    }
}

impl Communicator for MpiComm {
    #[inline]
    fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    fn send<T: Element>(&self, dest: usize, tag: Tag, data: &[T]) -> Result<(), CommError> {
        let dest = self.check_rank(dest)?;
        self.world
            .process_at_rank(dest)
            .send_with_tag(data, wire_tag(tag));
        Ok(())
    }

    fn recv<T: Element>(&self, from: usize, tag: Tag, buf: &mut [T]) -> Result<(), CommError> {
        let source = self.check_rank(from)?;
        let (data, _status) = self
            .world
            .process_at_rank(source)
            .receive_vec_with_tag::<T>(wire_tag(tag));
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

    /// One `MPI_Sendrecv`.
    fn send_recv<T: Element>(
        &self,
        dest: usize,
        data: &[T],
        from: usize,
        buf: &mut [T],
        tag: Tag,
    ) -> Result<(), CommError> {
        let dest = self.world.process_at_rank(self.check_rank(dest)?);
        let source = self.world.process_at_rank(self.check_rank(from)?);
        let tag = wire_tag(tag);
        send_receive_into_with_tags(data, &dest, tag, buf, &source, tag);
        Ok(())
    }

    fn broadcast<T: Element>(&self, buf: &mut [T], root: usize) -> Result<(), CommError> {
        let root = self.check_rank(root)?;
        self.world.process_at_rank(root).broadcast_into(buf);
        Ok(())
    }

    fn all_reduce<T: Reducible>(&self, buf: &mut [T], op: ReduceOp) -> Result<(), CommError> {
        if self.size == 1 {
            return Ok(());
        }
        let contribution = buf.to_vec();
        self.world
            .all_reduce_into(&contribution[..], buf, operation(op));
        Ok(())
    }

    fn barrier(&self) -> Result<(), CommError> {
        self.world.barrier();
        Ok(())
    }
}
