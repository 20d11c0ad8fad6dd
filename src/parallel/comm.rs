//! Transport abstraction.
//!
//! Collectives and halo exchange in [`ProcessGroup`](super::ProcessGroup)
//! are written against [`Communicator`] only. Messages are matched on
//! `(sender, tag)` and delivered in send order for each pair of ranks.
//!
//! The collectives have provided implementations built on point-to-point
//! messages; transports with native collectives override them.

use std::fmt;

use super::CommError;
use crate::types::Side;

/// Message tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Root to all, broadcast payload.
    Broadcast,
    /// Contributions to and results of an all-reduce.
    Reduce,
    /// Halo planes destined for the receiver's ghost region on the given side.
    Halo(Side),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Broadcast => f.write_str("broadcast"),
            Tag::Reduce => f.write_str("reduce"),
            Tag::Halo(side) => write!(f, "halo-{}", side),
        }
    }
}

/// Owned message body.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Bytes (character data)
    U8(Vec<u8>),
    /// 32-bit integers
    I32(Vec<i32>),
    /// 64-bit integers
    I64(Vec<i64>),
    /// Unsigned 64-bit integers
    U64(Vec<u64>),
    /// Double precision values
    F64(Vec<f64>),
}

impl Payload {
    /// Number of elements carried.
    pub fn len(&self) -> usize {
        match self {
            Payload::U8(v) => v.len(),
            Payload::I32(v) => v.len(),
            Payload::I64(v) => v.len(),
            Payload::U64(v) => v.len(),
            Payload::F64(v) => v.len(),
        }
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::U8(_) => u8::TYPE_NAME,
            Payload::I32(_) => i32::TYPE_NAME,
            Payload::I64(_) => i64::TYPE_NAME,
            Payload::U64(_) => u64::TYPE_NAME,
            Payload::F64(_) => f64::TYPE_NAME,
        }
    }
}

#[cfg(feature = "mpi")]
pub use mpi::traits::Equivalence as Datatype;

/// Wire datatype of an element. With the `mpi` feature this is MPI's
/// `Equivalence`; without it every type qualifies.
#[cfg(not(feature = "mpi"))]
pub trait Datatype {}

#[cfg(not(feature = "mpi"))]
impl<T> Datatype for T {}

/// Element types that can be sent between ranks.
pub trait Element: Copy + Send + Datatype + 'static {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    /// Wrap owned data into a payload.
    fn into_payload(data: Vec<Self>) -> Payload;

    /// Unwrap a payload of this element type, handing it back otherwise.
    fn from_payload(payload: Payload) -> Result<Vec<Self>, Payload>;
}

/// Element types supporting sum/max/min reductions.
pub trait Reducible: Element + PartialOrd {
    /// Sum of two values (integers wrap on overflow).
    fn reduce_add(self, other: Self) -> Self;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl Element for $ty {
            const TYPE_NAME: &'static str = $name;

            #[inline]
            fn into_payload(data: Vec<Self>) -> Payload {
                Payload::$variant(data)
            }

            #[inline]
            fn from_payload(payload: Payload) -> Result<Vec<Self>, Payload> {
                match payload {
                    Payload::$variant(data) => Ok(data),
                    other => Err(other),
                }
            }
        }
    };
}

impl_element!(u8, U8, "u8");
impl_element!(i32, I32, "i32");
impl_element!(i64, I64, "i64");
impl_element!(u64, U64, "u64");
impl_element!(f64, F64, "f64");

macro_rules! impl_reducible_int {
    ($($ty:ty),*) => {
        $(
            impl Reducible for $ty {
                #[inline]
                fn reduce_add(self, other: Self) -> Self {
                    self.wrapping_add(other)
                }
            }
        )*
    };
}

impl_reducible_int!(i32, i64, u64);

impl Reducible for f64 {
    #[inline]
    fn reduce_add(self, other: Self) -> Self {
        self + other
    }
}

/// Reduction operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceOp {
    /// Element-wise sum
    Sum,
    /// Element-wise maximum
    Max,
    /// Element-wise minimum
    Min,
}

impl ReduceOp {
    /// Combine an accumulated value with a contribution.
    #[inline]
    pub fn apply<T: Reducible>(self, acc: T, value: T) -> T {
        match self {
            ReduceOp::Sum => acc.reduce_add(value),
            ReduceOp::Max => {
                if value > acc {
                    value
                } else {
                    acc
                }
            }
            ReduceOp::Min => {
                if value < acc {
                    value
                } else {
                    acc
                }
            }
        }
    }
}

/// Rank that combines reduction contributions.
pub const REDUCE_ROOT: usize = 0;

/// Message transport between the ranks of one group.
///
/// Sends must not block on the receiver; a receive blocks until a message
/// with matching sender and tag is available, or fails once the sender can
/// no longer deliver it. Messages between one pair of ranks with the same
/// tag are received in the order they were sent.
pub trait Communicator {
    /// Rank of this process within the group.
    fn rank(&self) -> usize;

    /// Number of processes in the group.
    fn size(&self) -> usize;

    /// Send a copy of `data` to `dest`.
    fn send<T: Element>(&self, dest: usize, tag: Tag, data: &[T]) -> Result<(), CommError>;

    /// Receive a message from `from` into `buf`; lengths must match.
    fn recv<T: Element>(&self, from: usize, tag: Tag, buf: &mut [T]) -> Result<(), CommError>;

    /// Send `data` to `dest` and receive `buf` from `from`, both under `tag`.
    fn send_recv<T: Element>(
        &self,
        dest: usize,
        data: &[T],
        from: usize,
        buf: &mut [T],
        tag: Tag,
    ) -> Result<(), CommError> {
        self.send(dest, tag, data)?;
        self.recv(from, tag, buf)
    }

    /// Copy `buf` from `root` to every rank.
    fn broadcast<T: Element>(&self, buf: &mut [T], root: usize) -> Result<(), CommError> {
        let size = self.size();
        if root >= size {
            return Err(CommError::InvalidRank { rank: root, size });
        }
        if self.rank() == root {
            for dest in (0..size).filter(|&r| r != root) {
                self.send(dest, Tag::Broadcast, buf)?;
            }
            Ok(())
        } else {
            self.recv(root, Tag::Broadcast, buf)
        }
    }

    /// Element-wise reduction over all ranks, in place.
    ///
    /// Contributions are combined on [`REDUCE_ROOT`] in ascending rank
    /// order and sent back, so every rank holds bit-identical results.
    fn all_reduce<T: Reducible>(&self, buf: &mut [T], op: ReduceOp) -> Result<(), CommError> {
        let size = self.size();
        if size == 1 {
            return Ok(());
        }

        if self.rank() == REDUCE_ROOT {
            let mut contribution = buf.to_vec();
            for from in (0..size).filter(|&r| r != REDUCE_ROOT) {
                self.recv(from, Tag::Reduce, &mut contribution)?;
                for (acc, &value) in buf.iter_mut().zip(&contribution) {
                    *acc = op.apply(*acc, value);
                }
            }
            for dest in (0..size).filter(|&r| r != REDUCE_ROOT) {
                self.send(dest, Tag::Reduce, buf)?;
            }
            Ok(())
        } else {
            self.send(REDUCE_ROOT, Tag::Reduce, buf)?;
            self.recv(REDUCE_ROOT, Tag::Reduce, buf)
        }
    }

    /// Block until every rank has reached this point.
    fn barrier(&self) -> Result<(), CommError> {
        let mut token = [0i32];
        self.all_reduce(&mut token, ReduceOp::Sum)
    }
}
