//! Two-dimensional Cartesian process topology.
//!
//! Ranks are laid out **row-major**: x (columns, `npx`) varies fastest,
//!
//! ```text
//! rank = coord_y * npx + coord_x
//! ```
//!
//! so for `npx = 3, npy = 2`:
//!
//! ```text
//!   coord_y = 1 :  3  4  5      north (+y)
//!   coord_y = 0 :  0  1  2      south (-y)
//!                 west   east
//! ```
//!
//! Every rank derives the same topology from `(npx, npy, nprocs)`; only
//! its own rank differs.

use std::fmt;

use super::TopologyError;
use crate::types::{Side, SideBoundaries};

/// Requested decomposition: rows (`npy`, along y) × columns (`npx`, along x).
///
/// # Example
///
/// ```
/// use les_rs::parallel::Decomposition;
///
/// let decomp = Decomposition::new(2, 4);
/// assert_eq!(decomp.npy(), 2);
/// assert_eq!(decomp.npx(), 4);
/// assert_eq!(decomp.total(), 8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decomposition {
    /// Number of process rows (y-direction).
    rows: usize,
    /// Number of process columns (x-direction).
    columns: usize,
}

impl Decomposition {
    /// Create a decomposition of `rows` × `columns` processes.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Decomposition from the x/y factor names used in input files.
    pub fn from_npx_npy(npx: usize, npy: usize) -> Self {
        Self::new(npy, npx)
    }

    /// Processes along x.
    #[inline]
    pub fn npx(&self) -> usize {
        self.columns
    }

    /// Processes along y.
    #[inline]
    pub fn npy(&self) -> usize {
        self.rows
    }

    /// Total number of processes.
    #[inline]
    pub fn total(&self) -> usize {
        self.rows * self.columns
    }

    /// Check against the number of available processes.
    pub fn validate(&self, nprocs: usize) -> Result<(), TopologyError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(TopologyError::ZeroFactor {
                npx: self.columns,
                npy: self.rows,
            });
        }
        if self.total() != nprocs {
            return Err(TopologyError::Mismatch {
                npx: self.columns,
                npy: self.rows,
                nprocs,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} (npx x npy)", self.columns, self.rows)
    }
}

/// Whether the domain wraps around in each horizontal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Periodicity {
    /// Wrap east/west.
    pub x: bool,
    /// Wrap north/south.
    pub y: bool,
}

impl Periodicity {
    /// Periodic in both directions (doubly periodic LES domain).
    pub fn periodic() -> Self {
        Self { x: true, y: true }
    }

    /// No wrap in either direction.
    pub fn open() -> Self {
        Self { x: false, y: false }
    }
}

impl Default for Periodicity {
    fn default() -> Self {
        Self::periodic()
    }
}

/// This rank's place in the process grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    decomposition: Decomposition,
    periodicity: Periodicity,
    rank: usize,
    coord_x: usize,
    coord_y: usize,
    neighbors: SideBoundaries<Option<usize>>,
}

impl Topology {
    /// Build the topology of `rank` in a group of `nprocs` processes.
    ///
    /// Fails if the decomposition does not multiply out to `nprocs`,
    /// has a zero factor, or if `rank` is out of range.
    pub fn new(
        decomposition: Decomposition,
        nprocs: usize,
        rank: usize,
        periodicity: Periodicity,
    ) -> Result<Self, TopologyError> {
        decomposition.validate(nprocs)?;
        if rank >= nprocs {
            return Err(TopologyError::RankOutOfRange { rank, nprocs });
        }

        let npx = decomposition.npx();
        let npy = decomposition.npy();
        let coord_x = rank % npx;
        let coord_y = rank / npx;
        let at = |x: usize, y: usize| y * npx + x;

        let east = if coord_x + 1 < npx {
            Some(at(coord_x + 1, coord_y))
        } else {
            periodicity.x.then(|| at(0, coord_y))
        };
        let west = if coord_x > 0 {
            Some(at(coord_x - 1, coord_y))
        } else {
            periodicity.x.then(|| at(npx - 1, coord_y))
        };
        let north = if coord_y + 1 < npy {
            Some(at(coord_x, coord_y + 1))
        } else {
            periodicity.y.then(|| at(coord_x, 0))
        };
        let south = if coord_y > 0 {
            Some(at(coord_x, coord_y - 1))
        } else {
            periodicity.y.then(|| at(coord_x, npy - 1))
        };

        Ok(Self {
            decomposition,
            periodicity,
            rank,
            coord_x,
            coord_y,
            neighbors: SideBoundaries::new(south, east, north, west),
        })
    }

    /// Topology of a single, doubly periodic process.
    pub fn single() -> Self {
        Self {
            decomposition: Decomposition::new(1, 1),
            periodicity: Periodicity::periodic(),
            rank: 0,
            coord_x: 0,
            coord_y: 0,
            neighbors: SideBoundaries::uniform(Some(0)),
        }
    }

    /// Requested decomposition.
    #[inline]
    pub fn decomposition(&self) -> Decomposition {
        self.decomposition
    }

    /// Boundary policy.
    #[inline]
    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// Total number of processes.
    #[inline]
    pub fn nprocs(&self) -> usize {
        self.decomposition.total()
    }

    /// Processes along x.
    #[inline]
    pub fn npx(&self) -> usize {
        self.decomposition.npx()
    }

    /// Processes along y.
    #[inline]
    pub fn npy(&self) -> usize {
        self.decomposition.npy()
    }

    /// Own rank.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Own column in the process grid.
    #[inline]
    pub fn coord_x(&self) -> usize {
        self.coord_x
    }

    /// Own row in the process grid.
    #[inline]
    pub fn coord_y(&self) -> usize {
        self.coord_y
    }

    /// All four neighbor ranks; `None` on a non-periodic edge.
    #[inline]
    pub fn neighbors(&self) -> &SideBoundaries<Option<usize>> {
        &self.neighbors
    }

    /// Neighbor rank on one side.
    #[inline]
    pub fn neighbor(&self, side: Side) -> Option<usize> {
        *self.neighbors.side(side)
    }

    /// Coordinate `(coord_x, coord_y)` of any rank in this topology.
    #[inline]
    pub fn coords_of(&self, rank: usize) -> (usize, usize) {
        (rank % self.npx(), rank / self.npx())
    }

    /// Rank at a process-grid coordinate.
    #[inline]
    pub fn rank_of(&self, coord_x: usize, coord_y: usize) -> usize {
        coord_y * self.npx() + coord_x
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rank {} of {} at ({}, {}), neighbors {}",
            self.rank,
            self.nprocs(),
            self.coord_x,
            self.coord_y,
            self.neighbors
        )
    }
}
