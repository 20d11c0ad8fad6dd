//! Halo (ghost-cell) exchange between neighboring ranks.
//!
//! ```text
//!           north ghosts  (full i range, filled second)
//!        +---+-------------------+---+
//!        |   |                   |   |
//!   west | w |     interior      | e | east
//!        |   |                   |   |
//!        +---+-------------------+---+
//!           south ghosts
//! ```
//!
//! East/west planes cover interior `j` rows only. North/south planes cover
//! the full padded `i` range, so the corner ghosts receive the east/west
//! values that arrived in the first phase.

use std::ops::Range;

use super::comm::{Communicator, Tag};
use super::group::ProcessGroup;
use crate::error::PreconditionError;
use crate::grid::Grid;
use crate::types::Side;

/// Exchange phases; the north/south phase starts after east/west completed.
const PHASES: [[Side; 2]; 2] = [[Side::East, Side::West], [Side::North, Side::South]];

/// Index ranges `(i, j, k)` of a block of cells.
type Block = (Range<usize>, Range<usize>, Range<usize>);

/// Scratch planes kept by a [`ProcessGroup`] between exchanges.
#[derive(Debug, Default)]
pub(super) struct HaloBuffers {
    send: Vec<f64>,
    recv: Vec<f64>,
}

impl<C: Communicator> ProcessGroup<C> {
    /// Refresh `width` ghost planes of `data` from the four neighbors.
    ///
    /// Each step ships the edge on one side to the neighbor there and fills
    /// the opposite ghost region from the neighbor on that side. Returns
    /// once every receive has completed. Sides without a neighbor
    /// (non-periodic domain edges) are left untouched.
    pub fn halo_exchange(&self, data: &mut [f64], grid: &Grid, width: usize) -> crate::Result<()> {
        if width > grid.igc || width > grid.jgc {
            return Err(PreconditionError::InsufficientHalo {
                operation: "halo exchange",
                need_i: width,
                need_j: width,
                need_k: 0,
                igc: grid.igc,
                jgc: grid.jgc,
                kgc: grid.kgc,
            }
            .into());
        }
        grid.check_len("halo exchange buffer", data)?;
        if width == 0 {
            return Ok(());
        }

        let mut buffers = self.halo.borrow_mut();
        let HaloBuffers { send, recv } = &mut *buffers;
        for phase in PHASES {
            for side in phase {
                let tag = Tag::Halo(side.opposite());
                let dest = self.topology().neighbor(side);
                let from = self.topology().neighbor(side.opposite());
                let ghost = ghost_block(grid, side.opposite(), width);

                if dest.is_some() {
                    pack(send, data, grid, edge_block(grid, side, width));
                }
                if from.is_some() {
                    recv.clear();
                    recv.resize(cells(&ghost), 0.0);
                }
                match (dest, from) {
                    (Some(dest), Some(from)) => {
                        self.comm()
                            .send_recv(dest, &send[..], from, &mut recv[..], tag)?
                    }
                    (Some(dest), None) => self.comm().send(dest, tag, &send[..])?,
                    (None, Some(from)) => self.comm().recv(from, tag, &mut recv[..])?,
                    (None, None) => {}
                }
                if from.is_some() {
                    unpack(data, grid, ghost, &recv[..]);
                }
            }
        }
        Ok(())
    }
}

/// Outermost `width` interior planes on `side`.
fn edge_block(grid: &Grid, side: Side, width: usize) -> Block {
    let planes = match side {
        Side::East => grid.iend - width..grid.iend,
        Side::West => grid.istart..grid.istart + width,
        Side::North => grid.jend - width..grid.jend,
        Side::South => grid.jstart..grid.jstart + width,
    };
    span(grid, side, planes)
}

/// Innermost `width` ghost planes on `side`.
fn ghost_block(grid: &Grid, side: Side, width: usize) -> Block {
    let planes = match side {
        Side::East => grid.iend..grid.iend + width,
        Side::West => grid.istart - width..grid.istart,
        Side::North => grid.jend..grid.jend + width,
        Side::South => grid.jstart - width..grid.jstart,
    };
    span(grid, side, planes)
}

fn span(grid: &Grid, side: Side, planes: Range<usize>) -> Block {
    if side.is_x() {
        (planes, grid.jstart..grid.jend, 0..grid.kcells)
    } else {
        (0..grid.icells, planes, 0..grid.kcells)
    }
}

fn cells((is, js, ks): &Block) -> usize {
    is.len() * js.len() * ks.len()
}

fn pack(buf: &mut Vec<f64>, data: &[f64], grid: &Grid, (is, js, ks): Block) {
    buf.clear();
    for k in ks {
        for j in js.clone() {
            let row = grid.index(0, j, k);
            buf.extend_from_slice(&data[row + is.start..row + is.end]);
        }
    }
}

fn unpack(data: &mut [f64], grid: &Grid, (is, js, ks): Block, buf: &[f64]) {
    let mut rows = buf.chunks_exact(is.len());
    for k in ks {
        for j in js.clone() {
            let row = grid.index(0, j, k);
            if let Some(values) = rows.next() {
                data[row + is.start..row + is.end].copy_from_slice(values);
            }
        }
    }
}
