//! Structured, halo-padded 3-D grid.
//!
//! - [`Grid`]: local index space, strides and coordinates of one rank
//! - [`GridConfig`]: global sizes read from the `[grid]` input block
//! - [`SpatialOrder`]: 2nd or 4th order stencils

mod grid3d;
mod order;

pub use grid3d::{Grid, GridConfig};
pub use order::SpatialOrder;
