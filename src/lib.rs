//! # les-rs
//!
//! Domain-decomposed finite-difference core of an atmospheric large-eddy
//! simulation.
//!
//! This crate provides:
//! - A 2-D Cartesian process topology with collectives and halo exchange
//!   ([`parallel`])
//! - A structured, halo-padded 3-D grid and field registry ([`grid`],
//!   [`fields`])
//! - 4th-order staggered-grid stencils ([`fd`]) and a level-parallel loop
//!   driver ([`stencil`])
//! - Buoyancy tendencies, including slope flow in a tilted frame
//!   ([`thermo`])
//! - An `.ini` input reader ([`config`]) and rank-0 filtered logging
//!   ([`logging`])

pub mod config;
pub mod error;
pub mod fd;
pub mod fields;
pub mod grid;
pub mod logging;
pub mod model;
pub mod parallel;
pub mod stencil;
pub mod thermo;
pub mod types;

// Re-export main types for convenience
pub use config::{ConfigError, Input};
pub use error::{Error, PreconditionError, Result};
pub use fields::{Field3d, Fields};
pub use grid::{Grid, GridConfig, SpatialOrder};
pub use logging::Reporter;
pub use model::{Model, TendencyStats};
pub use parallel::{
    CommError, Communicator, Decomposition, LocalComm, LocalWorld, Periodicity, ProcessGroup,
    Topology, TopologyError,
};
#[cfg(feature = "mpi")]
pub use parallel::MpiComm;
pub use thermo::{BuoySlope, SlopeParams, Thermo, ThermoKind};
pub use types::{Side, SideBoundaries};
