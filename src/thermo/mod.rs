//! Thermodynamics: buoyancy tendencies.
//!
//! # Submodules
//!
//! - [`traits`]: the [`Thermo`] interface shared by all variants
//! - [`buoy_slope`]: slope-flow buoyancy in a tilted frame (4th order)
//! - `buoy`, `disabled`: plain buoyancy and the switched-off variant
//!
//! [`ThermoKind`] selects one variant from `[thermo] swthermo`.
//!
//! # Example
//!
//! ```
//! use les_rs::fields::Fields;
//! use les_rs::grid::{Grid, GridConfig, SpatialOrder};
//! use les_rs::parallel::Topology;
//! use les_rs::thermo::{BuoySlope, SlopeParams, Thermo};
//!
//! let config = GridConfig::new((8, 8, 8), (800.0, 800.0, 400.0), SpatialOrder::Fourth);
//! let grid = Grid::new(&config, &Topology::single()).unwrap();
//! let mut fields = Fields::new(&grid);
//!
//! let mut thermo = BuoySlope::new();
//! let params = SlopeParams { alpha: 0.1, n2: 1e-4, diffusivity: 1e-5 };
//! thermo.configure(params, &grid, &mut fields).unwrap();
//! thermo.exec(&grid, &mut fields).unwrap();
//! ```

mod buoy;
pub mod buoy_slope;
mod buoyancy;
mod disabled;
mod kind;
pub mod traits;

pub use buoy::Buoy;
pub use buoy_slope::{
    buoyancy_tend_b_4th, buoyancy_tend_u_4th, buoyancy_tend_w_4th, BuoySlope, SlopeParams,
};
pub use buoyancy::BUOYANCY;
pub use disabled::Disabled;
pub use kind::ThermoKind;
pub use traits::Thermo;
