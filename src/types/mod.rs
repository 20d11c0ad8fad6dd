//! Small strongly-typed helpers shared across modules.
//!
//! - [`Side`] / [`SideBoundaries`]: one value per horizontal side of a
//!   subdomain (neighbor ranks, halo message tags)

mod sides;

pub use sides::{Side, SideBoundaries};
