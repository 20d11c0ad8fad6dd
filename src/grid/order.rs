//! Spatial order of the finite-difference operators.

use std::fmt;

use crate::config::InputValue;

/// Order of accuracy of the interpolation and gradient stencils.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpatialOrder {
    /// 2nd order, two-point stencils
    Second,
    /// 4th order, four-point stencils
    Fourth,
}

impl SpatialOrder {
    /// Ghost cells a centred stencil reaches on each side.
    #[inline]
    pub fn stencil_reach(self) -> usize {
        match self {
            SpatialOrder::Second => 1,
            SpatialOrder::Fourth => 2,
        }
    }

    /// Value used for `swspatialorder` in input files.
    pub fn as_str(self) -> &'static str {
        match self {
            SpatialOrder::Second => "2",
            SpatialOrder::Fourth => "4",
        }
    }
}

impl fmt::Display for SpatialOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InputValue for SpatialOrder {
    const TYPE_NAME: &'static str = "spatial order (\"2\" or \"4\")";

    fn parse_value(raw: &str) -> Option<Self> {
        match raw {
            "2" => Some(SpatialOrder::Second),
            "4" => Some(SpatialOrder::Fourth),
            _ => None,
        }
    }
}
