//! Finite-difference interpolation stencils on a staggered grid.
//!
//! Interpolations move a value half a cell: from cell centres to faces or
//! back.

/// 2nd-order stencils.
pub mod o2 {
    /// Midpoint of two neighboring values.
    #[inline(always)]
    pub fn interp2(a: f64, b: f64) -> f64 {
        0.5 * (a + b)
    }
}

/// 4th-order stencils.
pub mod o4 {
    /// Centred four-point interpolation to the midpoint of `b` and `c`:
    /// `(-a + 9b + 9c - d) / 16`.
    #[inline(always)]
    pub fn interp4(a: f64, b: f64, c: f64, d: f64) -> f64 {
        (-a + 9.0 * b + 9.0 * c - d) / 16.0
    }
}
