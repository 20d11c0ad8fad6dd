//! Per-side values with named fields.
//!
//! A subdomain has four horizontal neighbors; [`SideBoundaries`] keeps one
//! value per side, e.g. the neighbor ranks of a process.

use std::fmt;

/// One of the four horizontal sides of a subdomain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// -y
    South,
    /// +x
    East,
    /// +y
    North,
    /// -x
    West,
}

impl Side {
    /// All sides in order: south, east, north, west.
    pub const ALL: [Side; 4] = [Side::South, Side::East, Side::North, Side::West];

    /// The side facing this one across a subdomain interface.
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::South => Side::North,
            Side::East => Side::West,
            Side::North => Side::South,
            Side::West => Side::East,
        }
    }

    /// Whether this side bounds the subdomain in x.
    #[inline]
    pub fn is_x(self) -> bool {
        matches!(self, Side::East | Side::West)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::South => "south",
            Side::East => "east",
            Side::North => "north",
            Side::West => "west",
        };
        f.write_str(name)
    }
}

/// Values with named fields for each side.
///
/// Named fields instead of a four-element array, so call sites never
/// depend on an ordering convention.
///
/// # Example
///
/// ```
/// use les_rs::types::{Side, SideBoundaries};
///
/// // Neighbor ranks; `None` marks a side without a neighbor.
/// let neighbors = SideBoundaries::new(None, Some(1), Some(2), None);
///
/// assert_eq!(neighbors.east, Some(1));
/// assert_eq!(*neighbors.side(Side::North), Some(2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideBoundaries<T> {
    /// South side (-y)
    pub south: T,
    /// East side (+x)
    pub east: T,
    /// North side (+y)
    pub north: T,
    /// West side (-x)
    pub west: T,
}

impl<T> SideBoundaries<T> {
    /// Values given counterclockwise from the south side.
    pub fn new(south: T, east: T, north: T, west: T) -> Self {
        Self {
            south,
            east,
            north,
            west,
        }
    }

    /// Create with the same value on all sides.
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            south: value.clone(),
            east: value.clone(),
            north: value.clone(),
            west: value,
        }
    }

    /// Value on a given side.
    #[inline]
    pub fn side(&self, side: Side) -> &T {
        match side {
            Side::South => &self.south,
            Side::East => &self.east,
            Side::North => &self.north,
            Side::West => &self.west,
        }
    }
}

impl<T: fmt::Debug> fmt::Display for SideBoundaries<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S:{:?} E:{:?} N:{:?} W:{:?}",
            self.south, self.east, self.north, self.west
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_access_matches_fields() {
        let sides = SideBoundaries::new(1, 2, 3, 4);
        assert_eq!(*sides.side(Side::South), sides.south);
        assert_eq!(*sides.side(Side::East), sides.east);
        assert_eq!(*sides.side(Side::North), sides.north);
        assert_eq!(*sides.side(Side::West), sides.west);
    }

    #[test]
    fn test_opposite_is_involution() {
        for side in Side::ALL {
            assert_ne!(side, side.opposite());
            assert_eq!(side, side.opposite().opposite());
            assert_eq!(side.is_x(), side.opposite().is_x());
        }
    }

    #[test]
    fn test_display() {
        let sides = SideBoundaries::new(None, Some(1), Some(2), None);
        assert_eq!(sides.to_string(), "S:None E:Some(1) N:Some(2) W:None");
        assert_eq!(Side::North.to_string(), "north");
    }
}
