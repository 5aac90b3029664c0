//! Integer grid coordinate.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// An immutable `(x, y)` coordinate on the simulation grid.
///
/// Ordering is lexicographic: `x` first, then `y`.  Edge endpoints are
/// canonicalised with this order, so it must stay total and stable.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return `(self, other)` ordered so that the smaller location comes first.
    #[inline]
    pub fn ordered_pair(self, other: Location) -> (Location, Location) {
        if self <= other { (self, other) } else { (other, self) }
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x.cmp(&other.x).then(self.y.cmp(&other.y))
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Location {
    type Output = Location;
    #[inline]
    fn add(self, rhs: Location) -> Location {
        Location::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Location {
    type Output = Location;
    #[inline]
    fn sub(self, rhs: Location) -> Location {
        Location::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
