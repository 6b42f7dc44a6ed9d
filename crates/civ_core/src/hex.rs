//! Axial hex coordinates.
//!
//! Pointy-top axial layout: `q` runs east, `r` runs south-east, and the
//! implicit cube coordinate `s = -q - r`. All iteration orders here are fixed
//! so that anything built on top (pathfinding, territory claims) is
//! deterministic.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A position on the hex grid in axial coordinates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct HexCoord {
    /// Column axis.
    pub q: i32,
    /// Row axis.
    pub r: i32,
}

/// Neighbor offsets: E, NE, NW, W, SW, SE.
const DIRECTIONS: [HexCoord; 6] = [
    HexCoord::new(1, 0),
    HexCoord::new(1, -1),
    HexCoord::new(0, -1),
    HexCoord::new(-1, 0),
    HexCoord::new(-1, 1),
    HexCoord::new(0, 1),
];

impl HexCoord {
    /// The origin tile.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Create a coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Third cube coordinate.
    #[must_use]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Shift by `(dq, dr)`, wrapping at the `i32` bounds like every other
    /// coordinate walk here.
    const fn offset(self, dq: i32, dr: i32) -> Self {
        Self::new(self.q.wrapping_add(dq), self.r.wrapping_add(dr))
    }

    /// The six adjacent coordinates, always in the same order.
    #[must_use]
    pub fn neighbors(self) -> [HexCoord; 6] {
        DIRECTIONS.map(|d| self.offset(d.q, d.r))
    }

    /// Hex distance (number of steps on an empty grid).
    #[must_use]
    pub fn distance_to(self, other: Self) -> u32 {
        let dq = i64::from(self.q) - i64::from(other.q);
        let dr = i64::from(self.r) - i64::from(other.r);
        let ds = -dq - dr;
        let total = (dq.unsigned_abs() + dr.unsigned_abs() + ds.unsigned_abs()) / 2;
        u32::try_from(total).unwrap_or(u32::MAX)
    }

    /// Whether `other` is one step away.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self.distance_to(other) == 1
    }

    /// Every coordinate within `radius` steps, including `self`.
    ///
    /// Ordered by `q` then `r`.
    #[must_use]
    pub fn range(self, radius: u32) -> Vec<HexCoord> {
        let n = i32::try_from(radius).unwrap_or(i32::MAX);
        let mut out = Vec::new();
        for dq in -n..=n {
            let lo = (-n).max((-dq).saturating_sub(n));
            let hi = n.min(n.saturating_sub(dq));
            for dr in lo..=hi {
                out.push(self.offset(dq, dr));
            }
        }
        out
    }

    /// Coordinates exactly `radius` steps away, walking the ring
    /// counter-clockwise from the south-west corner.
    #[must_use]
    pub fn ring(self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![self];
        }
        let n = i32::try_from(radius).unwrap_or(i32::MAX);
        let start = DIRECTIONS[4];
        let mut current = self.offset(start.q.wrapping_mul(n), start.r.wrapping_mul(n));
        let mut out = Vec::with_capacity(6 * radius as usize);
        for direction in DIRECTIONS {
            for _ in 0..radius {
                out.push(current);
                current = current.offset(direction.q, direction.r);
            }
        }
        out
    }
}

impl Add for HexCoord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.offset(rhs.q, rhs.r)
    }
}

impl Sub for HexCoord {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.q.wrapping_sub(rhs.q), self.r.wrapping_sub(rhs.r))
    }
}

impl From<(i32, i32)> for HexCoord {
    fn from((q, r): (i32, i32)) -> Self {
        Self::new(q, r)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}
