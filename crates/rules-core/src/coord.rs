//! Two-dimensional board coordinates.

use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A 2D integer coordinate.
///
/// `x` counts files from the queenside, `y` counts ranks from White's side
/// of the board. Coordinates carry no bounds of their own: arithmetic is
/// total over the integers, and whether a coordinate names a real square
/// is for the board to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const NORTH: Coordinate = Coordinate::new(0, 1);
    pub const NORTHEAST: Coordinate = Coordinate::new(1, 1);
    pub const EAST: Coordinate = Coordinate::new(1, 0);
    pub const SOUTHEAST: Coordinate = Coordinate::new(1, -1);
    pub const SOUTH: Coordinate = Coordinate::new(0, -1);
    pub const SOUTHWEST: Coordinate = Coordinate::new(-1, -1);
    pub const WEST: Coordinate = Coordinate::new(-1, 0);
    pub const NORTHWEST: Coordinate = Coordinate::new(-1, 1);

    /// The four rank/file directions.
    pub const CARDINALS: [Coordinate; 4] = [
        Coordinate::NORTH,
        Coordinate::EAST,
        Coordinate::SOUTH,
        Coordinate::WEST,
    ];

    /// The four diagonal directions.
    pub const DIAGONALS: [Coordinate; 4] = [
        Coordinate::NORTHEAST,
        Coordinate::SOUTHEAST,
        Coordinate::SOUTHWEST,
        Coordinate::NORTHWEST,
    ];

    /// All eight compass directions.
    pub const COMPASS: [Coordinate; 8] = [
        Coordinate::NORTH,
        Coordinate::NORTHEAST,
        Coordinate::EAST,
        Coordinate::SOUTHEAST,
        Coordinate::SOUTH,
        Coordinate::SOUTHWEST,
        Coordinate::WEST,
        Coordinate::NORTHWEST,
    ];

    /// Creates a coordinate from file and rank indices.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Coordinate { x, y }
    }

    /// Parses algebraic square notation (e.g. "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = chars.next()?;
        if !file.is_ascii_lowercase() {
            return None;
        }
        let rank: i32 = chars.as_str().parse().ok()?;
        if rank < 1 {
            return None;
        }
        Some(Coordinate::new(file as i32 - 'a' as i32, rank - 1))
    }

    /// Returns the algebraic notation for this coordinate, or `None` if it
    /// lies outside the file-letter/rank-digit range.
    pub fn to_algebraic(self) -> Option<String> {
        if (0..26).contains(&self.x) && self.y >= 0 {
            let file = (b'a' + self.x as u8) as char;
            Some(format!("{}{}", file, self.y + 1))
        } else {
            None
        }
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn neg(self) -> Coordinate {
        Coordinate::new(-self.x, -self.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_algebraic() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}
