//! Player representation.

use crate::Coordinate;

/// One of the two sides in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    /// Returns the opposing player.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Returns the unit step a pawn of this player advances by.
    #[inline]
    pub const fn forward(self) -> Coordinate {
        match self {
            Player::White => Coordinate::NORTH,
            Player::Black => Coordinate::SOUTH,
        }
    }

    /// Returns the rank this player's pawns start on, for a board of the
    /// given height.
    #[inline]
    pub const fn home_pawn_rank(self, height: i32) -> i32 {
        match self {
            Player::White => 1,
            Player::Black => height - 2,
        }
    }

    /// Returns the rank this player's pawns promote on.
    #[inline]
    pub const fn promotion_rank(self, height: i32) -> i32 {
        match self {
            Player::White => height - 1,
            Player::Black => 0,
        }
    }

    /// Returns this player's back rank.
    #[inline]
    pub const fn back_rank(self, height: i32) -> i32 {
        match self {
            Player::White => 0,
            Player::Black => height - 1,
        }
    }

    /// Returns the FEN side-to-move letter.
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            Player::White => 'w',
            Player::Black => 'b',
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite() {
        assert_eq!(Player::White.opposite(), Player::Black);
        assert_eq!(Player::Black.opposite(), Player::White);
    }

    #[test]
    fn forward() {
        assert_eq!(Player::White.forward(), Coordinate::NORTH);
        assert_eq!(Player::Black.forward(), Coordinate::SOUTH);
    }

    #[test]
    fn ranks() {
        assert_eq!(Player::White.home_pawn_rank(8), 1);
        assert_eq!(Player::Black.home_pawn_rank(8), 6);
        assert_eq!(Player::White.promotion_rank(8), 7);
        assert_eq!(Player::Black.promotion_rank(8), 0);
        assert_eq!(Player::White.back_rank(8), 0);
        assert_eq!(Player::Black.back_rank(8), 7);
    }

    #[test]
    fn display() {
        assert_eq!(Player::White.to_string(), "White");
        assert_eq!(Player::Black.to_string(), "Black");
    }
}
