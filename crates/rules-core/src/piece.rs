//! Piece kinds and their movement capabilities.

use crate::{Coordinate, Player};

/// The value assigned to a king: large enough that no exchange ever
/// trades one away.
const KING_VALUE: i32 = 99_999;

/// Offsets for the knight's jump (shared by the knook).
const KNIGHT_JUMPS: [Coordinate; 8] = [
    Coordinate::new(1, 2),
    Coordinate::new(2, 1),
    Coordinate::new(2, -1),
    Coordinate::new(1, -2),
    Coordinate::new(-1, -2),
    Coordinate::new(-2, -1),
    Coordinate::new(-2, 1),
    Coordinate::new(-1, 2),
];

/// The kinds of pieces in play.
///
/// `Knook` is a variant-rules piece combining knight and rook movement; it
/// never appears in a standard game but flows through the same capability
/// model as everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
    Knook = 6,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Knook,
    ];

    /// Returns the conventional material value of this kind.
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => KING_VALUE,
            PieceKind::Knook => 161_660,
        }
    }

    /// Returns the FEN character for this kind owned by the given player.
    pub const fn fen_char(self, owner: Player) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
            PieceKind::Knook => 'o',
        };
        match owner {
            Player::White => c.to_ascii_uppercase(),
            Player::Black => c,
        }
    }

    /// Parses a FEN character into a kind and owner.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Player)> {
        let owner = if c.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            'o' => PieceKind::Knook,
            _ => return None,
        };
        Some((kind, owner))
    }

    /// Returns the algebraic-notation letter, or `None` for pawns.
    pub const fn letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
            PieceKind::Knook => Some('O'),
        }
    }

    /// Parses a kind from its English name, case-insensitively.
    pub fn from_name(name: &str) -> Option<PieceKind> {
        match name.to_ascii_lowercase().as_str() {
            "pawn" => Some(PieceKind::Pawn),
            "knight" => Some(PieceKind::Knight),
            "bishop" => Some(PieceKind::Bishop),
            "rook" => Some(PieceKind::Rook),
            "queen" => Some(PieceKind::Queen),
            "king" => Some(PieceKind::King),
            "knook" => Some(PieceKind::Knook),
            _ => None,
        }
    }

    /// Returns true if a pawn may promote to this kind.
    pub const fn is_promotion_choice(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }

    /// Returns the fixed relative offsets this kind may jump to, if it is a
    /// positional mover.
    pub const fn fixed_offsets(self) -> Option<&'static [Coordinate]> {
        match self {
            PieceKind::Knight | PieceKind::Knook => Some(&KNIGHT_JUMPS),
            PieceKind::King => Some(&Coordinate::COMPASS),
            _ => None,
        }
    }

    /// Returns the unit directions this kind slides along, if it is a
    /// directional mover.
    pub const fn sliding_directions(self) -> Option<&'static [Coordinate]> {
        match self {
            PieceKind::Bishop => Some(&Coordinate::DIAGONALS),
            PieceKind::Rook | PieceKind::Knook => Some(&Coordinate::CARDINALS),
            PieceKind::Queen => Some(&Coordinate::COMPASS),
            _ => None,
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
            PieceKind::Knook => "Knook",
        };
        write!(f, "{}", name)
    }
}
