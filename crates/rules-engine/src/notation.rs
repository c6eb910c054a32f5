//! Algebraic move notation.
//!
//! The log records moves unambiguously rather than in minimal SAN: non-pawn
//! moves always carry their origin square ("Ng1f3"), so no SAN
//! disambiguation pass is needed to replay a game.

use rules_core::{Coordinate, PieceKind};

/// Renders the body of a move, before any check/mate suffix.
pub(crate) fn move_text(kind: PieceKind, from: Coordinate, to: Coordinate, capture: bool) -> String {
    match kind.letter() {
        // Pawn moves name the destination; captures lead with the origin file.
        None => {
            if capture {
                format!("{}x{}", file_char(from), to)
            } else {
                to.to_string()
            }
        }
        Some(letter) => {
            if capture {
                format!("{}{}x{}", letter, from, to)
            } else {
                format!("{}{}{}", letter, from, to)
            }
        }
    }
}

/// Renders a castle: `O-O` toward the kingside, `O-O-O` toward the queenside.
pub(crate) fn castle_text(kingside: bool) -> &'static str {
    if kingside {
        "O-O"
    } else {
        "O-O-O"
    }
}

/// Renders the promotion suffix, e.g. `=Q`.
pub(crate) fn promotion_suffix(kind: PieceKind) -> String {
    match kind.letter() {
        Some(letter) => format!("={}", letter),
        None => String::new(),
    }
}

fn file_char(at: Coordinate) -> char {
    (b'a' + at.x as u8) as char
}
