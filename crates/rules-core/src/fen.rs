//! FEN (Forsyth-Edwards Notation) field parsing and validation.

use thiserror::Error;

use crate::PieceKind;

/// Errors raised while validating a FEN record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 space-separated fields, found {0}")]
    FieldCount(usize),

    #[error("bad piece placement: {0}")]
    Placement(String),

    #[error("bad side to move: {0}")]
    SideToMove(String),

    #[error("bad castling rights: {0}")]
    Castling(String),

    #[error("bad en passant square: {0}")]
    EnPassant(String),

    #[error("bad halfmove clock: {0}")]
    HalfmoveClock(String),

    #[error("bad fullmove number: {0}")]
    FullmoveNumber(String),
}

/// The six validated fields of a FEN record.
///
/// This type only splits and checks the textual fields; turning them into a
/// live position is the engine's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenFields {
    /// Piece placement, ranks high to low, `/`-separated.
    pub placement: String,
    /// Side to move, `'w'` or `'b'`.
    pub side_to_move: char,
    /// Castling availability (`KQkq` subset, or `-`).
    pub castling: String,
    /// En passant target square, or `-`.
    pub en_passant: String,
    /// Half-moves since the last capture or pawn move.
    pub halfmove_clock: u32,
    /// Full-move number, incremented after Black moves.
    pub fullmove_number: u32,
}

impl FenFields {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses and validates a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenError::FieldCount(parts.len()));
        }

        validate_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => 'w',
            "b" => 'b',
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        validate_castling(parts[2])?;
        validate_en_passant(parts[3])?;

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::HalfmoveClock(parts[4].to_string()))?;
        let fullmove_number = parts[5]
            .parse::<u32>()
            .map_err(|_| FenError::FullmoveNumber(parts[5].to_string()))?;

        Ok(FenFields {
            placement: parts[0].to_string(),
            side_to_move,
            castling: parts[2].to_string(),
            en_passant: parts[3].to_string(),
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Serializes the fields back into a single FEN line.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.placement,
            self.side_to_move,
            self.castling,
            self.en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

fn validate_placement(placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::Placement(format!(
            "expected 8 ranks, found {}",
            ranks.len()
        )));
    }

    for (i, rank) in ranks.iter().enumerate() {
        let mut squares = 0u32;
        for c in rank.chars() {
            if let Some(run) = c.to_digit(10) {
                squares += run;
            } else if PieceKind::from_fen_char(c).is_some() {
                squares += 1;
            } else {
                return Err(FenError::Placement(format!(
                    "unknown character '{}' in rank {}",
                    c,
                    8 - i
                )));
            }
        }
        if squares != 8 {
            return Err(FenError::Placement(format!(
                "rank {} covers {} squares",
                8 - i,
                squares
            )));
        }
    }

    Ok(())
}

fn validate_castling(castling: &str) -> Result<(), FenError> {
    if castling == "-" {
        return Ok(());
    }
    if castling.is_empty() || castling.chars().any(|c| !"KQkq".contains(c)) {
        return Err(FenError::Castling(castling.to_string()));
    }
    Ok(())
}

fn validate_en_passant(ep: &str) -> Result<(), FenError> {
    if ep == "-" {
        return Ok(());
    }
    let chars: Vec<char> = ep.chars().collect();
    if chars.len() != 2
        || !('a'..='h').contains(&chars[0])
        || !(chars[1] == '3' || chars[1] == '6')
    {
        return Err(FenError::EnPassant(ep.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = FenFields::parse(FenFields::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, 'w');
        assert_eq!(fen.castling, "KQkq");
        assert_eq!(fen.en_passant, "-");
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn round_trip() {
        let original = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let parsed = FenFields::parse(original).unwrap();
        assert_eq!(parsed.to_fen(), original);
    }

    #[test]
    fn field_count() {
        assert!(matches!(
            FenFields::parse("not a fen"),
            Err(FenError::FieldCount(3))
        ));
    }

    #[test]
    fn placement_errors() {
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            FenFields::parse("rnbqkbnr/ppppXppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            FenFields::parse("9/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
    }

    #[test]
    fn knook_letter_is_accepted() {
        assert!(FenFields::parse("7O/8/8/8/8/8/8/o7 w - - 0 1").is_ok());
    }

    #[test]
    fn side_to_move_errors() {
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::SideToMove(_))
        ));
    }

    #[test]
    fn castling_errors() {
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w KX - 0 1"),
            Err(FenError::Castling(_))
        ));
        assert!(FenFields::parse("8/8/8/8/8/8/8/8 w Kq - 0 1").is_ok());
    }

    #[test]
    fn en_passant_errors() {
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::EnPassant(_))
        ));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w - zz 0 1"),
            Err(FenError::EnPassant(_))
        ));
        assert!(FenFields::parse("8/8/8/8/8/8/8/8 b - e3 0 1").is_ok());
        assert!(FenFields::parse("8/8/8/8/8/8/8/8 w - d6 0 1").is_ok());
    }

    #[test]
    fn clock_errors() {
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w - - x 1"),
            Err(FenError::HalfmoveClock(_))
        ));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w - - 0 x"),
            Err(FenError::FullmoveNumber(_))
        ));
    }
}
