//! Game session state and the single mutation entry point.
//!
//! [`Board`] wraps a [`Position`] with everything a whole game needs beyond
//! placement: the repetition table, the notation log, the pending-promotion
//! latch, and the terminal outcome. All mutation funnels through
//! [`Board::move_piece`], [`Board::promote`], and [`Board::resign`]; an
//! erroneous call returns before any state changes.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use rules_core::{Coordinate, FenError, PieceKind, Player};
use thiserror::Error;

use crate::movegen;
use crate::notation;
use crate::position::{PieceId, PieceInfo, Position};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Player },
    Stalemate,
    FiftyMoveRule,
    ThreefoldRepetition,
    Resignation { winner: Player },
}

impl Outcome {
    /// The winning player, or `None` for a draw.
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Checkmate { winner } | Outcome::Resignation { winner } => Some(winner),
            _ => None,
        }
    }

    /// The terminal score token appended to the move log.
    pub fn score_token(self) -> &'static str {
        match self.winner() {
            Some(Player::White) => "1-0",
            Some(Player::Black) => "0-1",
            None => "1/2-1/2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "Checkmate! {} wins.", winner),
            Outcome::Stalemate => write!(f, "Stalemate."),
            Outcome::FiftyMoveRule => write!(f, "Draw by the fifty-move rule."),
            Outcome::ThreefoldRepetition => write!(f, "Draw by threefold repetition."),
            Outcome::Resignation { winner } => write!(f, "{} wins by resignation.", winner),
        }
    }
}

/// Contract violations surfaced to the caller.
///
/// Every variant marks a caller bug, not a recoverable condition; the board
/// is left exactly as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("the game is already over")]
    GameOver,

    #[error("it is {turn}'s turn, but a {owner} piece was moved")]
    OutOfTurn { owner: Player, turn: Player },

    #[error("the piece is not on the board")]
    PieceNotOnBoard,

    #[error("illegal move from {from} to {to}")]
    IllegalDestination { from: Coordinate, to: Coordinate },

    #[error("a promotion is pending and must be resolved first")]
    PromotionPending,

    #[error("no promotion is pending")]
    NoPendingPromotion,

    #[error("a pawn cannot promote to a {0}")]
    InvalidPromotionKind(PieceKind),
}

/// A pawn waiting on the back rank, plus the notation built so far for the
/// half-move that put it there.
#[derive(Debug, Clone)]
struct PendingPromotion {
    square: Coordinate,
    base_text: String,
}

/// A complete game: placement state plus history, log, and outcome.
#[derive(Debug, Clone)]
pub struct Board {
    position: Position,
    start: Position,
    repetition: HashMap<String, u32>,
    move_log: Vec<String>,
    outcome: Option<Outcome>,
    pending_promotion: Option<PendingPromotion>,
    last_clicked: Option<Coordinate>,
}

impl Board {
    /// Half-move count at which the game draws by the move clock.
    const HALFMOVE_DRAW_LIMIT: u32 = 50;
    /// Fingerprint occurrences at which the game draws by repetition.
    const REPETITION_DRAW_LIMIT: u32 = 3;

    /// Creates a board in the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Creates a board from an arbitrary placement, e.g. for tests.
    pub fn from_position(position: Position) -> Self {
        let mut board = Board {
            start: position.clone(),
            position,
            repetition: HashMap::new(),
            move_log: Vec::new(),
            outcome: None,
            pending_promotion: None,
            last_clicked: None,
        };
        board.initialize();
        board
    }

    /// Creates a board from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Seeds the repetition table and detects a position that is already
    /// decided before anyone moves.
    fn initialize(&mut self) {
        self.repetition.insert(self.position.fingerprint(), 1);

        let side = self.position.turn();
        if !movegen::has_any_legal_move(&self.position, side) {
            self.outcome = Some(if self.position.is_in_check(side) {
                Outcome::Checkmate {
                    winner: side.opposite(),
                }
            } else {
                Outcome::Stalemate
            });
        } else if self.position.halfmove_clock() >= Self::HALFMOVE_DRAW_LIMIT {
            self.outcome = Some(Outcome::FiftyMoveRule);
        }
    }

    /// Reinitializes every field to the starting snapshot, keeping the
    /// session object itself alive for another game.
    pub fn reset(&mut self) {
        self.position = self.start.clone();
        self.repetition.clear();
        self.move_log.clear();
        self.outcome = None;
        self.pending_promotion = None;
        self.last_clicked = None;
        self.initialize();
    }

    /// The current placement state.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The player to move.
    pub fn turn(&self) -> Player {
        self.position.turn()
    }

    /// Returns true once the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// How the game ended, if it has.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Human-readable reason the game ended, if it has.
    pub fn game_over_reason(&self) -> Option<String> {
        self.outcome.map(|o| o.to_string())
    }

    /// The square of a pawn awaiting its promotion choice, if any. While
    /// set, no move is accepted and the turn does not advance.
    pub fn awaiting_promotion(&self) -> Option<Coordinate> {
        self.pending_promotion.as_ref().map(|p| p.square)
    }

    /// Returns the piece on the given square, if any.
    pub fn piece_at(&self, at: Coordinate) -> Option<PieceId> {
        self.position.piece_at(at)
    }

    /// Returns what a piece is.
    pub fn piece(&self, id: PieceId) -> PieceInfo {
        self.position.piece(id)
    }

    /// Returns where a piece stands, or `None` once captured.
    pub fn coordinate_of(&self, id: PieceId) -> Option<Coordinate> {
        self.position.coordinate_of(id)
    }

    /// The player's on-board pieces with their coordinates.
    pub fn pieces_of(&self, player: Player) -> Vec<(PieceId, Coordinate)> {
        self.position.pieces_of(player)
    }

    /// The piece's legal destinations, king safety considered.
    pub fn destinations_of(&self, id: PieceId) -> BTreeSet<Coordinate> {
        movegen::destinations(&self.position, id, true)
    }

    /// Returns true if the player's king is attacked.
    pub fn is_in_check(&self, player: Player) -> bool {
        self.position.is_in_check(player)
    }

    /// Returns true if the player is checkmated: in check with no legal move.
    pub fn is_checkmate(&self, player: Player) -> bool {
        self.position.is_in_check(player) && !movegen::has_any_legal_move(&self.position, player)
    }

    /// Returns true if the player is stalemated: no legal move, yet not in
    /// check.
    pub fn is_stalemate(&self, player: Player) -> bool {
        !self.position.is_in_check(player) && !movegen::has_any_legal_move(&self.position, player)
    }

    /// Half-moves since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmove_clock()
    }

    /// The full-move number, starting at 1.
    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmove_number()
    }

    /// Exports the current position as FEN.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// The notation log, one entry per half-move plus a terminal score
    /// token once the game ends.
    pub fn move_log(&self) -> &[String] {
        &self.move_log
    }

    /// The log joined into a single space-separated record.
    pub fn log_as_string(&self) -> String {
        self.move_log.join(" ")
    }

    /// Stores the renderer's last-clicked square. The board attaches no
    /// meaning to it; it is a convenience channel between input and paint.
    pub fn set_last_clicked(&mut self, at: Option<Coordinate>) {
        self.last_clicked = at;
    }

    /// The stored last-clicked square, if any.
    pub fn last_clicked(&self) -> Option<Coordinate> {
        self.last_clicked
    }

    /// Commits one half-move: the piece moves to `to`, which must be in its
    /// legal destination set. On success the turn advances (unless the move
    /// leaves a pawn awaiting promotion) and end-of-game conditions are
    /// evaluated. On error the board is untouched.
    pub fn move_piece(&mut self, id: PieceId, to: Coordinate) -> Result<(), BoardError> {
        if self.outcome.is_some() {
            return Err(BoardError::GameOver);
        }
        if self.pending_promotion.is_some() {
            return Err(BoardError::PromotionPending);
        }
        let from = self
            .position
            .coordinate_of(id)
            .ok_or(BoardError::PieceNotOnBoard)?;
        let mover = self.position.piece(id);
        if mover.owner != self.position.turn() {
            return Err(BoardError::OutOfTurn {
                owner: mover.owner,
                turn: self.position.turn(),
            });
        }
        if !movegen::destinations(&self.position, id, true).contains(&to) {
            return Err(BoardError::IllegalDestination { from, to });
        }

        self.commit(id, mover, from, to);
        Ok(())
    }

    /// Resolves a pending promotion with the chosen piece kind, then runs
    /// the deferred end-of-turn sequence.
    pub fn promote(&mut self, kind: PieceKind) -> Result<(), BoardError> {
        if self.outcome.is_some() {
            return Err(BoardError::GameOver);
        }
        match self.pending_promotion.take() {
            None => Err(BoardError::NoPendingPromotion),
            Some(pending) if !kind.is_promotion_choice() => {
                self.pending_promotion = Some(pending);
                Err(BoardError::InvalidPromotionKind(kind))
            }
            Some(pending) => {
                let pawn = self
                    .position
                    .piece_at(pending.square)
                    .expect("pending promotion square holds the pawn");
                self.position.set_kind(pawn, kind);
                let text = format!(
                    "{}{}",
                    pending.base_text,
                    notation::promotion_suffix(kind)
                );
                self.finish_turn(text);
                Ok(())
            }
        }
    }

    /// Ends the game immediately in the opponent's favor. The only way the
    /// game can end outside the end-of-turn evaluation.
    pub fn resign(&mut self, player: Player) -> Result<(), BoardError> {
        if self.outcome.is_some() {
            return Err(BoardError::GameOver);
        }
        let outcome = Outcome::Resignation {
            winner: player.opposite(),
        };
        self.move_log.push(outcome.score_token().to_string());
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Applies an already-validated move.
    fn commit(&mut self, id: PieceId, mover: PieceInfo, from: Coordinate, to: Coordinate) {
        let height = self.position.height();
        // En passant is only ever a diagonal capture; a straight push onto
        // the en-passant square takes nothing.
        let ep_capture = mover.kind == PieceKind::Pawn
            && self.position.en_passant() == Some(to)
            && from.x != to.x;
        let castled = mover.kind == PieceKind::King && (to.x - from.x).abs() == 2;

        let captured = self.position.displace(id, to).map(|v| self.position.piece(v));
        if ep_capture {
            let passed = self.position.remove_at(to - mover.owner.forward());
            debug_assert!(passed.is_some(), "en passant capture had no passed pawn");
        }
        let is_capture = captured.is_some() || ep_capture;

        // A rook captured on its home corner loses that wing for its owner.
        if let Some(victim) = captured {
            if victim.kind == PieceKind::Rook {
                if to == self.rook_corner(victim.owner, true) {
                    self.position.castling_mut().revoke_kingside(victim.owner);
                } else if to == self.rook_corner(victim.owner, false) {
                    self.position.castling_mut().revoke_queenside(victim.owner);
                }
            }
        }

        if is_capture || mover.kind == PieceKind::Pawn {
            self.position.reset_halfmove_clock();
        } else {
            self.position.bump_halfmove_clock();
        }

        // En passant only survives into the very next half-move.
        let mut next_en_passant = None;
        match mover.kind {
            PieceKind::Pawn => {
                if (to.y - from.y).abs() == 2 {
                    next_en_passant = Some(from + mover.owner.forward());
                }
            }
            PieceKind::King => {
                if castled {
                    let kingside = to.x > from.x;
                    let corner = self.rook_corner(mover.owner, kingside);
                    let transit = from + if kingside { Coordinate::EAST } else { Coordinate::WEST };
                    if let Some(rook) = self.position.piece_at(corner) {
                        self.position.displace(rook, transit);
                    } else {
                        debug_assert!(false, "castle committed without a rook on {}", corner);
                    }
                }
                self.position.castling_mut().revoke_both(mover.owner);
            }
            PieceKind::Rook => {
                if from == self.rook_corner(mover.owner, true) {
                    self.position.castling_mut().revoke_kingside(mover.owner);
                } else if from == self.rook_corner(mover.owner, false) {
                    self.position.castling_mut().revoke_queenside(mover.owner);
                }
            }
            _ => {}
        }
        self.position.set_en_passant(next_en_passant);

        let text = if castled {
            notation::castle_text(to.x > from.x).to_string()
        } else {
            notation::move_text(mover.kind, from, to, is_capture)
        };

        if mover.kind == PieceKind::Pawn && to.y == mover.owner.promotion_rank(height) {
            // The half-move is not finished: turn advancement and notation
            // wait for the promotion choice.
            self.pending_promotion = Some(PendingPromotion {
                square: to,
                base_text: text,
            });
            return;
        }

        self.finish_turn(text);
    }

    /// Advances the turn, evaluates every end-of-game condition for the new
    /// side to move, and appends the move's notation (with suffix and, when
    /// the game ends, the score token).
    fn finish_turn(&mut self, base_text: String) {
        self.position.advance_turn();
        let side = self.position.turn();
        let in_check = self.position.is_in_check(side);

        let mut outcome = None;
        if !movegen::has_any_legal_move(&self.position, side) {
            outcome = Some(if in_check {
                Outcome::Checkmate {
                    winner: side.opposite(),
                }
            } else {
                Outcome::Stalemate
            });
        } else if self.position.halfmove_clock() >= Self::HALFMOVE_DRAW_LIMIT {
            outcome = Some(Outcome::FiftyMoveRule);
        }

        let occurrences = {
            let count = self.repetition.entry(self.position.fingerprint()).or_insert(0);
            *count += 1;
            *count
        };
        if outcome.is_none() && occurrences >= Self::REPETITION_DRAW_LIMIT {
            outcome = Some(Outcome::ThreefoldRepetition);
        }

        let mut text = base_text;
        match outcome {
            Some(Outcome::Checkmate { .. }) => text.push('#'),
            _ if in_check => text.push('+'),
            _ => {}
        }
        self.move_log.push(text);

        if let Some(outcome) = outcome {
            self.move_log.push(outcome.score_token().to_string());
            self.outcome = Some(outcome);
        }
    }

    fn rook_corner(&self, owner: Player, kingside: bool) -> Coordinate {
        Coordinate::new(
            if kingside { self.position.width() - 1 } else { 0 },
            owner.back_rank(self.position.height()),
        )
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
