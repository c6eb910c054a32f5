//! A standard-chess rules engine: legal move generation, game-over
//! detection, and algebraic move logging over an identity-tracked board.
//!
//! The crate splits into a placement substrate ([`Position`]) that knows
//! where every piece stands, and a session wrapper ([`Board`]) that owns
//! the turn cycle, the repetition table, the move log, and the outcome.
//! Pieces are plain values addressed by [`PieceId`]; all move logic lives
//! in free functions over a position.
//!
//! ```
//! use rules_core::Coordinate;
//! use rules_engine::Board;
//!
//! let mut board = Board::new();
//! let pawn = board.piece_at(Coordinate::from_algebraic("e2").unwrap()).unwrap();
//! board.move_piece(pawn, Coordinate::from_algebraic("e4").unwrap()).unwrap();
//! assert_eq!(board.move_log(), ["e4"]);
//! ```

pub mod agent;
mod board;
pub mod movegen;
mod notation;
mod position;

pub use board::{Board, BoardError, Outcome};
pub use movegen::{destinations, has_any_legal_move};
pub use position::{CastlingRights, PieceId, PieceInfo, Position};
