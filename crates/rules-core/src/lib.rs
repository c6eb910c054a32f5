//! Core value types for the chess rules engine.
//!
//! This crate provides the fundamental vocabulary shared across the engine:
//! - [`Coordinate`] for board squares and direction vectors
//! - [`Player`] as the two-sided tag
//! - [`PieceKind`] with per-kind values, FEN letters, and movement
//!   capabilities
//! - [`FenFields`] for FEN parsing and serialization

mod coord;
mod fen;
mod piece;
mod player;

pub use coord::Coordinate;
pub use fen::{FenError, FenFields};
pub use piece::PieceKind;
pub use player::Player;
