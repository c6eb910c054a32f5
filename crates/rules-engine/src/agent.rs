//! The boundary between the rules and anything that picks moves.
//!
//! An [`Agent`] sees the board read-only and answers with a [`Decision`];
//! the session loop applies it through [`Board`](crate::Board)'s mutation
//! API. Humans, bots, and network players all fit behind the same trait.

use rules_core::{Coordinate, PieceKind};

use crate::board::Board;
use crate::position::PieceId;

/// What an agent wants to do with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Move the piece to the destination. The destination must be legal
    /// for the piece or the board will reject it.
    Play { piece: PieceId, to: Coordinate },
    /// Concede the game.
    Resign,
}

/// A move chooser for one side.
pub trait Agent {
    /// Chooses the next action. Called only while the game is live and it
    /// is this agent's turn.
    fn choose_move(&mut self, board: &Board) -> Decision;

    /// Chooses the piece a promoting pawn becomes. The default takes a
    /// queen, which is almost always right.
    fn choose_promotion(&mut self, _board: &Board) -> PieceKind {
        PieceKind::Queen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_core::Player;

    /// Plays the first legal move it finds, in piece-id order.
    struct FirstLegal;

    impl Agent for FirstLegal {
        fn choose_move(&mut self, board: &Board) -> Decision {
            for (piece, _) in board.pieces_of(board.turn()) {
                if let Some(&to) = board.destinations_of(piece).iter().next() {
                    return Decision::Play { piece, to };
                }
            }
            Decision::Resign
        }
    }

    #[test]
    fn default_promotion_is_queen() {
        struct Passive;
        impl Agent for Passive {
            fn choose_move(&mut self, _board: &Board) -> Decision {
                Decision::Resign
            }
        }
        let board = Board::new();
        assert_eq!(Passive.choose_promotion(&board), PieceKind::Queen);
    }

    #[test]
    fn agent_drives_a_board() {
        let mut board = Board::new();
        let mut white = FirstLegal;
        let mut black = FirstLegal;
        for _ in 0..10 {
            if board.is_game_over() {
                break;
            }
            let agent: &mut dyn Agent = if board.turn() == Player::White {
                &mut white
            } else {
                &mut black
            };
            match agent.choose_move(&board) {
                Decision::Play { piece, to } => board.move_piece(piece, to).unwrap(),
                Decision::Resign => board.resign(board.turn()).unwrap(),
            }
            if board.awaiting_promotion().is_some() {
                board.promote(agent.choose_promotion(&board)).unwrap();
            }
        }
        assert!(board.move_log().len() >= 10 || board.is_game_over());
    }
}
