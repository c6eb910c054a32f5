//! Move generation and legality.
//!
//! Every piece kind flows through one of three capability paths: a fixed
//! offset table (king, knight), a sliding walk along unit directions
//! (bishop, rook, queen), or bespoke logic (pawn). The knook takes both the
//! fixed and sliding paths. Castling is grafted onto the king's set under
//! its own safety conditions.
//!
//! Legality probes never mutate the live position: a candidate move is
//! applied to a clone, the mover's own king is tested for check, and the
//! clone is discarded. Calling [`destinations`] any number of times leaves
//! the position byte-identical.

use std::collections::BTreeSet;

use rules_core::{Coordinate, PieceKind, Player};

use crate::position::{PieceId, Position};

/// Computes the squares the piece may move to.
///
/// With `consider_checks` set, candidates that would leave the mover's own
/// king attacked are filtered out. Without it, the raw move-shape set is
/// returned; this is what attack enumeration uses.
///
/// A captured piece has no destinations.
pub fn destinations(
    position: &Position,
    id: PieceId,
    consider_checks: bool,
) -> BTreeSet<Coordinate> {
    let mut out = BTreeSet::new();
    let Some(from) = position.coordinate_of(id) else {
        return out;
    };
    let info = position.piece(id);

    if info.kind == PieceKind::Pawn {
        pawn_destinations(position, id, from, info.owner, consider_checks, &mut out);
        return out;
    }

    if let Some(offsets) = info.kind.fixed_offsets() {
        for &offset in offsets {
            let target = from + offset;
            if is_valid_target(position, id, target, consider_checks) {
                out.insert(target);
            }
        }
    }

    if let Some(directions) = info.kind.sliding_directions() {
        for &direction in directions {
            let mut target = from + direction;
            while is_valid_target(position, id, target, false) {
                if !consider_checks || is_valid_target(position, id, target, true) {
                    out.insert(target);
                }
                if position.piece_at(target).is_some() {
                    break;
                }
                target = target + direction;
            }
        }
    }

    if info.kind == PieceKind::King {
        castle_destinations(position, id, from, info.owner, &mut out);
    }

    out
}

/// Returns true if the player has at least one legal move.
pub fn has_any_legal_move(position: &Position, player: Player) -> bool {
    position
        .pieces_of(player)
        .into_iter()
        .any(|(id, _)| !destinations(position, id, true).is_empty())
}

/// Whether `target` is a square the piece could occupy: on the board and
/// not held by a friendly piece, and (when `consider_checks` is set) not
/// leaving the mover's own king attacked.
fn is_valid_target(
    position: &Position,
    id: PieceId,
    target: Coordinate,
    consider_checks: bool,
) -> bool {
    if !position.in_bounds(target) {
        return false;
    }
    if let Some(occupant) = position.piece_at(target) {
        if position.piece(occupant).owner == position.piece(id).owner {
            return false;
        }
    }
    if !consider_checks {
        return true;
    }
    !leaves_own_king_attacked(position, id, target)
}

fn leaves_own_king_attacked(position: &Position, id: PieceId, target: Coordinate) -> bool {
    let owner = position.piece(id).owner;
    let mut probe = position.clone();
    apply_candidate(&mut probe, id, target);
    probe.is_in_check(owner)
}

/// Applies the bare displacement of a candidate move to `position`,
/// including the en-passant side capture. Commit-time bookkeeping (rights,
/// clocks, notation) is not performed; this is exactly what a legality
/// probe needs.
///
/// En passant is strictly a diagonal capture: a straight push that happens
/// to land on the en-passant square removes nothing.
pub(crate) fn apply_candidate(position: &mut Position, id: PieceId, target: Coordinate) {
    let info = position.piece(id);
    if info.kind == PieceKind::Pawn
        && position.en_passant() == Some(target)
        && position
            .coordinate_of(id)
            .is_some_and(|from| from.x != target.x)
    {
        position.remove_at(target - info.owner.forward());
    }
    position.displace(id, target);
}

fn pawn_destinations(
    position: &Position,
    id: PieceId,
    from: Coordinate,
    owner: Player,
    consider_checks: bool,
    out: &mut BTreeSet<Coordinate>,
) {
    let forward = owner.forward();

    let single = from + forward;
    if position.piece_at(single).is_none() && is_valid_target(position, id, single, consider_checks)
    {
        out.insert(single);
    }

    let double = from + forward + forward;
    if from.y == owner.home_pawn_rank(position.height())
        && position.piece_at(single).is_none()
        && position.piece_at(double).is_none()
        && is_valid_target(position, id, double, consider_checks)
    {
        out.insert(double);
    }

    for side in [Coordinate::EAST, Coordinate::WEST] {
        let target = from + forward + side;
        let capturable = match position.piece_at(target) {
            Some(occupant) => position.piece(occupant).owner != owner,
            None => position.en_passant() == Some(target),
        };
        if capturable && is_valid_target(position, id, target, consider_checks) {
            out.insert(target);
        }
    }
}

/// Adds the king's castling destinations, each gated on: the wing's right
/// still held, a friendly rook on its home corner, every square between
/// king and rook empty, the king not currently in check, and neither the
/// transit square nor the destination attacked. The last two are decided by
/// performing the displacement on a probe clone.
fn castle_destinations(
    position: &Position,
    id: PieceId,
    from: Coordinate,
    owner: Player,
    out: &mut BTreeSet<Coordinate>,
) {
    let back = owner.back_rank(position.height());
    if from.y != back {
        return;
    }
    if position.is_in_check(owner) {
        return;
    }

    for (kingside, direction) in [(true, Coordinate::EAST), (false, Coordinate::WEST)] {
        let allowed = if kingside {
            position.castling().can_kingside(owner)
        } else {
            position.castling().can_queenside(owner)
        };
        if !allowed {
            continue;
        }

        let corner = Coordinate::new(if kingside { position.width() - 1 } else { 0 }, back);
        let rook_home = position.piece_at(corner).is_some_and(|rook| {
            let rook = position.piece(rook);
            rook.kind == PieceKind::Rook && rook.owner == owner
        });
        if !rook_home {
            continue;
        }

        let mut between = from + direction;
        let mut clear = true;
        while between != corner {
            if position.piece_at(between).is_some() {
                clear = false;
                break;
            }
            between = between + direction;
        }
        if !clear {
            continue;
        }

        let transit = from + direction;
        let destination = transit + direction;

        if king_attacked_at(position, id, owner, transit) {
            continue;
        }

        // The full castle, rook leg included, must leave the king safe.
        let mut probe = position.clone();
        probe.displace(id, destination);
        if let Some(rook) = probe.piece_at(corner) {
            probe.displace(rook, transit);
        }
        if probe.is_in_check(owner) {
            continue;
        }

        out.insert(destination);
    }
}

fn king_attacked_at(position: &Position, id: PieceId, owner: Player, at: Coordinate) -> bool {
    let mut probe = position.clone();
    probe.displace(id, at);
    probe.is_in_check(owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Coordinate {
        Coordinate::from_algebraic(s).unwrap()
    }

    fn targets(position: &Position, at: &str) -> BTreeSet<Coordinate> {
        let id = position.piece_at(sq(at)).unwrap();
        destinations(position, id, true)
    }

    fn set(squares: &[&str]) -> BTreeSet<Coordinate> {
        squares.iter().map(|s| sq(s)).collect()
    }

    #[test]
    fn pawn_start_moves() {
        let pos = Position::startpos();
        assert_eq!(targets(&pos, "e2"), set(&["e3", "e4"]));
    }

    #[test]
    fn pawn_blocked() {
        let pos = Position::from_fen("8/8/8/8/4p3/4P3/8/K6k w - - 0 1").unwrap();
        assert!(targets(&pos, "e3").is_empty());
    }

    #[test]
    fn pawn_double_needs_both_squares_empty() {
        let pos = Position::from_fen("8/8/8/8/4p3/8/4P3/K6k w - - 0 1").unwrap();
        assert_eq!(targets(&pos, "e2"), set(&["e3"]));
    }

    #[test]
    fn pawn_captures_diagonally() {
        let pos = Position::from_fen("8/8/8/3p4/4P3/8/8/K6k w - - 0 1").unwrap();
        assert_eq!(targets(&pos, "e4"), set(&["d5", "e5"]));
    }

    #[test]
    fn stale_en_passant_square_does_not_trigger_side_capture() {
        // The en-passant square sits directly in front of the pawn; a
        // straight push onto it must stay a quiet move, not a capture.
        let pos = Position::from_fen("k7/8/8/4P3/8/8/8/K7 w - e6 0 1").unwrap();
        assert_eq!(targets(&pos, "e5"), set(&["e6"]));

        let id = pos.piece_at(sq("e5")).unwrap();
        let mut probe = pos.clone();
        apply_candidate(&mut probe, id, sq("e6"));
        assert_eq!(probe.coordinate_of(id), Some(sq("e6")));
        assert!(probe.is_consistent());
    }

    #[test]
    fn pawn_en_passant_target() {
        let pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
                .unwrap();
        assert!(targets(&pos, "e5").contains(&sq("d6")));
    }

    #[test]
    fn knight_start_moves() {
        let pos = Position::startpos();
        assert_eq!(targets(&pos, "g1"), set(&["f3", "h3"]));
    }

    #[test]
    fn sliding_stops_at_blockers() {
        let pos = Position::from_fen("8/8/8/8/1p6/8/8/RK5k w - - 0 1").unwrap();
        // Rook a1: up the a-file until the pawn on b4 is irrelevant; the
        // king on b1 blocks the rank immediately.
        assert_eq!(
            targets(&pos, "a1"),
            set(&["a2", "a3", "a4", "a5", "a6", "a7", "a8"])
        );
    }

    #[test]
    fn sliding_includes_capture_square() {
        let pos = Position::from_fen("8/8/8/8/p7/8/8/RK5k w - - 0 1").unwrap();
        assert_eq!(targets(&pos, "a1"), set(&["a2", "a3", "a4"]));
    }

    #[test]
    fn no_moves_at_start_for_back_pieces() {
        let pos = Position::startpos();
        for at in ["a1", "c1", "d1", "e1", "f1", "h1"] {
            assert!(targets(&pos, at).is_empty(), "{} should be stuck", at);
        }
    }

    #[test]
    fn pinned_piece_has_no_moves() {
        // Black rook on a1 pins the knight on d1 against the king on e1.
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/r2NK3 w - - 0 1").unwrap();
        assert!(targets(&pos, "d1").is_empty());
    }

    #[test]
    fn king_must_step_out_of_line() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        // Every first-rank square stays in the rook's line.
        assert_eq!(targets(&pos, "e1"), set(&["d2", "e2", "f2"]));
    }

    #[test]
    fn probes_leave_position_untouched() {
        let pos = Position::startpos();
        let before = pos.to_fen();
        for (id, _) in pos.pieces_of(Player::White) {
            let first = destinations(&pos, id, true);
            let second = destinations(&pos, id, true);
            assert_eq!(first, second);
        }
        assert_eq!(pos.to_fen(), before);
        assert!(pos.is_consistent());
    }

    #[test]
    fn castling_both_wings_open() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let king = targets(&pos, "e1");
        assert!(king.contains(&sq("g1")));
        assert!(king.contains(&sq("c1")));
    }

    #[test]
    fn castling_requires_rights() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1").unwrap();
        let king = targets(&pos, "e1");
        assert!(!king.contains(&sq("g1")));
        assert!(king.contains(&sq("c1")));
    }

    #[test]
    fn castling_blocked_by_attacked_transit() {
        // Black rook on f3 covers f1; only the queenside stays available.
        let pos = Position::from_fen("4k3/8/8/8/8/5r2/8/R3K2R w KQ - 0 1").unwrap();
        let king = targets(&pos, "e1");
        assert!(!king.contains(&sq("g1")));
        assert!(king.contains(&sq("c1")));
    }

    #[test]
    fn castling_blocked_while_in_check() {
        let pos = Position::from_fen("4k3/8/8/8/8/4r3/8/R3K2R w KQ - 0 1").unwrap();
        let king = targets(&pos, "e1");
        assert!(!king.contains(&sq("g1")));
        assert!(!king.contains(&sq("c1")));
    }

    #[test]
    fn castling_blocked_by_piece_between() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1").unwrap();
        let king = targets(&pos, "e1");
        assert!(king.contains(&sq("g1")));
        assert!(!king.contains(&sq("c1")));
    }

    #[test]
    fn castling_requires_rook_on_corner() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w Q - 0 1").unwrap();
        // Queenside right is held but the rook is gone.
        assert!(!targets(&pos, "e1").contains(&sq("c1")));
    }

    #[test]
    fn knook_unions_both_capabilities() {
        let mut pos = Position::empty(8, 8);
        pos.place_new(PieceKind::King, Player::White, sq("h1"));
        pos.place_new(PieceKind::King, Player::Black, sq("h8"));
        let knook = pos.place_new(PieceKind::Knook, Player::White, sq("d4"));
        let moves = destinations(&pos, knook, true);
        // Rook-style along the d-file...
        assert!(moves.contains(&sq("d8")));
        assert!(moves.contains(&sq("a4")));
        // ...and knight jumps.
        assert!(moves.contains(&sq("e6")));
        assert!(moves.contains(&sq("c2")));
        // No diagonals.
        assert!(!moves.contains(&sq("e5")));
    }

    #[test]
    fn has_any_legal_move_start() {
        let pos = Position::startpos();
        assert!(has_any_legal_move(&pos, Player::White));
        assert!(has_any_legal_move(&pos, Player::Black));
    }

    #[test]
    fn no_legal_moves_when_mated() {
        // Back-rank mate: white king boxed in by its own pawns.
        let pos = Position::from_fen("4k3/8/8/8/8/8/5PPP/r5K1 w - - 0 1").unwrap();
        assert!(pos.is_in_check(Player::White));
        assert!(!has_any_legal_move(&pos, Player::White));
    }
}
