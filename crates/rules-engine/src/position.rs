//! Piece placement and position state.
//!
//! [`Position`] is the placement substrate: who stands where, whose turn it
//! is, castling rights, the en-passant target, and the move clocks. It owns
//! every piece by an opaque [`PieceId`]; piece-type logic lives in
//! [`crate::movegen`] as stateless functions over `(position, id)`.

use std::collections::HashMap;

use rules_core::{Coordinate, FenError, FenFields, PieceKind, Player};

/// Opaque identity of a piece owned by a [`Position`].
///
/// Identities are stable for the life of a position (and its clones); a
/// captured piece keeps its identity but no longer maps to a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u32);

impl PieceId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a piece is, independent of where it stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceInfo {
    pub kind: PieceKind,
    pub owner: Player,
}

/// The four independent castling permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    const WHITE_KINGSIDE: u8 = 0b0001;
    const WHITE_QUEENSIDE: u8 = 0b0010;
    const BLACK_KINGSIDE: u8 = 0b0100;
    const BLACK_QUEENSIDE: u8 = 0b1000;

    /// No castling available to either side.
    pub const NONE: CastlingRights = CastlingRights(0);
    /// All four permissions held.
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    const fn kingside_flag(player: Player) -> u8 {
        match player {
            Player::White => Self::WHITE_KINGSIDE,
            Player::Black => Self::BLACK_KINGSIDE,
        }
    }

    #[inline]
    const fn queenside_flag(player: Player) -> u8 {
        match player {
            Player::White => Self::WHITE_QUEENSIDE,
            Player::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if the player may still castle kingside.
    #[inline]
    pub const fn can_kingside(self, player: Player) -> bool {
        self.0 & Self::kingside_flag(player) != 0
    }

    /// Returns true if the player may still castle queenside.
    #[inline]
    pub const fn can_queenside(self, player: Player) -> bool {
        self.0 & Self::queenside_flag(player) != 0
    }

    /// Irreversibly removes the player's kingside permission.
    #[inline]
    pub fn revoke_kingside(&mut self, player: Player) {
        self.0 &= !Self::kingside_flag(player);
    }

    /// Irreversibly removes the player's queenside permission.
    #[inline]
    pub fn revoke_queenside(&mut self, player: Player) {
        self.0 &= !Self::queenside_flag(player);
    }

    /// Removes both of the player's permissions.
    #[inline]
    pub fn revoke_both(&mut self, player: Player) {
        self.0 &= !(Self::kingside_flag(player) | Self::queenside_flag(player));
    }

    /// Builds rights from a FEN castling field (`KQkq` subset or `-`).
    pub fn from_fen_field(field: &str) -> Self {
        let mut flags = 0u8;
        for c in field.chars() {
            match c {
                'K' => flags |= Self::WHITE_KINGSIDE,
                'Q' => flags |= Self::WHITE_QUEENSIDE,
                'k' => flags |= Self::BLACK_KINGSIDE,
                'q' => flags |= Self::BLACK_QUEENSIDE,
                _ => {}
            }
        }
        CastlingRights(flags)
    }

    /// Renders the FEN castling field (`-` when no right remains).
    pub fn fen_field(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut out = String::new();
        if self.can_kingside(Player::White) {
            out.push('K');
        }
        if self.can_queenside(Player::White) {
            out.push('Q');
        }
        if self.can_kingside(Player::Black) {
            out.push('k');
        }
        if self.can_queenside(Player::Black) {
            out.push('q');
        }
        out
    }
}

/// A full placement state.
///
/// `placement` and `locate` are inverse views of the same fact; the pair is
/// kept in lockstep by the mutation primitives and checked by
/// [`Position::is_consistent`]. Cloning a position is the engine's
/// transaction mechanism: legality probes apply a candidate move to a clone
/// and throw the clone away, so the live state never holds an intermediate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pieces: Vec<PieceInfo>,
    placement: HashMap<Coordinate, PieceId>,
    locate: HashMap<PieceId, Coordinate>,
    width: i32,
    height: i32,
    turn: Player,
    castling: CastlingRights,
    en_passant: Option<Coordinate>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    /// Creates an empty board of the given extent with White to move.
    pub fn empty(width: i32, height: i32) -> Self {
        Position {
            pieces: Vec::new(),
            placement: HashMap::new(),
            locate: HashMap::new(),
            width,
            height,
            turn: Player::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenFields::STARTPOS).expect("start position FEN is valid")
    }

    /// Builds a position from a FEN string (8x8 boards).
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields = FenFields::parse(fen)?;
        let mut position = Position::empty(8, 8);

        for (i, rank) in fields.placement.split('/').enumerate() {
            let y = position.height - 1 - i as i32;
            let mut x = 0i32;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10) {
                    x += run as i32;
                } else if let Some((kind, owner)) = PieceKind::from_fen_char(c) {
                    position.place_new(kind, owner, Coordinate::new(x, y));
                    x += 1;
                }
            }
        }

        position.turn = match fields.side_to_move {
            'b' => Player::Black,
            _ => Player::White,
        };
        position.castling = CastlingRights::from_fen_field(&fields.castling);
        position.en_passant = Coordinate::from_algebraic(&fields.en_passant);
        position.halfmove_clock = fields.halfmove_clock;
        position.fullmove_number = fields.fullmove_number;

        Ok(position)
    }

    /// Serializes the position as a FEN string: the board field followed by
    /// exactly five space-separated fields.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.board_field(),
            self.turn.fen_char(),
            self.castling.fen_field(),
            self.en_passant_field(),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Returns the identity string used for repetition detection:
    /// placement, side to move, castling rights, and en-passant
    /// availability. The move clocks do not contribute.
    pub fn fingerprint(&self) -> String {
        format!(
            "{} {} {} {}",
            self.board_field(),
            self.turn.fen_char(),
            self.castling.fen_field(),
            self.en_passant_field()
        )
    }

    fn board_field(&self) -> String {
        let mut out = String::new();
        for y in (0..self.height).rev() {
            let mut empty_run = 0u32;
            for x in 0..self.width {
                match self.piece_at(Coordinate::new(x, y)) {
                    Some(id) => {
                        if empty_run > 0 {
                            out.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        let info = self.piece(id);
                        out.push(info.kind.fen_char(info.owner));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                out.push_str(&empty_run.to_string());
            }
            if y > 0 {
                out.push('/');
            }
        }
        out
    }

    fn en_passant_field(&self) -> String {
        match self.en_passant.and_then(Coordinate::to_algebraic) {
            Some(s) => s,
            None => "-".to_string(),
        }
    }

    /// Board width in files.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Board height in ranks.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The player to move.
    #[inline]
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Sets the player to move. Intended for building test positions.
    pub fn set_turn(&mut self, player: Player) {
        self.turn = player;
    }

    /// Current castling rights.
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub(crate) fn castling_mut(&mut self) -> &mut CastlingRights {
        &mut self.castling
    }

    /// The square a double-stepping pawn skipped on the previous half-move,
    /// if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Coordinate> {
        self.en_passant
    }

    pub(crate) fn set_en_passant(&mut self, target: Option<Coordinate>) {
        self.en_passant = target;
    }

    /// Half-moves since the last capture or pawn move.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub(crate) fn reset_halfmove_clock(&mut self) {
        self.halfmove_clock = 0;
    }

    pub(crate) fn bump_halfmove_clock(&mut self) {
        self.halfmove_clock += 1;
    }

    /// The full-move number, starting at 1.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Swaps the side to move, bumping the full-move number when the turn
    /// wraps back to White.
    pub(crate) fn advance_turn(&mut self) {
        self.turn = self.turn.opposite();
        if self.turn == Player::White {
            self.fullmove_number += 1;
        }
    }

    /// Returns true if the coordinate names a square on this board.
    #[inline]
    pub fn in_bounds(&self, coord: Coordinate) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Returns the piece standing on the given square, if any.
    #[inline]
    pub fn piece_at(&self, coord: Coordinate) -> Option<PieceId> {
        self.placement.get(&coord).copied()
    }

    /// Returns what the piece is.
    ///
    /// # Panics
    ///
    /// Panics if the identity was not issued by this position.
    #[inline]
    pub fn piece(&self, id: PieceId) -> PieceInfo {
        self.pieces[id.index()]
    }

    /// Returns where the piece stands, or `None` once it is captured.
    #[inline]
    pub fn coordinate_of(&self, id: PieceId) -> Option<Coordinate> {
        self.locate.get(&id).copied()
    }

    /// Returns the player's on-board pieces with their coordinates, in
    /// stable identity order.
    pub fn pieces_of(&self, player: Player) -> Vec<(PieceId, Coordinate)> {
        (0..self.pieces.len() as u32)
            .map(PieceId)
            .filter(|&id| self.piece(id).owner == player)
            .filter_map(|id| self.coordinate_of(id).map(|at| (id, at)))
            .collect()
    }

    /// Returns the player's king and its square.
    pub fn king_of(&self, player: Player) -> Option<(PieceId, Coordinate)> {
        self.pieces_of(player)
            .into_iter()
            .find(|&(id, _)| self.piece(id).kind == PieceKind::King)
    }

    /// Places a brand-new piece on an empty square and returns its identity.
    pub fn place_new(&mut self, kind: PieceKind, owner: Player, at: Coordinate) -> PieceId {
        debug_assert!(self.in_bounds(at));
        debug_assert!(!self.placement.contains_key(&at));
        let id = PieceId(self.pieces.len() as u32);
        self.pieces.push(PieceInfo { kind, owner });
        self.placement.insert(at, id);
        self.locate.insert(id, at);
        debug_assert!(self.is_consistent());
        id
    }

    /// Moves a piece to `to`, returning the occupant it displaced.
    ///
    /// This is the bare placement update; castling rights, clocks, and
    /// en-passant bookkeeping are the committing caller's business.
    pub(crate) fn displace(&mut self, id: PieceId, to: Coordinate) -> Option<PieceId> {
        let from = self.locate[&id];
        let vacated = self.placement.remove(&from);
        debug_assert_eq!(vacated, Some(id));
        let captured = self.placement.insert(to, id);
        if let Some(victim) = captured {
            self.locate.remove(&victim);
        }
        self.locate.insert(id, to);
        debug_assert!(self.is_consistent());
        captured
    }

    /// Removes the piece on the given square, if any.
    pub(crate) fn remove_at(&mut self, at: Coordinate) -> Option<PieceId> {
        let removed = self.placement.remove(&at);
        if let Some(id) = removed {
            self.locate.remove(&id);
        }
        debug_assert!(self.is_consistent());
        removed
    }

    /// Rewrites a piece's kind in place; used when a pawn promotes.
    pub(crate) fn set_kind(&mut self, id: PieceId, kind: PieceKind) {
        self.pieces[id.index()].kind = kind;
    }

    /// Verifies that `placement` and `locate` are exact inverses.
    pub fn is_consistent(&self) -> bool {
        self.placement.len() == self.locate.len()
            && self
                .placement
                .iter()
                .all(|(at, id)| self.locate.get(id) == Some(at))
    }

    /// Returns true if any of `by`'s pieces could move onto `coord`.
    ///
    /// Kings never participate in attack enumeration; king-vs-king contact
    /// is resolved by move legality, not by attack sets.
    pub fn is_attacked(&self, coord: Coordinate, by: Player) -> bool {
        self.pieces_of(by).into_iter().any(|(id, _)| {
            self.piece(id).kind != PieceKind::King
                && crate::movegen::destinations(self, id, false).contains(&coord)
        })
    }

    /// Returns true if the player's king stands on a square attacked by the
    /// opponent.
    pub fn is_in_check(&self, player: Player) -> bool {
        match self.king_of(player) {
            Some((_, at)) => self.is_attacked(at, player.opposite()),
            None => false,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Coordinate {
        Coordinate::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_fen_round_trip() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), FenFields::STARTPOS);
    }

    #[test]
    fn custom_fen_round_trip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn en_passant_fen_round_trip() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.en_passant(), Some(sq("e3")));
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn piece_lookup() {
        let pos = Position::startpos();
        let king = pos.piece_at(sq("e1")).unwrap();
        assert_eq!(pos.piece(king).kind, PieceKind::King);
        assert_eq!(pos.piece(king).owner, Player::White);
        assert_eq!(pos.coordinate_of(king), Some(sq("e1")));
        assert_eq!(pos.piece_at(sq("e4")), None);
    }

    #[test]
    fn king_of_each_side() {
        let pos = Position::startpos();
        assert_eq!(pos.king_of(Player::White).unwrap().1, sq("e1"));
        assert_eq!(pos.king_of(Player::Black).unwrap().1, sq("e8"));
    }

    #[test]
    fn pieces_of_counts() {
        let pos = Position::startpos();
        assert_eq!(pos.pieces_of(Player::White).len(), 16);
        assert_eq!(pos.pieces_of(Player::Black).len(), 16);
    }

    #[test]
    fn displace_keeps_maps_inverse() {
        let mut pos = Position::startpos();
        let pawn = pos.piece_at(sq("e2")).unwrap();
        assert_eq!(pos.displace(pawn, sq("e4")), None);
        assert_eq!(pos.piece_at(sq("e2")), None);
        assert_eq!(pos.coordinate_of(pawn), Some(sq("e4")));
        assert!(pos.is_consistent());
    }

    #[test]
    fn displace_capture_drops_victim() {
        let mut pos = Position::empty(8, 8);
        let rook = pos.place_new(PieceKind::Rook, Player::White, sq("a1"));
        let victim = pos.place_new(PieceKind::Knight, Player::Black, sq("a8"));
        assert_eq!(pos.displace(rook, sq("a8")), Some(victim));
        assert_eq!(pos.coordinate_of(victim), None);
        // Identity outlives capture even though the square does not.
        assert_eq!(pos.piece(victim).kind, PieceKind::Knight);
        assert!(pos.is_consistent());
    }

    #[test]
    fn hand_built_position() {
        let mut pos = Position::empty(8, 8);
        pos.place_new(PieceKind::King, Player::White, sq("e1"));
        pos.place_new(PieceKind::King, Player::Black, sq("e8"));
        pos.place_new(PieceKind::Queen, Player::Black, sq("e2"));
        pos.set_turn(Player::Black);

        assert_eq!(pos.turn(), Player::Black);
        assert!(pos.is_in_check(Player::White));
        assert!(!pos.is_in_check(Player::Black));
        assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/4q3/4K3 b - - 0 1");
    }

    #[test]
    fn fingerprint_ignores_clocks() {
        let a = Position::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 0 1").unwrap();
        let b = Position::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 37 19").unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.to_fen(), b.to_fen());
    }

    #[test]
    fn fingerprint_tracks_castling_and_turn() {
        let a = Position::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 0 1").unwrap();
        let b = Position::from_fen("8/8/8/8/8/8/8/R3K2k w - - 0 1").unwrap();
        let c = Position::from_fen("8/8/8/8/8/8/8/R3K2k b Q - 0 1").unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn castling_rights_flags() {
        let mut rights = CastlingRights::ALL;
        assert!(rights.can_kingside(Player::White));
        assert!(rights.can_queenside(Player::Black));

        rights.revoke_kingside(Player::White);
        assert!(!rights.can_kingside(Player::White));
        assert!(rights.can_queenside(Player::White));

        rights.revoke_both(Player::Black);
        assert!(!rights.can_kingside(Player::Black));
        assert!(!rights.can_queenside(Player::Black));
        assert_eq!(rights.fen_field(), "Q");
    }

    #[test]
    fn castling_rights_fen_round_trip() {
        for field in ["KQkq", "Kq", "k", "-"] {
            assert_eq!(CastlingRights::from_fen_field(field).fen_field(), field);
        }
    }

    #[test]
    fn check_detection() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/4q3/4K3 w - - 0 1").unwrap();
        assert!(pos.is_in_check(Player::White));
        assert!(!pos.is_in_check(Player::Black));
    }

    #[test]
    fn kings_do_not_give_check() {
        let pos = Position::from_fen("8/8/8/3k4/3K4/8/8/8 w - - 0 1").unwrap();
        assert!(!pos.is_in_check(Player::White));
        assert!(!pos.is_in_check(Player::Black));
    }
}
