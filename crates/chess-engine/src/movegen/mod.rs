//! Legal move generation.
//!
//! Moves are generated legal by construction. One pass over the enemy
//! pieces yields the squares they attack, our pinned pieces and the pieces
//! giving check; the generator then branches on the number of checkers:
//!
//! - none: castling, en passant, and every piece move (pinned pieces
//!   restricted to their pin line)
//! - one: no castling; everything is generated as above and then filtered
//!   down to king moves, moves landing between king and checker (or on the
//!   checker), and validated en passant captures
//! - two or more: king moves only
//!
//! En passant is the one move that can uncover an attack no pin detection
//! sees (both pawns leave the same rank at once), so it is checked by
//! simulating the resulting occupancy and looking up the first blocker on
//! the king's lines through the two vacated squares.

pub mod perft;
mod pieces;

use chess_core::{Color, Move, MoveKind, Piece, Square};

use crate::geometry::{geometry, RayKind};
use crate::{Bitboard, Position};

pub use pieces::{
    bishop_moves, bishop_moves_pinned, king_moves, knight_moves, pawn_moves, pawn_moves_pinned,
    queen_moves, queen_moves_pinned, rook_moves, rook_moves_pinned,
};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Mutable view, used by the search to reorder moves.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// What the opponent's pieces do to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threats {
    /// Squares attacked by the opponent, computed with our king lifted off
    /// the board so it cannot hide behind itself on a checking line.
    pub attacked: Bitboard,
    /// Our pieces that are the only blocker between an enemy slider and
    /// our king.
    pub pinned: Bitboard,
    /// Enemy pieces attacking our king.
    pub checkers: Bitboard,
}

/// Scans every enemy piece once.
pub fn threats(position: &Position) -> Threats {
    let g = geometry();
    let us = position.side_to_move();
    let them = us.opposite();
    let king = position.king_square(us);
    let own = position.pieces(us);
    let occupied = position.occupied();
    let see_through_king = occupied.without(king);

    let mut threats = Threats {
        attacked: Bitboard::EMPTY,
        pinned: Bitboard::EMPTY,
        checkers: Bitboard::EMPTY,
    };

    for sq in position.pieces(them) {
        let Some(piece) = position.piece_type(sq) else {
            unreachable!("occupied square {sq} has no piece type");
        };
        let attacks = match piece {
            Piece::Pawn => g.pawn_attacks(them, sq),
            Piece::Knight => g.knight_attacks(sq),
            Piece::King => g.king_attacks(sq),
            Piece::Bishop => g.bishop_attacks(sq, see_through_king),
            Piece::Rook => g.rook_attacks(sq, see_through_king),
            Piece::Queen => g.queen_attacks(sq, see_through_king),
        };
        threats.attacked |= attacks;

        if attacks.contains(king) {
            threats.checkers.set(sq);
        } else if g.kind(sq, king).is_slid_by(piece) {
            let blockers = g.between(sq, king) & occupied;
            if !blockers.more_than_one() && (blockers & own).is_not_empty() {
                threats.pinned |= blockers;
            }
        }
    }

    threats
}

/// Generates all legal moves for the side to move.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let threats = threats(position);

    let us = position.side_to_move();
    let king = position.king_square(us);
    let own = position.pieces(us);
    let enemy = position.pieces(us.opposite());
    let occupied = position.occupied();

    king_moves(king, own, enemy, threats.attacked, &mut moves);
    if threats.checkers.more_than_one() {
        return moves;
    }

    if threats.checkers.is_empty() {
        castling_moves(position, threats.attacked, &mut moves);
    }
    en_passant_moves(position, &threats, &mut moves);

    for from in own.without(king) {
        let pinned = threats.pinned.contains(from);
        match position.piece_type(from) {
            Some(Piece::Pawn) if pinned => {
                pawn_moves_pinned(us, from, king, enemy, occupied, &mut moves)
            }
            Some(Piece::Pawn) => pawn_moves(us, from, enemy, occupied, &mut moves),
            // A pinned knight always leaves the pin line.
            Some(Piece::Knight) if pinned => {}
            Some(Piece::Knight) => knight_moves(from, own, enemy, &mut moves),
            Some(Piece::Bishop) if pinned => {
                bishop_moves_pinned(from, king, own, enemy, &mut moves)
            }
            Some(Piece::Bishop) => bishop_moves(from, own, enemy, &mut moves),
            Some(Piece::Rook) if pinned => rook_moves_pinned(from, king, own, enemy, &mut moves),
            Some(Piece::Rook) => rook_moves(from, own, enemy, &mut moves),
            Some(Piece::Queen) if pinned => queen_moves_pinned(from, king, own, enemy, &mut moves),
            Some(Piece::Queen) => queen_moves(from, own, enemy, &mut moves),
            Some(Piece::King) | None => unreachable!("bad piece on {from}"),
        }
    }

    if let Some(checker) = threats.checkers.lsb() {
        let evasions = geometry().segment(king, checker);
        moves.retain(|m| {
            m.piece() == Piece::King
                || evasions.contains(m.to())
                || matches!(m.kind(), MoveKind::EnPassant { .. })
        });
    }

    moves
}

/// One castling option, with the squares that must be empty and safe.
struct CastleSide {
    flag: u8,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    rook_to: Square,
    must_be_empty: Bitboard,
    must_be_safe: Bitboard,
}

/// White kingside, white queenside, black kingside, black queenside.
const CASTLE_SIDES: [CastleSide; 4] = [
    CastleSide {
        flag: chess_core::CastlingRights::WHITE_KINGSIDE,
        king_from: Square::E1,
        king_to: Square::G1,
        rook_from: Square::H1,
        rook_to: Square::F1,
        must_be_empty: Bitboard(0x60),
        must_be_safe: Bitboard(0x60),
    },
    CastleSide {
        flag: chess_core::CastlingRights::WHITE_QUEENSIDE,
        king_from: Square::E1,
        king_to: Square::C1,
        rook_from: Square::A1,
        rook_to: Square::D1,
        must_be_empty: Bitboard(0x0E),
        must_be_safe: Bitboard(0x0C),
    },
    CastleSide {
        flag: chess_core::CastlingRights::BLACK_KINGSIDE,
        king_from: Square::E8,
        king_to: Square::G8,
        rook_from: Square::H8,
        rook_to: Square::F8,
        must_be_empty: Bitboard(0x60 << 56),
        must_be_safe: Bitboard(0x60 << 56),
    },
    CastleSide {
        flag: chess_core::CastlingRights::BLACK_QUEENSIDE,
        king_from: Square::E8,
        king_to: Square::C8,
        rook_from: Square::A8,
        rook_to: Square::D8,
        must_be_empty: Bitboard(0x0E << 56),
        must_be_safe: Bitboard(0x0C << 56),
    },
];

/// Only called when not in check.
fn castling_moves(position: &Position, attacked: Bitboard, moves: &mut MoveList) {
    let us = position.side_to_move();
    let sides = match us {
        Color::White => &CASTLE_SIDES[..2],
        Color::Black => &CASTLE_SIDES[2..],
    };
    for side in sides {
        if position.castling().has(side.flag)
            && (position.occupied() & side.must_be_empty).is_empty()
            && (attacked & side.must_be_safe).is_empty()
        {
            let kind = MoveKind::Castle {
                rook_from: side.rook_from,
                rook_to: side.rook_to,
            };
            moves.push(Move::new(side.king_from, side.king_to, Piece::King, kind));
        }
    }
}

fn en_passant_moves(position: &Position, threats: &Threats, moves: &mut MoveList) {
    let Some(target) = position.en_passant() else {
        return;
    };
    let g = geometry();
    let us = position.side_to_move();
    let them = us.opposite();
    let king = position.king_square(us);
    let Some(captured) = target.offset(0, -us.pawn_direction()) else {
        return;
    };

    // In single check the capture must remove the checker or block it.
    if let Some(checker) = threats.checkers.lsb() {
        if checker != captured && !g.segment(king, checker).contains(target) {
            return;
        }
    }

    let candidates = g.pawn_attacks(them, target) & position.pieces(us);
    for from in candidates {
        if position.piece_type(from) != Some(Piece::Pawn) {
            continue;
        }
        if threats.pinned.contains(from) && !g.line(king, from).contains(target) {
            continue;
        }
        let after = position
            .occupied()
            .without(from)
            .without(captured)
            .with(target);
        if exposes_king(position, king, after, [from, captured]) {
            continue;
        }
        moves.push(Move::new(
            from,
            target,
            Piece::Pawn,
            MoveKind::EnPassant { captured },
        ));
    }
}

/// Whether emptying `vacated` (with the board now `occupied`) lets an enemy
/// slider see `king`.
fn exposes_king(
    position: &Position,
    king: Square,
    occupied: Bitboard,
    vacated: [Square; 2],
) -> bool {
    let g = geometry();
    let enemy = position.pieces(position.side_to_move().opposite());
    vacated.into_iter().any(|sq| {
        let kind = g.kind(king, sq);
        if kind == RayKind::None {
            return false;
        }
        let blocker = g.first_blocker(king, sq, occupied);
        blocker != king
            && enemy.contains(blocker)
            && position
                .piece_type(blocker)
                .is_some_and(|piece| kind.is_slid_by(piece))
    })
}

/// Returns true if `sq` is attacked by any piece of color `by`.
pub fn is_square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    let g = geometry();
    let enemy = position.pieces(by);
    let occupied = position.occupied();
    let any = |squares: Bitboard, matches: fn(Piece) -> bool| {
        (squares & enemy)
            .into_iter()
            .any(|from| position.piece_type(from).is_some_and(matches))
    };

    any(g.pawn_attacks(by.opposite(), sq), |p| p == Piece::Pawn)
        || any(g.knight_attacks(sq), |p| p == Piece::Knight)
        || any(g.king_attacks(sq), |p| p == Piece::King)
        || any(g.bishop_attacks(sq, occupied), Piece::slides_diagonal)
        || any(g.rook_attacks(sq, occupied), Piece::slides_straight)
}

/// Resolves long algebraic text ("e2e4", "e7e8q") against the legal moves.
pub fn find_move(position: &Position, uci: &str) -> Option<Move> {
    let wanted = uci.trim().to_ascii_lowercase();
    generate_moves(position)
        .as_slice()
        .iter()
        .copied()
        .find(|m| m.to_uci() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn legal(fen: &str) -> Vec<String> {
        let pos = Position::from_fen(fen).unwrap();
        let mut out: Vec<String> = generate_moves(&pos)
            .as_slice()
            .iter()
            .map(|m| m.to_uci())
            .collect();
        out.sort();
        out
    }

    #[test]
    fn movelist_push_retain_clear() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        for m in generate_moves(&Position::startpos()).as_slice() {
            list.push(*m);
        }
        assert_eq!(list.len(), 20);
        list.retain(|m| m.piece() == Piece::Knight);
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].piece(), Piece::Knight);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn startpos_has_twenty_moves() {
        assert_eq!(generate_moves(&Position::startpos()).len(), 20);
    }

    #[test]
    fn threats_find_pins_and_checkers() {
        let pos = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let t = threats(&pos);
        assert_eq!(t.pinned, Bitboard::from_square(sq("e2")));
        assert!(t.checkers.is_empty());

        // The square behind the king on the checking rank counts as attacked.
        let pos = Position::from_fen("6k1/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        let t = threats(&pos);
        assert_eq!(t.checkers, Bitboard::from_square(sq("a1")));
        assert!(t.attacked.contains(sq("f1")));
        assert!(!t.attacked.contains(sq("d2")));
        assert_eq!(legal("6k1/8/8/8/8/8/8/r3K3 w - - 0 1"), ["e1d2", "e1e2", "e1f2"]);
    }

    #[test]
    fn pinned_knight_cannot_move() {
        let moves = legal("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(moves.iter().all(|m| !m.starts_with("e2")));
    }

    #[test]
    fn single_check_allows_block_capture_or_king_move() {
        let moves = legal("4r1k1/8/8/8/8/2B5/8/3QK3 w - - 0 1");
        for m in &moves {
            let is_king = m.starts_with("e1");
            assert!(is_king || m[2..4].starts_with('e'), "{m}");
        }
        assert!(moves.contains(&"c3e5".to_string()));
        assert!(moves.contains(&"d1e2".to_string()));
        assert!(!moves.contains(&"e1e2".to_string()));
    }

    #[test]
    fn double_check_only_king_moves() {
        let pos = Position::from_fen("4r1k1/8/8/8/1b6/8/3Q4/4K3 w - - 0 1").unwrap();
        let t = threats(&pos);
        assert_eq!(t.checkers.count(), 1);
        let pos = Position::from_fen("4r1k1/8/8/8/1b6/8/8/R3K3 w - - 0 1").unwrap();
        assert_eq!(threats(&pos).checkers.count(), 2);
        let moves = generate_moves(&pos);
        assert!(moves.as_slice().iter().all(|m| m.piece() == Piece::King));
        assert!(!moves.is_empty());
    }

    #[test]
    fn castling_both_sides() {
        let moves = legal("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        assert!(moves.contains(&"e1g1".to_string()));
        assert!(moves.contains(&"e1c1".to_string()));
    }

    #[test]
    fn no_castling_through_or_into_attack() {
        // Rook on f8 covers f1: kingside is out, queenside still fine.
        let moves = legal("r4rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.contains(&"e1g1".to_string()));
        assert!(moves.contains(&"e1c1".to_string()));

        // Rook on g8 covers the destination.
        let moves = legal("r5rk/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.contains(&"e1g1".to_string()));

        // b1 may be attacked for queenside castling, only c1 and d1 matter.
        let moves = legal("1r5k/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(moves.contains(&"e1c1".to_string()));
    }

    #[test]
    fn no_castling_when_blocked_or_in_check() {
        let moves = legal("r3k2r/8/8/8/8/8/8/R3KB1R w KQ - 0 1");
        assert!(!moves.contains(&"e1g1".to_string()));
        let moves = legal("r3k2r/8/8/8/8/8/8/RN2K2R w KQ - 0 1");
        assert!(!moves.contains(&"e1c1".to_string()));
        let moves = legal("4r2k/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.iter().any(|m| m == "e1g1" || m == "e1c1"));
    }

    #[test]
    fn no_castling_without_rights() {
        let moves = legal("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1");
        assert!(!moves.iter().any(|m| m == "e1g1" || m == "e1c1"));
    }

    #[test]
    fn en_passant_offered_when_safe() {
        let moves = legal("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 1");
        assert!(moves.contains(&"f5e6".to_string()));
    }

    #[test]
    fn en_passant_horizontal_pin() {
        // Capturing would take both pawns off the fifth rank and expose the
        // king on a5 to the rook on g5.
        let moves = legal("8/8/8/KPp3r1/8/8/8/4k3 w - c6 0 2");
        assert!(!moves.contains(&"b5c6".to_string()));
        assert!(moves.contains(&"b5b6".to_string()));
    }

    #[test]
    fn en_passant_with_pinned_capturer() {
        // Pinned on the b8-h2 diagonal; the capture stays on it.
        let moves = legal("1b5k/8/8/3pP3/8/6K1/8/8 w - d6 0 1");
        assert!(moves.contains(&"e5d6".to_string()));
        assert!(!moves.contains(&"e5e6".to_string()));

        // Pinned on the e-file; the capture leaves it.
        let moves = legal("4r2k/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        assert!(!moves.contains(&"e5d6".to_string()));
        assert!(moves.contains(&"e5e6".to_string()));
    }

    #[test]
    fn en_passant_evades_pawn_check() {
        // Black just played d7d5 giving check to the king on e4.
        let moves = legal("7k/8/8/3pP3/4K3/8/8/8 w - d6 0 1");
        assert!(moves.contains(&"e5d6".to_string()));
    }

    #[test]
    fn square_attacks() {
        let pos = Position::startpos();
        assert!(is_square_attacked(&pos, sq("e3"), Color::White));
        assert!(!is_square_attacked(&pos, sq("e4"), Color::White));
        assert!(is_square_attacked(&pos, sq("f6"), Color::Black));
        assert!(!pos.in_check());
    }

    #[test]
    fn find_move_by_text() {
        let pos = Position::startpos();
        let mv = find_move(&pos, "e2e4").unwrap();
        assert!(matches!(mv.kind(), MoveKind::DoublePawnPush { .. }));
        assert_eq!(find_move(&pos, "E2E4"), Some(mv));
        assert_eq!(find_move(&pos, "e2e5"), None);
        assert_eq!(find_move(&pos, "junk"), None);
    }

    #[test]
    fn promotions_all_four() {
        let moves = legal("8/P7/8/8/8/8/8/4K2k w - - 0 1");
        for suffix in ["a7a8n", "a7a8b", "a7a8r", "a7a8q"] {
            assert!(moves.contains(&suffix.to_string()));
        }
    }

    /// Brute-force reference: every geometrically possible move, kept only
    /// if the own king is not attacked afterwards.
    fn reference_moves(pos: &Position) -> Vec<String> {
        let g = geometry();
        let us = pos.side_to_move();
        let them = us.opposite();
        let own = pos.pieces(us);
        let enemy = pos.pieces(them);
        let occupied = pos.occupied();
        let mut candidates: Vec<Move> = Vec::new();

        for from in own {
            let piece = pos.piece_type(from).unwrap();
            let targets = match piece {
                Piece::Pawn => {
                    let mut t = g.pawn_attacks(us, from) & enemy;
                    if let Some(one) = from.offset(0, us.pawn_direction()) {
                        if !occupied.contains(one) {
                            t.set(one);
                            if from.rank() == us.pawn_rank() {
                                let two = one.offset(0, us.pawn_direction()).unwrap();
                                if !occupied.contains(two) {
                                    candidates.push(Move::new(
                                        from,
                                        two,
                                        piece,
                                        MoveKind::DoublePawnPush { en_passant: one },
                                    ));
                                }
                            }
                        }
                    }
                    if let Some(ep) = pos.en_passant() {
                        if g.pawn_attacks(us, from).contains(ep) {
                            let captured = ep.offset(0, -us.pawn_direction()).unwrap();
                            candidates.push(Move::new(
                                from,
                                ep,
                                piece,
                                MoveKind::EnPassant { captured },
                            ));
                        }
                    }
                    t
                }
                Piece::Knight => g.knight_attacks(from) & !own,
                Piece::Bishop => g.bishop_attacks(from, occupied) & !own,
                Piece::Rook => g.rook_attacks(from, occupied) & !own,
                Piece::Queen => g.queen_attacks(from, occupied) & !own,
                Piece::King => g.king_attacks(from) & !own,
            };
            for to in targets {
                let capture = enemy.contains(to);
                if piece == Piece::Pawn && to.rank() == us.promotion_rank() {
                    for promo in Piece::PROMOTIONS {
                        let kind = if capture {
                            MoveKind::CapturePromotion { piece: promo }
                        } else {
                            MoveKind::Promotion { piece: promo }
                        };
                        candidates.push(Move::new(from, to, piece, kind));
                    }
                } else {
                    let kind = if capture {
                        MoveKind::capture(piece)
                    } else {
                        MoveKind::quiet(piece)
                    };
                    candidates.push(Move::new(from, to, piece, kind));
                }
            }
        }

        let king = pos.king_square(us);
        if !is_square_attacked(pos, king, them) {
            for side in CASTLE_SIDES.iter().filter(|s| s.king_from == king) {
                let transit_safe = side
                    .must_be_safe
                    .into_iter()
                    .all(|s| !is_square_attacked(pos, s, them));
                if pos.castling().has(side.flag)
                    && (occupied & side.must_be_empty).is_empty()
                    && transit_safe
                    && pos.piece_at(side.king_from) == Some((Piece::King, us))
                {
                    candidates.push(Move::new(
                        side.king_from,
                        side.king_to,
                        Piece::King,
                        MoveKind::Castle {
                            rook_from: side.rook_from,
                            rook_to: side.rook_to,
                        },
                    ));
                }
            }
        }

        let mut scratch = pos.clone();
        let mut out: Vec<String> = candidates
            .into_iter()
            .filter(|&mv| {
                let undo = scratch.make_move(mv);
                let safe = !is_square_attacked(&scratch, scratch.king_square(us), them);
                scratch.unmake_move(mv, undo);
                safe
            })
            .map(|mv| format!("{:?}", mv))
            .collect();
        out.sort();
        out
    }

    fn generated(pos: &Position) -> Vec<String> {
        let mut out: Vec<String> = generate_moves(pos)
            .as_slice()
            .iter()
            .map(|mv| format!("{:?}", mv))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn matches_brute_force_on_pin_and_check_positions() {
        for fen in [
            // Rook pins a knight to the king along a file.
            "4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1",
            // Bishop pins a pawn that may still capture along the pin.
            "4k3/8/8/8/1b6/2P5/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/2b5/3P4/4K3 w - - 0 1",
            // Queen pins a rook on a rank; the rook slides along the pin.
            "4k3/8/8/8/q2RK3/8/8/8 w - - 0 1",
            // Knight check, pawn check, slider check.
            "4k3/8/8/8/8/3n4/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/3p4/4K3 w - - 0 1",
            "4k3/8/8/8/7b/8/8/R3K2R w KQ - 0 1",
            // Double check.
            "4r1k1/8/8/8/1b6/8/8/R3K3 w - - 0 1",
            // En passant edge cases.
            "8/8/8/KPp3r1/8/8/8/4k3 w - c6 0 2",
            "7k/8/8/3pP3/4K3/8/8/8 w - d6 0 1",
            "8/8/8/8/k2Pp2Q/8/8/3K4 b - d3 0 1",
            "8/8/3k4/8/2pP4/8/B7/4K3 b - d3 0 1",
            "1b5k/8/8/3pP3/8/6K1/8/8 w - d6 0 1",
            "4r2k/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
            // Standard perft positions.
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1",
        ] {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(generated(&pos), reference_moves(&pos), "{fen}");
        }
    }

    #[test]
    fn matches_brute_force_two_plies_deep() {
        let mut pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        for &mv in generate_moves(&pos).as_slice() {
            let undo = pos.make_move(mv);
            assert_eq!(generated(&pos), reference_moves(&pos), "after {mv:?}");
            pos.unmake_move(mv, undo);
        }
    }
}
