//! Applying and taking back moves in place.
//!
//! [`Position::make_move`] returns an [`UndoState`] holding everything the
//! move overwrites; handing it back to [`Position::unmake_move`] restores the
//! position exactly, Zobrist key and repetition history included. The search
//! relies on that pairing for every sibling it explores.

use chess_core::{CastlingRights, Move, MoveKind, Piece, Square};

use crate::zobrist::ZOBRIST;
use crate::{Bitboard, Position};

/// State saved by [`Position::make_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    colors: [Bitboard; 2],
    occupied: Bitboard,
    captured: Option<Piece>,
    king_squares: [Square; 2],
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    zobrist: u64,
    history_start: usize,
}

impl UndoState {
    /// The piece the move removed from the board, if any.
    #[inline]
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }
}

impl Position {
    /// Plays a legal move produced by the move generator for this position.
    ///
    /// Passing any other move corrupts the position.
    pub fn make_move(&mut self, mv: Move) -> UndoState {
        let us = self.side_to_move;
        let them = us.opposite();
        let from = mv.from();
        let to = mv.to();

        let mut undo = UndoState {
            colors: self.colors,
            occupied: self.occupied,
            captured: None,
            king_squares: self.king_squares,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            zobrist: self.zobrist,
            history_start: self.history_start,
        };

        let mut key = self.zobrist
            ^ ZOBRIST.black_to_move
            ^ ZOBRIST.en_passant(self.en_passant)
            ^ ZOBRIST.piece(mv.piece(), us, from)
            ^ ZOBRIST.piece(mv.placed_piece(), us, to);
        let mut castling = self.castling;
        let mut en_passant = None;

        self.colors[us.index()] ^= Bitboard(mv.own_delta());
        self.colors[them.index()] ^= Bitboard(mv.opp_delta());
        self.piece_types[from.index() as usize] = None;

        match mv.kind() {
            MoveKind::Quiet | MoveKind::QuietPawn | MoveKind::QuietKnight => {}
            MoveKind::QuietKing => {
                self.king_squares[us.index()] = to;
                castling.touch(from);
            }
            MoveKind::QuietRook => castling.touch(from),
            MoveKind::Capture | MoveKind::CapturePawn | MoveKind::CaptureKnight => {
                undo.captured = self.remove_captured(to, &mut key);
                castling.touch(to);
            }
            MoveKind::CaptureKing => {
                undo.captured = self.remove_captured(to, &mut key);
                self.king_squares[us.index()] = to;
                castling.touch(from);
                castling.touch(to);
            }
            MoveKind::CaptureRook => {
                undo.captured = self.remove_captured(to, &mut key);
                castling.touch(from);
                castling.touch(to);
            }
            MoveKind::DoublePawnPush { en_passant: target } => en_passant = Some(target),
            MoveKind::Castle { rook_from, rook_to } => {
                self.king_squares[us.index()] = to;
                castling.touch(from);
                self.piece_types[rook_from.index() as usize] = None;
                self.piece_types[rook_to.index() as usize] = Some(Piece::Rook);
                key ^= ZOBRIST.piece(Piece::Rook, us, rook_from)
                    ^ ZOBRIST.piece(Piece::Rook, us, rook_to);
            }
            MoveKind::EnPassant { captured } => {
                undo.captured = self.remove_captured(captured, &mut key);
            }
            MoveKind::Promotion { .. } => {}
            MoveKind::CapturePromotion { .. } => {
                undo.captured = self.remove_captured(to, &mut key);
                castling.touch(to);
            }
        }

        self.piece_types[to.index() as usize] = Some(mv.placed_piece());
        self.occupied = self.colors[0] | self.colors[1];

        key ^= ZOBRIST.castling_change(self.castling, castling) ^ ZOBRIST.en_passant(en_passant);
        self.castling = castling;
        self.en_passant = en_passant;

        if mv.is_capture() || mv.kind().is_pawn_move() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == chess_core::Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = them;
        self.zobrist = key;

        if mv.is_irreversible() {
            self.history_start = self.history.len();
        }
        self.history.push(key);

        undo
    }

    /// Takes back `mv`, which must be the last move made, using the state
    /// that making it returned.
    pub fn unmake_move(&mut self, mv: Move, undo: UndoState) {
        self.history.pop();
        self.history_start = undo.history_start;

        self.colors = undo.colors;
        self.occupied = undo.occupied;
        self.king_squares = undo.king_squares;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.zobrist = undo.zobrist;
        self.side_to_move = self.side_to_move.opposite();

        let to = mv.to().index() as usize;
        self.piece_types[mv.from().index() as usize] = Some(mv.piece());
        match mv.kind() {
            MoveKind::EnPassant { captured } => {
                self.piece_types[to] = None;
                self.piece_types[captured.index() as usize] = Some(Piece::Pawn);
            }
            MoveKind::Castle { rook_from, rook_to } => {
                self.piece_types[to] = None;
                self.piece_types[rook_to.index() as usize] = None;
                self.piece_types[rook_from.index() as usize] = Some(Piece::Rook);
            }
            _ => self.piece_types[to] = undo.captured,
        }
    }

    /// Clears a captured piece from the type array and hashes it out.
    /// The opponent bitboard was already updated through the move's delta.
    #[inline]
    fn remove_captured(&mut self, sq: Square, key: &mut u64) -> Option<Piece> {
        let captured = self.piece_types[sq.index() as usize].take();
        if let Some(piece) = captured {
            *key ^= ZOBRIST.piece(piece, self.side_to_move.opposite(), sq);
        }
        captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::{find_move, generate_moves};
    use chess_core::Color;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(position: &mut Position, uci: &str) -> (Move, UndoState) {
        let mv = find_move(position, uci).unwrap_or_else(|| panic!("{uci} is not legal"));
        let undo = position.make_move(mv);
        assert!(position.is_consistent(), "inconsistent after {uci}");
        assert_eq!(position.zobrist(), position.compute_zobrist(), "hash after {uci}");
        (mv, undo)
    }

    #[test]
    fn quiet_move_and_back() {
        let mut pos = Position::startpos();
        let before = pos.clone();
        let (mv, undo) = play(&mut pos, "g1f3");
        assert_eq!(pos.piece_at(sq("f3")), Some((Piece::Knight, Color::White)));
        assert_eq!(pos.piece_at(Square::G1), None);
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.halfmove_clock(), 1);
        assert_eq!(pos.fullmove_number(), 1);
        pos.unmake_move(mv, undo);
        assert_eq!(pos, before);
    }

    #[test]
    fn double_push_sets_en_passant() {
        let mut pos = Position::startpos();
        play(&mut pos, "e2e4");
        assert_eq!(pos.en_passant(), Some(sq("e3")));
        assert_eq!(pos.halfmove_clock(), 0);
        play(&mut pos, "g8f6");
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.fullmove_number(), 2);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        let before = pos.clone();
        let (mv, undo) = play(&mut pos, "e5f6");
        assert!(matches!(mv.kind(), MoveKind::EnPassant { .. }));
        assert_eq!(undo.captured(), Some(Piece::Pawn));
        assert_eq!(pos.piece_at(sq("f5")), None);
        assert_eq!(pos.piece_at(sq("f6")), Some((Piece::Pawn, Color::White)));
        assert_eq!(pos.piece_at(sq("d5")), Some((Piece::Pawn, Color::Black)));
        pos.unmake_move(mv, undo);
        assert_eq!(pos, before);
    }

    #[test]
    fn castling_moves_the_rook_and_drops_rights() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let before = pos.clone();
        let (mv, undo) = play(&mut pos, "e1g1");
        assert_eq!(pos.piece_at(Square::G1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::F1), Some((Piece::Rook, Color::White)));
        assert_eq!(pos.piece_at(Square::H1), None);
        assert_eq!(pos.king_square(Color::White), Square::G1);
        assert_eq!(pos.castling().to_fen(), "kq");
        pos.unmake_move(mv, undo);
        assert_eq!(pos, before);

        let (mv, undo) = play(&mut pos, "e1c1");
        assert_eq!(pos.piece_at(Square::D1), Some((Piece::Rook, Color::White)));
        assert_eq!(pos.piece_at(Square::A1), None);
        pos.unmake_move(mv, undo);
        assert_eq!(pos, before);
    }

    #[test]
    fn capturing_a_rook_drops_the_owners_right() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let (_, undo) = play(&mut pos, "a1a8");
        assert_eq!(undo.captured(), Some(Piece::Rook));
        assert_eq!(pos.castling().to_fen(), "Kk");
        assert_eq!(pos.halfmove_clock(), 0);
    }

    #[test]
    fn rights_stay_lost_after_returning() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut pos, "e1f1");
        play(&mut pos, "e8f8");
        play(&mut pos, "f1e1");
        play(&mut pos, "f8e8");
        assert_eq!(pos.castling(), CastlingRights::NONE);
        assert_eq!(pos.to_fen(), "r3k2r/8/8/8/8/8/8/R3K2R w - - 4 3");
    }

    #[test]
    fn promotions_replace_the_pawn() {
        let mut pos = Position::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let before = pos.clone();
        let (mv, undo) = play(&mut pos, "a7a8q");
        assert_eq!(pos.piece_at(Square::A8), Some((Piece::Queen, Color::White)));
        pos.unmake_move(mv, undo);
        assert_eq!(pos, before);

        let (mv, undo) = play(&mut pos, "a7b8n");
        assert_eq!(pos.piece_at(Square::B8), Some((Piece::Knight, Color::White)));
        assert_eq!(undo.captured(), Some(Piece::Rook));
        pos.unmake_move(mv, undo);
        assert_eq!(pos, before);
    }

    #[test]
    fn black_capture_promotion_hashes_correctly() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/1p6/R3K3 b Q - 0 1").unwrap();
        let before = pos.clone();
        for promotion in ["b2a1q", "b2a1r", "b2a1b", "b2a1n"] {
            let (mv, undo) = play(&mut pos, promotion);
            assert_eq!(pos.castling(), CastlingRights::NONE);
            pos.unmake_move(mv, undo);
            assert_eq!(pos, before);
        }
    }

    #[test]
    fn irreversible_moves_reset_the_window() {
        let mut pos = Position::startpos();
        play(&mut pos, "g1f3");
        play(&mut pos, "g8f6");
        assert_eq!(pos.repetition_window().len(), 3);
        let (mv, undo) = play(&mut pos, "e2e4");
        assert_eq!(pos.repetition_window(), &[pos.zobrist()]);
        pos.unmake_move(mv, undo);
        assert_eq!(pos.repetition_window().len(), 3);
    }

    #[test]
    fn move_counters_saturate() {
        let fen = "4k3/8/8/8/8/8/8/R3K3 w - - 4294967295 4294967295";
        let mut pos = Position::from_fen(fen).unwrap();
        let before = pos.clone();
        let (mv, undo) = play(&mut pos, "a1a2");
        assert_eq!(pos.halfmove_clock(), u32::MAX);
        let (reply, reply_undo) = play(&mut pos, "e8d8");
        assert_eq!(pos.fullmove_number(), u32::MAX);
        pos.unmake_move(reply, reply_undo);
        pos.unmake_move(mv, undo);
        assert_eq!(pos, before);
    }

    #[test]
    fn knight_shuffle_repeats() {
        let mut pos = Position::startpos();
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            play(&mut pos, uci);
        }
        assert_eq!(pos.zobrist(), Position::startpos().zobrist());
        assert_eq!(pos.repetitions(), 1);
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            play(&mut pos, uci);
        }
        assert!(pos.is_threefold_repetition());
    }

    /// Makes and unmakes every move of every node down to `depth`, checking
    /// exact restoration and the incremental hash along the way.
    fn walk(pos: &mut Position, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut leaves = 0;
        for &mv in generate_moves(pos).as_slice() {
            let before = pos.clone();
            let undo = pos.make_move(mv);
            assert_eq!(pos.zobrist(), pos.compute_zobrist(), "{mv:?} in {}", before.to_fen());
            assert!(pos.is_consistent(), "{mv:?} in {}", before.to_fen());
            leaves += walk(pos, depth - 1);
            pos.unmake_move(mv, undo);
            assert_eq!(*pos, before, "{mv:?} did not unmake");
        }
        leaves
    }

    #[test]
    fn roundtrip_and_hash_over_startpos_tree() {
        let mut pos = Position::startpos();
        assert_eq!(walk(&mut pos, 4), 197_281);
    }

    #[test]
    fn roundtrip_and_hash_over_tricky_trees() {
        for (fen, depth) in [
            ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 3),
            ("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", 3),
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 4),
        ] {
            let mut pos = Position::from_fen(fen).unwrap();
            walk(&mut pos, depth);
        }
    }
}
