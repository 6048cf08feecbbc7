//! Chess position representation.
//!
//! A [`Position`] is a single mutable board that the move generator reads
//! and the search mutates in place through [`Position::make_move`] and
//! [`Position::unmake_move`]. It keeps two redundant views of the pieces,
//! per-color occupancy bitboards and a per-square piece type array, plus
//! cached king squares and an incrementally maintained Zobrist key.

use chess_core::{CastlingRights, Color, Fen, FenError, Piece, Rank, Square};
use thiserror::Error;

use crate::movegen::is_square_attacked;
use crate::zobrist::ZOBRIST;
use crate::Bitboard;

/// Reasons a FEN string does not describe a usable position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("invalid position format: {0}")]
    InvalidPositionFormat(#[from] FenError),

    #[error("invalid position format: {color} has {count} kings")]
    KingCount { color: Color, count: u32 },

    #[error("invalid position format: pawn on back rank at {square}")]
    PawnOnBackRank { square: Square },

    #[error("invalid position format: en passant square {square} does not follow a double pawn push")]
    InconsistentEnPassant { square: Square },

    #[error("invalid position format: castling right '{right}' without king and rook on their home squares")]
    InconsistentCastling { right: char },

    #[error("invalid position format: {color} is to move but the other king is already in check")]
    OpponentInCheck { color: Color },
}

/// Complete, mutable game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub(crate) colors: [Bitboard; 2],
    /// Always `colors[0] | colors[1]`.
    pub(crate) occupied: Bitboard,
    /// `Some` exactly on the squares set in `occupied`.
    pub(crate) piece_types: [Option<Piece>; 64],
    pub(crate) king_squares: [Square; 2],
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) side_to_move: Color,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) zobrist: u64,
    /// Keys of every position reached so far, current one last.
    pub(crate) history: Vec<u64>,
    /// Index of the first key after the last irreversible move.
    /// Only `history[history_start..]` can repeat the current position.
    pub(crate) history_start: usize,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(Fen::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a FEN string.
    ///
    /// Besides field syntax this checks that the board is playable: one king
    /// per side, no pawns on the first or last rank, castling rights backed by
    /// king and rook on their home squares, an en passant target that a double
    /// push could just have created, and the side not to move not in check.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let fen = Fen::parse(fen)?;

        let mut colors = [Bitboard::EMPTY; 2];
        let mut piece_types = [None; 64];
        let mut kings: [Vec<Square>; 2] = [Vec::new(), Vec::new()];

        for sq in Square::ALL {
            let Some((piece, color)) = fen.board[sq.index() as usize] else {
                continue;
            };
            if piece == Piece::Pawn && matches!(sq.rank(), Rank::R1 | Rank::R8) {
                return Err(PositionError::PawnOnBackRank { square: sq });
            }
            if piece == Piece::King {
                kings[color.index()].push(sq);
            }
            colors[color.index()].set(sq);
            piece_types[sq.index() as usize] = Some(piece);
        }

        let mut king_squares = [Square::E1; 2];
        for color in Color::BOTH {
            match kings[color.index()].as_slice() {
                [sq] => king_squares[color.index()] = *sq,
                other => {
                    return Err(PositionError::KingCount {
                        color,
                        count: other.len() as u32,
                    })
                }
            }
        }

        let mut position = Position {
            colors,
            occupied: colors[0] | colors[1],
            piece_types,
            king_squares,
            castling: fen.castling,
            en_passant: fen.en_passant,
            side_to_move: fen.side_to_move,
            halfmove_clock: fen.halfmove_clock,
            fullmove_number: fen.fullmove_number,
            zobrist: 0,
            history: Vec::with_capacity(256),
            history_start: 0,
        };

        position.check_castling_rights()?;
        position.check_en_passant()?;

        let them = position.side_to_move.opposite();
        if is_square_attacked(&position, position.king_square(them), position.side_to_move) {
            return Err(PositionError::OpponentInCheck {
                color: position.side_to_move,
            });
        }

        position.zobrist = position.compute_zobrist();
        position.history.push(position.zobrist);
        Ok(position)
    }

    fn check_castling_rights(&self) -> Result<(), PositionError> {
        let requirements = [
            ('K', CastlingRights::WHITE_KINGSIDE, Color::White, Square::E1, Square::H1),
            ('Q', CastlingRights::WHITE_QUEENSIDE, Color::White, Square::E1, Square::A1),
            ('k', CastlingRights::BLACK_KINGSIDE, Color::Black, Square::E8, Square::H8),
            ('q', CastlingRights::BLACK_QUEENSIDE, Color::Black, Square::E8, Square::A8),
        ];
        for (right, flag, color, king, rook) in requirements {
            if self.castling.has(flag)
                && (self.piece_at(king) != Some((Piece::King, color))
                    || self.piece_at(rook) != Some((Piece::Rook, color)))
            {
                return Err(PositionError::InconsistentCastling { right });
            }
        }
        Ok(())
    }

    fn check_en_passant(&self) -> Result<(), PositionError> {
        let Some(square) = self.en_passant else {
            return Ok(());
        };
        let us = self.side_to_move;
        let them = us.opposite();
        let expected_rank = match us {
            Color::White => Rank::R6,
            Color::Black => Rank::R3,
        };
        // The pushed pawn stands one step further in its own direction; the
        // square it came from must be empty.
        let pushed = square.offset(0, them.pawn_direction());
        let origin = square.offset(0, -them.pawn_direction());
        let consistent = square.rank() == expected_rank
            && self.piece_at(square).is_none()
            && pushed.is_some_and(|sq| self.piece_at(sq) == Some((Piece::Pawn, them)))
            && origin.is_some_and(|sq| self.piece_at(sq).is_none());
        if consistent {
            Ok(())
        } else {
            Err(PositionError::InconsistentEnPassant { square })
        }
    }

    /// Serializes the position back to FEN.
    pub fn to_fen(&self) -> String {
        let mut board = [None; 64];
        for sq in self.occupied {
            board[sq.index() as usize] = self.piece_at(sq);
        }
        Fen {
            board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }

    /// Hashes the position from scratch, ignoring the incremental key.
    pub fn compute_zobrist(&self) -> u64 {
        let mut key = ZOBRIST.side(self.side_to_move)
            ^ ZOBRIST.castling_flags(self.castling.raw())
            ^ ZOBRIST.en_passant(self.en_passant);
        for sq in self.occupied {
            if let Some((piece, color)) = self.piece_at(sq) {
                key ^= ZOBRIST.piece(piece, color, sq);
            }
        }
        key
    }

    /// Returns the piece and color at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let piece = self.piece_types[sq.index() as usize]?;
        let color = if self.colors[Color::White.index()].contains(sq) {
            Color::White
        } else {
            Color::Black
        };
        Some((piece, color))
    }

    #[inline]
    pub fn piece_type(&self, sq: Square) -> Option<Piece> {
        self.piece_types[sq.index() as usize]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// All pieces of one color.
    #[inline]
    pub fn pieces(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Pieces of one type and color. Walks the color's squares.
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.colors[color.index()]
            .into_iter()
            .filter(|&sq| self.piece_type(sq) == Some(piece))
            .collect()
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn zobrist(&self) -> u64 {
        self.zobrist
    }

    /// Keys since the last irreversible move, current position last.
    #[inline]
    pub fn repetition_window(&self) -> &[u64] {
        &self.history[self.history_start..]
    }

    /// Earlier occurrences of the current position with the same side to
    /// move, counted inside the repetition window.
    pub fn repetitions(&self) -> usize {
        let window = self.repetition_window();
        let Some((&current, earlier)) = window.split_last() else {
            return 0;
        };
        earlier
            .iter()
            .rev()
            .skip(1)
            .step_by(2)
            .filter(|&&key| key == current)
            .count()
    }

    /// The current position has occurred twice before: threefold repetition.
    #[inline]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetitions() >= 2
    }

    /// Whether the side to move is in check.
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        is_square_attacked(self, self.king_square(us), us.opposite())
    }

    /// Verifies the redundant representations agree with each other.
    pub fn is_consistent(&self) -> bool {
        let [white, black] = self.colors;
        if (white & black).is_not_empty() || self.occupied != (white | black) {
            return false;
        }
        let types_match = Square::ALL
            .iter()
            .all(|&sq| self.piece_type(sq).is_some() == self.occupied.contains(sq));
        let kings_match = Color::BOTH
            .iter()
            .all(|&c| self.piece_at(self.king_square(c)) == Some((Piece::King, c)));
        types_match && kings_match && self.history.last() == Some(&self.zobrist)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
