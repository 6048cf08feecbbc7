//! Zobrist hashing for position identification.
//!
//! A position key is the XOR of one random value per:
//! - piece on square (6 piece types x 2 colors x 64 squares)
//! - black to move
//! - castling right held (4 values)
//! - en passant file, when an en passant target is set (8 values)
//!
//! Every part can be toggled independently, which is what makes the key
//! cheap to update incrementally in make/unmake.

use chess_core::{CastlingRights, Color, Piece, Square};

use crate::bitboard::xorshift64;

/// Zobrist hash keys, generated at compile time from a fixed seed.
pub struct ZobristKeys {
    /// Keys for pieces: [piece][color][square]
    pub pieces: [[[u64; 64]; 2]; 6],
    pub black_to_move: u64,
    /// One key per castling flag bit.
    pub castling: [u64; 4],
    pub en_passant: [u64; 8],
}

impl ZobristKeys {
    const fn new() -> Self {
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut piece = 0;
        while piece < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = xorshift64(state);
                    pieces[piece][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        state = xorshift64(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = xorshift64(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = xorshift64(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub const fn piece(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.pieces[piece.index()][color.index()][square.index() as usize]
    }

    /// XOR of the keys of every flag set in `flags`.
    #[inline]
    pub const fn castling_flags(&self, flags: u8) -> u64 {
        let mut key = 0;
        let mut bit = 0;
        while bit < 4 {
            if flags & (1 << bit) != 0 {
                key ^= self.castling[bit];
            }
            bit += 1;
        }
        key
    }

    /// Key change when rights go from `before` to `after`.
    #[inline]
    pub const fn castling_change(&self, before: CastlingRights, after: CastlingRights) -> u64 {
        self.castling_flags(before.raw() ^ after.raw())
    }

    /// Key contribution of an en passant target (by its file).
    #[inline]
    pub const fn en_passant(&self, target: Option<Square>) -> u64 {
        match target {
            Some(sq) => self.en_passant[sq.file().index() as usize],
            None => 0,
        }
    }

    #[inline]
    pub const fn side(&self, side_to_move: Color) -> u64 {
        match side_to_move {
            Color::White => 0,
            Color::Black => self.black_to_move,
        }
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
