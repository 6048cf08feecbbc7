//! Static evaluation: material plus phase-bucketed piece-square tables.
//!
//! Scores are in centipawns from white's point of view. The piece-square
//! tables can be replaced wholesale, which is how externally tuned values
//! are fed in.

use chess_core::{Color, Piece, Square};
use thiserror::Error;

use crate::Position;

/// Number of game-phase buckets, selected by how many pieces remain.
pub const PHASES: usize = 4;
/// One table per piece kind and colour: `piece + 6 * colour`.
pub const PIECE_SLOTS: usize = 12;

/// Material value in centipawns.
pub const fn material(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 300,
        Piece::Bishop => 320,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 0,
    }
}

/// Maps the number of pieces on the board (kings included) to a phase
/// bucket: 0 for the sparsest endgames up to 3 for the opening.
#[inline]
pub fn phase_bucket(piece_count: u32) -> usize {
    (piece_count.saturating_sub(1) as usize / 8).min(PHASES - 1)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalTableError {
    #[error("expected 4 phase buckets, found {0}")]
    PhaseCount(usize),

    #[error("phase {phase}: expected 12 piece tables, found {found}")]
    PieceCount { phase: usize, found: usize },

    #[error("phase {phase}, piece {piece}: expected 64 squares, found {found}")]
    SquareCount {
        phase: usize,
        piece: usize,
        found: usize,
    },
}

/// Bonuses indexed `[phase][piece + 6 * colour][square]`.
///
/// The bonus of a black piece is subtracted from the score, so a table
/// meant to be colour-symmetric stores the black half rank-mirrored.
#[derive(Clone, PartialEq, Eq)]
pub struct PieceSquareTables {
    values: Box<[[[i32; 64]; PIECE_SLOTS]; PHASES]>,
}

impl PieceSquareTables {
    /// All-zero tables: evaluation degenerates to material only.
    pub fn zeroed() -> Self {
        PieceSquareTables {
            values: Box::new([[[0; 64]; PIECE_SLOTS]; PHASES]),
        }
    }

    /// Builds tables from nested vectors, as produced by deserialising a
    /// tuner's output.
    pub fn from_nested(nested: Vec<Vec<Vec<i32>>>) -> Result<Self, EvalTableError> {
        if nested.len() != PHASES {
            return Err(EvalTableError::PhaseCount(nested.len()));
        }
        let mut tables = Self::zeroed();
        for (phase, pieces) in nested.into_iter().enumerate() {
            if pieces.len() != PIECE_SLOTS {
                return Err(EvalTableError::PieceCount {
                    phase,
                    found: pieces.len(),
                });
            }
            for (piece, squares) in pieces.into_iter().enumerate() {
                let row: [i32; 64] = squares.try_into().map_err(|squares: Vec<i32>| {
                    EvalTableError::SquareCount {
                        phase,
                        piece,
                        found: squares.len(),
                    }
                })?;
                tables.values[phase][piece] = row;
            }
        }
        Ok(tables)
    }

    /// The inverse of [`from_nested`](Self::from_nested).
    pub fn to_nested(&self) -> Vec<Vec<Vec<i32>>> {
        self.values
            .iter()
            .map(|phase| phase.iter().map(|squares| squares.to_vec()).collect())
            .collect()
    }

    #[inline]
    pub fn get(&self, phase: usize, piece: Piece, color: Color, square: usize) -> i32 {
        self.values[phase][piece.index() + 6 * color.index()][square]
    }

    pub fn set(&mut self, phase: usize, piece: Piece, color: Color, square: usize, value: i32) {
        self.values[phase][piece.index() + 6 * color.index()][square] = value;
    }
}

impl Default for PieceSquareTables {
    fn default() -> Self {
        let mut tables = Self::zeroed();
        for phase in 0..PHASES {
            for piece in Piece::ALL {
                let visual = match piece {
                    Piece::Pawn => &PAWN,
                    Piece::Knight => &KNIGHT,
                    Piece::Bishop => &BISHOP,
                    Piece::Rook => &ROOK,
                    Piece::Queen => &QUEEN,
                    Piece::King if phase < 2 => &KING_ENDGAME,
                    Piece::King => &KING_MIDDLEGAME,
                };
                for sq in Square::ALL {
                    // Rows are written rank 8 first.
                    let index = sq.index() as usize;
                    let white = visual[sq.flip_rank().index() as usize];
                    tables.set(phase, piece, Color::White, index, white);
                    tables.set(phase, piece, Color::Black, index, visual[index]);
                }
            }
        }
        tables
    }
}

impl std::fmt::Debug for PieceSquareTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PieceSquareTables").finish_non_exhaustive()
    }
}

/// Scores positions with a fixed set of tables.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    tables: PieceSquareTables,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: PieceSquareTables) -> Self {
        Evaluator { tables }
    }

    pub fn tables(&self) -> &PieceSquareTables {
        &self.tables
    }

    /// White-relative score. A position at or past the fifty-move limit is
    /// a dead draw and scores 0.
    pub fn evaluate(&self, position: &Position) -> i32 {
        if position.halfmove_clock() > 99 {
            return 0;
        }

        let phase = phase_bucket(position.occupied().count());
        let mut score = 0;
        for sq in position.occupied() {
            let Some((piece, color)) = position.piece_at(sq) else {
                continue;
            };
            let value = material(piece) + self.tables.get(phase, piece, color, sq.index() as usize);
            score += color.sign() * value;
        }
        score
    }
}

#[rustfmt::skip]
const PAWN: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MIDDLEGAME: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const KING_ENDGAME: [i32; 64] = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -50,-30,-30,-30,-30,-30,-30,-50,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(fen: &str) -> i32 {
        Evaluator::new().evaluate(&Position::from_fen(fen).unwrap())
    }

    #[test]
    fn phase_buckets() {
        assert_eq!(phase_bucket(32), 3);
        assert_eq!(phase_bucket(25), 3);
        assert_eq!(phase_bucket(24), 2);
        assert_eq!(phase_bucket(16), 1);
        assert_eq!(phase_bucket(8), 0);
        assert_eq!(phase_bucket(2), 0);
    }

    #[test]
    fn startpos_is_balanced() {
        assert_eq!(Evaluator::new().evaluate(&Position::startpos()), 0);
    }

    #[test]
    fn mirrored_positions_negate() {
        let white = eval("4k3/8/8/8/3N4/8/1P6/4K3 w - - 0 1");
        let black = eval("4k3/1p6/8/3n4/8/8/8/4K3 b - - 0 1");
        assert!(white > 0);
        assert_eq!(white, -black);
    }

    #[test]
    fn default_tables_mirror_across_the_board() {
        let tables = PieceSquareTables::default();
        for phase in 0..PHASES {
            for piece in Piece::ALL {
                for sq in Square::ALL {
                    let mirror = sq.flip_rank().index() as usize;
                    assert_eq!(
                        tables.get(phase, piece, Color::White, sq.index() as usize),
                        tables.get(phase, piece, Color::Black, mirror),
                        "{piece} on {sq}"
                    );
                }
            }
        }
    }

    #[test]
    fn extra_queen_is_worth_about_900() {
        let score = eval("3qk3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!((-950..=-850).contains(&score), "{score}");
    }

    #[test]
    fn fifty_move_limit_scores_zero() {
        assert_ne!(eval("3qk3/8/8/8/8/8/8/4K3 w - - 99 80"), 0);
        assert_eq!(eval("3qk3/8/8/8/8/8/8/4K3 w - - 100 80"), 0);
    }

    #[test]
    fn zeroed_tables_leave_material() {
        let evaluator = Evaluator::with_tables(PieceSquareTables::zeroed());
        let pos = Position::from_fen("r3k3/8/8/8/8/8/8/1N2K3 w - - 0 1").unwrap();
        assert_eq!(evaluator.evaluate(&pos), 300 - 500);
    }

    #[test]
    fn black_bonus_is_subtracted() {
        let mut tables = PieceSquareTables::zeroed();
        let e5 = chess_core::Square::from_algebraic("e5").unwrap().index() as usize;
        tables.set(phase_bucket(3), Piece::Pawn, Color::Black, e5, 7);
        let evaluator = Evaluator::with_tables(tables);
        let pos = Position::from_fen("4k3/8/8/4p3/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(evaluator.evaluate(&pos), -100 - 7);
    }

    #[test]
    fn nested_round_trip_and_shape_errors() {
        let tables = PieceSquareTables::default();
        let nested = tables.to_nested();
        assert_eq!(PieceSquareTables::from_nested(nested.clone()), Ok(tables));

        assert_eq!(
            PieceSquareTables::from_nested(nested[..3].to_vec()),
            Err(EvalTableError::PhaseCount(3))
        );

        let mut short = nested.clone();
        short[2].pop();
        assert_eq!(
            PieceSquareTables::from_nested(short),
            Err(EvalTableError::PieceCount {
                phase: 2,
                found: 11
            })
        );

        let mut long = nested;
        long[1][4].push(0);
        assert_eq!(
            PieceSquareTables::from_nested(long),
            Err(EvalTableError::SquareCount {
                phase: 1,
                piece: 4,
                found: 65
            })
        );
    }
}
