//! Bitboard chess engine core.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets
//! - [`Position`] - board state with incremental Zobrist hashing and
//!   in-place [`make_move`](Position::make_move) / [`unmake_move`](Position::unmake_move)
//! - [`generate_moves`] - legal move generation
//! - [`Evaluator`] - material plus piece-square evaluation
//! - [`Engine`] - iterative-deepening alpha-beta search
//! - [`game_state`] - checkmate and draw detection
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use chess_engine::{game_state, Engine, GameState, Position};
//!
//! let mut position = Position::startpos();
//! let mut engine = Engine::new();
//! let result = engine.search(&mut position, Duration::from_millis(50));
//! let mv = result.best_move.unwrap();
//! position.make_move(mv);
//! assert_eq!(game_state(&position), GameState::Ongoing);
//! ```

mod bitboard;
pub mod eval;
pub mod geometry;
mod make;
pub mod movegen;
mod position;
pub mod rules;
pub mod search;
mod zobrist;

pub use bitboard::{xorshift64, Bitboard};
pub use eval::{EvalTableError, Evaluator, PieceSquareTables};
pub use make::UndoState;
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{find_move, generate_moves, is_square_attacked, MoveList};
pub use position::{Position, PositionError};
pub use rules::{game_state, DrawReason, GameState};
pub use search::{Engine, SearchLimits, SearchResult};
pub use zobrist::{ZobristKeys, ZOBRIST};
