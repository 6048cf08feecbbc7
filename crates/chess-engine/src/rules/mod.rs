//! Game outcome detection.
//!
//! [`game_state`] classifies a position as still in play, drawn or lost for
//! the side to move. Repetition is judged over the position's own history,
//! so positions built with [`Position::from_fen`] only know the moves made
//! on them since loading.

mod material;

pub use material::is_insufficient_material;

use chess_core::Color;

use crate::movegen::generate_moves;
use crate::Position;

/// Why a game ended in a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// 100 half-moves without a pawn move or capture.
    FiftyMoveRule,
    /// The current position has occurred three times.
    ThreefoldRepetition,
    /// Neither side can possibly deliver mate.
    InsufficientMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    Draw(DrawReason),
    /// Holds the winner.
    Checkmate(Color),
}

impl GameState {
    pub fn is_over(self) -> bool {
        self != GameState::Ongoing
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameState::Ongoing => write!(f, "ongoing"),
            GameState::Checkmate(Color::White) => write!(f, "1-0 (checkmate)"),
            GameState::Checkmate(Color::Black) => write!(f, "0-1 (checkmate)"),
            GameState::Draw(reason) => write!(f, "1/2-1/2 ({reason:?})"),
        }
    }
}

/// Checkmate and stalemate take precedence over the other draw rules.
pub fn game_state(position: &Position) -> GameState {
    if generate_moves(position).is_empty() {
        return if position.in_check() {
            GameState::Checkmate(position.side_to_move().opposite())
        } else {
            GameState::Draw(DrawReason::Stalemate)
        };
    }
    if is_insufficient_material(position) {
        return GameState::Draw(DrawReason::InsufficientMaterial);
    }
    if position.halfmove_clock() >= 100 {
        return GameState::Draw(DrawReason::FiftyMoveRule);
    }
    if position.is_threefold_repetition() {
        return GameState::Draw(DrawReason::ThreefoldRepetition);
    }
    GameState::Ongoing
}
