//! Iterative-deepening alpha-beta search.
//!
//! Scores are white-relative throughout: [`Engine::white_node`] maximises,
//! [`Engine::black_node`] minimises, and the two call each other. Each
//! iteration runs to completion; the clock is only consulted between
//! iterations, so a search can overrun its budget by one depth.

mod transposition;

pub use transposition::TranspositionTable;

use std::time::{Duration, Instant};

use chess_core::{Color, Move};

use crate::eval::{Evaluator, PieceSquareTables};
use crate::movegen::generate_moves;
use crate::Position;

/// Base of the checkmate score. The remaining depth is added on top so
/// that quicker mates score higher for the winner.
pub const MATE: i32 = 100_000;

/// Plies the search may extend past the nominal horizon while in check.
pub const CHECK_EXTENSION_FLOOR: i32 = -3;

/// Hard cap on iterative deepening when no depth limit is given.
pub const MAX_DEPTH: u32 = 64;

const INFINITY: i32 = i32::MAX;

/// When to stop deepening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Soft time budget, checked after each completed depth.
    pub time: Duration,
    /// Stop after this depth even if time remains.
    pub max_depth: Option<u32>,
}

impl SearchLimits {
    pub fn time(time: Duration) -> Self {
        SearchLimits {
            time,
            max_depth: None,
        }
    }

    /// Fixed depth, no practical time limit.
    pub fn depth(depth: u32) -> Self {
        SearchLimits {
            time: Duration::MAX,
            max_depth: Some(depth),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` only when the root has no legal moves.
    pub best_move: Option<Move>,
    /// White-relative score of the deepest completed iteration.
    pub score: i32,
    /// Deepest completed iteration.
    pub depth: u32,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SearchResult {
    /// Whether the score reports a forced mate for either side. Mates found
    /// inside the check extension score below `MATE`.
    pub fn is_mate(&self) -> bool {
        self.score.abs() >= MATE + CHECK_EXTENSION_FLOOR
    }
}

/// Owns the state that persists across searches: the transposition table
/// and the evaluator.
#[derive(Debug, Default)]
pub struct Engine {
    tt: TranspositionTable,
    evaluator: Evaluator,
    nodes: u64,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_evaluator(evaluator: Evaluator) -> Self {
        Engine {
            evaluator,
            ..Self::default()
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Swaps in new piece-square tables. Cached moves were found with the
    /// old tables, so the transposition table is cleared as well.
    pub fn set_tables(&mut self, tables: PieceSquareTables) {
        self.evaluator = Evaluator::with_tables(tables);
        self.tt.clear();
    }

    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Forgets every cached move.
    pub fn clear(&mut self) {
        self.tt.clear();
    }

    /// Clears the engine and returns a fresh starting position, whose
    /// repetition history is empty.
    pub fn new_game(&mut self) -> Position {
        self.clear();
        Position::startpos()
    }

    /// Searches for the best move within `budget`.
    pub fn search(&mut self, position: &mut Position, budget: Duration) -> SearchResult {
        self.search_with_limits(position, SearchLimits::time(budget))
    }

    /// Searches until the limits are reached. The position is searched in
    /// place and restored before returning.
    pub fn search_with_limits(
        &mut self,
        position: &mut Position,
        limits: SearchLimits,
    ) -> SearchResult {
        let start = Instant::now();
        let max_depth = limits.max_depth.unwrap_or(MAX_DEPTH).max(1);
        self.nodes = 0;

        let mut score = 0;
        let mut completed = 0;
        for depth in 1..=max_depth {
            score = self.node(position, depth as i32, -INFINITY, INFINITY);
            completed = depth;

            tracing::debug!(
                depth,
                score,
                nodes = self.nodes,
                best = ?self.tt.get(position.zobrist()),
                "completed iteration"
            );

            if start.elapsed() >= limits.time {
                break;
            }
        }

        let best_move = self
            .tt
            .get(position.zobrist())
            .or_else(|| generate_moves(position).as_slice().first().copied());

        let result = SearchResult {
            best_move,
            score,
            depth: completed,
            nodes: self.nodes,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            best = %best_move.map_or_else(|| "none".to_string(), |m| m.to_uci()),
            score,
            depth = completed,
            nodes = self.nodes,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "search finished"
        );
        result
    }

    fn node(&mut self, position: &mut Position, depth: i32, alpha: i32, beta: i32) -> i32 {
        match position.side_to_move() {
            Color::White => self.white_node(position, depth, alpha, beta),
            Color::Black => self.black_node(position, depth, alpha, beta),
        }
    }

    fn white_node(
        &mut self,
        position: &mut Position,
        depth: i32,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;
        if position.is_threefold_repetition() {
            return 0;
        }
        let in_check = position.in_check();
        if (depth <= 0 && !in_check) || depth < CHECK_EXTENSION_FLOOR {
            return self.evaluator.evaluate(position);
        }

        let key = position.zobrist();
        let mut moves = generate_moves(position);
        if moves.is_empty() {
            return if in_check { -(MATE + depth) } else { 0 };
        }
        order_moves(moves.as_mut_slice(), self.tt.get(key));

        let mut best = -INFINITY;
        let mut best_move = moves[0];
        for &mv in &moves {
            let undo = position.make_move(mv);
            let score = self.black_node(position, depth - 1, alpha, beta);
            position.unmake_move(mv, undo);

            if score > best {
                best = score;
                best_move = mv;
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        self.tt.store(key, best_move);
        best
    }

    fn black_node(
        &mut self,
        position: &mut Position,
        depth: i32,
        alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;
        if position.is_threefold_repetition() {
            return 0;
        }
        let in_check = position.in_check();
        if (depth <= 0 && !in_check) || depth < CHECK_EXTENSION_FLOOR {
            return self.evaluator.evaluate(position);
        }

        let key = position.zobrist();
        let mut moves = generate_moves(position);
        if moves.is_empty() {
            return if in_check { MATE + depth } else { 0 };
        }
        order_moves(moves.as_mut_slice(), self.tt.get(key));

        let mut best = INFINITY;
        let mut best_move = moves[0];
        for &mv in &moves {
            let undo = position.make_move(mv);
            let score = self.white_node(position, depth - 1, alpha, beta);
            position.unmake_move(mv, undo);

            if score < best {
                best = score;
                best_move = mv;
            }
            beta = beta.min(score);
            if alpha >= beta {
                break;
            }
        }

        self.tt.store(key, best_move);
        best
    }
}

/// Captures and the cached move first, everything else after, each group
/// keeping generation order.
fn order_moves(moves: &mut [Move], tt_move: Option<Move>) {
    moves.sort_by_key(|&mv| !(mv.is_capture() || Some(mv) == tt_move));
}
