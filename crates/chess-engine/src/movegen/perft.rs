//! Perft: exhaustive leaf counts used to validate move generation and
//! make/unmake against published reference numbers.

use super::generate_moves;
use crate::Position;

/// Counts leaf nodes `depth` plies below `position`.
///
/// The position is walked in place and handed back unchanged.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for &mv in &moves {
        let undo = position.make_move(mv);
        nodes += perft(position, depth - 1);
        position.unmake_move(mv, undo);
    }
    nodes
}

/// Per-root-move leaf counts, sorted by move text.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let moves = generate_moves(position);
    let mut results: Vec<(String, u64)> = moves
        .as_slice()
        .iter()
        .map(|&mv| {
            let undo = position.make_move(mv);
            let nodes = perft(position, depth.saturating_sub(1));
            position.unmake_move(mv, undo);
            (mv.to_uci(), nodes)
        })
        .collect();

    results.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    results
}
