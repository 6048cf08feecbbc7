//! Best-move cache keyed by Zobrist hash.

use std::collections::HashMap;

use chess_core::Move;

/// Remembers the last best move found for each position.
///
/// Only the move is stored, no score or depth; a later store for the same
/// key overwrites the earlier one.
#[derive(Debug, Default, Clone)]
pub struct TranspositionTable {
    entries: HashMap<u64, Move>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: u64) -> Option<Move> {
        self.entries.get(&key).copied()
    }

    #[inline]
    pub fn store(&mut self, key: u64, mv: Move) {
        self.entries.insert(key, mv);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
