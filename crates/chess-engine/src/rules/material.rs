use chess_core::{Color, Piece};

use crate::Position;

/// King against king, or king and a single knight or bishop against a bare
/// king.
pub fn is_insufficient_material(position: &Position) -> bool {
    let heavy = [Piece::Pawn, Piece::Rook, Piece::Queen];
    let has_heavy = Color::BOTH.iter().any(|&color| {
        heavy
            .iter()
            .any(|&piece| position.pieces_of(piece, color).is_not_empty())
    });
    if has_heavy {
        return false;
    }

    let minors = Color::BOTH
        .iter()
        .map(|&color| {
            (position.pieces_of(Piece::Knight, color) | position.pieces_of(Piece::Bishop, color))
                .count()
        })
        .sum::<u32>();
    minors <= 1
}
