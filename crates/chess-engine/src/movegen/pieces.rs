//! Per-piece move generators.
//!
//! Each generator pushes fully formed moves for one piece on one square.
//! They know nothing about checks; the `_pinned` variants take the own king
//! square and keep only destinations on the line through king and piece.

use chess_core::{Color, Move, MoveKind, Piece, Square};

use super::MoveList;
use crate::geometry::geometry;
use crate::Bitboard;

/// One move per target square, tagged quiet or capture by what stands there.
#[inline]
fn push_targets(
    moves: &mut MoveList,
    piece: Piece,
    from: Square,
    targets: Bitboard,
    enemy: Bitboard,
) {
    for to in targets {
        let kind = if enemy.contains(to) {
            MoveKind::capture(piece)
        } else {
            MoveKind::quiet(piece)
        };
        moves.push(Move::new(from, to, piece, kind));
    }
}

pub fn knight_moves(from: Square, own: Bitboard, enemy: Bitboard, moves: &mut MoveList) {
    let targets = geometry().knight_attacks(from) & !own;
    push_targets(moves, Piece::Knight, from, targets, enemy);
}

/// King steps onto squares the enemy does not attack.
///
/// `attacked` must be computed with the king itself removed from the board,
/// otherwise stepping back along a checking line looks safe.
pub fn king_moves(
    from: Square,
    own: Bitboard,
    enemy: Bitboard,
    attacked: Bitboard,
    moves: &mut MoveList,
) {
    let targets = geometry().king_attacks(from) & !own & !attacked;
    push_targets(moves, Piece::King, from, targets, enemy);
}

fn slider_moves(
    piece: Piece,
    from: Square,
    own: Bitboard,
    enemy: Bitboard,
    allowed: Bitboard,
    moves: &mut MoveList,
) {
    let g = geometry();
    let occupied = own | enemy;
    let attacks = match piece {
        Piece::Bishop => g.bishop_attacks(from, occupied),
        Piece::Rook => g.rook_attacks(from, occupied),
        Piece::Queen => g.queen_attacks(from, occupied),
        _ => unreachable!("{piece} does not slide"),
    };
    push_targets(moves, piece, from, attacks & !own & allowed, enemy);
}

pub fn bishop_moves(from: Square, own: Bitboard, enemy: Bitboard, moves: &mut MoveList) {
    slider_moves(Piece::Bishop, from, own, enemy, Bitboard::FULL, moves);
}

pub fn bishop_moves_pinned(
    from: Square,
    king: Square,
    own: Bitboard,
    enemy: Bitboard,
    moves: &mut MoveList,
) {
    let line = geometry().line(king, from);
    slider_moves(Piece::Bishop, from, own, enemy, line, moves);
}

pub fn rook_moves(from: Square, own: Bitboard, enemy: Bitboard, moves: &mut MoveList) {
    slider_moves(Piece::Rook, from, own, enemy, Bitboard::FULL, moves);
}

pub fn rook_moves_pinned(
    from: Square,
    king: Square,
    own: Bitboard,
    enemy: Bitboard,
    moves: &mut MoveList,
) {
    let line = geometry().line(king, from);
    slider_moves(Piece::Rook, from, own, enemy, line, moves);
}

pub fn queen_moves(from: Square, own: Bitboard, enemy: Bitboard, moves: &mut MoveList) {
    slider_moves(Piece::Queen, from, own, enemy, Bitboard::FULL, moves);
}

pub fn queen_moves_pinned(
    from: Square,
    king: Square,
    own: Bitboard,
    enemy: Bitboard,
    moves: &mut MoveList,
) {
    let line = geometry().line(king, from);
    slider_moves(Piece::Queen, from, own, enemy, line, moves);
}

/// Pushes the pawn move to `to`, expanded into four moves on the last rank.
#[inline]
fn push_pawn(moves: &mut MoveList, color: Color, from: Square, to: Square, capture: bool) {
    if to.rank() == color.promotion_rank() {
        for piece in Piece::PROMOTIONS {
            let kind = if capture {
                MoveKind::CapturePromotion { piece }
            } else {
                MoveKind::Promotion { piece }
            };
            moves.push(Move::new(from, to, Piece::Pawn, kind));
        }
    } else {
        let kind = if capture {
            MoveKind::CapturePawn
        } else {
            MoveKind::QuietPawn
        };
        moves.push(Move::new(from, to, Piece::Pawn, kind));
    }
}

fn pawn_targets(
    color: Color,
    from: Square,
    enemy: Bitboard,
    occupied: Bitboard,
    allowed: Bitboard,
    moves: &mut MoveList,
) {
    let dir = color.pawn_direction();
    if let Some(one) = from.offset(0, dir).filter(|&sq| !occupied.contains(sq)) {
        if allowed.contains(one) {
            push_pawn(moves, color, from, one, false);
        }
        if from.rank() == color.pawn_rank() {
            if let Some(two) = one.offset(0, dir) {
                if !occupied.contains(two) && allowed.contains(two) {
                    let kind = MoveKind::DoublePawnPush { en_passant: one };
                    moves.push(Move::new(from, two, Piece::Pawn, kind));
                }
            }
        }
    }

    for to in geometry().pawn_attacks(color, from) & enemy & allowed {
        push_pawn(moves, color, from, to, true);
    }
}

/// Pushes, double pushes, captures and promotions. En passant is generated
/// by the legal move generator, which has to validate it anyway.
pub fn pawn_moves(
    color: Color,
    from: Square,
    enemy: Bitboard,
    occupied: Bitboard,
    moves: &mut MoveList,
) {
    pawn_targets(color, from, enemy, occupied, Bitboard::FULL, moves);
}

pub fn pawn_moves_pinned(
    color: Color,
    from: Square,
    king: Square,
    enemy: Bitboard,
    occupied: Bitboard,
    moves: &mut MoveList,
) {
    let line = geometry().line(king, from);
    pawn_targets(color, from, enemy, occupied, line, moves);
}
