//! Move representation.
//!
//! A [`Move`] is produced by the engine's legal move generator and carries
//! everything needed to apply it without looking at the board again: the
//! moving piece, a [`MoveKind`] tag with the per-kind extra squares, and two
//! precomputed XOR masks for the side bitboards.

use crate::{Piece, Square};
use std::fmt;

/// What a move does beyond moving one piece from `from` to `to`.
///
/// Quiet and capture moves are split by the moving piece because each group
/// touches different parts of the position state: pawn moves reset the
/// fifty-move clock, king moves update the king square and castling rights,
/// rook moves may drop a castling right. Bishop and queen moves use the
/// plain `Quiet`/`Capture` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    QuietPawn,
    QuietKnight,
    QuietKing,
    QuietRook,
    Capture,
    CapturePawn,
    CaptureKnight,
    CaptureKing,
    CaptureRook,
    /// Two-square pawn advance; `en_passant` is the square it skips over.
    DoublePawnPush { en_passant: Square },
    /// King move of two squares; the rook travels `rook_from -> rook_to`.
    Castle { rook_from: Square, rook_to: Square },
    /// The captured pawn stands on `captured`, not on the destination.
    EnPassant { captured: Square },
    Promotion { piece: Piece },
    CapturePromotion { piece: Piece },
}

impl MoveKind {
    /// Non-capturing kind for an ordinary move of `piece`.
    #[inline]
    pub const fn quiet(piece: Piece) -> Self {
        match piece {
            Piece::Pawn => MoveKind::QuietPawn,
            Piece::Knight => MoveKind::QuietKnight,
            Piece::King => MoveKind::QuietKing,
            Piece::Rook => MoveKind::QuietRook,
            Piece::Bishop | Piece::Queen => MoveKind::Quiet,
        }
    }

    /// Capturing kind for an ordinary move of `piece`.
    #[inline]
    pub const fn capture(piece: Piece) -> Self {
        match piece {
            Piece::Pawn => MoveKind::CapturePawn,
            Piece::Knight => MoveKind::CaptureKnight,
            Piece::King => MoveKind::CaptureKing,
            Piece::Rook => MoveKind::CaptureRook,
            Piece::Bishop | Piece::Queen => MoveKind::Capture,
        }
    }

    /// Removes an enemy piece from the board.
    #[inline]
    pub const fn is_capture(self) -> bool {
        matches!(
            self,
            MoveKind::Capture
                | MoveKind::CapturePawn
                | MoveKind::CaptureKnight
                | MoveKind::CaptureKing
                | MoveKind::CaptureRook
                | MoveKind::EnPassant { .. }
                | MoveKind::CapturePromotion { .. }
        )
    }

    /// Moves a pawn, so it resets the fifty-move clock.
    #[inline]
    pub const fn is_pawn_move(self) -> bool {
        matches!(
            self,
            MoveKind::QuietPawn
                | MoveKind::CapturePawn
                | MoveKind::DoublePawnPush { .. }
                | MoveKind::EnPassant { .. }
                | MoveKind::Promotion { .. }
                | MoveKind::CapturePromotion { .. }
        )
    }

    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        match self {
            MoveKind::Promotion { piece } | MoveKind::CapturePromotion { piece } => Some(piece),
            _ => None,
        }
    }
}

/// A fully described chess move.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    kind: MoveKind,
    own_delta: u64,
    opp_delta: u64,
}

impl Move {
    /// A placeholder that is never legal. Fills unused move list slots.
    pub const NULL: Move = Move {
        from: Square::A1,
        to: Square::A1,
        piece: Piece::Pawn,
        kind: MoveKind::Quiet,
        own_delta: 0,
        opp_delta: 0,
    };

    /// Builds a move and precomputes its bitboard deltas.
    ///
    /// The caller is responsible for the kind matching the board; the engine's
    /// generator is the only intended producer.
    #[inline]
    pub const fn new(from: Square, to: Square, piece: Piece, kind: MoveKind) -> Self {
        let mut own_delta = from.bitboard() | to.bitboard();
        let opp_delta = match kind {
            MoveKind::EnPassant { captured } => captured.bitboard(),
            _ if kind.is_capture() => to.bitboard(),
            _ => 0,
        };
        if let MoveKind::Castle { rook_from, rook_to } = kind {
            own_delta |= rook_from.bitboard() | rook_to.bitboard();
        }
        Move {
            from,
            to,
            piece,
            kind,
            own_delta,
            opp_delta,
        }
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// The piece standing on `from` before the move.
    #[inline]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    /// Squares toggled in the mover's occupancy.
    #[inline]
    pub const fn own_delta(self) -> u64 {
        self.own_delta
    }

    /// Square cleared in the opponent's occupancy (zero for non-captures).
    #[inline]
    pub const fn opp_delta(self) -> u64 {
        self.opp_delta
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.kind.is_capture()
    }

    /// Capture, pawn move or castle: the position before can never recur.
    #[inline]
    pub const fn is_irreversible(self) -> bool {
        self.kind.is_capture()
            || self.kind.is_pawn_move()
            || matches!(self.kind, MoveKind::Castle { .. })
    }

    /// The piece that ends up on `to`.
    #[inline]
    pub const fn placed_piece(self) -> Piece {
        match self.kind.promotion() {
            Some(piece) => piece,
            None => self.piece,
        }
    }

    /// Long algebraic form, e.g. "e2e4", "e1g1" or "a7a8q".
    pub fn to_uci(self) -> String {
        match self.kind.promotion() {
            Some(piece) => format!("{}{}{}", self.from, self.to, piece.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?})", self.to_uci(), self.kind)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
