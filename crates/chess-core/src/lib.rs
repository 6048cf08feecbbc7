//! Core types for chess.
//!
//! This crate provides the value types shared by the engine and its hosts:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`MoveKind`] for fully described moves
//! - [`CastlingRights`]
//! - [`Fen`] for the syntactic side of FEN parsing and serialization

mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use castling::CastlingRights;
pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{Move, MoveKind};
pub use piece::Piece;
pub use square::{File, Rank, Square};
