//! The rules of chess played out: whose turn it is, which moves are legal, and what making a move
//! does to the game
//!
//! [`Game`] is the only thing which changes a game in progress. Everything else works on a
//! [`Snapshot`], a copy of the position which can be handed to another thread and queried without
//! affecting the game it came from.

use core::fmt;

use board::{InvalidPosition, NotationError, PieceKind, Position};

mod castling;
mod chess_move;
mod fen;
mod game;
mod movegen;
mod perft;
mod san;

pub use crate::castling::CastlingRights;
pub use crate::chess_move::{Move, MoveKind};
pub use crate::fen::FenError;
pub use crate::game::Game;
pub use crate::movegen::Snapshot;
pub use crate::perft::perft;

pub type Result<T, E = MoveError> = core::result::Result<T, E>;

/// Why a move was refused
///
/// A refused move never changes the game, so the caller is free to ask for another one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MoveError {
    #[error("invalid square: {0}")]
    InvalidPosition(#[from] InvalidPosition),
    #[error("moving from {from} to {to} is not legal")]
    IllegalMove { from: Position, to: Position },
    #[error("moving from {from} to {to} promotes a pawn, so a piece must be chosen")]
    PromotionRequired { from: Position, to: Position },
    #[error("a pawn can't promote into a {0:?}")]
    InvalidPromotion(PieceKind),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error("no piece can make the move `{0}`")]
    NoSourcePiece(String),
    #[error("multiple pieces can make the move `{0}`, but no disambiguation given")]
    AmbiguousSourcePiece(String),
}

/// Whether the game is still going, and if not, how it ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    InProgress,
    /// The side to move is attacked and has no legal moves, so it lost
    Checkmate,
    /// The side to move isn't attacked but has no legal moves, which is a draw
    Stalemate,
}
impl GameStatus {
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}
impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InProgress => "in progress",
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
        })
    }
}
