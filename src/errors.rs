//! Error type shared by parsing, move application and search.
//!
//! Recoverable input problems (bad FEN, bad algebraic names, malformed
//! interchange records) and internal consistency failures (a move whose origin
//! holds no piece) all surface as `ChessError`. Out-of-turn move submission is
//! deliberately not an error; see `Engine::apply_to_canonical`.

use thiserror::Error;

use crate::game_state::chess_types::Color;

pub type ChessResult<T> = Result<T, ChessError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid algebraic square: {0}")]
    InvalidAlgebraic(String),

    #[error("square index {0} is outside 0..=63")]
    SquareOutOfRange(u32),

    #[error("no piece on square {0}")]
    NoPieceOnSquare(String),

    #[error("piece on {square} does not match the move: expected {expected}")]
    PieceMismatch { square: String, expected: String },

    #[error("search requested for {requested:?} but {to_move:?} is to move")]
    WrongSideToMove { requested: Color, to_move: Color },

    #[error("unsupported promotion piece '{0}'; pawns promote to a queen")]
    UnsupportedPromotion(char),

    #[error("invalid position record: {0}")]
    InvalidRecord(String),
}
