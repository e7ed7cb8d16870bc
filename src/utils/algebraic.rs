//! Square and bitboard conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and the
//! file-reversed square indices used internally (`h1 == 0`, `a1 == 7`).

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Bitboard, Square};

/// Convert algebraic notation (for example: "e4") to a square.
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidAlgebraic(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidAlgebraic(square.to_owned()));
    }

    Square::from_file_rank(file - b'a', rank - b'1')
}

/// Convert algebraic notation (for example: "e4") to a one-hot bitboard.
#[inline]
pub fn algebraic_to_bitboard(square: &str) -> ChessResult<Bitboard> {
    Ok(algebraic_to_square(square)?.bit())
}

/// Convert a raw square index to algebraic notation, validating the range.
pub fn index_to_algebraic(index: u32) -> ChessResult<String> {
    Ok(Square::new(index)?.to_string())
}

/// Convert a one-hot bitboard to algebraic notation.
pub fn bitboard_to_algebraic(bitboard: Bitboard) -> ChessResult<String> {
    if bitboard.count_ones() != 1 {
        return Err(ChessError::InvalidAlgebraic(format!(
            "bitboard {bitboard:#x} must have exactly one set bit"
        )));
    }
    Square::lsb(bitboard)
        .map(|square| square.to_string())
        .ok_or_else(|| ChessError::InvalidAlgebraic(format!("{bitboard:#x}")))
}
