//! Canonical chess-rule constants.
//!
//! Stores the standard starting position and the fixed squares involved in
//! castling, shared by move generation and move application.

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove clock value at which the fifty-move rule draws.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Occurrences of one position that make a repetition draw.
pub const REPETITION_DRAW_COUNT: usize = 3;

/// One castling option: the right it needs and the squares it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingLane {
    pub right: CastlingRights,
    pub color: Color,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares the king stands on or crosses; none may be attacked.
    pub king_path: [Square; 3],
}

pub const CASTLING_LANES: [CastlingLane; 4] = [
    CastlingLane {
        right: CASTLE_WHITE_KINGSIDE,
        color: Color::White,
        king_from: Square::E1,
        king_to: Square::G1,
        rook_from: Square::H1,
        rook_to: Square::F1,
        king_path: [Square::E1, Square::F1, Square::G1],
    },
    CastlingLane {
        right: CASTLE_WHITE_QUEENSIDE,
        color: Color::White,
        king_from: Square::E1,
        king_to: Square::C1,
        rook_from: Square::A1,
        rook_to: Square::D1,
        king_path: [Square::E1, Square::D1, Square::C1],
    },
    CastlingLane {
        right: CASTLE_BLACK_KINGSIDE,
        color: Color::Black,
        king_from: Square::E8,
        king_to: Square::G8,
        rook_from: Square::H8,
        rook_to: Square::F8,
        king_path: [Square::E8, Square::F8, Square::G8],
    },
    CastlingLane {
        right: CASTLE_BLACK_QUEENSIDE,
        color: Color::Black,
        king_from: Square::E8,
        king_to: Square::C8,
        rook_from: Square::A8,
        rook_to: Square::D8,
        king_path: [Square::E8, Square::D8, Square::C8],
    },
];

/// Castling rights lost when a piece leaves or is captured on `square`.
pub fn rights_lost_at(square: Square) -> CastlingRights {
    match square {
        Square::E1 => CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
        Square::E8 => CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
        Square::H1 => CASTLE_WHITE_KINGSIDE,
        Square::A1 => CASTLE_WHITE_QUEENSIDE,
        Square::H8 => CASTLE_BLACK_KINGSIDE,
        Square::A8 => CASTLE_BLACK_QUEENSIDE,
        _ => 0,
    }
}

/// Rank a pawn of `color` starts on (`0 == rank 1`).
#[inline]
pub const fn pawn_start_rank(color: Color) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}

/// Rank a pawn of `color` promotes on.
#[inline]
pub const fn promotion_rank(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

/// Rank of the en-passant target square when `color` is the capturing side.
#[inline]
pub const fn en_passant_target_rank(color: Color) -> u8 {
    match color {
        Color::White => 5,
        Color::Black => 2,
    }
}
