//! FEN-to-PositionState parser.
//!
//! Builds a fully-populated position from a Forsyth-Edwards Notation string:
//! piece bitboards, rights, clocks, occupancies and the derived check, pin and
//! mate flags. Ranks are read high rank first and files a→h, then stored in
//! the file-reversed square layout.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::move_generation::legal_move_apply::refresh_derived_state;
use crate::moves::mask_table::MaskTable;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str, masks: &MaskTable) -> ChessResult<PositionState> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(ChessError::InvalidFen(format!(
            "expected 6 space-separated fields, found {}",
            fields.len()
        )));
    }

    let mut position = PositionState::new_empty();

    parse_board(fields[0], &mut position)?;
    position.turn = parse_side_to_move(fields[1])?;
    position.castling = parse_castling_rights(fields[2])?;
    position.en_passant = parse_en_passant_square(fields[3])?;
    position.halfmove_clock = fields[4]
        .parse::<u16>()
        .map_err(|_| ChessError::InvalidFen(format!("invalid halfmove clock: {}", fields[4])))?;
    position.fullmove_number = fields[5]
        .parse::<u16>()
        .map_err(|_| ChessError::InvalidFen(format!("invalid fullmove number: {}", fields[5])))?;

    position.recalc_occupancy();
    refresh_derived_state(masks, &mut position);

    Ok(position)
}

fn parse_board(board_part: &str, position: &mut PositionState) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::InvalidFen(format!(
            "board layout must contain 8 ranks, found {}",
            ranks.len()
        )));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = (7 - fen_rank_idx) as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessError::InvalidFen(format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(ChessError::InvalidFen(format!("rank '{rank_str}' is wider than 8 files")));
                }
                continue;
            }

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| ChessError::InvalidFen(format!("invalid piece character '{ch}'")))?;

            if file >= 8 {
                return Err(ChessError::InvalidFen(format!("rank '{rank_str}' is wider than 8 files")));
            }

            let square = Square::from_file_rank(file, rank)?;
            position.boards[piece.plane()] |= square.bit();
            file += 1;
        }

        if file != 8 {
            return Err(ChessError::InvalidFen(format!("rank '{rank_str}' does not cover 8 files")));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    let mut chars = side_part.chars();
    match (chars.next().and_then(Color::from_fen_char), chars.next()) {
        (Some(color), None) => Ok(color),
        _ => Err(ChessError::InvalidFen(format!("invalid side-to-move field: {side_part}"))),
    }
}

/// Castling field as written in FEN: `-` or a non-empty set of distinct `KQkq`.
pub fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        let right = CASTLING_LETTERS
            .iter()
            .find(|(_, letter)| *letter == ch)
            .map(|(right, _)| *right)
            .ok_or_else(|| ChessError::InvalidFen(format!("invalid castling character: {ch}")))?;
        if rights & right != 0 {
            return Err(ChessError::InvalidFen(format!("repeated castling character: {ch}")));
        }
        rights |= right;
    }

    if rights == 0 {
        return Err(ChessError::InvalidFen("empty castling field".to_owned()));
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .map_err(|_| ChessError::InvalidFen(format!("invalid en-passant square: {en_passant_part}")))?;
    if square.rank() != 2 && square.rank() != 5 {
        return Err(ChessError::InvalidFen(format!(
            "en-passant square must be on rank 3 or 6: {en_passant_part}"
        )));
    }

    Ok(Some(square))
}
