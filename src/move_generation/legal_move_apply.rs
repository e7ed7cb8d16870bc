//! Pure move application.
//!
//! `apply_move` never touches its input: it clones the parent, edits the
//! bitboards, rights and clocks, then recomputes every derived flag so the
//! child is immediately usable by move generation and search.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{
    promotion_rank, rights_lost_at, CASTLING_LANES, FIFTY_MOVE_HALFMOVES, REPETITION_DRAW_COUNT,
};
use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::move_generation::legal_move_checks::{king_attackers, pinned_pieces};
use crate::move_generation::legal_move_generator::has_any_legal_move;
use crate::move_generation::legal_moves_pawn::en_passant_victim;
use crate::moves::chess_move::ChessMove;
use crate::moves::mask_table::MaskTable;
use crate::search::position_hash::HashSeeds;

pub fn apply_move(
    masks: &MaskTable,
    seeds: &HashSeeds,
    position: &PositionState,
    mv: ChessMove,
) -> ChessResult<PositionState> {
    let mover = Piece::new(mv.piece, mv.color);
    let from_mask = mv.from.bit();
    let to_mask = mv.to.bit();

    if position.board(mover) & from_mask == 0 {
        return Err(match position.piece_at(mv.from) {
            None => ChessError::NoPieceOnSquare(mv.from.to_string()),
            Some(found) => ChessError::PieceMismatch {
                square: mv.from.to_string(),
                expected: format!("{mover:?}, found {found:?}"),
            },
        });
    }

    let mut next = position.clone();
    next.boards[mover.plane()] &= !from_mask;

    // Captures.
    let is_pawn = mv.piece == PieceKind::Pawn;
    let mut captured = position.occupied() & to_mask != 0;
    if captured {
        for board in next.boards.iter_mut() {
            *board &= !to_mask;
        }
    } else if is_pawn && position.en_passant == Some(mv.to) && mv.from.column() != mv.to.column() {
        if let Some(victim) = en_passant_victim(mv.color, mv.to) {
            next.boards[Piece::new(PieceKind::Pawn, mv.color.opposite()).plane()] &= !victim.bit();
            captured = true;
        }
    }

    // Placement, with auto-queen on the last rank.
    let placed = if is_pawn && mv.to.rank() == promotion_rank(mv.color) {
        Piece::new(PieceKind::Queen, mv.color)
    } else {
        mover
    };
    next.boards[placed.plane()] |= to_mask;

    // Castling rook.
    if mv.piece == PieceKind::King {
        if let Some(lane) = CASTLING_LANES
            .iter()
            .find(|lane| lane.color == mv.color && lane.king_from == mv.from && lane.king_to == mv.to)
        {
            let rook = Piece::new(PieceKind::Rook, mv.color).plane();
            next.boards[rook] &= !lane.rook_from.bit();
            next.boards[rook] |= lane.rook_to.bit();
        }
    }

    next.castling &= !(rights_lost_at(mv.from) | rights_lost_at(mv.to));

    next.en_passant = None;
    if is_pawn && mv.from.rank().abs_diff(mv.to.rank()) == 2 {
        next.en_passant = Square::new(((mv.from.index() + mv.to.index()) / 2) as u32).ok();
    }

    // Clocks.
    let irreversible = is_pawn || captured;
    next.halfmove_clock = if irreversible {
        0
    } else {
        next.halfmove_clock.saturating_add(1)
    };
    if mv.color == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }
    next.turn = mv.color.opposite();
    next.recalc_occupancy();

    if irreversible {
        next.repetition_keys.clear();
    } else {
        next.repetition_keys.push(seeds.position_key(position));
    }

    refresh_derived_state(masks, &mut next);

    let key = seeds.position_key(&next);
    let seen = next.repetition_keys.iter().filter(|&&earlier| earlier == key).count();
    next.repeated = seen + 1 >= REPETITION_DRAW_COUNT;

    Ok(next)
}

/// Recompute check, pin, mate and fifty-move draw flags for the side to move.
/// Repetition needs history and is layered on by `apply_move`.
pub fn refresh_derived_state(masks: &MaskTable, position: &mut PositionState) {
    let color = position.turn;
    match position.king_square(color) {
        Some(king) => {
            let attackers = king_attackers(masks, king, color, position);
            position.check = attackers.check();
            position.double_check = attackers.double_check();
            position.checking_rays = attackers.checking_rays;
            position.pinned = pinned_pieces(masks, color, position);
        }
        None => {
            position.check = false;
            position.double_check = false;
            position.checking_rays = 0;
            position.pinned = 0;
        }
    }
    position.mate = !has_any_legal_move(masks, color, position);
    position.draw = position.halfmove_clock >= FIFTY_MOVE_HALFMOVES;
}
