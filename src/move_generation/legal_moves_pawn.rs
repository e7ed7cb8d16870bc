//! Legal pawn targets: pushes, captures and en passant.

use crate::game_state::chess_rules::{en_passant_target_rank, pawn_start_rank};
use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::move_generation::legal_move_checks::{is_square_attacked, pin_line};
use crate::move_generation::legal_move_shared::SideConstraints;
use crate::moves::mask_table::MaskTable;

pub fn pawn_targets(
    masks: &MaskTable,
    color: Color,
    from: Square,
    position: &PositionState,
    constraints: &SideConstraints,
) -> Bitboard {
    let Some(check_mask) = constraints.check_mask else {
        return 0;
    };

    let forward = forward_step(color);
    let column = i32::from(from.column());
    let rank = i32::from(from.rank());
    let empty = !position.occupied();

    let mut targets = 0;
    if let Some(one) = Square::from_column_rank(column, rank + forward).filter(|sq| sq.bit() & empty != 0) {
        targets |= one.bit();
        if from.rank() == pawn_start_rank(color) {
            if let Some(two) = Square::from_column_rank(column, rank + 2 * forward) {
                targets |= two.bit() & empty;
            }
        }
    }
    targets |= masks.pawn_attacks(color, from) & position.occupied_by(color.opposite());

    if constraints.is_pinned(from) {
        match pin_line(masks, from, color, position) {
            Some((_, line)) => targets &= line,
            None => return 0,
        }
    }

    (targets & check_mask) | en_passant_target(masks, color, from, position)
}

/// The en-passant square if this pawn may capture onto it. Validated by
/// playing the capture out, which covers pins, checks by the captured pawn
/// and the rank-wise discovered check through both pawns.
pub fn en_passant_target(masks: &MaskTable, color: Color, from: Square, position: &PositionState) -> Bitboard {
    let Some(target) = position.en_passant else {
        return 0;
    };
    if target.rank() != en_passant_target_rank(color)
        || masks.pawn_attacks(color, from) & target.bit() == 0
        || position.occupied() & target.bit() != 0
    {
        return 0;
    }
    let Some(victim) = en_passant_victim(color, target) else {
        return 0;
    };
    let enemy_pawn = Piece::new(PieceKind::Pawn, color.opposite());
    if position.board(enemy_pawn) & victim.bit() == 0 {
        return 0;
    }

    let Some(king) = position.king_square(color) else {
        return target.bit();
    };
    let own_pawn = Piece::new(PieceKind::Pawn, color);
    let mut after = position.clone();
    after.boards[own_pawn.plane()] ^= from.bit() | target.bit();
    after.boards[enemy_pawn.plane()] &= !victim.bit();
    after.recalc_occupancy();

    if is_square_attacked(masks, king, color.opposite(), &after) {
        0
    } else {
        target.bit()
    }
}

/// Square of the pawn captured en passant: directly behind the target.
#[inline]
pub fn en_passant_victim(color: Color, target: Square) -> Option<Square> {
    Square::from_column_rank(i32::from(target.column()), i32::from(target.rank()) - forward_step(color))
}

#[inline]
fn forward_step(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}
