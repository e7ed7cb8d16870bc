use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::move_generation::legal_move_shared::SideConstraints;
use crate::moves::mask_table::MaskTable;

/// A pinned knight can never stay on its pin line, so it has no targets.
pub fn knight_targets(
    masks: &MaskTable,
    color: Color,
    from: Square,
    position: &PositionState,
    constraints: &SideConstraints,
) -> Bitboard {
    match constraints.check_mask {
        Some(check_mask) if !constraints.is_pinned(from) => {
            masks.knight_mask(from) & !position.occupied_by(color) & check_mask
        }
        _ => 0,
    }
}
