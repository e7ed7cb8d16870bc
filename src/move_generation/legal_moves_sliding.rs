//! Legal rook, bishop and queen targets.
//!
//! A pinned slider keeps only the squares of its pin line, and only when the
//! line runs along one of its own movement axes.

use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::move_generation::legal_move_checks::pin_line;
use crate::move_generation::legal_move_shared::SideConstraints;
use crate::moves::mask_table::MaskTable;

pub fn sliding_targets(
    masks: &MaskTable,
    piece: Piece,
    from: Square,
    position: &PositionState,
    constraints: &SideConstraints,
) -> Bitboard {
    let Some(check_mask) = constraints.check_mask else {
        return 0;
    };

    let occupied = position.occupied();
    let attacks = match piece.kind {
        PieceKind::Rook => masks.rook_attacks(from, occupied),
        PieceKind::Bishop => masks.bishop_attacks(from, occupied),
        PieceKind::Queen => masks.queen_attacks(from, occupied),
        PieceKind::Pawn | PieceKind::Knight | PieceKind::King => 0,
    };
    let mut targets = attacks & !position.occupied_by(piece.color) & check_mask;

    if constraints.is_pinned(from) {
        let Some((direction, line)) = pin_line(masks, from, piece.color, position) else {
            return 0;
        };
        let axis_matches = if direction.is_straight() {
            piece.kind.slides_straight()
        } else {
            piece.kind.slides_diagonally()
        };
        if !axis_matches {
            return 0;
        }
        targets &= line;
    }

    targets
}
