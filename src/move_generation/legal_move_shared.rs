use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::move_generation::legal_move_checks::{king_attackers, pinned_pieces};
use crate::moves::mask_table::MaskTable;

/// Check and pin restrictions on one side's non-king pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideConstraints {
    /// Squares a non-king move must land on; `None` under double check.
    pub check_mask: Option<Bitboard>,
    pub pinned: Bitboard,
}

impl SideConstraints {
    #[inline]
    pub fn is_pinned(&self, square: Square) -> bool {
        self.pinned & square.bit() != 0
    }
}

/// Uses the cached derived flags for the side to move and recomputes them for
/// the other side.
pub fn side_constraints(masks: &MaskTable, color: Color, position: &PositionState) -> SideConstraints {
    let (check, double_check, checking_rays, pinned) = if color == position.turn {
        (position.check, position.double_check, position.checking_rays, position.pinned)
    } else {
        match position.king_square(color) {
            Some(king) => {
                let attackers = king_attackers(masks, king, color, position);
                (
                    attackers.check(),
                    attackers.double_check(),
                    attackers.checking_rays,
                    pinned_pieces(masks, color, position),
                )
            }
            None => (false, false, 0, 0),
        }
    };

    let check_mask = if double_check {
        None
    } else if check {
        Some(checking_rays)
    } else {
        Some(!0)
    };

    SideConstraints { check_mask, pinned }
}

#[inline]
pub fn enemy_piece_on(position: &PositionState, color: Color, square: Square) -> Option<PieceKind> {
    position
        .piece_at(square)
        .filter(|piece| piece.color != color)
        .map(|piece| piece.kind)
}
