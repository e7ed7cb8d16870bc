//! Legal king targets, castling included.

use crate::game_state::chess_rules::CASTLING_LANES;
use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::move_generation::legal_move_checks::is_square_attacked_with_occupancy;
use crate::moves::mask_table::MaskTable;

pub fn king_targets(masks: &MaskTable, color: Color, from: Square, position: &PositionState) -> Bitboard {
    let enemy = color.opposite();
    // The king must not shield the squares it steps away to.
    let occupied = position.occupied() & !from.bit();

    let steps = squares(masks.king_mask(from) & !position.occupied_by(color))
        .filter(|&to| !is_square_attacked_with_occupancy(masks, to, enemy, position, occupied))
        .fold(0, |acc, to| acc | to.bit());

    steps | castling_targets(masks, color, from, position, occupied)
}

fn castling_targets(
    masks: &MaskTable,
    color: Color,
    from: Square,
    position: &PositionState,
    occupied_without_king: Bitboard,
) -> Bitboard {
    let rooks = position.pieces(PieceKind::Rook, color);
    let mut targets = 0;

    for lane in CASTLING_LANES.iter().filter(|lane| lane.color == color && lane.king_from == from) {
        if position.castling & lane.right == 0 || rooks & lane.rook_from.bit() == 0 {
            continue;
        }
        if !masks.may_pass_through(from, lane.rook_from, position.occupied()) {
            continue;
        }
        let path_attacked = lane.king_path.iter().any(|&square| {
            is_square_attacked_with_occupancy(masks, square, color.opposite(), position, occupied_without_king)
        });
        if !path_attacked {
            targets |= lane.king_to.bit();
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::king_targets;
    use crate::game_state::{chess_types::*, game_state::PositionState};
    use crate::moves::mask_table::MaskTable;
    use crate::utils::algebraic::algebraic_to_square;

    fn bits(names: &[&str]) -> Bitboard {
        names
            .iter()
            .map(|name| algebraic_to_square(name).expect("test square should parse").bit())
            .fold(0, |acc, bit| acc | bit)
    }

    #[test]
    fn both_castles_available_on_open_back_rank() {
        let masks = MaskTable::shared();
        let position = PositionState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let targets = king_targets(&masks, Color::White, Square::E1, &position);
        assert_eq!(targets, bits(&["d1", "f1", "d2", "e2", "f2", "g1", "c1"]));
    }

    #[test]
    fn castling_blocked_by_attacked_transit_square() {
        let masks = MaskTable::shared();
        // Black rook on f8 covers f1.
        let position = PositionState::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").expect("FEN should parse");
        let targets = king_targets(&masks, Color::White, Square::E1, &position);
        assert_eq!(targets & Square::G1.bit(), 0);
        assert_ne!(targets & Square::C1.bit(), 0);
    }

    #[test]
    fn castling_blocked_by_piece_on_path_or_missing_right() {
        let masks = MaskTable::shared();
        let position = PositionState::from_fen("4k3/8/8/8/8/8/8/RN2K2R w K - 0 1").expect("FEN should parse");
        let targets = king_targets(&masks, Color::White, Square::E1, &position);
        assert_ne!(targets & Square::G1.bit(), 0);
        assert_eq!(targets & Square::C1.bit(), 0);
    }

    #[test]
    fn no_castling_out_of_check() {
        let masks = MaskTable::shared();
        let position = PositionState::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").expect("FEN should parse");
        let targets = king_targets(&masks, Color::White, Square::E1, &position);
        assert_eq!(targets & (Square::G1.bit() | Square::C1.bit()), 0);
    }

    #[test]
    fn king_cannot_retreat_along_checking_ray() {
        let masks = MaskTable::shared();
        let position = PositionState::from_fen("4k3/8/8/8/r3K3/8/8/8 w - - 0 1").expect("FEN should parse");
        let from = algebraic_to_square("e4").expect("e4");
        let targets = king_targets(&masks, Color::White, from, &position);
        assert_eq!(targets & bits(&["f4", "d4"]), 0);
        assert_eq!(targets, bits(&["e3", "d3", "f3", "e5", "d5", "f5"]));
    }
}
