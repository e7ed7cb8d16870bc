//! Attack detection: attacked squares, checks and pins.

use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::moves::mask_table::{Direction, MaskTable};

/// Pieces giving check and the squares that resolve a single check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KingAttackers {
    /// Checking pieces plus, for sliders, the squares between them and the king.
    pub checking_rays: Bitboard,
    pub num_checks: u32,
}

impl KingAttackers {
    #[inline]
    pub fn check(&self) -> bool {
        self.num_checks > 0
    }

    #[inline]
    pub fn double_check(&self) -> bool {
        self.num_checks >= 2
    }
}

#[inline]
pub fn is_square_attacked(
    masks: &MaskTable,
    square: Square,
    by_color: Color,
    position: &PositionState,
) -> bool {
    is_square_attacked_with_occupancy(masks, square, by_color, position, position.occupied())
}

/// Attack test against a caller-supplied occupancy, so a moving king can be
/// taken off the board before its destination squares are tested.
pub fn is_square_attacked_with_occupancy(
    masks: &MaskTable,
    square: Square,
    by_color: Color,
    position: &PositionState,
    occupied: Bitboard,
) -> bool {
    if masks.pawn_attacks(by_color.opposite(), square) & position.pieces(PieceKind::Pawn, by_color) != 0 {
        return true;
    }
    if masks.knight_mask(square) & position.pieces(PieceKind::Knight, by_color) != 0 {
        return true;
    }
    if masks.king_mask(square) & position.pieces(PieceKind::King, by_color) != 0 {
        return true;
    }

    let queens = position.pieces(PieceKind::Queen, by_color);
    let straight = position.pieces(PieceKind::Rook, by_color) | queens;
    if masks.rook_mask(square) & straight != 0 && masks.rook_attacks(square, occupied) & straight != 0 {
        return true;
    }
    let diagonal = position.pieces(PieceKind::Bishop, by_color) | queens;
    masks.bishop_mask(square) & diagonal != 0 && masks.bishop_attacks(square, occupied) & diagonal != 0
}

pub fn king_attackers(
    masks: &MaskTable,
    king_square: Square,
    king_color: Color,
    position: &PositionState,
) -> KingAttackers {
    let enemy = king_color.opposite();
    let occupied = position.occupied();
    let mut attackers = KingAttackers::default();

    let pawns = masks.pawn_attacks(king_color, king_square) & position.pieces(PieceKind::Pawn, enemy);
    let knights = masks.knight_mask(king_square) & position.pieces(PieceKind::Knight, enemy);
    for square in squares(pawns | knights) {
        attackers.checking_rays |= square.bit();
        attackers.num_checks += 1;
    }

    let queens = position.pieces(PieceKind::Queen, enemy);
    let straight = masks.rook_attacks(king_square, occupied)
        & (position.pieces(PieceKind::Rook, enemy) | queens);
    let diagonal = masks.bishop_attacks(king_square, occupied)
        & (position.pieces(PieceKind::Bishop, enemy) | queens);
    for square in squares(straight | diagonal) {
        attackers.checking_rays |= masks.between(king_square, square).unwrap_or(0) | square.bit();
        attackers.num_checks += 1;
    }

    attackers
}

/// Pieces of `color` absolutely pinned to their own king.
pub fn pinned_pieces(masks: &MaskTable, color: Color, position: &PositionState) -> Bitboard {
    let Some(king) = position.king_square(color) else {
        return 0;
    };
    let enemy = color.opposite();
    let own = position.occupied_by(color);
    let occupied = position.occupied();
    let queens = position.pieces(PieceKind::Queen, enemy);
    let straight = position.pieces(PieceKind::Rook, enemy) | queens;
    let diagonal = position.pieces(PieceKind::Bishop, enemy) | queens;

    let mut pinned = 0;
    for direction in Direction::ALL {
        let sliders = if direction.is_straight() { straight } else { diagonal };
        if masks.ray(king, direction) & sliders == 0 {
            continue;
        }
        let Some(blocker) = Square::lsb(masks.ray_attacks(king, direction, occupied) & own) else {
            continue;
        };
        // X-ray through the own blocker to the next piece on the line.
        let Some(pinner) = Square::lsb(masks.ray_attacks(blocker, direction, occupied) & occupied) else {
            continue;
        };
        if pinner.bit() & sliders != 0 {
            pinned |= masks.between(king, pinner).unwrap_or(0) & own;
        }
    }

    pinned
}

/// For a pinned piece on `square`, the pin direction (king toward piece) and
/// the squares it may still occupy: the line up to and including the pinner,
/// its own square excluded.
pub fn pin_line(
    masks: &MaskTable,
    square: Square,
    color: Color,
    position: &PositionState,
) -> Option<(Direction, Bitboard)> {
    let king = position.king_square(color)?;
    let direction = masks.direction(king, square)?;
    let occupied = position.occupied();
    let pinner = Square::lsb(masks.ray_attacks(square, direction, occupied) & occupied)?;
    let line = masks.between(king, pinner)? | pinner.bit();
    Some((direction, line & !square.bit()))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::move_generation::legal_move_apply::apply_move;
    use crate::move_generation::legal_move_generator::ordered_moves;
    use crate::search::position_hash::HashSeeds;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("test square should parse")
    }

    fn step_targets(from: Square, steps: &[(i32, i32)], slide: bool, occupied: Bitboard) -> Bitboard {
        let mut targets = 0;
        for &(dc, dr) in steps {
            let mut c = i32::from(from.column()) + dc;
            let mut r = i32::from(from.rank()) + dr;
            while (0..8).contains(&c) && (0..8).contains(&r) {
                let bit = 1u64 << (r * 8 + c);
                targets |= bit;
                if !slide || occupied & bit != 0 {
                    break;
                }
                c += dc;
                r += dr;
            }
        }
        targets
    }

    // Piece-by-piece re-derivation that does not touch the mask table.
    fn brute_force_attacked(position: &PositionState, target: Square, by: Color) -> bool {
        const STRAIGHT: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
        const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
        const KNIGHT: [(i32, i32); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
        let occupied = position.occupied();
        let forward = if by == Color::White { 1 } else { -1 };

        for plane in 0..12 {
            let Some(piece) = Piece::from_plane(plane) else { continue };
            if piece.color != by {
                continue;
            }
            for from in squares(position.boards[plane]) {
                let targets = match piece.kind {
                    PieceKind::Pawn => step_targets(from, &[(1, forward), (-1, forward)], false, occupied),
                    PieceKind::Knight => step_targets(from, &KNIGHT, false, occupied),
                    PieceKind::King => {
                        step_targets(from, &STRAIGHT, false, occupied) | step_targets(from, &DIAGONAL, false, occupied)
                    }
                    PieceKind::Rook => step_targets(from, &STRAIGHT, true, occupied),
                    PieceKind::Bishop => step_targets(from, &DIAGONAL, true, occupied),
                    PieceKind::Queen => {
                        step_targets(from, &STRAIGHT, true, occupied) | step_targets(from, &DIAGONAL, true, occupied)
                    }
                };
                if targets & target.bit() != 0 {
                    return true;
                }
            }
        }
        false
    }

    #[test]
    fn attacked_squares_match_brute_force_oracle() {
        let masks = MaskTable::shared();
        let seeds = HashSeeds::shared();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _game in 0..8 {
            let mut position = PositionState::new_game();
            for _ply in 0..60 {
                for index in 0..64 {
                    let square = Square::from_index(index);
                    for color in [Color::White, Color::Black] {
                        assert_eq!(
                            is_square_attacked(&masks, square, color, &position),
                            brute_force_attacked(&position, square, color),
                            "square {square} by {color:?} in {}",
                            position.to_fen()
                        );
                    }
                }

                let moves = ordered_moves(&masks, &position);
                if moves.is_empty() {
                    break;
                }
                let mv = moves[rng.random_range(0..moves.len())];
                position = apply_move(&masks, &seeds, &position, mv).expect("generated move should apply");
            }
        }
    }

    #[test]
    fn double_check_collects_both_rays() {
        let masks = MaskTable::shared();
        let position = PositionState::from_fen("4r1k1/8/8/8/8/3n4/8/4K3 w - - 0 1").expect("FEN should parse");
        let attackers = king_attackers(&masks, sq("e1"), Color::White, &position);

        assert_eq!(attackers.num_checks, 2);
        assert!(attackers.double_check());
        let expected = ["e2", "e3", "e4", "e5", "e6", "e7", "e8", "d3"]
            .iter()
            .fold(0, |acc, name| acc | sq(name).bit());
        assert_eq!(attackers.checking_rays, expected);
        assert!(position.check && position.double_check);
    }

    #[test]
    fn pawn_check_marks_only_the_pawn() {
        let masks = MaskTable::shared();
        let position = PositionState::from_fen("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1").expect("FEN should parse");
        let attackers = king_attackers(&masks, sq("e1"), Color::White, &position);
        assert_eq!(attackers.num_checks, 1);
        assert_eq!(attackers.checking_rays, sq("d2").bit());
    }

    #[test]
    fn pins_on_files_and_diagonals() {
        let masks = MaskTable::shared();
        let position =
            PositionState::from_fen("4k3/4r3/8/b7/8/8/3NR3/4K3 w - - 0 1").expect("FEN should parse");
        let pinned = pinned_pieces(&masks, Color::White, &position);
        assert_eq!(pinned, sq("e2").bit() | sq("d2").bit());
        assert_eq!(position.pinned, pinned);

        let (direction, line) = pin_line(&masks, sq("e2"), Color::White, &position).expect("e2 is pinned");
        assert!(direction.is_straight());
        let expected = ["e3", "e4", "e5", "e6", "e7"].iter().fold(0, |acc, name| acc | sq(name).bit());
        assert_eq!(line, expected);
    }

    #[test]
    fn two_blockers_break_the_pin() {
        let masks = MaskTable::shared();
        let position =
            PositionState::from_fen("4k3/4r3/8/8/4N3/8/4R3/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(pinned_pieces(&masks, Color::White, &position), 0);
    }
}
