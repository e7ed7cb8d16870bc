//! Static evaluation.
//!
//! Scores are White-positive centipawns. Terminal positions are resolved by
//! `evaluate_with` before any heuristic runs; the heuristics themselves sit
//! behind `BoardScorer` so search can be driven by a different scorer without
//! changing search code.

use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::moves::mask_table::MaskTable;

pub const MATE_SCORE: i32 = 30_000;

/// Scores at or beyond this magnitude encode a forced mate.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1_000;

/// Penalty applied against the side to move when it is in check.
pub const CHECK_BONUS: i32 = 50;

/// Material value in centipawns. Kings carry none.
#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

pub trait BoardScorer: Send + Sync {
    /// Heuristic score of a non-terminal position, White-positive.
    fn score(&self, masks: &MaskTable, position: &PositionState) -> i32;
}

/// Material balance only.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    pub fn material_white_minus_black(position: &PositionState) -> i32 {
        ALL_PIECE_KINDS
            .iter()
            .map(|&kind| {
                let white = position.pieces(kind, Color::White).count_ones() as i32;
                let black = position.pieces(kind, Color::Black).count_ones() as i32;
                (white - black) * piece_value(kind)
            })
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, _masks: &MaskTable, position: &PositionState) -> i32 {
        Self::material_white_minus_black(position)
    }
}

/// Material, piece-square tables, weighted mobility and a check penalty.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScorer;

impl StandardScorer {
    fn positional_term(position: &PositionState) -> i32 {
        let mut score = 0;
        for color in [Color::White, Color::Black] {
            let sign = if color == Color::White { 1 } else { -1 };
            for kind in ALL_PIECE_KINDS {
                for square in squares(position.pieces(kind, color)) {
                    score += sign * piece_square_bonus(kind, color, square);
                }
            }
        }
        score
    }

    fn mobility_term(masks: &MaskTable, position: &PositionState) -> i32 {
        mobility_for_color(masks, position, Color::White) - mobility_for_color(masks, position, Color::Black)
    }
}

impl BoardScorer for StandardScorer {
    fn score(&self, masks: &MaskTable, position: &PositionState) -> i32 {
        let mut score = MaterialScorer::material_white_minus_black(position)
            + Self::positional_term(position)
            + Self::mobility_term(masks, position);
        if position.check {
            score += match position.turn {
                Color::White => -CHECK_BONUS,
                Color::Black => CHECK_BONUS,
            };
        }
        score
    }
}

/// Score `position`, `plies_from_root` plies below the search root. Mates
/// found sooner score further from zero; stalemates and draws score zero.
pub fn evaluate_with(
    scorer: &dyn BoardScorer,
    masks: &MaskTable,
    position: &PositionState,
    plies_from_root: u32,
) -> i32 {
    if position.is_checkmate() {
        let magnitude = MATE_SCORE - plies_from_root as i32;
        return match position.turn {
            Color::White => -magnitude,
            Color::Black => magnitude,
        };
    }
    if position.mate || position.is_draw() {
        return 0;
    }
    scorer.score(masks, position)
}

#[inline]
pub fn evaluate(masks: &MaskTable, position: &PositionState, plies_from_root: u32) -> i32 {
    evaluate_with(&StandardScorer, masks, position, plies_from_root)
}

const KNIGHT_MOBILITY: i32 = 4;
const BISHOP_MOBILITY: i32 = 5;
const ROOK_MOBILITY: i32 = 2;
const QUEEN_MOBILITY: i32 = 1;

fn mobility_for_color(masks: &MaskTable, position: &PositionState, color: Color) -> i32 {
    let occupied = position.occupied();
    let open = !position.occupied_by(color);
    let mut mobility = 0;

    for square in squares(position.pieces(PieceKind::Knight, color)) {
        mobility += KNIGHT_MOBILITY * (masks.knight_mask(square) & open).count_ones() as i32;
    }
    for square in squares(position.pieces(PieceKind::Bishop, color)) {
        mobility += BISHOP_MOBILITY * (masks.bishop_attacks(square, occupied) & open).count_ones() as i32;
    }
    for square in squares(position.pieces(PieceKind::Rook, color)) {
        mobility += ROOK_MOBILITY * (masks.rook_attacks(square, occupied) & open).count_ones() as i32;
    }
    for square in squares(position.pieces(PieceKind::Queen, color)) {
        mobility += QUEEN_MOBILITY * (masks.queen_attacks(square, occupied) & open).count_ones() as i32;
    }

    mobility
}

// Tables read from White's side: first row is rank 8, columns run a to h.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

fn piece_square_bonus(kind: PieceKind, color: Color, square: Square) -> i32 {
    let file = usize::from(square.file());
    let rank = usize::from(square.rank());
    // Black reads the same tables flipped top to bottom.
    let row = match color {
        Color::White => 7 - rank,
        Color::Black => rank,
    };
    let table = match kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => &KING_TABLE,
    };
    table[row * 8 + file]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_fen(fen: &str) -> i32 {
        let masks = MaskTable::shared();
        let position = PositionState::from_fen(fen).expect("FEN should parse");
        evaluate(&masks, &position, 0)
    }

    #[test]
    fn start_position_is_balanced() {
        let masks = MaskTable::shared();
        assert_eq!(evaluate(&masks, &PositionState::new_game(), 0), 0);
    }

    #[test]
    fn extra_queen_favours_its_owner() {
        assert!(eval_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1") > 800);
        assert!(eval_fen("3qk3/8/8/8/8/8/8/4K3 w - - 0 1") < -800);
    }

    #[test]
    fn mirrored_positions_negate() {
        let white_knight = eval_fen("4k3/8/8/8/8/2N5/8/4K3 w - - 0 1");
        let black_knight = eval_fen("4k3/8/2n5/8/8/8/8/4K3 b - - 0 1");
        assert_eq!(white_knight, -black_knight);
        assert!(white_knight > 0);
    }

    #[test]
    fn mate_scores_shrink_with_distance() {
        let masks = MaskTable::shared();
        let mated = PositionState::from_fen("6k1/6Q1/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        assert_eq!(evaluate(&masks, &mated, 3), MATE_SCORE - 3);
        assert!(evaluate(&masks, &mated, 1) > evaluate(&masks, &mated, 3));

        let mated_white = PositionState::from_fen("8/8/8/8/8/6k1/6q1/6K1 w - - 0 1").expect("FEN should parse");
        assert_eq!(evaluate(&masks, &mated_white, 2), -(MATE_SCORE - 2));
    }

    #[test]
    fn stalemate_and_draw_score_zero() {
        assert_eq!(eval_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"), 0);
        assert_eq!(eval_fen("4k3/8/8/8/8/8/8/3QK3 w - - 100 80"), 0);
    }

    #[test]
    fn check_counts_against_side_to_move() {
        let masks = MaskTable::shared();
        let position = PositionState::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").expect("FEN should parse");
        assert!(position.check);
        let plain = StandardScorer.score(&masks, &position) + CHECK_BONUS;
        let mut quiet = position.clone();
        quiet.check = false;
        assert_eq!(StandardScorer.score(&masks, &quiet), plain);
    }

    #[test]
    fn material_scorer_ignores_placement() {
        let masks = MaskTable::shared();
        let position = PositionState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(evaluate_with(&MaterialScorer, &masks, &position, 0), 500);
    }
}
