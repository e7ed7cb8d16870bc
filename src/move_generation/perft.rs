//! Leaf-node counting for move-generator validation.

use crate::errors::ChessResult;
use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::ordered_moves;
use crate::moves::chess_move::ChessMove;
use crate::moves::mask_table::MaskTable;
use crate::search::position_hash::HashSeeds;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub double_checks: u64,
    pub checkmates: u64,
}

pub fn perft(masks: &MaskTable, seeds: &HashSeeds, position: &PositionState, depth: u8) -> ChessResult<PerftCounts> {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return Ok(counts);
    }
    perft_recurse(masks, seeds, position, depth, &mut counts)?;
    Ok(counts)
}

fn perft_recurse(
    masks: &MaskTable,
    seeds: &HashSeeds,
    position: &PositionState,
    depth: u8,
    counts: &mut PerftCounts,
) -> ChessResult<()> {
    for mv in ordered_moves(masks, position) {
        let child = apply_move(masks, seeds, position, mv)?;
        if depth == 1 {
            tally_leaf(position, &mv, &child, counts);
        } else {
            perft_recurse(masks, seeds, &child, depth - 1, counts)?;
        }
    }
    Ok(())
}

fn tally_leaf(parent: &PositionState, mv: &ChessMove, child: &PositionState, counts: &mut PerftCounts) {
    counts.nodes += 1;
    if mv.is_capture() {
        counts.captures += 1;
    }
    if mv.piece == PieceKind::Pawn && parent.occupied() & mv.to.bit() == 0 && mv.from.column() != mv.to.column() {
        counts.en_passant += 1;
    }
    if mv.piece == PieceKind::King && mv.from.column().abs_diff(mv.to.column()) == 2 {
        counts.castles += 1;
    }
    if mv.promotion.is_some() {
        counts.promotions += 1;
    }
    if child.check {
        counts.checks += 1;
    }
    if child.double_check {
        counts.double_checks += 1;
    }
    if child.is_checkmate() {
        counts.checkmates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(fen: &str, depth: u8) -> PerftCounts {
        let masks = MaskTable::shared();
        let seeds = HashSeeds::shared();
        let position = PositionState::from_fen(fen).expect("FEN should parse");
        perft(&masks, &seeds, &position, depth).expect("perft should run")
    }

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn depth_zero_is_one_node() {
        assert_eq!(run("4k3/8/8/8/8/8/8/4K3 w - - 0 1", 0).nodes, 1);
    }

    #[test]
    fn start_position_counts() {
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(run(start, 1).nodes, 20);
        assert_eq!(run(start, 2).nodes, 400);
        let three = run(start, 3);
        assert_eq!(three.nodes, 8902);
        assert_eq!(three.captures, 34);
        assert_eq!(three.checks, 12);
        assert_eq!(three.checkmates, 0);
    }

    #[test]
    fn kiwipete_counts() {
        let one = run(KIWIPETE, 1);
        assert_eq!(one.nodes, 48);
        assert_eq!(one.captures, 8);
        assert_eq!(one.castles, 2);

        let two = run(KIWIPETE, 2);
        assert_eq!(two.nodes, 2039);
        assert_eq!(two.captures, 351);
        assert_eq!(two.en_passant, 1);
        assert_eq!(two.castles, 91);
        assert_eq!(two.checks, 3);
    }

    #[test]
    fn rook_endgame_counts() {
        let fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
        assert_eq!(run(fen, 1).nodes, 14);
        assert_eq!(run(fen, 2).nodes, 191);
        let three = run(fen, 3);
        assert_eq!(three.nodes, 2812);
        assert_eq!(three.captures, 209);
        assert_eq!(three.en_passant, 2);
        assert_eq!(three.checks, 267);
    }

    #[test]
    fn middlegame_counts() {
        let fen = "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";
        assert_eq!(run(fen, 1).nodes, 46);
        assert_eq!(run(fen, 2).nodes, 2079);
    }
}
