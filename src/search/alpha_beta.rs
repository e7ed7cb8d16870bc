//! Fixed-depth minimax with alpha-beta pruning.
//!
//! White nodes maximize and Black nodes minimize a White-positive score.
//! Every interior node probes the transposition table before expanding and
//! stores its resolved value afterwards, tagged with the bound the window
//! allowed. The table's best move is searched first.

use std::time::{Duration, Instant};

use log::debug;

use crate::errors::ChessResult;
use crate::game_state::{chess_types::Color, game_state::PositionState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::ordered_moves;
use crate::moves::chess_move::ChessMove;
use crate::moves::mask_table::MaskTable;
use crate::search::board_scoring::{evaluate_with, BoardScorer, MATE_SCORE};
use crate::search::position_hash::HashSeeds;
use crate::search::transposition_table::{
    score_from_table, score_to_table, Bound, TableEntry, TranspositionTable,
};

/// Window sentinel; never stored and never returned from a node with moves.
pub const INFINITY: i32 = MATE_SCORE + 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The side to move at the root is checkmated.
    Checkmate,
    /// The side to move at the root has no legal move and is not in check.
    Stalemate,
    Move { best_move: ChessMove, score: i32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u64,
    pub cache_hits: u64,
    pub cache_stores: u64,
    pub elapsed: Duration,
}

pub struct AlphaBetaSearch<'a> {
    masks: &'a MaskTable,
    seeds: &'a HashSeeds,
    scorer: &'a dyn BoardScorer,
    table: &'a mut TranspositionTable,
    stats: SearchStats,
}

impl<'a> AlphaBetaSearch<'a> {
    pub fn new(
        masks: &'a MaskTable,
        seeds: &'a HashSeeds,
        scorer: &'a dyn BoardScorer,
        table: &'a mut TranspositionTable,
    ) -> Self {
        Self {
            masks,
            seeds,
            scorer,
            table,
            stats: SearchStats::default(),
        }
    }

    /// Search `root` to `depth` plies (at least one). The table is cleared
    /// first, so results never depend on an earlier search.
    pub fn run(&mut self, root: &PositionState, depth: u8) -> ChessResult<(SearchOutcome, SearchStats)> {
        let started = Instant::now();
        let depth = depth.max(1);
        self.table.clear();
        self.stats = SearchStats {
            depth,
            ..SearchStats::default()
        };

        if root.mate {
            let outcome = if root.check {
                SearchOutcome::Checkmate
            } else {
                SearchOutcome::Stalemate
            };
            self.stats.elapsed = started.elapsed();
            return Ok((outcome, self.stats));
        }

        let maximizing = root.turn == Color::White;
        let mut alpha = -INFINITY;
        let mut beta = INFINITY;
        let mut best: Option<(ChessMove, i32)> = None;

        for mv in ordered_moves(self.masks, root) {
            let child = apply_move(self.masks, self.seeds, root, mv)?;
            let score = self.alpha_beta(&child, depth - 1, alpha, beta, 1)?;
            let improves = match best {
                None => true,
                Some((_, best_score)) if maximizing => score > best_score,
                Some((_, best_score)) => score < best_score,
            };
            if improves {
                best = Some((mv, score));
                if maximizing {
                    alpha = alpha.max(score);
                } else {
                    beta = beta.min(score);
                }
            }
        }

        self.stats.elapsed = started.elapsed();
        // `mate` is false, so at least one move was searched.
        let outcome = match best {
            Some((best_move, score)) => SearchOutcome::Move { best_move, score },
            None => SearchOutcome::Stalemate,
        };

        debug!(
            "search depth {} nodes {} cache hits {} stores {} in {:?}: {:?}",
            depth, self.stats.nodes, self.stats.cache_hits, self.stats.cache_stores, self.stats.elapsed, outcome
        );

        Ok((outcome, self.stats))
    }

    fn alpha_beta(
        &mut self,
        position: &PositionState,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        ply: u32,
    ) -> ChessResult<i32> {
        self.stats.nodes += 1;

        if depth == 0 || position.mate || position.is_draw() {
            return Ok(evaluate_with(self.scorer, self.masks, position, ply));
        }

        let key = self.seeds.hash(position);
        let mut hash_move = None;
        if let Some(entry) = self.table.probe(key) {
            hash_move = entry.best_move;
            if entry.depth >= depth {
                let rebased = TableEntry {
                    score: score_from_table(entry.score, ply),
                    ..entry
                };
                if let Some(score) = rebased.usable_score(alpha, beta) {
                    self.stats.cache_hits += 1;
                    return Ok(score);
                }
            }
        }

        let (window_alpha, window_beta) = (alpha, beta);
        let mut moves = ordered_moves(self.masks, position);
        if let Some(hash_move) = hash_move {
            if let Some(index) = moves.iter().position(|mv| mv.same_route(&hash_move)) {
                let mv = moves.remove(index);
                moves.insert(0, mv);
            }
        }

        let maximizing = position.turn == Color::White;
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for mv in moves {
            let child = apply_move(self.masks, self.seeds, position, mv)?;
            let score = self.alpha_beta(&child, depth - 1, alpha, beta, ply + 1)?;
            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(best_score);
            }
            if alpha >= beta {
                break;
            }
        }

        if best_move.is_some() {
            let bound = if best_score <= window_alpha {
                Bound::Upper
            } else if best_score >= window_beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.table.store(TableEntry {
                key,
                depth,
                score: score_to_table(best_score, ply),
                bound,
                best_move,
            });
            self.stats.cache_stores += 1;
        }

        Ok(best_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::board_scoring::{evaluate, StandardScorer};

    fn search(fen: &str, depth: u8) -> SearchOutcome {
        let masks = MaskTable::shared();
        let seeds = HashSeeds::shared();
        let mut table = TranspositionTable::new_with_mb(1);
        let position = PositionState::from_fen(fen).expect("FEN should parse");
        let mut search = AlphaBetaSearch::new(&masks, &seeds, &StandardScorer, &mut table);
        search.run(&position, depth).expect("search should succeed").0
    }

    // Exhaustive minimax without pruning or caching.
    fn plain_minimax(masks: &MaskTable, seeds: &HashSeeds, position: &PositionState, depth: u8, ply: u32) -> i32 {
        if depth == 0 || position.mate || position.is_draw() {
            return evaluate(masks, position, ply);
        }
        let scores = ordered_moves(masks, position).into_iter().map(|mv| {
            let child = apply_move(masks, seeds, position, mv).expect("legal move should apply");
            plain_minimax(masks, seeds, &child, depth - 1, ply + 1)
        });
        if position.turn == Color::White {
            scores.max().expect("non-terminal position has moves")
        } else {
            scores.min().expect("non-terminal position has moves")
        }
    }

    #[test]
    fn finds_mate_in_one() {
        match search("6k1/8/6K1/8/8/8/8/R7 w - - 0 1", 3) {
            SearchOutcome::Move { best_move, score } => {
                assert_eq!(best_move.to_string(), "a1a8");
                assert_eq!(score, MATE_SCORE - 1);
            }
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn finds_mate_in_two() {
        match search("k7/8/2K5/8/8/8/8/7R w - - 0 1", 3) {
            SearchOutcome::Move { score, .. } => assert_eq!(score, MATE_SCORE - 3),
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn black_minimizes_and_sees_forced_loss() {
        match search("k7/8/1K6/8/8/8/8/7R b - - 0 1", 2) {
            SearchOutcome::Move { best_move, score } => {
                assert_eq!(best_move.to_string(), "a8b8");
                assert_eq!(score, MATE_SCORE - 2);
            }
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn terminal_roots_report_their_kind() {
        assert_eq!(search("6k1/6Q1/6K1/8/8/8/8/8 b - - 0 1", 3), SearchOutcome::Checkmate);
        assert_eq!(search("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3), SearchOutcome::Stalemate);
    }

    #[test]
    fn black_wins_material_when_offered() {
        // Hanging white queen on d3.
        match search("4k3/8/8/4n3/8/3Q4/8/4K3 b - - 0 1", 2) {
            SearchOutcome::Move { best_move, .. } => assert_eq!(best_move.to_string(), "e5d3"),
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn pruned_cached_search_matches_plain_minimax() {
        let masks = MaskTable::shared();
        let seeds = HashSeeds::shared();
        for (fen, depth) in [
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3),
            ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 2),
            ("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2", 3),
        ] {
            let position = PositionState::from_fen(fen).expect("FEN should parse");
            let expected = plain_minimax(&masks, &seeds, &position, depth, 0);
            let mut table = TranspositionTable::new_with_mb(1);
            let mut search = AlphaBetaSearch::new(&masks, &seeds, &StandardScorer, &mut table);
            let (outcome, stats) = search.run(&position, depth).expect("search should succeed");
            match outcome {
                SearchOutcome::Move { score, .. } => assert_eq!(score, expected, "{fen}"),
                other => panic!("expected a move, got {other:?}"),
            }
            assert!(stats.nodes > 0);
        }
    }
}
