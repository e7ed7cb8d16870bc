//! Engine facade owning the canonical game.
//!
//! An `Engine` bundles the shared mask and hash tables, the transposition
//! cache, the scorer, the configuration and the one canonical position. Every
//! mutation of the canonical position goes through `load_fen`,
//! `set_position` or `apply_to_canonical`; separate games use separate
//! engines.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::errors::{ChessError, ChessResult};
use crate::game_state::position_record::PositionRecord;
use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::{all_legal_moves, legal_targets, ordered_moves};
use crate::moves::chess_move::{ChessMove, MoveRequest};
use crate::moves::mask_table::MaskTable;
use crate::search::alpha_beta::{AlphaBetaSearch, SearchOutcome, SearchStats};
use crate::search::board_scoring::{BoardScorer, StandardScorer};
use crate::search::position_hash::{HashSeeds, DEFAULT_HASH_SEED};
use crate::search::transposition_table::TranspositionTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Plies searched by `search_current` and `play_best_move`.
    pub default_depth: u8,
    pub cache_size_mb: usize,
    pub hash_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_depth: 4,
            cache_size_mb: 16,
            hash_seed: DEFAULT_HASH_SEED,
        }
    }
}

pub struct Engine {
    config: EngineConfig,
    masks: Arc<MaskTable>,
    seeds: Arc<HashSeeds>,
    scorer: Box<dyn BoardScorer>,
    table: TranspositionTable,
    current: PositionState,
    last_stats: Option<SearchStats>,
}

impl Engine {
    /// Engine on the starting position. The default seed reuses the
    /// process-wide hash table; any other seed builds a private one.
    pub fn new(config: EngineConfig) -> Self {
        let seeds = if config.hash_seed == DEFAULT_HASH_SEED {
            HashSeeds::shared()
        } else {
            Arc::new(HashSeeds::generate(config.hash_seed))
        };
        Self::with_tables(config, MaskTable::shared(), seeds)
    }

    pub fn with_tables(config: EngineConfig, masks: Arc<MaskTable>, seeds: Arc<HashSeeds>) -> Self {
        Self {
            config,
            masks,
            seeds,
            scorer: Box::new(StandardScorer),
            table: TranspositionTable::new_with_mb(config.cache_size_mb),
            current: PositionState::new_game(),
            last_stats: None,
        }
    }

    pub fn with_scorer(mut self, scorer: Box<dyn BoardScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    #[inline]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    #[inline]
    pub fn current(&self) -> &PositionState {
        &self.current
    }

    #[inline]
    pub fn masks(&self) -> &Arc<MaskTable> {
        &self.masks
    }

    #[inline]
    pub fn seeds(&self) -> &Arc<HashSeeds> {
        &self.seeds
    }

    #[inline]
    pub fn last_stats(&self) -> Option<SearchStats> {
        self.last_stats
    }

    pub fn new_game(&mut self) {
        self.current = PositionState::new_game();
        info!("new game");
    }

    /// Replace the canonical position. On error the previous position stays.
    pub fn load_fen(&mut self, fen: &str) -> ChessResult<()> {
        let position = PositionState::from_fen_with(fen, &self.masks)?;
        info!("loaded position {fen}");
        self.current = position;
        Ok(())
    }

    pub fn set_position(&mut self, position: PositionState) {
        info!("position set to {}", position.to_fen());
        self.current = position;
    }

    /// Legal targets of whatever stands on `square` in the canonical position.
    pub fn legal_targets(&self, square: Square) -> ChessResult<Bitboard> {
        let piece = self
            .current
            .piece_at(square)
            .ok_or_else(|| ChessError::NoPieceOnSquare(square.to_string()))?;
        Ok(legal_targets(&self.masks, piece, square, &self.current))
    }

    pub fn all_legal_moves(&self, color: Color) -> BTreeMap<Square, Bitboard> {
        all_legal_moves(&self.masks, color, &self.current)
    }

    pub fn ordered_moves(&self) -> Vec<ChessMove> {
        ordered_moves(&self.masks, &self.current)
    }

    /// Pure transition on an arbitrary position; the canonical game is untouched.
    pub fn apply(&self, mv: ChessMove, position: &PositionState) -> ChessResult<PositionState> {
        apply_move(&self.masks, &self.seeds, position, mv)
    }

    /// Play `mv` on the canonical position. Returns false, leaving the
    /// position unchanged, when the mover is not the side to move or the
    /// move is not legal.
    pub fn apply_to_canonical(&mut self, mv: ChessMove) -> bool {
        if mv.color != self.current.turn {
            debug!("rejected {mv}: {:?} is not to move", mv.color);
            return false;
        }
        let Some(legal) = self.ordered_moves().into_iter().find(|candidate| candidate.same_route(&mv)) else {
            debug!("rejected {mv}: not legal in {}", self.current.to_fen());
            return false;
        };
        match apply_move(&self.masks, &self.seeds, &self.current, legal) {
            Ok(next) => {
                info!("played {legal}");
                self.current = next;
                true
            }
            Err(err) => {
                warn!("failed to apply {legal}: {err}");
                false
            }
        }
    }

    /// Parse a request and annotate it from the matching legal move when one
    /// exists.
    pub fn resolve_request(&self, request: &MoveRequest) -> ChessResult<ChessMove> {
        let parsed = request.to_move()?;
        Ok(self
            .ordered_moves()
            .into_iter()
            .find(|candidate| candidate.same_route(&parsed))
            .unwrap_or(parsed))
    }

    pub fn submit(&mut self, request: &MoveRequest) -> ChessResult<bool> {
        let mv = self.resolve_request(request)?;
        Ok(self.apply_to_canonical(mv))
    }

    /// Search the canonical position for `color`, which must be the side to
    /// move.
    pub fn search(&mut self, depth: u8, color: Color) -> ChessResult<SearchOutcome> {
        if color != self.current.turn {
            return Err(ChessError::WrongSideToMove {
                requested: color,
                to_move: self.current.turn,
            });
        }
        let mut search = AlphaBetaSearch::new(&self.masks, &self.seeds, self.scorer.as_ref(), &mut self.table);
        let (outcome, stats) = search.run(&self.current, depth)?;
        self.last_stats = Some(stats);
        Ok(outcome)
    }

    pub fn search_current(&mut self) -> ChessResult<SearchOutcome> {
        self.search(self.config.default_depth, self.current.turn)
    }

    /// Search at the default depth and play the result.
    pub fn play_best_move(&mut self) -> ChessResult<SearchOutcome> {
        let outcome = self.search_current()?;
        if let SearchOutcome::Move { best_move, .. } = outcome {
            self.apply_to_canonical(best_move);
        }
        Ok(outcome)
    }

    pub fn record(&self) -> PositionRecord {
        PositionRecord::from(&self.current)
    }

    pub fn position_hash(&self) -> u64 {
        self.seeds.hash(&self.current)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
