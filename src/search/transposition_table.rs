//! Transposition cache keyed by the additive position hash.
//!
//! The cache is a power-of-two array of two-slot buckets. The first slot keeps
//! the deepest result seen for its bucket; the second always takes the most
//! recent store that the first slot refused. Scores carry the bound they were
//! proven under.

use crate::moves::chess_move::ChessMove;
use crate::search::board_scoring::MATE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Fail-high: the true score is at least `score`.
    Lower,
    /// Fail-low: the true score is at most `score`.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<ChessMove>,
}

impl TableEntry {
    /// The stored score when it settles a node searched with `alpha..beta`.
    #[inline]
    pub fn usable_score(&self, alpha: i32, beta: i32) -> Option<i32> {
        let settles = match self.bound {
            Bound::Exact => true,
            Bound::Lower => self.score >= beta,
            Bound::Upper => self.score <= alpha,
        };
        settles.then_some(self.score)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

type Bucket = [Option<TableEntry>; 2];

const DEEP: usize = 0;
const RECENT: usize = 1;

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    mask: u64,
    stats: TableStats,
}

impl TranspositionTable {
    /// Largest power-of-two bucket count that fits in `size_mb` megabytes
    /// (minimum one megabyte).
    pub fn new_with_mb(size_mb: usize) -> Self {
        let budget = size_mb.max(1) << 20;
        let fit = (budget / std::mem::size_of::<Bucket>()).max(1);
        let count = if fit.is_power_of_two() { fit } else { fit.next_power_of_two() >> 1 };
        Self {
            buckets: vec![[None; 2]; count],
            mask: count as u64 - 1,
            stats: TableStats::default(),
        }
    }

    pub fn clear(&mut self) {
        self.buckets.fill([None; 2]);
        self.stats = TableStats::default();
    }

    /// Slot capacity.
    #[inline]
    pub fn len(&self) -> usize {
        self.buckets.len() * 2
    }

    pub fn is_empty(&self) -> bool {
        self.occupied() == 0
    }

    pub fn occupied(&self) -> usize {
        self.buckets.iter().flatten().filter(|slot| slot.is_some()).count()
    }

    #[inline]
    pub fn stats(&self) -> TableStats {
        self.stats
    }

    #[inline]
    fn bucket_mut(&mut self, key: u64) -> &mut Bucket {
        &mut self.buckets[(key & self.mask) as usize]
    }

    /// Prefers the deep slot when both hold the key.
    pub fn probe(&mut self, key: u64) -> Option<TableEntry> {
        self.stats.probes += 1;
        let found = self.bucket_mut(key).iter().flatten().find(|entry| entry.key == key).copied();
        if found.is_some() {
            self.stats.hits += 1;
        }
        found
    }

    pub fn store(&mut self, entry: TableEntry) {
        self.stats.stores += 1;
        let bucket = self.bucket_mut(entry.key);

        let takes_deep = match bucket[DEEP] {
            None => true,
            Some(resident) => entry.depth >= resident.depth,
        };
        if takes_deep {
            // A displaced deep entry for another position moves down a slot.
            if let Some(resident) = bucket[DEEP].filter(|resident| resident.key != entry.key) {
                bucket[RECENT] = Some(resident);
            } else if bucket[RECENT].is_some_and(|recent| recent.key == entry.key) {
                bucket[RECENT] = None;
            }
            bucket[DEEP] = Some(entry);
        } else if bucket[DEEP].is_some_and(|resident| resident.key != entry.key) {
            bucket[RECENT] = Some(entry);
        }
    }
}

/// Mate scores are kept as distance from the stored node rather than from the
/// root, so a hit reached along another path reports the right distance.
#[inline]
pub fn score_to_table(score: i32, ply: u32) -> i32 {
    let ply = ply as i32;
    match score {
        s if s >= MATE_THRESHOLD => s + ply,
        s if s <= -MATE_THRESHOLD => s - ply,
        s => s,
    }
}

#[inline]
pub fn score_from_table(score: i32, ply: u32) -> i32 {
    let ply = ply as i32;
    match score {
        s if s >= MATE_THRESHOLD => s - ply,
        s if s <= -MATE_THRESHOLD => s + ply,
        s => s,
    }
}
