//! Additive polynomial position hashing.
//!
//! Every (plane, square) pair owns a distinct random seed below the Mersenne
//! prime 2^61 - 1. A position hashes to the sum of the seeds of its set bits,
//! reduced modulo the prime, plus fixed contributions for side to move,
//! castling rights, the en-passant file and the draw flag. Seeds are drawn
//! from a seeded `StdRng`, so two tables built from one seed agree.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::{chess_types::*, game_state::PositionState};

pub const HASH_MODULUS: u64 = (1 << 61) - 1;
pub const DEFAULT_HASH_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashSeeds {
    piece_square: [[u64; 64]; 12],
    black_to_move: u64,
    castling: [u64; 4],
    en_passant_file: [u64; 8],
    draw: u64,
}

static SHARED: OnceLock<Arc<HashSeeds>> = OnceLock::new();

impl HashSeeds {
    /// Build a seed table from `seed`. Every value is unique across the table.
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut used = HashSet::with_capacity(12 * 64 + 14);
        let mut draw_unique = || loop {
            let value = rng.random_range(1..HASH_MODULUS);
            if used.insert(value) {
                break value;
            }
        };

        let mut piece_square = [[0; 64]; 12];
        for plane in piece_square.iter_mut() {
            for value in plane.iter_mut() {
                *value = draw_unique();
            }
        }
        let black_to_move = draw_unique();
        let castling = [draw_unique(), draw_unique(), draw_unique(), draw_unique()];
        let mut en_passant_file = [0; 8];
        for value in en_passant_file.iter_mut() {
            *value = draw_unique();
        }
        let draw = draw_unique();

        Self {
            piece_square,
            black_to_move,
            castling,
            en_passant_file,
            draw,
        }
    }

    /// Process-wide table built from `DEFAULT_HASH_SEED`.
    pub fn shared() -> Arc<HashSeeds> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::generate(DEFAULT_HASH_SEED))))
    }

    #[inline]
    pub fn piece_square(&self, piece: Piece, square: Square) -> u64 {
        self.piece_square[piece.plane()][square.index()]
    }

    /// Every seed value in the table.
    pub fn all_values(&self) -> impl Iterator<Item = u64> + '_ {
        self.piece_square
            .iter()
            .flatten()
            .chain(std::iter::once(&self.black_to_move))
            .chain(self.castling.iter())
            .chain(self.en_passant_file.iter())
            .chain(std::iter::once(&self.draw))
            .copied()
    }

    /// Identity of the position for repetition: pieces, side to move, castling
    /// rights and en-passant file. Clocks and derived flags are excluded.
    pub fn position_key(&self, position: &PositionState) -> u64 {
        let mut key = 0;
        for (plane, board) in position.boards.iter().enumerate() {
            for square in squares(*board) {
                key = add_mod(key, self.piece_square[plane][square.index()]);
            }
        }
        if position.turn == Color::Black {
            key = add_mod(key, self.black_to_move);
        }
        for (index, (right, _)) in CASTLING_LETTERS.iter().enumerate() {
            if position.castling & right != 0 {
                key = add_mod(key, self.castling[index]);
            }
        }
        if let Some(target) = position.en_passant {
            key = add_mod(key, self.en_passant_file[usize::from(target.file())]);
        }
        key
    }

    /// Cache key: the position key plus the draw flag, so a drawn node never
    /// shares an entry with the same placement before the draw.
    pub fn hash(&self, position: &PositionState) -> u64 {
        let key = self.position_key(position);
        if position.is_draw() {
            add_mod(key, self.draw)
        } else {
            key
        }
    }
}

impl Default for HashSeeds {
    fn default() -> Self {
        Self::generate(DEFAULT_HASH_SEED)
    }
}

#[inline]
fn add_mod(a: u64, b: u64) -> u64 {
    // Both operands are below 2^61, so the sum cannot overflow.
    let sum = a + b;
    if sum >= HASH_MODULUS {
        sum - HASH_MODULUS
    } else {
        sum
    }
}
