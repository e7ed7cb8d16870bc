//! Precomputed per-square ray and attack masks.
//!
//! `MaskTable` holds the eight directional rays of every square, the
//! pseudo-move masks of each piece family, pawn capture masks and the 64×64
//! "strictly between" table used by pin, check and castling logic. The table
//! is immutable once built; `MaskTable::shared()` builds it once per process
//! and hands out reference-counted handles.

use std::sync::{Arc, OnceLock};

use crate::game_state::chess_types::*;

/// The eight ray directions. East is toward the h-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub const STRAIGHT: [Direction; 4] =
        [Direction::North, Direction::South, Direction::East, Direction::West];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
            Direction::NorthEast => 4,
            Direction::NorthWest => 5,
            Direction::SouthEast => 6,
            Direction::SouthWest => 7,
        }
    }

    /// `(column_step, rank_step)`; column 0 is the h-file.
    #[inline]
    pub const fn steps(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (-1, 0),
            Direction::West => (1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::NorthWest => (1, 1),
            Direction::SouthEast => (-1, -1),
            Direction::SouthWest => (1, -1),
        }
    }

    #[inline]
    pub const fn is_straight(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::South | Direction::East | Direction::West
        )
    }

    /// Whether stepping along this direction increases the square index.
    #[inline]
    pub const fn is_increasing(self) -> bool {
        let (column_step, rank_step) = self.steps();
        rank_step * 8 + column_step > 0
    }
}

const KNIGHT_STEPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

#[derive(Debug, Clone)]
pub struct MaskTable {
    rays: [[Bitboard; 8]; 64],
    rook: [Bitboard; 64],
    bishop: [Bitboard; 64],
    king: [Bitboard; 64],
    knight: [Bitboard; 64],
    pawn_attacks: [[Bitboard; 64]; 2],
    // Indexed `a * 64 + b`.
    between: Vec<Option<Bitboard>>,
    directions: Vec<Option<Direction>>,
}

static SHARED: OnceLock<Arc<MaskTable>> = OnceLock::new();

impl MaskTable {
    /// Build every table. Pure; prefer `shared()` outside of tests.
    pub fn new() -> Self {
        let mut table = MaskTable {
            rays: [[0; 8]; 64],
            rook: [0; 64],
            bishop: [0; 64],
            king: [0; 64],
            knight: [0; 64],
            pawn_attacks: [[0; 64]; 2],
            between: vec![None; 64 * 64],
            directions: vec![None; 64 * 64],
        };

        for index in 0..64 {
            let from = Square::from_index(index);
            let column = i32::from(from.column());
            let rank = i32::from(from.rank());

            for direction in Direction::ALL {
                let (column_step, rank_step) = direction.steps();
                let mut path: Bitboard = 0;
                let mut c = column + column_step;
                let mut r = rank + rank_step;
                while let Some(to) = Square::from_column_rank(c, r) {
                    table.between[index * 64 + to.index()] = Some(path);
                    table.directions[index * 64 + to.index()] = Some(direction);
                    path |= to.bit();
                    c += column_step;
                    r += rank_step;
                }
                table.rays[index][direction.index()] = path;
                if direction.is_straight() {
                    table.rook[index] |= path;
                } else {
                    table.bishop[index] |= path;
                }

                if let Some(neighbour) = Square::from_column_rank(column + column_step, rank + rank_step) {
                    table.king[index] |= neighbour.bit();
                }
            }

            for (column_step, rank_step) in KNIGHT_STEPS {
                if let Some(to) = Square::from_column_rank(column + column_step, rank + rank_step) {
                    table.knight[index] |= to.bit();
                }
            }

            for color in [Color::White, Color::Black] {
                let rank_step = match color {
                    Color::White => 1,
                    Color::Black => -1,
                };
                for column_step in [-1, 1] {
                    if let Some(to) = Square::from_column_rank(column + column_step, rank + rank_step) {
                        table.pawn_attacks[color.index()][index] |= to.bit();
                    }
                }
            }
        }

        table
    }

    /// Process-wide table, built on first use. Safe to call repeatedly.
    pub fn shared() -> Arc<MaskTable> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(MaskTable::new())))
    }

    #[inline]
    pub fn ray(&self, square: Square, direction: Direction) -> Bitboard {
        self.rays[square.index()][direction.index()]
    }

    /// Ray from `square` up to and including the first occupied square.
    #[inline]
    pub fn ray_attacks(&self, square: Square, direction: Direction, occupied: Bitboard) -> Bitboard {
        let ray = self.ray(square, direction);
        let blockers = ray & occupied;
        let first = if direction.is_increasing() {
            Square::lsb(blockers)
        } else {
            Square::msb(blockers)
        };
        match first {
            Some(blocker) => ray ^ self.ray(blocker, direction),
            None => ray,
        }
    }

    pub fn rook_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        Direction::STRAIGHT
            .iter()
            .fold(0, |acc, &d| acc | self.ray_attacks(square, d, occupied))
    }

    pub fn bishop_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        Direction::DIAGONAL
            .iter()
            .fold(0, |acc, &d| acc | self.ray_attacks(square, d, occupied))
    }

    #[inline]
    pub fn queen_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.rook_attacks(square, occupied) | self.bishop_attacks(square, occupied)
    }

    /// All rank and file squares, ignoring blockers.
    #[inline]
    pub fn rook_mask(&self, square: Square) -> Bitboard {
        self.rook[square.index()]
    }

    #[inline]
    pub fn bishop_mask(&self, square: Square) -> Bitboard {
        self.bishop[square.index()]
    }

    #[inline]
    pub fn king_mask(&self, square: Square) -> Bitboard {
        self.king[square.index()]
    }

    #[inline]
    pub fn knight_mask(&self, square: Square) -> Bitboard {
        self.knight[square.index()]
    }

    /// Squares a pawn of `color` on `square` captures on.
    #[inline]
    pub fn pawn_attacks(&self, color: Color, square: Square) -> Bitboard {
        self.pawn_attacks[color.index()][square.index()]
    }

    /// Squares strictly between `a` and `b`.
    ///
    /// `None` when the two squares share no rank, file or diagonal (or are the
    /// same square); `Some(0)` when they are adjacent.
    #[inline]
    pub fn between(&self, a: Square, b: Square) -> Option<Bitboard> {
        self.between[a.index() * 64 + b.index()]
    }

    /// Direction of travel from `a` toward `b`, when aligned.
    #[inline]
    pub fn direction(&self, a: Square, b: Square) -> Option<Direction> {
        self.directions[a.index() * 64 + b.index()]
    }

    /// Occupied squares on the line strictly between `a` and `b`.
    #[inline]
    pub fn obstructed(&self, a: Square, b: Square, occupied: Bitboard) -> Option<Bitboard> {
        self.between(a, b).map(|path| path & occupied & !a.bit())
    }

    /// True iff `a` and `b` are aligned and nothing stands between them.
    #[inline]
    pub fn may_pass_through(&self, a: Square, b: Square, occupied: Bitboard) -> bool {
        self.obstructed(a, b, occupied) == Some(0)
    }
}

impl Default for MaskTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, MaskTable};
    use crate::game_state::chess_types::Square;

    fn sq(name: &str) -> Square {
        crate::utils::algebraic::algebraic_to_square(name).expect("test square should parse")
    }

    #[test]
    fn mask_sizes_from_d4() {
        let masks = MaskTable::new();
        assert_eq!(masks.rook_mask(sq("d4")).count_ones(), 14);
        assert_eq!(masks.bishop_mask(sq("d4")).count_ones(), 13);
        assert_eq!(masks.knight_mask(sq("d4")).count_ones(), 8);
        assert_eq!(masks.king_mask(sq("d4")).count_ones(), 8);
        assert_eq!(masks.knight_mask(sq("h1")).count_ones(), 2);
        assert_eq!(masks.king_mask(sq("a8")).count_ones(), 3);
    }

    #[test]
    fn rays_follow_the_file_reversed_layout() {
        let masks = MaskTable::new();
        assert_eq!(masks.ray(sq("e1"), Direction::East), sq("f1").bit() | sq("g1").bit() | sq("h1").bit());
        assert_eq!(masks.ray(sq("b1"), Direction::West), sq("a1").bit());
        assert_eq!(masks.ray(sq("a1"), Direction::NorthEast).count_ones(), 7);
        assert_ne!(masks.pawn_attacks(crate::game_state::chess_types::Color::White, sq("e4")) & sq("d5").bit(), 0);
    }

    #[test]
    fn between_is_symmetric_and_distinguishes_unaligned() {
        let masks = MaskTable::new();
        for a in 0..64 {
            for b in 0..64 {
                let a = Square::from_index(a);
                let b = Square::from_index(b);
                assert_eq!(masks.between(a, b), masks.between(b, a));
            }
        }
        assert_eq!(masks.between(sq("a1"), sq("b3")), None);
        assert_eq!(masks.between(sq("e4"), sq("e4")), None);
        assert_eq!(masks.between(sq("e4"), sq("e5")), Some(0));
        assert_eq!(masks.between(sq("a1"), sq("h1")).map(u64::count_ones), Some(6));
        assert_eq!(
            masks.between(sq("c1"), sq("f4")),
            Some(sq("d2").bit() | sq("e3").bit())
        );
    }

    #[test]
    fn ray_attacks_stop_at_first_blocker() {
        let masks = MaskTable::new();
        let blocker = sq("a4").bit();
        let attacks = masks.ray_attacks(sq("a1"), Direction::North, blocker);
        assert_ne!(attacks & sq("a4").bit(), 0);
        assert_eq!(attacks & sq("a5").bit(), 0);

        let attacks = masks.ray_attacks(sq("h8"), Direction::SouthWest, sq("e5").bit());
        assert_eq!(attacks, sq("g7").bit() | sq("f6").bit() | sq("e5").bit());
    }

    #[test]
    fn obstruction_and_pass_through() {
        let masks = MaskTable::new();
        let occupied = sq("e1").bit() | sq("h1").bit();
        assert_eq!(masks.obstructed(sq("e1"), sq("h1"), occupied), Some(0));
        assert!(masks.may_pass_through(sq("e1"), sq("h1"), occupied));

        let occupied = occupied | sq("g1").bit();
        assert_eq!(masks.obstructed(sq("e1"), sq("h1"), occupied), Some(sq("g1").bit()));
        assert!(!masks.may_pass_through(sq("e1"), sq("h1"), occupied));
        assert!(!masks.may_pass_through(sq("e1"), sq("g2"), 0));
    }

    #[test]
    fn shared_table_is_built_once() {
        let first = MaskTable::shared();
        let second = MaskTable::shared();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
    }
}
