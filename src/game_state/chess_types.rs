//! Core value types: colors, piece kinds, pieces, squares and bitboards.
//!
//! Squares use a file-reversed layout: `0 == h1`, `7 == a1`, `8 == h2` and
//! `63 == a8`. Everything that converts to or from human notation goes
//! through `Square` so the layout lives in one place.

use std::fmt;

use crate::errors::{ChessError, ChessResult};

/// A set of squares, bit `i` standing for square `i`.
pub type Bitboard = u64;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// FEN side-to-move letter.
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    #[inline]
    pub fn from_fen_char(ch: char) -> Option<Self> {
        match ch {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

/// Piece kind in plane order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Bishop,
    Knight,
    Queen,
    King,
}

pub const ALL_PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Queen,
    PieceKind::King,
];

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Rook => 1,
            PieceKind::Bishop => 2,
            PieceKind::Knight => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Moves along ranks and files.
    #[inline]
    pub const fn slides_straight(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen)
    }

    /// Moves along diagonals.
    #[inline]
    pub const fn slides_diagonally(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Queen)
    }

    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop),
            'n' => Some(PieceKind::Knight),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A colored piece. `plane()` is its index into the 12 bitboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    #[inline]
    pub const fn plane(self) -> usize {
        self.kind.index() * 2 + self.color.index()
    }

    pub fn from_plane(plane: usize) -> Option<Self> {
        let kind = *ALL_PIECE_KINDS.get(plane / 2)?;
        let color = if plane % 2 == 0 { Color::White } else { Color::Black };
        Some(Self { kind, color })
    }

    /// FEN letter, uppercase for White.
    pub fn fen_char(self) -> char {
        let ch = self.kind.fen_char();
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let kind = PieceKind::from_fen_char(ch)?;
        let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Self { kind, color })
    }
}

/// Board square in the file-reversed layout (`0 == h1`, `63 == a8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    pub const H1: Square = Square(0);
    pub const G1: Square = Square(1);
    pub const F1: Square = Square(2);
    pub const E1: Square = Square(3);
    pub const D1: Square = Square(4);
    pub const C1: Square = Square(5);
    pub const B1: Square = Square(6);
    pub const A1: Square = Square(7);
    pub const H8: Square = Square(56);
    pub const G8: Square = Square(57);
    pub const F8: Square = Square(58);
    pub const E8: Square = Square(59);
    pub const D8: Square = Square(60);
    pub const C8: Square = Square(61);
    pub const B8: Square = Square(62);
    pub const A8: Square = Square(63);

    /// Validated construction from a raw index.
    pub fn new(index: u32) -> ChessResult<Self> {
        if index < 64 {
            Ok(Square(index as u8))
        } else {
            Err(ChessError::SquareOutOfRange(index))
        }
    }

    /// Caller guarantees `index < 64` (table builders and bit scans).
    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        debug_assert!(index < 64);
        Square(index as u8)
    }

    /// Square from a column (`0 == h-file`) and rank (`0 == rank 1`).
    #[inline]
    pub(crate) fn from_column_rank(column: i32, rank: i32) -> Option<Self> {
        if (0..8).contains(&column) && (0..8).contains(&rank) {
            Some(Square((rank * 8 + column) as u8))
        } else {
            None
        }
    }

    /// Square from a file letter offset (`0 == a-file`) and rank (`0 == rank 1`).
    pub fn from_file_rank(file: u8, rank: u8) -> ChessResult<Self> {
        if file > 7 || rank > 7 {
            return Err(ChessError::SquareOutOfRange(u32::from(rank) * 8 + u32::from(file)));
        }
        Ok(Square(rank * 8 + (7 - file)))
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn bit(self) -> Bitboard {
        1u64 << self.0
    }

    /// Rank, `0` for rank 1.
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Column in index order, `0` for the h-file.
    #[inline]
    pub const fn column(self) -> u8 {
        self.0 % 8
    }

    /// File offset from the a-file, `0` for a.
    #[inline]
    pub const fn file(self) -> u8 {
        7 - self.0 % 8
    }

    /// Lowest set square of a bitboard.
    #[inline]
    pub fn lsb(bitboard: Bitboard) -> Option<Self> {
        if bitboard == 0 {
            None
        } else {
            Some(Square(bitboard.trailing_zeros() as u8))
        }
    }

    /// Highest set square of a bitboard.
    #[inline]
    pub fn msb(bitboard: Bitboard) -> Option<Self> {
        if bitboard == 0 {
            None
        } else {
            Some(Square(63 - bitboard.leading_zeros() as u8))
        }
    }
}

impl TryFrom<u8> for Square {
    type Error = ChessError;

    fn try_from(value: u8) -> ChessResult<Self> {
        Square::new(u32::from(value))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.file());
        let rank = char::from(b'1' + self.rank());
        write!(f, "{file}{rank}")
    }
}

/// Iterator over the set squares of a bitboard, lowest first.
#[derive(Debug, Clone, Copy)]
pub struct Squares(Bitboard);

impl Iterator for Squares {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        let square = Square::lsb(self.0)?;
        self.0 &= self.0 - 1;
        Some(square)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Squares {}

#[inline]
pub fn squares(bitboard: Bitboard) -> Squares {
    Squares(bitboard)
}

/// Castling rights bitmask.
pub type CastlingRights = u8;
pub const CASTLE_WHITE_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_WHITE_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_BLACK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_BLACK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights =
    CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE | CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE;

/// Rights in FEN order with their letters.
pub const CASTLING_LETTERS: [(CastlingRights, char); 4] = [
    (CASTLE_WHITE_KINGSIDE, 'K'),
    (CASTLE_WHITE_QUEENSIDE, 'Q'),
    (CASTLE_BLACK_KINGSIDE, 'k'),
    (CASTLE_BLACK_QUEENSIDE, 'q'),
];
