//! Position data model.
//!
//! `PositionState` stores the 12 piece bitboards in plane order (pawn, rook,
//! bishop, knight, queen, king; white then black for each kind), occupancy
//! caches, side to move, rights, clocks and the derived check/pin/mate/draw
//! flags. Positions are plain values: move application clones and returns a
//! new one, so a position handed to a search stays valid for every sibling.

use crate::errors::ChessResult;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::moves::mask_table::MaskTable;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, Eq)]
pub struct PositionState {
    // --- Bitboard representation, indexed by `Piece::plane()` ---
    pub boards: [Bitboard; 12],

    // Occupancy caches; refresh with `recalc_occupancy` after editing `boards`.
    pub occupancy_by_color: [Bitboard; 2],
    pub occupancy_all: Bitboard,

    // --- Side and state flags ---
    pub turn: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,

    // --- Clocks / move counters ---
    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    // --- Derived, recomputed after every transition ---
    pub check: bool,
    pub double_check: bool,
    pub checking_rays: Bitboard,
    pub pinned: Bitboard,
    /// Side to move has no legal move; `check` tells checkmate from stalemate.
    pub mate: bool,
    /// Fifty-move rule: no capture or pawn move in 100 halfmoves.
    pub draw: bool,

    // --- Game history, not part of position identity ---
    /// Keys of earlier positions since the last pawn move or capture.
    pub repetition_keys: Vec<u64>,
    /// Third occurrence of this position within `repetition_keys`.
    pub repeated: bool,
}

impl Default for PositionState {
    fn default() -> Self {
        Self {
            boards: [0; 12],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            turn: Color::White,
            castling: 0,
            en_passant: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            check: false,
            double_check: false,
            checking_rays: 0,
            pinned: 0,
            mate: false,
            draw: false,

            repetition_keys: Vec::new(),
            repeated: false,
        }
    }
}

// History is bookkeeping, not position identity.
impl PartialEq for PositionState {
    fn eq(&self, other: &Self) -> bool {
        self.boards == other.boards
            && self.turn == other.turn
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.check == other.check
            && self.double_check == other.double_check
            && self.checking_rays == other.checking_rays
            && self.pinned == other.pinned
            && self.mate == other.mate
            && self.draw == other.draw
    }
}

impl PositionState {
    /// Empty board, white to move. Derived flags are not computed.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// The standard starting position.
    pub fn new_game() -> Self {
        Self::from_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    /// Parse FEN using the process-wide mask table.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen, &MaskTable::shared())
    }

    pub fn from_fen_with(fen: &str, masks: &MaskTable) -> ChessResult<Self> {
        parse_fen(fen, masks)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn board(&self, piece: Piece) -> Bitboard {
        self.boards[piece.plane()]
    }

    #[inline]
    pub fn pieces(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.boards[Piece::new(kind, color).plane()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupancy_all
    }

    #[inline]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupancy_by_color[color.index()]
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let mask = square.bit();
        if self.occupancy_all & mask == 0 {
            return None;
        }
        self.boards
            .iter()
            .position(|board| board & mask != 0)
            .and_then(Piece::from_plane)
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::lsb(self.pieces(PieceKind::King, color))
    }

    #[inline]
    pub fn is_checkmate(&self) -> bool {
        self.mate && self.check
    }

    #[inline]
    pub fn is_stalemate(&self) -> bool {
        self.mate && !self.check
    }

    /// Drawn by the fifty-move rule or by threefold repetition.
    #[inline]
    pub fn is_draw(&self) -> bool {
        self.draw || self.repeated
    }

    /// Place a piece, keeping the occupancy caches in sync.
    pub fn put_piece(&mut self, piece: Piece, square: Square) {
        self.boards[piece.plane()] |= square.bit();
        self.recalc_occupancy();
    }

    pub fn recalc_occupancy(&mut self) {
        let mut by_color = [0; 2];
        for (plane, board) in self.boards.iter().enumerate() {
            by_color[plane % 2] |= board;
        }
        self.occupancy_by_color = by_color;
        self.occupancy_all = by_color[0] | by_color[1];
    }

    /// True when no two planes share a square.
    pub fn planes_are_disjoint(&self) -> bool {
        let total: u32 = self.boards.iter().map(|b| b.count_ones()).sum();
        total == self.occupancy_all.count_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::PositionState;
    use crate::game_state::chess_types::*;

    #[test]
    fn starting_position_layout() {
        let game = PositionState::new_game();
        assert_eq!(game.pieces(PieceKind::Pawn, Color::White), 0xff00);
        assert_eq!(game.pieces(PieceKind::Pawn, Color::Black), 0x00ff_0000_0000_0000);
        assert_eq!(game.king_square(Color::White), Some(Square::E1));
        assert_eq!(game.king_square(Color::Black), Some(Square::E8));
        assert_eq!(game.occupied().count_ones(), 32);
        assert!(game.planes_are_disjoint());
        assert!(!game.check && !game.mate && !game.draw);
    }

    #[test]
    fn piece_lookup_by_square() {
        let game = PositionState::new_game();
        assert_eq!(
            game.piece_at(Square::D1),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
        assert_eq!(
            game.piece_at(Square::B8),
            Some(Piece::new(PieceKind::Knight, Color::Black))
        );
        let empty = Square::new(30).expect("index in range");
        assert_eq!(game.piece_at(empty), None);
    }

    #[test]
    fn equality_ignores_repetition_history() {
        let a = PositionState::new_game();
        let mut b = a.clone();
        b.repetition_keys.push(42);
        b.repeated = true;
        assert_eq!(a, b);
        assert!(b.is_draw() && !a.is_draw());
        b.halfmove_clock = 3;
        assert_ne!(a, b);
    }
}
