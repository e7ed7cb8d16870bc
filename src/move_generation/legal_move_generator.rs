//! Legal move generation entry points.
//!
//! Dispatches per-piece target computation, builds the per-side move map and
//! the capture-first ordered move list consumed by search and by the engine.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::game_state::chess_rules::promotion_rank;
use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::move_generation::legal_move_shared::{enemy_piece_on, side_constraints, SideConstraints};
use crate::move_generation::legal_moves_king::king_targets;
use crate::move_generation::legal_moves_knight::knight_targets;
use crate::move_generation::legal_moves_pawn::pawn_targets;
use crate::move_generation::legal_moves_sliding::sliding_targets;
use crate::moves::chess_move::ChessMove;
use crate::moves::mask_table::MaskTable;
use crate::search::board_scoring::piece_value;

/// Legal destination squares for `piece` standing on `from`.
pub fn legal_targets(masks: &MaskTable, piece: Piece, from: Square, position: &PositionState) -> Bitboard {
    let constraints = side_constraints(masks, piece.color, position);
    targets_with(masks, piece, from, position, &constraints)
}

fn targets_with(
    masks: &MaskTable,
    piece: Piece,
    from: Square,
    position: &PositionState,
    constraints: &SideConstraints,
) -> Bitboard {
    match piece.kind {
        PieceKind::King => king_targets(masks, piece.color, from, position),
        PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen => {
            sliding_targets(masks, piece, from, position, constraints)
        }
        PieceKind::Knight => knight_targets(masks, piece.color, from, position, constraints),
        PieceKind::Pawn => pawn_targets(masks, piece.color, from, position, constraints),
    }
}

/// Targets of every piece of `color`, keyed by origin square. Pieces without
/// a legal move map to an empty set.
pub fn all_legal_moves(masks: &MaskTable, color: Color, position: &PositionState) -> BTreeMap<Square, Bitboard> {
    let constraints = side_constraints(masks, color, position);
    let mut out = BTreeMap::new();
    for kind in ALL_PIECE_KINDS {
        let piece = Piece::new(kind, color);
        for from in squares(position.board(piece)) {
            out.insert(from, targets_with(masks, piece, from, position, &constraints));
        }
    }
    out
}

/// Early-exit test used for mate detection. King first: it is the only piece
/// that can move under double check.
pub fn has_any_legal_move(masks: &MaskTable, color: Color, position: &PositionState) -> bool {
    let constraints = side_constraints(masks, color, position);
    [
        PieceKind::King,
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ]
    .into_iter()
    .any(|kind| {
        let piece = Piece::new(kind, color);
        squares(position.board(piece)).any(|from| targets_with(masks, piece, from, position, &constraints) != 0)
    })
}

/// Every legal move of `color` as a fully specified move, in board order.
pub fn legal_moves(masks: &MaskTable, color: Color, position: &PositionState) -> Vec<ChessMove> {
    let mut out = Vec::with_capacity(64);
    for (from, targets) in all_legal_moves(masks, color, position) {
        let Some(piece) = position.piece_at(from) else {
            continue;
        };
        for to in squares(targets) {
            out.push(describe_move(position, piece, from, to));
        }
    }
    out
}

/// Legal moves of the side to move, captures first (most valuable victim,
/// then least valuable attacker), quiet moves after.
pub fn ordered_moves(masks: &MaskTable, position: &PositionState) -> Vec<ChessMove> {
    let mut moves = legal_moves(masks, position.turn, position);
    moves.sort_by_key(|mv| Reverse(ordering_score(mv)));
    moves
}

#[inline]
fn ordering_score(mv: &ChessMove) -> i32 {
    match mv.captured {
        Some(victim) => 100_000 + piece_value(victim) * 16 - piece_value(mv.piece) / 16,
        None => 0,
    }
}

fn describe_move(position: &PositionState, piece: Piece, from: Square, to: Square) -> ChessMove {
    let mut mv = ChessMove::new(from, to, piece.kind, piece.color);
    mv.captured = enemy_piece_on(position, piece.color, to);
    if piece.kind == PieceKind::Pawn {
        if mv.captured.is_none() && from.column() != to.column() {
            mv.captured = Some(PieceKind::Pawn);
        }
        if to.rank() == promotion_rank(piece.color) {
            mv.promotion = Some(PieceKind::Queen);
        }
    }
    mv
}
