//! Fully specified moves and the loosely typed move request accepted from
//! callers outside the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::utils::algebraic::algebraic_to_square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub color: Color,
    /// Piece removed by the move; `Pawn` for en passant.
    pub captured: Option<PieceKind>,
    /// Always `Queen` when a pawn reaches the last rank.
    pub promotion: Option<PieceKind>,
}

impl ChessMove {
    /// A quiet, non-promoting move.
    pub const fn new(from: Square, to: Square, piece: PieceKind, color: Color) -> Self {
        Self {
            from,
            to,
            piece,
            color,
            captured: None,
            promotion: None,
        }
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Same origin, destination, piece and color, ignoring annotations.
    #[inline]
    pub fn same_route(&self, other: &ChessMove) -> bool {
        self.from == other.from && self.to == other.to && self.piece == other.piece && self.color == other.color
    }
}

/// Long algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.fen_char())?;
        }
        Ok(())
    }
}

/// Move as submitted by an external caller: algebraic squares, FEN piece
/// letter, `'w'`/`'b'` color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    pub piece: char,
    pub color: char,
    #[serde(default)]
    pub promotion: Option<char>,
}

impl MoveRequest {
    /// Parse the request into a route. Capture and promotion annotations are
    /// filled in by matching against the generated legal moves. Only a queen
    /// promotion (`'q'`/`'Q'`) is accepted.
    pub fn to_move(&self) -> ChessResult<ChessMove> {
        if let Some(letter) = self.promotion {
            if PieceKind::from_fen_char(letter) != Some(PieceKind::Queen) {
                return Err(ChessError::UnsupportedPromotion(letter));
            }
        }
        let from = algebraic_to_square(&self.from)?;
        let to = algebraic_to_square(&self.to)?;
        let piece = PieceKind::from_fen_char(self.piece)
            .ok_or_else(|| ChessError::InvalidAlgebraic(format!("unknown piece letter '{}'", self.piece)))?;
        let color = Color::from_fen_char(self.color)
            .ok_or_else(|| ChessError::InvalidAlgebraic(format!("unknown color '{}'", self.color)))?;
        Ok(ChessMove::new(from, to, piece, color))
    }
}

impl From<&ChessMove> for MoveRequest {
    fn from(mv: &ChessMove) -> Self {
        Self {
            from: mv.from.to_string(),
            to: mv.to.to_string(),
            piece: mv.piece.fen_char(),
            color: mv.color.fen_char(),
            promotion: mv.promotion.map(PieceKind::fen_char),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parses_to_route() {
        let request = MoveRequest {
            from: "d2".to_owned(),
            to: "d4".to_owned(),
            piece: 'P',
            color: 'w',
            promotion: None,
        };
        let mv = request.to_move().expect("request should parse");
        assert_eq!(mv.from.index(), 12);
        assert_eq!(mv.to.index(), 28);
        assert_eq!(mv.piece, PieceKind::Pawn);
        assert_eq!(mv.color, Color::White);
        assert_eq!(mv.to_string(), "d2d4");
    }

    #[test]
    fn request_rejects_bad_fields() {
        let mut request = MoveRequest {
            from: "d2".to_owned(),
            to: "d9".to_owned(),
            piece: 'p',
            color: 'w',
            promotion: None,
        };
        assert!(request.to_move().is_err());
        request.to = "d4".to_owned();
        request.color = 'x';
        assert!(request.to_move().is_err());
    }

    #[test]
    fn request_accepts_only_queen_promotion() {
        let mut request = MoveRequest {
            from: "e7".to_owned(),
            to: "e8".to_owned(),
            piece: 'P',
            color: 'w',
            promotion: Some('n'),
        };
        assert_eq!(request.to_move(), Err(ChessError::UnsupportedPromotion('n')));
        request.promotion = Some('Q');
        assert!(request.to_move().is_ok());
        request.promotion = Some('q');
        assert_eq!(request.to_move().map(|mv| mv.to_string()), Ok("e7e8".to_owned()));
    }

    #[test]
    fn promotion_is_shown_in_long_algebraic() {
        let mut mv = ChessMove::new(
            algebraic_to_square("e7").expect("e7"),
            algebraic_to_square("e8").expect("e8"),
            PieceKind::Pawn,
            Color::White,
        );
        mv.promotion = Some(PieceKind::Queen);
        assert_eq!(mv.to_string(), "e7e8q");
        assert_eq!(MoveRequest::from(&mv).promotion, Some('q'));
    }
}
