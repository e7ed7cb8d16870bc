//! Serializable snapshot of a position for callers outside the crate.
//!
//! The record mirrors `PositionState` field for field in plain types, so it
//! can cross a JSON boundary. Derived flags are exported for the reader's
//! convenience and recomputed on import; the incoming values are ignored.

use serde::{Deserialize, Serialize};

use crate::errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::PositionState};
use crate::move_generation::legal_move_apply::refresh_derived_state;
use crate::moves::mask_table::MaskTable;
use crate::utils::fen_generator::generate_castling_field;
use crate::utils::fen_parser::parse_castling_rights;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub bitboards: [u64; 12],
    pub turn: char,
    pub castling: String,
    pub en_passant: Option<u8>,
    pub halfmove: u16,
    pub fullmove: u16,
    pub check: bool,
    pub double_check: bool,
    pub mate: bool,
    pub draw: bool,
    pub stale_mate: bool,
}

impl From<&PositionState> for PositionRecord {
    fn from(position: &PositionState) -> Self {
        Self {
            bitboards: position.boards,
            turn: position.turn.fen_char(),
            castling: generate_castling_field(position.castling),
            en_passant: position.en_passant.map(|square| square.index() as u8),
            halfmove: position.halfmove_clock,
            fullmove: position.fullmove_number,
            check: position.check,
            double_check: position.double_check,
            mate: position.is_checkmate(),
            draw: position.is_draw(),
            stale_mate: position.is_stalemate(),
        }
    }
}

impl PositionRecord {
    pub fn into_position(self, masks: &MaskTable) -> ChessResult<PositionState> {
        let mut position = PositionState::new_empty();
        position.boards = self.bitboards;
        position.recalc_occupancy();
        if !position.planes_are_disjoint() {
            return Err(ChessError::InvalidRecord("piece planes overlap".to_owned()));
        }

        position.turn = Color::from_fen_char(self.turn)
            .ok_or_else(|| ChessError::InvalidRecord(format!("invalid turn '{}'", self.turn)))?;
        position.castling = parse_castling_rights(&self.castling).map_err(|err| match err {
            ChessError::InvalidFen(reason) => ChessError::InvalidRecord(reason),
            other => other,
        })?;
        position.en_passant = self
            .en_passant
            .map(|index| Square::new(u32::from(index)))
            .transpose()
            .map_err(|err| ChessError::InvalidRecord(err.to_string()))?;
        position.halfmove_clock = self.halfmove;
        position.fullmove_number = self.fullmove;

        refresh_derived_state(masks, &mut position);
        Ok(position)
    }
}

impl TryFrom<PositionRecord> for PositionState {
    type Error = ChessError;

    fn try_from(record: PositionRecord) -> ChessResult<Self> {
        record.into_position(&MaskTable::shared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape_uses_camel_case() {
        let record = PositionRecord::from(&PositionState::new_game());
        let json = serde_json::to_value(&record).expect("record should serialize");
        assert_eq!(json["turn"], "w");
        assert_eq!(json["castling"], "KQkq");
        assert_eq!(json["enPassant"], serde_json::Value::Null);
        assert_eq!(json["doubleCheck"], false);
        assert_eq!(json["staleMate"], false);
        assert_eq!(json["bitboards"][0], 0xff00);
    }

    #[test]
    fn record_survives_json_and_back() {
        let position =
            PositionState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        let json = serde_json::to_string(&PositionRecord::from(&position)).expect("record should serialize");
        let record: PositionRecord = serde_json::from_str(&json).expect("record should deserialize");
        let restored = PositionState::try_from(record).expect("record should import");
        assert_eq!(restored, position);
    }

    #[test]
    fn derived_flags_are_recomputed_on_import() {
        let mated = PositionState::from_fen("6k1/6Q1/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        let mut record = PositionRecord::from(&mated);
        assert!(record.mate && record.check && !record.stale_mate);
        record.mate = false;
        record.check = false;
        let restored = PositionState::try_from(record).expect("record should import");
        assert!(restored.is_checkmate());
    }

    #[test]
    fn malformed_records_are_rejected() {
        let good = PositionRecord::from(&PositionState::new_game());

        let mut overlap = good.clone();
        overlap.bitboards[1] |= 0x100;
        assert!(matches!(
            PositionState::try_from(overlap),
            Err(ChessError::InvalidRecord(_))
        ));

        let mut bad_turn = good.clone();
        bad_turn.turn = 'x';
        assert!(PositionState::try_from(bad_turn).is_err());

        let mut bad_castling = good.clone();
        bad_castling.castling = "KK".to_owned();
        assert_eq!(
            PositionState::try_from(bad_castling),
            Err(ChessError::InvalidRecord("repeated castling character: K".to_owned()))
        );
        let mut empty_castling = good.clone();
        empty_castling.castling = String::new();
        assert!(matches!(
            PositionState::try_from(empty_castling),
            Err(ChessError::InvalidRecord(_))
        ));

        let mut bad_square = good;
        bad_square.en_passant = Some(64);
        assert!(PositionState::try_from(bad_square).is_err());
    }
}
