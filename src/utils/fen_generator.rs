use crate::game_state::{chess_types::*, game_state::PositionState};

pub fn generate_fen(position: &PositionState) -> String {
    let en_passant = position
        .en_passant
        .map(|square| square.to_string())
        .unwrap_or_else(|| "-".to_owned());

    format!(
        "{} {} {} {} {} {}",
        generate_board_field(position),
        position.turn.fen_char(),
        generate_castling_field(position.castling),
        en_passant,
        position.halfmove_clock,
        position.fullmove_number
    )
}

fn generate_board_field(position: &PositionState) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            let piece = Square::from_file_rank(file, rank)
                .ok()
                .and_then(|square| position.piece_at(square));
            match piece {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece.fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

pub fn generate_castling_field(rights: CastlingRights) -> String {
    let out: String = CASTLING_LETTERS
        .iter()
        .filter(|(right, _)| rights & right != 0)
        .map(|(_, letter)| *letter)
        .collect();

    if out.is_empty() {
        "-".to_owned()
    } else {
        out
    }
}
