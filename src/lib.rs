//! Crate root module declarations for the plum_position chess engine.
//!
//! Exposes the position model, legal move generation, search and utility
//! helpers under stable module paths for the `analyze` binary, benches and
//! external callers.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod position_record;
}

pub mod moves {
    pub mod chess_move;
    pub mod mask_table;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliding;
    pub mod perft;
}

pub mod search {
    pub mod alpha_beta;
    pub mod board_scoring;
    pub mod position_hash;
    pub mod transposition_table;
}

pub mod engines {
    pub mod engine;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod render_game_state;
}
