//! Position analysis runner.
//!
//! Usage:
//! `cargo run --release --bin analyze -- --depth 5`
//! `cargo run --release --bin analyze -- --fen "<fen>" --perft 3`
//! `RUST_LOG=debug cargo run --bin analyze -- --play 6`

use clap::Parser;
use log::info;

use plum_position::engines::engine::{Engine, EngineConfig};
use plum_position::game_state::chess_rules::STARTING_POSITION_FEN;
use plum_position::move_generation::perft::perft;
use plum_position::search::alpha_beta::SearchOutcome;
use plum_position::search::position_hash::DEFAULT_HASH_SEED;
use plum_position::utils::render_game_state::render_game_state;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search or perft a chess position", long_about = None)]
struct Args {
    /// Position to analyze
    #[arg(long, default_value = STARTING_POSITION_FEN)]
    fen: String,

    /// Search depth in plies
    #[arg(long, default_value_t = 4)]
    depth: u8,

    /// Transposition table size in megabytes
    #[arg(long = "cache-mb", default_value_t = 16)]
    cache_mb: usize,

    /// Seed for the position hash table
    #[arg(long, default_value_t = DEFAULT_HASH_SEED)]
    seed: u64,

    /// Count leaf nodes to this depth instead of searching
    #[arg(long)]
    perft: Option<u8>,

    /// Let the engine play this many plies against itself
    #[arg(long, default_value_t = 1)]
    play: u32,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level))
        .init();

    let mut engine = Engine::new(EngineConfig {
        default_depth: args.depth,
        cache_size_mb: args.cache_mb,
        hash_seed: args.seed,
    });
    engine.load_fen(&args.fen).map_err(|e| e.to_string())?;
    println!("{}", render_game_state(engine.current()));

    if let Some(depth) = args.perft {
        let counts = perft(engine.masks(), engine.seeds(), engine.current(), depth).map_err(|e| e.to_string())?;
        println!(
            "perft {depth}: nodes={} captures={} ep={} castles={} promotions={} checks={} mates={}",
            counts.nodes,
            counts.captures,
            counts.en_passant,
            counts.castles,
            counts.promotions,
            counts.checks,
            counts.checkmates
        );
        return Ok(());
    }

    for _ in 0..args.play {
        let outcome = engine.play_best_move().map_err(|e| e.to_string())?;
        let stats = engine.last_stats().unwrap_or_default();
        match outcome {
            SearchOutcome::Move { best_move, score } => println!(
                "bestmove {best_move} score {score} depth {} nodes {} cache_hits {} elapsed_ms {}",
                stats.depth,
                stats.nodes,
                stats.cache_hits,
                stats.elapsed.as_millis()
            ),
            SearchOutcome::Checkmate => {
                println!("checkmate");
                break;
            }
            SearchOutcome::Stalemate => {
                println!("stalemate");
                break;
            }
        }
        if engine.current().is_draw() {
            info!("game drawn at {}", engine.current().to_fen());
            println!("draw");
            break;
        }
    }

    println!("{}", render_game_state(engine.current()));
    println!("{}", engine.current().to_fen());
    Ok(())
}
