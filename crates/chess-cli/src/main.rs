//! Chess CLI - perft, single searches and engine self-play.

mod config;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use chess_engine::{
    find_move, game_state, generate_moves, perft, perft_divide, Engine, Evaluator, GameState,
    Position,
};
use clap::{Parser, Subcommand};
use config::EngineConfig;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Bitboard chess engine driver")]
struct Cli {
    /// Engine configuration file
    #[arg(long, global = true, default_value = EngineConfig::DEFAULT_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes to the given depth
    Perft {
        depth: u32,
        /// Starting position (defaults to the standard start)
        #[arg(long)]
        fen: Option<String>,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Search one position and print the best move
    Search {
        #[arg(long)]
        fen: Option<String>,
        /// Moves to play first, in long algebraic form (e2e4 e7e5 ...)
        #[arg(long, num_args = 1..)]
        moves: Vec<String>,
        /// Thinking time in milliseconds (overrides the config)
        #[arg(short, long)]
        time_ms: Option<u64>,
        /// Depth cap (overrides the config)
        #[arg(short, long)]
        depth: Option<u32>,
    },
    /// Let the engine play itself until the game ends
    Play {
        #[arg(long)]
        fen: Option<String>,
        /// Random plies played before the engine takes over
        #[arg(long, default_value = "0")]
        random_plies: u32,
        /// Seed for the random opening
        #[arg(long, default_value = "1")]
        seed: u64,
        /// Thinking time per move in milliseconds (overrides the config)
        #[arg(short, long)]
        time_ms: Option<u64>,
        /// Depth cap per move (overrides the config)
        #[arg(short, long)]
        depth: Option<u32>,
        /// Stop after this many plies (overrides the config)
        #[arg(long)]
        max_plies: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = Cli::parse();
    let mut config = EngineConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Perft { depth, fen, divide } => {
            let mut position = load_position(fen.as_deref())?;
            let start = Instant::now();
            let nodes = if divide {
                let results = perft_divide(&mut position, depth);
                for (mv, count) in &results {
                    println!("{mv}: {count}");
                }
                results.iter().map(|(_, n)| n).sum()
            } else {
                perft(&mut position, depth)
            };
            let elapsed = start.elapsed();
            println!("nodes {nodes}");
            println!(
                "time {} ms ({:.0} nps)",
                elapsed.as_millis(),
                nodes as f64 / elapsed.as_secs_f64().max(1e-9)
            );
        }
        Commands::Search {
            fen,
            moves,
            time_ms,
            depth,
        } => {
            apply_overrides(&mut config, time_ms, depth, None);
            let mut position = load_position(fen.as_deref())?;
            for text in &moves {
                let Some(mv) = find_move(&position, text) else {
                    bail!("illegal move {text} in {}", position.to_fen());
                };
                position.make_move(mv);
            }

            let mut engine = build_engine(&config)?;
            let result = engine.search_with_limits(&mut position, config.limits());
            match result.best_move {
                Some(mv) => println!("bestmove {mv}"),
                None => println!("bestmove (none) {}", game_state(&position)),
            }
            println!(
                "score {} depth {} nodes {} time {} ms",
                result.score,
                result.depth,
                result.nodes,
                result.elapsed.as_millis()
            );
        }
        Commands::Play {
            fen,
            random_plies,
            seed,
            time_ms,
            depth,
            max_plies,
        } => {
            apply_overrides(&mut config, time_ms, depth, max_plies);
            let mut position = load_position(fen.as_deref())?;
            let mut rng = StdRng::seed_from_u64(seed);
            play_random_opening(&mut position, &mut rng, random_plies);

            let mut engine = build_engine(&config)?;
            let outcome = self_play(&mut engine, &mut position, &config);
            println!("{}", position.to_fen());
            println!("{outcome}");
        }
    }

    Ok(())
}

fn apply_overrides(
    config: &mut EngineConfig,
    time_ms: Option<u64>,
    depth: Option<u32>,
    max_plies: Option<u32>,
) {
    if let Some(ms) = time_ms {
        config.time_budget_ms = ms;
    }
    if depth.is_some() {
        config.max_depth = depth;
    }
    if let Some(plies) = max_plies {
        config.max_plies = plies;
    }
}

fn load_position(fen: Option<&str>) -> anyhow::Result<Position> {
    let Some(fen) = fen else {
        return Ok(Position::startpos());
    };
    Position::from_fen(fen).map_err(|e| {
        tracing::warn!(fen, error = %e, "rejected position");
        anyhow::Error::new(e)
    })
}

fn build_engine(config: &EngineConfig) -> anyhow::Result<Engine> {
    Ok(match config.load_tables()? {
        Some(tables) => Engine::with_evaluator(Evaluator::with_tables(tables)),
        None => Engine::new(),
    })
}

fn play_random_opening<R: Rng>(position: &mut Position, rng: &mut R, plies: u32) {
    for _ in 0..plies {
        let moves = generate_moves(position);
        let Some(&mv) = moves.as_slice().choose(rng) else {
            break;
        };
        position.make_move(mv);
    }
}

/// Plays until the game ends or the ply limit is hit. The transposition
/// table is cleared before every move.
fn self_play(engine: &mut Engine, position: &mut Position, config: &EngineConfig) -> String {
    let limits = config.limits();
    let mut moves = Vec::new();

    for _ in 0..config.max_plies {
        let state = game_state(position);
        if state.is_over() {
            return format!("{state} after {}", moves.join(" "));
        }

        engine.clear();
        let result = engine.search_with_limits(position, limits);
        let Some(mv) = result.best_move else {
            break;
        };
        tracing::debug!(mv = %mv, score = result.score, depth = result.depth, "self-play move");
        moves.push(mv.to_uci());
        position.make_move(mv);
    }

    match game_state(position) {
        GameState::Ongoing => format!(
            "unfinished after {} plies ({} ms per move)",
            moves.len(),
            config.time_budget_ms
        ),
        state => format!("{state} after {}", moves.join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_opening_is_reproducible_from_the_seed() {
        let mut first = Position::startpos();
        let mut second = Position::startpos();
        play_random_opening(&mut first, &mut StdRng::seed_from_u64(7), 10);
        play_random_opening(&mut second, &mut StdRng::seed_from_u64(7), 10);
        assert_eq!(first.to_fen(), second.to_fen());
        assert!(first.is_consistent());
    }

    #[test]
    fn random_opening_stops_when_the_game_is_over() {
        let mut position = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let before = position.to_fen();
        play_random_opening(&mut position, &mut StdRng::seed_from_u64(1), 5);
        assert_eq!(position.to_fen(), before);
    }

    #[test]
    fn flags_override_config() {
        let mut config = EngineConfig::default();
        apply_overrides(&mut config, Some(50), Some(3), None);
        assert_eq!(config.time_budget_ms, 50);
        assert_eq!(config.max_depth, Some(3));
        assert_eq!(config.max_plies, EngineConfig::default().max_plies);
    }
}
