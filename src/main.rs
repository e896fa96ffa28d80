//! Tile-swap runner (default binary).
//!
//! `serve` answers line-delimited JSON requests on stdin/stdout.
//! `play` runs greedy autoplay headlessly and prints a summary.

use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;

use tile_swap::adapter::Adapter;
use tile_swap::core::{EngineConfig, GameSession};
use tile_swap::engine::autoplay;
use tile_swap::types::{
    DEFAULT_COLS, DEFAULT_MOVE_BUDGET, DEFAULT_ROWS, DEFAULT_TARGET_SCORE, DEFAULT_TILE_KINDS,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Match-3 board engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer JSON requests on stdin, one per line
    Serve {
        #[command(flatten)]
        board: BoardArgs,
        #[arg(long, default_value_t = 1)]
        seed: u32,
    },
    /// Play greedy moves until the session ends
    Play {
        #[command(flatten)]
        board: BoardArgs,
        /// Seed of the first game; later games use seed + 1, seed + 2, ...
        #[arg(long, default_value_t = 1)]
        seed: u32,
        #[arg(long, default_value_t = 1, value_name = "N")]
        games: u32,
        /// Stop a game after this many moves even if budget remains
        #[arg(long, default_value_t = 10_000, value_name = "N")]
        max_moves: u32,
        /// Print the final board of each game
        #[arg(long)]
        show_board: bool,
    },
}

#[derive(Debug, Clone, Copy, Args)]
struct BoardArgs {
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: u8,
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: u8,
    /// Number of distinct tile kinds
    #[arg(long, default_value_t = DEFAULT_TILE_KINDS)]
    tile_kinds: u8,
    #[arg(long, default_value_t = DEFAULT_MOVE_BUDGET)]
    move_budget: u32,
    #[arg(long, default_value_t = DEFAULT_TARGET_SCORE)]
    target_score: u32,
}

impl From<BoardArgs> for EngineConfig {
    fn from(a: BoardArgs) -> Self {
        Self {
            rows: a.rows,
            cols: a.cols,
            tile_kinds: a.tile_kinds,
            move_budget: a.move_budget,
            target_score: a.target_score,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match cli.command {
        Command::Serve { board, seed } => serve(board.into(), seed),
        Command::Play {
            board,
            seed,
            games,
            max_moves,
            show_board,
        } => play(board.into(), seed, games, max_moves, show_board),
    }
}

fn serve(config: EngineConfig, seed: u32) -> Result<()> {
    let mut adapter = Adapter::new(config, seed).context("invalid board configuration")?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    adapter.serve(stdin.lock(), BufWriter::new(stdout.lock()))
}

fn play(config: EngineConfig, seed: u32, games: u32, max_moves: u32, show_board: bool) -> Result<()> {
    let mut total_score = 0u64;
    let mut reached = 0u32;

    for game in 0..games.max(1) {
        let game_seed = seed.wrapping_add(game);
        let mut session =
            GameSession::new(config, game_seed).context("invalid board configuration")?;
        let summary = autoplay(&mut session, max_moves);

        println!(
            "seed {:>6}: score {:>6} in {:>3} move(s), {} reshuffle(s), {}",
            game_seed,
            summary.score,
            summary.moves_played,
            summary.reshuffles,
            summary.outcome.as_str()
        );
        if show_board {
            print!("{}", session.board());
        }

        total_score += summary.score as u64;
        if summary.score >= config.target_score {
            reached += 1;
        }
    }

    let games = games.max(1);
    info!(
        "{} game(s), mean score {:.1}, target {} reached in {}",
        games,
        total_score as f64 / games as f64,
        config.target_score,
        reached
    );
    Ok(())
}
