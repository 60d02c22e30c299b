//! Simulate command - run many bot games in parallel
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_games(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use rayon::prelude::*;
use serde::Serialize;

use tilematch_core::{EngineConfig, GameEngine, LoopConfig};

use crate::gems::{GemsConfig, GemsGame};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Board width
    #[arg(long, default_value = "8")]
    pub width: u16,

    /// Board height
    #[arg(long, default_value = "8")]
    pub height: u16,

    /// Number of tile colours (2-7)
    #[arg(long, default_value = "5")]
    pub colors: usize,

    /// Swaps per game
    #[arg(long, default_value = "30")]
    pub moves: u32,

    /// Frame limit per game
    #[arg(long, default_value = "10000")]
    pub max_frames: u64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl SimulateArgs {
    fn gems_config(&self) -> GemsConfig {
        GemsConfig::default()
            .with_size(self.width, self.height)
            .with_colors(self.colors)
            .with_moves(self.moves)
            .with_loop_config(LoopConfig::default().with_frame_delay(Duration::ZERO))
    }
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    points: i64,
    frames: u64,
    finished: bool,
}

/// Aggregated results
#[derive(Clone, Debug, Serialize)]
struct SimulationResults {
    total_games: usize,
    finished: usize,
    avg_points: f64,
    min_points: i64,
    max_points: i64,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// This function reads like a table of contents:
/// 1. Play every game in parallel, each with its own seed
/// 2. Aggregate the scores
/// 3. Report results
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let base_seed = seed.unwrap_or(42);
    tracing::info!(
        "Simulating {} games: {}x{}, {} colours, {} moves, base seed {}",
        args.games,
        args.width,
        args.height,
        args.colors,
        args.moves,
        base_seed
    );

    let games = run_games(&args.gems_config(), args.games, args.max_frames, base_seed)?;
    let results = compute_statistics(games);

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games using rayon; game `i` uses `base_seed + i`
fn run_games(config: &GemsConfig, games: usize, max_frames: u64, base_seed: u64) -> Result<Vec<GameRecord>> {
    (0..games)
        .into_par_iter()
        .map(|i| play_single_game(config, i + 1, base_seed.wrapping_add(i as u64), max_frames))
        .collect()
}

fn report_results(results: &SimulationResults, args: &SimulateArgs) -> Result<()> {
    if args.json {
        let json = serde_json::to_string_pretty(results).context("Failed to serialize results")?;
        println!("{}", json);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to the end under the engine driver
fn play_single_game(config: &GemsConfig, game_number: usize, seed: u64, max_frames: u64) -> Result<GameRecord> {
    let game = GemsGame::new(config.clone(), seed)
        .with_context(|| format!("Failed to set up game {}", game_number))?
        .with_autoplay();

    let mut engine = GameEngine::new(EngineConfig::default().with_max_frames(max_frames));
    engine.add_game(game);
    let summaries = engine
        .run()
        .with_context(|| format!("Game {} (seed {}) failed", game_number, seed))?;

    let summary = summaries
        .first()
        .context("Engine returned no summary")?;
    tracing::info!(game = game_number, points = summary.points, frames = summary.frames, "game finished");

    Ok(GameRecord {
        game_number,
        seed,
        points: summary.points,
        frames: summary.frames,
        finished: summary.ended,
    })
}

/// Compute aggregate statistics from game records
fn compute_statistics(games: Vec<GameRecord>) -> SimulationResults {
    let total_games = games.len();
    let finished = games.iter().filter(|g| g.finished).count();
    let total_points: i64 = games.iter().map(|g| g.points).sum();
    let avg_points = if games.is_empty() {
        0.0
    } else {
        total_points as f64 / total_games as f64
    };

    SimulationResults {
        total_games,
        finished,
        avg_points,
        min_points: games.iter().map(|g| g.points).min().unwrap_or(0),
        max_points: games.iter().map(|g| g.points).max().unwrap_or(0),
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_text_results(results: &SimulationResults) {
    println!("\n=== Simulation Results ===");
    println!("Total games: {}", results.total_games);
    println!("Finished:    {}", results.finished);
    println!("Avg points:  {:.1}", results.avg_points);
    println!("Min points:  {}", results.min_points);
    println!("Max points:  {}", results.max_points);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {} (seed {}): {} points in {} frames{}",
            game.game_number,
            game.seed,
            game.points,
            game.frames,
            if game.finished { "" } else { " (unfinished)" }
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
