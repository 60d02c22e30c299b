//! Play command - watch the bot play one game of gems
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: spawn_renderer(), play_game(), report_result()
//! - Level 3: render_loop()
//! - Level 4: configuration from args

use std::io::Write;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use clap::Args;

use tilematch_core::{ChannelView, GameLoop, GameSnapshot, LoopConfig, TileMatchError};

use crate::gems::{GemsConfig, GemsGame};
use crate::render;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board width
    #[arg(long, default_value = "8")]
    pub width: u16,

    /// Board height
    #[arg(long, default_value = "8")]
    pub height: u16,

    /// Number of tile colours (2-7)
    #[arg(long, default_value = "5")]
    pub colors: usize,

    /// Swaps before the game ends
    #[arg(long, default_value = "20")]
    pub moves: u32,

    /// Frames per second
    #[arg(long, default_value = "4")]
    pub fps: u32,

    /// Stop after this many frames even if the game is still running
    #[arg(long, default_value = "10000")]
    pub max_frames: u64,

    /// Snapshots buffered for the render thread
    #[arg(long, default_value = "2")]
    pub queue: usize,

    /// Plain letters without terminal colours
    #[arg(long)]
    pub no_color: bool,
}

impl PlayArgs {
    fn gems_config(&self) -> GemsConfig {
        GemsConfig::default()
            .with_size(self.width, self.height)
            .with_colors(self.colors)
            .with_moves(self.moves)
            .with_loop_config(LoopConfig::from_fps(self.fps))
    }
}

/// How the game went
#[derive(Clone, Copy, Debug)]
struct PlayResult {
    frames: u64,
    points: i64,
    moves: u32,
    finished: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// This function reads like a table of contents:
/// 1. Start the render thread behind a bounded snapshot queue
/// 2. Play the game on this thread
/// 3. Close the queue, wait for the renderer, report
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let seed = seed.unwrap_or(42);
    tracing::info!(
        "Starting gems: {}x{}, {} colours, {} moves, seed {}",
        args.width,
        args.height,
        args.colors,
        args.moves,
        seed
    );

    let (view, snapshots) = ChannelView::bounded(args.queue.max(1));
    let renderer = spawn_renderer(snapshots, !args.no_color);

    let game = GemsGame::new(args.gems_config(), seed)
        .context("Failed to set up the board")?
        .with_autoplay()
        .with_view(Box::new(view));
    let result = play_game(game, args.max_frames)?;

    let rendered = renderer.join().map_err(|_| anyhow!("Render thread panicked"))?;
    tracing::info!(rendered, frames = result.frames, "renderer finished");

    report_result(&result);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn spawn_renderer(snapshots: Receiver<GameSnapshot>, color: bool) -> JoinHandle<u64> {
    thread::spawn(move || render_loop(snapshots, color))
}

/// Run frames until game over; dropping the game closes the view queue
fn play_game(mut game: GemsGame, max_frames: u64) -> Result<PlayResult> {
    let mut frames = 0;
    let finished = loop {
        if frames >= max_frames {
            tracing::warn!(max_frames, "frame limit reached");
            break false;
        }
        match game.run_frame() {
            Ok(report) => {
                frames += 1;
                if report.cascades > 1 {
                    tracing::info!(cascades = report.cascades, points = report.points_awarded, "combo");
                }
            }
            Err(TileMatchError::GameEnded) => break true,
            Err(err) => return Err(err).context(format!("Frame {} failed", frames + 1)),
        }
    };

    Ok(PlayResult {
        frames,
        points: game.state().score().points(),
        moves: game.moves_made(),
        finished,
    })
}

fn report_result(result: &PlayResult) {
    println!("\n=== Game Result ===");
    println!("Score:   {}", result.points);
    println!("Moves:   {}", result.moves);
    println!("Frames:  {}", result.frames);
    if !result.finished {
        println!("(stopped before game over)");
    }
}

// ============================================================================
// LEVEL 3 - RENDERING
// ============================================================================

/// Draw every snapshot until the game side hangs up, returning how many were drawn
fn render_loop(snapshots: Receiver<GameSnapshot>, color: bool) -> u64 {
    let mut rendered = 0;
    for snapshot in snapshots {
        print!("\x1b[2J\x1b[H{}", render::render_snapshot(&snapshot, color));
        let _ = std::io::stdout().flush();
        rendered += 1;
    }
    rendered
}

// ============================================================================
// TESTS
// ============================================================================
