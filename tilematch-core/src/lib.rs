//! Tilematch Core - Engine for match-3 style tile games
//!
//! This crate provides the board/state/loop triad that concrete games plug
//! their rules into:
//! - Tiles and a fixed-size board with bounds and occupancy checks
//! - Transactional movement rules with automatic rollback
//! - Directional match conditions and board scanning
//! - Score accumulation with a settable multiplier
//! - Game state orchestration and a per-frame loop with cascades
//! - View hand-off queues and a multi-game driver

pub mod board;
pub mod builder;
pub mod engine;
pub mod error;
pub mod game_loop;
pub mod group;
pub mod matching;
pub mod movement;
pub mod scoring;
pub mod state;
pub mod tile;
pub mod view;

// Re-exports for convenient access
pub use board::{BoardSnapshot, GameBoard};
pub use builder::{BoardFactory, TileBuilder, TileSpec};
pub use engine::{EngineConfig, GameEngine, GameSummary};
pub use error::{Result, TileMatchError};
pub use game_loop::{FramePacer, FrameReport, GameLoop, LoopConfig};
pub use group::TileGroup;
pub use matching::{scan_board, EqualityRule, MatchCondition, MatchFound, MatchScan, RunMatch, ScanDelta};
pub use movement::{MoveOutcome, MovementRule, Shift};
pub use scoring::Scoring;
pub use state::{GameSnapshot, GameState};
pub use tile::{Position, Tile, TileAppearance, TileColor, TileKind, TileShape};
pub use view::{ChannelView, GameView, InputEvent, InputQueue, InputSender};
