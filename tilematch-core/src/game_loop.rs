//! Per-frame game loop
//!
//! One frame runs, in order:
//! 1. game-over check (fails with `GameEnded`)
//! 2. frame pacing
//! 3. input handling
//! 4. idle tick
//! 5. find/clear passes until no match remains (cascades)
//! 6. view update
//!
//! Concrete games implement [`GameLoop`]; [`GameLoop::run_frame`] supplies
//! the sequencing.

use std::time::{Duration, Instant};

use crate::error::{Result, TileMatchError};
use crate::matching::{MatchCondition, MatchFound};
use crate::state::GameState;

/// Loop timing and safety limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopConfig {
    /// Minimum time between frames
    pub frame_delay: Duration,
    /// Find/clear passes allowed per frame
    pub max_cascades: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_delay: Duration::from_nanos(1_000_000_000 / 60),
            max_cascades: 64,
        }
    }
}

impl LoopConfig {
    /// Config targeting `fps` frames per second
    pub fn from_fps(fps: u32) -> Self {
        Self {
            frame_delay: Duration::from_nanos(1_000_000_000 / fps.max(1) as u64),
            ..Default::default()
        }
    }

    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    pub fn with_max_cascades(mut self, max_cascades: usize) -> Self {
        self.max_cascades = max_cascades;
        self
    }
}

/// Blocks until a frame period has passed since the previous wait
///
/// The first wait is measured from construction.
#[derive(Clone, Debug)]
pub struct FramePacer {
    frame_delay: Duration,
    last: Instant,
}

impl FramePacer {
    pub fn new(frame_delay: Duration) -> Self {
        Self {
            frame_delay,
            last: Instant::now(),
        }
    }

    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    /// Sleep out the rest of the frame, returning how long it slept
    pub fn wait(&mut self) -> Duration {
        let elapsed = self.last.elapsed();
        let remaining = self.frame_delay.saturating_sub(elapsed);
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        self.last = Instant::now();
        remaining
    }
}

/// What one frame did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Find/clear passes that cleared something
    pub cascades: usize,
    pub matches_cleared: usize,
    pub points_awarded: i64,
}

/// A concrete game's loop
pub trait GameLoop {
    fn state(&self) -> &GameState;

    fn state_mut(&mut self) -> &mut GameState;

    fn config(&self) -> &LoopConfig;

    fn pacer(&mut self) -> &mut FramePacer;

    /// Apply pending input. Must not block when no input is waiting.
    fn handle_input(&mut self) -> Result<()>;

    /// Advance state that does not depend on input (gravity, timers)
    fn tick(&mut self) -> Result<()>;

    /// All matches on the current board for this pass
    fn find_matches(&self, rules: &[Box<dyn MatchCondition>]) -> Vec<MatchFound>;

    /// Hand the current state to the view
    fn update_view(&mut self) -> Result<()>;

    /// Clear each match, then score it, returning the points added
    fn clear_matches(&mut self, matches: &[MatchFound]) -> Result<i64> {
        let mut points = 0;
        for found in matches {
            self.state_mut().clear_match(found)?;
            points += self.state_mut().adjust_score(found);
        }
        Ok(points)
    }

    /// Called before clearing cascade pass `pass` (0-based)
    fn on_cascade(&mut self, _pass: usize) {}

    /// Called after each clear so the board can settle before the next scan
    fn settle(&mut self) -> Result<()> {
        Ok(())
    }

    fn gameover(&self) -> bool {
        self.state().gameover()
    }

    fn await_delay(&mut self) {
        self.pacer().wait();
    }

    /// Run one frame
    fn run_frame(&mut self) -> Result<FrameReport> {
        if self.gameover() {
            return Err(TileMatchError::GameEnded);
        }

        self.await_delay();
        self.handle_input()?;
        self.tick()?;

        let mut report = FrameReport::default();
        let max_cascades = self.config().max_cascades;
        loop {
            let matches = self.find_matches(self.state().match_rules());
            if matches.is_empty() {
                break;
            }
            if report.cascades >= max_cascades {
                tracing::warn!(max_cascades, "cascade limit reached, deferring remaining matches");
                break;
            }
            self.on_cascade(report.cascades);
            report.points_awarded += self.clear_matches(&matches)?;
            report.matches_cleared += matches.len();
            report.cascades += 1;
            self.settle()?;
        }

        self.update_view()?;
        tracing::debug!(
            cascades = report.cascades,
            matches = report.matches_cleared,
            points = report.points_awarded,
            "frame complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GameBoard;
    use crate::builder::TileBuilder;
    use crate::matching::{scan_board, RunMatch, ScanDelta};
    use crate::movement::Shift;
    use crate::scoring::Scoring;
    use crate::tile::{Position, TileColor};

    /// Records the order of loop phases
    struct ScriptedLoop {
        state: GameState,
        config: LoopConfig,
        pacer: FramePacer,
        log: Vec<&'static str>,
        pending_swap: Option<(Position, Position)>,
        gravity: bool,
        views: usize,
    }

    impl ScriptedLoop {
        fn new(board: GameBoard) -> Self {
            let mut state = GameState::new(board, Scoring::new());
            state.add_match_condition(RunMatch::new(ScanDelta::Right, 10, 3));
            state.add_match_condition(RunMatch::new(ScanDelta::Up, 10, 3));
            let config = LoopConfig::default().with_frame_delay(Duration::ZERO);
            Self {
                state,
                config,
                pacer: FramePacer::new(Duration::ZERO),
                log: Vec::new(),
                pending_swap: None,
                gravity: false,
                views: 0,
            }
        }
    }

    impl GameLoop for ScriptedLoop {
        fn state(&self) -> &GameState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut GameState {
            &mut self.state
        }

        fn config(&self) -> &LoopConfig {
            &self.config
        }

        fn pacer(&mut self) -> &mut FramePacer {
            &mut self.pacer
        }

        fn handle_input(&mut self) -> Result<()> {
            self.log.push("input");
            if let Some((a, b)) = self.pending_swap.take() {
                self.state.swap_at(a, b)?;
            }
            Ok(())
        }

        fn tick(&mut self) -> Result<()> {
            self.log.push("tick");
            Ok(())
        }

        fn find_matches(&self, rules: &[Box<dyn MatchCondition>]) -> Vec<MatchFound> {
            scan_board(self.state.board(), rules)
        }

        fn settle(&mut self) -> Result<()> {
            self.log.push("settle");
            if !self.gravity {
                return Ok(());
            }
            let (width, height) = (self.state.board().width() as i32, self.state.board().height() as i32);
            for x in 1..=width {
                for y in 2..=height {
                    let mut y = y;
                    while y > 1 && self.state.board().is_vacant(x, y - 1)? && !self.state.board().is_vacant(x, y)? {
                        self.state.move_tile_at(x, y, &mut Shift::DOWN)?;
                        y -= 1;
                    }
                }
            }
            Ok(())
        }

        fn update_view(&mut self) -> Result<()> {
            self.log.push("view");
            self.views += 1;
            Ok(())
        }
    }

    fn tile(x: i32, y: i32, color: TileColor) -> crate::tile::Tile {
        TileBuilder::new().position(x, y).color(color).construct().unwrap()
    }

    #[test]
    fn test_from_fps() {
        let config = LoopConfig::from_fps(50);
        assert_eq!(config.frame_delay, Duration::from_millis(20));
        assert_eq!(config.max_cascades, 64);
        assert_eq!(LoopConfig::from_fps(0).frame_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_pacer_enforces_minimum_interval() {
        let mut pacer = FramePacer::new(Duration::from_millis(20));
        let start = Instant::now();
        pacer.wait();
        pacer.wait();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_frame_phase_order() {
        let mut game = ScriptedLoop::new(GameBoard::new(3, 3));
        let report = game.run_frame().unwrap();
        assert_eq!(report, FrameReport::default());
        assert_eq!(game.log, vec!["input", "tick", "view"]);
    }

    #[test]
    fn test_frame_clears_and_scores() {
        let mut board = GameBoard::new(3, 3);
        for x in 1..=3 {
            board.place_tile(tile(x, 1, TileColor::Red)).unwrap();
        }
        let mut game = ScriptedLoop::new(board);
        let report = game.run_frame().unwrap();
        assert_eq!(report.cascades, 1);
        assert_eq!(report.matches_cleared, 1);
        assert_eq!(report.points_awarded, 10);
        assert_eq!(game.state().score().points(), 10);
        assert_eq!(game.state().board().occupied(), 0);
        assert_eq!(game.log, vec!["input", "tick", "settle", "view"]);
    }

    #[test]
    fn test_swap_input_triggers_cascade() {
        // . . B      the swap completes the red row; once it clears,
        // R B .      gravity drops the blues into a second row
        // B R R  <-  (1,1) and (1,2) swap
        let mut board = GameBoard::new(3, 3);
        board.place_tile(tile(1, 1, TileColor::Blue)).unwrap();
        board.place_tile(tile(1, 2, TileColor::Red)).unwrap();
        board.place_tile(tile(2, 1, TileColor::Red)).unwrap();
        board.place_tile(tile(3, 1, TileColor::Red)).unwrap();
        board.place_tile(tile(2, 2, TileColor::Blue)).unwrap();
        board.place_tile(tile(3, 3, TileColor::Blue)).unwrap();

        let mut game = ScriptedLoop::new(board);
        game.gravity = true;
        game.pending_swap = Some((Position::new(1, 1), Position::new(1, 2)));

        let report = game.run_frame().unwrap();
        assert_eq!(report.cascades, 2);
        assert_eq!(report.points_awarded, 20);
        assert_eq!(game.state().board().occupied(), 0);
        assert_eq!(game.views, 1);
    }

    #[test]
    fn test_cascade_limit() {
        let mut board = GameBoard::new(3, 1);
        for x in 1..=3 {
            board.place_tile(tile(x, 1, TileColor::Red)).unwrap();
        }
        let mut game = ScriptedLoop::new(board);
        game.config = game.config.with_max_cascades(0);
        let report = game.run_frame().unwrap();
        assert_eq!(report.cascades, 0);
        assert_eq!(game.state().board().occupied(), 3);
        assert_eq!(game.views, 1);
    }

    #[test]
    fn test_gameover_halts_frame() {
        let mut board = GameBoard::new(3, 3);
        for x in 1..=3 {
            board.place_tile(tile(x, 1, TileColor::Red)).unwrap();
        }
        let mut game = ScriptedLoop::new(board);
        game.state_mut().end_game();

        assert_eq!(game.run_frame().unwrap_err(), TileMatchError::GameEnded);
        assert!(game.log.is_empty());
        assert_eq!(game.state().board().occupied(), 3);
        assert_eq!(game.state().score().points(), 0);
    }
}
