//! Driver that schedules frames across several games

use crate::error::{Result, TileMatchError};
use crate::game_loop::GameLoop;

/// Driver limits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Scheduling rounds before giving up on unfinished games (None = until all end)
    pub max_frames: Option<u64>,
}

impl EngineConfig {
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }
}

/// How one game fared under the driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSummary {
    /// Index in the order games were added
    pub index: usize,
    /// Frames that completed
    pub frames: u64,
    pub points: i64,
    /// Whether the game reached game over
    pub ended: bool,
}

/// Runs games round-robin, one frame each per round
///
/// A game that reports `GameEnded` is no longer scheduled. Any other error
/// stops the driver.
pub struct GameEngine {
    games: Vec<Box<dyn GameLoop>>,
    config: EngineConfig,
}

impl GameEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            games: Vec::new(),
            config,
        }
    }

    pub fn add_game(&mut self, game: impl GameLoop + 'static) {
        self.games.push(Box::new(game));
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn games(&self) -> &[Box<dyn GameLoop>] {
        &self.games
    }

    /// Drive every game until it ends or the frame limit is hit
    pub fn run(&mut self) -> Result<Vec<GameSummary>> {
        let mut summaries: Vec<GameSummary> = (0..self.games.len())
            .map(|index| GameSummary {
                index,
                frames: 0,
                points: 0,
                ended: false,
            })
            .collect();

        let mut round = 0u64;
        while summaries.iter().any(|s| !s.ended) {
            if self.config.max_frames.is_some_and(|max| round >= max) {
                tracing::info!(round, "frame limit reached, stopping engine");
                break;
            }
            for (game, summary) in self.games.iter_mut().zip(summaries.iter_mut()) {
                if summary.ended {
                    continue;
                }
                match game.run_frame() {
                    Ok(_) => summary.frames += 1,
                    Err(TileMatchError::GameEnded) => {
                        tracing::info!(game = summary.index, frames = summary.frames, "game ended, no longer scheduling");
                        summary.ended = true;
                    }
                    Err(err) => return Err(err),
                }
                summary.points = game.state().score().points();
            }
            round += 1;
        }

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GameBoard;
    use crate::game_loop::{FramePacer, LoopConfig};
    use crate::matching::{MatchCondition, MatchFound};
    use crate::scoring::Scoring;
    use crate::state::GameState;
    use std::time::Duration;

    /// Ends itself after a fixed number of frames, scoring one point per frame
    struct Countdown {
        state: GameState,
        config: LoopConfig,
        pacer: FramePacer,
        remaining: u32,
        fail: bool,
    }

    impl Countdown {
        fn new(frames: u32) -> Self {
            Self {
                state: GameState::new(GameBoard::new(1, 1), Scoring::new()),
                config: LoopConfig::default().with_frame_delay(Duration::ZERO),
                pacer: FramePacer::new(Duration::ZERO),
                remaining: frames,
                fail: false,
            }
        }
    }

    impl GameLoop for Countdown {
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
            if self.fail {
                return Err(TileMatchError::IllegalContent("corrupt input".into()));
            }
            Ok(())
        }

        fn tick(&mut self) -> Result<()> {
            let point = MatchFound {
                value: 1,
                matching_tiles: Vec::new(),
            };
            self.state.adjust_score(&point);
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.state.end_game();
            }
            Ok(())
        }

        fn find_matches(&self, _rules: &[Box<dyn MatchCondition>]) -> Vec<MatchFound> {
            Vec::new()
        }

        fn update_view(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_runs_each_game_until_it_ends() {
        let mut engine = GameEngine::new(EngineConfig::default());
        engine.add_game(Countdown::new(2));
        engine.add_game(Countdown::new(5));
        let summaries = engine.run().unwrap();

        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.ended));
        assert_eq!((summaries[0].frames, summaries[0].points), (2, 2));
        assert_eq!((summaries[1].frames, summaries[1].points), (5, 5));
        assert!(engine.games().iter().all(|g| g.gameover()));
    }

    #[test]
    fn test_frame_limit() {
        let mut engine = GameEngine::new(EngineConfig::default().with_max_frames(3));
        engine.add_game(Countdown::new(10));
        let summaries = engine.run().unwrap();
        assert_eq!(summaries[0].frames, 3);
        assert!(!summaries[0].ended);
    }

    #[test]
    fn test_other_errors_stop_the_engine() {
        let mut engine = GameEngine::new(EngineConfig::default());
        let mut broken = Countdown::new(3);
        broken.fail = true;
        engine.add_game(broken);
        assert!(matches!(engine.run(), Err(TileMatchError::IllegalContent(_))));
    }

    #[test]
    fn test_empty_engine() {
        let mut engine = GameEngine::new(EngineConfig::default());
        assert!(engine.is_empty());
        assert!(engine.run().unwrap().is_empty());
    }
}
