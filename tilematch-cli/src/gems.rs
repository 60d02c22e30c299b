//! Gems - a classic swap-to-match game built on the core traits
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: GemsGame as a GameLoop (input, tick, cascades, view)
//! - Level 2: click handling, collapse (gravity + refill)
//! - Level 3: Fall movement rule, seeded board fill
//! - Level 4: colour picking utilities

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tilematch_core::{
    scan_board, BoardFactory, FramePacer, GameBoard, GameLoop, GameState, GameView, InputEvent,
    InputQueue, InputSender, LoopConfig, MatchCondition, MatchFound, MovementRule, Position, Result,
    RunMatch, ScanDelta, Scoring, Tile, TileBuilder, TileColor, TileMatchError,
};

use crate::bot;

// ============================================================================
// CONFIGURATION (Level 4)
// ============================================================================

/// Gems game settings
#[derive(Clone, Debug)]
pub struct GemsConfig {
    pub width: u16,
    pub height: u16,
    /// Colours drawn from the palette (2-7)
    pub colors: usize,
    /// Successful swaps allowed before the game ends
    pub moves: u32,
    /// Points for each run, before the combo multiplier
    pub points_per_run: i64,
    pub min_run: usize,
    pub loop_config: LoopConfig,
}

impl Default for GemsConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            colors: 5,
            moves: 30,
            points_per_run: 10,
            min_run: 3,
            loop_config: LoopConfig::default(),
        }
    }
}

impl GemsConfig {
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_colors(mut self, colors: usize) -> Self {
        self.colors = colors.clamp(2, TileColor::PALETTE.len());
        self
    }

    pub fn with_moves(mut self, moves: u32) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_loop_config(mut self, loop_config: LoopConfig) -> Self {
        self.loop_config = loop_config;
        self
    }

    fn palette(&self) -> &'static [TileColor] {
        let all: &'static [TileColor] = &TileColor::PALETTE;
        &all[..self.colors.clamp(2, all.len())]
    }
}

// ============================================================================
// MOVEMENT
// ============================================================================

/// Drops a tile through the vacant cells directly below it
#[derive(Clone, Copy, Debug, Default)]
pub struct Fall;

impl MovementRule for Fall {
    fn apply(&mut self, board: &mut GameBoard, tile: &mut Tile) -> Result<()> {
        let Position { x, y } = tile.position();
        let mut floor = y;
        while floor > 1 && board.is_vacant(x, floor - 1)? {
            floor -= 1;
        }
        if floor == y {
            return Err(TileMatchError::IllegalMovement(format!(
                "nothing to fall into below {}",
                tile.position()
            )));
        }
        tile.set_position((x, floor));
        board.place_tile(tile.clone())
    }

    fn name(&self) -> &str {
        "fall"
    }
}

// ============================================================================
// GAME (Level 1)
// ============================================================================

/// One game of gems
///
/// Clicks arrive through an [`InputQueue`]: the first selects a cell, a
/// second click on a neighbour swaps the two. Swaps that make no match are
/// undone and do not cost a move.
pub struct GemsGame {
    state: GameState,
    config: GemsConfig,
    pacer: FramePacer,
    rng: ChaCha8Rng,
    input: InputQueue,
    clicks: InputSender,
    autoplay: bool,
    selected: Option<Position>,
    moves_made: u32,
    view: Option<Box<dyn GameView>>,
}

impl GemsGame {
    /// New game on a freshly filled board with no ready-made runs
    pub fn new(config: GemsConfig, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let board = fill_board(&config, &mut rng)?;
        Ok(Self::with_rng(config, board, rng))
    }

    /// New game on a prepared board; refills still draw from `seed`
    pub fn from_board(config: GemsConfig, board: GameBoard, seed: u64) -> Self {
        Self::with_rng(config, board, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(config: GemsConfig, board: GameBoard, rng: ChaCha8Rng) -> Self {
        let mut state = GameState::new(board, Scoring::new());
        state.add_match_condition(RunMatch::new(ScanDelta::Right, config.points_per_run, config.min_run));
        state.add_match_condition(RunMatch::new(ScanDelta::Up, config.points_per_run, config.min_run));

        let (clicks, input) = InputQueue::channel();
        Self {
            state,
            pacer: FramePacer::new(config.loop_config.frame_delay),
            config,
            rng,
            input,
            clicks,
            autoplay: false,
            selected: None,
            moves_made: 0,
            view: None,
        }
    }

    /// Let the bot pick every swap
    pub fn with_autoplay(mut self) -> Self {
        self.autoplay = true;
        self
    }

    pub fn with_view(mut self, view: Box<dyn GameView>) -> Self {
        self.view = Some(view);
        self
    }

    /// Handle for feeding clicks and keys into this game
    pub fn input_sender(&self) -> InputSender {
        self.clicks.clone()
    }

    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    // ========================================================================
    // LEVEL 2 - INPUT
    // ========================================================================

    fn click(&mut self, pos: Position) -> Result<()> {
        if !self.state.board().contains(pos.x, pos.y) {
            tracing::warn!(%pos, "click outside the board ignored");
            return Ok(());
        }
        match self.selected.take() {
            Some(first) if first.is_adjacent(pos) => self.try_swap(first, pos),
            _ => {
                self.selected = Some(pos);
                Ok(())
            }
        }
    }

    fn try_swap(&mut self, a: Position, b: Position) -> Result<()> {
        self.state.swap_at(a, b)?;
        if bot::matches_through(self.state.board(), self.state.match_rules(), &[a, b]).is_empty() {
            self.state.swap_at(a, b)?;
            tracing::debug!(%a, %b, "swap made no match, undone");
            return Ok(());
        }
        self.moves_made += 1;
        tracing::info!(%a, %b, moves = self.moves_made, "swap");
        Ok(())
    }

    // ========================================================================
    // LEVEL 2 - BOARD UPKEEP
    // ========================================================================

    /// Let tiles fall into gaps, then top up every vacant cell
    fn collapse(&mut self) -> Result<()> {
        let (width, height) = (self.state.board().width() as i32, self.state.board().height() as i32);
        for x in 1..=width {
            for y in 2..=height {
                if !self.state.board().is_vacant(x, y)? && self.state.board().is_vacant(x, y - 1)? {
                    self.state.move_tile_at(x, y, &mut Fall)?;
                }
            }
        }

        let palette = self.config.palette();
        for x in 1..=width {
            for y in 1..=height {
                if self.state.board().is_vacant(x, y)? {
                    let color = pick_color(palette, &[], &mut self.rng);
                    self.state.board_mut().place_tile(gem(x, y, color)?)?;
                }
            }
        }
        Ok(())
    }
}

impl GameLoop for GemsGame {
    fn state(&self) -> &GameState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    fn config(&self) -> &LoopConfig {
        &self.config.loop_config
    }

    fn pacer(&mut self) -> &mut FramePacer {
        &mut self.pacer
    }

    fn handle_input(&mut self) -> Result<()> {
        if self.moves_made >= self.config.moves {
            self.state.end_game();
            return Ok(());
        }

        if self.selected.is_none() {
            match bot::best_swap(self.state.board(), self.state.match_rules()) {
                Some(swap) if self.autoplay => {
                    self.clicks.send(InputEvent::Mouse(swap.from));
                    self.clicks.send(InputEvent::Mouse(swap.to));
                }
                Some(_) => {}
                None => {
                    tracing::info!(moves = self.moves_made, "no swap left that makes a match");
                    self.state.end_game();
                    return Ok(());
                }
            }
        }

        while let Some(key) = self.input.key_event() {
            if key == 'q' {
                self.state.end_game();
            }
        }
        while let Some(pos) = self.input.mouse_event() {
            self.click(pos)?;
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<()> {
        self.state.score_mut().set_multiplier(1);
        self.collapse()
    }

    fn find_matches(&self, rules: &[Box<dyn MatchCondition>]) -> Vec<MatchFound> {
        scan_board(self.state.board(), rules)
    }

    fn on_cascade(&mut self, pass: usize) {
        self.state.score_mut().set_multiplier(1 + pass as i64);
    }

    fn settle(&mut self) -> Result<()> {
        self.collapse()
    }

    fn update_view(&mut self) -> Result<()> {
        if let Some(view) = self.view.as_mut() {
            view.update_game_state(self.state.snapshot());
        }
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - BOARD FILL
// ============================================================================

/// Fill every cell, never completing a run of three along a row or column
fn fill_board(config: &GemsConfig, rng: &mut ChaCha8Rng) -> Result<GameBoard> {
    let mut board = BoardFactory::create_board("gems", config.width, config.height);
    let palette = config.palette();
    for x in 1..=config.width as i32 {
        for y in 1..=config.height as i32 {
            let mut exclude = Vec::with_capacity(2);
            if let Some(color) = repeated_color(&board, (x - 1, y), (x - 2, y)) {
                exclude.push(color);
            }
            if let Some(color) = repeated_color(&board, (x, y - 1), (x, y - 2)) {
                exclude.push(color);
            }
            let color = pick_color(palette, &exclude, rng);
            board.place_tile(gem(x, y, color)?)?;
        }
    }
    Ok(board)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn gem(x: i32, y: i32, color: TileColor) -> Result<Tile> {
    TileBuilder::new().position(x, y).color(color).construct()
}

/// Colour shared by two filled cells, if they agree
fn repeated_color(board: &GameBoard, a: (i32, i32), b: (i32, i32)) -> Option<TileColor> {
    let first = board.tile_at(a.0, a.1).ok().filter(|t| !t.is_empty())?;
    let second = board.tile_at(b.0, b.1).ok().filter(|t| !t.is_empty())?;
    (first.color() == second.color()).then(|| first.color())
}

/// Random palette colour outside `exclude`, or any colour if all are excluded
fn pick_color(palette: &[TileColor], exclude: &[TileColor], rng: &mut ChaCha8Rng) -> TileColor {
    let allowed: Vec<TileColor> = palette.iter().copied().filter(|c| !exclude.contains(c)).collect();
    let pool = if allowed.is_empty() { palette } else { &allowed[..] };
    pool.choose(rng).copied().unwrap_or(TileColor::Red)
}

// ============================================================================
// TESTS
// ============================================================================
