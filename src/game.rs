//! Core game state and logic

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board, LockConflict};
use crate::collision::{self, MoveResult};
use crate::piece::{Piece, RotationDirection};
use crate::randomizer::Randomizer;
use crate::score::Score;
use crate::settings::{ConfigError, MIN_BOARD_SIDE};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Default time between gravity ticks
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Session constants. Fixed for the lifetime of a `Game`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    width: usize,
    height: usize,
    tick_interval: Duration,
    /// Column where a new piece's grid starts
    spawn_x: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            tick_interval: TICK_INTERVAL,
            spawn_x: (BOARD_WIDTH / 2) as i32 - 2,
        }
    }
}

impl GameConfig {
    /// Validate a board size, gravity interval and spawn column.
    /// Without a spawn column the piece grid starts at the center minus 2.
    pub fn new(
        width: usize,
        height: usize,
        tick_interval: Duration,
        spawn_x: Option<i32>,
    ) -> Result<Self, ConfigError> {
        if width < MIN_BOARD_SIDE || height < MIN_BOARD_SIDE {
            return Err(ConfigError::BoardTooSmall {
                width,
                height,
                min: MIN_BOARD_SIDE,
            });
        }
        if tick_interval.is_zero() {
            return Err(ConfigError::ZeroTick);
        }

        let spawn_x = spawn_x.unwrap_or((width / 2) as i32 - 2);
        if spawn_x < 0 || spawn_x as usize + MIN_BOARD_SIDE > width {
            return Err(ConfigError::SpawnOutOfRange {
                column: spawn_x,
                width,
            });
        }

        Ok(Self {
            width,
            height,
            tick_interval,
            spawn_x,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn spawn_x(&self) -> i32 {
        self.spawn_x
    }
}

/// Faults that end a session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// A piece that passed every collision check overlapped the board on lock
    #[error("board invariant broken: {0}")]
    LockConflict(#[from] LockConflict),
}

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Before the first start, or after a reset
    Idle,
    Running,
    Paused,
    /// A new piece could not spawn
    Terminal,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCW,
    RotateCCW,
    Start,
    Pause,
    Reset,
    Quit,
}

/// Notifications for the presentation layer, drained with `take_events`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Something visible changed
    Redraw,
    /// The score went up; carries the new total
    ScoreChanged(u64),
    /// A lock cleared this many rows
    LinesCleared(usize),
    /// The session entered `Terminal`
    GameOver,
}

/// The main game struct
pub struct Game {
    config: GameConfig,
    board: Board,
    /// Current falling piece
    active: Piece,
    /// Piece that spawns after the active one locks
    next: Piece,
    score: Score,
    state: GameState,
    randomizer: Randomizer,
    /// Running time not yet consumed by gravity ticks
    pending: Duration,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a new game with a random piece sequence
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Create a new game with a reproducible piece sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut randomizer = Randomizer::with_seed(seed);
        let active = Piece::spawn(randomizer.next(), config.spawn_x);
        let next = Piece::spawn(randomizer.next(), config.spawn_x);

        Self {
            config,
            board: Board::new(config.width, config.height),
            active,
            next,
            score: Score::new(),
            state: GameState::Idle,
            randomizer,
            pending: Duration::ZERO,
            events: vec![GameEvent::Redraw],
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Rows the active piece can still fall, for the landing outline
    pub fn landing_offset(&self) -> i32 {
        collision::landing_offset(&self.active, &self.board)
    }

    /// Drain pending notifications
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) -> Result<(), GameError> {
        match action {
            Action::MoveLeft => {
                self.move_left();
            }
            Action::MoveRight => {
                self.move_right();
            }
            Action::RotateCW => {
                self.rotate_cw();
            }
            Action::RotateCCW => {
                self.rotate_ccw();
            }
            Action::SoftDrop => self.soft_drop()?,
            Action::HardDrop => self.hard_drop()?,
            Action::Start => self.start(),
            Action::Pause => self.pause(),
            Action::Reset => self.reset(),
            // Leaving the program is the caller's business
            Action::Quit => {}
        }
        Ok(())
    }

    /// Begin or resume automatic descent
    pub fn start(&mut self) {
        if matches!(self.state, GameState::Idle | GameState::Paused) {
            info!(from = ?self.state, "game running");
            self.state = GameState::Running;
            self.pending = Duration::ZERO;
        }
    }

    /// Stop automatic descent and ignore input until started again
    pub fn pause(&mut self) {
        if self.state == GameState::Running {
            info!("game paused");
            self.state = GameState::Paused;
            self.pending = Duration::ZERO;
        }
    }

    /// Discard the board, score and both pieces and return to `Idle`
    pub fn reset(&mut self) {
        info!(score = self.score.points, "game reset");
        self.board.reset();
        self.score.reset();
        self.active = self.spawn();
        self.next = self.spawn();
        self.state = GameState::Idle;
        self.pending = Duration::ZERO;
        self.events.push(GameEvent::Redraw);
    }

    /// Advance the clock; fires one gravity tick per full interval
    pub fn advance(&mut self, elapsed: Duration) -> Result<(), GameError> {
        if self.state != GameState::Running {
            return Ok(());
        }

        self.pending += elapsed;
        while self.state == GameState::Running && self.pending >= self.config.tick_interval {
            self.pending -= self.config.tick_interval;
            self.tick()?;
        }
        Ok(())
    }

    /// One gravity step
    pub fn tick(&mut self) -> Result<(), GameError> {
        if self.state != GameState::Running {
            return Ok(());
        }
        self.step_down()
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.rotate(RotationDirection::Clockwise)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.rotate(RotationDirection::CounterClockwise)
    }

    /// Move down one row, locking if the piece is resting
    pub fn soft_drop(&mut self) -> Result<(), GameError> {
        if self.state != GameState::Running {
            return Ok(());
        }
        self.step_down()
    }

    /// Drop to the floor and lock once
    pub fn hard_drop(&mut self) -> Result<(), GameError> {
        if self.state != GameState::Running {
            return Ok(());
        }
        let distance = collision::drop_to_floor(&mut self.active, &self.board);
        debug!(distance, "hard drop");
        self.lock_and_spawn()
    }

    fn shift(&mut self, dx: i32) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let result = collision::attempt_move(&mut self.active, &self.board, dx, 0);
        self.redraw_if_moved(result)
    }

    fn rotate(&mut self, direction: RotationDirection) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let result = collision::attempt_rotate(&mut self.active, &self.board, direction);
        self.redraw_if_moved(result)
    }

    fn redraw_if_moved(&mut self, result: MoveResult) -> bool {
        if result.is_moved() {
            self.events.push(GameEvent::Redraw);
        }
        result.is_moved()
    }

    fn step_down(&mut self) -> Result<(), GameError> {
        match collision::attempt_move(&mut self.active, &self.board, 0, 1) {
            MoveResult::Moved => {
                self.events.push(GameEvent::Redraw);
                Ok(())
            }
            MoveResult::Collided(_) => self.lock_and_spawn(),
        }
    }

    /// Commit the active piece, clear rows, score, and bring in the next piece
    fn lock_and_spawn(&mut self) -> Result<(), GameError> {
        if let Err(conflict) = self.board.lock(&self.active) {
            error!(%conflict, kind = ?self.active.kind, "lock conflict, ending session");
            self.enter_terminal();
            return Err(conflict.into());
        }

        let cleared = self.board.clear_full_rows();
        let award = self.score.add_clear(cleared);
        if cleared > 0 {
            self.events.push(GameEvent::LinesCleared(cleared));
        }
        if award > 0 {
            debug!(cleared, award, total = self.score.points, "score");
            self.events.push(GameEvent::ScoreChanged(self.score.points));
        }

        let next = self.spawn();
        self.active = std::mem::replace(&mut self.next, next);
        debug!(kind = %self.active.kind.symbol(), "piece spawned");

        if collision::check(&self.active, &self.board).is_some() {
            info!(score = self.score.points, lines = self.score.lines, "game over");
            self.enter_terminal();
        }
        self.events.push(GameEvent::Redraw);
        Ok(())
    }

    fn enter_terminal(&mut self) {
        self.state = GameState::Terminal;
        self.pending = Duration::ZERO;
        self.events.push(GameEvent::GameOver);
    }

    fn spawn(&mut self) -> Piece {
        Piece::spawn(self.randomizer.next(), self.config.spawn_x)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
