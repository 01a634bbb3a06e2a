//! Game module - the engine state machine
//!
//! Owns the grid, the falling piece, its ghost, the preview queue and the hold
//! slot, and implements every rule that mutates them. The engine never
//! schedules anything itself: the host calls [`Game::apply_gravity`] from its
//! own timer, using [`Game::gravity_interval`] to know how often.
//!
//! States: `Active <-> Paused`, `Active -> GameOver` (terminal). Gameplay
//! operations are silent no-ops unless `Active`.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use log::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::grid::{ClearedRows, Grid};
use crate::pieces::Tetromino;
use crate::source::PieceSource;
use crate::types::{Direction, GameAction, PieceKind, Vector, SOFT_DROP_DIVISOR};

/// Host callback run once when the game ends; detaches the host's input.
pub type Teardown = Box<dyn FnOnce()>;

/// The active piece and its top-left anchor in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingTetromino {
    pub tetromino: Tetromino,
    pub pos: Vector,
}

impl FallingTetromino {
    /// A piece in its base rotation at its spawn anchor
    pub fn spawn(kind: PieceKind) -> Self {
        let tetromino = Tetromino::new(kind);
        Self {
            tetromino,
            pos: tetromino.spawn_position(),
        }
    }

    /// Absolute coordinates of the filled cells
    pub fn cells(&self) -> impl Iterator<Item = Vector> {
        self.tetromino.cells_at(self.pos)
    }
}

/// Last lock (consumed by observers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEvent {
    pub piece: PieceKind,
    pub pos: Vector,
    pub cleared_rows: ClearedRows,
}

/// What a gravity tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityStep {
    /// The piece fell one row
    Moved,
    /// The piece locked and the next one spawned
    Locked,
    /// The piece could not fall from the top rows
    GameOver,
    /// Paused or already over; nothing happened
    Halted,
}

/// Complete engine state
pub struct Game {
    grid: Grid,
    falling: FallingTetromino,
    ghost: FallingTetromino,
    preview: VecDeque<PieceKind>,
    holding: Option<PieceKind>,
    can_hold: bool,
    game_over: bool,
    paused: bool,
    soft_dropping: bool,
    base_gravity_delay_ms: u32,
    gravity_delay_ms: u32,
    source: Box<dyn PieceSource>,
    teardown: Option<Teardown>,
    last_event: Option<LockEvent>,
}

impl Game {
    /// Start a game on an empty grid
    pub fn new(config: EngineConfig, source: Box<dyn PieceSource>) -> Result<Self> {
        Self::from_grid(config, source, Grid::new())
    }

    /// Start a game on a preset grid.
    ///
    /// Fills the preview, spawns the first piece and runs one gravity tick.
    pub fn from_grid(
        config: EngineConfig,
        mut source: Box<dyn PieceSource>,
        grid: Grid,
    ) -> Result<Self> {
        config.validate()?;

        let mut preview: VecDeque<PieceKind> = (0..config.preview_amount)
            .map(|_| source.next_piece())
            .collect();
        let falling = FallingTetromino::spawn(draw_next(&mut preview, source.as_mut()));
        let ghost = landing(&grid, falling);

        let mut game = Self {
            grid,
            falling,
            ghost,
            preview,
            holding: None,
            can_hold: true,
            game_over: false,
            paused: false,
            soft_dropping: false,
            base_gravity_delay_ms: config.gravity_delay_ms,
            gravity_delay_ms: config.gravity_delay_ms,
            source,
            teardown: None,
            last_event: None,
        };
        game.apply_gravity();
        Ok(game)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn falling(&self) -> FallingTetromino {
        self.falling
    }

    /// Lowest reachable resting position of the falling piece.
    ///
    /// Refreshed after lateral moves, rotations and spawns, not after
    /// gravity ticks.
    pub fn ghost(&self) -> FallingTetromino {
        self.ghost
    }

    /// Upcoming pieces, front first
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.preview.iter().copied()
    }

    pub fn holding(&self) -> Option<PieceKind> {
        self.holding
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    /// Current gravity interval (halved while soft dropping)
    pub fn gravity_delay_ms(&self) -> u32 {
        self.gravity_delay_ms
    }

    /// Set the base gravity interval. Zero is ignored.
    pub fn set_gravity_delay_ms(&mut self, ms: u32) {
        if ms == 0 {
            warn!("ignoring non-positive gravity delay");
            return;
        }
        self.base_gravity_delay_ms = ms;
        self.gravity_delay_ms = self.effective_delay_ms();
    }

    /// How long the host should wait before the next tick; None while the
    /// host's timer should stay disarmed (paused or game over).
    pub fn gravity_interval(&self) -> Option<Duration> {
        if !self.is_active() {
            return None;
        }
        Some(Duration::from_millis(u64::from(self.gravity_delay_ms)))
    }

    /// Register the host's teardown. Runs it at once if the game is already over.
    pub fn set_teardown(&mut self, teardown: Teardown) {
        if self.game_over {
            teardown();
            return;
        }
        self.teardown = Some(teardown);
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    fn is_active(&self) -> bool {
        !self.game_over && !self.paused
    }

    fn effective_delay_ms(&self) -> u32 {
        if self.soft_dropping {
            (self.base_gravity_delay_ms / SOFT_DROP_DIVISOR).max(1)
        } else {
            self.base_gravity_delay_ms
        }
    }

    /// Try to shift the falling piece. Lateral moves refresh the ghost.
    pub fn move_tetromino(&mut self, dx: i32, dy: i32) -> bool {
        if !self.is_active() {
            return false;
        }

        let target = self.falling.pos + Vector::new(dx, dy);
        if !self.grid.fits(self.falling.tetromino.shape(), target) {
            return false;
        }

        self.falling.pos = target;
        if dy == 0 {
            self.ghost = landing(&self.grid, self.falling);
        }
        true
    }

    /// One gravity tick.
    ///
    /// A piece that cannot fall locks, unless it is still in the top rows
    /// (`y <= 0`), which ends the game. After a lock the next piece gets an
    /// immediate tick of its own.
    pub fn apply_gravity(&mut self) -> GravityStep {
        if !self.is_active() {
            return GravityStep::Halted;
        }

        let mut step = GravityStep::Moved;
        loop {
            if self.move_tetromino(0, 1) {
                return step;
            }
            if self.falling.pos.y <= 0 {
                self.end_game();
                return GravityStep::GameOver;
            }
            self.lock_at(self.falling.pos);
            step = GravityStep::Locked;
        }
    }

    /// Rotate with kicks: the first candidate offset that fits wins.
    pub fn rotate(&mut self, direction: Direction) -> bool {
        if !self.is_active() {
            return false;
        }

        let current = self.falling.tetromino;
        let rotated = current.rotated(direction);
        for &offset in current.kicks(direction) {
            let target = self.falling.pos + offset;
            if self.grid.fits(rotated.shape(), target) {
                trace!(
                    "{} rotated {} with kick {}",
                    current.kind,
                    direction.as_str(),
                    offset
                );
                self.falling = FallingTetromino {
                    tetromino: rotated,
                    pos: target,
                };
                self.ghost = landing(&self.grid, self.falling);
                return true;
            }
        }

        trace!("{} rotation {} rejected", current.kind, direction.as_str());
        false
    }

    /// Drop straight down, lock, spawn the next piece and tick once.
    pub fn hard_drop(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }

        let target = landing(&self.grid, self.falling);
        self.lock_at(target.pos);
        self.apply_gravity();
        true
    }

    /// Swap the falling piece with the hold slot, once per lock.
    pub fn hold(&mut self) -> bool {
        if !self.is_active() || !self.can_hold {
            return false;
        }

        let current = self.falling.tetromino.kind;
        let next = match self.holding.replace(current) {
            Some(held) => held,
            None => self.draw_next(),
        };
        self.falling = FallingTetromino::spawn(next);
        self.ghost = landing(&self.grid, self.falling);
        self.can_hold = false;
        true
    }

    /// Start or stop soft dropping. Starting ticks once right away.
    pub fn toggle_soft_drop(&mut self, active: bool) {
        if self.game_over || self.soft_dropping == active {
            return;
        }

        self.soft_dropping = active;
        self.gravity_delay_ms = self.effective_delay_ms();
        if active {
            self.apply_gravity();
        }
    }

    /// Toggle pause; returns the new paused state. Game over forces unpaused.
    pub fn pause(&mut self) -> bool {
        if self.game_over {
            self.paused = false;
            return false;
        }

        self.paused = !self.paused;
        info!("pause: {}", self.paused);
        self.paused
    }

    /// Apply a control action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_tetromino(-1, 0),
            GameAction::MoveRight => self.move_tetromino(1, 0),
            GameAction::RotateCw => self.rotate(Direction::Clockwise),
            GameAction::RotateCcw => self.rotate(Direction::CounterClockwise),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Hold => self.hold(),
            GameAction::Pause => {
                self.pause();
                true
            }
            GameAction::SoftDrop(active) => {
                self.toggle_soft_drop(active);
                true
            }
        }
    }

    /// Merge the falling piece at `pos`, clear lines and spawn the next piece.
    fn lock_at(&mut self, pos: Vector) {
        let piece = self.falling.tetromino;
        let mut cleared_rows = ClearedRows::new();

        match self.grid.place(piece.shape(), pos) {
            Some(placed) => {
                let (grid, cleared) = placed.clear_lines();
                if !cleared.is_empty() {
                    debug!("cleared rows {:?}", cleared.as_slice());
                }
                self.grid = grid;
                cleared_rows = cleared;
            }
            None => warn!("{} could not lock at {}; grid unchanged", piece.kind, pos),
        }

        debug!("locked {} at {}", piece.kind, pos);
        self.last_event = Some(LockEvent {
            piece: piece.kind,
            pos,
            cleared_rows,
        });

        self.can_hold = true;
        let next = self.draw_next();
        self.falling = FallingTetromino::spawn(next);
        self.ghost = landing(&self.grid, self.falling);
    }

    fn draw_next(&mut self) -> PieceKind {
        draw_next(&mut self.preview, self.source.as_mut())
    }

    fn end_game(&mut self) {
        self.game_over = true;
        info!("game over");
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("grid", &self.grid)
            .field("falling", &self.falling)
            .field("ghost", &self.ghost)
            .field("preview", &self.preview)
            .field("holding", &self.holding)
            .field("can_hold", &self.can_hold)
            .field("game_over", &self.game_over)
            .field("paused", &self.paused)
            .field("soft_dropping", &self.soft_dropping)
            .field("gravity_delay_ms", &self.gravity_delay_ms)
            .finish_non_exhaustive()
    }
}

/// Pop the front of the preview and refill it with one fresh piece.
fn draw_next(preview: &mut VecDeque<PieceKind>, source: &mut dyn PieceSource) -> PieceKind {
    let fresh = source.next_piece();
    match preview.pop_front() {
        Some(front) => {
            preview.push_back(fresh);
            front
        }
        None => fresh,
    }
}

/// Probe downwards from `falling` until the next row would collide.
fn landing(grid: &Grid, falling: FallingTetromino) -> FallingTetromino {
    let shape = falling.tetromino.shape();
    let mut pos = falling.pos;
    while grid.fits(shape, pos + Vector::new(0, 1)) {
        pos.y += 1;
    }
    FallingTetromino { pos, ..falling }
}
