//! Host contract - wiring a [`Game`] to a renderer and an input binder
//!
//! The host hands the engine two hooks at construction:
//!
//! - a render hook that receives a read-only [`GameHandle`] once and keeps it
//!   to repaint whenever it likes;
//! - a controls hook that receives [`Controls`], wires them to its input
//!   source and returns a [`Teardown`] that the engine runs exactly once when
//!   the game ends.
//!
//! The game lives in an `Rc<RefCell<_>>`. Controls only hold a weak
//! reference: once the [`Tetris`] and every [`GameHandle`] are dropped, they
//! become no-ops.

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::warn;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::game::{Game, GravityStep, Teardown};
use crate::grid::Grid;
use crate::source::{PieceSource, RandomSource};
use crate::types::{Direction, GameAction};

type RenderHook = Box<dyn FnOnce(GameHandle)>;
type ControlsHook = Box<dyn FnOnce(Controls) -> Teardown>;

/// A running game plus its host hooks.
#[derive(Debug)]
pub struct Tetris {
    game: Rc<RefCell<Game>>,
}

impl Tetris {
    pub fn builder(config: EngineConfig) -> TetrisBuilder {
        TetrisBuilder {
            config,
            source: None,
            grid: Grid::new(),
            render: None,
            controls: None,
        }
    }

    /// Random pieces, empty grid, no hooks
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// One gravity tick, driven by the host's timer.
    pub fn tick(&self) -> GravityStep {
        self.game.borrow_mut().apply_gravity()
    }

    pub fn gravity_interval(&self) -> Option<Duration> {
        self.game.borrow().gravity_interval()
    }

    pub fn is_game_over(&self) -> bool {
        self.game.borrow().is_game_over()
    }

    /// Read access to the state.
    pub fn game(&self) -> Ref<'_, Game> {
        self.game.borrow()
    }

    pub fn handle(&self) -> GameHandle {
        GameHandle {
            game: Rc::clone(&self.game),
        }
    }

    pub fn controls(&self) -> Controls {
        Controls {
            game: Rc::downgrade(&self.game),
        }
    }

    /// Change the base gravity interval. Zero is ignored.
    pub fn set_gravity_delay_ms(&self, ms: u32) {
        self.game.borrow_mut().set_gravity_delay_ms(ms);
    }
}

/// Builder for [`Tetris`]
pub struct TetrisBuilder {
    config: EngineConfig,
    source: Option<Box<dyn PieceSource>>,
    grid: Grid,
    render: Option<RenderHook>,
    controls: Option<ControlsHook>,
}

impl TetrisBuilder {
    pub fn source(mut self, source: impl PieceSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Start from a preset grid instead of an empty one.
    pub fn grid(mut self, grid: Grid) -> Self {
        self.grid = grid;
        self
    }

    pub fn render(mut self, render: impl FnOnce(GameHandle) + 'static) -> Self {
        self.render = Some(Box::new(render));
        self
    }

    pub fn controls(mut self, bind: impl FnOnce(Controls) -> Teardown + 'static) -> Self {
        self.controls = Some(Box::new(bind));
        self
    }

    /// Create the game, then run the render hook and the controls hook.
    ///
    /// If the first gravity tick already ended the game, the teardown returned
    /// by the controls hook runs immediately.
    pub fn build(self) -> Result<Tetris> {
        let source = self
            .source
            .unwrap_or_else(|| Box::new(RandomSource::new()));
        let game = Game::from_grid(self.config, source, self.grid)?;
        let game = Rc::new(RefCell::new(game));

        if let Some(render) = self.render {
            render(GameHandle {
                game: Rc::clone(&game),
            });
        }

        if let Some(bind) = self.controls {
            let teardown = bind(Controls {
                game: Rc::downgrade(&game),
            });
            game.borrow_mut().set_teardown(teardown);
        }

        Ok(Tetris { game })
    }
}

/// Read-only view of the live game for renderers.
#[derive(Debug, Clone)]
pub struct GameHandle {
    game: Rc<RefCell<Game>>,
}

impl GameHandle {
    /// Borrow the current state.
    ///
    /// # Panics
    ///
    /// Panics if called from inside an engine callback while the game is
    /// being mutated. Use [`GameHandle::try_get`] there.
    pub fn get(&self) -> Ref<'_, Game> {
        self.game.borrow()
    }

    pub fn try_get(&self) -> Option<Ref<'_, Game>> {
        self.game.try_borrow().ok()
    }
}

/// Input-side entry points. Calls after the game is dropped do nothing.
#[derive(Debug, Clone)]
pub struct Controls {
    game: Weak<RefCell<Game>>,
}

impl Controls {
    fn with(&self, f: impl FnOnce(&mut Game)) {
        let Some(game) = self.game.upgrade() else {
            return;
        };
        let Ok(mut guard) = game.try_borrow_mut() else {
            warn!("control ignored: engine is busy");
            return;
        };
        f(&mut guard);
    }

    pub fn left(&self) {
        self.with(|game| {
            game.move_tetromino(-1, 0);
        });
    }

    pub fn right(&self) {
        self.with(|game| {
            game.move_tetromino(1, 0);
        });
    }

    pub fn rotate_clockwise(&self) {
        self.with(|game| {
            game.rotate(Direction::Clockwise);
        });
    }

    pub fn rotate_counter_clockwise(&self) {
        self.with(|game| {
            game.rotate(Direction::CounterClockwise);
        });
    }

    pub fn hard_drop(&self) {
        self.with(|game| {
            game.hard_drop();
        });
    }

    pub fn pause(&self) {
        self.with(|game| {
            game.pause();
        });
    }

    pub fn hold(&self) {
        self.with(|game| {
            game.hold();
        });
    }

    pub fn soft_drop(&self, active: bool) {
        self.with(|game| game.toggle_soft_drop(active));
    }

    pub fn dispatch(&self, action: GameAction) {
        self.with(|game| {
            game.apply_action(action);
        });
    }

    /// False once the game has been dropped.
    pub fn is_attached(&self) -> bool {
        self.game.strong_count() > 0
    }
}
