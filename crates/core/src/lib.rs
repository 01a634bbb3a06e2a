//! Core engine module - pure game rules with no terminal or timer code
//!
//! This crate contains the playfield, the piece catalog, the piece sources and
//! the state machine that ties them together. It never sleeps, spawns threads
//! or touches I/O: the host drives gravity with its own timer and reads the
//! state back to draw it.
//!
//! # Module Structure
//!
//! - [`matrix`]: generic 2D matrix with merge, rotation and mapping
//! - [`grid`]: the 10x20 playfield, collision rule and line clearing
//! - [`pieces`]: the seven tetrominoes, their rotation states and kick tables
//! - [`source`]: where the next piece comes from (random, 7-bag, fixed list)
//! - [`config`]: construction options
//! - [`game`]: the state machine (move, rotate, drop, hold, pause, gravity)
//! - [`tetris`]: host contract with render and controls hooks
//!
//! # Game Rules
//!
//! - **Rotation**: precomputed states with standard kick offsets (none for O)
//! - **Ghost Piece**: shows where the current piece will land
//! - **Hold**: store one piece, once per lock
//! - **Game Over**: a piece that cannot fall while still in the top row
//!
//! # Example
//!
//! ```
//! use tetris_engine_core::{EngineConfig, GravityStep, SequenceSource, Tetris};
//! use tetris_engine_core::types::GameAction;
//!
//! let tetris = Tetris::builder(EngineConfig::default())
//!     .source(SequenceSource::parse("TIO"))
//!     .build()
//!     .unwrap();
//!
//! let controls = tetris.controls();
//! controls.dispatch(GameAction::MoveRight);
//! controls.rotate_clockwise();
//!
//! assert_eq!(tetris.tick(), GravityStep::Moved);
//! controls.hard_drop();
//! assert!(tetris.game().grid().is_occupied(5, 19));
//! ```
//!
//! # Timing
//!
//! - **Gravity**: 1000ms by default, configurable at construction and runtime
//! - **Soft Drop**: halves the interval while held
//!
//! Call [`Tetris::tick`] whenever [`Tetris::gravity_interval`] elapses; a
//! `None` interval means the timer should stay disarmed.

pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod matrix;
pub mod pieces;
pub mod source;
pub mod tetris;

pub use tetris_engine_types as types;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use game::{FallingTetromino, Game, GravityStep, LockEvent, Teardown};
pub use grid::{ClearedRows, Grid};
pub use matrix::{Matrix, Merge};
pub use pieces::{catalog, KickTable, Tetromino};
pub use source::{BagSource, PieceSource, RandomSource, SequenceSource, SimpleRng};
pub use tetris::{Controls, GameHandle, Tetris, TetrisBuilder};
