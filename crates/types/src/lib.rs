//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! by the engine, the terminal renderer and the input layer alike.
//!
//! # Playfield
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - Rows with `y < 0` sit above the visible playfield. Freshly spawned pieces
//!   start there and those cells never collide with anything.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_GRAVITY_DELAY_MS` | 1000 | Gravity tick interval |
//! | `SOFT_DROP_DIVISOR` | 2 | Soft drop halves the interval |
//! | `SOFT_DROP_GRACE_MS` | 150 | Host-side soft drop release emulation |
//!
//! # Examples
//!
//! ```
//! use tetris_engine_types::{Direction, PieceKind, Rotation, Vector, GRID_HEIGHT, GRID_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! let rotation = Rotation::North.rotate(Direction::CounterClockwise);
//! assert_eq!(rotation, Rotation::West);
//!
//! assert_eq!(Vector::new(1, 2) + Vector::new(3, -1), Vector::new(4, 1));
//! assert_eq!((GRID_WIDTH, GRID_HEIGHT), (10, 20));
//! ```

use std::fmt;
use std::ops::Add;

/// Playfield width in cells (10 columns)
pub const GRID_WIDTH: usize = 10;

/// Playfield height in cells (20 rows)
pub const GRID_HEIGHT: usize = 20;

/// Default gravity interval (1000ms = one row per second)
pub const DEFAULT_GRAVITY_DELAY_MS: u32 = 1000;

/// Default number of upcoming pieces shown in the preview queue
pub const DEFAULT_PREVIEW_AMOUNT: usize = 3;

/// Soft drop divides the gravity interval by this amount
pub const SOFT_DROP_DIVISOR: u32 = 2;

/// Soft drop release emulation for terminals without key-release events.
pub const SOFT_DROP_GRACE_MS: u32 = 150;

/// Grid-relative integer coordinate. No bounds are implied by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Upper-case piece name
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    /// Position in [`PieceKind::ALL`]; usable as a table index.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Signed index step: +1 clockwise, -1 counter-clockwise
    pub fn step(&self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Clockwise => "clockwise",
            Direction::CounterClockwise => "counterClockwise",
        }
    }
}

/// Rotation states (North = spawn orientation, index 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    const ORDER: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    /// Rotation index 0-3 (number of clockwise quarter turns from spawn)
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Rotation for an index, wrapping modulo 4
    pub fn from_index(index: i32) -> Self {
        Self::ORDER[index.rem_euclid(4) as usize]
    }

    /// `(current + direction) mod 4`
    pub fn rotate(&self, direction: Direction) -> Self {
        Self::from_index(self.index() as i32 + direction.step())
    }

    /// Rotate clockwise
    pub fn rotate_cw(&self) -> Self {
        self.rotate(Direction::Clockwise)
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(&self) -> Self {
        self.rotate(Direction::CounterClockwise)
    }
}

/// Control vocabulary a host can bind to its input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    HardDrop,
    Hold,
    Pause,
    /// Soft drop pressed (`true`) or released (`false`)
    SoftDrop(bool),
}

/// Cell on the grid (None = empty, Some = filled by that piece kind).
///
/// The kind is an identity tag for color lookup only; collision logic only
/// distinguishes filled from empty.
pub type Cell = Option<PieceKind>;
