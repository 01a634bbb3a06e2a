//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It renders the
//! engine's read-only state into a framebuffer and flushes that framebuffer
//! to the terminal, redrawing only what changed.
//!
//! Goals:
//! - Keep the engine free of any terminal code
//! - Allow precise control over aspect ratio (e.g. 2 chars wide per cell)

pub mod fb;
pub mod game_view;
pub mod palette;
pub mod renderer;

pub use tetris_engine_core as core;
pub use tetris_engine_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{GameView, Viewport};
pub use palette::{piece_color, PIECE_COLORS};
pub use renderer::TerminalRenderer;
