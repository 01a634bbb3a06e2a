//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and wires
//! them to the engine through the controls hook. Nothing here knows about
//! game rules: every action goes through [`tetris_engine_core::Controls`].

pub mod binding;
pub mod map;
pub mod soft_drop;

pub use tetris_engine_types as types;

pub use binding::KeyboardBinding;
pub use map::{handle_key_event, should_quit};
pub use soft_drop::SoftDropLatch;
