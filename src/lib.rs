//! Falling-block puzzle engine (workspace facade crate).
//!
//! Re-exports the member crates under one name:
//! `tetris_engine::{core, input, term, types}`. The game rules live in
//! `core`; `input` and `term` are the terminal host's keyboard and renderer.

pub use tetris_engine_core as core;
pub use tetris_engine_input as input;
pub use tetris_engine_term as term;
pub use tetris_engine_types as types;
