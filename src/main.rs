//! Terminal runner (default binary).
//!
//! Hosts the engine: a keyboard binder feeds its controls, a render hook
//! hands over the live game for drawing, and this loop owns the gravity
//! timer. Set `TETRIS_LOG=<file>` to write logs (filtered by `RUST_LOG`).

use std::cell::RefCell;
use std::fs::File;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use log::info;

use tetris_engine::core::{EngineConfig, GameHandle, Tetris};
use tetris_engine::input::{handle_key_event, should_quit, KeyboardBinding, SoftDropLatch};
use tetris_engine::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

/// Upper bound on how long input polling may block between frames.
const FRAME_MS: u64 = 16;

fn main() -> Result<()> {
    init_logging()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging() -> Result<()> {
    let Ok(path) = std::env::var("TETRIS_LOG") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let keyboard = KeyboardBinding::new();
    let handle: Rc<RefCell<Option<GameHandle>>> = Rc::default();
    let slot = Rc::clone(&handle);

    let tetris = Tetris::builder(EngineConfig::default())
        .render(move |h| *slot.borrow_mut() = Some(h))
        .controls(keyboard.binder())
        .build()?;
    let handle = handle
        .borrow_mut()
        .take()
        .context("render hook was not called")?;

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut latch = SoftDropLatch::new();
    let mut armed = tetris.gravity_interval();
    let mut next_tick = armed.map(|d| Instant::now() + d);

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&handle.get(), Viewport::new(w, h), &mut fb);
        term.present(&mut fb)?;

        let now = Instant::now();
        let mut timeout = Duration::from_millis(FRAME_MS);
        for deadline in [next_tick, latch.deadline()].into_iter().flatten() {
            timeout = timeout.min(deadline.saturating_duration_since(now));
        }

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        info!("quit requested");
                        return Ok(());
                    }
                    if tetris.is_game_over() {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key)
                        .and_then(|action| latch.filter(action, Instant::now()))
                    {
                        keyboard.dispatch(action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        let now = Instant::now();
        if let Some(release) = latch.poll(now) {
            keyboard.dispatch(release);
        }

        if next_tick.is_some_and(|t| now >= t) {
            tetris.tick();
            next_tick = armed.map(|d| now + d);
        }

        // Re-arm whenever the interval changes (soft drop, pause, game over).
        let interval = tetris.gravity_interval();
        if interval != armed {
            armed = interval;
            next_tick = armed.map(|d| now + d);
        }
    }
}
