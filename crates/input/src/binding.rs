//! Keyboard binder for the engine's controls hook.
//!
//! The binder stores the [`Controls`] it is given and returns a teardown that
//! drops them again, so keys pressed after game over reach nothing.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::KeyEvent;
use log::debug;
use tetris_engine_core::{Controls, Teardown};

use crate::map::handle_key_event;
use crate::types::GameAction;

/// Routes terminal key events to an attached game.
#[derive(Debug, Clone, Default)]
pub struct KeyboardBinding {
    controls: Rc<RefCell<Option<Controls>>>,
}

impl KeyboardBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls hook for `TetrisBuilder::controls`.
    pub fn binder(&self) -> impl FnOnce(Controls) -> Teardown + 'static {
        let slot = Rc::clone(&self.controls);
        move |controls: Controls| -> Teardown {
            *slot.borrow_mut() = Some(controls);
            debug!("keyboard attached");
            Box::new(move || {
                slot.borrow_mut().take();
                debug!("keyboard detached");
            })
        }
    }

    pub fn is_attached(&self) -> bool {
        self.controls.borrow().is_some()
    }

    /// Map and forward a key. Returns the action sent, if any.
    pub fn handle_key(&self, key: KeyEvent) -> Option<GameAction> {
        let action = handle_key_event(key)?;
        self.dispatch(action).then_some(action)
    }

    /// Forward an action; false when detached.
    pub fn dispatch(&self, action: GameAction) -> bool {
        // Teardown may run inside the dispatch, so release the slot first.
        let Some(controls) = self.controls.borrow().clone() else {
            return false;
        };
        controls.dispatch(action);
        true
    }
}
