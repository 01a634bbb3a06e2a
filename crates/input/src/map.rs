//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Every bound key. Letters are matched case-insensitively.
const BINDINGS: &[(KeyCode, GameAction)] = &[
    (KeyCode::Left, GameAction::MoveLeft),
    (KeyCode::Char('a'), GameAction::MoveLeft),
    (KeyCode::Right, GameAction::MoveRight),
    (KeyCode::Char('d'), GameAction::MoveRight),
    (KeyCode::Down, GameAction::SoftDrop(true)),
    (KeyCode::Char('s'), GameAction::SoftDrop(true)),
    (KeyCode::Up, GameAction::RotateCw),
    (KeyCode::Char('w'), GameAction::RotateCw),
    (KeyCode::Char('x'), GameAction::RotateCw),
    (KeyCode::Char('z'), GameAction::RotateCcw),
    (KeyCode::Char(' '), GameAction::HardDrop),
    (KeyCode::Char('c'), GameAction::Hold),
    (KeyCode::Char('p'), GameAction::Pause),
    (KeyCode::Esc, GameAction::Pause),
];

fn lookup(code: KeyCode) -> Option<GameAction> {
    let code = match code {
        KeyCode::Char(ch) => KeyCode::Char(ch.to_ascii_lowercase()),
        other => other,
    };
    BINDINGS
        .iter()
        .find(|(bound, _)| *bound == code)
        .map(|(_, action)| *action)
}

/// Map keyboard input to game actions.
///
/// Chords with Ctrl or Alt are ignored. Releases only matter for the soft
/// drop keys, and only on terminals that report them.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    let action = lookup(key.code)?;
    match key.kind {
        KeyEventKind::Release => {
            matches!(action, GameAction::SoftDrop(_)).then_some(GameAction::SoftDrop(false))
        }
        _ => Some(action),
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
