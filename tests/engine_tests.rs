//! Engine tests - gravity, kicks, locking, hold and game over

use tetris_engine::core::{EngineConfig, Error, Game, GravityStep, Grid, SequenceSource};
use tetris_engine::types::{Cell, Direction, GameAction, PieceKind, Rotation, Vector, GRID_HEIGHT, GRID_WIDTH};

fn grid_with(kind: PieceKind, filled: &[(i32, i32)]) -> Grid {
    Grid::from_rows((0..GRID_HEIGHT as i32).map(|y| {
        (0..GRID_WIDTH as i32).map(move |x| -> Cell {
            filled.contains(&(x, y)).then_some(kind)
        })
    }))
    .unwrap()
}

fn game_on(grid: Grid, pieces: &str) -> Game {
    Game::from_grid(
        EngineConfig::default(),
        Box::new(SequenceSource::parse(pieces)),
        grid,
    )
    .unwrap()
}

fn game(pieces: &str) -> Game {
    game_on(Grid::new(), pieces)
}

fn fall_to(game: &mut Game, y: i32) {
    while game.falling().pos.y < y {
        assert_eq!(game.apply_gravity(), GravityStep::Moved);
    }
}

#[test]
fn test_zero_gravity_config_is_rejected() {
    let result = Game::new(
        EngineConfig::default().with_gravity_delay_ms(0),
        Box::new(SequenceSource::parse("T")),
    );
    assert!(matches!(result, Err(Error::InvalidGravityDelay)));
}

#[test]
fn test_construction_runs_one_gravity_tick() {
    let state = game("IT");
    assert_eq!(state.falling().tetromino.kind, PieceKind::I);
    assert_eq!(state.falling().pos, Vector::new(3, 0));
    assert_eq!(state.preview().count(), 3);
    assert!(!state.is_game_over());
}

#[test]
fn test_kick_off_left_wall() {
    let mut state = game("T");
    assert!(state.rotate(Direction::Clockwise));
    for _ in 0..4 {
        assert!(state.apply_action(GameAction::MoveLeft));
    }
    assert!(!state.apply_action(GameAction::MoveLeft));
    assert_eq!(state.falling().pos, Vector::new(-1, -1));
    fall_to(&mut state, 10);

    // (0, 0) would poke through the wall; (1, 0) is the first fit.
    assert!(state.rotate(Direction::Clockwise));
    assert_eq!(state.falling().tetromino.rotation, Rotation::South);
    assert_eq!(state.falling().pos, Vector::new(0, 10));
}

#[test]
fn test_kick_skips_blocked_candidates() {
    let mut state = game_on(grid_with(PieceKind::Z, &[(2, 11)]), "T");
    assert!(state.rotate(Direction::Clockwise));
    for _ in 0..4 {
        state.move_tetromino(-1, 0);
    }
    fall_to(&mut state, 10);

    // (0, 0) hits the wall and (1, 0) hits (2, 11); (1, 1) fits.
    assert!(state.rotate(Direction::Clockwise));
    assert_eq!(state.falling().pos, Vector::new(0, 11));
}

#[test]
fn test_hard_drop_clears_multiple_lines() {
    let mut filled: Vec<(i32, i32)> = Vec::new();
    filled.extend((1..10).map(|x| (x, 17)));
    filled.extend((1..10).map(|x| (x, 19)));
    filled.extend((1..6).map(|x| (x, 18)));
    let mut state = game_on(grid_with(PieceKind::O, &filled), "I");

    // Vertical I in column 0.
    assert!(state.rotate(Direction::Clockwise));
    let mut moves = 0;
    while state.move_tetromino(-1, 0) {
        moves += 1;
    }
    assert_eq!(moves, 5);
    assert_eq!(state.falling().pos.x, -2);
    assert_eq!(state.ghost().pos, Vector::new(-2, 16));

    assert!(state.hard_drop());
    let event = state.take_last_event().unwrap();
    assert_eq!(event.piece, PieceKind::I);
    assert_eq!(event.cleared_rows.as_slice(), &[17, 19]);

    let grid = state.grid();
    assert_eq!(grid.get(0, 19), Some(Some(PieceKind::I)));
    for x in 1..6 {
        assert_eq!(grid.get(x, 19), Some(Some(PieceKind::O)));
    }
    for x in 6..10 {
        assert_eq!(grid.get(x, 19), Some(None));
    }
    assert_eq!(grid.get(0, 18), Some(Some(PieceKind::I)));
    assert!((1..10).all(|x| !grid.is_occupied(x, 18)));
    assert!((0..10).all(|x| !grid.is_occupied(x, 17)));

    // Next piece already spawned and ticked once.
    assert_eq!(state.falling().pos, Vector::new(3, 0));
    assert!(state.can_hold());
}

#[test]
fn test_ghost_only_refreshes_on_lateral_moves_and_rotations() {
    let mut state = game("T");
    let ghost = state.ghost();
    assert_eq!(ghost.pos, Vector::new(3, 18));

    assert_eq!(state.apply_gravity(), GravityStep::Moved);
    assert_eq!(state.ghost(), ghost);

    assert!(state.move_tetromino(1, 0));
    assert_eq!(state.ghost().pos, Vector::new(4, 18));

    assert!(state.rotate(Direction::Clockwise));
    assert_eq!(state.ghost().tetromino.rotation, Rotation::East);
    assert_eq!(state.ghost().pos, Vector::new(4, 17));
}

#[test]
fn test_hold_is_once_per_lock() {
    let mut state = game("TOI");
    assert!(state.hold());
    let falling = state.falling();
    let preview: Vec<_> = state.preview().collect();

    assert!(!state.hold());
    assert_eq!(state.falling(), falling);
    assert_eq!(state.holding(), Some(PieceKind::T));
    assert_eq!(state.preview().collect::<Vec<_>>(), preview);
}

#[test]
fn test_hold_first_use_pulls_from_preview() {
    let mut state = game("TOISZJL");
    // Preview after the first draw: O I S.
    assert!(state.hold());
    assert_eq!(state.falling().tetromino.kind, PieceKind::O);
    assert_eq!(
        state.preview().collect::<Vec<_>>(),
        [PieceKind::I, PieceKind::S, PieceKind::Z]
    );
}

#[test]
fn test_game_over_on_blocked_spawn() {
    let mut state = game_on(grid_with(PieceKind::J, &[(3, 1), (4, 1), (5, 1)]), "T");
    assert_eq!(state.falling().pos, Vector::new(3, -1));

    assert_eq!(state.apply_gravity(), GravityStep::GameOver);
    assert!(state.is_game_over());
    assert_eq!(state.gravity_interval(), None);

    let grid = state.grid().clone();
    assert!(!state.apply_action(GameAction::HardDrop));
    assert!(!state.hold());
    assert_eq!(state.apply_gravity(), GravityStep::Halted);
    assert_eq!(state.grid(), &grid);
}

#[test]
fn test_preset_game_can_end_during_construction() {
    let state = game_on(grid_with(PieceKind::J, &[(4, 0)]), "T");
    assert!(state.is_game_over());
}

#[test]
fn test_pause_blocks_gameplay_but_not_soft_drop_flag() {
    let mut state = game("T");
    state.pause();
    let falling = state.falling();

    state.toggle_soft_drop(true);
    assert!(state.is_soft_dropping());
    assert_eq!(state.gravity_delay_ms(), 500);
    assert_eq!(state.falling(), falling);

    state.pause();
    assert_eq!(
        state.gravity_interval(),
        Some(std::time::Duration::from_millis(500))
    );
}

#[test]
fn test_runtime_gravity_delay() {
    let mut state = game("T");
    state.set_gravity_delay_ms(250);
    assert_eq!(state.gravity_delay_ms(), 250);
    state.set_gravity_delay_ms(0);
    assert_eq!(state.gravity_delay_ms(), 250);
}
