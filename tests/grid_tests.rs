//! Grid tests - fitting, locking and line clearing

use tetris_engine::core::{Error, Grid, Tetromino};
use tetris_engine::types::{Cell, PieceKind, Vector, GRID_HEIGHT, GRID_WIDTH};

/// Grid with the listed cells filled with `kind`.
fn grid_with(kind: PieceKind, filled: &[(i32, i32)]) -> Grid {
    Grid::from_rows((0..GRID_HEIGHT as i32).map(|y| {
        (0..GRID_WIDTH as i32).map(move |x| -> Cell {
            filled.contains(&(x, y)).then_some(kind)
        })
    }))
    .unwrap()
}

fn row(y: i32, xs: std::ops::Range<i32>) -> Vec<(i32, i32)> {
    xs.map(|x| (x, y)).collect()
}

#[test]
fn test_grid_new_empty() {
    let grid = Grid::new();
    assert_eq!(grid.width(), GRID_WIDTH);
    assert_eq!(grid.height(), GRID_HEIGHT);
    for y in 0..GRID_HEIGHT as i32 {
        for x in 0..GRID_WIDTH as i32 {
            assert_eq!(grid.get(x, y), Some(None), "cell ({}, {})", x, y);
        }
    }
    assert_eq!(grid.get(-1, 0), None);
    assert_eq!(grid.get(0, GRID_HEIGHT as i32), None);
}

#[test]
fn test_preset_grid_must_be_ten_by_twenty() {
    let result = Grid::from_rows((0..5).map(|_| vec![None; GRID_WIDTH]));
    assert!(matches!(result, Err(Error::GridSize { height: 5, .. })));
}

#[test]
fn test_pieces_reach_walls_and_floor() {
    let grid = Grid::new();
    let i_east = Tetromino::new(PieceKind::I).rotated(tetris_engine::types::Direction::Clockwise);

    // East I fills column 2 of its box.
    assert!(grid.fits(i_east.shape(), Vector::new(-2, 16)));
    assert!(grid.fits(i_east.shape(), Vector::new(7, 16)));
    assert!(!grid.fits(i_east.shape(), Vector::new(-3, 16)));
    assert!(!grid.fits(i_east.shape(), Vector::new(8, 16)));
    assert!(!grid.fits(i_east.shape(), Vector::new(0, 17)));

    // Flat I: empty bottom rows of its box hang below the floor.
    let i_north = Tetromino::new(PieceKind::I);
    assert!(grid.fits(i_north.shape(), Vector::new(0, 18)));
    assert!(!grid.fits(i_north.shape(), Vector::new(0, 19)));
}

#[test]
fn test_place_rejects_overlap() {
    let grid = grid_with(PieceKind::O, &[(4, 19)]);
    let o = Tetromino::new(PieceKind::O);

    assert!(grid.place(o.shape(), Vector::new(4, 18)).is_none());
    let placed = grid.place(o.shape(), Vector::new(5, 18)).unwrap();
    assert!(placed.is_occupied(4, 19));
    assert!(placed.is_occupied(6, 18));
    assert_eq!(placed.get(5, 19), Some(Some(PieceKind::O)));
}

#[test]
fn test_header_rows_never_collide() {
    // Row 0 full; a piece overlapping only the header still fits.
    let grid = grid_with(PieceKind::Z, &row(0, 0..10));
    let o = Tetromino::new(PieceKind::O);
    assert!(grid.fits(o.shape(), Vector::new(4, -2)));
    assert!(!grid.fits(o.shape(), Vector::new(4, -1)));
}

#[test]
fn test_clear_non_adjacent_rows() {
    let mut filled = row(17, 0..10);
    filled.extend(row(19, 0..10));
    filled.extend(row(18, 0..3));
    filled.push((5, 16));
    let grid = grid_with(PieceKind::L, &filled);

    assert_eq!(grid.full_rows().as_slice(), &[17, 19]);
    let (cleared, rows) = grid.clear_lines();
    assert_eq!(rows.as_slice(), &[17, 19]);

    let expected = {
        let mut cells = row(19, 0..3);
        cells.push((5, 18));
        grid_with(PieceKind::L, &cells)
    };
    assert_eq!(cleared, expected);
}

#[test]
fn test_clear_four_rows() {
    let mut filled: Vec<(i32, i32)> = (16..20).flat_map(|y| row(y, 0..10)).collect();
    filled.push((0, 15));
    let grid = grid_with(PieceKind::I, &filled);

    let (cleared, rows) = grid.clear_lines();
    assert_eq!(rows.len(), 4);
    assert_eq!(cleared, grid_with(PieceKind::I, &[(0, 19)]));
}
