//! Grid module - the 10x20 playfield
//!
//! The grid is an immutable snapshot: locking a piece produces a new grid via
//! [`Matrix::merge`] and line clearing produces another. Nothing writes into an
//! existing grid cell-by-cell.
//!
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top
//! to bottom). Rows with `y < 0` are the header above the playfield; cells
//! there never collide.

use arrayvec::ArrayVec;

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::types::{Cell, Vector, GRID_HEIGHT, GRID_WIDTH};

/// Row indices removed by one clear, top to bottom.
pub type ClearedRows = ArrayVec<usize, GRID_HEIGHT>;

/// The shared collision rule: both cells filled and the row is visible.
pub fn collides(base: &Cell, incoming: &Cell, at: Vector) -> bool {
    base.is_some() && incoming.is_some() && at.y >= 0
}

/// The incoming piece cell wins where it is filled.
fn combine(base: &Cell, incoming: &Cell, _at: Vector) -> Cell {
    incoming.or(*base)
}

/// The playfield: a `Matrix<Cell>` that is always `GRID_WIDTH x GRID_HEIGHT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: Matrix<Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self {
            cells: empty_matrix(),
        }
    }

    /// Wrap a matrix, checking it has the playfield's dimensions.
    pub fn from_matrix(cells: Matrix<Cell>) -> Result<Self> {
        if cells.width() != GRID_WIDTH || cells.height() != GRID_HEIGHT {
            return Err(Error::GridSize {
                width: cells.width(),
                height: cells.height(),
                expected_width: GRID_WIDTH,
                expected_height: GRID_HEIGHT,
            });
        }
        Ok(Self { cells })
    }

    /// Build from 20 rows of 10 cells.
    pub fn from_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = Cell>,
    {
        Self::from_matrix(Matrix::from_rows(rows)?)
    }

    pub fn width(&self) -> usize {
        GRID_WIDTH
    }

    pub fn height(&self) -> usize {
        GRID_HEIGHT
    }

    /// Get cell at (x, y); None if out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.cells.get(x, y).copied()
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn matrix(&self) -> &Matrix<Cell> {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.rows()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        y < GRID_HEIGHT && self.cells.row(y).iter().all(Option::is_some)
    }

    /// Whether `shape` fits at `pos` under the collision rule.
    pub fn fits(&self, shape: &Matrix<Cell>, pos: Vector) -> bool {
        self.cells.can_merge(shape, &None, pos, collides)
    }

    /// Lock `shape` into a new grid at `pos`; None if it does not fit.
    pub fn place(&self, shape: &Matrix<Cell>, pos: Vector) -> Option<Grid> {
        let merge = self.cells.merge(shape, &None, pos, collides, combine);
        if !merge.merged {
            return None;
        }
        Some(Grid {
            cells: merge.matrix.into_owned(),
        })
    }

    /// Indices of the completely filled rows, top to bottom.
    pub fn full_rows(&self) -> ClearedRows {
        (0..GRID_HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Remove every full row at once.
    ///
    /// Collects the full row indices first, then rebuilds the grid from the
    /// remaining rows in their original order, padded with empty rows on top.
    pub fn clear_lines(&self) -> (Grid, ClearedRows) {
        let cleared = self.full_rows();
        if cleared.is_empty() {
            return (self.clone(), cleared);
        }

        let kept: Vec<&[Cell]> = self
            .rows()
            .enumerate()
            .filter(|(y, _)| !cleared.contains(y))
            .map(|(_, row)| row)
            .collect();
        let padding = GRID_HEIGHT - kept.len();

        let cells = self.cells.map(|_, pos| {
            let y = pos.y as usize;
            if y < padding {
                None
            } else {
                kept[y - padding][pos.x as usize]
            }
        });

        (Grid { cells }, cleared)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_matrix() -> Matrix<Cell> {
    // GRID_WIDTH and GRID_HEIGHT are non-zero constants.
    Matrix::build(GRID_WIDTH, GRID_HEIGHT, |_| None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn bar() -> Matrix<Cell> {
        Matrix::filled(4, 1, Some(PieceKind::I)).unwrap()
    }

    #[test]
    fn test_collision_rule() {
        let filled = Some(PieceKind::T);
        assert!(collides(&filled, &filled, Vector::new(0, 0)));
        assert!(!collides(&filled, &filled, Vector::new(0, -1)));
        assert!(!collides(&None, &filled, Vector::new(0, 5)));
        assert!(!collides(&filled, &None, Vector::new(0, 5)));
    }

    #[test]
    fn test_place_returns_new_grid() {
        let grid = Grid::new();
        let placed = grid.place(&bar(), Vector::new(0, 19)).unwrap();

        assert!(placed.is_occupied(0, 19));
        assert!(placed.is_occupied(3, 19));
        assert!(!placed.is_occupied(4, 19));
        assert_eq!(grid, Grid::new());
    }

    #[test]
    fn test_place_above_top_drops_hidden_cells() {
        let grid = Grid::new();
        let column = Matrix::filled(1, 3, Some(PieceKind::I)).unwrap();
        let placed = grid.place(&column, Vector::new(2, -2)).unwrap();

        assert!(placed.is_occupied(2, 0));
        assert_eq!(placed.cells.cells().iter().filter(|c| c.is_some()).count(), 1);
    }

    #[test]
    fn test_place_rejects_walls_and_floor() {
        let grid = Grid::new();
        assert!(grid.place(&bar(), Vector::new(7, 0)).is_none());
        assert!(grid.place(&bar(), Vector::new(-1, 0)).is_none());
        assert!(grid.place(&bar(), Vector::new(0, 20)).is_none());
        assert!(grid.fits(&bar(), Vector::new(6, 0)));
    }

    #[test]
    fn test_clear_lines_without_full_rows_is_identity() {
        let grid = Grid::new().place(&bar(), Vector::new(0, 19)).unwrap();
        let (cleared, rows) = grid.clear_lines();
        assert!(rows.is_empty());
        assert_eq!(cleared, grid);
    }
}
