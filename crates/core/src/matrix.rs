//! Matrix module - generic fixed-size 2D container
//!
//! Row-major flat storage (`y * width + x`), like the playfield it backs.
//! Every operation returns a new matrix; nothing here mutates its input.
//!
//! Coordinates are [`Vector`]s: `x` grows to the right, `y` grows downwards.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::types::Vector;

/// Fixed-size 2D container. Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Outcome of [`Matrix::merge`].
///
/// On rejection `matrix` borrows the base unchanged, so callers can always
/// continue with `matrix` regardless of `merged`.
#[derive(Debug)]
pub struct Merge<'a, T: Clone> {
    pub matrix: Cow<'a, Matrix<T>>,
    pub merged: bool,
}

impl<T> Matrix<T> {
    /// Create a `width x height` matrix, computing each cell once from its coordinate.
    pub fn create(width: usize, height: usize, init: impl FnMut(Vector) -> T) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self::build(width, height, init))
    }

    /// Create a matrix with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self>
    where
        T: Clone,
    {
        Self::create(width, height, |_| value.clone())
    }

    /// Create a matrix with every cell set to `T::default()`.
    pub fn new(width: usize, height: usize) -> Result<Self>
    where
        T: Default,
    {
        Self::create(width, height, |_| T::default())
    }

    /// Build from rows; width and height are inferred from the input.
    pub fn from_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
    {
        let rows: Vec<Vec<T>> = rows
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(Error::RaggedRows {
                row,
                expected: width,
                found,
            });
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Dimensions are already validated by the caller.
    pub(crate) fn build(width: usize, height: usize, mut init: impl FnMut(Vector) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(init(Vector::new(x as i32, y as i32)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Get cell at (x, y); None if out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Flat row-major cell slice
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Row `y` as a slice. Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    /// Cells with their coordinates, in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Vector, &T)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            (Vector::new((i % width) as i32, (i / width) as i32), cell)
        })
    }

    /// New same-shape matrix with `f` applied to every cell.
    pub fn map<U>(&self, mut f: impl FnMut(&T, Vector) -> U) -> Matrix<U> {
        Matrix::build(self.width, self.height, |pos| {
            f(&self.cells[pos.y as usize * self.width + pos.x as usize], pos)
        })
    }

    /// Visit every cell in row-major order.
    pub fn for_each(&self, mut f: impl FnMut(&T, Vector)) {
        for (pos, cell) in self.iter() {
            f(cell, pos);
        }
    }

    /// Whether `overlay` placed with its top-left corner at `pos` could be merged.
    ///
    /// Placement rules, per overlay cell at absolute coordinate `at`:
    /// - a cell equal to `empty` is transparent and may hang outside `self`;
    /// - any other cell must satisfy `0 <= at.x < width` and `at.y < height`;
    /// - rows above the top (`at.y < 0`) are virtual and read as `empty`;
    /// - `collides(base, overlay, at)` rejects the placement.
    ///
    /// This is looser than requiring the whole overlay box to fit: only
    /// non-empty cells are bounds checked.
    pub fn can_merge(
        &self,
        overlay: &Matrix<T>,
        empty: &T,
        pos: Vector,
        collides: impl Fn(&T, &T, Vector) -> bool,
    ) -> bool
    where
        T: PartialEq,
    {
        overlay.iter().all(|(local, cell)| {
            let at = pos + local;
            match self.footprint(at, cell, empty) {
                Footprint::Skip => true,
                Footprint::OutOfBounds => false,
                Footprint::Virtual => !collides(empty, cell, at),
                Footprint::Inside(i) => !collides(&self.cells[i], cell, at),
            }
        })
    }

    /// Place `overlay` onto `self` at `pos`.
    ///
    /// Rejected (see [`Matrix::can_merge`]) merges return `self` borrowed. On
    /// success the result equals `self` outside the overlay footprint and
    /// `combine(base, overlay, at)` inside it; cells landing in the virtual
    /// rows above the top are dropped.
    ///
    /// Bounds are checked per cell, not on the overlay's bounding box, so a
    /// placement whose empty border sticks out past the sides or bottom
    /// still merges.
    pub fn merge<'a>(
        &'a self,
        overlay: &Matrix<T>,
        empty: &T,
        pos: Vector,
        collides: impl Fn(&T, &T, Vector) -> bool,
        combine: impl Fn(&T, &T, Vector) -> T,
    ) -> Merge<'a, T>
    where
        T: Clone + PartialEq,
    {
        if !self.can_merge(overlay, empty, pos, collides) {
            return Merge {
                matrix: Cow::Borrowed(self),
                merged: false,
            };
        }

        let mut output = self.clone();
        for (local, cell) in overlay.iter() {
            let at = pos + local;
            if let Footprint::Inside(i) = self.footprint(at, cell, empty) {
                output.cells[i] = combine(&self.cells[i], cell, at);
            }
        }

        Merge {
            matrix: Cow::Owned(output),
            merged: true,
        }
    }

    fn footprint(&self, at: Vector, cell: &T, empty: &T) -> Footprint
    where
        T: PartialEq,
    {
        let in_columns = at.x >= 0 && (at.x as usize) < self.width;
        let above_bottom = at.y < self.height as i32;
        if !in_columns || !above_bottom {
            if cell == empty {
                return Footprint::Skip;
            }
            return Footprint::OutOfBounds;
        }
        match self.index(at.x, at.y) {
            Some(i) => Footprint::Inside(i),
            None => Footprint::Virtual,
        }
    }

    /// 90° clockwise rotation into a new `height x width` matrix.
    pub fn rotate_clockwise(&self) -> Matrix<T>
    where
        T: Clone,
    {
        let (w, h) = (self.width, self.height);
        Matrix::build(h, w, |pos| {
            let (x, y) = (pos.x as usize, pos.y as usize);
            self.cells[(h - 1 - x) * w + y].clone()
        })
    }

    /// 90° counter-clockwise rotation into a new `height x width` matrix.
    pub fn rotate_counter_clockwise(&self) -> Matrix<T>
    where
        T: Clone,
    {
        let (w, h) = (self.width, self.height);
        Matrix::build(h, w, |pos| {
            let (x, y) = (pos.x as usize, pos.y as usize);
            self.cells[x * w + (w - 1 - y)].clone()
        })
    }
}

/// Where an overlay cell lands relative to the base.
enum Footprint {
    Skip,
    OutOfBounds,
    Virtual,
    Inside(usize),
}
