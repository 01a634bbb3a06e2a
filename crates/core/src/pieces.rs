//! Pieces module - tetromino catalog and rotation kick tables
//!
//! Each of the seven pieces is defined once by its spawn shape; the other three
//! rotation states are produced by rotating that shape clockwise and are fixed
//! from then on. Rotating a piece at runtime only changes which state is
//! current.
//!
//! Shapes use the usual bounding boxes (I 4x4, O 2x2, the rest 3x3) so the kick
//! offsets line up with the standard tables. Reference: https://tetris.wiki/SRS

use std::sync::OnceLock;

use crate::matrix::Matrix;
use crate::types::{Cell, Direction, PieceKind, Rotation, Vector, GRID_WIDTH};

/// Candidate offsets tried in order when rotating.
pub type Kicks = [Vector; 5];

/// Kick offsets keyed by the rotation being left and the turn direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KickTable {
    clockwise: [Kicks; 4],
    counter_clockwise: [Kicks; 4],
}

impl KickTable {
    pub fn offsets(&self, from: Rotation, direction: Direction) -> &Kicks {
        match direction {
            Direction::Clockwise => &self.clockwise[from.index()],
            Direction::CounterClockwise => &self.counter_clockwise[from.index()],
        }
    }
}

const fn v(x: i32, y: i32) -> Vector {
    Vector::new(x, y)
}

// Offsets are in grid coordinates (y grows downwards).

/// JLSTZ kick table (shared by J, L, S, T, Z)
pub const JLSTZ_KICKS: KickTable = KickTable {
    clockwise: [
        // 0->1 (N->E)
        [v(0, 0), v(-1, 0), v(-1, -1), v(0, 2), v(-1, 2)],
        // 1->2 (E->S)
        [v(0, 0), v(1, 0), v(1, 1), v(0, -2), v(1, -2)],
        // 2->3 (S->W)
        [v(0, 0), v(1, 0), v(1, -1), v(0, 2), v(1, 2)],
        // 3->0 (W->N)
        [v(0, 0), v(-1, 0), v(-1, 1), v(0, -2), v(-1, -2)],
    ],
    counter_clockwise: [
        // 0->3 (N->W)
        [v(0, 0), v(1, 0), v(1, -1), v(0, 2), v(1, 2)],
        // 1->0 (E->N)
        [v(0, 0), v(1, 0), v(1, 1), v(0, -2), v(1, -2)],
        // 2->1 (S->E)
        [v(0, 0), v(-1, 0), v(-1, -1), v(0, 2), v(-1, 2)],
        // 3->2 (W->S)
        [v(0, 0), v(-1, 0), v(-1, 1), v(0, -2), v(-1, -2)],
    ],
};

/// I piece kick table (different from JLSTZ)
pub const I_KICKS: KickTable = KickTable {
    clockwise: [
        // 0->1 (N->E)
        [v(0, 0), v(-2, 0), v(1, 0), v(-2, 1), v(1, -2)],
        // 1->2 (E->S)
        [v(0, 0), v(-1, 0), v(2, 0), v(-1, -2), v(2, 1)],
        // 2->3 (S->W)
        [v(0, 0), v(2, 0), v(-1, 0), v(2, -1), v(-1, 2)],
        // 3->0 (W->N)
        [v(0, 0), v(1, 0), v(-2, 0), v(1, 2), v(-2, -1)],
    ],
    counter_clockwise: [
        // 0->3 (N->W)
        [v(0, 0), v(-1, 0), v(2, 0), v(-1, -2), v(2, 1)],
        // 1->0 (E->N)
        [v(0, 0), v(2, 0), v(-1, 0), v(2, -1), v(-1, 2)],
        // 2->1 (S->E)
        [v(0, 0), v(1, 0), v(-2, 0), v(1, 2), v(-2, -1)],
        // 3->2 (W->S)
        [v(0, 0), v(-2, 0), v(1, 0), v(-2, 1), v(1, -2)],
    ],
};

/// The only candidate for pieces without a kick table.
const NO_KICKS: [Vector; 1] = [Vector::ZERO];

/// One catalog entry: four fixed rotation states plus kicks.
#[derive(Debug)]
pub struct PieceDef {
    pub kind: PieceKind,
    pub rotations: [Matrix<Cell>; 4],
    pub kicks: Option<&'static KickTable>,
}

impl PieceDef {
    fn new(kind: PieceKind, mask: &[&[u8]], kicks: Option<&'static KickTable>) -> Self {
        let base = Matrix::build(mask[0].len(), mask.len(), |pos| {
            (mask[pos.y as usize][pos.x as usize] != 0).then_some(kind)
        });
        let east = base.rotate_clockwise();
        let south = east.rotate_clockwise();
        let west = south.rotate_clockwise();

        Self {
            kind,
            rotations: [base, east, south, west],
            kicks,
        }
    }
}

/// All seven pieces, built on first use.
pub fn catalog() -> &'static [PieceDef; 7] {
    static CATALOG: OnceLock<[PieceDef; 7]> = OnceLock::new();
    CATALOG.get_or_init(|| {
        PieceKind::ALL.map(|kind| match kind {
            PieceKind::I => PieceDef::new(
                kind,
                &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
                Some(&I_KICKS),
            ),
            PieceKind::O => PieceDef::new(kind, &[&[1, 1], &[1, 1]], None),
            PieceKind::T => PieceDef::new(
                kind,
                &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
                Some(&JLSTZ_KICKS),
            ),
            PieceKind::S => PieceDef::new(
                kind,
                &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
                Some(&JLSTZ_KICKS),
            ),
            PieceKind::Z => PieceDef::new(
                kind,
                &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
                Some(&JLSTZ_KICKS),
            ),
            PieceKind::J => PieceDef::new(
                kind,
                &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
                Some(&JLSTZ_KICKS),
            ),
            PieceKind::L => PieceDef::new(
                kind,
                &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
                Some(&JLSTZ_KICKS),
            ),
        })
    })
}

/// Catalog entry for a kind
pub fn piece_def(kind: PieceKind) -> &'static PieceDef {
    &catalog()[kind.index()]
}

/// A piece and its current rotation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
}

impl Tetromino {
    /// A piece in its base rotation state
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
        }
    }

    /// Matrix for the current rotation state
    pub fn shape(&self) -> &'static Matrix<Cell> {
        &piece_def(self.kind).rotations[self.rotation.index()]
    }

    /// Same piece, one quarter turn in `direction`.
    pub fn rotated(&self, direction: Direction) -> Self {
        Self {
            rotation: self.rotation.rotate(direction),
            ..*self
        }
    }

    /// Ordered kick candidates for turning from the current state.
    pub fn kicks(&self, direction: Direction) -> &'static [Vector] {
        match piece_def(self.kind).kicks {
            Some(table) => table.offsets(self.rotation, direction),
            None => &NO_KICKS,
        }
    }

    /// Spawn anchor: horizontally centred, one row above the field for I and
    /// two rows above for everything else.
    pub fn spawn_position(&self) -> Vector {
        let width = self.shape().width() as i32;
        let x = (GRID_WIDTH as i32 - width).div_euclid(2);
        let y = match self.kind {
            PieceKind::I => -1,
            _ => -2,
        };
        Vector::new(x, y)
    }

    /// Absolute coordinates of the filled cells at `pos`.
    pub fn cells_at(&self, pos: Vector) -> impl Iterator<Item = Vector> {
        self.shape()
            .iter()
            .filter(|(_, cell)| cell.is_some())
            .map(move |(local, _)| pos + local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(t: Tetromino) -> Vec<(i32, i32)> {
        t.cells_at(Vector::ZERO).map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_every_state_has_four_cells_tagged_with_kind() {
        for def in catalog() {
            for state in &def.rotations {
                let tags: Vec<_> = state.cells().iter().flatten().collect();
                assert_eq!(tags.len(), 4, "{:?}", def.kind);
                assert!(tags.iter().all(|&&k| k == def.kind));
            }
        }
    }

    #[test]
    fn test_generated_states_match_standard_orientations() {
        let t = Tetromino::new(PieceKind::T);
        assert_eq!(filled(t), [(1, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(filled(t.rotated(Direction::Clockwise)), [(1, 0), (1, 1), (2, 1), (1, 2)]);

        let i = Tetromino::new(PieceKind::I).rotated(Direction::Clockwise);
        assert_eq!(filled(i), [(2, 0), (2, 1), (2, 2), (2, 3)]);

        let i_west = Tetromino::new(PieceKind::I).rotated(Direction::CounterClockwise);
        assert_eq!(filled(i_west), [(1, 0), (1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_o_piece_has_single_candidate() {
        let o = Tetromino::new(PieceKind::O);
        assert_eq!(o.kicks(Direction::Clockwise), &[Vector::ZERO]);
        assert_eq!(o.kicks(Direction::CounterClockwise), &[Vector::ZERO]);
    }

    #[test]
    fn test_kick_tables_are_inverse_pairs() {
        // Turning back must offer the negated offsets of the forward turn.
        for table in [&JLSTZ_KICKS, &I_KICKS] {
            for from in 0..4 {
                let from = Rotation::from_index(from);
                let to = from.rotate_cw();
                let forward = table.offsets(from, Direction::Clockwise);
                let back = table.offsets(to, Direction::CounterClockwise);
                for (f, b) in forward.iter().zip(back.iter()) {
                    assert_eq!((f.x, f.y), (-b.x, -b.y));
                }
            }
        }
    }
}
