//! Piece colors, indexed by kind.

use crate::fb::Rgb;
use crate::types::PieceKind;

/// Foreground colors in `PieceKind::ALL` order.
pub const PIECE_COLORS: [Rgb; 7] = [
    Rgb::new(80, 220, 220),  // I
    Rgb::new(240, 220, 80),  // O
    Rgb::new(200, 120, 220), // T
    Rgb::new(100, 220, 120), // S
    Rgb::new(220, 80, 80),   // Z
    Rgb::new(80, 120, 220),  // J
    Rgb::new(255, 165, 0),   // L
];

pub fn piece_color(kind: PieceKind) -> Rgb {
    PIECE_COLORS[kind.index()]
}
