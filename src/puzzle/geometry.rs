//! Rotations and reflections of a piece.
//!
//! A flat piece has 8 placements: 4 quarter turns of its canonical side and
//! 4 quarter turns of its mirror image (the piece turned over). Part 0 stays
//! at the origin under every transform, so it remains the translation anchor.

use super::piece::{Offset, Piece};

/// Number of orientations produced for every piece.
pub const ORIENTATION_COUNT: usize = 8;

/// One placement shape of a piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orientation {
    /// Whether the piece was turned over to reach this shape
    pub reflected: bool,
    /// Part offsets, in part order
    pub offsets: Vec<Offset>,
}

impl Orientation {
    /// Colour shown by `part` once placed in this orientation.
    ///
    /// Turning a piece over shows its other side, where every colour is inverted.
    pub fn part_color(&self, piece: &Piece, part: usize) -> bool {
        piece.color(part) != self.reflected
    }
}

/// Quarter turn: (r, c) -> (c, -r).
#[inline]
pub fn rotate((r, c): Offset) -> Offset {
    (c, -r)
}

/// Mirror across the column axis: (r, c) -> (-r, c).
#[inline]
pub fn mirror((r, c): Offset) -> Offset {
    (-r, c)
}

/// All 8 orientations of a piece: rotations 0..3 of the canonical shape
/// followed by rotations 0..3 of its mirror image. Symmetric pieces yield
/// repeated shapes; they are kept.
pub fn orientations(piece: &Piece) -> Vec<Orientation> {
    let canonical = piece.offsets().to_vec();
    let mirrored: Vec<Offset> = canonical.iter().copied().map(mirror).collect();

    let mut result = Vec::with_capacity(ORIENTATION_COUNT);
    for (reflected, base) in [(false, canonical), (true, mirrored)] {
        let mut current = base;
        for _ in 0..4 {
            let next = current.iter().copied().map(rotate).collect();
            result.push(Orientation {
                reflected,
                offsets: std::mem::replace(&mut current, next),
            });
        }
    }
    result
}
