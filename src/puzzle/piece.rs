//! Piece definitions and the fixed XOXO catalogue.
//!
//! Every part of a piece is printed either `O` or `X` on its visible side.
//! A piece stores its canonical part offsets (part 0 anchored at the origin)
//! together with one colour flag per part, `true` meaning `O`.

use crate::error::{Result, TilingError};
use itertools::Itertools;
use std::fmt;

/// Identity of a piece in the catalogue.
pub type PieceId = usize;

/// A (row, column) displacement relative to part 0.
pub type Offset = (i32, i32);

/// Literal data describing one catalogue entry.
pub struct PieceSpec {
    pub offsets: &'static [Offset],
    pub colors: &'static [bool],
}

/// The ten pieces of the XOXO puzzle, indexed by piece id.
pub const CATALOGUE: [PieceSpec; 10] = [
    PieceSpec {
        offsets: &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)],
        colors: &[true, false, true, false, true],
    },
    PieceSpec {
        offsets: &[(0, 0), (1, 0), (2, 0), (2, 1), (3, 1)],
        colors: &[false, true, false, true, false],
    },
    PieceSpec {
        offsets: &[(0, 0), (1, 0), (0, 1), (0, 2), (1, 2)],
        colors: &[false, true, true, false, true],
    },
    PieceSpec {
        offsets: &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)],
        colors: &[true, false, true, false, true],
    },
    PieceSpec {
        offsets: &[(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)],
        colors: &[false, true, false, true, false],
    },
    PieceSpec {
        offsets: &[(0, 0), (1, 0), (0, 1), (0, 2), (0, 3)],
        colors: &[true, false, false, true, false],
    },
    PieceSpec {
        offsets: &[(0, 0), (0, 1), (0, 2), (1, 1), (2, 1)],
        colors: &[true, false, true, true, false],
    },
    PieceSpec {
        offsets: &[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)],
        colors: &[true, false, true, false, true],
    },
    PieceSpec {
        offsets: &[(0, 0), (0, 1), (1, 1), (2, 1), (2, 2)],
        colors: &[false, true, false, true, false],
    },
    PieceSpec {
        offsets: &[(0, 0), (0, 1), (0, 2), (0, 3), (1, 2)],
        colors: &[true, false, true, false, false],
    },
];

/// A validated, immutable piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    offsets: Vec<Offset>,
    colors: Vec<bool>,
}

impl Piece {
    /// Build a piece, checking that part 0 sits at the origin and that
    /// edge-adjacent parts carry opposite colours.
    pub fn new(id: PieceId, offsets: Vec<Offset>, colors: Vec<bool>) -> Result<Self> {
        let invalid = |reason: String| TilingError::InvalidPiece { id, reason };

        if offsets.is_empty() {
            return Err(invalid("piece has no parts".to_string()));
        }
        if offsets.len() != colors.len() {
            return Err(invalid(format!(
                "{} offsets but {} colour flags",
                offsets.len(),
                colors.len()
            )));
        }
        if offsets[0] != (0, 0) {
            return Err(invalid(format!("part 0 is at {:?}, expected (0, 0)", offsets[0])));
        }
        if !offsets.iter().all_unique() {
            return Err(invalid("two parts share an offset".to_string()));
        }

        for (a, b) in (0..offsets.len()).tuple_combinations() {
            let (ra, ca) = offsets[a];
            let (rb, cb) = offsets[b];
            let adjacent = (ra - rb).abs() + (ca - cb).abs() == 1;
            if adjacent && colors[a] == colors[b] {
                return Err(invalid(format!(
                    "adjacent parts {} and {} have the same colour",
                    a, b
                )));
            }
        }

        Ok(Self { id, offsets, colors })
    }

    /// Build the piece stored at `id` in [`CATALOGUE`].
    pub fn from_catalogue(id: PieceId) -> Result<Self> {
        let spec = CATALOGUE.get(id).ok_or_else(|| TilingError::InvalidPiece {
            id,
            reason: format!("catalogue only has {} pieces", CATALOGUE.len()),
        })?;
        Self::new(id, spec.offsets.to_vec(), spec.colors.to_vec())
    }

    /// Build and validate the full catalogue, in id order.
    pub fn catalogue() -> Result<Vec<Piece>> {
        (0..CATALOGUE.len()).map(Self::from_catalogue).collect()
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn num_parts(&self) -> usize {
        self.offsets.len()
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    pub fn colors(&self) -> &[bool] {
        &self.colors
    }

    /// Colour flag of a part on the canonical side.
    pub fn color(&self, part: usize) -> bool {
        self.colors[part]
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min_row = self.offsets.iter().map(|&(r, _)| r).min().unwrap_or(0);
        let max_row = self.offsets.iter().map(|&(r, _)| r).max().unwrap_or(0);
        let min_col = self.offsets.iter().map(|&(_, c)| c).min().unwrap_or(0);
        let max_col = self.offsets.iter().map(|&(_, c)| c).max().unwrap_or(0);

        let mut rows = (min_row..=max_row).map(|r| {
            (min_col..=max_col)
                .map(|c| match self.offsets.iter().position(|&o| o == (r, c)) {
                    Some(part) if self.colors[part] => 'O',
                    Some(_) => 'X',
                    None => ' ',
                })
                .join(" ")
                .trim_end()
                .to_string()
        });
        write!(f, "{}", rows.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_valid() {
        let pieces = Piece::catalogue().unwrap();
        assert_eq!(pieces.len(), 10);
        for (id, piece) in pieces.iter().enumerate() {
            assert_eq!(piece.id(), id);
            assert_eq!(piece.num_parts(), 5);
            assert_eq!(piece.offsets()[0], (0, 0));
        }
    }

    #[test]
    fn test_adjacent_parts_must_alternate() {
        let result = Piece::new(0, vec![(0, 0), (0, 1)], vec![true, true]);
        assert!(matches!(result, Err(TilingError::InvalidPiece { id: 0, .. })));

        // Diagonal neighbours may share a colour
        let piece = Piece::new(1, vec![(0, 0), (0, 1), (1, 1)], vec![true, false, true]).unwrap();
        assert_eq!(piece.num_parts(), 3);
    }

    #[test]
    fn test_malformed_pieces_rejected() {
        assert!(Piece::new(0, vec![], vec![]).is_err());
        assert!(Piece::new(0, vec![(0, 0), (0, 1)], vec![true]).is_err());
        assert!(Piece::new(0, vec![(0, 1), (0, 0)], vec![true, false]).is_err());
        assert!(Piece::new(0, vec![(0, 0), (0, 0)], vec![true, false]).is_err());
        assert!(Piece::from_catalogue(10).is_err());
    }

    #[test]
    fn test_display() {
        let piece = Piece::from_catalogue(0).unwrap();
        assert_eq!(piece.to_string(), "O X O\n    X\n    O");
    }
}
