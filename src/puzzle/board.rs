//! Rectangular board with a fixed checkerboard colouring

use super::geometry::Orientation;
use super::piece::{Offset, Piece, PieceId};
use crate::error::{Result, TilingError};

/// The puzzle board and the catalogue of pieces to place on it.
#[derive(Debug, Clone)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pieces: Vec<Piece>,
}

impl Board {
    /// Create a board; piece ids must match their catalogue positions.
    pub fn new(width: usize, height: usize, pieces: Vec<Piece>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TilingError::InvalidBoard(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if let Some((index, piece)) = pieces.iter().enumerate().find(|(i, p)| p.id() != *i) {
            return Err(TilingError::InvalidBoard(format!(
                "piece at position {} has id {}",
                index,
                piece.id()
            )));
        }

        Ok(Self {
            width,
            height,
            pieces,
        })
    }

    /// Board of the given size holding the full XOXO catalogue.
    pub fn with_catalogue(width: usize, height: usize) -> Result<Self> {
        Self::new(width, height, Piece::catalogue()?)
    }

    /// The standard 10x5 XOXO board.
    pub fn standard() -> Result<Self> {
        Self::with_catalogue(10, 5)
    }

    pub fn max_row(&self) -> usize {
        self.height - 1
    }

    pub fn max_col(&self) -> usize {
        self.width - 1
    }

    /// Whether the cell must show an `O`.
    #[inline]
    pub fn is_color_a(&self, row: usize, col: usize) -> bool {
        (row + col) % 2 == 1
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| (row, col)))
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    /// Total number of parts over the catalogue; a tiling needs this to equal the cell count.
    pub fn total_parts(&self) -> usize {
        self.pieces.iter().map(Piece::num_parts).sum()
    }

    /// Translate an offset from an anchor, returning `None` if it leaves the board.
    pub fn translate(&self, row: usize, col: usize, (dr, dc): Offset) -> Option<(usize, usize)> {
        let r = row as i64 + dr as i64;
        let c = col as i64 + dc as i64;
        if r < 0 || c < 0 || r > self.max_row() as i64 || c > self.max_col() as i64 {
            None
        } else {
            Some((r as usize, c as usize))
        }
    }

    /// Orientations that keep the piece on the board when part 0 sits at
    /// (row, col) and whose reflection agrees with the cell's colour.
    ///
    /// An orientation qualifies only if
    /// `reflected == (piece.color(0) != is_color_a(row, col))`.
    pub fn valid_orientations_at<'o>(
        &self,
        row: usize,
        col: usize,
        piece: &Piece,
        all_orientations: &'o [Orientation],
    ) -> Vec<&'o Orientation> {
        let required_reflection = piece.color(0) != self.is_color_a(row, col);
        all_orientations
            .iter()
            .filter(|o| o.reflected == required_reflection)
            .filter(|o| {
                o.offsets
                    .iter()
                    .all(|&offset| self.translate(row, col, offset).is_some())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::geometry::orientations;

    #[test]
    fn test_standard_board() {
        let board = Board::standard().unwrap();
        assert_eq!(board.max_row(), 4);
        assert_eq!(board.max_col(), 9);
        assert_eq!(board.cell_count(), 50);
        assert_eq!(board.total_parts(), 50);
        assert_eq!(board.cells().count(), 50);
        assert_eq!(board.cells().nth(10), Some((1, 0)));
    }

    #[test]
    fn test_checkerboard_parity() {
        let board = Board::standard().unwrap();
        assert!(!board.is_color_a(0, 0));
        assert!(board.is_color_a(0, 1));
        assert!(board.is_color_a(1, 0));
        assert!(!board.is_color_a(4, 4));
    }

    #[test]
    fn test_invalid_boards() {
        assert!(Board::with_catalogue(0, 5).is_err());
        let shuffled = vec![Piece::from_catalogue(1).unwrap()];
        assert!(Board::new(2, 2, shuffled).is_err());
    }

    #[test]
    fn test_translate_bounds() {
        let board = Board::standard().unwrap();
        assert_eq!(board.translate(0, 6, (0, 3)), Some((0, 9)));
        assert_eq!(board.translate(0, 6, (0, 4)), None);
        assert_eq!(board.translate(0, 0, (-1, 0)), None);
        assert_eq!(board.translate(4, 9, (0, 0)), Some((4, 9)));
    }

    #[test]
    fn test_straight_line_filter_at_column_six() {
        let board = Board::standard().unwrap();
        let line = Piece::from_catalogue(3).unwrap();
        let all = orientations(&line);

        let valid = board.valid_orientations_at(0, 6, &line, &all);
        assert!(!valid.is_empty());

        let rightward = vec![(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)];
        let downward = vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)];
        assert!(valid.iter().all(|o| o.offsets != rightward));
        assert!(valid.iter().any(|o| o.offsets == downward));
    }

    #[test]
    fn test_filter_respects_colour() {
        let board = Board::standard().unwrap();
        let line = Piece::from_catalogue(3).unwrap();
        let all = orientations(&line);

        // Part 0 is an `O`; on an `X` cell the piece must be turned over
        let on_x = board.valid_orientations_at(0, 0, &line, &all);
        assert!(on_x.iter().all(|o| o.reflected));

        let on_o = board.valid_orientations_at(0, 1, &line, &all);
        assert!(!on_o.is_empty());
        assert!(on_o.iter().all(|o| !o.reflected));
    }
}
