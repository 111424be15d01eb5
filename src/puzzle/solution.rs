//! Decoded tilings: which piece covers each cell

use super::piece::PieceId;
use crate::error::{Result, TilingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A complete tiling. Two solutions are equal iff every cell holds the same piece.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solution {
    width: usize,
    height: usize,
    /// Piece id per cell, row-major
    cells: Vec<PieceId>,
}

/// Incrementally fills a solution, one cell at a time.
#[derive(Debug, Clone)]
pub struct SolutionBuilder {
    width: usize,
    height: usize,
    cells: Vec<Option<PieceId>>,
}

impl SolutionBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Record the occupant of a cell; a second occupant is an error.
    pub fn assign(&mut self, row: usize, col: usize, piece: PieceId) -> Result<()> {
        let slot = &mut self.cells[row * self.width + col];
        match *slot {
            Some(first) => Err(TilingError::CellAssignedTwice {
                row,
                col,
                first,
                second: piece,
            }),
            None => {
                *slot = Some(piece);
                Ok(())
            }
        }
    }

    /// Finish the solution, failing on the first uncovered cell.
    pub fn build(self) -> Result<Solution> {
        let width = self.width;
        let cells = self
            .cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| {
                cell.ok_or(TilingError::IncompleteSolution {
                    row: i / width,
                    col: i % width,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Solution {
            width,
            height: self.height,
            cells,
        })
    }
}

impl Solution {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Piece covering a cell.
    pub fn get(&self, row: usize, col: usize) -> PieceId {
        self.cells[row * self.width + col]
    }

    /// Rows of piece ids.
    pub fn rows(&self) -> impl Iterator<Item = &[PieceId]> {
        self.cells.chunks(self.width)
    }

    /// Number of cells covered by a different piece in `other`.
    pub fn distance_to(&self, other: &Solution) -> usize {
        self.cells
            .iter()
            .zip(&other.cells)
            .filter(|(a, b)| a != b)
            .count()
            + self.cells.len().abs_diff(other.cells.len())
    }

    /// One line per row, one digit per cell.
    pub fn to_layout(&self) -> Result<String> {
        let mut out = String::with_capacity(self.height * (self.width + 1));
        for row in self.rows() {
            for &piece in row {
                let digit = u32::try_from(piece)
                    .ok()
                    .and_then(|d| char::from_digit(d, 10))
                    .ok_or_else(|| {
                        TilingError::InvalidLayout(format!("piece id {} does not fit in one digit", piece))
                    })?;
                out.push(digit);
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Parse the one-digit-per-cell layout written by [`Solution::to_layout`].
    pub fn from_layout(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let height = lines.len();
        let width = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(TilingError::InvalidLayout("layout is empty".to_string()));
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != width {
                return Err(TilingError::InvalidLayout(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    line.chars().count(),
                    width
                )));
            }
            for (col, ch) in line.chars().enumerate() {
                let piece = ch.to_digit(10).ok_or_else(|| {
                    TilingError::InvalidLayout(format!("invalid character '{}' at ({}, {})", ch, row, col))
                })?;
                cells.push(piece as PieceId);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Write the layout to a file.
    pub fn save_layout<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_layout()?)?;
        Ok(())
    }

    /// Read a layout file.
    pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_layout(&content)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string, with the same shape checks as a layout
    pub fn from_json(json: &str) -> Result<Self> {
        let solution: Solution = serde_json::from_str(json)
            .map_err(|e| TilingError::InvalidLayout(format!("invalid solution JSON: {}", e)))?;
        solution.check_shape()?;
        Ok(solution)
    }

    fn check_shape(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TilingError::InvalidLayout(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.cells.len() != self.width * self.height {
            return Err(TilingError::InvalidLayout(format!(
                "{} cells for a {}x{} board",
                self.cells.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for piece in row {
                write!(f, "{:>2}", piece)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
