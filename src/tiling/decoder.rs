//! Turns a solver assignment back into a tiling

use crate::error::{Result, TilingError};
use crate::puzzle::{Board, Solution, SolutionBuilder};
use crate::sat::{Assignment, Proposition, VariableRegistry};

/// Decodes assignments against the registry of one encoding session
pub struct SolutionDecoder<'a> {
    board: &'a Board,
    registry: &'a VariableRegistry,
}

impl<'a> SolutionDecoder<'a> {
    pub fn new(board: &'a Board, registry: &'a VariableRegistry) -> Self {
        Self { board, registry }
    }

    /// Build the solution from every true occupancy variable.
    ///
    /// A cell covered twice, a colour that disagrees with the board or an
    /// uncovered cell all mean the encoder and decoder disagree, so each is
    /// an error rather than a puzzle outcome.
    pub fn decode(&self, assignment: &Assignment) -> Result<Solution> {
        let mut builder = SolutionBuilder::new(self.board.width, self.board.height);

        for (id, proposition) in self.registry.iter() {
            match *proposition {
                Proposition::Occupied { row, col, piece, .. } => {
                    if Self::value(assignment, id)? {
                        builder.assign(row, col, piece)?;
                    }
                }
                Proposition::Color { row, col } => {
                    let decoded = Self::value(assignment, id)?;
                    let expected = self.board.is_color_a(row, col);
                    if decoded != expected {
                        return Err(TilingError::ColorMismatch {
                            row,
                            col,
                            decoded,
                            expected,
                        });
                    }
                }
                Proposition::Counter { .. } => {}
            }
        }

        builder.build()
    }

    fn value(assignment: &Assignment, id: i32) -> Result<bool> {
        assignment
            .get(&id)
            .copied()
            .ok_or(TilingError::MissingAssignment(id))
    }
}
