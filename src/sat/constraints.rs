//! Clause generation for the XOXO tiling encoding

use super::cardinality::CardinalityEncoder;
use super::encoder::Encoding;
use super::variables::{Proposition, VariableRegistry};
use crate::config::AtMostOneEncoding;
use crate::error::Result;
use crate::puzzle::{orientations, Board, Orientation, Piece};
use itertools::Itertools;
use rayon::prelude::*;
use tracing::debug;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }
}

/// Where a piece may put part 0 and which orientations survive there
struct Anchor<'o> {
    row: usize,
    col: usize,
    valid: Vec<&'o Orientation>,
}

/// Compiles a board and its piece catalogue into an [`Encoding`]
pub struct ClauseCompiler<'b> {
    board: &'b Board,
    cardinality: CardinalityEncoder,
    registry: VariableRegistry,
    clauses: Vec<Clause>,
}

impl<'b> ClauseCompiler<'b> {
    pub fn new(board: &'b Board, at_most_one: AtMostOneEncoding) -> Self {
        Self {
            board,
            cardinality: CardinalityEncoder::new(at_most_one),
            registry: VariableRegistry::new(),
            clauses: Vec::new(),
        }
    }

    /// Run the full encoding pass; the registry is frozen afterwards
    pub fn compile(mut self) -> Result<Encoding> {
        self.register_variables()?;

        self.generate_coloring_constraints()?;
        let after_coloring = self.clauses.len();

        self.generate_cell_cardinality()?;
        self.generate_part_cardinality()?;
        let after_cardinality = self.clauses.len();

        let board = self.board;
        for piece in board.pieces() {
            self.generate_piece_constraints(piece)?;
        }

        debug!(
            coloring = after_coloring,
            cardinality = after_cardinality - after_coloring,
            shape = self.clauses.len() - after_cardinality,
            "clause families generated"
        );

        self.registry.freeze();
        Encoding::new(self.registry, self.clauses)
    }

    fn occupied(&self, row: usize, col: usize, piece: &Piece, part: usize) -> Result<i32> {
        self.registry.id_of(&Proposition::Occupied {
            row,
            col,
            piece: piece.id(),
            part,
        })
    }

    /// Colour variables first, then every (cell, piece, part) occupancy
    fn register_variables(&mut self) -> Result<()> {
        for (row, col) in self.board.cells() {
            self.registry.register(Proposition::Color { row, col })?;
        }
        for (row, col) in self.board.cells() {
            for piece in self.board.pieces() {
                for part in 0..piece.num_parts() {
                    self.registry.register(Proposition::Occupied {
                        row,
                        col,
                        piece: piece.id(),
                        part,
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Pin every colour variable to the board parity
    fn generate_coloring_constraints(&mut self) -> Result<()> {
        for (row, col) in self.board.cells() {
            let literal = self
                .registry
                .literal(&Proposition::Color { row, col }, self.board.is_color_a(row, col))?;
            self.clauses.push(Clause::unit(literal));
        }
        Ok(())
    }

    /// Exactly one piece part per cell
    fn generate_cell_cardinality(&mut self) -> Result<()> {
        for (row, col) in self.board.cells() {
            let mut literals = Vec::new();
            for piece in self.board.pieces() {
                for part in 0..piece.num_parts() {
                    literals.push(self.occupied(row, col, piece, part)?);
                }
            }
            self.cardinality
                .exactly_one(&literals, &mut self.registry, &mut self.clauses)?;
        }
        Ok(())
    }

    /// Exactly one cell per piece part
    fn generate_part_cardinality(&mut self) -> Result<()> {
        for piece in self.board.pieces() {
            for part in 0..piece.num_parts() {
                let literals = self
                    .board
                    .cells()
                    .map(|(row, col)| self.occupied(row, col, piece, part))
                    .collect::<Result<Vec<_>>>()?;
                self.cardinality
                    .exactly_one(&literals, &mut self.registry, &mut self.clauses)?;
            }
        }
        Ok(())
    }

    /// Shape and orientation agreement for one piece over every anchor cell
    fn generate_piece_constraints(&mut self, piece: &Piece) -> Result<()> {
        let all = orientations(piece);
        let board = self.board;
        let cells: Vec<(usize, usize)> = board.cells().collect();

        // The orientation filter is pure, so it is evaluated for all cells at once
        let anchors: Vec<Anchor<'_>> = cells
            .par_iter()
            .map(|&(row, col)| Anchor {
                row,
                col,
                valid: board.valid_orientations_at(row, col, piece, &all),
            })
            .collect();

        for anchor in &anchors {
            let anchor_lit = self.occupied(anchor.row, anchor.col, piece, 0)?;

            if anchor.valid.is_empty() {
                // Part 0 can never sit here; the remaining anchors are still encoded
                self.clauses.push(Clause::unit(-anchor_lit));
                continue;
            }

            self.generate_part_reachability(piece, anchor, anchor_lit)?;
            self.generate_orientation_locks(piece, anchor, anchor_lit)?;
        }
        Ok(())
    }

    /// If part 0 is at the anchor, part `l` lands where some valid orientation puts it
    fn generate_part_reachability(&mut self, piece: &Piece, anchor: &Anchor<'_>, anchor_lit: i32) -> Result<()> {
        for part in 1..piece.num_parts() {
            let mut literals = vec![-anchor_lit];
            for (row, col) in anchor
                .valid
                .iter()
                .filter_map(|o| self.board.translate(anchor.row, anchor.col, o.offsets[part]))
                .unique()
            {
                literals.push(self.occupied(row, col, piece, part)?);
            }
            self.clauses.push(Clause::new(literals));
        }
        Ok(())
    }

    /// Parts 0 and 1 plus the anchor colour fix the whole orientation
    fn generate_orientation_locks(&mut self, piece: &Piece, anchor: &Anchor<'_>, anchor_lit: i32) -> Result<()> {
        let color = Proposition::Color {
            row: anchor.row,
            col: anchor.col,
        };

        for orientation in &anchor.valid {
            let positions = orientation
                .offsets
                .iter()
                .filter_map(|&offset| self.board.translate(anchor.row, anchor.col, offset))
                .collect::<Vec<_>>();

            // Literal is false exactly when the anchor shows the colour this orientation needs
            let color_lit = self
                .registry
                .literal(&color, !orientation.part_color(piece, 0))?;

            for part in 2..piece.num_parts() {
                let (r1, c1) = positions[1];
                let (rl, cl) = positions[part];
                let clause = Clause::new(vec![
                    -anchor_lit,
                    -self.occupied(r1, c1, piece, 1)?,
                    color_lit,
                    self.occupied(rl, cl, piece, part)?,
                ]);
                self.clauses.push(clause);
            }
        }
        Ok(())
    }
}
