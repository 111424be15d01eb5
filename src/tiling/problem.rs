//! XOXO tiling problem definition

use super::decoder::SolutionDecoder;
use super::enumeration::{Discovery, EnumerationDriver, EnumerationReport};
use crate::config::Settings;
use crate::puzzle::{Board, Solution};
use crate::sat::{Assignment, Encoding, EncodingStatistics, SatBackend, SolveOutcome};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Terminal outcome of a single solve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Solved {
        solution: Solution,
        assignment: Assignment,
    },
    Unsatisfiable,
}

/// A board, its catalogue and the encoding session built from them
pub struct TilingProblem {
    settings: Settings,
    board: Board,
    encoding: Encoding,
}

impl TilingProblem {
    /// Build the board from settings with the standard catalogue and encode it
    pub fn new(settings: Settings) -> Result<Self> {
        let board = Board::with_catalogue(settings.board.width, settings.board.height)
            .context("Failed to build the board")?;
        Self::with_board(settings, board)
    }

    /// Encode an explicit board (custom catalogues, tests)
    pub fn with_board(settings: Settings, board: Board) -> Result<Self> {
        if board.total_parts() != board.cell_count() {
            warn!(
                parts = board.total_parts(),
                cells = board.cell_count(),
                "piece parts do not match the cell count, the instance will be unsatisfiable"
            );
        }

        let encoding = Encoding::compile(&board, &settings.encoding).context("Failed to encode the board")?;

        Ok(Self {
            settings,
            board,
            encoding,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Current instance text, including any blocking clauses added so far
    pub fn dimacs(&self) -> String {
        self.encoding.to_dimacs(self.settings.encoding.emit_comments)
    }

    /// Get encoding statistics
    pub fn encoding_statistics(&self) -> EncodingStatistics {
        self.encoding.statistics()
    }

    /// One solve of the current instance, decoded
    pub fn solve_once<S: SatBackend>(&self, solver: &mut S) -> Result<SolveResult> {
        let outcome = solver.solve(&self.dimacs()).context("SAT solving failed")?;

        match outcome {
            SolveOutcome::Satisfiable(assignment) => {
                let solution = SolutionDecoder::new(&self.board, self.encoding.registry())
                    .decode(&assignment)
                    .context("Failed to decode the solver assignment")?;
                info!("instance is satisfiable");
                Ok(SolveResult::Solved { solution, assignment })
            }
            SolveOutcome::Unsatisfiable => {
                info!("instance is unsatisfiable");
                Ok(SolveResult::Unsatisfiable)
            }
        }
    }

    /// Enumerate tilings until UNSAT or the configured limit.
    ///
    /// Blocking clauses stay in this problem's encoding afterwards.
    pub fn enumerate<S, F>(&mut self, solver: S, on_solution: F) -> Result<(EnumerationReport, Vec<Solution>)>
    where
        S: SatBackend,
        F: FnMut(Discovery<'_>),
    {
        let mut driver = EnumerationDriver::new(&self.board, &mut self.encoding, solver)
            .with_max_solutions(self.settings.solver.max_solutions)
            .with_comments(self.settings.encoding.emit_comments);

        let report = driver.run(on_solution).context("Enumeration failed")?;
        Ok((report, driver.into_solutions()))
    }
}
