//! XOXO Tiling SAT Compiler
//!
//! This library compiles the XOXO polyomino tiling puzzle into CNF, hands the
//! instance to a SAT solver and decodes the answers back into tilings. It can
//! also enumerate every distinct tiling with blocking clauses.

pub mod config;
pub mod error;
pub mod puzzle;
pub mod sat;
pub mod tiling;
pub mod utils;

pub use config::Settings;
pub use error::TilingError;
pub use puzzle::{Board, Piece, Solution};
pub use tiling::{SolveResult, TilingProblem};

use anyhow::Result;
use sat::UnifiedSolver;

/// Main entry point: one tiling, or every tiling when `enumerate_all` is set
pub fn solve_tiling(settings: Settings) -> Result<Vec<Solution>> {
    let mut solver = UnifiedSolver::new(&settings.solver);
    let enumerate_all = settings.solver.enumerate_all;
    let mut problem = TilingProblem::new(settings)?;

    if enumerate_all {
        let (_, solutions) = problem.enumerate(solver, |_| {})?;
        Ok(solutions)
    } else {
        match problem.solve_once(&mut solver)? {
            SolveResult::Solved { solution, .. } => Ok(vec![solution]),
            SolveResult::Unsatisfiable => Ok(Vec::new()),
        }
    }
}
