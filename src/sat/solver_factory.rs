//! Factory for creating SAT solver instances based on configuration

use super::solver::{CadicalSolver, ExternalSolver, SatBackend, SolveOutcome};
use crate::config::{SolverBackend, SolverConfig};
use crate::error::Result;

/// Unified SAT solver interface that can use different backends
#[derive(Debug)]
pub enum UnifiedSolver {
    Cadical(CadicalSolver),
    External(ExternalSolver),
}

impl UnifiedSolver {
    /// Create a new solver instance based on the configured backend
    pub fn new(config: &SolverConfig) -> Self {
        match config.backend {
            SolverBackend::Cadical => UnifiedSolver::Cadical(CadicalSolver::new()),
            SolverBackend::External => {
                UnifiedSolver::External(ExternalSolver::new(config.command.clone(), config.args.clone()))
            }
        }
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedSolver::Cadical(_) => SolverBackend::Cadical,
            UnifiedSolver::External(_) => SolverBackend::External,
        }
    }

    /// Short name for log lines
    pub fn name(&self) -> &str {
        match self {
            UnifiedSolver::Cadical(_) => "cadical (in-process)",
            UnifiedSolver::External(solver) => solver.command(),
        }
    }
}

impl SatBackend for UnifiedSolver {
    fn solve(&mut self, instance: &str) -> Result<SolveOutcome> {
        match self {
            UnifiedSolver::Cadical(solver) => solver.solve(instance),
            UnifiedSolver::External(solver) => solver.solve(instance),
        }
    }
}

impl Default for UnifiedSolver {
    fn default() -> Self {
        UnifiedSolver::Cadical(CadicalSolver::new())
    }
}
