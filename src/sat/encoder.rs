//! Encoding session: the frozen variable registry plus the growing clause list

use super::constraints::{Clause, ClauseCompiler};
use super::dimacs;
use super::variables::{Proposition, VariableRegistry};
use crate::config::EncodingConfig;
use crate::error::{Result, TilingError};
use crate::puzzle::Board;
use std::collections::HashMap;
use std::time::Instant;
use tracing::info;

/// One encoding session. Clauses are only ever appended; every round of
/// enumeration re-serialises the whole list.
#[derive(Debug)]
pub struct Encoding {
    registry: VariableRegistry,
    clauses: Vec<Clause>,
    blocking_clauses: usize,
}

impl Encoding {
    /// Wrap compiled clauses, checking that every literal is registered
    pub fn new(registry: VariableRegistry, clauses: Vec<Clause>) -> Result<Self> {
        let mut encoding = Self {
            registry,
            clauses: Vec::with_capacity(clauses.len()),
            blocking_clauses: 0,
        };
        for clause in clauses {
            encoding.push_checked(clause)?;
        }
        Ok(encoding)
    }

    /// Compile a board with the configured cardinality strategy
    pub fn compile(board: &Board, config: &EncodingConfig) -> Result<Self> {
        let start_time = Instant::now();
        let encoding = ClauseCompiler::new(board, config.at_most_one).compile()?;

        info!(
            variables = encoding.variable_count(),
            clauses = encoding.clause_count(),
            strategy = ?config.at_most_one,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "encoded {}x{} board",
            board.width,
            board.height
        );
        Ok(encoding)
    }

    fn push_checked(&mut self, clause: Clause) -> Result<()> {
        if let Some(&bad) = clause
            .literals
            .iter()
            .find(|&&lit| !self.registry.contains_literal(lit))
        {
            return Err(TilingError::UnregisteredVariable(bad));
        }
        self.clauses.push(clause);
        Ok(())
    }

    /// Append a clause to the session
    pub fn add_clause(&mut self, clause: Clause) -> Result<()> {
        self.push_checked(clause)
    }

    /// Forbid the exact set of true occupancy propositions in `assignment`
    pub fn block(&mut self, assignment: &HashMap<i32, bool>) -> Result<Clause> {
        let literals: Vec<i32> = self
            .registry
            .iter()
            .filter(|(_, p)| matches!(p, Proposition::Occupied { .. }))
            .filter(|(id, _)| assignment.get(id).copied().unwrap_or(false))
            .map(|(id, _)| -id)
            .collect();

        let clause = Clause::new(literals);
        self.push_checked(clause.clone())?;
        self.blocking_clauses += 1;
        Ok(clause)
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn variable_count(&self) -> usize {
        self.registry.variable_count()
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Serialise the current session in DIMACS CNF
    pub fn to_dimacs(&self, with_comments: bool) -> String {
        dimacs::emit(self, with_comments)
    }

    /// Get encoding statistics
    pub fn statistics(&self) -> EncodingStatistics {
        let mut unit_clauses = 0;
        let mut binary_clauses = 0;
        let mut longest_clause = 0;
        for clause in &self.clauses {
            match clause.literals.len() {
                1 => unit_clauses += 1,
                2 => binary_clauses += 1,
                _ => {}
            }
            longest_clause = longest_clause.max(clause.literals.len());
        }

        let variables = self.registry.statistics();
        EncodingStatistics {
            total_variables: variables.total_variables,
            color_variables: variables.color_variables,
            occupied_variables: variables.occupied_variables,
            counter_variables: variables.counter_variables,
            total_clauses: self.clauses.len(),
            unit_clauses,
            binary_clauses,
            longest_clause,
            blocking_clauses: self.blocking_clauses,
        }
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub total_variables: usize,
    pub color_variables: usize,
    pub occupied_variables: usize,
    pub counter_variables: usize,
    pub total_clauses: usize,
    pub unit_clauses: usize,
    pub binary_clauses: usize,
    pub longest_clause: usize,
    pub blocking_clauses: usize,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(
            f,
            "  Variables: {} ({} colour, {} occupancy, {} counter)",
            self.total_variables, self.color_variables, self.occupied_variables, self.counter_variables
        )?;
        writeln!(f, "  Clauses: {}", self.total_clauses)?;
        writeln!(f, "  Unit clauses: {}", self.unit_clauses)?;
        writeln!(f, "  Binary clauses: {}", self.binary_clauses)?;
        writeln!(f, "  Longest clause: {}", self.longest_clause)?;
        writeln!(f, "  Blocking clauses: {}", self.blocking_clauses)?;
        Ok(())
    }
}
