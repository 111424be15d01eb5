//! Repeated solve / decode / block rounds over one encoding session.
//!
//! Every round serialises the whole clause list again and hands it to the
//! backend, so round `n` costs more than round `n - 1`. Nothing is solved
//! incrementally.

use super::decoder::SolutionDecoder;
use crate::error::Result;
use crate::puzzle::{Board, Solution};
use crate::sat::{Assignment, Encoding, SatBackend, SolveOutcome};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Searching,
    Done,
}

/// Result of a single [`EnumerationDriver::step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Round {
    /// The solver found a model; `is_new` is false when the decoded tiling
    /// was already seen in an earlier round
    Found {
        solution: Solution,
        assignment: Assignment,
        is_new: bool,
    },
    /// UNSAT, the cap was hit, or the driver had already finished
    Finished,
}

/// Passed to the per-solution callback of [`EnumerationDriver::run`]
#[derive(Debug)]
pub struct Discovery<'r> {
    pub solution: &'r Solution,
    pub assignment: &'r Assignment,
    pub is_new: bool,
    /// 1-based number of the satisfiable round that produced it
    pub round: usize,
    pub elapsed: Duration,
}

/// Summary once the driver reaches [`DriverState::Done`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationReport {
    pub solver_calls: usize,
    pub satisfiable_rounds: usize,
    pub distinct_solutions: usize,
    pub capped: bool,
    pub elapsed: Duration,
}

impl std::fmt::Display for EnumerationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Enumeration Summary:")?;
        writeln!(f, "  Solver calls: {}", self.solver_calls)?;
        writeln!(f, "  Satisfiable rounds: {}", self.satisfiable_rounds)?;
        writeln!(f, "  Distinct solutions: {}", self.distinct_solutions)?;
        if self.capped {
            writeln!(f, "  Stopped at the solution limit")?;
        }
        writeln!(f, "  Elapsed: {:.3}s", self.elapsed.as_secs_f64())?;
        Ok(())
    }
}

pub struct EnumerationDriver<'a, S: SatBackend> {
    board: &'a Board,
    encoding: &'a mut Encoding,
    solver: S,
    state: DriverState,
    max_solutions: Option<usize>,
    emit_comments: bool,
    solver_calls: usize,
    satisfiable_rounds: usize,
    capped: bool,
    seen: HashSet<Solution>,
    solutions: Vec<Solution>,
    started: Instant,
}

impl<'a, S: SatBackend> EnumerationDriver<'a, S> {
    pub fn new(board: &'a Board, encoding: &'a mut Encoding, solver: S) -> Self {
        Self {
            board,
            encoding,
            solver,
            state: DriverState::Searching,
            max_solutions: None,
            emit_comments: false,
            solver_calls: 0,
            satisfiable_rounds: 0,
            capped: false,
            seen: HashSet::new(),
            solutions: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Stop after this many satisfiable rounds
    pub fn with_max_solutions(mut self, max_solutions: Option<usize>) -> Self {
        self.max_solutions = max_solutions;
        self
    }

    /// Include `c` name lines in every instance handed to the solver
    pub fn with_comments(mut self, emit_comments: bool) -> Self {
        self.emit_comments = emit_comments;
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn solver_calls(&self) -> usize {
        self.solver_calls
    }

    /// Distinct solutions in discovery order
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn into_solutions(self) -> Vec<Solution> {
        self.solutions
    }

    /// Run one round. Errors leave the driver in `Searching`; the caller
    /// decides whether to give up.
    pub fn step(&mut self) -> Result<Round> {
        if self.state == DriverState::Done {
            return Ok(Round::Finished);
        }
        if self.max_solutions.is_some_and(|max| self.satisfiable_rounds >= max) {
            info!(limit = self.satisfiable_rounds, "solution limit reached");
            self.capped = true;
            self.state = DriverState::Done;
            return Ok(Round::Finished);
        }

        let instance = self.encoding.to_dimacs(self.emit_comments);
        self.solver_calls += 1;
        debug!(
            call = self.solver_calls,
            clauses = self.encoding.clause_count(),
            bytes = instance.len(),
            "solving"
        );

        let assignment = match self.solver.solve(&instance)? {
            SolveOutcome::Satisfiable(assignment) => assignment,
            SolveOutcome::Unsatisfiable => {
                info!(calls = self.solver_calls, "instance exhausted");
                self.state = DriverState::Done;
                return Ok(Round::Finished);
            }
        };

        let solution = SolutionDecoder::new(self.board, self.encoding.registry()).decode(&assignment)?;
        self.satisfiable_rounds += 1;

        let blocking = self.encoding.block(&assignment)?;
        debug!(literals = blocking.literals.len(), "added blocking clause");

        let is_new = self.seen.insert(solution.clone());
        if is_new {
            self.solutions.push(solution.clone());
        } else {
            warn!(round = self.satisfiable_rounds, "solver returned an already known tiling");
        }

        Ok(Round::Found {
            solution,
            assignment,
            is_new,
        })
    }

    /// Step until `Done`, calling `on_solution` for every satisfiable round
    pub fn run<F>(&mut self, mut on_solution: F) -> Result<EnumerationReport>
    where
        F: FnMut(Discovery<'_>),
    {
        while let Round::Found {
            solution,
            assignment,
            is_new,
        } = self.step()?
        {
            on_solution(Discovery {
                solution: &solution,
                assignment: &assignment,
                is_new,
                round: self.satisfiable_rounds,
                elapsed: self.started.elapsed(),
            });
        }

        let report = self.report();
        info!(
            calls = report.solver_calls,
            rounds = report.satisfiable_rounds,
            distinct = report.distinct_solutions,
            capped = report.capped,
            "enumeration finished"
        );
        Ok(report)
    }

    pub fn report(&self) -> EnumerationReport {
        EnumerationReport {
            solver_calls: self.solver_calls,
            satisfiable_rounds: self.satisfiable_rounds,
            distinct_solutions: self.solutions.len(),
            capped: self.capped,
            elapsed: self.started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AtMostOneEncoding, EncodingConfig};
    use crate::error::TilingError;
    use crate::puzzle::Piece;
    use crate::sat::CadicalSolver;
    use std::collections::VecDeque;

    /// Replays canned outcomes and records every instance it was given
    struct ScriptedSolver {
        outcomes: VecDeque<SolveOutcome>,
        instances: Vec<String>,
    }

    impl ScriptedSolver {
        fn new(outcomes: Vec<SolveOutcome>) -> Self {
            Self {
                outcomes: outcomes.into(),
                instances: Vec::new(),
            }
        }
    }

    impl SatBackend for &mut ScriptedSolver {
        fn solve(&mut self, instance: &str) -> Result<SolveOutcome> {
            self.instances.push(instance.to_string());
            self.outcomes
                .pop_front()
                .ok_or_else(|| TilingError::SolverFailure("script exhausted".to_string()))
        }
    }

    /// 1x2 board with one domino: exactly one tiling
    fn domino() -> (Board, Encoding) {
        let pieces = vec![Piece::new(0, vec![(0, 0), (0, 1)], vec![true, false]).unwrap()];
        let board = Board::new(2, 1, pieces).unwrap();
        let config = EncodingConfig {
            at_most_one: AtMostOneEncoding::Pairwise,
            emit_comments: false,
        };
        let encoding = Encoding::compile(&board, &config).unwrap();
        (board, encoding)
    }

    fn domino_model(encoding: &Encoding) -> Assignment {
        let mut assignment: Assignment = encoding.registry().iter().map(|(id, _)| (id, false)).collect();
        for proposition in [
            crate::sat::Proposition::Color { row: 0, col: 1 },
            crate::sat::Proposition::Occupied { row: 0, col: 0, piece: 0, part: 0 },
            crate::sat::Proposition::Occupied { row: 0, col: 1, piece: 0, part: 1 },
        ] {
            assignment.insert(encoding.registry().id_of(&proposition).unwrap(), true);
        }
        assignment
    }

    #[test]
    fn test_duplicate_solutions_are_not_counted_twice() {
        let (board, mut encoding) = domino();
        let model = domino_model(&encoding);
        let mut script = ScriptedSolver::new(vec![
            SolveOutcome::Satisfiable(model.clone()),
            SolveOutcome::Satisfiable(model),
            SolveOutcome::Unsatisfiable,
        ]);

        let mut flags = Vec::new();
        let report = {
            let mut driver = EnumerationDriver::new(&board, &mut encoding, &mut script);
            driver.run(|found| flags.push(found.is_new)).unwrap()
        };

        assert_eq!(flags, vec![true, false]);
        assert_eq!(report.solver_calls, 3);
        assert_eq!(report.satisfiable_rounds, 2);
        assert_eq!(report.distinct_solutions, 1);
        assert!(!report.capped);
    }

    #[test]
    fn test_each_round_resends_the_growing_instance() {
        let (board, mut encoding) = domino();
        let base = encoding.clause_count();
        let model = domino_model(&encoding);
        let mut script = ScriptedSolver::new(vec![
            SolveOutcome::Satisfiable(model),
            SolveOutcome::Unsatisfiable,
        ]);

        {
            let mut driver = EnumerationDriver::new(&board, &mut encoding, &mut script);
            driver.run(|_| {}).unwrap();
            assert_eq!(driver.state(), DriverState::Done);
            assert_eq!(driver.step().unwrap(), Round::Finished);
            assert_eq!(driver.solver_calls(), 2);
        }

        assert_eq!(script.instances.len(), 2);
        assert!(script.instances[0].starts_with(&format!("p cnf {} {}\n", encoding.variable_count(), base)));
        assert!(script.instances[1].starts_with(&format!("p cnf {} {}\n", encoding.variable_count(), base + 1)));
        assert!(script.instances[1].ends_with("-3 -6 0\n"));
    }

    #[test]
    fn test_solution_limit() {
        let (board, mut encoding) = domino();
        let model = domino_model(&encoding);
        let mut script = ScriptedSolver::new(vec![SolveOutcome::Satisfiable(model)]);

        let mut driver = EnumerationDriver::new(&board, &mut encoding, &mut script).with_max_solutions(Some(1));
        let report = driver.run(|_| {}).unwrap();

        assert!(report.capped);
        assert_eq!(report.solver_calls, 1);
        assert_eq!(driver.solutions().len(), 1);
    }

    #[test]
    fn test_solver_failure_propagates() {
        let (board, mut encoding) = domino();
        let mut script = ScriptedSolver::new(Vec::new());

        let mut driver = EnumerationDriver::new(&board, &mut encoding, &mut script);
        assert!(matches!(driver.run(|_| {}), Err(TilingError::SolverFailure(_))));
        assert_eq!(driver.state(), DriverState::Searching);
    }

    #[test]
    fn test_domino_with_cadical() {
        let (board, mut encoding) = domino();
        let mut driver = EnumerationDriver::new(&board, &mut encoding, CadicalSolver::new());
        let report = driver.run(|_| {}).unwrap();

        // The domino fits either way round with its colours flipped; both
        // placements cover the board with piece 0
        assert_eq!(report.satisfiable_rounds, 2);
        assert_eq!(report.solver_calls, 3);
        assert_eq!(report.distinct_solutions, 1);
        assert_eq!(driver.solutions()[0].get(0, 1), 0);
    }
}
