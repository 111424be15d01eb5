//! SAT solver backends.
//!
//! Both backends take the full DIMACS text of an instance and answer with a
//! [`SolveOutcome`]. Nothing is kept between calls: every call solves the
//! instance from scratch.

use super::dimacs::{self, Assignment};
use crate::error::{Result, TilingError};
use cadical::Solver;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Conventional exit status of a solver that found a model
pub const EXIT_SATISFIABLE: i32 = 10;
/// Conventional exit status of a solver that proved unsatisfiability
pub const EXIT_UNSATISFIABLE: i32 = 20;

/// Answer of a single solver call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Satisfiable(Assignment),
    Unsatisfiable,
}

impl SolveOutcome {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SolveOutcome::Satisfiable(_))
    }
}

/// Something that can decide a DIMACS instance
pub trait SatBackend {
    /// Decide `instance`; hard failures surface as [`TilingError::SolverFailure`]
    fn solve(&mut self, instance: &str) -> Result<SolveOutcome>;
}

/// In-process CaDiCaL, fed from the same text an external solver would read
#[derive(Debug, Default)]
pub struct CadicalSolver {
    last_solve_time: Duration,
}

impl CadicalSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_solve_time(&self) -> Duration {
        self.last_solve_time
    }
}

impl SatBackend for CadicalSolver {
    fn solve(&mut self, instance: &str) -> Result<SolveOutcome> {
        let (num_vars, clauses) = dimacs::parse_instance(instance)?;

        let start_time = Instant::now();
        let mut solver: Solver = Solver::new();
        for clause in &clauses {
            solver.add_clause(clause.literals.iter().copied());
        }

        let result = solver.solve();
        self.last_solve_time = start_time.elapsed();
        debug!(
            variables = num_vars,
            clauses = clauses.len(),
            elapsed_ms = self.last_solve_time.as_millis() as u64,
            "cadical finished"
        );

        match result {
            Some(true) => {
                let mut assignment = Assignment::with_capacity(num_vars);
                for var in 1..=num_vars as i32 {
                    if let Some(value) = solver.value(var) {
                        assignment.insert(var, value);
                    }
                }
                Ok(SolveOutcome::Satisfiable(assignment))
            }
            Some(false) => Ok(SolveOutcome::Unsatisfiable),
            None => Err(TilingError::SolverFailure("cadical gave up without an answer".to_string())),
        }
    }
}

/// A DIMACS solver run as a child process, one process per call.
///
/// The instance goes to stdin; exit status 10 means SAT with `v` lines on
/// stdout, 20 means UNSAT, anything else is a failure. There is no timeout:
/// a hung solver hangs the caller.
#[derive(Debug, Clone)]
pub struct ExternalSolver {
    command: String,
    args: Vec<String>,
}

impl ExternalSolver {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl SatBackend for ExternalSolver {
    fn solve(&mut self, instance: &str) -> Result<SolveOutcome> {
        let start_time = Instant::now();
        info!(command = %self.command, bytes = instance.len(), "sending instance to solver");

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TilingError::SolverFailure(format!("failed to start '{}': {}", self.command, e)))?;

        // stdin is fed from its own thread while this one drains stdout and stderr
        let writer = child.stdin.take().map(|mut stdin| {
            let bytes = instance.as_bytes().to_vec();
            thread::spawn(move || stdin.write_all(&bytes))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| TilingError::SolverFailure(format!("failed to wait for '{}': {}", self.command, e)))?;

        if let Some(writer) = writer {
            match writer.join() {
                // A solver may exit before reading everything; its status still decides the outcome
                Ok(Err(e)) => warn!("could not write the whole instance to the solver: {}", e),
                Err(_) => warn!("instance writer thread panicked"),
                Ok(Ok(())) => {}
            }
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            debug!(target: "solver_stderr", "{}", line);
        }
        info!(
            status = ?output.status.code(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "solver finished"
        );

        match output.status.code() {
            Some(EXIT_SATISFIABLE) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                match dimacs::parse_assignment(&stdout)? {
                    Some(assignment) => Ok(SolveOutcome::Satisfiable(assignment)),
                    None => Err(TilingError::SolverFailure(
                        "solver reported SAT but printed no assignment".to_string(),
                    )),
                }
            }
            Some(EXIT_UNSATISFIABLE) => Ok(SolveOutcome::Unsatisfiable),
            other => Err(TilingError::SolverFailure(format!(
                "'{}' exited with status {:?}: {}",
                self.command,
                other,
                stderr.trim()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadical_satisfiable() {
        let mut solver = CadicalSolver::new();

        // (x1 ∨ x2) ∧ (¬x1 ∨ x2)
        let outcome = solver.solve("p cnf 2 2\n1 2 0\n-1 2 0\n").unwrap();
        match outcome {
            SolveOutcome::Satisfiable(assignment) => {
                assert_eq!(assignment.get(&2), Some(&true));
                assert!(assignment.contains_key(&1));
            }
            SolveOutcome::Unsatisfiable => panic!("expected SAT"),
        }
    }

    #[test]
    fn test_cadical_unsatisfiable() {
        let mut solver = CadicalSolver::new();
        let outcome = solver.solve("p cnf 1 2\n1 0\n-1 0\n").unwrap();
        assert_eq!(outcome, SolveOutcome::Unsatisfiable);
    }

    #[test]
    fn test_cadical_rejects_malformed_instance() {
        let mut solver = CadicalSolver::new();
        assert!(matches!(
            solver.solve("1 2 0\n"),
            Err(TilingError::MalformedInstance(_))
        ));
    }

    #[test]
    fn test_missing_external_solver() {
        let mut solver = ExternalSolver::new("definitely-not-a-sat-solver-binary", Vec::new());
        assert!(matches!(
            solver.solve("p cnf 1 1\n1 0\n"),
            Err(TilingError::SolverFailure(_))
        ));
    }

    #[cfg(unix)]
    mod scripted {
        use super::*;

        fn script(body: &str) -> ExternalSolver {
            ExternalSolver::new("sh", vec!["-c".to_string(), body.to_string()])
        }

        #[test]
        fn test_external_sat() {
            let mut solver = script("cat > /dev/null; echo 's SATISFIABLE'; echo 'v 1 -2'; echo 'v 0'; exit 10");
            let outcome = solver.solve("p cnf 2 1\n1 0\n").unwrap();

            let mut expected = Assignment::new();
            expected.insert(1, true);
            expected.insert(2, false);
            assert_eq!(outcome, SolveOutcome::Satisfiable(expected));
        }

        #[test]
        fn test_external_unsat() {
            let mut solver = script("cat > /dev/null; echo 's UNSATISFIABLE'; exit 20");
            assert_eq!(solver.solve("p cnf 1 2\n1 0\n-1 0\n").unwrap(), SolveOutcome::Unsatisfiable);
        }

        #[test]
        fn test_external_sat_without_model_is_failure() {
            let mut solver = script("cat > /dev/null; echo 's SATISFIABLE'; exit 10");
            assert!(matches!(
                solver.solve("p cnf 1 1\n1 0\n"),
                Err(TilingError::SolverFailure(_))
            ));
        }

        #[test]
        fn test_chatty_solver_does_not_block_on_large_instance() {
            // Fills the stdout pipe before reading any input
            let mut solver = script("head -c 200000 /dev/zero | tr '\\0' c; cat > /dev/null; exit 20");

            let mut instance = String::from("p cnf 3 100000\n");
            for i in 0..100_000 {
                instance.push_str(if i % 2 == 0 { "1 -2 3 0\n" } else { "-1 2 -3 0\n" });
            }
            assert_eq!(solver.solve(&instance).unwrap(), SolveOutcome::Unsatisfiable);
        }

        #[test]
        fn test_external_error_status() {
            let mut solver = script("cat > /dev/null; echo 'boom' >&2; exit 1");
            let err = solver.solve("p cnf 1 1\n1 0\n").unwrap_err();
            assert!(err.to_string().contains("boom"));
        }
    }
}
