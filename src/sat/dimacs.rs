//! DIMACS CNF exchange with external solvers.
//!
//! Instances are written as `p cnf <vars> <clauses>` followed by one line per
//! clause ending in `0`. Solver answers are read from `v`/`V` lines, which may
//! spread one assignment over several lines until the terminating `0`.

use super::constraints::Clause;
use super::encoder::Encoding;
use crate::error::{Result, TilingError};
use std::collections::HashMap;
use std::fmt::Write;

/// Variable id -> truth value, as reported by a solver
pub type Assignment = HashMap<i32, bool>;

/// Serialise an encoding. With `with_comments`, each clause is preceded by a
/// `c` line spelling out its propositions.
pub fn emit(encoding: &Encoding, with_comments: bool) -> String {
    let registry = encoding.registry();
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "p cnf {} {}", encoding.variable_count(), encoding.clause_count());

    for clause in encoding.clauses() {
        if with_comments {
            out.push('c');
            for &literal in &clause.literals {
                let _ = write!(out, " {}", registry.describe_literal(literal));
            }
            out.push('\n');
        }
        for &literal in &clause.literals {
            let _ = write!(out, "{} ", literal);
        }
        out.push_str("0\n");
    }
    out
}

/// Read the `p cnf` header, returning (variables, clauses)
pub fn parse_header(text: &str) -> Result<(usize, usize)> {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with('p'))
        .ok_or_else(|| TilingError::MalformedInstance("missing 'p cnf' header".to_string()))?;

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 4 || parts[0] != "p" || parts[1] != "cnf" {
        return Err(TilingError::MalformedInstance(format!("bad header '{}'", line)));
    }
    let parse = |token: &str, what: &str| {
        token
            .parse::<usize>()
            .map_err(|e| TilingError::MalformedInstance(format!("invalid {} '{}': {}", what, token, e)))
    };
    Ok((parse(parts[2], "variable count")?, parse(parts[3], "clause count")?))
}

/// Parse a full instance back into clauses, checking the header counts
pub fn parse_instance(text: &str) -> Result<(usize, Vec<Clause>)> {
    let (num_vars, num_clauses) = parse_header(text)?;
    let mut clauses = Vec::with_capacity(num_clauses);
    let mut current = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('c') || line.starts_with('p') {
            continue;
        }
        for token in line.split_whitespace() {
            let literal: i32 = token
                .parse()
                .map_err(|e| TilingError::MalformedInstance(format!("invalid literal '{}': {}", token, e)))?;
            if literal == 0 {
                clauses.push(Clause::new(std::mem::take(&mut current)));
            } else if literal.unsigned_abs() as usize > num_vars {
                return Err(TilingError::MalformedInstance(format!(
                    "literal {} exceeds declared {} variables",
                    literal, num_vars
                )));
            } else {
                current.push(literal);
            }
        }
    }

    if !current.is_empty() {
        return Err(TilingError::MalformedInstance("last clause is not terminated by 0".to_string()));
    }
    if clauses.len() != num_clauses {
        return Err(TilingError::MalformedInstance(format!(
            "header declares {} clauses, found {}",
            num_clauses,
            clauses.len()
        )));
    }
    Ok((num_vars, clauses))
}

/// Collect the assignment from solver output.
///
/// Returns `Ok(None)` when no `v` line is present at all.
pub fn parse_assignment(output: &str) -> Result<Option<Assignment>> {
    let mut values = Assignment::new();
    let mut found = false;

    for line in output.lines().map(str::trim_end) {
        if !(line.starts_with("v ") || line.starts_with("V ")) {
            continue;
        }
        found = true;
        for token in line.split_whitespace().skip(1) {
            let literal: i32 = token
                .parse()
                .map_err(|e| TilingError::MalformedAssignment(format!("invalid literal '{}': {}", token, e)))?;
            if literal == 0 {
                break;
            }
            values.insert(literal.abs(), literal > 0);
        }
    }

    Ok(found.then_some(values))
}

/// Render an assignment as solver-style `v` lines, ten literals per line
pub fn format_assignment(assignment: &Assignment) -> String {
    let mut vars: Vec<i32> = assignment.keys().copied().collect();
    vars.sort_unstable();

    let mut out = String::new();
    for chunk in vars.chunks(10) {
        out.push('v');
        for &var in chunk {
            let _ = write!(out, " {}", if assignment[&var] { var } else { -var });
        }
        out.push('\n');
    }
    out.push_str("v 0\n");
    out
}
