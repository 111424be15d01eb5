//! Exactly-one constraints over a set of literals
//!
//! The at-least-one half is a single disjunction. The at-most-one half is
//! either the pairwise encoding (O(n^2) binary clauses, no new variables) or
//! the sequential counter of Sinz 2005 (n - 1 prefix variables, 3n - 4 clauses).

use super::constraints::Clause;
use super::variables::{Proposition, VariableRegistry};
use crate::config::AtMostOneEncoding;
use crate::error::Result;
use itertools::Itertools;

/// Emits cardinality clauses with a configurable at-most-one strategy
#[derive(Debug, Clone)]
pub struct CardinalityEncoder {
    strategy: AtMostOneEncoding,
    /// Counter groups handed out so far, used to name prefix variables
    next_group: usize,
}

impl CardinalityEncoder {
    pub fn new(strategy: AtMostOneEncoding) -> Self {
        Self {
            strategy,
            next_group: 0,
        }
    }

    pub fn strategy(&self) -> AtMostOneEncoding {
        self.strategy
    }

    /// Exactly one of `literals` holds
    pub fn exactly_one(
        &mut self,
        literals: &[i32],
        registry: &mut VariableRegistry,
        clauses: &mut Vec<Clause>,
    ) -> Result<()> {
        self.at_most_one(literals, registry, clauses)?;
        Self::at_least_one(literals, clauses);
        Ok(())
    }

    /// At least one of `literals` holds
    pub fn at_least_one(literals: &[i32], clauses: &mut Vec<Clause>) {
        clauses.push(Clause::new(literals.to_vec()));
    }

    /// At most one of `literals` holds; nothing is emitted for fewer than two
    pub fn at_most_one(
        &mut self,
        literals: &[i32],
        registry: &mut VariableRegistry,
        clauses: &mut Vec<Clause>,
    ) -> Result<()> {
        if literals.len() < 2 {
            return Ok(());
        }

        match self.strategy {
            AtMostOneEncoding::Pairwise => {
                Self::pairwise(literals, clauses);
                Ok(())
            }
            AtMostOneEncoding::SequentialCounter => self.sequential_counter(literals, registry, clauses),
        }
    }

    fn pairwise(literals: &[i32], clauses: &mut Vec<Clause>) {
        clauses.extend(
            literals
                .iter()
                .tuple_combinations()
                .map(|(&a, &b)| Clause::binary(-a, -b)),
        );
    }

    fn sequential_counter(
        &mut self,
        literals: &[i32],
        registry: &mut VariableRegistry,
        clauses: &mut Vec<Clause>,
    ) -> Result<()> {
        let group = self.next_group;
        self.next_group += 1;

        let n = literals.len() - 1;
        // s[i] holds when some literal among x_0..=x_i is true
        let s = (0..n)
            .map(|index| registry.register(Proposition::Counter { group, index }))
            .collect::<Result<Vec<_>>>()?;

        clauses.push(Clause::binary(-literals[0], s[0]));
        clauses.push(Clause::binary(-literals[n], -s[n - 1]));

        for i in 1..n {
            clauses.push(Clause::binary(-literals[i], s[i]));
            clauses.push(Clause::binary(-s[i - 1], s[i]));
            clauses.push(Clause::binary(-literals[i], -s[i - 1]));
        }

        Ok(())
    }
}
