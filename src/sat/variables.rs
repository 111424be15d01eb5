//! Variable management for SAT encoding

use crate::error::{Result, TilingError};
use crate::puzzle::PieceId;
use std::collections::HashMap;
use std::fmt;

/// Named boolean propositions used in the encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Proposition {
    /// Cell (row, col) shows an `O`
    Color { row: usize, col: usize },
    /// Cell (row, col) holds part `part` of piece `piece`
    Occupied {
        row: usize,
        col: usize,
        piece: PieceId,
        part: usize,
    },
    /// Prefix variable `index` of sequential-counter group `group`
    Counter { group: usize, index: usize },
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Proposition::Color { row, col } => write!(f, "o_{}_{}", row, col),
            Proposition::Occupied {
                row,
                col,
                piece,
                part,
            } => write!(f, "p_{}_{}_{}_{}", row, col, piece, part),
            Proposition::Counter { group, index } => write!(f, "s_{}_{}", index, group),
        }
    }
}

/// Assigns dense positive ids (starting at 1) to propositions, append-only
#[derive(Debug, Default)]
pub struct VariableRegistry {
    /// Map from proposition to SAT variable ID
    variable_map: HashMap<Proposition, i32>,
    /// Reverse map, `propositions[id - 1]`
    propositions: Vec<Proposition>,
    frozen: bool,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new proposition and return its id.
    ///
    /// Registering the same proposition twice is a usage error.
    pub fn register(&mut self, proposition: Proposition) -> Result<i32> {
        if self.frozen {
            return Err(TilingError::RegistryFrozen(proposition.to_string()));
        }
        if self.variable_map.contains_key(&proposition) {
            return Err(TilingError::DuplicateProposition(proposition.to_string()));
        }

        self.propositions.push(proposition);
        let id = self.propositions.len() as i32;
        self.variable_map.insert(proposition, id);
        Ok(id)
    }

    /// Id of a registered proposition
    pub fn id_of(&self, proposition: &Proposition) -> Result<i32> {
        self.variable_map
            .get(proposition)
            .copied()
            .ok_or_else(|| TilingError::UnregisteredProposition(proposition.to_string()))
    }

    /// Signed literal for a proposition: positive asserts it, negative denies it
    pub fn literal(&self, proposition: &Proposition, positive: bool) -> Result<i32> {
        let id = self.id_of(proposition)?;
        Ok(if positive { id } else { -id })
    }

    /// Reverse lookup by id
    pub fn proposition_of(&self, id: i32) -> Option<&Proposition> {
        usize::try_from(id)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.propositions.get(i))
    }

    /// Whether a literal refers to a registered variable
    pub fn contains_literal(&self, literal: i32) -> bool {
        literal != 0 && literal.unsigned_abs() as usize <= self.propositions.len()
    }

    /// Iterate `(id, proposition)` in registration order
    pub fn iter(&self) -> impl Iterator<Item = (i32, &Proposition)> {
        self.propositions
            .iter()
            .enumerate()
            .map(|(i, p)| (i as i32 + 1, p))
    }

    /// Get the total number of variables created
    pub fn variable_count(&self) -> usize {
        self.propositions.len()
    }

    /// Stop accepting registrations; ids are fixed from here on
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Human readable form of a literal, e.g. `-p_0_1_3_0`
    pub fn describe_literal(&self, literal: i32) -> String {
        match self.proposition_of(literal.abs()) {
            Some(p) if literal < 0 => format!("-{}", p),
            Some(p) => p.to_string(),
            None => format!("?{}", literal),
        }
    }

    /// Get statistics about variable usage
    pub fn statistics(&self) -> VariableStatistics {
        let mut stats = VariableStatistics {
            total_variables: self.variable_count(),
            ..Default::default()
        };

        for proposition in &self.propositions {
            match proposition {
                Proposition::Color { .. } => stats.color_variables += 1,
                Proposition::Occupied { .. } => stats.occupied_variables += 1,
                Proposition::Counter { .. } => stats.counter_variables += 1,
            }
        }

        stats
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone, Default)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub color_variables: usize,
    pub occupied_variables: usize,
    pub counter_variables: usize,
}

impl fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Colour variables: {}", self.color_variables)?;
        writeln!(f, "  Occupancy variables: {}", self.occupied_variables)?;
        writeln!(f, "  Counter variables: {}", self.counter_variables)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied(row: usize, col: usize, piece: PieceId, part: usize) -> Proposition {
        Proposition::Occupied { row, col, piece, part }
    }

    #[test]
    fn test_dense_ids_in_registration_order() {
        let mut registry = VariableRegistry::new();

        let a = registry.register(Proposition::Color { row: 0, col: 0 }).unwrap();
        let b = registry.register(occupied(0, 0, 1, 2)).unwrap();

        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(registry.id_of(&occupied(0, 0, 1, 2)).unwrap(), 2);
        assert_eq!(registry.variable_count(), 2);
    }

    #[test]
    fn test_duplicate_registration_is_an_error() {
        let mut registry = VariableRegistry::new();
        registry.register(occupied(1, 1, 0, 0)).unwrap();

        assert!(matches!(
            registry.register(occupied(1, 1, 0, 0)),
            Err(TilingError::DuplicateProposition(_))
        ));
        assert_eq!(registry.variable_count(), 1);
    }

    #[test]
    fn test_reverse_lookup() {
        let mut registry = VariableRegistry::new();
        let prop = occupied(2, 3, 4, 1);
        let id = registry.register(prop).unwrap();

        assert_eq!(registry.proposition_of(id), Some(&prop));
        assert_eq!(registry.proposition_of(0), None);
        assert_eq!(registry.proposition_of(-1), None);
        assert_eq!(registry.proposition_of(id + 1), None);
    }

    #[test]
    fn test_unregistered_lookup_fails() {
        let registry = VariableRegistry::new();
        assert!(matches!(
            registry.id_of(&Proposition::Color { row: 0, col: 0 }),
            Err(TilingError::UnregisteredProposition(_))
        ));
    }

    #[test]
    fn test_frozen_registry() {
        let mut registry = VariableRegistry::new();
        registry.register(Proposition::Color { row: 0, col: 0 }).unwrap();
        registry.freeze();

        assert!(registry.is_frozen());
        assert!(matches!(
            registry.register(Proposition::Color { row: 0, col: 1 }),
            Err(TilingError::RegistryFrozen(_))
        ));
    }

    #[test]
    fn test_literals_and_statistics() {
        let mut registry = VariableRegistry::new();
        let color = Proposition::Color { row: 0, col: 1 };
        registry.register(color).unwrap();
        registry.register(occupied(0, 1, 0, 0)).unwrap();
        registry.register(Proposition::Counter { group: 0, index: 0 }).unwrap();

        assert_eq!(registry.literal(&color, false).unwrap(), -1);
        assert_eq!(registry.describe_literal(-1), "-o_0_1");
        assert!(registry.contains_literal(-3));
        assert!(!registry.contains_literal(4));

        let stats = registry.statistics();
        assert_eq!(stats.total_variables, 3);
        assert_eq!(stats.color_variables, 1);
        assert_eq!(stats.occupied_variables, 1);
        assert_eq!(stats.counter_variables, 1);
    }
}
