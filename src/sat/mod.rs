//! SAT encoding components for the XOXO tiling puzzle

pub mod cardinality;
pub mod constraints;
pub mod dimacs;
pub mod encoder;
pub mod solver;
pub mod solver_factory;
pub mod variables;

pub use cardinality::CardinalityEncoder;
pub use constraints::{Clause, ClauseCompiler};
pub use dimacs::Assignment;
pub use encoder::{Encoding, EncodingStatistics};
pub use solver::{CadicalSolver, ExternalSolver, SatBackend, SolveOutcome};
pub use solver_factory::UnifiedSolver;
pub use variables::{Proposition, VariableRegistry};
