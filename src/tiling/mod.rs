//! Solving the XOXO puzzle: decoding, enumeration and the problem facade

pub mod decoder;
pub mod enumeration;
pub mod problem;

pub use decoder::SolutionDecoder;
pub use enumeration::{Discovery, DriverState, EnumerationDriver, EnumerationReport, Round};
pub use problem::{SolveResult, TilingProblem};
