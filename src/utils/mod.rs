//! Output helpers for the command line front end

pub mod display;

pub use display::{nice_time, Color, ColorOutput, SolutionFormatter};
