//! Error types for the tiling compiler and its solve loop

use crate::puzzle::PieceId;
use thiserror::Error;

/// Errors raised by the encoding, decoding and solving pipeline.
#[derive(Debug, Error)]
pub enum TilingError {
    /// A piece definition violates the catalogue invariants.
    #[error("Invalid piece #{id}: {reason}")]
    InvalidPiece { id: PieceId, reason: String },

    /// Board dimensions are unusable.
    #[error("Invalid board: {0}")]
    InvalidBoard(String),

    /// A clause referenced a proposition that was never registered.
    #[error("Proposition {0} is not registered")]
    UnregisteredProposition(String),

    /// A literal refers to a variable id outside the registry.
    #[error("Variable id {0} is not registered")]
    UnregisteredVariable(i32),

    /// The same proposition was registered twice.
    #[error("Proposition {0} registered twice")]
    DuplicateProposition(String),

    /// New propositions were requested after the initial encoding pass.
    #[error("Variable registry is frozen, cannot register {0}")]
    RegistryFrozen(String),

    /// The solver's assignment did not mention a variable the decoder needs.
    #[error("Assignment has no value for variable {0}")]
    MissingAssignment(i32),

    /// The instance text could not be parsed.
    #[error("Malformed instance: {0}")]
    MalformedInstance(String),

    /// The solver output contained an unreadable assignment line.
    #[error("Malformed assignment: {0}")]
    MalformedAssignment(String),

    /// The external solver crashed, returned an unknown status or lied about SAT.
    #[error("Solver failure: {0}")]
    SolverFailure(String),

    /// Two occupants were decoded for one cell.
    #[error("Cell ({row}, {col}) assigned twice (pieces {first} and {second})")]
    CellAssignedTwice {
        row: usize,
        col: usize,
        first: PieceId,
        second: PieceId,
    },

    /// A colour proposition disagrees with the board parity.
    #[error("Colour of cell ({row}, {col}) decoded as {decoded}, board expects {expected}")]
    ColorMismatch {
        row: usize,
        col: usize,
        decoded: bool,
        expected: bool,
    },

    /// Decoding left at least one cell without an occupant.
    #[error("Solution leaves cell ({row}, {col}) uncovered")]
    IncompleteSolution { row: usize, col: usize },

    /// Solution layout text could not be read or written.
    #[error("Invalid solution layout: {0}")]
    InvalidLayout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TilingError>;
