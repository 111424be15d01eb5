//! Puzzle model: pieces, their orientations, the board and tilings

pub mod board;
pub mod geometry;
pub mod piece;
pub mod solution;

pub use board::Board;
pub use geometry::{orientations, Orientation, ORIENTATION_COUNT};
pub use piece::{Offset, Piece, PieceId, CATALOGUE};
pub use solution::{Solution, SolutionBuilder};
