//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::puzzle::{Board, Solution};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Render every cell as `<piece><O|X>`, coloured by piece.
    ///
    /// `O` marks cells of the A colour class of the checkerboard.
    pub fn format_solution(solution: &Solution, board: &Board) -> String {
        let mut output = String::new();
        for (row, cells) in solution.rows().enumerate() {
            for (col, &piece) in cells.iter().enumerate() {
                if col > 0 {
                    output.push(' ');
                }
                let mark = if board.is_color_a(row, col) { 'O' } else { 'X' };
                output.push_str(&ColorOutput::colored(&format!("{}{}", piece, mark), Color::for_piece(piece)));
            }
            output.push('\n');
        }
        output
    }

    /// Plain digit layout, one line per row
    pub fn format_solution_compact(solution: &Solution) -> String {
        solution.to_layout().unwrap_or_else(|_| solution.to_string())
    }

    /// Save solutions in the configured format, returning the written paths.
    ///
    /// Text files hold the digit layout that `compare` reads back.
    pub fn save_solutions<P: AsRef<Path>>(
        solutions: &[Solution],
        output_dir: P,
        format: OutputFormat,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let mut written = Vec::with_capacity(solutions.len());
        for (i, solution) in solutions.iter().enumerate() {
            written.push(Self::save_solution(solution, i + 1, output_dir, format)?);
        }
        Ok(written)
    }

    /// Save one solution as `solution_<index>.{txt,json}`
    pub fn save_solution(solution: &Solution, index: usize, output_dir: &Path, format: OutputFormat) -> Result<PathBuf> {
        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join(format!("solution_{:03}.txt", index));
                solution
                    .save_layout(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join(format!("solution_{:03}.json", index));
                let json = solution.to_json().context("Failed to serialize solution")?;
                std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
                path
            }
        };
        Ok(path)
    }

    /// Load a stored solution, picking the reader from the file extension
    pub fn load_solution<P: AsRef<Path>>(path: P) -> Result<Solution> {
        let path = path.as_ref();
        if path.extension().is_some_and(|ext| ext == "json") {
            let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
            Solution::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Solution::load_layout(path).with_context(|| format!("Failed to load layout {}", path.display()))
        }
    }

    /// Pairwise count of differing cells, as a table
    pub fn distance_matrix(names: &[String], solutions: &[Solution]) -> String {
        if solutions.is_empty() {
            return "No solutions to compare".to_string();
        }

        let width = names.iter().map(String::len).max().unwrap_or(0).max(4);
        let mut output = format!("{:width$}", "", width = width);
        for i in 0..solutions.len() {
            output.push_str(&format!(" {:>4}", i + 1));
        }
        output.push('\n');

        for (i, (name, a)) in names.iter().zip(solutions).enumerate() {
            output.push_str(&format!("{:width$}", name, width = width));
            for (j, b) in solutions.iter().enumerate() {
                if i == j {
                    output.push_str("    -");
                } else {
                    output.push_str(&format!(" {:>4}", a.distance_to(b)));
                }
            }
            output.push('\n');
        }
        output
    }
}

/// Human readable duration: `850ms`, `12.40s`, `3m 05s`
pub fn nice_time(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
}

impl Color {
    const PALETTE: [Color; 10] = [
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::BrightRed,
        Color::BrightGreen,
        Color::BrightYellow,
        Color::BrightBlue,
    ];

    /// Stable colour per piece id, cycling past the palette
    pub fn for_piece(piece: usize) -> Color {
        Self::PALETTE[piece % Self::PALETTE.len()]
    }

    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
            Color::BrightRed => 91,
            Color::BrightGreen => 92,
            Color::BrightYellow => 93,
            Color::BrightBlue => 94,
        }
    }
}
