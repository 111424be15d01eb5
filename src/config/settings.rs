//! Configuration settings for the XOXO tiling compiler

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub board: BoardConfig,
    pub solver: SolverConfig,
    pub encoding: EncodingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Executable used by the external backend
    pub command: String,
    pub args: Vec<String>,
    /// Keep solving with blocking clauses until UNSAT
    pub enumerate_all: bool,
    /// Stop enumerating after this many satisfiable rounds
    pub max_solutions: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// CaDiCaL linked into the process
    Cadical,
    /// Any DIMACS solver spawned as a subprocess
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub at_most_one: AtMostOneEncoding,
    /// Write a `c` comment line naming the propositions of each clause
    pub emit_comments: bool,
}

/// Strategy used for the at-most-one half of every exactly-one constraint
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AtMostOneEncoding {
    #[default]
    Pairwise,
    SequentialCounter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub store_solutions: bool,
    pub output_directory: PathBuf,
    pub print_model: bool,
    pub print_constraints: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig {
                width: 10,
                height: 5,
            },
            solver: SolverConfig {
                backend: SolverBackend::Cadical,
                command: "cadical".to_string(),
                args: Vec::new(),
                enumerate_all: false,
                max_solutions: None,
            },
            encoding: EncodingConfig {
                at_most_one: AtMostOneEncoding::Pairwise,
                emit_comments: false,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                store_solutions: false,
                output_directory: PathBuf::from("solutions"),
                print_model: false,
                print_constraints: false,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.board.width == 0 || self.board.height == 0 {
            anyhow::bail!(
                "Board dimensions must be positive (got {}x{})",
                self.board.width,
                self.board.height
            );
        }

        if self.solver.backend == SolverBackend::External && self.solver.command.trim().is_empty() {
            anyhow::bail!("External solver backend needs a command");
        }

        if self.solver.max_solutions == Some(0) {
            anyhow::bail!("Maximum solutions must be positive");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(backend) = cli_overrides.backend {
            self.solver.backend = backend;
        }
        if let Some(ref command) = cli_overrides.solver_command {
            self.solver.command = command.clone();
        }
        if cli_overrides.enumerate_all {
            self.solver.enumerate_all = true;
        }
        if let Some(max_solutions) = cli_overrides.max_solutions {
            self.solver.max_solutions = Some(max_solutions);
        }
        if let Some(at_most_one) = cli_overrides.at_most_one {
            self.encoding.at_most_one = at_most_one;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if cli_overrides.store_solutions {
            self.output.store_solutions = true;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
        if cli_overrides.print_model {
            self.output.print_model = true;
        }
        if cli_overrides.print_constraints {
            self.output.print_constraints = true;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub backend: Option<SolverBackend>,
    pub solver_command: Option<String>,
    pub enumerate_all: bool,
    pub max_solutions: Option<usize>,
    pub at_most_one: Option<AtMostOneEncoding>,
    pub format: Option<OutputFormat>,
    pub store_solutions: bool,
    pub output_dir: Option<PathBuf>,
    pub print_model: bool,
    pub print_constraints: bool,
}
