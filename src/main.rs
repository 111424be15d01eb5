//! Main CLI application for the XOXO tiling solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use xoxo_tiler::{
    config::{AtMostOneEncoding, CliOverrides, OutputFormat, Settings, SolverBackend},
    puzzle::Piece,
    sat::{dimacs, UnifiedSolver},
    tiling::{SolveResult, TilingProblem},
    utils::{nice_time, ColorOutput, SolutionFormatter},
};

#[derive(Parser)]
#[command(name = "xoxo_tiler")]
#[command(about = "XOXO tiling puzzle SAT compiler")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the puzzle once, or enumerate every tiling
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Enumerate all tilings with blocking clauses
        #[arg(short, long)]
        all: bool,

        /// Stop after this many solutions
        #[arg(short, long)]
        max: Option<usize>,

        /// Solver backend (overrides config)
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,

        /// External solver executable (overrides config)
        #[arg(long)]
        solver_cmd: Option<String>,

        /// At-most-one encoding (overrides config)
        #[arg(long, value_enum)]
        at_most_one: Option<AtMostOneArg>,

        /// Store every solution in the output directory
        #[arg(short, long)]
        store: bool,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format for stored solutions (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Print the raw assignment of every solution
        #[arg(long)]
        print_model: bool,

        /// Print the DIMACS instance before solving
        #[arg(long)]
        print_constraints: bool,
    },

    /// Write the DIMACS instance without solving it
    Emit {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Add a comment line naming the literals of each clause
        #[arg(long)]
        comments: bool,

        /// At-most-one encoding (overrides config)
        #[arg(long, value_enum)]
        at_most_one: Option<AtMostOneArg>,
    },

    /// Show the piece catalogue
    Pieces,

    /// Create example configuration files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Compare stored solutions cell by cell
    Compare {
        /// Solution files, or directories of them
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Cadical,
    External,
}

impl From<BackendArg> for SolverBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Cadical => SolverBackend::Cadical,
            BackendArg::External => SolverBackend::External,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AtMostOneArg {
    Pairwise,
    SequentialCounter,
}

impl From<AtMostOneArg> for AtMostOneEncoding {
    fn from(arg: AtMostOneArg) -> Self {
        match arg {
            AtMostOneArg::Pairwise => AtMostOneEncoding::Pairwise,
            AtMostOneArg::SequentialCounter => AtMostOneEncoding::SequentialCounter,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Solve {
            config,
            all,
            max,
            backend,
            solver_cmd,
            at_most_one,
            store,
            output,
            format,
            print_model,
            print_constraints,
        } => {
            let overrides = CliOverrides {
                backend: backend.map(Into::into),
                solver_command: solver_cmd,
                enumerate_all: all,
                max_solutions: max,
                at_most_one: at_most_one.map(Into::into),
                format: format.map(Into::into),
                store_solutions: store,
                output_dir: output,
                print_model,
                print_constraints,
            };
            solve_command(config, &overrides, cli.verbose > 0)
        }
        Commands::Emit {
            config,
            output,
            comments,
            at_most_one,
        } => emit_command(config, output, comments, at_most_one.map(Into::into)),
        Commands::Pieces => pieces_command(),
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Compare { paths } => compare_command(&paths),
    }
}

/// Settings from `path`, or the defaults when the file does not exist
fn load_settings(path: &PathBuf) -> Result<Settings> {
    if path.exists() {
        Settings::from_file(path).with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!("Config file {} not found, using defaults", path.display()))
        );
        Ok(Settings::default())
    }
}

fn solve_command(config_path: PathBuf, overrides: &CliOverrides, verbose: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Starting XOXO tiling solver"));

    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;

    if verbose {
        println!("Configuration:");
        println!("  Board: {}x{}", settings.board.width, settings.board.height);
        println!("  Backend: {:?}", settings.solver.backend);
        println!("  At-most-one: {:?}", settings.encoding.at_most_one);
        println!("  Enumerate all: {}", settings.solver.enumerate_all);
        println!();
    }

    let start_time = Instant::now();
    let mut problem = TilingProblem::new(settings.clone()).context("Failed to create tiling problem")?;
    let mut solver = UnifiedSolver::new(&settings.solver);

    if verbose {
        println!("{}", problem.encoding_statistics());
    }
    if settings.output.print_constraints {
        print!("{}", problem.dimacs());
    }

    println!("{}", ColorOutput::info(&format!("Solving with {}...", solver.name())));

    if !settings.solver.enumerate_all {
        match problem.solve_once(&mut solver)? {
            SolveResult::Solved { solution, assignment } => {
                println!(
                    "{}",
                    ColorOutput::success(&format!("SATISFIABLE after {}", nice_time(start_time.elapsed())))
                );
                println!("{}", SolutionFormatter::format_solution(&solution, problem.board()));
                if settings.output.print_model {
                    print!("{}", dimacs::format_assignment(&assignment));
                }
                if settings.output.store_solutions {
                    let path = SolutionFormatter::save_solution(
                        &solution,
                        1,
                        &settings.output.output_directory,
                        settings.output.format,
                    )?;
                    println!("Saved {}", path.display());
                }
            }
            SolveResult::Unsatisfiable => {
                println!("{}", ColorOutput::warning("UNSATISFIABLE: no tiling exists"));
            }
        }
        return Ok(());
    }

    let board = problem.board().clone();
    let output = &settings.output;
    if output.store_solutions {
        std::fs::create_dir_all(&output.output_directory)
            .with_context(|| format!("Failed to create directory: {}", output.output_directory.display()))?;
    }

    let mut stored = 0;
    let mut store_error = None;
    let (report, _) = problem.enumerate(solver, |found| {
        if !found.is_new {
            println!(
                "{}",
                ColorOutput::warning(&format!("Round {} repeated a known tiling", found.round))
            );
            return;
        }

        println!(
            "\n{}",
            ColorOutput::info(&format!("Solution {} ({})", found.round, nice_time(found.elapsed)))
        );
        println!("{}", SolutionFormatter::format_solution(found.solution, &board));
        if output.print_model {
            print!("{}", dimacs::format_assignment(found.assignment));
        }
        if output.store_solutions && store_error.is_none() {
            stored += 1;
            if let Err(e) =
                SolutionFormatter::save_solution(found.solution, stored, &output.output_directory, output.format)
            {
                store_error = Some(e);
            }
        }
    })?;

    if let Some(e) = store_error {
        return Err(e.context("Failed to save solutions"));
    }

    println!("\n{}", report);
    if report.distinct_solutions == 0 {
        println!("{}", ColorOutput::warning("No solutions found"));
    } else {
        println!(
            "{}",
            ColorOutput::success(&format!(
                "Found {} distinct solution(s) in {}",
                report.distinct_solutions,
                nice_time(report.elapsed)
            ))
        );
    }
    if stored > 0 {
        println!("Solutions saved to {}", output.output_directory.display());
    }
    if verbose {
        println!("\n{}", problem.encoding_statistics());
    }

    Ok(())
}

fn emit_command(
    config_path: PathBuf,
    output: Option<PathBuf>,
    comments: bool,
    at_most_one: Option<AtMostOneEncoding>,
) -> Result<()> {
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)?
    } else {
        Settings::default()
    };
    if let Some(at_most_one) = at_most_one {
        settings.encoding.at_most_one = at_most_one;
    }
    settings.encoding.emit_comments |= comments;

    let problem = TilingProblem::new(settings).context("Failed to create tiling problem")?;
    let instance = problem.dimacs();

    match output {
        Some(path) => {
            std::fs::write(&path, &instance).with_context(|| format!("Failed to write {}", path.display()))?;
            let stats = problem.encoding_statistics();
            println!(
                "{}",
                ColorOutput::success(&format!(
                    "Wrote {} variables and {} clauses to {}",
                    stats.total_variables,
                    stats.total_clauses,
                    path.display()
                ))
            );
        }
        None => print!("{}", instance),
    }
    Ok(())
}

fn pieces_command() -> Result<()> {
    let pieces = Piece::catalogue().context("Piece catalogue is invalid")?;
    println!("{}", ColorOutput::info(&format!("{} pieces:", pieces.len())));
    for piece in &pieces {
        println!("\nPiece {} ({} parts)", piece.id(), piece.num_parts());
        println!("{}", piece);
    }
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let output_dir = directory.join("solutions");
    for dir in [&config_dir, &output_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut enumerate = Settings::default();
    enumerate.solver.enumerate_all = true;
    enumerate.solver.max_solutions = Some(10);
    enumerate.output.store_solutions = true;
    enumerate.to_file(&examples_dir.join("enumerate.yaml"))?;

    let mut external = Settings::default();
    external.solver.backend = SolverBackend::External;
    external.solver.command = "kissat".to_string();
    external.encoding.at_most_one = AtMostOneEncoding::SequentialCounter;
    external.to_file(&examples_dir.join("external.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

/// Expand directories into the solution files they contain, sorted by name
fn collect_solution_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| is_solution_file(p))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn is_solution_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "txt" || ext == "json")
}

fn compare_command(paths: &[PathBuf]) -> Result<()> {
    let files = collect_solution_files(paths)?;
    let solutions = files
        .iter()
        .map(SolutionFormatter::load_solution)
        .collect::<Result<Vec<_>>>()?;

    let names: Vec<String> = files
        .iter()
        .map(|p| {
            p.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect();

    println!("{}", SolutionFormatter::distance_matrix(&names, &solutions));
    Ok(())
}
