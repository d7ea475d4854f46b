use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use rayon::prelude::*;
use setting_sun::{Board, ConfigError, Outcome, Point, Solver, SolverConfig, DEFAULT_GOAL};

/// Finds the shortest sequence of single-cell slides that brings the sun to
/// its goal.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Layout files (five lines of S/W/T/s/. glyphs). Solves the standard
    /// start when none are given. Several files are solved in parallel.
    #[arg(value_name = "LAYOUT")]
    layouts: Vec<PathBuf>,

    /// Target cell for the sun's top-left corner.
    #[arg(long, value_name = "COL,ROW", default_value_t = DEFAULT_GOAL)]
    goal: Point,

    /// Give up after expanding this many states.
    #[arg(long, value_name = "N")]
    max_iterations: Option<usize>,

    /// Give up after this many milliseconds.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Print every configuration along the solution.
    #[arg(long)]
    steps: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn solver_config(&self) -> SolverConfig {
        let mut config = SolverConfig::default().with_goal(self.goal);
        if let Some(max) = self.max_iterations {
            config = config.with_max_iterations(max);
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_time_budget(Duration::from_millis(ms));
        }
        config
    }
}

struct Job {
    name: String,
    board: Board,
}

fn load_jobs(paths: &[PathBuf]) -> Result<Vec<Job>, String> {
    if paths.is_empty() {
        return Ok(vec![Job {
            name: "standard".to_owned(),
            board: Board::standard(),
        }]);
    }
    paths
        .iter()
        .map(|path| {
            let name = path.display().to_string();
            let text = fs::read_to_string(path).map_err(|e| format!("{name}: {e}"))?;
            let board = text.parse().map_err(|e| format!("{name}: {e}"))?;
            Ok(Job { name, board })
        })
        .collect()
}

fn report(job: &Job, outcome: &Outcome, show_steps: bool) -> bool {
    let stats = outcome.stats();
    match outcome {
        Outcome::Solved(solution) => {
            log::info!(
                "{}: solved in {} moves ({} expanded, {} discovered, {:?})",
                job.name,
                solution.moves(),
                stats.iterations,
                stats.discovered,
                stats.elapsed
            );
            println!("{}: {} moves", job.name, solution.moves());
            if show_steps {
                let mut boards = solution.boards();
                if let Some(start) = boards.next() {
                    println!("start\n{start}");
                }
                for (i, (step, board)) in solution.steps().zip(boards).enumerate() {
                    println!("{}: {step}\n{board}", i + 1);
                }
            }
            true
        }
        Outcome::Exhausted(_) => {
            log::warn!(
                "{}: no solution; {} reachable states explored",
                job.name,
                stats.iterations
            );
            println!("{}: unsolvable", job.name);
            false
        }
        Outcome::Abandoned(_) => {
            log::warn!(
                "{}: gave up after {} states ({:?})",
                job.name,
                stats.iterations,
                stats.elapsed
            );
            println!("{}: abandoned", job.name);
            false
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let default_filter = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let template = match Solver::new(args.solver_config()) {
        Ok(solver) => solver,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(1);
        }
    };
    let jobs = match load_jobs(&args.layouts) {
        Ok(jobs) => jobs,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(1);
        }
    };

    let outcomes: Vec<Result<Outcome, ConfigError>> = jobs
        .par_iter()
        .map_init(|| template.clone(), |solver, job| solver.solve(&job.board))
        .collect();

    let mut all_solved = true;
    for (job, outcome) in jobs.iter().zip(&outcomes) {
        match outcome {
            Ok(outcome) => all_solved &= report(job, outcome, args.steps),
            Err(e) => {
                log::error!("{}: {e}", job.name);
                return ExitCode::from(1);
            }
        }
    }

    if all_solved {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}
