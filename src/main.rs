use std::{
    fs::File,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use mazenv::{
    app::{App, GenerateOptions, Policy, RolloutOptions},
    env::MAX_HORIZON,
    generators::{Generator, GeneratorKind, IslandGenerator, PrimGenerator, get_rng},
};

/// Generate, solve and simulate grid mazes
#[derive(Parser, Debug)]
#[command(name = "mazenv", version, about, long_about = None)]
struct Cli {
    /// Write logs to this file instead of standard error (filter with RUST_LOG)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate random mazes and print them as text
    Generate {
        #[command(subcommand)]
        algorithm: Algorithm,
    },
    /// Print the optimal solution of every maze in a file or standard input
    Solve {
        /// File containing mazes (instead of stdin)
        #[arg(long = "in")]
        input: Option<PathBuf>,
        /// Only print the solution length
        #[arg(long)]
        length: bool,
    },
    /// Run a policy through the maze environment on a generated maze
    Rollout {
        #[command(flatten)]
        rollout: RolloutArgs,
        #[command(subcommand)]
        algorithm: Algorithm,
    },
    /// List the available generators and their parameters
    Generators,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Height of maze grid
    #[arg(long, default_value_t = 11)]
    rows: usize,
    /// Width of maze grid
    #[arg(long, default_value_t = 11)]
    cols: usize,
    /// Random number generator seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Number of mazes to generate
    #[arg(long, default_value_t = 1)]
    num: usize,
    /// Add a border of walls around the maze
    #[arg(long)]
    border: bool,
    /// Color the output
    #[arg(long)]
    color: bool,
}

#[derive(Subcommand, Debug)]
enum Algorithm {
    /// Randomized variant of Prim's algorithm
    Prim {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Create islands of walls in odd positions (dimensions must be odd)
    Island {
        #[command(flatten)]
        common: CommonArgs,
        /// The number of islands
        #[arg(long, default_value_t = IslandGenerator::default().density)]
        density: f64,
        /// The size of islands
        #[arg(long, default_value_t = IslandGenerator::default().complexity)]
        complexity: f64,
    },
}

impl Algorithm {
    fn build(&self) -> (Box<dyn Generator>, &CommonArgs) {
        match self {
            Algorithm::Prim { common } => (Box::new(PrimGenerator), common),
            Algorithm::Island {
                common,
                density,
                complexity,
            } => (
                Box::new(IslandGenerator {
                    density: *density,
                    complexity: *complexity,
                }),
                common,
            ),
        }
    }
}

#[derive(Args, Debug)]
struct RolloutArgs {
    /// Only show the agent a square of this radius around itself
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(..=MAX_HORIZON as i64))]
    horizon: Option<u32>,
    /// Number of episodes joined into one meta-episode
    #[arg(long, global = true, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    runs: u64,
    /// How actions are chosen
    #[arg(long, global = true, value_enum, default_value_t = PolicyArg::Optimal)]
    policy: PolicyArg,
    /// Stop after this many steps
    #[arg(long, global = true)]
    max_steps: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    Optimal,
    Random,
}

impl From<PolicyArg> for Policy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Optimal => Policy::Optimal,
            PolicyArg::Random => Policy::Random,
        }
    }
}

/// Set up logging to standard error or to a file.
/// The returned guard flushes pending logs when dropped.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<WorkerGuard> {
    let (writer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("log file path {} has no file name", path.display()))?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name))
        }
        None => tracing_appender::non_blocking(io::stderr()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_ansi(log_file.is_none())
        .with_writer(writer)
        .init();
    Ok(guard)
}

fn print_generators(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Available generators:")?;
    writeln!(out)?;
    let width = GeneratorKind::ALL.iter().map(|k| k.name().len()).max().unwrap_or(0);
    for kind in GeneratorKind::ALL {
        let generator = kind.with_defaults();
        writeln!(out, " {:width$}    {} ({})", kind.name(), generator.description(), kind)?;
        for param in generator.params() {
            writeln!(
                out,
                " {:width$}      --{}: {} (default {})",
                "", param.name, param.help, param.default
            )?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref())?;
    let app = App::default();
    let mut stdout = io::stdout().lock();

    match cli.cmd {
        Commands::Generate { algorithm } => {
            let (generator, common) = algorithm.build();
            let options = GenerateOptions {
                rows: common.rows,
                cols: common.cols,
                num: common.num,
                border: common.border,
                color: common.color,
            };
            let mut rng = get_rng(common.seed);
            app.generate(generator.as_ref(), &options, &mut rng, &mut stdout)
                .context("failed to generate mazes")?;
        }
        Commands::Solve { input, length } => {
            let reader: Box<dyn Read + Send> = match &input {
                Some(path) => Box::new(
                    File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
                ),
                None => {
                    eprintln!("reading from standard input...");
                    Box::new(io::stdin())
                }
            };
            let solved = app.solve(reader, length, &mut stdout)?;
            tracing::info!("Solved {} maze(s)", solved);
        }
        Commands::Rollout { rollout, algorithm } => {
            let (generator, common) = algorithm.build();
            let mut rng = get_rng(common.seed);
            let mut maze = generator
                .generate(common.rows, common.cols, &mut rng)
                .context("failed to generate a maze for the rollout")?;
            if common.border {
                maze = maze.bordered();
            }
            if common.color {
                writeln!(stdout, "{}\n", maze.colored())?;
            } else {
                writeln!(stdout, "{maze}\n")?;
            }
            let options = RolloutOptions {
                horizon: rollout.horizon.map(|h| h as usize),
                runs: rollout.runs as usize,
                policy: rollout.policy.into(),
                max_steps: rollout.max_steps,
            };
            let summary = app.rollout(maze, &options, &mut rng)?;
            writeln!(stdout, "observation size: {}", summary.observation_len)?;
            writeln!(stdout, "steps:            {}", summary.steps)?;
            writeln!(stdout, "total reward:     {}", summary.total_reward)?;
            writeln!(stdout, "episodes solved:  {}/{}", summary.episodes, options.runs)?;
            writeln!(stdout, "finished:         {}", summary.done)?;
        }
        Commands::Generators => print_generators(&mut stdout)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_is_bounded() {
        let cli = Cli::try_parse_from(["mazenv", "rollout", "--horizon", "1024", "prim"]).unwrap();
        let Commands::Rollout { rollout, .. } = cli.cmd else {
            panic!("expected the rollout command");
        };
        assert_eq!(rollout.horizon, Some(1024));

        let result = Cli::try_parse_from(["mazenv", "rollout", "--horizon", "4294967296", "prim"]);
        assert!(result.is_err());
        let result = Cli::try_parse_from(["mazenv", "rollout", "--horizon", "1025", "prim"]);
        assert!(result.is_err());
    }
}
