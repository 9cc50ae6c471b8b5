use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gsc", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Path to a TOML config file (default: <config dir>/gsc/gsc.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a random instance and write it as JSON
    Generate {
        #[command(flatten)]
        size: SizeArgs,
        /// Write the instance here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Solve a generated or supplied instance
    Solve {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        solver: SolverArgs,
        /// Output format on stdout
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write the structured result as JSON
        #[arg(long, value_hint = ValueHint::FilePath)]
        json: Option<PathBuf>,
        /// Write the route table as CSV
        #[arg(long, value_hint = ValueHint::FilePath)]
        csv: Option<PathBuf>,
    },
    /// Export the transport LP without solving it
    Export {
        #[command(flatten)]
        input: InputArgs,
        /// Model format
        #[arg(long, value_enum, default_value_t = ExportFormat::Lp)]
        format: ExportFormat,
        /// Write here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Solve one instance per seed in parallel
    Batch {
        #[command(flatten)]
        size: BatchSizeArgs,
        #[command(flatten)]
        solver: SolverArgs,
        /// Number of runs
        #[arg(long, default_value_t = 10)]
        runs: usize,
        /// First seed; runs use consecutive seeds
        #[arg(long, default_value_t = 0)]
        seed_start: u64,
        /// Worker threads (0 = one per CPU)
        #[arg(long, default_value_t = 0)]
        threads: usize,
        /// Directory for batch_manifest.json
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        out: Option<PathBuf>,
        /// Also write each run's result JSON under --out
        #[arg(long, requires = "out")]
        write_results: bool,
    },
    /// List LP backends compiled into this build
    Solvers,
}

/// Instance size and seed.
#[derive(Args, Debug, Clone)]
pub struct SizeArgs {
    /// Number of production centres
    #[arg(long, short = 'm')]
    pub centres: usize,
    /// Number of demand nodes
    #[arg(long, short = 'n')]
    pub nodes: usize,
    /// RNG seed (entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Draw capacities scaled to total demand with this flexibility
    #[arg(long)]
    pub demand_scaled: Option<f64>,
}

/// Instance size for batches; seeds come from the batch itself.
#[derive(Args, Debug, Clone)]
pub struct BatchSizeArgs {
    /// Number of production centres
    #[arg(long, short = 'm')]
    pub centres: usize,
    /// Number of demand nodes
    #[arg(long, short = 'n')]
    pub nodes: usize,
    /// Draw capacities scaled to total demand with this flexibility
    #[arg(long)]
    pub demand_scaled: Option<f64>,
}

/// Either a saved instance or the parameters to generate one.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Read the instance from a JSON file
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with_all = ["centres", "nodes", "seed", "demand_scaled"])]
    pub instance: Option<PathBuf>,
    /// Number of production centres
    #[arg(long, short = 'm', required_unless_present = "instance")]
    pub centres: Option<usize>,
    /// Number of demand nodes
    #[arg(long, short = 'n', required_unless_present = "instance")]
    pub nodes: Option<usize>,
    /// RNG seed (entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Draw capacities scaled to total demand with this flexibility
    #[arg(long)]
    pub demand_scaled: Option<f64>,
    /// Cost per unit per km (overrides the config file)
    #[arg(long)]
    pub distance_rate: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct SolverArgs {
    /// LP backend id (see `gsc solvers`)
    #[arg(long)]
    pub backend: Option<String>,
    /// Validation tolerance
    #[arg(long)]
    pub tolerance: Option<f64>,
    /// Engine time limit in seconds (0 = none)
    #[arg(long)]
    pub timeout: Option<f64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// CPLEX LP text
    Lp,
    /// Dense (c, A, b) as JSON
    Standard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn solve_accepts_generated_input() {
        let cli = Cli::try_parse_from(["gsc", "solve", "-m", "2", "-n", "5", "--seed", "3"]).unwrap();
        match cli.command {
            Commands::Solve { input, format, .. } => {
                assert_eq!(input.centres, Some(2));
                assert_eq!(input.seed, Some(3));
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn instance_conflicts_with_size() {
        let result = Cli::try_parse_from(["gsc", "solve", "--instance", "a.json", "-m", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn solve_requires_an_input() {
        assert!(Cli::try_parse_from(["gsc", "solve"]).is_err());
    }
}
