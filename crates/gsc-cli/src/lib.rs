pub mod cli;
pub mod config;

pub use cli::{
    BatchSizeArgs, Cli, Commands, ExportFormat, InputArgs, OutputFormat, SizeArgs, SolverArgs,
};
pub use config::{load_config, GscConfig};
