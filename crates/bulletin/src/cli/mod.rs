//! Command-line interface for the bulletin binary.

mod commands;
mod run;

pub use commands::Cli;
pub use run::run_pipeline;
