//! CLI subcommand implementations for the siteharvest binary.

pub mod output;
pub mod run_cmd;
