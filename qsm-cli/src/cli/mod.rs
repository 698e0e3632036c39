//! Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::columns::ColumnsCommands;
use commands::config::ConfigCommands;
use commands::fill::FillCommands;
use commands::split::SplitCommands;

/// Map survey export rows onto the QSM application form
#[derive(Debug, Parser)]
#[command(name = "qsm-fill", version, about)]
pub struct Cli {
    /// Mapping config file (default: $QSM_FILL_CONFIG or the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Map every submitted application and hand it to the chosen output
    Fill(FillCommands),
    /// Show which export column each form field resolves to
    Columns(ColumnsCommands),
    /// Split a "name and email" string the way the mapper does
    Split(SplitCommands),
    /// Inspect or create the mapping config
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Default log filter for a `-v` count
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
