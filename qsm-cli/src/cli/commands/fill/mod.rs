mod handler;

pub use handler::handle_fill_command;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FillCommands {
    /// Survey export (CSV, or XLSX)
    pub input: PathBuf,

    /// How submissions are rendered
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Field delimiter of CSV exports
    #[arg(short, long, default_value_t = ',')]
    pub delimiter: char,

    /// Pause after every row for manual review
    #[arg(long)]
    pub review: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Readable summary per row
    Console,
    /// One JSON object per line
    Json,
    /// One CSV row per submission
    Csv,
}
