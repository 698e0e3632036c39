mod handler;

pub use handler::handle_columns_command;

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ColumnsCommands {
    /// Survey export (CSV, or XLSX)
    pub input: PathBuf,

    /// Field delimiter of CSV exports
    #[arg(short, long, default_value_t = ',')]
    pub delimiter: char,
}
