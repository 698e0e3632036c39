mod cli;
mod config;
mod dataset;
mod services;
mod submission;

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;

use cli::commands::{columns, config as config_cmd, fill, split};
use cli::{Cli, Commands};
use config::MappingConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli::log_filter(cli.verbose)),
    )
    .format_timestamp(None)
    .init();

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Fill(args) => {
            let config = MappingConfig::load(config_path)?;
            fill::handle_fill_command(args, &config)
        }
        Commands::Columns(args) => {
            let config = MappingConfig::load(config_path)?;
            columns::handle_columns_command(args, &config)
        }
        Commands::Split(args) => split::handle_split_command(args),
        Commands::Config(command) => config_cmd::handle_config_command(command, config_path),
    }
}
