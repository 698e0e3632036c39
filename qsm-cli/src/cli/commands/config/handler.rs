use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::ConfigCommands;
use crate::config::{CONFIG_ENV_VAR, MappingConfig, default_config_path, env_config_path};

pub fn handle_config_command(
    command: ConfigCommands,
    explicit: Option<&Path>,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = MappingConfig::load(explicit)?;
            print!("{}", config.to_toml()?);
        }
        ConfigCommands::Path => {
            if let Some(path) = explicit {
                println!("{}", path.display());
            } else if let Some(path) = env_config_path() {
                println!("{} (from {})", path.display(), CONFIG_ENV_VAR);
            } else {
                match default_config_path() {
                    Some(path) => println!("{}", path.display()),
                    None => println!("(no config directory on this platform)"),
                }
            }
        }
        ConfigCommands::Init { force } => {
            let path = match explicit {
                Some(path) => path.to_path_buf(),
                None => default_config_path()
                    .context("No config directory on this platform; pass --config")?,
            };

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }

            fs::write(&path, MappingConfig::default().to_toml()?)
                .with_context(|| format!("Failed to write config file: {}", path.display()))?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}
