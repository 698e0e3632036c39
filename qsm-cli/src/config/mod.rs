//! Mapping configuration
//!
//! Everything the mapper needs that is not in the export: search terms,
//! institutional constants, defaults and the categorical form selections.
//! Loaded from TOML; any section left out keeps its built-in value.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::mapping::MappingRules;

/// Environment variable pointing at a config file
pub const CONFIG_ENV_VAR: &str = "QSM_FILL_CONFIG";

/// Fixed categorical choices on the form, passed through unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSelections {
    /// Funding tier
    pub stufe: String,
    /// Whether the funds are covered ("ja"/"nein")
    pub deckungsfaehigkeit_mittel: String,
    /// Committee scope code
    pub studienfachschaft: String,
    /// Acknowledgement checkbox
    pub an_qsmkommission: bool,
    /// Anti-automation answer
    pub gotcha: String,
}

impl Default for FormSelections {
    fn default() -> Self {
        Self {
            stufe: "1".to_string(),
            deckungsfaehigkeit_mittel: "ja".to_string(),
            studienfachschaft: "13".to_string(),
            an_qsmkommission: true,
            gotcha: "Neckar".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Search term locating the "submitted at" column
    pub submission_date: String,
    /// Field holding the application title, used in progress output
    pub title_field: String,
    /// Field holding the requested amount, used in progress output
    pub amount_field: String,
    pub mapping: MappingRules,
    pub selections: FormSelections,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            submission_date: "Datum Abgeschickt".to_string(),
            title_field: "kurzbezeichnung".to_string(),
            amount_field: "bewilligter_betrag".to_string(),
            mapping: MappingRules::default(),
            selections: FormSelections::default(),
        }
    }
}

impl MappingConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid mapping configuration")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In config file: {}", path.display()))
    }

    /// Resolve the config to use: explicit path, then the environment
    /// variable, then the default location, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::info!("Using config file {}", path.display());
            return Self::load_file(path);
        }

        if let Some(path) = env_config_path() {
            log::info!("Using config file from {}: {}", CONFIG_ENV_VAR, path.display());
            return Self::load_file(&path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                log::info!("Using config file {}", path.display());
                Self::load_file(&path)
            }
            _ => {
                log::debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Path named by [`CONFIG_ENV_VAR`]; unset or blank means none
pub fn env_config_path() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR).ok().and_then(|value| non_blank_path(&value))
}

fn non_blank_path(value: &str) -> Option<PathBuf> {
    if value.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

/// ~/.config/qsm-fill/config.toml (platform equivalent)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("qsm-fill").join("config.toml"))
}
