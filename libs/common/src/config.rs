//! Layered configuration for the keypad tools
//!
//! Priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `config/keypad.toml`, `config/keypad.yaml`, `config/keypad.json`
//! 3. An explicit file passed with `--config`
//! 4. `KEYPAD_` environment variables, nested with `__`
//!    (e.g. `KEYPAD_REPL__PROMPT`)

use crate::{Error, Result};
use figment::{
    providers::{Env, Format, Json, Toml, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory searched for the default config files
pub const CONFIG_DIR: &str = "config";
/// Base name of the default config files
pub const CONFIG_NAME: &str = "keypad";
/// Environment variable prefix
pub const ENV_PREFIX: &str = "KEYPAD_";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeypadConfig {
    pub log: LogSettings,
    pub repl: ReplSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    /// Optional log file, in addition to stderr
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReplSettings {
    pub prompt: String,
    /// Rows shown by the history panel
    pub history_rows: usize,
    /// Colored output
    pub color: bool,
}

impl Default for ReplSettings {
    fn default() -> Self {
        Self {
            prompt: "keypad> ".to_string(),
            history_rows: 8,
            color: true,
        }
    }
}

impl KeypadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.log.level.trim().is_empty() {
            return Err(Error::Config("log.level must not be empty".to_string()));
        }
        if self.repl.history_rows == 0 {
            return Err(Error::Config(
                "repl.history_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load the configuration from all layers
pub fn load_config(path: Option<&Path>) -> Result<KeypadConfig> {
    let dir = Path::new(CONFIG_DIR);
    let mut figment = Figment::new()
        .merge(Toml::file(dir.join(format!("{}.toml", CONFIG_NAME))))
        .merge(Yaml::file(dir.join(format!("{}.yaml", CONFIG_NAME))))
        .merge(Json::file(dir.join(format!("{}.json", CONFIG_NAME))));

    if let Some(path) = path {
        figment = merge_file(figment, path)?;
    }

    let config: KeypadConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| Error::Config(format!("Failed to load configuration: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Merge an explicit config file, picking the format from its extension
fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    if !path.is_file() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::Config("Config file must have an extension".to_string()))?;

    match extension {
        "toml" => Ok(figment.merge(Toml::file(path))),
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        "json" => Ok(figment.merge(Json::file(path))),
        _ => Err(Error::Config(format!(
            "Unsupported config file format: {}",
            extension
        ))),
    }
}
