//! Config file resolution and loading.
//!
//! Priority for the config file:
//! 1. `--config <path>` (explicit, must exist)
//! 2. `SUPPORT_SELECT_CONFIG` (explicit, must exist, ignores empty string)
//! 3. `XDG_CONFIG_HOME/support-select/config.json` (ignores empty string)
//! 4. `~/.config/support-select/config.json`
//!
//! When neither explicit source is given and no default file exists, the
//! built-in defaults are used.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use support_select_core::SupportConfig;

use crate::sim::Scene;

pub const CONFIG_ENV: &str = "SUPPORT_SELECT_CONFIG";

const APP_DIR: &str = "support-select";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Where a configuration was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Path given explicitly by flag or environment.
fn explicit_config_path(flag: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    match env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => None,
    }
}

/// Default config location, whether or not the file exists.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        if !config_home.is_empty() {
            return Some(PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILE));
        }
    }

    dirs::home_dir().map(|home| home.join(".config").join(APP_DIR).join(CONFIG_FILE))
}

/// Load the support configuration following the priority above.
pub fn load_config(flag: Option<&Path>) -> Result<(SupportConfig, ConfigSource), ConfigError> {
    if let Some(path) = explicit_config_path(flag) {
        let config = read_json(&path)?;
        return Ok((config, ConfigSource::File(path)));
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            let config = read_json(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        _ => {
            debug!("No config file found, using defaults");
            Ok((SupportConfig::default(), ConfigSource::Defaults))
        }
    }
}

pub fn load_scene(path: &Path) -> Result<Scene, ConfigError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Loaded JSON file");
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
