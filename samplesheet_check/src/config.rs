//! Defaults for the command line, optionally read from a TOML file.

use anyhow::{Context, Result};
use log::{debug, warn};
use samplesheet::sheetconst::BCLCONVERT_DATA;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the config file looked up next to the running executable.
pub const CONFIG_FILE_NAME: &str = "samplesheet_check.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Tabular section checked for collisions.
    pub data_section: String,
    /// Fail on repeated section names instead of keeping the last one.
    pub strict_sections: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            data_section: BCLCONVERT_DATA.to_string(),
            strict_sections: false,
        }
    }
}

impl CheckConfig {
    /// Load from an explicit path; the file must exist and parse.
    pub fn from_path(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| path.display().to_string())?;
        let config: CheckConfig =
            toml::from_str(&s).with_context(|| path.display().to_string())?;
        if config != CheckConfig::default() {
            debug!("using non-default config from {}: {config:?}", path.display());
        }
        Ok(config)
    }

    /// Load from `path` if given, otherwise from [`CONFIG_FILE_NAME`] next to
    /// the executable, falling back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_path(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_path(&path),
            Some(path) => {
                warn!(
                    "could not find {} at {}, falling back to defaults",
                    CONFIG_FILE_NAME,
                    path.display()
                );
                Ok(CheckConfig::default())
            }
            None => {
                warn!("unable to locate the running executable, falling back to default config");
                Ok(CheckConfig::default())
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .map(|exe| exe.with_file_name(CONFIG_FILE_NAME))
}
