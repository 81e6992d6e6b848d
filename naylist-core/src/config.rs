//! Configuration loading from naylist.toml.

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{NaylistError, NaylistResult};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "naylist.toml";

/// Main configuration structure for naylist.toml.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NaylistConfig {
    /// Dependency nodesets, relative to the config file.
    pub dependencies: Option<Vec<PathBuf>>,
    /// Never naylist reference types.
    pub all_refs: Option<bool>,
    /// Never naylist data types.
    pub all_data: Option<bool>,
    /// Repeat the dependency pass until nothing more is retained.
    pub global_fixpoint: Option<bool>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl NaylistConfig {
    /// Whether the configured output format is JSON.
    pub fn json_output(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from `path`.
///
/// Relative dependency paths are resolved against the config file's directory.
pub fn load_config(path: &Path) -> NaylistResult<NaylistConfig> {
    let content = fs::read_to_string(path).map_err(|e| NaylistError::config(path, e.to_string()))?;
    let mut cfg: NaylistConfig = toml::from_str(&content)
        .map_err(|e| NaylistError::config(path, format!("Invalid {}: {}", CONFIG_FILE, e)))?;

    if let Some(format) = cfg.output.as_ref().and_then(|o| o.format.as_deref()) {
        if !matches!(format.to_ascii_lowercase().as_str(), "plain" | "json") {
            return Err(NaylistError::config(
                path,
                format!("Unknown output format '{}', expected \"plain\" or \"json\"", format),
            ));
        }
    }

    if let Some(base) = path.parent() {
        if let Some(deps) = cfg.dependencies.as_mut() {
            for dep in deps.iter_mut() {
                if dep.is_relative() {
                    *dep = base.join(&*dep);
                }
            }
        }
    }

    Ok(cfg)
}

/// Loads `dir/naylist.toml` if it exists.
pub fn find_config(dir: &Path) -> NaylistResult<Option<NaylistConfig>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config(&path).map(Some)
}
