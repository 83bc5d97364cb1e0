use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::errors::{EnvigenError, Result};
use crate::core::services::emitter::EmitFormat;

/// Default run-configuration file name, looked up in the working
/// directory.
pub const DEFAULT_CONFIG_FILE: &str = "envigen.json";

/// Run configuration read from `envigen.json`.
///
/// The environments map is a `BTreeMap` on purpose: generation iterates
/// it in name order, which keeps the emitted artifact stable across
/// runs regardless of JSON key order.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Namespace label baked into the artifact header.
    pub package: String,
    pub output_dir: PathBuf,
    /// Obfuscation seed; 0 (the default) draws a fresh seed per run.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub format: EmitFormat,
    pub environments: BTreeMap<String, EnvEntry>,
}

/// One entry in `environments`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvEntry {
    /// Path of the env definition file, relative to the working
    /// directory.
    pub file: PathBuf,
    /// Name of the generated struct (e.g. "DevConfig").
    pub struct_name: String,
}

impl AppConfig {
    /// Load and validate the run configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the file is missing, unparsable, or defines
    /// no environments. Env files are not touched here.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EnvigenError::InvalidConfig {
                detail: format!("{} not found. Run 'envigen init' first.", path.display()),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| EnvigenError::InvalidConfig {
                detail: format!("Failed to parse {}: {e}", path.display()),
            })?;

        if config.package.is_empty() {
            return Err(EnvigenError::InvalidConfig {
                detail: "package must not be empty".into(),
            });
        }
        if config.environments.is_empty() {
            return Err(EnvigenError::InvalidConfig {
                detail: "no environments defined".into(),
            });
        }
        for (name, entry) in &config.environments {
            if name.is_empty() || entry.struct_name.is_empty() {
                return Err(EnvigenError::InvalidConfig {
                    detail: "environment names and struct_name must not be empty".into(),
                });
            }
        }

        Ok(config)
    }
}
