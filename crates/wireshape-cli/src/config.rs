//! # CLI Configuration
//!
//! Optional file passed with `--config`, YAML or JSON by extension:
//!
//! ```yaml
//! definitions: api/types.yaml
//! options:
//!   unrecognizedObjectKeys: strip
//!   allowUnrecognizedEnumValues: true
//! ```
//!
//! A relative `definitions` path is taken relative to the config file.
//! Command-line flags override everything here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wireshape_schema::{SchemaOptions, SchemaRegistry};

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CliConfig {
    /// Schema options used unless overridden by flags.
    pub options: SchemaOptions,
    /// Definitions file used when `--definitions` is not given.
    pub definitions: Option<PathBuf>,
}

impl CliConfig {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let mut config: CliConfig = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML in config file: {}", path.display()))?,
            _ => serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON in config file: {}", path.display()))?,
        };

        if let Some(definitions) = config.definitions.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.definitions = Some(if definitions.is_relative() {
                base.join(definitions)
            } else {
                definitions
            });
        }

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// The config from `path`, or the defaults when no file was given.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// The definitions file to use: the flag if given, else the config's.
    pub fn definitions_path(&self, flag: Option<&Path>) -> Result<PathBuf> {
        flag.map(Path::to_path_buf)
            .or_else(|| self.definitions.clone())
            .context("no definitions file: pass --definitions or set `definitions` in the config file")
    }

    /// Load the registry named by the flag or the config.
    pub fn load_registry(&self, flag: Option<&Path>) -> Result<(PathBuf, SchemaRegistry)> {
        let path = self.definitions_path(flag)?;
        let registry = SchemaRegistry::from_path(&path)
            .with_context(|| format!("failed to load definitions: {}", path.display()))?;
        Ok((path, registry))
    }
}
