// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Project configuration
//!
//! Loaded from `.dwat.yaml` in the working directory. Every field has a
//! default, so the file is optional; command-line flags override it.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{DwatError, DwatResult};

/// Default config file name
pub const CONFIG_FILE: &str = ".dwat.yaml";

/// Configuration from .dwat.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DwatConfig {
    /// Directory scanned for workflow YAML
    #[serde(default = "default_dir")]
    pub dags_dir: PathBuf,

    /// Directory scanned for SQL files
    #[serde(default = "default_dir")]
    pub sql_dir: PathBuf,

    /// Report output path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Default output format for `dwat lineage`
    #[serde(default)]
    pub format: ReportFormat,

    /// Variables available to SQL templates
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Fail when a SQL template references an undefined variable
    #[serde(default)]
    pub strict_templates: bool,

    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchConfig,
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> PathBuf {
    PathBuf::from("lineage.html")
}

impl Default for DwatConfig {
    fn default() -> Self {
        Self {
            dags_dir: default_dir(),
            sql_dir: default_dir(),
            output: default_output(),
            format: ReportFormat::default(),
            variables: BTreeMap::new(),
            strict_templates: false,
            watch: WatchConfig::default(),
        }
    }
}

impl DwatConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> DwatResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DwatError::read_failed(path, e))?;

        Self::from_yaml(&content).map_err(|e| DwatError::InvalidConfig {
            reason: format!("{}: {}", path.display(), e),
            help: Some(
                "Known keys: dags_dir, sql_dir, output, format, variables, strict_templates, watch"
                    .into(),
            ),
        })
    }

    /// Parse configuration from a YAML string; an empty document yields defaults
    pub fn from_yaml(yaml: &str) -> DwatResult<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value).map_err(Into::into)
    }

    /// Load `path` if given, else `.dwat.yaml` when present, else defaults
    ///
    /// An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> DwatResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    debug!("no {} found, using defaults", CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Output formats for the lineage graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Json,
    Dot,
    Mermaid,
    Text,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Json => write!(f, "json"),
            Self::Dot => write!(f, "dot"),
            Self::Mermaid => write!(f, "mermaid"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Watch mode configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}
