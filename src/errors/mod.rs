// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Error types
//!
//! Only failures of the record supplier, the renderers and the CLI surface
//! show up here. Malformed workflow content never becomes an error: the
//! lineage builder skips what it cannot use.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for dwat operations
pub type DwatResult<T> = Result<T, DwatError>;

/// Main error type for dwat
#[derive(Error, Debug, Diagnostic)]
pub enum DwatError {
    // ─────────────────────────────────────────────────────────────────────────
    // Input Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Directory not found: {path}")]
    #[diagnostic(
        code(dwat::directory_not_found),
        help("Pass the directory containing your DAG or SQL files, or set it in .dwat.yaml")
    )]
    DirectoryNotFound { path: PathBuf },

    #[error("Invalid workflow document '{path}': {reason}")]
    #[diagnostic(
        code(dwat::invalid_workflow),
        help("A workflow document must be a mapping of one DAG name to its definition")
    )]
    InvalidWorkflow { path: PathBuf, reason: String },

    #[error("Failed to parse YAML in '{path}': {message}")]
    #[diagnostic(code(dwat::yaml_parse_error))]
    YamlParse { path: PathBuf, message: String },

    #[error("Invalid configuration: {reason}")]
    #[diagnostic(code(dwat::invalid_config))]
    InvalidConfig {
        reason: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Graph Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Node '{id}' is not part of the lineage graph")]
    #[diagnostic(
        code(dwat::node_not_found),
        help("Node ids look like 'dag:<name>', '<dag>:<task>' or 'table:<name>'")
    )]
    NodeNotFound { id: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to render SQL template: {message}")]
    #[diagnostic(code(dwat::template_error))]
    TemplateRender {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("No browser launcher found")]
    #[diagnostic(
        code(dwat::browser_unavailable),
        help("Open the report file in a browser manually")
    )]
    BrowserUnavailable { path: PathBuf },

    #[error("Watch error: {message}")]
    #[diagnostic(code(dwat::watch_error))]
    Watch { message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(dwat::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(dwat::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(dwat::io_error))]
    Io { message: String },

    #[error("YAML error: {message}")]
    #[diagnostic(code(dwat::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(dwat::json_error))]
    Json { message: String },

    #[error("Glob pattern error: {message}")]
    #[diagnostic(code(dwat::glob_error))]
    GlobPattern { message: String },
}

impl From<std::io::Error> for DwatError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for DwatError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for DwatError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<glob::PatternError> for DwatError {
    fn from(e: glob::PatternError) -> Self {
        Self::GlobPattern { message: e.to_string() }
    }
}

impl From<minijinja::Error> for DwatError {
    fn from(e: minijinja::Error) -> Self {
        let help = if e.kind() == minijinja::ErrorKind::UndefinedError {
            Some("Pass the missing variable with --var KEY=VALUE or add it to .dwat.yaml".into())
        } else {
            None
        };
        Self::TemplateRender {
            message: e.to_string(),
            help,
        }
    }
}

impl DwatError {
    /// Create a read error for a file
    pub fn read_failed(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self::FileReadError {
            path: path.into(),
            error: error.to_string(),
        }
    }

    /// Create a write error for a file
    pub fn write_failed(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self::FileWriteError {
            path: path.into(),
            error: error.to_string(),
        }
    }
}
