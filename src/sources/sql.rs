// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! SQL task files
//!
//! Loading and variable substitution for the SQL behind workflow tasks.
//! Templates are Jinja, as in Airflow: `{{ variable }}`, filters such as
//! `{{ schema | upper }}`, and `{% if %}` / `{% for %}` blocks. Rendering is
//! independent of the lineage graph.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

use super::discover_files;
use crate::errors::{DwatError, DwatResult};

/// Read a SQL file
pub fn load_sql(path: &Path) -> DwatResult<String> {
    std::fs::read_to_string(path).map_err(|e| DwatError::read_failed(path, e))
}

/// Load every `.sql` file under a directory, sorted by path
pub fn load_sqls(dir: &Path) -> DwatResult<Vec<(PathBuf, String)>> {
    let sqls = discover_files(dir, "sql")?
        .into_iter()
        .map(|path| {
            let sql = load_sql(&path)?;
            Ok((path, sql))
        })
        .collect::<DwatResult<Vec<_>>>()?;

    info!("Loaded {} SQL file(s) from {}", sqls.len(), dir.display());
    Ok(sqls)
}

/// Names of the variables a template references, in first-use order
///
/// Only `{{ name }}` / `{{ name.path }}` expressions (optionally followed by
/// filters) are reported; names used only inside `{% ... %}` tags are not.
pub fn template_variables(sql: &str) -> Vec<String> {
    static VARIABLE: OnceLock<Regex> = OnceLock::new();
    let re = VARIABLE.get_or_init(|| {
        Regex::new(r"\{\{-?\s*([A-Za-z_][A-Za-z0-9_.]*)\s*(?:\|[^}]*)?-?\}\}")
            .expect("valid variable pattern")
    });

    let mut names: Vec<String> = Vec::new();
    for caps in re.captures_iter(sql) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Renders Jinja SQL templates against a variable context
pub struct SqlRenderer {
    env: Environment<'static>,
}

impl SqlRenderer {
    /// Create a renderer; missing variables render as empty strings
    pub fn new() -> Self {
        let mut env = Environment::new();

        // SQL is not HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        env.set_keep_trailing_newline(true);

        Self { env }
    }

    /// Fail on variables missing from the context instead of rendering them empty
    pub fn strict(mut self, strict: bool) -> Self {
        self.env.set_undefined_behavior(if strict {
            UndefinedBehavior::Strict
        } else {
            UndefinedBehavior::Lenient
        });
        self
    }

    /// Render a SQL template
    pub fn render<T: Serialize>(&self, sql: &str, context: &T) -> DwatResult<String> {
        self.env.render_str(sql, context).map_err(Into::into)
    }
}

impl Default for SqlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
