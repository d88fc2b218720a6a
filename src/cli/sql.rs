// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Sql command - render SQL task files

use colored::Colorize;
use miette::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::DwatConfig;
use crate::sources::{load_sqls, template_variables, SqlRenderer};

/// Run the sql command
pub async fn run(
    path: Option<PathBuf>,
    vars: Vec<(String, String)>,
    list_vars: bool,
    strict: bool,
    config: &DwatConfig,
    _verbose: bool,
) -> Result<()> {
    let dir = path.unwrap_or_else(|| config.sql_dir.clone());
    let sqls = load_sqls(&dir)?;

    if sqls.is_empty() {
        println!("{}", format!("No SQL files found in {}", dir.display()).dimmed());
        return Ok(());
    }

    if list_vars {
        for (path, sql) in &sqls {
            let names = template_variables(sql);
            if names.is_empty() {
                println!("{}: {}", path.display(), "(none)".dimmed());
            } else {
                println!("{}: {}", path.display(), names.join(", "));
            }
        }
        return Ok(());
    }

    let context = build_context(&config.variables, vars);
    let renderer = SqlRenderer::new().strict(strict || config.strict_templates);

    for (i, (path, sql)) in sqls.iter().enumerate() {
        let rendered = renderer
            .render(sql, &context)
            .map_err(|e| miette::Report::new(e).wrap_err(format!("in {}", path.display())))?;

        if i > 0 {
            println!();
        }
        println!("{}", format!("-- {}", path.display()).dimmed());
        println!("{}", rendered.trim_end());
    }

    Ok(())
}

/// Configured variables overridden by command-line ones
fn build_context(
    configured: &BTreeMap<String, String>,
    overrides: Vec<(String, String)>,
) -> BTreeMap<String, String> {
    let mut context = configured.clone();
    context.extend(overrides);
    context
}
