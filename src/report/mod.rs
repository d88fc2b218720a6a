// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! HTML lineage report
//!
//! A single self-contained page: the template, stylesheet and script are
//! compiled into the binary and the graph JSON is embedded verbatim.

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::errors::{DwatError, DwatResult};
use crate::lineage::LineageGraph;

const TEMPLATE: &str = include_str!("../../assets/report/template.html");
const STYLES: &str = include_str!("../../assets/report/styles.css");
const SCRIPT: &str = include_str!("../../assets/report/visualization.js");

const CSS_PLACEHOLDER: &str = "/* CSS_PLACEHOLDER */";
const JS_PLACEHOLDER: &str = "/* JS_PLACEHOLDER */";
const GRAPH_DATA_PLACEHOLDER: &str = "/* GRAPH_DATA_PLACEHOLDER */";

/// Render the report page for a graph
pub fn render_html(graph: &LineageGraph) -> DwatResult<String> {
    // "</" inside the data would close the <script> element early
    let data = graph.to_json()?.replace("</", "<\\/");

    // Data goes in last so its contents are never searched for placeholders
    Ok(TEMPLATE
        .replacen(CSS_PLACEHOLDER, STYLES, 1)
        .replacen(JS_PLACEHOLDER, SCRIPT, 1)
        .replacen(GRAPH_DATA_PLACEHOLDER, &data, 1))
}

/// Render the report and write it to `path`, creating parent directories
pub fn write_report(graph: &LineageGraph, path: &Path) -> DwatResult<String> {
    let html = render_html(graph)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DwatError::write_failed(parent, e))?;
    }
    std::fs::write(path, &html).map_err(|e| DwatError::write_failed(path, e))?;

    info!("Wrote lineage report to {}", path.display());
    Ok(html)
}

fn launchers() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &["open"]
    } else if cfg!(target_os = "windows") {
        &["explorer"]
    } else {
        &["xdg-open", "gio", "sensible-browser"]
    }
}

/// Open a report in the default browser
pub fn open_in_browser(path: &Path) -> DwatResult<()> {
    let target = path.canonicalize().map_err(|e| DwatError::read_failed(path, e))?;

    let Some(launcher) = launchers().iter().find_map(|l| which::which(l).ok()) else {
        return Err(DwatError::BrowserUnavailable {
            path: path.to_path_buf(),
        });
    };

    let mut cmd = Command::new(&launcher);
    if launcher.file_stem().is_some_and(|s| s == "gio") {
        cmd.arg("open");
    }

    debug!(launcher = %launcher.display(), "opening report");
    cmd.arg(&target)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|_| DwatError::BrowserUnavailable {
            path: path.to_path_buf(),
        })?;

    Ok(())
}
