// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Terminal color utilities
//!
//! Provides consistent color schemes across the CLI.

use colored::Colorize;

use crate::lineage::NodeKind;

/// Color a node kind the way the report legend does
pub fn kind_label(kind: NodeKind) -> colored::ColoredString {
    let label = kind.as_str();
    match kind {
        NodeKind::Dag => label.dimmed(),
        NodeKind::Source => label.magenta(),
        NodeKind::Staging => label.blue(),
        NodeKind::Dimension => label.bright_red(),
        NodeKind::Fact => label.cyan(),
        NodeKind::Table => label.bright_blue(),
        NodeKind::Task => label.green(),
    }
}

/// Print a styled header
pub fn print_header(title: &str) {
    println!("{}", title.bold());
    println!("{}", "═".repeat(title.chars().count().max(40)));
}

/// Print a success check
pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print a warning
pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

/// Print an info item
pub fn print_info(msg: &str) {
    println!("  {} {}", "→".blue(), msg);
}
