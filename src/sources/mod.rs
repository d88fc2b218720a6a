// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Record sources
//!
//! Discovers and loads workflow definitions and SQL task files from disk.
//! Everything downstream (the lineage builder, the renderers) only sees the
//! typed records produced here.

mod dags;
mod records;
mod sql;

pub use dags::{extract_tasks, load_dag, load_dags, parse_dag, TaskSummary, DAG_EXTENSIONS};
pub use records::{Params, TaskRecord, WorkflowDocument, SOURCE_TABLE_KEY, TARGET_TABLE_KEY};
pub use sql::{load_sql, load_sqls, template_variables, SqlRenderer};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{DwatError, DwatResult};

/// A loaded workflow file: its path and its record, if the file was not empty
#[derive(Debug, Clone, PartialEq)]
pub struct DagEntry {
    pub path: PathBuf,
    pub document: Option<WorkflowDocument>,
}

/// Workflow records keyed by file path, in discovery order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DagSet {
    entries: Vec<DagEntry>,
    positions: HashMap<PathBuf, usize>,
}

impl DagSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record for a path
    ///
    /// Re-inserting a known path replaces its record but keeps its position.
    pub fn insert(&mut self, path: impl Into<PathBuf>, document: Option<WorkflowDocument>) {
        let path = path.into();
        match self.positions.get(&path) {
            Some(&i) => self.entries[i].document = document,
            None => {
                self.positions.insert(path.clone(), self.entries.len());
                self.entries.push(DagEntry { path, document });
            }
        }
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &DagEntry> {
        self.entries.iter()
    }

    /// Record for a path
    pub fn get(&self, path: &Path) -> Option<&DagEntry> {
        self.positions.get(path).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(PathBuf, Option<WorkflowDocument>)> for DagSet {
    fn from_iter<I: IntoIterator<Item = (PathBuf, Option<WorkflowDocument>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (path, document) in iter {
            set.insert(path, document);
        }
        set
    }
}

/// Anything that can supply workflow records to the lineage builder
pub trait RecordSupplier {
    /// Load all workflow records
    fn load(&self) -> DwatResult<DagSet>;
}

/// Supplies records from YAML files found under a directory
#[derive(Debug, Clone)]
pub struct DirectorySupplier {
    root: PathBuf,
}

impl DirectorySupplier {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RecordSupplier for DirectorySupplier {
    fn load(&self) -> DwatResult<DagSet> {
        load_dags(&self.root)
    }
}

/// Recursively find files with the given extension, sorted by path
///
/// Hidden files and directories (such as `.dwat.yaml`) are never matched.
pub fn discover_files(root: &Path, extension: &str) -> DwatResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(DwatError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let base = glob::Pattern::escape(&root.to_string_lossy());
    let pattern = Path::new(&base)
        .join("**")
        .join(format!("*.{}", extension))
        .to_string_lossy()
        .to_string();

    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..glob::MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                return Err(DwatError::read_failed(e.path(), e.error()));
            }
        }
    }

    // Sort for consistent ordering
    files.sort();

    Ok(files)
}
