// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Node type heuristics
//!
//! Roles are inferred from naming conventions. Each classifier is an ordered
//! rule table evaluated first-match-wins, with `task` / `table` as the
//! fallback. Markers on paths and table names are matched case-insensitively;
//! operator names are matched exactly as written.

use super::NodeKind;
use crate::sources::TaskRecord;

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Contains(&'static str),
    StartsWith(&'static str),
    Equals(&'static str),
}

impl Pattern {
    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Contains(marker) => value.contains(marker),
            Self::StartsWith(prefix) => value.starts_with(prefix),
            Self::Equals(expected) => value == *expected,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum TaskField {
    SourceFile,
    TargetTable,
    Operator,
}

struct TaskRule {
    field: TaskField,
    pattern: Pattern,
    kind: NodeKind,
}

const fn task_rule(field: TaskField, pattern: Pattern, kind: NodeKind) -> TaskRule {
    TaskRule {
        field,
        pattern,
        kind,
    }
}

use NodeKind::{Dimension, Fact, Source, Staging, Table, Task};
use Pattern::{Contains, Equals, StartsWith};
use TaskField::{Operator, SourceFile, TargetTable};

const TASK_RULES: &[TaskRule] = &[
    task_rule(SourceFile, Contains("staging"), Staging),
    task_rule(SourceFile, Contains("stg_"), Staging),
    task_rule(TargetTable, Contains("staging"), Staging),
    task_rule(TargetTable, Contains("stg_"), Staging),
    task_rule(SourceFile, Contains("dimension"), Dimension),
    task_rule(SourceFile, Contains("dim_"), Dimension),
    task_rule(TargetTable, Contains("dimension"), Dimension),
    task_rule(TargetTable, Contains("dim_"), Dimension),
    task_rule(SourceFile, Contains("fact"), Fact),
    task_rule(SourceFile, Contains("fct_"), Fact),
    task_rule(TargetTable, Contains("fact"), Fact),
    task_rule(TargetTable, Contains("fct_"), Fact),
    task_rule(Operator, Equals("PythonOperator"), Task),
    task_rule(Operator, Contains("SnowflakeOperator"), Table),
];

struct TableRule {
    patterns: &'static [Pattern],
    kind: NodeKind,
}

const TABLE_RULES: &[TableRule] = &[
    TableRule {
        patterns: &[Contains("staging"), StartsWith("stg")],
        kind: Staging,
    },
    TableRule {
        patterns: &[Contains("dimension"), StartsWith("dim")],
        kind: Dimension,
    },
    TableRule {
        patterns: &[Contains("fact"), StartsWith("fct")],
        kind: Fact,
    },
    TableRule {
        patterns: &[Contains("ingestion"), Contains("raw")],
        kind: Source,
    },
];

/// Infer the role of a task from its source file, target table and operator
pub fn classify_task(task: &TaskRecord) -> NodeKind {
    let source_file = task.source_file.as_deref().unwrap_or("").to_lowercase();
    let target_table = task.target_table().unwrap_or_default().to_lowercase();
    let operator = task.operator.as_deref().unwrap_or("");

    TASK_RULES
        .iter()
        .find(|rule| {
            let value = match rule.field {
                SourceFile => source_file.as_str(),
                TargetTable => target_table.as_str(),
                Operator => operator,
            };
            rule.pattern.matches(value)
        })
        .map(|rule| rule.kind)
        .unwrap_or(Task)
}

/// Infer the role of a table from its name
pub fn classify_table(name: &str) -> NodeKind {
    let name = name.to_lowercase();

    TABLE_RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| p.matches(&name)))
        .map(|rule| rule.kind)
        .unwrap_or(Table)
}
