// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

//! Typed workflow records
//!
//! Workflow YAML is loosely shaped: fields may be missing, null, numbers
//! where strings were expected, or a single value where a list was expected.
//! Documents are converted here, once, into records with explicit presence
//! per field so the lineage builder never inspects raw YAML.

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::{DwatError, DwatResult};

/// Parameter key naming the table a task reads from
pub const SOURCE_TABLE_KEY: &str = "SOURCE_TABLE";

/// Parameter key naming the table a task writes to
pub const TARGET_TABLE_KEY: &str = "TARGET_TABLE";

/// Free-form task parameters, kept in document order
pub type Params = serde_json::Map<String, serde_json::Value>;

/// A single workflow (DAG) document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowDocument {
    /// Workflow name (the document's top-level key)
    pub name: String,

    /// Tasks in declaration order; `None` when the document declares none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskRecord>>,
}

impl WorkflowDocument {
    /// Convert a parsed YAML document into a workflow record
    ///
    /// Returns `Ok(None)` for empty documents (`null` or `{}`). Only the
    /// first top-level key is used; any further keys are ignored with a
    /// warning. A document whose top level is not a mapping is rejected.
    pub fn from_value(path: &Path, value: Value) -> DwatResult<Option<Self>> {
        let mapping = match value {
            Value::Null => return Ok(None),
            Value::Mapping(mapping) => mapping,
            Value::Tagged(tagged) => return Self::from_value(path, tagged.value),
            other => {
                return Err(DwatError::InvalidWorkflow {
                    path: path.to_path_buf(),
                    reason: format!("expected a mapping, found {}", value_kind(&other)),
                })
            }
        };

        let mut entries = mapping.into_iter();
        let Some((key, definition)) = entries.next() else {
            debug!(path = %path.display(), "empty workflow document");
            return Ok(None);
        };

        let ignored: Vec<String> = entries.filter_map(|(k, _)| scalar_string(&k)).collect();
        if !ignored.is_empty() {
            warn!(
                path = %path.display(),
                ignored = %ignored.join(", "),
                "workflow document has several top-level keys, only the first is used"
            );
        }

        let Some(name) = scalar_string(&key) else {
            warn!(path = %path.display(), "workflow name is not a scalar, skipping document");
            return Ok(None);
        };

        let tasks = match definition {
            Value::Mapping(ref def) => Self::tasks_from(path, &name, def),
            Value::Null => None,
            ref other => {
                warn!(
                    path = %path.display(),
                    dag = %name,
                    "workflow definition is a {}, expected a mapping",
                    value_kind(other)
                );
                None
            }
        };

        Ok(Some(Self { name, tasks }))
    }

    fn tasks_from(path: &Path, name: &str, definition: &Mapping) -> Option<Vec<TaskRecord>> {
        match definition.get("tasks") {
            None | Some(Value::Null) => None,
            Some(Value::Sequence(items)) => Some(
                items
                    .iter()
                    .filter_map(|item| {
                        let task = TaskRecord::from_value(item);
                        if task.is_none() {
                            debug!(dag = %name, "skipping task entry that is not a mapping");
                        }
                        task
                    })
                    .collect(),
            ),
            Some(other) => {
                warn!(
                    path = %path.display(),
                    dag = %name,
                    "'tasks' is a {}, expected a list",
                    value_kind(other)
                );
                None
            }
        }
    }
}

/// A single task inside a workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskRecord {
    /// Task identifier, unique within its workflow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Operator kind, e.g. `PythonOperator`
    #[serde(rename = "op_type", skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    /// File implementing the task (SQL or script)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    /// Operator parameters, preserved verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,

    /// Ids of tasks in the same workflow this task depends on
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl TaskRecord {
    /// Build a task record from a YAML node, `None` if it is not a mapping
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::Mapping(map) = value else {
            return None;
        };

        let field = |name: &str| map.get(name).and_then(scalar_string);

        Some(Self {
            id: field("id"),
            operator: field("op_type"),
            source_file: field("source_file"),
            params: map.get("params").and_then(params_from),
            depends_on: map.get("depends_on").map(string_list).unwrap_or_default(),
        })
    }

    /// The declared source table, if any
    pub fn source_table(&self) -> Option<String> {
        self.table_param(SOURCE_TABLE_KEY)
    }

    /// The declared target table, if any
    pub fn target_table(&self) -> Option<String> {
        self.table_param(TARGET_TABLE_KEY)
    }

    /// Scalar table names are stringified; empty names and non-scalars count as absent
    fn table_param(&self, key: &str) -> Option<String> {
        let name = match self.params.as_ref()?.get(key)? {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        Some(name).filter(|s| !s.is_empty())
    }
}

fn params_from(value: &Value) -> Option<Params> {
    match value {
        Value::Null => None,
        Value::Mapping(_) => match serde_json::to_value(value) {
            Ok(serde_json::Value::Object(map)) => Some(map),
            Ok(_) => None,
            Err(e) => {
                warn!("dropping task params that cannot be represented as JSON: {}", e);
                None
            }
        },
        other => {
            debug!("'params' is a {}, expected a mapping", value_kind(other));
            None
        }
    }
}

/// `depends_on` accepts a list or a single id
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_string).collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> DwatResult<Option<WorkflowDocument>> {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        WorkflowDocument::from_value(Path::new("dags/test.yml"), value)
    }

    #[test]
    fn test_parse_workflow() {
        let doc = parse(
            r#"
orders_pipeline:
  schedule: "@daily"
  tasks:
    - id: load
      op_type: SnowflakeOperator
      source_file: sql/staging/load.sql
      params:
        TARGET_TABLE: stg_orders
        WAREHOUSE: compute_wh
    - id: publish
      depends_on: [load]
"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(doc.name, "orders_pipeline");
        let tasks = doc.tasks.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id.as_deref(), Some("load"));
        assert_eq!(tasks[0].operator.as_deref(), Some("SnowflakeOperator"));
        assert_eq!(tasks[0].target_table().as_deref(), Some("stg_orders"));
        assert_eq!(tasks[0].source_table(), None);
        assert_eq!(tasks[1].depends_on, vec!["load"]);
        assert!(tasks[1].params.is_none());
    }

    #[test]
    fn test_params_keep_document_order() {
        let doc = parse(
            r#"
d:
  tasks:
    - id: t
      params:
        zeta: 1
        alpha: two
        TARGET_TABLE: fct_sales
"#,
        )
        .unwrap()
        .unwrap();

        let params = doc.tasks.unwrap()[0].params.clone().unwrap();
        let keys: Vec<&str> = params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "TARGET_TABLE"]);
    }

    #[test]
    fn test_empty_documents() {
        assert_eq!(parse("~").unwrap(), None);
        assert_eq!(parse("{}").unwrap(), None);
    }

    #[test]
    fn test_non_mapping_document_is_rejected() {
        let err = parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, DwatError::InvalidWorkflow { .. }));
    }

    #[test]
    fn test_only_first_key_is_used() {
        let doc = parse("first:\n  tasks: []\nsecond:\n  tasks: []\n")
            .unwrap()
            .unwrap();
        assert_eq!(doc.name, "first");
        assert_eq!(doc.tasks, Some(vec![]));
    }

    #[test]
    fn test_missing_and_malformed_task_lists() {
        let doc = parse("bare:\n").unwrap().unwrap();
        assert_eq!(doc.name, "bare");
        assert!(doc.tasks.is_none());

        let doc = parse("odd:\n  tasks: not-a-list\n").unwrap().unwrap();
        assert!(doc.tasks.is_none());
    }

    #[test]
    fn test_loose_task_fields() {
        let doc = parse(
            r#"
d:
  tasks:
    - id: 42
      depends_on: upstream
    - just a string
    - op_type: PythonOperator
      params: ~
"#,
        )
        .unwrap()
        .unwrap();

        let tasks = doc.tasks.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id.as_deref(), Some("42"));
        assert_eq!(tasks[0].depends_on, vec!["upstream"]);
        assert!(tasks[1].id.is_none());
        assert!(tasks[1].params.is_none());
    }

    #[test]
    fn test_scalar_table_params_are_stringified() {
        let task = TaskRecord::from_value(
            &serde_yaml::from_str(
                "id: t\nparams:\n  SOURCE_TABLE: 7\n  TARGET_TABLE: ''\n  OTHER: [a]\n",
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(task.source_table().as_deref(), Some("7"));
        assert_eq!(task.target_table(), None);

        let task = TaskRecord::from_value(
            &serde_yaml::from_str("id: t\nparams:\n  SOURCE_TABLE: [a, b]\n").unwrap(),
        )
        .unwrap();
        assert_eq!(task.source_table(), None);
    }
}
