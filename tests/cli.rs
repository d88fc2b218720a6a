// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ORDERS: &str = r#"
orders_pipeline:
  tasks:
    - id: t1
      op_type: SnowflakeOperator
      params:
        SOURCE_TABLE: raw_orders
        TARGET_TABLE: stg_orders
    - id: t2
      depends_on: [t1]
      params:
        SOURCE_TABLE: stg_orders
        TARGET_TABLE: dim_customer
"#;

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let dags = temp.path().join("dags");
    fs::create_dir_all(&dags).unwrap();
    fs::write(dags.join("orders.yml"), ORDERS).unwrap();
    temp
}

fn dwat(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dwat").unwrap();
    cmd.current_dir(dir).env_remove("DWAT_CONFIG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn lineage_json_goes_to_stdout() {
    let temp = project();
    let output = dwat(temp.path())
        .args(["lineage", "dags", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = graph["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "dag:orders_pipeline",
            "orders_pipeline:t1",
            "table:raw_orders",
            "table:stg_orders",
            "orders_pipeline:t2",
            "table:dim_customer",
        ]
    );
    assert_eq!(graph["edges"].as_array().unwrap().len(), 7);
}

#[test]
fn lineage_html_is_written_to_configured_output() {
    let temp = project();
    fs::write(temp.path().join(".dwat.yaml"), "dags_dir: dags\noutput: out/report.html\n").unwrap();

    dwat(temp.path())
        .arg("lineage")
        .assert()
        .success()
        .stdout(predicate::str::contains("out/report.html"));

    let html = fs::read_to_string(temp.path().join("out/report.html")).unwrap();
    assert!(html.contains("orders_pipeline:t1"));
    assert!(!html.contains("GRAPH_DATA_PLACEHOLDER"));
}

#[test]
fn lineage_missing_directory_fails() {
    let temp = TempDir::new().unwrap();
    dwat(temp.path())
        .args(["lineage", "nope", "-f", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn invalid_config_fails() {
    let temp = project();
    fs::write(temp.path().join(".dwat.yaml"), "dag_dir: typo\n").unwrap();
    dwat(temp.path())
        .args(["dags", "dags"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn dags_lists_tasks() {
    let temp = project();
    dwat(temp.path())
        .args(["dags", "dags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("orders_pipeline"))
        .stdout(predicate::str::contains("SnowflakeOperator"))
        .stdout(predicate::str::contains("2 task(s)"));
}

#[test]
fn trace_upstream_of_table() {
    let temp = project();
    dwat(temp.path())
        .args(["trace", "table:dim_customer", "dags", "--upstream"])
        .assert()
        .success()
        .stdout(predicate::str::contains("orders_pipeline:t2"))
        .stdout(predicate::str::contains("table:raw_orders"));
}

#[test]
fn trace_unknown_node_fails() {
    let temp = project();
    dwat(temp.path())
        .args(["trace", "table:missing", "dags"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("table:missing"));
}

#[test]
fn sql_renders_with_vars() {
    let temp = TempDir::new().unwrap();
    let sql = temp.path().join("sql");
    fs::create_dir_all(&sql).unwrap();
    fs::write(
        sql.join("load.sql"),
        "INSERT INTO {{ schema }}.stg_orders SELECT * FROM raw_orders WHERE ds = '{{ ds }}'\n",
    )
    .unwrap();

    dwat(temp.path())
        .args(["sql", "sql", "--var", "schema=analytics", "--var", "ds=2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "INSERT INTO analytics.stg_orders SELECT * FROM raw_orders WHERE ds = '2024-01-01'",
        ));

    dwat(temp.path())
        .args(["sql", "sql", "--list-vars"])
        .assert()
        .success()
        .stdout(predicate::str::contains("schema, ds"));

    dwat(temp.path())
        .args(["sql", "sql", "--strict", "--var", "schema=analytics"])
        .assert()
        .failure();
}

#[test]
fn config_file_beside_dags_is_not_a_workflow() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".dwat.yaml"), "format: json\n").unwrap();
    fs::write(temp.path().join("orders.yml"), ORDERS).unwrap();

    let output = dwat(temp.path()).arg("lineage").output().unwrap();
    assert!(output.status.success());

    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = graph["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"dag:orders_pipeline"));
    assert!(!ids.contains(&"dag:format"));
}

#[test]
fn sql_renders_jinja_filters_and_blocks() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("load.sql"),
        "SELECT * FROM {{ schema | upper }}.t {% if full %}WHERE 1=1{% endif %}\n",
    )
    .unwrap();

    dwat(temp.path())
        .args(["sql", ".", "--var", "schema=analytics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SELECT * FROM ANALYTICS.t"))
        .stdout(predicate::str::contains("WHERE 1=1").not());

    dwat(temp.path())
        .args(["sql", ".", "--var", "schema=analytics", "--var", "full=yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SELECT * FROM ANALYTICS.t WHERE 1=1"));
}
