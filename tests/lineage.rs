// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dwat contributors

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use dwat::config::{DwatConfig, ReportFormat};
use dwat::lineage::to_text;
use dwat::sources::{DagSet, DirectorySupplier, RecordSupplier};
use dwat::{build_graph, LineageGraph, LineageIndex, NodeKind};

fn write_dags(root: &Path) {
    fs::create_dir_all(root.join("finance")).unwrap();
    fs::write(
        root.join("orders.yml"),
        r#"
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
"#,
    )
    .unwrap();
    fs::write(
        root.join("finance/revenue.yaml"),
        r#"
revenue:
  tasks:
    - id: aggregate
      op_type: PythonOperator
      source_file: sql/fct_revenue.sql
      params:
        SOURCE_TABLE: dim_customer
        TARGET_TABLE: fct_revenue
"#,
    )
    .unwrap();
    fs::write(root.join("empty.yml"), "").unwrap();
}

fn load(root: &Path) -> DagSet {
    DirectorySupplier::new(root).load().unwrap()
}

#[test]
fn text_export_of_directory() {
    let temp = TempDir::new().unwrap();
    write_dags(temp.path());

    let graph = build_graph(&load(temp.path()));

    insta::assert_snapshot!(to_text(&graph), @r###"
    orders_pipeline (dag:orders_pipeline)
      - t1 [staging] SnowflakeOperator <- table:raw_orders -> table:stg_orders
      - t2 [dimension] <- orders_pipeline:t1, table:stg_orders -> table:dim_customer
    revenue (dag:revenue)
      - aggregate [fact] PythonOperator <- table:dim_customer -> table:fct_revenue
    tables: raw_orders [source], stg_orders [staging], dim_customer [dimension], fct_revenue [fact]
    "###);
}

#[test]
fn tables_connect_workflows() {
    let temp = TempDir::new().unwrap();
    write_dags(temp.path());

    let graph = build_graph(&load(temp.path()));
    let index = LineageIndex::build(&graph);

    assert!(index.feeds("table:raw_orders", "table:fct_revenue"));
    assert!(!index.feeds("table:fct_revenue", "table:raw_orders"));

    let downstream = index.downstream("orders_pipeline:t2").unwrap();
    assert_eq!(downstream[0], "table:dim_customer");
    assert!(downstream.contains(&"revenue:aggregate".to_string()));
}

#[test]
fn json_round_trips_through_interchange_format() {
    let temp = TempDir::new().unwrap();
    write_dags(temp.path());

    let graph = build_graph(&load(temp.path()));
    let json = graph.to_json().unwrap();
    let parsed = LineageGraph::from_json(&json).unwrap();

    assert_eq!(parsed, graph);
    assert_eq!(parsed.fingerprint().unwrap(), graph.fingerprint().unwrap());
    assert_eq!(
        parsed.node("revenue:aggregate").map(|n| n.kind),
        Some(NodeKind::Fact)
    );
}

#[test]
fn rebuilding_is_deterministic() {
    let temp = TempDir::new().unwrap();
    write_dags(temp.path());

    let first = build_graph(&load(temp.path())).to_json().unwrap();
    let second = build_graph(&load(temp.path())).to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn lineage_command_writes_report() {
    let temp = TempDir::new().unwrap();
    let dags = temp.path().join("dags");
    write_dags(&dags);
    let output = temp.path().join("site/lineage.json");

    tokio_test::block_on(dwat::cli::lineage::run(
        Some(dags),
        Some(output.clone()),
        Some(ReportFormat::Json),
        false,
        &DwatConfig::default(),
        false,
    ))
    .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let graph = LineageGraph::from_json(&written).unwrap();
    assert!(graph.contains_node("table:fct_revenue"));
}

#[test]
fn lineage_command_reports_missing_directory() {
    let temp = TempDir::new().unwrap();

    let result = tokio_test::block_on(dwat::cli::lineage::run(
        Some(temp.path().join("missing")),
        None,
        Some(ReportFormat::Text),
        false,
        &DwatConfig::default(),
        false,
    ));
    assert!(result.is_err());
}
