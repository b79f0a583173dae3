//! FILENAME: tests/test_column_renames.rs
//! Integration tests for renaming columns across operations, facets and
//! expressions.

mod common;

use common::{project_from, TestHarness};
use expr::parse;
use facets::FacetConfig;
use operations::{ColumnRenameOperation, Operation};
use std::collections::{BTreeSet, HashMap};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn rename_map(op: &Operation) -> HashMap<String, String> {
    let diff = op.columns_diff().unwrap();
    let old = diff.deleted.iter().next().unwrap().clone();
    let new = diff.added.iter().next().unwrap().clone();
    HashMap::from([(old, new)])
}

fn set(names: &[&str]) -> Option<BTreeSet<String>> {
    Some(names.iter().map(|n| n.to_string()).collect())
}

// ============================================================================
// PROPAGATION
// ============================================================================

#[test]
fn test_rename_propagates_to_dependent_facets() {
    let project = project_from(
        &["City", "Country"],
        &[vec!["Paris", "FR"], vec!["Lyon", "FR"], vec!["Berlin", "DE"]],
    );
    let harness = TestHarness::new(project);
    let facet = FacetConfig::from_json_str(
        r#"{"type":"list","name":"Country","expression":"cells[\"Country\"].value",
            "columnName":"","selection":[{"v":{"v":"FR","l":"FR"}}]}"#,
    )
    .unwrap();
    assert_eq!(facet.column_dependencies(), set(&["Country"]));

    let op = Operation::ColumnRename(ColumnRenameOperation::new("Country", "Land"));
    harness.apply(op.clone()).unwrap();
    let renamed = facet.rename_column_dependencies(&rename_map(&op));

    assert_eq!(renamed.column_dependencies(), set(&["Land"]));
    let project = harness.snapshot();
    assert_eq!(renamed.apply(&project).unwrap().matching_rows(), vec![0, 1]);
}

#[test]
fn test_rename_leaves_unrelated_fields_alone() {
    let map = HashMap::from([("A".to_string(), "B".to_string())]);

    let on_a = parse("cells.A.value").unwrap();
    assert_eq!(on_a.rename_column_dependencies(&map), parse("cells.B.value").unwrap());

    let on_c = parse("row.cells[\"C\"].value").unwrap();
    assert_eq!(on_c.rename_column_dependencies(&map), on_c);
}

#[test]
fn test_operations_follow_earlier_renames() {
    let op: Operation = serde_json::from_str(
        r#"{"op":"core/key-value-columnize","keyColumnName":"k","valueColumnName":"v","noteColumnName":"n"}"#,
    )
    .unwrap();
    let map = HashMap::from([("k".to_string(), "key".to_string())]);

    let renamed = op.rename_columns(&map);
    assert_eq!(renamed.column_dependencies(), set(&["key", "n", "v"]));
    assert_eq!(op.column_dependencies(), set(&["k", "n", "v"]));
}
