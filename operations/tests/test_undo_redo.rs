//! FILENAME: tests/test_undo_redo.rs
//! Integration tests for undo/redo through a shared project.

mod common;

use common::{some, TestHarness};
use model::Project;
use operations::{
    ColumnRemovalOperation, ColumnRenameOperation, EngineConfig, HistoryConfig,
    KeyValueColumnizeOperation, Operation, OperationError, SharedProject,
};

// ============================================================================
// BASIC UNDO/REDO STATE TESTS
// ============================================================================

#[test]
fn test_initial_undo_state() {
    let harness = TestHarness::with_key_values();
    let (can_undo, can_redo) = harness
        .shared
        .with_history(|h| (h.can_undo(), h.can_redo()))
        .unwrap();
    assert!(!can_undo);
    assert!(!can_redo);
    assert!(matches!(harness.shared.redo(), Err(OperationError::NothingToRedo)));
}

#[test]
fn test_undo_columnize_restores_the_table() {
    let harness = TestHarness::with_key_values();
    let before = harness.snapshot();

    let id = harness
        .apply(Operation::KeyValueColumnize(KeyValueColumnizeOperation::new(
            "Key", "Value", None,
        )))
        .unwrap();
    assert_eq!(id, 1);

    assert_eq!(harness.shared.undo().unwrap(), 1);
    let after = harness.snapshot();
    assert_eq!(after.column_model.columns(), before.column_model.columns());
    assert_eq!(after.rows, before.rows);
    // Indices handed out by the undone operation stay retired.
    assert_eq!(after.column_model.max_cell_index(), 4);

    assert_eq!(harness.shared.redo().unwrap(), 1);
    assert_eq!(harness.column_names(), vec!["Name", "Age"]);
    assert_eq!(harness.texts("Name"), some(&["Alice", "Bob"]));
}

#[test]
fn test_redo_cleared_on_new_operation() {
    let harness = TestHarness::with_key_values();
    harness
        .apply(Operation::ColumnRename(ColumnRenameOperation::new("Key", "K")))
        .unwrap();
    harness.shared.undo().unwrap();

    let id = harness
        .apply(Operation::ColumnRename(ColumnRenameOperation::new("Value", "V")))
        .unwrap();
    assert_eq!(id, 2);
    assert!(!harness.shared.with_history(|h| h.can_redo()).unwrap());
    assert_eq!(harness.column_names(), vec!["Key", "V"]);
}

#[test]
fn test_descriptions_track_the_stacks() {
    let harness = TestHarness::with_key_values();
    let op: Operation = serde_json::from_str(
        r#"{"op":"core/column-removal","description":"Drop values","columnName":"Value"}"#,
    )
    .unwrap();
    harness.apply(op).unwrap();
    assert_eq!(
        harness.shared.with_history(|h| h.undo_description().map(str::to_string)).unwrap(),
        Some("Drop values".to_string())
    );

    harness.shared.undo().unwrap();
    assert_eq!(
        harness.shared.with_history(|h| h.redo_description().map(str::to_string)).unwrap(),
        Some("Drop values".to_string())
    );
}

#[test]
fn test_history_is_bounded_by_config() {
    let config = EngineConfig {
        history: HistoryConfig {
            max_entries: 1,
            max_redo_entries: 1,
        },
    };
    let project = Project::with_columns(1, &["a", "b", "c"]).unwrap();
    let shared = SharedProject::new(project, &config);

    for name in ["a", "b"] {
        shared
            .apply_operation(&Operation::ColumnRemoval(ColumnRemovalOperation::new(name)))
            .unwrap();
    }
    assert_eq!(shared.undo().unwrap(), 2);
    assert!(matches!(shared.undo(), Err(OperationError::NothingToUndo)));

    let project = shared.into_project().unwrap();
    assert_eq!(project.column_model.column_names(), vec!["b", "c"]);
}
