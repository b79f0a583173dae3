//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for operation integration tests.

#![allow(dead_code)]

use model::{Project, Value};
use operations::{EngineConfig, Operation, OperationResult, SharedProject};

/// Test harness wrapping a shared project.
pub struct TestHarness {
    pub shared: SharedProject,
}

impl TestHarness {
    pub fn new(project: Project) -> Self {
        TestHarness {
            shared: SharedProject::new(project, &EngineConfig::default()),
        }
    }

    /// Harness over the two-record Key/Value fixture.
    pub fn with_key_values() -> Self {
        Self::new(KeyValueFixture::project())
    }

    pub fn apply(&self, operation: Operation) -> OperationResult<u64> {
        self.shared.apply_operation(&operation)
    }

    pub fn apply_json(&self, json: &str) -> OperationResult<u64> {
        self.apply(Operation::from_json_str(json)?)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.shared.read(|p| p.column_model.column_names()).unwrap()
    }

    pub fn row_count(&self) -> usize {
        self.shared.read(|p| p.row_count()).unwrap()
    }

    pub fn texts(&self, column: &str) -> Vec<Option<String>> {
        self.shared.read(|p| texts(p, column)).unwrap()
    }

    pub fn snapshot(&self) -> Project {
        self.shared.read(|p| p.clone()).unwrap()
    }
}

/// Tall Key/Value data without grouping columns.
pub struct KeyValueFixture;

impl KeyValueFixture {
    pub fn rows() -> Vec<(&'static str, &'static str)> {
        vec![("Name", "Alice"), ("Age", "30"), ("Name", "Bob"), ("Age", "25")]
    }

    pub fn project() -> Project {
        project_from(&["Key", "Value"], &Self::rows_as_values())
    }

    fn rows_as_values() -> Vec<Vec<&'static str>> {
        Self::rows().into_iter().map(|(k, v)| vec![k, v]).collect()
    }
}

/// Builds a project with text cells; "" becomes an absent cell.
pub fn project_from(columns: &[&str], rows: &[Vec<&str>]) -> Project {
    let mut project = Project::with_columns(1, columns).unwrap();
    for row in rows {
        project.append_row(row.iter().map(|text| {
            if text.is_empty() {
                None
            } else {
                Some(model::Cell::from_value(Value::from(*text)))
            }
        }));
    }
    project
}

pub fn texts(project: &Project, column: &str) -> Vec<Option<String>> {
    (0..project.row_count())
        .map(|i| project.cell_value(i, column).unwrap().map(|v| v.to_string()))
        .collect()
}

pub fn some(values: &[&str]) -> Vec<Option<String>> {
    values
        .iter()
        .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
        .collect()
}
