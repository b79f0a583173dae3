//! FILENAME: operations/src/column_removal.rs
//! PURPOSE: Removes one column from the column model.
//! CONTEXT: Rows keep their cells; the removed column's cell index is
//! retired and never handed out again.

use crate::change::{Change, MassRowColumnChange};
use crate::error::{OperationError, OperationResult};
use crate::operation::ColumnsDiff;
use model::Project;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRemovalOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub column_name: Option<String>,
}

impl ColumnRemovalOperation {
    pub fn new(column_name: &str) -> Self {
        ColumnRemovalOperation {
            description: None,
            column_name: Some(column_name.to_string()),
        }
    }

    pub fn validate(&self) -> OperationResult<()> {
        match self.column_name {
            Some(_) => Ok(()),
            None => Err(OperationError::Validation(
                "Missing column name (columnName)".to_string(),
            )),
        }
    }

    pub fn column_dependencies(&self) -> BTreeSet<String> {
        self.column_name.iter().cloned().collect()
    }

    pub fn columns_diff(&self) -> Option<ColumnsDiff> {
        let name = self.column_name.as_ref()?;
        Some(ColumnsDiff::default().with_deleted(name))
    }

    pub fn rename_columns(&self, substitutions: &HashMap<String, String>) -> Self {
        ColumnRemovalOperation {
            description: self.description.clone(),
            column_name: self
                .column_name
                .as_ref()
                .map(|n| substitutions.get(n).unwrap_or(n).clone()),
        }
    }

    pub fn brief_description(&self) -> String {
        format!("Remove column {}", self.column_name.as_deref().unwrap_or_default())
    }

    pub fn compute_change(&self, project: &Project) -> OperationResult<Change> {
        self.validate()?;
        let name = self.column_name.as_deref().unwrap_or_default();
        let mut model = project.column_model.clone();
        model
            .remove_column(name)
            .map_err(|_| OperationError::ColumnNotFound(name.to_string()))?;

        Ok(Change::MassRowColumn(MassRowColumnChange::new(
            model.columns().to_vec(),
            project.rows.clone(),
            model.max_cell_index(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Value;

    #[test]
    fn removal_keeps_row_cells_and_retires_the_index() {
        let mut project = Project::with_columns(1, &["a", "b"]).unwrap();
        project.append_values(vec![Value::from("x"), Value::from("y")]);

        let op = ColumnRemovalOperation::new("a");
        let mut change = op.compute_change(&project).unwrap();
        change.apply(&mut project).unwrap();

        assert_eq!(project.column_model.column_names(), vec!["b".to_string()]);
        assert_eq!(project.rows[0].get_cell_value(0), Some(&Value::from("x")));
        assert_eq!(project.column_model.create_column("c").unwrap().cell_index, 2);
    }

    #[test]
    fn diff_and_validation() {
        let op = ColumnRemovalOperation::new("a");
        assert_eq!(op.columns_diff(), Some(ColumnsDiff::default().with_deleted("a")));
        assert!(ColumnRemovalOperation::default().validate().is_err());

        let project = Project::with_columns(1, &["b"]).unwrap();
        assert!(matches!(
            op.compute_change(&project),
            Err(OperationError::ColumnNotFound(_))
        ));
    }
}
