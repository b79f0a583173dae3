//! FILENAME: operations/src/column_rename.rs
//! PURPOSE: Renames one column.

use crate::change::{Change, MassRowColumnChange};
use crate::error::{OperationError, OperationResult};
use crate::operation::ColumnsDiff;
use model::Project;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRenameOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub old_column_name: Option<String>,
    #[serde(default)]
    pub new_column_name: Option<String>,
}

impl ColumnRenameOperation {
    pub fn new(old_column_name: &str, new_column_name: &str) -> Self {
        ColumnRenameOperation {
            description: None,
            old_column_name: Some(old_column_name.to_string()),
            new_column_name: Some(new_column_name.to_string()),
        }
    }

    pub fn validate(&self) -> OperationResult<()> {
        if self.old_column_name.is_none() {
            return Err(OperationError::Validation(
                "Missing old column name (oldColumnName)".to_string(),
            ));
        }
        match self.new_column_name.as_deref() {
            None => Err(OperationError::Validation(
                "Missing new column name (newColumnName)".to_string(),
            )),
            Some("") => Err(OperationError::Validation(
                "New column name (newColumnName) is empty".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }

    pub fn column_dependencies(&self) -> BTreeSet<String> {
        self.old_column_name.iter().cloned().collect()
    }

    pub fn columns_diff(&self) -> Option<ColumnsDiff> {
        let old = self.old_column_name.as_ref()?;
        let new = self.new_column_name.as_ref()?;
        Some(ColumnsDiff::default().with_deleted(old).with_added(new))
    }

    pub fn rename_columns(&self, substitutions: &HashMap<String, String>) -> Self {
        let rename = |name: &Option<String>| {
            name.as_ref()
                .map(|n| substitutions.get(n).unwrap_or(n).clone())
        };
        ColumnRenameOperation {
            description: self.description.clone(),
            old_column_name: rename(&self.old_column_name),
            new_column_name: rename(&self.new_column_name),
        }
    }

    pub fn brief_description(&self) -> String {
        format!(
            "Rename column {} to {}",
            self.old_column_name.as_deref().unwrap_or_default(),
            self.new_column_name.as_deref().unwrap_or_default()
        )
    }

    pub fn compute_change(&self, project: &Project) -> OperationResult<Change> {
        self.validate()?;
        let old = self.old_column_name.as_deref().unwrap_or_default();
        let new = self.new_column_name.as_deref().unwrap_or_default();

        if project.column_model.get_column_by_name(old).is_none() {
            return Err(OperationError::ColumnNotFound(old.to_string()));
        }
        if project.column_model.get_column_by_name(new).is_some() {
            return Err(OperationError::Execution(format!(
                "Another column is already named {}",
                new
            )));
        }

        let mut model = project.column_model.clone();
        model.rename_column(old, new)?;

        Ok(Change::MassRowColumn(MassRowColumnChange::new(
            model.columns().to_vec(),
            project.rows.clone(),
            model.max_cell_index(),
        )))
    }
}
