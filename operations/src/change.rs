//! FILENAME: operations/src/change.rs
//! PURPOSE: Concrete table mutations produced by operations.
//! CONTEXT: A change holds the complete replacement state, so applying
//! it is a single swap and reverting is the same swap in reverse. The
//! lists a change does not currently hold are the ones in the project.

use crate::error::{OperationError, OperationResult};
use model::{Column, Project, Row};

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Replaces every column and every row at once.
    MassRowColumn(MassRowColumnChange),
}

impl Change {
    pub fn apply(&mut self, project: &mut Project) -> OperationResult<()> {
        match self {
            Change::MassRowColumn(change) => change.apply(project),
        }
    }

    pub fn revert(&mut self, project: &mut Project) -> OperationResult<()> {
        match self {
            Change::MassRowColumn(change) => change.revert(project),
        }
    }

    pub fn is_applied(&self) -> bool {
        match self {
            Change::MassRowColumn(change) => change.applied,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MassRowColumnChange {
    columns: Vec<Column>,
    rows: Vec<Row>,
    /// Cell-index counter after the change. The project counter is raised
    /// to it on apply and left alone on revert.
    max_cell_index: usize,
    applied: bool,
}

impl MassRowColumnChange {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>, max_cell_index: usize) -> Self {
        MassRowColumnChange {
            columns,
            rows,
            max_cell_index,
            applied: false,
        }
    }

    /// Columns held by the change: the replacement list before apply,
    /// the previous list after.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn max_cell_index(&self) -> usize {
        self.max_cell_index
    }

    pub fn apply(&mut self, project: &mut Project) -> OperationResult<()> {
        if self.applied {
            return Err(OperationError::Execution("change is already applied".to_string()));
        }
        self.swap(project);
        self.applied = true;
        log::debug!(
            "applied mass row/column change: {} columns, {} rows",
            project.column_model.len(),
            project.rows.len()
        );
        Ok(())
    }

    pub fn revert(&mut self, project: &mut Project) -> OperationResult<()> {
        if !self.applied {
            return Err(OperationError::Execution("change is not applied".to_string()));
        }
        self.swap(project);
        self.applied = false;
        log::debug!("reverted mass row/column change");
        Ok(())
    }

    fn swap(&mut self, project: &mut Project) {
        let columns = std::mem::take(&mut self.columns);
        self.columns = project
            .column_model
            .replace_columns(columns, self.max_cell_index);
        std::mem::swap(&mut self.rows, &mut project.rows);
    }
}
