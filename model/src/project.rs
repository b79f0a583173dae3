//! FILENAME: model/src/project.rs
//! PURPOSE: The table: ordered columns plus rows.
//! CONTEXT: The project is the sole owner of its column model and rows.
//! Operations read it to compute replacement lists; changes swap those
//! lists in as a single step.

use crate::cell::Cell;
use crate::column::ColumnModel;
use crate::error::{ModelError, ModelResult};
use crate::row::Row;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct Project {
    pub id: i64,
    pub column_model: ColumnModel,
    pub rows: Vec<Row>,
}

impl Project {
    pub fn new(id: i64) -> Self {
        Project {
            id,
            column_model: ColumnModel::new(),
            rows: Vec::new(),
        }
    }

    /// A project with the given columns, in order, and no rows.
    pub fn with_columns(id: i64, names: &[&str]) -> ModelResult<Self> {
        let mut project = Project::new(id);
        for name in names {
            project.column_model.create_column(name)?;
        }
        Ok(project)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn get_row(&self, row_index: usize) -> Option<&Row> {
        self.rows.get(row_index)
    }

    /// Appends a row given one optional cell per column, in column order.
    pub fn append_row(&mut self, cells: impl IntoIterator<Item = Option<Cell>>) {
        let mut row = Row::new(self.column_model.max_cell_index());
        for (column, cell) in self.column_model.columns().iter().zip(cells) {
            row.set_cell(column.cell_index, cell);
        }
        self.rows.push(row);
    }

    /// Convenience over [`Project::append_row`]: null values become absent cells.
    pub fn append_values(&mut self, values: impl IntoIterator<Item = Value>) {
        let cells: Vec<Option<Cell>> = values
            .into_iter()
            .map(|v| if v.is_null() { None } else { Some(Cell::from_value(v)) })
            .collect();
        self.append_row(cells);
    }

    /// Value in the named column of a row.
    pub fn cell_value(&self, row_index: usize, column_name: &str) -> ModelResult<Option<&Value>> {
        let column = self
            .column_model
            .get_column_by_name(column_name)
            .ok_or_else(|| ModelError::ColumnNotFound(column_name.to_string()))?;
        Ok(self
            .rows
            .get(row_index)
            .and_then(|row| row.get_cell_value(column.cell_index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_values_follows_column_order() {
        let mut project = Project::with_columns(1, &["a", "b"]).unwrap();
        project.column_model.remove_column("a").unwrap();
        project.column_model.create_column("c").unwrap();

        project.append_values(vec![Value::from("bee"), Value::from("sea")]);

        let row = project.get_row(0).unwrap();
        assert!(row.get_cell(0).is_none());
        assert_eq!(row.get_cell_value(1), Some(&Value::from("bee")));
        assert_eq!(row.get_cell_value(2), Some(&Value::from("sea")));
        assert_eq!(project.cell_value(0, "c").unwrap(), Some(&Value::from("sea")));
        assert!(project.cell_value(0, "a").is_err());
    }
}
