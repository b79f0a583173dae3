//! FILENAME: expr/src/bindings.rs
//! PURPOSE: The name -> runtime value environment an expression reads.
//! CONTEXT: Callers build one environment per evaluation context (usually
//! one per row) and hand it to the evaluator read-only. Nothing here is
//! shared between evaluations, so rows can be evaluated in parallel.

use model::{EvalResult, Project, RowView, Value};
use rustc_hash::FxHashMap;

/// Name -> value bindings for one evaluation.
#[derive(Debug, Clone, Default)]
pub struct Bindings<'a> {
    values: FxHashMap<String, EvalResult<'a>>,
}

impl<'a> Bindings<'a> {
    pub fn new() -> Self {
        Bindings::default()
    }

    /// Binds `name`, replacing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<EvalResult<'a>>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&EvalResult<'a>> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Standard environment for evaluating against one row.
    ///
    /// Binds `row`, `cells` and `rowIndex`. With a base column it also
    /// binds `columnName`, plus `cell` and `value` from that column (null
    /// when the cell is absent). Returns `None` for an out-of-range row.
    pub fn for_row(project: &'a Project, row_index: usize, base_column: Option<&str>) -> Option<Self> {
        let row = project.get_row(row_index)?;
        let view = RowView::new(row, row_index, &project.column_model);

        let mut bindings = Bindings::new();
        bindings
            .bind("row", EvalResult::Row(view))
            .bind("cells", EvalResult::Cells(view.cells()))
            .bind("rowIndex", Value::Integer(row_index as i64));

        if let Some(column_name) = base_column {
            bindings.bind("columnName", Value::from(column_name));

            let cell = project
                .column_model
                .get_column_by_name(column_name)
                .and_then(|column| row.get_cell(column.cell_index));
            match cell {
                Some(cell) => {
                    bindings
                        .bind("value", cell.value.clone())
                        .bind("cell", EvalResult::Cell(cell.clone()));
                }
                None => {
                    bindings
                        .bind("value", Value::Null)
                        .bind("cell", EvalResult::null());
                }
            }
        }

        Some(bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Cell;

    #[test]
    fn row_bindings_with_base_column() {
        let mut project = Project::with_columns(1, &["Name", "Age"]).unwrap();
        project.append_values(vec![Value::from("Alice"), Value::Null]);

        let bindings = Bindings::for_row(&project, 0, Some("Name")).unwrap();
        assert_eq!(
            bindings.get("value"),
            Some(&EvalResult::Value(Value::from("Alice")))
        );
        assert_eq!(
            bindings.get("cell"),
            Some(&EvalResult::Cell(Cell::from_value("Alice")))
        );
        assert_eq!(
            bindings.get("columnName"),
            Some(&EvalResult::Value(Value::from("Name")))
        );
        assert!(matches!(bindings.get("cells"), Some(EvalResult::Cells(_))));

        let bindings = Bindings::for_row(&project, 0, Some("Age")).unwrap();
        assert!(bindings.get("value").unwrap().is_null());
    }

    #[test]
    fn row_bindings_without_base_column() {
        let mut project = Project::with_columns(1, &["Name"]).unwrap();
        project.append_values(vec![Value::from("Bob")]);

        let bindings = Bindings::for_row(&project, 0, None).unwrap();
        assert!(!bindings.contains("value"));
        assert!(!bindings.contains("columnName"));
        assert_eq!(
            bindings.get("rowIndex"),
            Some(&EvalResult::Value(Value::Integer(0)))
        );
        assert!(Bindings::for_row(&project, 5, None).is_none());
    }
}
