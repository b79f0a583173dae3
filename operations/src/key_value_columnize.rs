//! FILENAME: operations/src/key_value_columnize.rs
//! PURPOSE: Pivots tall key/value rows into one column per distinct key.
//! CONTEXT: Every column other than the key, value and note columns is a
//! grouping column. Output columns are the grouping columns in their
//! original order, then one column per distinct key (first-seen order),
//! then one note column per key that carried a note.
//!
//! WITHOUT GROUPING COLUMNS:
//!   The first non-blank key seen marks the start of a record. Every later
//!   row with that key starts a new output row; other keys add to the
//!   current one. A repeated key inside a record spills into an extra row.
//!   A blank key also starts a new output row.
//!
//! WITH GROUPING COLUMNS:
//!   Rows are merged by their grouping values. A new merge target is
//!   started when the current one already has a value in the column about
//!   to be written. Rows with a blank key are copied through with only
//!   their grouping cells.
//!
//! Rows left completely empty are dropped.

use crate::change::{Change, MassRowColumnChange};
use crate::error::{OperationError, OperationResult};
use crate::operation::ColumnsDiff;
use model::{unduplicated_name, Cell, Column, ColumnModel, Project, Row, Value};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueColumnizeOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub key_column_name: Option<String>,
    #[serde(default)]
    pub value_column_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_column_name: Option<String>,
}

impl KeyValueColumnizeOperation {
    pub fn new(key_column_name: &str, value_column_name: &str, note_column_name: Option<&str>) -> Self {
        KeyValueColumnizeOperation {
            description: None,
            key_column_name: Some(key_column_name.to_string()),
            value_column_name: Some(value_column_name.to_string()),
            note_column_name: note_column_name.map(str::to_string),
        }
    }

    pub fn validate(&self) -> OperationResult<()> {
        if self.key_column_name.is_none() {
            return Err(OperationError::Validation(
                "Missing key column name (keyColumnName)".to_string(),
            ));
        }
        if self.value_column_name.is_none() {
            return Err(OperationError::Validation(
                "Missing value column name (valueColumnName)".to_string(),
            ));
        }
        Ok(())
    }

    pub fn column_dependencies(&self) -> BTreeSet<String> {
        [
            &self.key_column_name,
            &self.value_column_name,
            &self.note_column_name,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }

    /// The resulting columns depend on the data.
    pub fn columns_diff(&self) -> Option<ColumnsDiff> {
        None
    }

    pub fn rename_columns(&self, substitutions: &HashMap<String, String>) -> Self {
        let rename = |name: &Option<String>| {
            name.as_ref()
                .map(|n| substitutions.get(n).unwrap_or(n).clone())
        };
        KeyValueColumnizeOperation {
            description: self.description.clone(),
            key_column_name: rename(&self.key_column_name),
            value_column_name: rename(&self.value_column_name),
            note_column_name: rename(&self.note_column_name),
        }
    }

    pub fn brief_description(&self) -> String {
        let key = self.key_column_name.as_deref().unwrap_or_default();
        let value = self.value_column_name.as_deref().unwrap_or_default();
        match &self.note_column_name {
            Some(note) => format!(
                "Columnize by key column {} and value column {} with note column {}",
                key, value, note
            ),
            None => format!("Columnize by key column {} and value column {}", key, value),
        }
    }

    /// Computes the pivoted table without touching `project`.
    pub fn compute_change(&self, project: &Project) -> OperationResult<Change> {
        self.validate()?;
        let model = &project.column_model;
        let key_column = find_column(model, self.key_column_name.as_deref())?;
        let value_column = find_column(model, self.value_column_name.as_deref())?;
        let note_column = match self.note_column_name.as_deref() {
            Some(name) => Some(find_column(model, Some(name))?),
            None => None,
        };

        let grouping: Vec<Column> = model
            .columns()
            .iter()
            .filter(|c| {
                c.cell_index != key_column.cell_index
                    && c.cell_index != value_column.cell_index
                    && note_column.map_or(true, |n| c.cell_index != n.cell_index)
            })
            .cloned()
            .collect();
        let degenerate = grouping.is_empty();

        let mut allocator = ColumnAllocator::new(model);
        let mut key_columns = NewColumns::default();
        let mut note_columns = NewColumns::default();

        let mut new_rows: Vec<Row> = Vec::new();
        // Rows of the current record, for spilling repeated keys.
        let mut current_rows: Vec<usize> = Vec::new();
        // Row that notes (and, when grouping, values) go to.
        let mut target: Option<usize> = None;
        let mut group_to_row: FxHashMap<String, usize> = FxHashMap::default();
        let mut record_key: Option<String> = None;

        if degenerate {
            target = Some(start_record(&mut new_rows, &mut current_rows));
        }

        for old_row in &project.rows {
            let key = match old_row
                .get_cell_value(key_column.cell_index)
                .filter(|v| v.is_non_blank())
            {
                Some(key) => key.to_string(),
                None => {
                    if degenerate {
                        target = Some(start_record(&mut new_rows, &mut current_rows));
                    } else {
                        new_rows.push(copy_grouping_cells(&grouping, old_row));
                    }
                    continue;
                }
            };

            if degenerate && record_key.as_ref().map_or(true, |record| *record == key) {
                target = Some(start_record(&mut new_rows, &mut current_rows));
            }

            let new_column = key_columns.get_or_allocate(&key, &key, &mut allocator);
            if record_key.is_none() {
                record_key = Some(key.clone());
            }

            let value_cell = old_row.get_cell(value_column.cell_index).cloned();
            if degenerate {
                let row_index = available_row(&mut new_rows, &mut current_rows, new_column.cell_index);
                new_rows[row_index].set_cell(new_column.cell_index, value_cell);
            } else {
                let group_key = grouping_key(&grouping, old_row);
                let merge_target = group_to_row
                    .get(&group_key)
                    .copied()
                    .filter(|&i| !has_value(&new_rows[i], new_column.cell_index));
                let row_index = match merge_target {
                    Some(i) => i,
                    None => {
                        new_rows.push(copy_grouping_cells(&grouping, old_row));
                        let i = new_rows.len() - 1;
                        group_to_row.insert(group_key, i);
                        i
                    }
                };
                new_rows[row_index].set_cell(new_column.cell_index, value_cell);
                target = Some(row_index);
            }

            if let Some(note_column) = note_column {
                let note_value = match old_row
                    .get_cell_value(note_column.cell_index)
                    .filter(|v| v.is_non_blank())
                {
                    Some(note) => note,
                    None => continue,
                };
                let target = target.ok_or_else(|| {
                    OperationError::Execution("no output row for note".to_string())
                })?;
                let note_name = format!("{} : {}", note_column.name, key);
                let new_note_column = note_columns.get_or_allocate(&key, &note_name, &mut allocator);

                let row = &mut new_rows[target];
                let concatenated = row
                    .get_cell_value(new_note_column.cell_index)
                    .filter(|v| v.is_non_blank())
                    .map(|existing| format!("{};{}", existing, note_value));
                match concatenated {
                    Some(text) => row.set_cell(new_note_column.cell_index, Some(Cell::from_value(text))),
                    None => row.set_cell(
                        new_note_column.cell_index,
                        old_row.get_cell(note_column.cell_index).cloned(),
                    ),
                }
            }
        }

        new_rows.retain(|row| !row.is_empty());

        let mut columns = grouping;
        columns.extend(key_columns.columns);
        columns.extend(note_columns.columns);

        log::debug!(
            "columnized {} rows into {} rows and {} columns",
            project.rows.len(),
            new_rows.len(),
            columns.len()
        );
        Ok(Change::MassRowColumn(MassRowColumnChange::new(
            columns,
            new_rows,
            allocator.next_cell_index,
        )))
    }
}

fn find_column<'m>(model: &'m ColumnModel, name: Option<&str>) -> OperationResult<&'m Column> {
    let name = name.unwrap_or_default();
    model
        .get_column_by_name(name)
        .ok_or_else(|| OperationError::ColumnNotFound(name.to_string()))
}

/// Hands out cell indices above the project's counter and names that are
/// free both in the project and among the names already handed out.
struct ColumnAllocator<'m> {
    model: &'m ColumnModel,
    next_cell_index: usize,
    allocated: FxHashSet<String>,
}

impl<'m> ColumnAllocator<'m> {
    fn new(model: &'m ColumnModel) -> Self {
        ColumnAllocator {
            model,
            next_cell_index: model.max_cell_index(),
            allocated: FxHashSet::default(),
        }
    }

    fn allocate(&mut self, proposed: &str) -> Column {
        let name = unduplicated_name(proposed, |name| {
            self.model.get_column_by_name(name).is_some() || self.allocated.contains(name)
        });
        self.allocated.insert(name.clone());
        let column = Column::new(self.next_cell_index, name);
        self.next_cell_index += 1;
        column
    }
}

/// Columns created per key, in first-seen order.
#[derive(Default)]
struct NewColumns {
    by_key: FxHashMap<String, usize>,
    columns: Vec<Column>,
}

impl NewColumns {
    fn get_or_allocate(&mut self, key: &str, proposed: &str, allocator: &mut ColumnAllocator) -> Column {
        if let Some(&position) = self.by_key.get(key) {
            return self.columns[position].clone();
        }
        let column = allocator.allocate(proposed);
        self.by_key.insert(key.to_string(), self.columns.len());
        self.columns.push(column.clone());
        column
    }
}

fn start_record(new_rows: &mut Vec<Row>, current_rows: &mut Vec<usize>) -> usize {
    new_rows.push(Row::new(0));
    let index = new_rows.len() - 1;
    current_rows.clear();
    current_rows.push(index);
    index
}

/// First row of the current record with a free slot at `cell_index`,
/// adding a new one if all are taken.
fn available_row(new_rows: &mut Vec<Row>, current_rows: &mut Vec<usize>, cell_index: usize) -> usize {
    if let Some(&index) = current_rows
        .iter()
        .find(|&&i| new_rows[i].get_cell(cell_index).is_none())
    {
        return index;
    }
    new_rows.push(Row::new(cell_index + 1));
    let index = new_rows.len() - 1;
    current_rows.push(index);
    index
}

fn copy_grouping_cells(grouping: &[Column], old_row: &Row) -> Row {
    let mut row = Row::new(old_row.len());
    for column in grouping {
        row.set_cell(column.cell_index, old_row.get_cell(column.cell_index).cloned());
    }
    row
}

/// Grouping values joined with NUL; absent cells read as "".
fn grouping_key(grouping: &[Column], old_row: &Row) -> String {
    grouping
        .iter()
        .map(|column| {
            old_row
                .get_cell_value(column.cell_index)
                .map(Value::to_string)
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join("\0")
}

fn has_value(row: &Row, cell_index: usize) -> bool {
    row.get_cell_value(cell_index).map_or(false, |v| !v.is_null())
}
