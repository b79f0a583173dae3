//! FILENAME: model/src/column.rs
//! PURPOSE: Column schema entries and the column model that owns them.
//! CONTEXT: A column's `cell_index` is its slot in every row. Slots are
//! handed out by the column model's counter and are never handed out
//! twice, so rows stay addressable while other columns come and go.

use crate::error::{ModelError, ModelResult};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub cell_index: usize,
    pub name: String,
    /// Name the column was created with.
    pub original_name: String,
}

impl Column {
    pub fn new(cell_index: usize, name: impl Into<String>) -> Self {
        let name = name.into();
        Column {
            cell_index,
            original_name: name.clone(),
            name,
        }
    }
}

/// Ordered columns plus the cell-index counter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ColumnModelRecord")]
pub struct ColumnModel {
    columns: Vec<Column>,
    /// Next free cell index. Only ever grows.
    max_cell_index: usize,
    #[serde(skip)]
    name_to_position: FxHashMap<String, usize>,
}

/// Stored form of a column model. Reading goes through it so the name
/// lookup and the counter are rebuilt before the model is handed out.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnModelRecord {
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default)]
    max_cell_index: usize,
}

impl TryFrom<ColumnModelRecord> for ColumnModel {
    type Error = ModelError;

    fn try_from(record: ColumnModelRecord) -> ModelResult<Self> {
        let mut model = ColumnModel {
            columns: record.columns,
            max_cell_index: record.max_cell_index,
            name_to_position: FxHashMap::default(),
        };
        model.rebuild_index();
        if model.name_to_position.len() != model.columns.len() {
            let mut seen = rustc_hash::FxHashSet::default();
            let duplicate = model
                .columns
                .iter()
                .find(|c| !seen.insert(c.name.as_str()))
                .map(|c| c.name.clone())
                .unwrap_or_default();
            return Err(ModelError::DuplicateColumnName(duplicate));
        }
        Ok(model)
    }
}

impl ColumnModel {
    pub fn new() -> Self {
        ColumnModel::default()
    }

    /// Rebuilds the name lookup and raises the counter past every
    /// column's cell index.
    fn rebuild_index(&mut self) {
        self.name_to_position.clear();
        for (position, column) in self.columns.iter().enumerate() {
            self.name_to_position.insert(column.name.clone(), position);
        }
        if let Some(max) = self.columns.iter().map(|c| c.cell_index + 1).max() {
            self.max_cell_index = self.max_cell_index.max(max);
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn max_cell_index(&self) -> usize {
        self.max_cell_index
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Returns the counter value and advances it.
    pub fn allocate_new_cell_index(&mut self) -> usize {
        let index = self.max_cell_index;
        self.max_cell_index += 1;
        index
    }

    /// `proposed` if no column has that name, otherwise the first free
    /// `"{proposed} {n}"` counting from 2.
    pub fn get_unduplicated_column_name(&self, proposed: &str) -> String {
        unduplicated_name(proposed, |name| self.name_to_position.contains_key(name))
    }

    pub fn get_column_by_name(&self, name: &str) -> Option<&Column> {
        self.name_to_position
            .get(name)
            .map(|&position| &self.columns[position])
    }

    /// Position of the column in the ordered list.
    pub fn get_column_index_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_position.get(name).copied()
    }

    pub fn get_column_by_cell_index(&self, cell_index: usize) -> Option<&Column> {
        self.columns.iter().find(|c| c.cell_index == cell_index)
    }

    /// Appends a new column with a freshly allocated cell index.
    pub fn create_column(&mut self, name: &str) -> ModelResult<Column> {
        if self.name_to_position.contains_key(name) {
            return Err(ModelError::DuplicateColumnName(name.to_string()));
        }
        let column = Column::new(self.allocate_new_cell_index(), name);
        self.add_column(self.columns.len(), column.clone())?;
        Ok(column)
    }

    /// Inserts `column` at `position` (clamped to the end).
    pub fn add_column(&mut self, position: usize, column: Column) -> ModelResult<()> {
        if self.name_to_position.contains_key(&column.name) {
            return Err(ModelError::DuplicateColumnName(column.name));
        }
        self.max_cell_index = self.max_cell_index.max(column.cell_index + 1);
        let position = position.min(self.columns.len());
        self.columns.insert(position, column);
        self.rebuild_index();
        Ok(())
    }

    /// Removes a column. Its cell index stays retired.
    pub fn remove_column(&mut self, name: &str) -> ModelResult<Column> {
        let position = self
            .get_column_index_by_name(name)
            .ok_or_else(|| ModelError::ColumnNotFound(name.to_string()))?;
        let column = self.columns.remove(position);
        self.rebuild_index();
        Ok(column)
    }

    pub fn rename_column(&mut self, old_name: &str, new_name: &str) -> ModelResult<()> {
        if old_name == new_name {
            return Ok(());
        }
        if self.name_to_position.contains_key(new_name) {
            return Err(ModelError::DuplicateColumnName(new_name.to_string()));
        }
        let position = self
            .get_column_index_by_name(old_name)
            .ok_or_else(|| ModelError::ColumnNotFound(old_name.to_string()))?;
        self.columns[position].name = new_name.to_string();
        self.rebuild_index();
        Ok(())
    }

    /// Swaps in a whole new column list. The counter is raised to
    /// `max_cell_index` if that is higher but is never lowered.
    pub fn replace_columns(&mut self, columns: Vec<Column>, max_cell_index: usize) -> Vec<Column> {
        let previous = std::mem::replace(&mut self.columns, columns);
        self.max_cell_index = self.max_cell_index.max(max_cell_index);
        self.rebuild_index();
        previous
    }
}

/// Shared by the column model and by operations that name several new
/// columns before any of them exist.
pub fn unduplicated_name(proposed: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(proposed) {
        return proposed.to_string();
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{} {}", proposed, suffix);
        if !is_taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
