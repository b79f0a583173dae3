//! FILENAME: model/src/row.rs
//! PURPOSE: Sparse, index-addressable row storage.
//! CONTEXT: A row is a vector of optional cells indexed by column cell
//! index. Slots for removed columns simply stay where they are.

use crate::cell::{Cell, CellRecord};
use crate::error::ModelResult;
use crate::pool::Pool;
use crate::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<Option<Cell>>,
    pub flagged: bool,
    pub starred: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RowRecord {
    #[serde(default)]
    flagged: bool,
    #[serde(default)]
    starred: bool,
    #[serde(default)]
    cells: Vec<Option<CellRecord>>,
}

impl Row {
    /// An empty row with room for `capacity` cells.
    pub fn new(capacity: usize) -> Self {
        Row {
            cells: Vec::with_capacity(capacity),
            flagged: false,
            starred: false,
        }
    }

    pub fn from_cells(cells: Vec<Option<Cell>>) -> Self {
        Row {
            cells,
            flagged: false,
            starred: false,
        }
    }

    /// Logical length, including trailing absent slots.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when no slot holds a cell.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn get_cell(&self, cell_index: usize) -> Option<&Cell> {
        self.cells.get(cell_index).and_then(Option::as_ref)
    }

    pub fn get_cell_value(&self, cell_index: usize) -> Option<&Value> {
        self.get_cell(cell_index).map(|c| &c.value)
    }

    /// Blank when absent, null or the empty string.
    pub fn is_cell_blank(&self, cell_index: usize) -> bool {
        self.get_cell_value(cell_index).map_or(true, Value::is_blank)
    }

    /// Stores `cell` at `cell_index`, growing the row with absent slots.
    pub fn set_cell(&mut self, cell_index: usize, cell: Option<Cell>) {
        if cell_index >= self.cells.len() {
            if cell.is_none() {
                return;
            }
            self.cells.resize(cell_index + 1, None);
        }
        self.cells[cell_index] = cell;
    }

    pub fn cells(&self) -> &[Option<Cell>] {
        &self.cells
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    pub fn save(&self, pool: &mut Pool) -> ModelResult<String> {
        let record = RowRecord {
            flagged: self.flagged,
            starred: self.starred,
            cells: self
                .cells
                .iter()
                .map(|slot| slot.as_ref().map(|c| c.to_record(pool)))
                .collect(),
        };
        Ok(serde_json::to_string(&record)?)
    }

    pub fn load(text: &str, pool: &Pool) -> ModelResult<Row> {
        let record: RowRecord = serde_json::from_str(text)?;
        let cells = record
            .cells
            .into_iter()
            .map(|slot| slot.map(|r| Cell::from_record(r, pool)).transpose())
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Row {
            cells,
            flagged: record.flagged,
            starred: record.starred,
        })
    }
}
