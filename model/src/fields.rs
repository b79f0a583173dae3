//! FILENAME: model/src/fields.rs
//! PURPOSE: Runtime values seen by the expression evaluator.
//! CONTEXT: Expressions do not only produce cell values: `row`, `cells`,
//! a cell or its recon are all objects whose named fields can be read.
//! `EvalResult` is that wider universe and `FieldBearing` is the one
//! capability the evaluator dispatches on for field access.
//!
//! Field-bearing kinds:
//! - `Cell`: value, recon, errorMessage
//! - `Recon`: id, service, identifierSpace, schemaSpace, judgment,
//!   judgmentAction, matched, matchRank, match, best, candidates
//! - `ReconCandidate`: id, name, score, types
//! - `RowView`: cells, index, flagged, starred
//! - `CellsView`: one field per column name

use crate::cell::Cell;
use crate::column::ColumnModel;
use crate::recon::{Recon, ReconCandidate};
use crate::row::Row;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Objects whose named members can be read by a field accessor.
pub trait FieldBearing<'a> {
    /// The named member, or `None` when there is no such field.
    fn get_field(&self, name: &str) -> Option<EvalResult<'a>>;

    /// Whether the named member is itself field-bearing.
    fn has_nested_fields(&self, name: &str) -> bool;
}

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalResult<'a> {
    Value(Value),
    Cell(Cell),
    Recon(Arc<Recon>),
    Candidate(ReconCandidate),
    List(Vec<EvalResult<'a>>),
    Row(RowView<'a>),
    Cells(CellsView<'a>),
    /// A structured record, such as a parsed JSON object.
    Json(serde_json::Value),
}

impl<'a> EvalResult<'a> {
    pub fn null() -> Self {
        EvalResult::Value(Value::Null)
    }

    pub fn error(message: impl Into<String>) -> Self {
        EvalResult::Value(Value::error(message))
    }

    pub fn is_null(&self) -> bool {
        matches!(
            self,
            EvalResult::Value(Value::Null) | EvalResult::Json(serde_json::Value::Null)
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EvalResult::Value(Value::Error(_)))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            EvalResult::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_field_bearing(&self) -> Option<&dyn FieldBearing<'a>> {
        match self {
            EvalResult::Cell(cell) => Some(cell),
            EvalResult::Recon(recon) => Some(&**recon),
            EvalResult::Candidate(candidate) => Some(candidate),
            EvalResult::Row(row) => Some(row),
            EvalResult::Cells(cells) => Some(cells),
            _ => None,
        }
    }

    /// Collapses the result into something a cell can store.
    pub fn to_value(&self) -> Value {
        match self {
            EvalResult::Value(v) => v.clone(),
            EvalResult::Cell(cell) => cell.value.clone(),
            EvalResult::Json(json) => match EvalResult::from_json(json) {
                EvalResult::Value(v) => v,
                _ => Value::Text(json.to_string()),
            },
            other => Value::Text(other.to_string()),
        }
    }

    /// Converts a structured member into an evaluation result. Objects
    /// stay structured so that further field access keeps working.
    pub fn from_json(json: &serde_json::Value) -> EvalResult<'a> {
        match json {
            serde_json::Value::Null => EvalResult::null(),
            serde_json::Value::Bool(b) => EvalResult::Value(Value::Boolean(*b)),
            serde_json::Value::Number(n) => EvalResult::Value(match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            serde_json::Value::String(s) => EvalResult::Value(Value::Text(s.clone())),
            serde_json::Value::Array(items) => {
                EvalResult::List(items.iter().map(EvalResult::from_json).collect())
            }
            serde_json::Value::Object(_) => EvalResult::Json(json.clone()),
        }
    }
}

impl From<Value> for EvalResult<'_> {
    fn from(value: Value) -> Self {
        EvalResult::Value(value)
    }
}

impl fmt::Display for EvalResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalResult::Value(v) => fmt::Display::fmt(v, f),
            EvalResult::Cell(cell) => fmt::Display::fmt(cell, f),
            EvalResult::Recon(recon) => match &recon.match_candidate {
                Some(m) => f.write_str(&m.name),
                None => write!(f, "recon {}", recon.id),
            },
            EvalResult::Candidate(c) => f.write_str(&c.name),
            EvalResult::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            EvalResult::Row(row) => write!(f, "row {}", row.index),
            EvalResult::Cells(_) => f.write_str("cells"),
            EvalResult::Json(json) => write!(f, "{}", json),
        }
    }
}

// ============================================================================
// ROW PROJECTIONS
// ============================================================================

/// A row as seen from an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowView<'a> {
    pub row: &'a Row,
    pub index: usize,
    pub columns: &'a ColumnModel,
}

impl<'a> RowView<'a> {
    pub fn new(row: &'a Row, index: usize, columns: &'a ColumnModel) -> Self {
        RowView { row, index, columns }
    }

    pub fn cells(&self) -> CellsView<'a> {
        CellsView {
            row: self.row,
            columns: self.columns,
        }
    }
}

/// The cells of a row, addressed by column name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellsView<'a> {
    pub row: &'a Row,
    pub columns: &'a ColumnModel,
}

impl<'a> FieldBearing<'a> for RowView<'a> {
    fn get_field(&self, name: &str) -> Option<EvalResult<'a>> {
        match name {
            "cells" => Some(EvalResult::Cells(self.cells())),
            "index" => Some(Value::Integer(self.index as i64).into()),
            "flagged" => Some(Value::Boolean(self.row.flagged).into()),
            "starred" => Some(Value::Boolean(self.row.starred).into()),
            _ => None,
        }
    }

    fn has_nested_fields(&self, name: &str) -> bool {
        name == "cells"
    }
}

impl<'a> FieldBearing<'a> for CellsView<'a> {
    fn get_field(&self, name: &str) -> Option<EvalResult<'a>> {
        let column = self.columns.get_column_by_name(name)?;
        self.row
            .get_cell(column.cell_index)
            .map(|cell| EvalResult::Cell(cell.clone()))
    }

    fn has_nested_fields(&self, name: &str) -> bool {
        self.columns.get_column_by_name(name).is_some()
    }
}

// ============================================================================
// CELLS AND RECONS
// ============================================================================

impl<'a> FieldBearing<'a> for Cell {
    fn get_field(&self, name: &str) -> Option<EvalResult<'a>> {
        match name {
            "value" => Some(EvalResult::Value(self.value.clone())),
            "recon" => self.recon.clone().map(EvalResult::Recon),
            "errorMessage" => self
                .error_message()
                .map(|m| Value::Text(m.to_string()).into()),
            _ => None,
        }
    }

    fn has_nested_fields(&self, name: &str) -> bool {
        name == "recon"
    }
}

impl<'a> FieldBearing<'a> for Recon {
    fn get_field(&self, name: &str) -> Option<EvalResult<'a>> {
        let text = |s: &str| -> Option<EvalResult<'a>> {
            Some(EvalResult::Value(Value::Text(s.to_string())))
        };
        match name {
            "id" => Some(Value::Integer(self.id).into()),
            "service" => text(&self.service),
            "identifierSpace" => text(&self.identifier_space),
            "schemaSpace" => text(&self.schema_space),
            "judgment" => text(self.judgment.as_str()),
            "judgmentAction" => text(&self.judgment_action),
            "matched" => Some(Value::Boolean(self.is_matched()).into()),
            "matchRank" => self.match_rank.map(|r| Value::Integer(r as i64).into()),
            "match" => self.match_candidate.clone().map(EvalResult::Candidate),
            "best" => self.best_candidate().cloned().map(EvalResult::Candidate),
            "candidates" => Some(EvalResult::List(
                self.candidates
                    .iter()
                    .cloned()
                    .map(EvalResult::Candidate)
                    .collect(),
            )),
            _ => None,
        }
    }

    fn has_nested_fields(&self, name: &str) -> bool {
        matches!(name, "match" | "best")
    }
}

impl<'a> FieldBearing<'a> for ReconCandidate {
    fn get_field(&self, name: &str) -> Option<EvalResult<'a>> {
        match name {
            "id" => Some(Value::Text(self.id.clone()).into()),
            "name" => Some(Value::Text(self.name.clone()).into()),
            "score" => Some(Value::Float(self.score).into()),
            "types" => Some(EvalResult::List(
                self.types
                    .iter()
                    .map(|t| Value::Text(t.clone()).into())
                    .collect(),
            )),
            _ => None,
        }
    }

    fn has_nested_fields(&self, _name: &str) -> bool {
        false
    }
}
