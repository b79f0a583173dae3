//! FILENAME: model/src/cell.rs
//! PURPOSE: Defines the immutable cell and its compact JSON record.
//! CONTEXT: A cell pairs a `Value` with an optional shared `Recon`.
//! Cells are value-like: rows hold them directly and operations copy them
//! freely between rows. The record form (`v`, `t`, `r`, `e`) is what gets
//! persisted; recons are written by id into a caller-supplied `Pool`.

use crate::error::{ModelError, ModelResult};
use crate::pool::Pool;
use crate::recon::Recon;
use crate::value::{EvalError, Value};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Type tag written next to values JSON cannot tell apart from strings.
pub const DATE_TYPE_TAG: &str = "date";

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: Value,
    pub recon: Option<Arc<Recon>>,
}

/// The persisted shape of a cell. Absent members mean "not applicable".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

impl Cell {
    pub fn new(value: Value, recon: Option<Arc<Recon>>) -> Self {
        Cell { value, recon }
    }

    pub fn from_value(value: impl Into<Value>) -> Self {
        Cell {
            value: value.into(),
            recon: None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.value.error_message()
    }

    /// Copy whose recon is a separate allocation, so changing one never
    /// shows through the other.
    pub fn deep_copy(&self) -> Cell {
        Cell {
            value: self.value.clone(),
            recon: self.recon.as_ref().map(|r| Arc::new(Recon::clone(r))),
        }
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    /// Builds the persisted record, registering the recon in `pool`.
    pub fn to_record(&self, pool: &mut Pool) -> CellRecord {
        let mut record = CellRecord {
            r: self.recon.as_ref().map(|r| pool.pool(r).to_string()),
            e: self.error_message().map(str::to_string),
            ..CellRecord::default()
        };

        record.v = match &self.value {
            Value::Null | Value::Error(_) => None,
            Value::Text(s) => Some(serde_json::Value::String(s.clone())),
            Value::Integer(n) => Some(serde_json::Value::from(*n)),
            Value::Boolean(b) => Some(serde_json::Value::Bool(*b)),
            Value::Float(n) => Some(match serde_json::Number::from_f64(*n) {
                Some(number) => serde_json::Value::Number(number),
                // JSON has no NaN/Infinity
                None => serde_json::Value::String(Value::format_float(*n)),
            }),
            Value::Timestamp(ts) => {
                record.t = Some(DATE_TYPE_TAG.to_string());
                Some(serde_json::Value::String(Value::format_timestamp(ts)))
            }
        };

        record
    }

    /// Rebuilds a cell, resolving its recon id against `pool`.
    pub fn from_record(record: CellRecord, pool: &Pool) -> ModelResult<Cell> {
        let recon = record.r.as_deref().map(|id| pool.resolve(id)).transpose()?;

        if let Some(message) = record.e {
            return Ok(Cell::new(Value::Error(EvalError::new(message)), recon));
        }

        let value = match (record.t.as_deref(), record.v) {
            (Some(DATE_TYPE_TAG), Some(serde_json::Value::String(text))) => {
                let ts = DateTime::parse_from_rfc3339(&text)
                    .map_err(|_| ModelError::InvalidDate(text.clone()))?;
                Value::Timestamp(ts)
            }
            (Some(DATE_TYPE_TAG), Some(other)) => {
                return Err(ModelError::InvalidDate(other.to_string()));
            }
            (_, Some(json)) => json_scalar_to_value(json),
            (_, None) => Value::Null,
        };

        Ok(Cell::new(value, recon))
    }

    pub fn save(&self, pool: &mut Pool) -> ModelResult<String> {
        Ok(serde_json::to_string(&self.to_record(pool))?)
    }

    pub fn load(text: &str, pool: &Pool) -> ModelResult<Cell> {
        let record: CellRecord = serde_json::from_str(text)?;
        Cell::from_record(record, pool)
    }
}

fn json_scalar_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Text(s),
        other => Value::Text(other.to_string()),
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}
