//! FILENAME: operations/src/operation.rs
//! PURPOSE: The closed set of operations and their shared contract.
//! CONTEXT: An operation is an immutable description of a transform.
//! Lifecycle: constructed (possibly from JSON, never validated there),
//! validated, then executed against a project to produce a history
//! entry. Execution only reads the project; the change it returns is
//! what mutates it.

use crate::change::Change;
use crate::column_removal::ColumnRemovalOperation;
use crate::column_rename::ColumnRenameOperation;
use crate::error::OperationResult;
use crate::history::HistoryEntry;
use crate::key_value_columnize::KeyValueColumnizeOperation;
use crate::registry::registry;
use model::Project;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Columns an operation adds, deletes or rewrites in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsDiff {
    pub added: BTreeSet<String>,
    pub deleted: BTreeSet<String>,
    pub modified: BTreeSet<String>,
}

impl ColumnsDiff {
    pub fn with_added(mut self, name: impl Into<String>) -> Self {
        self.added.insert(name.into());
        self
    }

    pub fn with_deleted(mut self, name: impl Into<String>) -> Self {
        self.deleted.insert(name.into());
        self
    }

    pub fn with_modified(mut self, name: impl Into<String>) -> Self {
        self.modified.insert(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op")]
pub enum Operation {
    #[serde(rename = "core/key-value-columnize")]
    KeyValueColumnize(KeyValueColumnizeOperation),
    #[serde(rename = "core/column-removal")]
    ColumnRemoval(ColumnRemovalOperation),
    #[serde(rename = "core/column-rename")]
    ColumnRename(ColumnRenameOperation),
}

impl Operation {
    /// Builds an operation from a tagged JSON record via the registry.
    pub fn from_json(json: serde_json::Value) -> OperationResult<Self> {
        registry()?.construct(json)
    }

    pub fn from_json_str(text: &str) -> OperationResult<Self> {
        Operation::from_json(serde_json::from_str(text)?)
    }

    /// The `op` tag.
    pub fn json_type(&self) -> &'static str {
        match self {
            Operation::KeyValueColumnize(_) => "core/key-value-columnize",
            Operation::ColumnRemoval(_) => "core/column-removal",
            Operation::ColumnRename(_) => "core/column-rename",
        }
    }

    /// Fails with a message naming the first missing required parameter.
    pub fn validate(&self) -> OperationResult<()> {
        match self {
            Operation::KeyValueColumnize(op) => op.validate(),
            Operation::ColumnRemoval(op) => op.validate(),
            Operation::ColumnRename(op) => op.validate(),
        }
    }

    /// Exact set of columns the operation reads. Every operation here
    /// names its columns directly, so the set is always known.
    pub fn column_dependencies(&self) -> Option<BTreeSet<String>> {
        Some(match self {
            Operation::KeyValueColumnize(op) => op.column_dependencies(),
            Operation::ColumnRemoval(op) => op.column_dependencies(),
            Operation::ColumnRename(op) => op.column_dependencies(),
        })
    }

    /// Structural effect on columns, `None` when it depends on the data.
    pub fn columns_diff(&self) -> Option<ColumnsDiff> {
        match self {
            Operation::KeyValueColumnize(op) => op.columns_diff(),
            Operation::ColumnRemoval(op) => op.columns_diff(),
            Operation::ColumnRename(op) => op.columns_diff(),
        }
    }

    /// A copy with every column-name parameter substituted.
    pub fn rename_columns(&self, substitutions: &HashMap<String, String>) -> Self {
        match self {
            Operation::KeyValueColumnize(op) => {
                Operation::KeyValueColumnize(op.rename_columns(substitutions))
            }
            Operation::ColumnRemoval(op) => Operation::ColumnRemoval(op.rename_columns(substitutions)),
            Operation::ColumnRename(op) => Operation::ColumnRename(op.rename_columns(substitutions)),
        }
    }

    /// The configured description, or a generated one.
    pub fn description(&self) -> String {
        let (configured, brief) = match self {
            Operation::KeyValueColumnize(op) => (&op.description, op.brief_description()),
            Operation::ColumnRemoval(op) => (&op.description, op.brief_description()),
            Operation::ColumnRename(op) => (&op.description, op.brief_description()),
        };
        configured.clone().unwrap_or(brief)
    }

    /// Validates and computes the change. `project` is only read.
    pub fn compute_change(&self, project: &Project) -> OperationResult<Change> {
        self.validate()?;
        match self {
            Operation::KeyValueColumnize(op) => op.compute_change(project),
            Operation::ColumnRemoval(op) => op.compute_change(project),
            Operation::ColumnRename(op) => op.compute_change(project),
        }
    }

    /// Computes the change and wraps it in an unapplied history entry.
    pub fn create_history_entry(&self, project: &Project, id: u64) -> OperationResult<HistoryEntry> {
        let change = self.compute_change(project)?;
        log::debug!("history entry #{} created for {}", id, self.json_type());
        Ok(HistoryEntry::new(id, self.description(), self.clone(), change))
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Operation::from_json(json).map_err(serde::de::Error::custom)
    }
}
