//! FILENAME: operations/src/history.rs
//! PURPOSE: Undo/redo history of applied operations.
//! CONTEXT: Each entry pairs an operation with the change it produced.
//! Undo reverts the newest entry and moves it to the redo side; a new
//! entry clears the redo side. Both sides are bounded, oldest evicted.

use crate::change::Change;
use crate::config::HistoryConfig;
use crate::error::{OperationError, OperationResult};
use crate::operation::Operation;
use chrono::{DateTime, Utc};
use model::Project;
use serde::Serialize;
use std::collections::VecDeque;

/// One applied (or undone) operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u64,
    pub time: DateTime<Utc>,
    pub description: String,
    pub operation: Operation,
    #[serde(skip)]
    change: Change,
}

impl HistoryEntry {
    pub fn new(id: u64, description: String, operation: Operation, change: Change) -> Self {
        HistoryEntry {
            id,
            time: Utc::now(),
            description,
            operation,
            change,
        }
    }

    pub fn change(&self) -> &Change {
        &self.change
    }

    pub fn is_applied(&self) -> bool {
        self.change.is_applied()
    }

    pub fn apply(&mut self, project: &mut Project) -> OperationResult<()> {
        self.change.apply(project)
    }

    pub fn revert(&mut self, project: &mut Project) -> OperationResult<()> {
        self.change.revert(project)
    }
}

#[derive(Debug)]
pub struct History {
    /// Applied entries, most recent at back.
    undo_stack: VecDeque<HistoryEntry>,
    /// Undone entries, most recent at back.
    redo_stack: VecDeque<HistoryEntry>,
    next_id: u64,
    config: HistoryConfig,
}

impl History {
    pub fn new() -> Self {
        History::with_config(HistoryConfig::default())
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        History {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            next_id: 1,
            config,
        }
    }

    /// Id the next added entry should carry.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Applies `entry` to `project` and records it. A failed apply leaves
    /// the history untouched.
    pub fn add_entry(&mut self, mut entry: HistoryEntry, project: &mut Project) -> OperationResult<()> {
        entry.apply(project)?;
        self.next_id = self.next_id.max(entry.id + 1);
        self.redo_stack.clear();
        push_bounded(&mut self.undo_stack, entry, self.config.max_entries, "undo");
        Ok(())
    }

    /// Reverts the newest entry and returns its id.
    pub fn undo(&mut self, project: &mut Project) -> OperationResult<u64> {
        let mut entry = self.undo_stack.pop_back().ok_or(OperationError::NothingToUndo)?;
        if let Err(e) = entry.revert(project) {
            self.undo_stack.push_back(entry);
            return Err(e);
        }
        let id = entry.id;
        push_bounded(&mut self.redo_stack, entry, self.config.max_redo_entries, "redo");
        Ok(id)
    }

    /// Re-applies the most recently undone entry and returns its id.
    pub fn redo(&mut self, project: &mut Project) -> OperationResult<u64> {
        let mut entry = self.redo_stack.pop_back().ok_or(OperationError::NothingToRedo)?;
        if let Err(e) = entry.apply(project) {
            self.redo_stack.push_back(entry);
            return Err(e);
        }
        let id = entry.id;
        push_bounded(&mut self.undo_stack, entry, self.config.max_entries, "undo");
        Ok(id)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|e| e.description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|e| e.description.as_str())
    }

    /// Applied entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.undo_stack.iter()
    }

    /// Undone entries, next to redo first.
    pub fn future_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.redo_stack.iter().rev()
    }

    pub fn stack_sizes(&self) -> (usize, usize) {
        (self.undo_stack.len(), self.redo_stack.len())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

fn push_bounded(stack: &mut VecDeque<HistoryEntry>, entry: HistoryEntry, max: usize, side: &str) {
    while stack.len() >= max.max(1) {
        if let Some(evicted) = stack.pop_front() {
            log::warn!("{} history full, dropping entry {} ({})", side, evicted.id, evicted.description);
        }
    }
    stack.push_back(entry);
}
