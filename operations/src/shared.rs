//! FILENAME: operations/src/shared.rs
//! PURPOSE: A project and its history behind one lock.
//! CONTEXT: One writer or many readers. Computing a change, applying it
//! and recording it happen under a single write guard, so no reader
//! observes a half-applied operation.

use crate::config::EngineConfig;
use crate::error::{OperationError, OperationResult};
use crate::history::History;
use crate::operation::Operation;
use model::Project;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct ProjectState {
    project: Project,
    history: History,
}

#[derive(Debug)]
pub struct SharedProject {
    state: RwLock<ProjectState>,
}

impl SharedProject {
    pub fn new(project: Project, config: &EngineConfig) -> Self {
        SharedProject {
            state: RwLock::new(ProjectState {
                project,
                history: History::with_config(config.history.clone()),
            }),
        }
    }

    fn read_state(&self) -> OperationResult<RwLockReadGuard<'_, ProjectState>> {
        self.state.read().map_err(|_| OperationError::Poisoned)
    }

    fn write_state(&self) -> OperationResult<RwLockWriteGuard<'_, ProjectState>> {
        self.state.write().map_err(|_| OperationError::Poisoned)
    }

    /// Runs `f` against the current project.
    pub fn read<R>(&self, f: impl FnOnce(&Project) -> R) -> OperationResult<R> {
        let state = self.read_state()?;
        Ok(f(&state.project))
    }

    pub fn with_history<R>(&self, f: impl FnOnce(&History) -> R) -> OperationResult<R> {
        let state = self.read_state()?;
        Ok(f(&state.history))
    }

    /// Validates, executes and records `operation`. Returns the new
    /// entry's id. On failure the project is unchanged.
    pub fn apply_operation(&self, operation: &Operation) -> OperationResult<u64> {
        operation.validate()?;
        let mut guard = self.write_state()?;
        let state = &mut *guard;
        let id = state.history.next_id();
        let entry = operation.create_history_entry(&state.project, id)?;
        let description = entry.description.clone();
        state.history.add_entry(entry, &mut state.project)?;
        log::info!("project {}: applied #{} {}", state.project.id, id, description);
        Ok(id)
    }

    pub fn undo(&self) -> OperationResult<u64> {
        let mut guard = self.write_state()?;
        let state = &mut *guard;
        let id = state.history.undo(&mut state.project)?;
        log::info!("project {}: undid #{}", state.project.id, id);
        Ok(id)
    }

    pub fn redo(&self) -> OperationResult<u64> {
        let mut guard = self.write_state()?;
        let state = &mut *guard;
        let id = state.history.redo(&mut state.project)?;
        log::info!("project {}: redid #{}", state.project.id, id);
        Ok(id)
    }

    /// Releases the project, dropping the history.
    pub fn into_project(self) -> OperationResult<Project> {
        self.state
            .into_inner()
            .map(|state| state.project)
            .map_err(|_| OperationError::Poisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_removal::ColumnRemovalOperation;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn concurrent_operations_are_serialized() {
        let project = Project::with_columns(1, &["a", "b", "c", "d"]).unwrap();
        let shared = Arc::new(SharedProject::new(project, &EngineConfig::default()));

        let handles: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let op = Operation::ColumnRemoval(ColumnRemovalOperation::new(name));
                    shared.apply_operation(&op).unwrap()
                })
            })
            .collect();
        let mut ids: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(
            shared.read(|p| p.column_model.column_names()).unwrap(),
            vec!["d".to_string()]
        );
    }

    #[test]
    fn failed_operations_leave_no_entry() {
        let project = Project::with_columns(1, &["a"]).unwrap();
        let shared = SharedProject::new(project, &EngineConfig::default());
        let op = Operation::ColumnRemoval(ColumnRemovalOperation::new("missing"));
        assert!(shared.apply_operation(&op).is_err());
        assert_eq!(shared.with_history(|h| h.stack_sizes()).unwrap(), (0, 0));
        assert!(matches!(shared.undo(), Err(OperationError::NothingToUndo)));
    }
}
