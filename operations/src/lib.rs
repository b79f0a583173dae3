//! FILENAME: operations/src/lib.rs
//! PURPOSE: Library root for table operations and history.
//! CONTEXT: Operations are tagged JSON records that validate, report the
//! columns they touch and compute a reversible change against a project.
//! Changes are recorded in a bounded undo/redo history; `SharedProject`
//! serializes access for concurrent callers.

pub mod change;
pub mod column_removal;
pub mod column_rename;
pub mod config;
pub mod error;
pub mod history;
pub mod key_value_columnize;
pub mod operation;
pub mod registry;
pub mod shared;

pub use change::{Change, MassRowColumnChange};
pub use column_removal::ColumnRemovalOperation;
pub use column_rename::ColumnRenameOperation;
pub use config::{EngineConfig, HistoryConfig, MAX_HISTORY_SIZE};
pub use error::{OperationError, OperationResult};
pub use history::{History, HistoryEntry};
pub use key_value_columnize::KeyValueColumnizeOperation;
pub use operation::{ColumnsDiff, Operation};
pub use registry::{registry, OperationConstructor, OperationRegistry};
pub use shared::SharedProject;
