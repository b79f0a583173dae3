//! FILENAME: model/src/lib.rs
//! PURPOSE: Main library entry point for the table model.
//! CONTEXT: Re-exports the cell/row/column/project types and the runtime
//! values the expression crate evaluates to.

pub mod cell;
pub mod column;
pub mod error;
pub mod fields;
pub mod pool;
pub mod project;
pub mod recon;
pub mod row;
pub mod value;

// Re-export commonly used types at the crate root
pub use cell::{Cell, CellRecord};
pub use column::{unduplicated_name, Column, ColumnModel};
pub use error::{ModelError, ModelResult};
pub use fields::{CellsView, EvalResult, FieldBearing, RowView};
pub use pool::Pool;
pub use project::Project;
pub use recon::{Judgment, Recon, ReconCandidate};
pub use row::Row;
pub use value::{EvalError, Value};
