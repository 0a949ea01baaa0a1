//! Core types for the board engine

mod column;
mod ids;
mod position;
mod task;

// Re-export all types
pub use column::{ColumnId, ColumnKey};
pub use ids::TaskId;
pub use position::Position;
pub use task::{Task, TaskDocument, TaskPatch};
