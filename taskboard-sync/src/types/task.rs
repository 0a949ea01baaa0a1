//! Task types: Task, TaskDocument, TaskPatch

use super::column::{ColumnId, ColumnKey};
use super::ids::TaskId;
use super::position::Position;
use serde::{Deserialize, Serialize};

/// A task/card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Raw column value; may be unrecognized when written by another client
    pub column: ColumnId,
    pub position: Position,
}

impl Task {
    /// Create a task in a recognized column
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        column: ColumnKey,
        position: impl Into<Position>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            column: column.into(),
            position: position.into(),
        }
    }

    /// Re-derive a task from a stored document and the id it is filed under
    pub fn from_document(id: TaskId, doc: TaskDocument) -> Self {
        Self {
            id,
            title: doc.title,
            column: doc.column,
            position: doc.position,
        }
    }

    /// The stored document body for this task (everything but the id)
    pub fn to_document(&self) -> TaskDocument {
        TaskDocument {
            title: self.title.clone(),
            column: self.column.clone(),
            position: self.position,
        }
    }

    /// The recognized column this task sits in, if any
    pub fn column_key(&self) -> Option<ColumnKey> {
        self.column.key()
    }
}

/// Stored body of a task, keyed externally by its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    pub title: String,
    pub column: ColumnId,
    pub position: Position,
}

impl TaskDocument {
    /// Create a document for a new task
    pub fn new(title: impl Into<String>, column: impl Into<ColumnId>, position: Position) -> Self {
        Self {
            title: title.into(),
            column: column.into(),
            position,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(column) = &patch.column {
            self.column = column.clone();
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
    }
}

/// Partial update of a task (None = don't change)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<ColumnId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl TaskPatch {
    /// Empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the column
    pub fn with_column(mut self, column: impl Into<ColumnId>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Set the position
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}
