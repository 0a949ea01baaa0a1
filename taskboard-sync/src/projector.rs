//! Column projection: flat task set -> ordered per-column sequences.
//!
//! Ordering within a column is ascending `position`, ties broken by `id`, so
//! repeated renders of the same set always agree. Tasks whose column is not
//! part of the board are left out of every column.

use crate::types::{ColumnKey, Position, Task};
use std::cmp::Ordering;
use tracing::debug;

/// Order two tasks of the same column
fn column_order(a: &Task, b: &Task) -> Ordering {
    a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id))
}

/// Ordered tasks of one column.
///
/// Pure: the input is only read. For rendering all columns at once prefer
/// [`BoardProjection::build`], which sorts once instead of once per column.
pub fn project<'a>(tasks: impl IntoIterator<Item = &'a Task>, key: ColumnKey) -> Vec<Task> {
    let mut column: Vec<Task> = tasks
        .into_iter()
        .filter(|t| t.column == key)
        .cloned()
        .collect();
    column.sort_by(column_order);
    column
}

/// Every column of the board, ordered, from a single pass over the task set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardProjection {
    columns: [Vec<Task>; 3],
    excluded: usize,
}

impl BoardProjection {
    /// Bucket and sort the task set
    pub fn build<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut projection = Self::default();

        for task in tasks {
            match task.column_key() {
                Some(key) => projection.columns[key.index()].push(task.clone()),
                None => {
                    debug!(
                        task_id = %task.id,
                        column = %task.column,
                        "task in unknown column left out of projection"
                    );
                    projection.excluded += 1;
                }
            }
        }

        for column in projection.columns.iter_mut() {
            column.sort_by(column_order);
        }
        projection
    }

    /// Ordered tasks of one column
    pub fn column(&self, key: ColumnKey) -> &[Task] {
        &self.columns[key.index()]
    }

    /// All columns in render order
    pub fn columns(&self) -> impl Iterator<Item = (ColumnKey, &[Task])> + '_ {
        ColumnKey::ALL
            .into_iter()
            .map(move |key| (key, self.column(key)))
    }

    /// Highest position in a column, `None` when empty
    pub fn max_position(&self, key: ColumnKey) -> Option<Position> {
        // NaN and infinities sort to the ends, so the last finite entry is the max
        self.column(key)
            .iter()
            .rev()
            .map(|t| t.position)
            .find(|p| p.is_finite())
    }

    /// Number of tasks left out because their column is not on the board
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// Number of tasks shown across all columns
    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Whether no task is shown
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
