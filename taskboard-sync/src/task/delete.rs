//! DeleteTask command

use super::{Execute, MutationOutcome};
use crate::context::BoardContext;
use crate::error::Result;
use crate::types::TaskId;
use async_trait::async_trait;
use tracing::{debug, info};

/// Remove a task from the board
#[derive(Debug, Clone)]
pub struct DeleteTask {
    /// The task ID to delete
    pub id: TaskId,
}

impl DeleteTask {
    /// Create a new DeleteTask command
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute for DeleteTask {
    type Output = ();

    /// Deleting a task that is already gone counts as success; another client
    /// got there first and the next snapshot will agree.
    async fn execute(&self, ctx: &BoardContext) -> Result<MutationOutcome<()>> {
        match ctx.store().delete(&self.id).await {
            Ok(()) => {
                info!(task_id = %self.id, "task deleted");
                Ok(MutationOutcome::Submitted(()))
            }
            Err(error) if error.is_not_found() => {
                debug!(task_id = %self.id, "task already deleted");
                Ok(MutationOutcome::Submitted(()))
            }
            Err(error) => Err(error),
        }
    }
}
