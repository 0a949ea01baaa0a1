//! CreateTask command

use super::{is_blank, AbandonReason, Execute, MutationOutcome};
use crate::context::BoardContext;
use crate::error::Result;
use crate::types::{ColumnKey, Position, TaskDocument, TaskId};
use async_trait::async_trait;
use tracing::{debug, info};

/// Add a new task to the board
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// The task title (required, non-blank)
    pub title: String,
    /// Target column; the configured default when unset
    pub column: Option<ColumnKey>,
    /// Highest position already in the target column, if known
    pub after: Option<Position>,
}

impl CreateTask {
    /// Create a new CreateTask command with just a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            column: None,
            after: None,
        }
    }

    /// Set the column
    pub fn in_column(mut self, column: ColumnKey) -> Self {
        self.column = Some(column);
        self
    }

    /// Make sure the new task ranks after `position`
    pub fn after(mut self, position: Option<Position>) -> Self {
        self.after = position;
        self
    }
}

#[async_trait]
impl Execute for CreateTask {
    type Output = TaskId;

    async fn execute(&self, ctx: &BoardContext) -> Result<MutationOutcome<TaskId>> {
        if is_blank(&self.title) {
            debug!("create abandoned: blank title");
            return Ok(MutationOutcome::Abandoned(AbandonReason::EmptyTitle));
        }

        let column = self.column.unwrap_or(ctx.config().default_column);
        let position = ctx.allocator().allocate_after(self.after);
        let doc = TaskDocument::new(self.title.clone(), column, position);

        let id = ctx.store().create(doc).await?;
        info!(task_id = %id, %column, %position, "task created");
        Ok(MutationOutcome::Submitted(id))
    }
}
