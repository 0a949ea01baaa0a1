//! RenameTask command

use super::{is_blank, AbandonReason, Execute, MutationOutcome};
use crate::context::BoardContext;
use crate::error::Result;
use crate::types::{TaskId, TaskPatch};
use async_trait::async_trait;
use tracing::{debug, info};

/// Change a task's title
#[derive(Debug, Clone)]
pub struct RenameTask {
    /// The task ID to rename
    pub id: TaskId,
    /// New title
    pub title: String,
    /// Title currently shown, used to skip no-op renames
    pub current_title: Option<String>,
}

impl RenameTask {
    /// Create a new RenameTask command
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            current_title: None,
        }
    }

    /// Set the title currently shown
    pub fn with_current_title(mut self, title: impl Into<String>) -> Self {
        self.current_title = Some(title.into());
        self
    }
}

#[async_trait]
impl Execute for RenameTask {
    type Output = ();

    async fn execute(&self, ctx: &BoardContext) -> Result<MutationOutcome<()>> {
        if is_blank(&self.title) {
            debug!(task_id = %self.id, "rename abandoned: blank title");
            return Ok(MutationOutcome::Abandoned(AbandonReason::EmptyTitle));
        }
        if self.current_title.as_deref() == Some(self.title.as_str()) {
            debug!(task_id = %self.id, "rename abandoned: title unchanged");
            return Ok(MutationOutcome::Abandoned(AbandonReason::Unchanged));
        }

        ctx.store()
            .update(&self.id, TaskPatch::new().with_title(self.title.clone()))
            .await?;
        info!(task_id = %self.id, "task renamed");
        Ok(MutationOutcome::Submitted(()))
    }
}
