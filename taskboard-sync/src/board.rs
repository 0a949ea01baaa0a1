//! TaskBoard - one live board view
//!
//! Ties the pieces together for a view: the reconciler owns the task set, the
//! projector derives columns from it for rendering, the resolver turns drops
//! into mutations, and the commands submit them. All methods run on the
//! view's single event loop; mutation methods take `&self` and never touch
//! local state, which only changes when a snapshot is applied.

use crate::context::BoardContext;
use crate::drag::{DragEvent, DragResolver, Mutation};
use crate::error::Result;
use crate::projector::{project, BoardProjection};
use crate::reconciler::{SyncReconciler, SyncState, TaskSet};
use crate::task::{
    AbandonReason, Confirmation, CreateTask, DeleteTask, Execute, MoveTask, MutationOutcome,
    RenameTask, UserReply,
};
use crate::types::{ColumnKey, Task, TaskId};
use tracing::debug;

/// A board view bound to a task store
pub struct TaskBoard {
    ctx: BoardContext,
    reconciler: SyncReconciler,
    resolver: DragResolver,
}

impl TaskBoard {
    /// Create a closed board over a context
    pub fn new(ctx: BoardContext) -> Self {
        let reconciler = SyncReconciler::new(ctx.store_handle());
        let resolver = DragResolver::new(ctx.allocator_handle(), ctx.config().drop_placement);
        Self {
            ctx,
            reconciler,
            resolver,
        }
    }

    /// The context commands run against. Clone it to submit from a spawned task.
    pub fn context(&self) -> &BoardContext {
        &self.ctx
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start listening to the store
    pub async fn open(&mut self) -> Result<()> {
        self.reconciler.subscribe().await
    }

    /// Stop listening and clear local tasks. Safe to call more than once.
    pub fn close(&mut self) {
        self.reconciler.unsubscribe();
    }

    /// Current subscription state
    pub fn state(&self) -> SyncState {
        self.reconciler.state()
    }

    /// Wait for and apply the next snapshot; `false` when closed
    pub async fn sync_next(&mut self) -> bool {
        self.reconciler.next_snapshot().await
    }

    /// Apply every queued snapshot without waiting
    pub fn sync_pending(&mut self) -> usize {
        self.reconciler.drain_pending()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The local task set (the latest snapshot)
    pub fn tasks(&self) -> &TaskSet {
        self.reconciler.current_tasks()
    }

    /// All columns, ordered, for rendering
    pub fn projection(&self) -> BoardProjection {
        BoardProjection::build(self.tasks())
    }

    /// One column, ordered
    pub fn column(&self, key: ColumnKey) -> Vec<Task> {
        project(self.tasks(), key)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a task from the user's reply to the "new task" prompt
    pub async fn create_task(&self, reply: UserReply<String>) -> Result<MutationOutcome<TaskId>> {
        let UserReply::Provided(title) = reply else {
            debug!("create cancelled");
            return Ok(MutationOutcome::Abandoned(AbandonReason::Cancelled));
        };

        let column = self.ctx.config().default_column;
        let last = self.projection().max_position(column);
        CreateTask::new(title)
            .in_column(column)
            .after(last)
            .execute(&self.ctx)
            .await
    }

    /// Rename a task from the user's reply to the "update title" prompt
    pub async fn rename_task(
        &self,
        id: &TaskId,
        reply: UserReply<String>,
    ) -> Result<MutationOutcome> {
        let UserReply::Provided(title) = reply else {
            debug!(task_id = %id, "rename cancelled");
            return Ok(MutationOutcome::Abandoned(AbandonReason::Cancelled));
        };

        let mut command = RenameTask::new(id.clone(), title);
        if let Some(task) = self.tasks().get(id) {
            command = command.with_current_title(task.title.clone());
        }
        command.execute(&self.ctx).await
    }

    /// Delete a task once the user has confirmed
    pub async fn delete_task(
        &self,
        id: &TaskId,
        confirmation: Confirmation,
    ) -> Result<MutationOutcome> {
        if confirmation == Confirmation::Declined {
            debug!(task_id = %id, "delete declined");
            return Ok(MutationOutcome::Abandoned(AbandonReason::Declined));
        }
        DeleteTask::new(id.clone()).execute(&self.ctx).await
    }

    /// Resolve a finished drag against the current columns without submitting
    pub fn resolve_drop(&self, event: &DragEvent) -> std::result::Result<Mutation, AbandonReason> {
        self.resolver.outcome(event, &self.projection())
    }

    /// Resolve a finished drag and submit the move it implies
    pub async fn drop_task(&self, event: &DragEvent) -> Result<MutationOutcome> {
        match self.resolve_drop(event) {
            Ok(mutation) => MoveTask::new(mutation).execute(&self.ctx).await,
            Err(reason) => Ok(MutationOutcome::Abandoned(reason)),
        }
    }
}
