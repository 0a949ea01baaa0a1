//! MoveTask command

use super::{Execute, MutationOutcome};
use crate::context::BoardContext;
use crate::drag::Mutation;
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Move a task to a different column or position
#[derive(Debug, Clone)]
pub struct MoveTask {
    /// Resolved column/position change
    pub mutation: Mutation,
}

impl MoveTask {
    /// Create a new MoveTask command from a resolved drag
    pub fn new(mutation: Mutation) -> Self {
        Self { mutation }
    }
}

impl From<Mutation> for MoveTask {
    fn from(mutation: Mutation) -> Self {
        Self::new(mutation)
    }
}

#[async_trait]
impl Execute for MoveTask {
    type Output = ();

    async fn execute(&self, ctx: &BoardContext) -> Result<MutationOutcome<()>> {
        let m = &self.mutation;
        ctx.store().update(&m.task_id, m.to_patch()).await?;
        info!(
            task_id = %m.task_id,
            column = %m.new_column,
            position = %m.new_position,
            "task moved"
        );
        Ok(MutationOutcome::Submitted(()))
    }
}
