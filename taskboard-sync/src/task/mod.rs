//! Task commands
//!
//! One command per user mutation. Each is an explicit async operation that
//! either reaches the store or reports why it did not; the store's answer is
//! returned as-is, with no retry.

mod create;
mod delete;
mod mv;
mod outcome;
mod rename;

pub use create::CreateTask;
pub use delete::DeleteTask;
pub use mv::MoveTask;
pub use outcome::{AbandonReason, Confirmation, MutationOutcome, UserReply};
pub use rename::RenameTask;

use crate::context::BoardContext;
use crate::error::Result;
use async_trait::async_trait;

/// A mutation that can be submitted to the task store
#[async_trait]
pub trait Execute: Send + Sync {
    /// What a submitted mutation yields
    type Output: Send;

    /// Validate, then submit through the context's store
    async fn execute(&self, ctx: &BoardContext) -> Result<MutationOutcome<Self::Output>>;
}

/// Title check shared by create and rename
pub(crate) fn is_blank(title: &str) -> bool {
    title.trim().is_empty()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::allocator::{ManualClock, PositionAllocator};
    use crate::context::BoardContext;
    use crate::store::InMemoryTaskStore;
    use crate::types::Task;
    use std::sync::Arc;

    /// Context over an in-memory store with a clock frozen at 1000ms
    pub fn setup(tasks: Vec<Task>) -> (Arc<InMemoryTaskStore>, BoardContext) {
        let store = Arc::new(InMemoryTaskStore::with_tasks(tasks));
        let allocator = PositionAllocator::with_clock(Arc::new(ManualClock::new(1_000)));
        let ctx = BoardContext::new(store.clone()).with_allocator(allocator);
        (store, ctx)
    }
}
