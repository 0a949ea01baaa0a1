//! Sync reconciliation: the locally held task set, kept equal to the most
//! recent remote snapshot.
//!
//! Remote is always authoritative. Each snapshot replaces the local set
//! wholesale; nothing local survives it, so there is nothing to merge and no
//! optimistic state to roll back. Between submitting a mutation and the next
//! snapshot the board simply shows the previous state.

use crate::error::Result;
use crate::store::{Pending, Snapshot, Subscription, SubscriptionHandle, TaskStore};
use crate::types::{Task, TaskId};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The local task collection, keyed by id, in snapshot order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSet {
    tasks: IndexMap<TaskId, Task>,
}

impl TaskSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a snapshot. A repeated id keeps its last occurrence.
    pub fn from_snapshot(snapshot: impl IntoIterator<Item = Task>) -> Self {
        let mut tasks = IndexMap::new();
        for task in snapshot {
            let id = task.id.clone();
            if tasks.insert(id.clone(), task).is_some() {
                warn!(task_id = %id, "duplicate task id in snapshot, keeping the later entry");
            }
        }
        Self { tasks }
    }

    /// Look up a task
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Whether a task is present
    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Tasks in snapshot order
    pub fn iter(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.values()
    }

    /// Number of tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Copy the tasks out in snapshot order
    pub fn to_vec(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = indexmap::map::Values<'a, TaskId, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.values()
    }
}

/// Subscription lifecycle of a reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No listener. The task set is empty unless a snapshot is applied by
    /// hand with [`SyncReconciler::apply_remote_snapshot`], which replaces it
    /// in any state.
    Unsubscribed,
    /// Listener active; the task set mirrors the latest snapshot
    Subscribed,
}

/// Owns the local task set and the store subscription that feeds it.
///
/// Dropping the reconciler drops its subscription, which stops delivery.
pub struct SyncReconciler {
    store: Arc<dyn TaskStore>,
    subscription: Option<Subscription>,
    tasks: TaskSet,
    applied: u64,
}

impl SyncReconciler {
    /// Create an unsubscribed reconciler over a store
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            subscription: None,
            tasks: TaskSet::new(),
            applied: 0,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SyncState {
        if self.subscription.is_some() {
            SyncState::Subscribed
        } else {
            SyncState::Unsubscribed
        }
    }

    /// Whether a listener is active
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Handle that cancels the active subscription, if any
    pub fn subscription_handle(&self) -> Option<SubscriptionHandle> {
        self.subscription.as_ref().map(|s| s.handle().clone())
    }

    /// Number of snapshots applied since creation
    pub fn snapshots_applied(&self) -> u64 {
        self.applied
    }

    /// Open the store subscription.
    ///
    /// Does nothing when already subscribed. On failure the reconciler stays
    /// unsubscribed and the error goes to the caller.
    pub async fn subscribe(&mut self) -> Result<()> {
        if self.subscription.is_some() {
            debug!("already subscribed");
            return Ok(());
        }

        match self.store.subscribe().await {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                info!("subscribed to task store");
                Ok(())
            }
            Err(error) => {
                warn!(%error, "subscribe failed");
                Err(error)
            }
        }
    }

    /// Close the store subscription and forget local tasks. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
            self.tasks = TaskSet::new();
            info!("unsubscribed from task store");
        }
    }

    /// Replace the local set with a snapshot.
    ///
    /// Accepted in any state; the next `unsubscribe` or closed feed clears it
    /// again.
    pub fn apply_remote_snapshot(&mut self, snapshot: Snapshot) {
        self.tasks = TaskSet::from_snapshot(snapshot);
        self.applied += 1;
        debug!(
            tasks = self.tasks.len(),
            applied = self.applied,
            "remote snapshot applied"
        );
    }

    /// The present local set
    pub fn current_tasks(&self) -> &TaskSet {
        &self.tasks
    }

    /// Wait for the next snapshot and apply it.
    ///
    /// Returns `false` without waiting when unsubscribed. If the store closes
    /// the feed the reconciler drops back to unsubscribed and returns `false`.
    pub async fn next_snapshot(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };

        let next = subscription.next().await;
        match next {
            Some(snapshot) => {
                self.apply_remote_snapshot(snapshot);
                true
            }
            None => {
                warn!("snapshot feed closed by store");
                self.unsubscribe();
                false
            }
        }
    }

    /// Apply every snapshot already queued, without waiting. Returns how many
    /// were applied.
    pub fn drain_pending(&mut self) -> usize {
        let mut count = 0;
        loop {
            let Some(subscription) = self.subscription.as_mut() else {
                return count;
            };
            match subscription.try_next() {
                Pending::Snapshot(snapshot) => {
                    self.apply_remote_snapshot(snapshot);
                    count += 1;
                }
                Pending::Empty => return count,
                Pending::Closed => {
                    warn!("snapshot feed closed by store");
                    self.unsubscribe();
                    return count;
                }
            }
        }
    }
}
