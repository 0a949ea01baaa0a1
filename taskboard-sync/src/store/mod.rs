//! Task store seam: durable storage plus live change notifications.
//!
//! The board core never talks to a concrete database. It submits mutations
//! through [`TaskStore`] and learns about their effects only through the
//! snapshots a [`Subscription`] delivers.

mod memory;

pub use memory::InMemoryTaskStore;

use crate::error::Result;
use crate::types::{Task, TaskDocument, TaskId, TaskPatch};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A complete point-in-time view of all tasks
pub type Snapshot = Vec<Task>;

/// Storage abstraction for tasks
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create a task and return the id the store minted for it.
    ///
    /// Fails with `ValidationFailed` for malformed fields or
    /// `StoreUnavailable` on transport failure.
    async fn create(&self, doc: TaskDocument) -> Result<TaskId>;

    /// Apply a partial update. Fails with `NotFound` if the id is gone.
    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<()>;

    /// Remove a task. Fails with `NotFound` if the id is already gone.
    async fn delete(&self, id: &TaskId) -> Result<()>;

    /// Open a live feed of snapshots.
    ///
    /// The current state is delivered immediately, then again after every
    /// change, until the returned subscription is cancelled or dropped.
    async fn subscribe(&self) -> Result<Subscription>;
}

/// Cancels a subscription. Cloneable; cancelling more than once is harmless.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionHandle {
    token: CancellationToken,
}

impl SubscriptionHandle {
    /// Create a fresh, live handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop further snapshot delivery
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether [`cancel`](Self::cancel) has been called
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the handle is cancelled
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

/// Result of polling a subscription without waiting
#[derive(Debug, PartialEq)]
pub enum Pending {
    /// A queued snapshot
    Snapshot(Snapshot),
    /// Nothing queued right now
    Empty,
    /// Cancelled, or closed by the store
    Closed,
}

/// Live snapshot feed returned by [`TaskStore::subscribe`]
#[derive(Debug)]
pub struct Subscription {
    snapshots: mpsc::UnboundedReceiver<Snapshot>,
    handle: SubscriptionHandle,
}

impl Subscription {
    /// Pair a snapshot receiver with the handle that stops it
    pub fn new(snapshots: mpsc::UnboundedReceiver<Snapshot>, handle: SubscriptionHandle) -> Self {
        Self { snapshots, handle }
    }

    /// The handle that stops this feed
    pub fn handle(&self) -> &SubscriptionHandle {
        &self.handle
    }

    /// Wait for the next snapshot. `None` once cancelled or closed by the store.
    pub async fn next(&mut self) -> Option<Snapshot> {
        if self.handle.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.handle.cancelled() => None,
            snapshot = self.snapshots.recv() => snapshot,
        }
    }

    /// Next snapshot if one is already queued, without waiting
    pub fn try_next(&mut self) -> Pending {
        if self.handle.is_cancelled() {
            return Pending::Closed;
        }
        match self.snapshots.try_recv() {
            Ok(snapshot) => Pending::Snapshot(snapshot),
            Err(mpsc::error::TryRecvError::Empty) => Pending::Empty,
            Err(mpsc::error::TryRecvError::Disconnected) => Pending::Closed,
        }
    }

    /// Stop the feed. Idempotent.
    pub fn cancel(&mut self) {
        self.handle.cancel();
        self.snapshots.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}
