//! In-memory task store with live snapshot fan-out

use super::{Snapshot, Subscription, SubscriptionHandle, TaskStore};
use crate::error::{BoardError, Result};
use crate::types::{Task, TaskDocument, TaskId, TaskPatch};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, trace};

struct Subscriber {
    handle: SubscriptionHandle,
    sender: mpsc::UnboundedSender<Snapshot>,
}

#[derive(Default)]
struct StoreState {
    docs: IndexMap<TaskId, TaskDocument>,
    subscribers: Vec<Subscriber>,
}

impl StoreState {
    fn snapshot(&self) -> Snapshot {
        self.docs
            .iter()
            .map(|(id, doc)| Task::from_document(id.clone(), doc.clone()))
            .collect()
    }

    /// Push the current state to every live subscriber, dropping dead ones
    fn broadcast(&mut self) {
        let snapshot = self.snapshot();
        self.subscribers.retain(|sub| {
            !sub.handle.is_cancelled() && sub.sender.send(snapshot.clone()).is_ok()
        });
        trace!(
            tasks = snapshot.len(),
            subscribers = self.subscribers.len(),
            "snapshot broadcast"
        );
    }
}

/// Task store that keeps everything in process memory.
///
/// Behaves like a remote multi-writer store from the board's point of view:
/// ids are minted here, every change is pushed as a full snapshot to every
/// subscriber, and availability can be switched off to exercise failure paths.
#[derive(Default)]
pub struct InMemoryTaskStore {
    state: Mutex<StoreState>,
    unavailable: AtomicBool,
}

impl InMemoryTaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with tasks (ids are kept as given)
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let docs = tasks
            .into_iter()
            .map(|task| (task.id.clone(), task.to_document()))
            .collect();
        Self {
            state: Mutex::new(StoreState {
                docs,
                subscribers: Vec::new(),
            }),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Simulate the backend going down (`false`) or coming back (`true`)
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Current contents, in insertion order
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.snapshot()
    }

    /// Number of live subscriptions
    pub async fn subscriber_count(&self) -> usize {
        let mut state = self.state.lock().await;
        state.subscribers.retain(|sub| !sub.handle.is_cancelled());
        state.subscribers.len()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BoardError::unavailable("in-memory store switched off"));
        }
        Ok(())
    }
}

fn validate(doc: &TaskDocument) -> Result<()> {
    if doc.title.trim().is_empty() {
        return Err(BoardError::validation("title", "must not be empty"));
    }
    if doc.column.key().is_none() {
        return Err(BoardError::validation(
            "column",
            format!("'{}' is not a board column", doc.column),
        ));
    }
    if !doc.position.is_finite() {
        return Err(BoardError::validation(
            "position",
            "must be a finite number",
        ));
    }
    Ok(())
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, doc: TaskDocument) -> Result<TaskId> {
        self.ensure_available()?;
        validate(&doc)?;

        let id = TaskId::new();
        let mut state = self.state.lock().await;
        state.docs.insert(id.clone(), doc);
        debug!(task_id = %id, "task created");
        state.broadcast();
        Ok(id)
    }

    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<()> {
        self.ensure_available()?;

        let mut state = self.state.lock().await;
        let current = state
            .docs
            .get(id)
            .ok_or_else(|| BoardError::not_found(id.as_str()))?;

        let mut updated = current.clone();
        updated.apply(&patch);
        validate(&updated)?;

        state.docs.insert(id.clone(), updated);
        debug!(task_id = %id, "task updated");
        state.broadcast();
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        self.ensure_available()?;

        let mut state = self.state.lock().await;
        if state.docs.shift_remove(id).is_none() {
            return Err(BoardError::not_found(id.as_str()));
        }
        debug!(task_id = %id, "task deleted");
        state.broadcast();
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription> {
        self.ensure_available()?;

        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = SubscriptionHandle::new();

        let mut state = self.state.lock().await;
        // Receiver is alive, so the initial send cannot fail
        let _ = sender.send(state.snapshot());
        state.subscribers.push(Subscriber {
            handle: handle.clone(),
            sender,
        });
        debug!(subscribers = state.subscribers.len(), "subscriber added");

        Ok(Subscription::new(receiver, handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Pending;
    use crate::types::{ColumnKey, Position};

    fn doc(title: &str) -> TaskDocument {
        TaskDocument::new(title, ColumnKey::Todo, Position::new(1.0))
    }

    #[tokio::test]
    async fn test_subscribe_delivers_current_state_immediately() {
        let store = InMemoryTaskStore::with_tasks(vec![Task::new("a", "A", ColumnKey::Todo, 1.0)]);
        let mut sub = store.subscribe().await.unwrap();

        let snapshot = sub.next().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id.as_str(), "a");
    }

    #[tokio::test]
    async fn test_every_change_is_pushed() {
        let store = InMemoryTaskStore::new();
        let mut sub = store.subscribe().await.unwrap();
        assert!(sub.next().await.unwrap().is_empty());

        let id = store.create(doc("First")).await.unwrap();
        assert_eq!(sub.next().await.unwrap().len(), 1);

        store
            .update(&id, TaskPatch::new().with_title("Renamed"))
            .await
            .unwrap();
        assert_eq!(sub.next().await.unwrap()[0].title, "Renamed");

        store.delete(&id).await.unwrap();
        assert!(sub.next().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_validates_fields() {
        let store = InMemoryTaskStore::new();

        let err = store.create(doc("   ")).await.unwrap_err();
        assert!(
            matches!(err, BoardError::ValidationFailed { ref field, .. } if field == "title")
        );

        let bad_column = TaskDocument::new("x", "archive", Position::new(1.0));
        let err = store.create(bad_column).await.unwrap_err();
        assert!(
            matches!(err, BoardError::ValidationFailed { ref field, .. } if field == "column")
        );

        let bad_position = TaskDocument::new("x", ColumnKey::Todo, Position::new(f64::NAN));
        let err = store.create(bad_position).await.unwrap_err();
        assert!(
            matches!(err, BoardError::ValidationFailed { ref field, .. } if field == "position")
        );

        assert!(store.tasks().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_task() {
        let store = InMemoryTaskStore::new();
        let missing = TaskId::from("gone");

        let err = store
            .update(&missing, TaskPatch::new().with_title("x"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = store.delete(&missing).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_everything() {
        let store = InMemoryTaskStore::new();
        store.set_available(false);

        assert!(store.create(doc("x")).await.unwrap_err().is_retryable());
        assert!(store.subscribe().await.unwrap_err().is_retryable());

        store.set_available(true);
        assert!(store.create(doc("x")).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_subscribers_are_pruned() {
        let store = InMemoryTaskStore::new();
        let mut first = store.subscribe().await.unwrap();
        let second = store.subscribe().await.unwrap();
        assert_eq!(store.subscriber_count().await, 2);

        first.cancel();
        assert_eq!(store.subscriber_count().await, 1);

        drop(second);
        store.create(doc("after")).await.unwrap();
        assert_eq!(store.subscriber_count().await, 0);
        assert_eq!(first.try_next(), Pending::Closed);
    }

    #[tokio::test]
    async fn test_created_ids_are_unique() {
        let store = InMemoryTaskStore::new();
        let a = store.create(doc("a")).await.unwrap();
        let b = store.create(doc("b")).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.tasks().await.len(), 2);
    }
}
