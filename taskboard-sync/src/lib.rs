//! Board synchronization and reordering engine for real-time task boards
//!
//! A flat set of tasks lives in a remote multi-writer store that pushes a full
//! snapshot to every connected client on each change. This crate is the part
//! of a board client with real invariants:
//!
//! - **Position allocation** - [`PositionAllocator`] hands out strictly
//!   increasing ranks without consulting the store
//! - **Column projection** - [`project`] / [`BoardProjection`] turn the flat set
//!   into ordered per-column sequences (position, then id)
//! - **Drag resolution** - [`DragResolver`] turns a finished drag into at most
//!   one [`Mutation`]
//! - **Sync reconciliation** - [`SyncReconciler`] keeps the local set equal to
//!   the latest snapshot, with an explicit subscribe/unsubscribe lifecycle
//!
//! Rendering, prompts and the concrete database sit behind the [`TaskStore`]
//! trait and the [`UserReply`]/[`Confirmation`] inputs.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskboard_sync::{
//!     BoardContext, ColumnKey, DragEvent, DragLocation, InMemoryTaskStore, TaskBoard, UserReply,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryTaskStore::new());
//! let mut board = TaskBoard::new(BoardContext::new(store));
//! board.open().await?;
//!
//! let id = board
//!     .create_task(UserReply::Provided("Write spec".into()))
//!     .await?
//!     .submitted()
//!     .expect("non-blank title");
//!
//! // Nothing changes locally until the store confirms with a snapshot
//! board.sync_next().await;
//! board.sync_next().await;
//!
//! let drag = DragEvent::dropped(
//!     id,
//!     DragLocation::new(ColumnKey::Todo, 0),
//!     DragLocation::new(ColumnKey::InProgress, 0),
//! );
//! board.drop_task(&drag).await?;
//!
//! board.close();
//! # Ok(())
//! # }
//! ```

pub mod allocator;
mod board;
pub mod config;
mod context;
pub mod drag;
mod error;
pub mod projector;
pub mod reconciler;
pub mod store;
pub mod task;
pub mod types;

pub use allocator::{Clock, ManualClock, PositionAllocator, SystemClock};
pub use board::TaskBoard;
pub use config::BoardConfig;
pub use context::BoardContext;
pub use drag::{DragEvent, DragLocation, DragResolver, DropPlacement, Mutation};
pub use error::{BoardError, Result};
pub use projector::{project, BoardProjection};
pub use reconciler::{SyncReconciler, SyncState, TaskSet};
pub use store::{InMemoryTaskStore, Subscription, SubscriptionHandle, TaskStore};
pub use task::{AbandonReason, Confirmation, Execute, MutationOutcome, UserReply};

// Re-export commonly used types
pub use types::{ColumnId, ColumnKey, Position, Task, TaskDocument, TaskId, TaskPatch};
