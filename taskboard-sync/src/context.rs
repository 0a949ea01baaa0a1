//! BoardContext - what every mutation command needs to run
//!
//! The context provides access, not logic: the task store, the position
//! allocator and the configuration. It is cheap to clone, so a submission can
//! be moved into a spawned task while the board keeps handling snapshots.

use crate::allocator::PositionAllocator;
use crate::config::BoardConfig;
use crate::store::TaskStore;
use std::fmt;
use std::sync::Arc;

/// Context passed to every command
#[derive(Clone)]
pub struct BoardContext {
    store: Arc<dyn TaskStore>,
    allocator: Arc<PositionAllocator>,
    config: Arc<BoardConfig>,
}

impl BoardContext {
    /// Create a context over a store with default configuration and a
    /// system-clock allocator
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            allocator: Arc::new(PositionAllocator::new()),
            config: Arc::new(BoardConfig::default()),
        }
    }

    /// Use a specific allocator (e.g. one driven by a manual clock)
    pub fn with_allocator(mut self, allocator: PositionAllocator) -> Self {
        self.allocator = Arc::new(allocator);
        self
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: BoardConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// The task store
    pub fn store(&self) -> &dyn TaskStore {
        self.store.as_ref()
    }

    /// Shared handle to the task store
    pub fn store_handle(&self) -> Arc<dyn TaskStore> {
        Arc::clone(&self.store)
    }

    /// The position allocator
    pub fn allocator(&self) -> &PositionAllocator {
        &self.allocator
    }

    /// Shared handle to the position allocator
    pub fn allocator_handle(&self) -> Arc<PositionAllocator> {
        Arc::clone(&self.allocator)
    }

    /// The configuration
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }
}

impl fmt::Debug for BoardContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardContext")
            .field("allocator", &self.allocator)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
