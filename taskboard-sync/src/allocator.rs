//! Position allocation for newly created and moved tasks.
//!
//! Allocation is local and optimistic: it runs before any round trip to the
//! store and never consults remote state. Wall-clock milliseconds are the
//! monotonic source, bumped past the last value handed out so a single
//! allocator never repeats or goes backwards. Two clients allocating in the
//! same millisecond can still produce equal values; ties are resolved by id
//! at projection time.

use crate::types::Position;
use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// Source of "now" for position allocation
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch
    fn now_millis(&self) -> f64;
}

/// Wall clock backed by `chrono::Utc::now`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> f64 {
        Utc::now().timestamp_millis() as f64
    }
}

/// Clock that only moves when told to. Used to make allocation deterministic.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `millis`
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    /// Move forward by `millis`
    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> f64 {
        self.millis.load(Ordering::SeqCst) as f64
    }
}

/// Hands out strictly increasing positions.
pub struct PositionAllocator {
    clock: Arc<dyn Clock>,
    /// Bits of the last value handed out (negative infinity before the first)
    last: AtomicU64,
}

impl PositionAllocator {
    /// Allocator driven by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Allocator driven by a custom clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicU64::new(f64::NEG_INFINITY.to_bits()),
        }
    }

    /// Next position, strictly greater than every position this allocator
    /// has returned before.
    pub fn allocate(&self) -> Position {
        self.allocate_after(None)
    }

    /// Like [`allocate`](Self::allocate), but also strictly greater than
    /// `floor`. Pass the highest position of the destination column to make a
    /// task land at its end even when another client's clock runs ahead.
    pub fn allocate_after(&self, floor: Option<Position>) -> Position {
        let now = self.clock.now_millis();
        let floor = floor.filter(|p| p.is_finite()).map(Position::value);

        let mut prev_bits = self.last.load(Ordering::Acquire);
        loop {
            let prev = f64::from_bits(prev_bits);
            let mut next = now;
            if next <= prev {
                next = Position::new(prev).after().value();
            }
            if let Some(floor) = floor {
                if next <= floor {
                    next = Position::new(floor).after().value();
                }
            }

            match self.last.compare_exchange_weak(
                prev_bits,
                next.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Position::new(next),
                Err(actual) => prev_bits = actual,
            }
        }
    }

    /// Rank for a slot between two neighbours of a column.
    ///
    /// Either neighbour may be absent (slot at the start or end of the column).
    /// Returns `None` only when both neighbours exist and no value fits between
    /// them.
    pub fn between(&self, before: Option<Position>, after: Option<Position>) -> Option<Position> {
        match (before, after) {
            (Some(before), Some(after)) => Position::between(before, after),
            (None, Some(after)) => Some(after.before()),
            (Some(before), None) => Some(self.allocate_after(Some(before))),
            (None, None) => Some(self.allocate()),
        }
    }
}

impl Default for PositionAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PositionAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionAllocator")
            .field("last", &f64::from_bits(self.last.load(Ordering::Relaxed)))
            .finish()
    }
}
