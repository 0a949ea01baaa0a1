//! Position type for ordering tasks within a column.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Ordering key of a task within its column.
///
/// Positions are plain numbers (remote stores keep them as doubles). Fresh
/// positions come from the clock, so comparisons only make sense between tasks
/// in the same column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(f64);

impl Position {
    /// Wrap a raw value
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether this is a usable ordering key (not NaN or infinite)
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// One whole step above, or the next representable value once a whole
    /// step no longer registers
    pub fn after(self) -> Self {
        let next = self.0 + 1.0;
        // Past 2^53 a whole step is lost to rounding
        if next > self.0 {
            Self(next)
        } else {
            Self(self.0.next_up())
        }
    }

    /// One whole step below, or the next representable value down
    pub fn before(self) -> Self {
        let next = self.0 - 1.0;
        if next < self.0 {
            Self(next)
        } else {
            Self(self.0.next_down())
        }
    }

    /// Midpoint strictly between two positions.
    ///
    /// Returns `None` when `before >= after` or when the two are so close that
    /// no distinct value fits between them.
    pub fn between(before: Position, after: Position) -> Option<Self> {
        if before >= after {
            return None;
        }
        let mid = before.0 + (after.0 - before.0) / 2.0;
        if mid > before.0 && mid < after.0 {
            Some(Self(mid))
        } else {
            None
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self(0.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for Position {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<i64> for Position {
    fn from(value: i64) -> Self {
        Self(value as f64)
    }
}
