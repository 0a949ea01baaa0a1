//! Results of user-initiated mutations

use serde::{Deserialize, Serialize};

/// Why a user action produced no mutation.
///
/// None of these are failures: the action is dropped and nothing is sent to
/// the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbandonReason {
    /// The user dismissed the prompt
    Cancelled,
    /// The user declined a confirmation
    Declined,
    /// Title was empty or whitespace only
    EmptyTitle,
    /// New title equals the current one
    Unchanged,
    /// Drop landed outside every column
    NoDestination,
    /// Drop landed in the column it started from
    SameColumn,
    /// Drop landed back on the slot it started from
    Unmoved,
    /// Drop target is not a board column
    UnknownColumn,
}

/// Outcome of a user action that may or may not reach the store
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T = ()> {
    /// The mutation was accepted by the store
    Submitted(T),
    /// Nothing was sent
    Abandoned(AbandonReason),
}

impl<T> MutationOutcome<T> {
    /// Whether the mutation reached the store
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    /// The submitted value, if any
    pub fn submitted(self) -> Option<T> {
        match self {
            Self::Submitted(value) => Some(value),
            Self::Abandoned(_) => None,
        }
    }

    /// Why nothing was sent, if that is what happened
    pub fn abandon_reason(&self) -> Option<AbandonReason> {
        match self {
            Self::Submitted(_) => None,
            Self::Abandoned(reason) => Some(*reason),
        }
    }
}

/// Reply to a text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserReply<T> {
    Provided(T),
    Cancelled,
}

impl<T> From<Option<T>> for UserReply<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Provided(value),
            None => Self::Cancelled,
        }
    }
}

/// Reply to a yes/no confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}
