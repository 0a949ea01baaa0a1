//! Drag transaction resolution: a finished drag gesture -> at most one move.
//!
//! Resolution reads the current projection and allocates a position, nothing
//! else. Submitting the resulting [`Mutation`] is the caller's job (see
//! [`MoveTask`](crate::task::MoveTask)).

use crate::allocator::PositionAllocator;
use crate::projector::BoardProjection;
use crate::task::AbandonReason;
use crate::types::{ColumnId, ColumnKey, Position, TaskId, TaskPatch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// How a drop picks the moved task's position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPlacement {
    /// Cross-column drops land at the end of the destination column; drops
    /// within a column are ignored. The visual drop index is not used.
    #[default]
    Append,
    /// The task is ranked between its new neighbours at the drop index, and
    /// reordering within a column is honoured.
    AtIndex,
}

/// A column slot as seen by the user when the drag started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragLocation {
    pub column: ColumnId,
    pub index: usize,
}

impl DragLocation {
    /// Create a location
    pub fn new(column: impl Into<ColumnId>, index: usize) -> Self {
        Self {
            column: column.into(),
            index,
        }
    }
}

/// A finished drag gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEvent {
    pub task_id: TaskId,
    pub source: DragLocation,
    /// `None` when the task was dropped outside every column
    pub destination: Option<DragLocation>,
}

impl DragEvent {
    /// Create a drag event
    pub fn new(
        task_id: impl Into<TaskId>,
        source: DragLocation,
        destination: Option<DragLocation>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            source,
            destination,
        }
    }

    /// Drop at a column slot
    pub fn dropped(
        task_id: impl Into<TaskId>,
        source: DragLocation,
        destination: DragLocation,
    ) -> Self {
        Self::new(task_id, source, Some(destination))
    }

    /// Drop outside every column
    pub fn cancelled(task_id: impl Into<TaskId>, source: DragLocation) -> Self {
        Self::new(task_id, source, None)
    }
}

/// Column/position change of exactly one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    pub task_id: TaskId,
    pub new_column: ColumnKey,
    pub new_position: Position,
}

impl Mutation {
    /// The store update that carries this mutation
    pub fn to_patch(&self) -> TaskPatch {
        TaskPatch::new()
            .with_column(self.new_column)
            .with_position(self.new_position)
    }
}

/// Turns drag gestures into mutations
#[derive(Debug, Clone)]
pub struct DragResolver {
    allocator: Arc<PositionAllocator>,
    placement: DropPlacement,
}

impl DragResolver {
    /// Create a resolver
    pub fn new(allocator: Arc<PositionAllocator>, placement: DropPlacement) -> Self {
        Self {
            allocator,
            placement,
        }
    }

    /// The placement policy in use
    pub fn placement(&self) -> DropPlacement {
        self.placement
    }

    /// Resolve a gesture; `None` when the drop should be ignored
    pub fn resolve(&self, event: &DragEvent, projection: &BoardProjection) -> Option<Mutation> {
        self.outcome(event, projection).ok()
    }

    /// Resolve a gesture, saying why when it is ignored
    pub fn outcome(
        &self,
        event: &DragEvent,
        projection: &BoardProjection,
    ) -> Result<Mutation, AbandonReason> {
        let result = self.decide(event, projection);
        match &result {
            Ok(mutation) => debug!(
                task_id = %mutation.task_id,
                column = %mutation.new_column,
                position = %mutation.new_position,
                "drag resolved"
            ),
            Err(reason) => debug!(task_id = %event.task_id, ?reason, "drag ignored"),
        }
        result
    }

    fn decide(
        &self,
        event: &DragEvent,
        projection: &BoardProjection,
    ) -> Result<Mutation, AbandonReason> {
        let destination = event
            .destination
            .as_ref()
            .ok_or(AbandonReason::NoDestination)?;
        let column = destination
            .column
            .key()
            .ok_or(AbandonReason::UnknownColumn)?;
        let same_column = event.source.column == destination.column;

        // The dragged task never counts as its own neighbour
        let others: Vec<Position> = projection
            .column(column)
            .iter()
            .filter(|t| t.id != event.task_id)
            .map(|t| t.position)
            .collect();

        let new_position = match self.placement {
            DropPlacement::Append => {
                if same_column {
                    return Err(AbandonReason::SameColumn);
                }
                self.allocator.allocate_after(finite_max(&others))
            }
            DropPlacement::AtIndex => {
                if same_column && destination.index == event.source.index {
                    return Err(AbandonReason::Unmoved);
                }
                let index = destination.index.min(others.len());
                let before = index.checked_sub(1).map(|i| others[i]);
                let after = others.get(index).copied();
                match self.allocator.between(before, after) {
                    Some(position) => position,
                    None => {
                        warn!(
                            task_id = %event.task_id,
                            column = %column,
                            index,
                            "no rank left between neighbours, appending instead"
                        );
                        self.allocator.allocate_after(finite_max(&others))
                    }
                }
            }
        };

        Ok(Mutation {
            task_id: event.task_id.clone(),
            new_column: column,
            new_position,
        })
    }
}

/// Highest finite position; NaN and infinities are not ranks to append after
fn finite_max(positions: &[Position]) -> Option<Position> {
    positions.iter().copied().filter(|p| p.is_finite()).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::ManualClock;
    use crate::types::Task;
    use proptest::prelude::*;

    fn resolver(placement: DropPlacement) -> DragResolver {
        let clock = Arc::new(ManualClock::new(1_000));
        DragResolver::new(Arc::new(PositionAllocator::with_clock(clock)), placement)
    }

    fn board() -> BoardProjection {
        BoardProjection::build(&vec![
            Task::new("a", "A", ColumnKey::Todo, 10.0),
            Task::new("b", "B", ColumnKey::Todo, 20.0),
            Task::new("c", "C", ColumnKey::InProgress, 5_000.0),
            Task::new("d", "D", ColumnKey::InProgress, 6_000.0),
        ])
    }

    fn drag(id: &str, from: (ColumnKey, usize), to: Option<(ColumnKey, usize)>) -> DragEvent {
        DragEvent::new(
            id,
            DragLocation::new(from.0, from.1),
            to.map(|(col, idx)| DragLocation::new(col, idx)),
        )
    }

    #[test]
    fn test_no_destination_is_ignored() {
        let r = resolver(DropPlacement::Append);
        let event = DragEvent::cancelled("a", DragLocation::new(ColumnKey::Todo, 0));
        assert_eq!(
            r.outcome(&event, &board()),
            Err(AbandonReason::NoDestination)
        );
        assert_eq!(r.resolve(&event, &board()), None);
    }

    #[test]
    fn test_same_column_is_ignored_when_appending() {
        let r = resolver(DropPlacement::Append);
        let event = drag("a", (ColumnKey::Todo, 0), Some((ColumnKey::Todo, 1)));
        assert_eq!(r.outcome(&event, &board()), Err(AbandonReason::SameColumn));
    }

    #[test]
    fn test_unknown_destination_is_ignored() {
        let r = resolver(DropPlacement::Append);
        let event = DragEvent::dropped(
            "a",
            DragLocation::new(ColumnKey::Todo, 0),
            DragLocation::new("archive", 0),
        );
        assert_eq!(
            r.outcome(&event, &board()),
            Err(AbandonReason::UnknownColumn)
        );
    }

    #[test]
    fn test_cross_column_drop_appends_past_existing_positions() {
        let r = resolver(DropPlacement::Append);
        // Drop index 0 is accepted but not used
        let event = drag("a", (ColumnKey::Todo, 0), Some((ColumnKey::InProgress, 0)));
        let mutation = r.resolve(&event, &board()).unwrap();

        assert_eq!(mutation.task_id.as_str(), "a");
        assert_eq!(mutation.new_column, ColumnKey::InProgress);
        // Clock says 1000, but the column already holds 6000
        assert!(mutation.new_position > Position::new(6_000.0));
    }

    #[test]
    fn test_drop_into_empty_column() {
        let r = resolver(DropPlacement::Append);
        let event = drag("a", (ColumnKey::Todo, 0), Some((ColumnKey::Done, 0)));
        let mutation = r.resolve(&event, &board()).unwrap();
        assert_eq!(mutation.new_column, ColumnKey::Done);
        assert!(mutation.new_position > Position::new(0.0));
    }

    #[test]
    fn test_consecutive_drops_rank_in_drop_order() {
        let r = resolver(DropPlacement::Append);
        let first = drag("a", (ColumnKey::Todo, 0), Some((ColumnKey::Done, 0)));
        let second = drag("b", (ColumnKey::Todo, 0), Some((ColumnKey::Done, 0)));
        let first = r.resolve(&first, &board()).unwrap();
        let second = r.resolve(&second, &board()).unwrap();
        assert!(second.new_position > first.new_position);
    }

    #[test]
    fn test_at_index_ranks_between_neighbours() {
        let r = resolver(DropPlacement::AtIndex);
        let event = drag("a", (ColumnKey::Todo, 0), Some((ColumnKey::InProgress, 1)));
        let mutation = r.resolve(&event, &board()).unwrap();
        assert_eq!(mutation.new_position, Position::new(5_500.0));
    }

    #[test]
    fn test_at_index_head_and_tail() {
        let r = resolver(DropPlacement::AtIndex);
        let event = drag("a", (ColumnKey::Todo, 0), Some((ColumnKey::InProgress, 0)));
        let head = r.resolve(&event, &board()).unwrap();
        assert!(head.new_position < Position::new(5_000.0));

        let event = drag("a", (ColumnKey::Todo, 0), Some((ColumnKey::InProgress, 99)));
        let tail = r.resolve(&event, &board()).unwrap();
        assert!(tail.new_position > Position::new(6_000.0));
    }

    #[test]
    fn test_at_index_reorders_within_column() {
        let r = resolver(DropPlacement::AtIndex);
        // Move b (index 1) to the top of todo
        let event = drag("b", (ColumnKey::Todo, 1), Some((ColumnKey::Todo, 0)));
        let mutation = r.resolve(&event, &board()).unwrap();
        assert_eq!(mutation.new_column, ColumnKey::Todo);
        assert!(mutation.new_position < Position::new(10.0));

        let unmoved = drag("b", (ColumnKey::Todo, 1), Some((ColumnKey::Todo, 1)));
        assert_eq!(r.outcome(&unmoved, &board()), Err(AbandonReason::Unmoved));
    }

    #[test]
    fn test_at_index_falls_back_to_append_when_gap_exhausted() {
        let r = resolver(DropPlacement::AtIndex);
        let tight = f64::from_bits(10.0f64.to_bits() + 1);
        let projection = BoardProjection::build(&vec![
            Task::new("x", "X", ColumnKey::Done, 10.0),
            Task::new("y", "Y", ColumnKey::Done, tight),
        ]);
        let event = drag("a", (ColumnKey::Todo, 0), Some((ColumnKey::Done, 1)));
        let mutation = r.resolve(&event, &projection).unwrap();
        assert!(mutation.new_position > Position::new(tight));
    }

    proptest! {
        /// A cross-column drop always outranks everything already in the
        /// destination column, whatever the local clock says.
        #[test]
        fn prop_append_outranks_destination(
            positions in prop::collection::vec(-1.0e12f64..1.0e13, 0..20),
            now in 0i64..2_000_000_000_000,
        ) {
            let clock = Arc::new(ManualClock::new(now));
            let r = DragResolver::new(
                Arc::new(PositionAllocator::with_clock(clock)),
                DropPlacement::Append,
            );
            let tasks: Vec<Task> = positions
                .iter()
                .enumerate()
                .map(|(i, p)| Task::new(i.to_string(), "D", ColumnKey::Done, *p))
                .collect();
            let projection = BoardProjection::build(&tasks);

            let event = drag("x", (ColumnKey::Todo, 0), Some((ColumnKey::Done, 0)));
            let mutation = r.resolve(&event, &projection).unwrap();
            prop_assert_eq!(mutation.new_column, ColumnKey::Done);
            for p in positions {
                prop_assert!(mutation.new_position > Position::new(p));
            }
        }
    }

    #[test]
    fn test_append_ignores_non_finite_positions() {
        let r = resolver(DropPlacement::Append);
        let projection = BoardProjection::build(&vec![
            Task::new("big", "Big", ColumnKey::Done, 5_000_000.0),
            Task::new("nan", "NaN", ColumnKey::Done, f64::NAN),
            Task::new("inf", "Inf", ColumnKey::Done, f64::INFINITY),
        ]);

        let event = drag("a", (ColumnKey::Todo, 0), Some((ColumnKey::Done, 0)));
        let mutation = r.resolve(&event, &projection).unwrap();
        assert!(mutation.new_position > Position::new(5_000_000.0));
        assert!(mutation.new_position.is_finite());
    }

    #[test]
    fn test_append_past_float_integer_range() {
        let r = resolver(DropPlacement::Append);
        let top = 9_007_199_254_740_992.0;
        let projection =
            BoardProjection::build(&vec![Task::new("top", "Top", ColumnKey::Done, top)]);

        let event = drag("a", (ColumnKey::Todo, 0), Some((ColumnKey::Done, 0)));
        let mutation = r.resolve(&event, &projection).unwrap();
        assert!(mutation.new_position > Position::new(top));
    }

    #[test]
    fn test_mutation_patch() {
        let mutation = Mutation {
            task_id: TaskId::from("a"),
            new_column: ColumnKey::Done,
            new_position: Position::new(3.0),
        };
        let patch = mutation.to_patch();
        assert_eq!(patch.title, None);
        assert_eq!(patch.column, Some(ColumnId::from("done")));
        assert_eq!(patch.position, Some(Position::new(3.0)));
    }
}
