//! First-in first-out queue of step directions.

use std::collections::VecDeque;

use crate::{Direction, Position};

/// Ordered directions leading from a unit's tile to its destination.
///
/// The start tile is excluded and the final step lands on the destination.
/// Directions are drained from the front one walk step at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    steps: VecDeque<Direction>,
}

impl Path {
    /// Creates an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction of the next queued step, or `None` when nothing is queued.
    #[must_use]
    pub fn start_direction(&self) -> Option<Direction> {
        self.steps.front().copied()
    }

    /// Removes and returns the next queued step.
    pub fn dequeue(&mut self) -> Option<Direction> {
        self.steps.pop_front()
    }

    /// Appends a step to the end of the path.
    pub fn push(&mut self, direction: Direction) {
        self.steps.push_back(direction);
    }

    /// Discards every queued step.
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Number of queued steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Reports whether no step is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterator over the queued steps in walking order.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.steps.iter().copied()
    }

    /// Tile reached after walking every queued step from `start`.
    #[must_use]
    pub fn destination_from(&self, start: Position) -> Position {
        self.iter()
            .fold(start, |position, direction| position + direction.offset())
    }
}

impl FromIterator<Direction> for Path {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Direction>> for Path {
    fn from(steps: Vec<Direction>) -> Self {
        Self {
            steps: steps.into(),
        }
    }
}
