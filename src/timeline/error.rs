use thiserror::Error;

use super::entities::{DayId, TodoId};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimelineError {
    #[error("Day {0} doesn't exist")]
    UnknownDay(DayId),

    #[error("Todo {todo_id} doesn't exist in day {day_id}")]
    UnknownTodo { day_id: DayId, todo_id: TodoId },

    #[error("Text can't be empty")]
    EmptyText,

    #[error("Position {position} is out of range for a day with {len} todos")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("Day {0} is the last day that can exist")]
    NoDayAfter(DayId),

    #[error("New order for day {0} must contain every todo of the day exactly once")]
    InvalidOrder(DayId),
}
