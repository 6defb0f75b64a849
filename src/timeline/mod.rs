//! The state container of goalstep. [Timeline] holds an [AppState] and applies every transition
//! to it. An operation either succeeds completely or returns a [TimelineError] and leaves the
//! state as it was.

pub mod entities;
pub mod error;
pub mod ids;
pub mod progress;

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::utils::{clock::Clock, time::next_date};

use entities::{AppState, Day, DayId, Goal, Todo, TodoId, TodoUpdate};
use error::TimelineError;
use ids::{fresh_id, transferred_id};

/// State used when nothing was saved yet.
pub fn default_state(today: NaiveDate) -> AppState {
    let second = next_date(today);
    AppState {
        days: vec![
            Day {
                id: 1,
                date: today,
                todos: vec![
                    Todo::new("1", "Create project plan"),
                    Todo::new("2", "Research competitors"),
                ],
            },
            Day::empty(2, second),
            Day::empty(3, next_date(second)),
        ],
        goal: Goal {
            text: "Launch MVP in 30 days".into(),
        },
        current_day_id: 1,
    }
}

fn non_empty(text: &str) -> Result<String, TimelineError> {
    let text = text.trim();
    if text.is_empty() {
        Err(TimelineError::EmptyText)
    } else {
        Ok(text.to_owned())
    }
}

pub struct Timeline<C: Clock> {
    state: AppState,
    clock: C,
}

impl<C: Clock> Timeline<C> {
    pub fn new(state: AppState, clock: C) -> Self {
        Self { state, clock }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    fn day(&self, day_id: DayId) -> Result<&Day, TimelineError> {
        self.state
            .day(day_id)
            .ok_or(TimelineError::UnknownDay(day_id))
    }

    fn day_mut(&mut self, day_id: DayId) -> Result<&mut Day, TimelineError> {
        self.state
            .day_mut(day_id)
            .ok_or(TimelineError::UnknownDay(day_id))
    }

    fn todo_mut(&mut self, day_id: DayId, todo_id: &str) -> Result<&mut Todo, TimelineError> {
        self.day_mut(day_id)?
            .todos
            .iter_mut()
            .find(|todo| todo.id == todo_id)
            .ok_or_else(|| TimelineError::UnknownTodo {
                day_id,
                todo_id: todo_id.to_owned(),
            })
    }

    fn millis(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }

    fn next_day_date(&self) -> NaiveDate {
        self.state
            .days
            .last()
            .map(|day| next_date(day.date))
            .unwrap_or_else(|| self.clock.now().date_naive())
    }

    /// Appends a new incomplete todo to a day and returns its id.
    pub fn add_todo(&mut self, day_id: DayId, text: &str) -> Result<TodoId, TimelineError> {
        let text = non_empty(text)?;
        self.day(day_id)?;
        let id = fresh_id(self.millis(), |id| self.state.contains_todo(id));
        debug!("Adding todo {id} to day {day_id}");
        self.day_mut(day_id)?.todos.push(Todo::new(id.clone(), text));
        Ok(id)
    }

    pub fn update_todo(
        &mut self,
        day_id: DayId,
        todo_id: &str,
        update: TodoUpdate,
    ) -> Result<(), TimelineError> {
        let text = update.text.as_deref().map(non_empty).transpose()?;
        let todo = self.todo_mut(day_id, todo_id)?;
        if let Some(text) = text {
            todo.text = text;
        }
        if let Some(completed) = update.completed {
            todo.completed = completed;
        }
        Ok(())
    }

    /// Flips completion of a todo and returns the new value.
    pub fn toggle_todo(&mut self, day_id: DayId, todo_id: &str) -> Result<bool, TimelineError> {
        let todo = self.todo_mut(day_id, todo_id)?;
        todo.completed = !todo.completed;
        Ok(todo.completed)
    }

    pub fn delete_todo(&mut self, day_id: DayId, todo_id: &str) -> Result<Todo, TimelineError> {
        let day = self.day_mut(day_id)?;
        let position = day
            .position_of(todo_id)
            .ok_or_else(|| TimelineError::UnknownTodo {
                day_id,
                todo_id: todo_id.to_owned(),
            })?;
        Ok(day.todos.remove(position))
    }

    pub fn update_goal(&mut self, text: &str) -> Result<(), TimelineError> {
        self.state.goal = Goal {
            text: non_empty(text)?,
        };
        Ok(())
    }

    /// Throws away everything and starts over from [default_state].
    pub fn reset(&mut self, start: NaiveDate) {
        info!("Resetting timeline to start on {start}");
        self.state = default_state(start);
    }

    /// Appends an empty day after the last one and returns its id.
    pub fn add_day(&mut self) -> Result<DayId, TimelineError> {
        let id = match self.state.days.last() {
            Some(day) => day
                .id
                .checked_add(1)
                .ok_or(TimelineError::NoDayAfter(day.id))?,
            None => 1,
        };
        let date = self.next_day_date();
        self.state.days.push(Day::empty(id, date));
        Ok(id)
    }

    /// Moves the current day pointer forward. Completed todos stay on the day they were done,
    /// incomplete ones move to the end of the next day under new ids. The next day is created if
    /// it doesn't exist yet.
    pub fn advance_day(&mut self) -> Result<DayId, TimelineError> {
        let current_id = self.state.current_day_id;
        let current = self.day(current_id)?;
        let next_id = current_id
            .checked_add(1)
            .ok_or(TimelineError::NoDayAfter(current_id))?;

        let (completed, incomplete): (Vec<Todo>, Vec<Todo>) =
            current.todos.iter().cloned().partition(|todo| todo.completed);

        let millis = self.millis();
        let mut generated = HashSet::<TodoId>::new();
        let transferred = incomplete
            .into_iter()
            .map(|todo| {
                let id = transferred_id(&todo.id, millis, |id| {
                    generated.contains(id) || self.state.contains_todo(id)
                });
                generated.insert(id.clone());
                Todo { id, ..todo }
            })
            .collect::<Vec<_>>();

        if self.state.day(next_id).is_none() {
            let date = self.next_day_date();
            self.state.days.push(Day::empty(next_id, date));
        }

        info!(
            "Advancing from day {current_id} to day {next_id}, carrying {} todos",
            transferred.len()
        );

        self.day_mut(current_id)?.todos = completed;
        self.day_mut(next_id)?.todos.extend(transferred);
        self.state.current_day_id = next_id;
        Ok(next_id)
    }

    /// Removes the todo at `from` and inserts it at `to`.
    pub fn move_todo(&mut self, day_id: DayId, from: usize, to: usize) -> Result<(), TimelineError> {
        let day = self.day_mut(day_id)?;
        let len = day.todos.len();
        for position in [from, to] {
            if position >= len {
                return Err(TimelineError::PositionOutOfRange { position, len });
            }
        }
        if from != to {
            let todo = day.todos.remove(from);
            day.todos.insert(to, todo);
        }
        Ok(())
    }

    /// Moves `active_id` into the place currently held by `over_id`.
    pub fn move_todo_over(
        &mut self,
        day_id: DayId,
        active_id: &str,
        over_id: &str,
    ) -> Result<(), TimelineError> {
        if active_id == over_id {
            return Ok(());
        }
        let day = self.day(day_id)?;
        let find = |todo_id: &str| {
            day.position_of(todo_id)
                .ok_or_else(|| TimelineError::UnknownTodo {
                    day_id,
                    todo_id: todo_id.to_owned(),
                })
        };
        let from = find(active_id)?;
        let to = find(over_id)?;
        self.move_todo(day_id, from, to)
    }

    /// Replaces the order of a day. `order` has to be a permutation of the day's todo ids.
    pub fn reorder_todos(&mut self, day_id: DayId, order: &[TodoId]) -> Result<(), TimelineError> {
        let day = self.day_mut(day_id)?;
        let unique = order.iter().collect::<HashSet<_>>();
        if order.len() != day.todos.len() || unique.len() != order.len() {
            return Err(TimelineError::InvalidOrder(day_id));
        }

        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            let Some(todo) = day.todos.iter().find(|todo| &todo.id == id) else {
                return Err(TimelineError::InvalidOrder(day_id));
            };
            reordered.push(todo.clone());
        }
        day.todos = reordered;
        Ok(())
    }
}
