//! Views derived from [AppState]. Nothing here is stored, so every value follows the todo lists
//! after any mutation.

use chrono::NaiveDate;

use crate::utils::percentage::{ratio_percentage, Percentage};

use super::entities::{AppState, Day};

pub fn day_progress(day: &Day) -> Percentage {
    ratio_percentage(day.completed_count(), day.todos.len())
}

pub fn overall_progress(state: &AppState) -> Percentage {
    let (completed, total) = state.days.iter().fold((0, 0), |(completed, total), day| {
        (completed + day.completed_count(), total + day.todos.len())
    });
    ratio_percentage(completed, total)
}

/// Completed todos per date, skipping days where nothing was completed.
pub fn completion_counts(state: &AppState) -> Vec<(NaiveDate, usize)> {
    state
        .days
        .iter()
        .map(|day| (day.date, day.completed_count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::timeline::entities::{AppState, Day, Goal, Todo};

    use super::{completion_counts, day_progress, overall_progress};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn state() -> AppState {
        AppState {
            days: vec![
                Day {
                    id: 1,
                    date: date(1),
                    todos: vec![
                        Todo::new("a", "a").with_completed(true),
                        Todo::new("b", "b").with_completed(true),
                    ],
                },
                Day {
                    id: 2,
                    date: date(2),
                    todos: vec![
                        Todo::new("c", "c"),
                        Todo::new("d", "d").with_completed(true),
                        Todo::new("e", "e"),
                    ],
                },
                Day::empty(3, date(3)),
            ],
            goal: Goal {
                text: "goal".into(),
            },
            current_day_id: 2,
        }
    }

    #[test]
    fn test_day_progress() {
        let state = state();
        assert_eq!(*day_progress(&state.days[0]), 100);
        assert_eq!(*day_progress(&state.days[1]), 33);
        assert_eq!(*day_progress(&state.days[2]), 0);
    }

    #[test]
    fn test_overall_progress() {
        assert_eq!(*overall_progress(&state()), 60);
    }

    #[test]
    fn test_overall_progress_without_todos() {
        let mut state = state();
        state.days.iter_mut().for_each(|day| day.todos.clear());
        assert_eq!(*overall_progress(&state), 0);
    }

    #[test]
    fn test_completion_counts_skip_idle_days() {
        assert_eq!(completion_counts(&state()), vec![(date(1), 2), (date(2), 1)]);
    }
}
