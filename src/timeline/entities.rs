use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a todo. Unique across every day of a timeline.
pub type TodoId = String;

/// Identifier of a day. Days are numbered from 1 in the order they appear.
pub type DayId = u32;

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

impl Todo {
    pub fn new(id: impl Into<TodoId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
        }
    }

    #[cfg(test)]
    pub fn with_completed(self, completed: bool) -> Self {
        Self { completed, ..self }
    }
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Day {
    pub id: DayId,
    #[serde(with = "date_ser")]
    pub date: NaiveDate,
    pub todos: Vec<Todo>,
}

impl Day {
    pub fn empty(id: DayId, date: NaiveDate) -> Self {
        Self {
            id,
            date,
            todos: vec![],
        }
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.completed).count()
    }

    pub fn position_of(&self, todo_id: &str) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == todo_id)
    }
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Goal {
    pub text: String,
}

/// Everything that is persisted between runs.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub days: Vec<Day>,
    pub goal: Goal,
    pub current_day_id: DayId,
}

impl AppState {
    pub fn day(&self, day_id: DayId) -> Option<&Day> {
        self.days.iter().find(|day| day.id == day_id)
    }

    pub fn day_mut(&mut self, day_id: DayId) -> Option<&mut Day> {
        self.days.iter_mut().find(|day| day.id == day_id)
    }

    pub fn current_day(&self) -> Option<&Day> {
        self.day(self.current_day_id)
    }

    pub fn contains_todo(&self, todo_id: &str) -> bool {
        self.days
            .iter()
            .any(|day| day.todos.iter().any(|todo| todo.id == todo_id))
    }
}

/// Partial update of a [Todo]. Fields that are `None` are left as they are.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl TodoUpdate {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }
}

/// Dates are written as `YYYY-MM-DD`. Older blobs store a full ISO timestamp, those are accepted
/// and reduced to the local date.
mod date_ser {
    use chrono::{DateTime, Local, NaiveDate};
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if let Ok(date) = NaiveDate::parse_from_str(&s, FORMAT) {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(&s)
            .map(|v| v.with_timezone(&Local).date_naive())
            .map_err(|e| D::Error::custom(format!("invalid day date {s:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;

    use super::{AppState, Day, Goal, Todo};

    #[test]
    fn test_state_uses_stored_field_names() -> Result<()> {
        let state = AppState {
            days: vec![Day {
                id: 1,
                date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
                todos: vec![Todo::new("1", "Write tests")],
            }],
            goal: Goal {
                text: "Ship".into(),
            },
            current_day_id: 1,
        };

        let value = serde_json::to_value(&state)?;

        assert_eq!(value["currentDayId"], 1);
        assert_eq!(value["days"][0]["date"], "2025-03-15");
        assert_eq!(value["days"][0]["todos"][0]["completed"], false);
        assert_eq!(value["goal"]["text"], "Ship");
        Ok(())
    }

    #[test]
    fn test_state_accepts_timestamp_dates() -> Result<()> {
        let blob = r#"{
            "days": [{"id": 1, "date": "2025-03-15T12:00:00.000Z", "todos": []}],
            "goal": {"text": "Ship"},
            "currentDayId": 1
        }"#;

        let state: AppState = serde_json::from_str(blob)?;

        let expected = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert!((state.days[0].date - expected).num_days().abs() <= 1);
        Ok(())
    }

    #[test]
    fn test_state_rejects_garbage_dates() {
        let blob = r#"{
            "days": [{"id": 1, "date": "someday", "todos": []}],
            "goal": {"text": "Ship"},
            "currentDayId": 1
        }"#;

        assert!(serde_json::from_str::<AppState>(blob).is_err());
    }
}
