use std::fmt::Write;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Local};
use chrono_english::parse_date_string;

use crate::{
    timeline::{
        entities::{Day, DayId, TodoId, TodoUpdate},
        Timeline,
    },
    utils::clock::Clock,
};

use super::{
    output::{render_stats, render_timeline, RenderOptions},
    Commands,
};

/// Result of a single command. `changed` tells whether the state has to be saved.
#[derive(Debug)]
pub struct Outcome {
    pub output: String,
    pub changed: bool,
}

impl Outcome {
    fn changed(output: String) -> Self {
        Self {
            output,
            changed: true,
        }
    }

    fn unchanged(output: String) -> Self {
        Self {
            output,
            changed: false,
        }
    }
}

/// Finds a todo by its 1-based position within the day, falling back to its id.
pub fn resolve_todo(day: &Day, selector: &str) -> Result<TodoId> {
    if let Ok(position) = selector.parse::<usize>() {
        if let Some(todo) = position.checked_sub(1).and_then(|index| day.todos.get(index)) {
            return Ok(todo.id.clone());
        }
    }
    if day.position_of(selector).is_some() {
        return Ok(selector.to_owned());
    }
    bail!("No todo {selector:?} in day {}", day.id)
}

fn resolve<C: Clock>(
    timeline: &Timeline<C>,
    day: Option<DayId>,
    selector: &str,
) -> Result<(DayId, TodoId)> {
    let day_id = day.unwrap_or(timeline.state().current_day_id);
    let day = timeline
        .state()
        .day(day_id)
        .ok_or_else(|| anyhow!("Day {day_id} doesn't exist"))?;
    Ok((day_id, resolve_todo(day, selector)?))
}

/// Converts a 1-based position from the command line into an index.
fn index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Positions start from 1"))
}

pub fn execute<C: Clock>(
    timeline: &mut Timeline<C>,
    command: Commands,
    now: DateTime<Local>,
    options: RenderOptions,
) -> Result<Outcome> {
    let current = timeline.state().current_day_id;

    let outcome = match command {
        Commands::Show { all } => Outcome::unchanged(render_timeline(
            timeline.state(),
            RenderOptions {
                expand_all: all,
                ..options
            },
        )),
        Commands::Goal { text } if text.is_empty() => {
            Outcome::unchanged(format!("{}\n", timeline.state().goal.text))
        }
        Commands::Goal { text } => {
            timeline.update_goal(&text.join(" "))?;
            Outcome::changed(format!("Goal set to: {}\n", timeline.state().goal.text))
        }
        Commands::Add { day, text } => {
            let day_id = day.unwrap_or(current);
            let id = timeline.add_todo(day_id, &text.join(" "))?;
            Outcome::changed(format!("Added todo {id} to day {day_id}\n"))
        }
        Commands::Done { day, todo } => {
            let (day_id, todo_id) = resolve(timeline, day, &todo)?;
            timeline.update_todo(day_id, &todo_id, TodoUpdate::completed(true))?;
            Outcome::changed(format!("Completed todo {todo_id}\n"))
        }
        Commands::Undo { day, todo } => {
            let (day_id, todo_id) = resolve(timeline, day, &todo)?;
            timeline.update_todo(day_id, &todo_id, TodoUpdate::completed(false))?;
            Outcome::changed(format!("Reopened todo {todo_id}\n"))
        }
        Commands::Toggle { day, todo } => {
            let (day_id, todo_id) = resolve(timeline, day, &todo)?;
            let completed = timeline.toggle_todo(day_id, &todo_id)?;
            let state = if completed { "completed" } else { "open" };
            Outcome::changed(format!("Todo {todo_id} is now {state}\n"))
        }
        Commands::Edit { day, todo, text } => {
            let (day_id, todo_id) = resolve(timeline, day, &todo)?;
            timeline.update_todo(day_id, &todo_id, TodoUpdate::text(text.join(" ")))?;
            Outcome::changed(format!("Updated todo {todo_id}\n"))
        }
        Commands::Rm { day, todo } => {
            let (day_id, todo_id) = resolve(timeline, day, &todo)?;
            let removed = timeline.delete_todo(day_id, &todo_id)?;
            Outcome::changed(format!("Deleted \"{}\"\n", removed.text))
        }
        Commands::Mv { day, from, to } => {
            let day_id = day.unwrap_or(current);
            timeline.move_todo(day_id, index(from)?, index(to)?)?;
            Outcome::changed(format!("Moved todo {from} to position {to} in day {day_id}\n"))
        }
        Commands::AddDay => {
            let day_id = timeline.add_day()?;
            Outcome::changed(format!("Added day {day_id}\n"))
        }
        Commands::Advance { .. } => {
            let carried = timeline
                .state()
                .current_day()
                .map_or(0, |day| day.todos.len() - day.completed_count());
            let day_id = timeline.advance_day()?;
            let mut output = format!("Advanced to day {day_id}");
            if carried > 0 {
                let _ = write!(output, ", carried over {carried} unfinished todo(s)");
            }
            output.push('\n');
            Outcome::changed(output)
        }
        Commands::Stats => Outcome::unchanged(render_stats(timeline.state(), options)),
        Commands::Reset { start, date_style } => {
            let start = match start {
                Some(start) => parse_date_string(&start, now, date_style.into())
                    .map_err(|e| anyhow!("Failed to parse start date {start:?}: {e}"))?,
                None => now,
            };
            timeline.reset(start.date_naive());
            Outcome::changed(format!(
                "Started a new timeline on {}\n",
                start.date_naive().format("%Y-%m-%d")
            ))
        }
    };
    Ok(outcome)
}
