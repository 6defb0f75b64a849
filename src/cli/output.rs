use std::fmt::Write;

use ansi_term::{Colour, Style};

use crate::{
    timeline::{
        entities::{AppState, Day},
        progress::{completion_counts, day_progress, overall_progress},
    },
    utils::{percentage::Percentage, time::date_to_label},
};

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Show the todos of every day, not only of the current one.
    pub expand_all: bool,
    pub color: bool,
}

impl RenderOptions {
    fn paint(&self, style: Style, text: &str) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text.to_owned()
        }
    }
}

pub fn progress_bar(percentage: Percentage) -> String {
    let filled = usize::from(*percentage) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {percentage}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled)
    )
}

fn progress_style(percentage: Percentage) -> Style {
    if percentage.is_complete() {
        Colour::Green.bold()
    } else {
        Colour::Blue.normal()
    }
}

/// Goal, overall progress and every day of the timeline.
pub fn render_timeline(state: &AppState, options: RenderOptions) -> String {
    let mut out = String::new();
    let overall = overall_progress(state);

    let _ = writeln!(out, "Goal: {}", options.paint(Style::new().bold(), &state.goal.text));
    let _ = writeln!(
        out,
        "Overall progress {}",
        options.paint(progress_style(overall), &progress_bar(overall))
    );
    let _ = writeln!(out);

    for day in &state.days {
        let is_current = day.id == state.current_day_id;
        render_day(&mut out, day, is_current, options);
    }
    out
}

fn render_day(out: &mut String, day: &Day, is_current: bool, options: RenderOptions) {
    let progress = day_progress(day);
    let marker = if is_current { ">" } else { " " };
    let header = format!(
        "{marker} Day {} {} {} ({}/{})",
        day.id,
        date_to_label(day.date),
        progress,
        day.completed_count(),
        day.todos.len()
    );
    let style = if is_current {
        Colour::Blue.bold()
    } else if !day.todos.is_empty() && progress.is_complete() {
        Colour::Green.normal()
    } else {
        Style::new()
    };
    let _ = writeln!(out, "{}", options.paint(style, &header));

    if !(is_current || options.expand_all) {
        return;
    }
    if day.todos.is_empty() {
        let _ = writeln!(out, "    No tasks for this day");
        return;
    }
    for (index, todo) in day.todos.iter().enumerate() {
        let check = if todo.completed { "[x]" } else { "[ ]" };
        let text = if todo.completed {
            options.paint(Style::new().strikethrough().dimmed(), &todo.text)
        } else {
            todo.text.clone()
        };
        let _ = writeln!(out, "    {}. {check} {text}  ({})", index + 1, todo.id);
    }
}

/// Overall progress and completed todos per date.
pub fn render_stats(state: &AppState, options: RenderOptions) -> String {
    let mut out = String::new();
    let overall = overall_progress(state);
    let _ = writeln!(
        out,
        "Overall progress {}",
        options.paint(progress_style(overall), &progress_bar(overall))
    );

    let counts = completion_counts(state);
    if counts.is_empty() {
        let _ = writeln!(out, "Nothing completed yet");
        return out;
    }
    for (date, count) in counts {
        let _ = writeln!(out, "{}\t{count}\t{}", date_to_label(date), "#".repeat(count));
    }
    out
}
