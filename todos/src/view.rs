//! Plain-text rendering of the todo list.
//!
//! ```text
//! todos
//! [ ] toggle all
//! > new todo: Water plants
//!   [ ] #1 Buy milk
//!   [x] #2 Walk dog …
//!   [ ] #3 ✎ Read the book
//!   [ ] #… Pay rent …
//! 2 items left | [All] Active Completed | clear completed
//! ! Unable to add a todo
//! ```

use crate::filter::StatusFilter;
use crate::types::{Todo, TodoState};

const PENDING: &str = " …";

/// Checkbox for a completion flag
fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

fn record_line(state: &TodoState, todo: &Todo) -> String {
    let pending = if state.is_pending(todo.id) { PENDING } else { "" };
    let checkbox = checkbox(state.displayed_completed(todo));

    match state.editing.as_ref().filter(|e| e.id == todo.id) {
        Some(editing) => format!("  {checkbox} #{} ✎ {}{pending}", todo.id, editing.draft),
        None => format!("  {checkbox} #{} {}{pending}", todo.id, todo.title),
    }
}

fn footer(state: &TodoState) -> String {
    let left = state.items_left();
    let noun = if left == 1 { "item" } else { "items" };

    let filters: Vec<String> = StatusFilter::ALL
        .iter()
        .map(|&f| {
            if f == state.filter {
                format!("[{}]", f.label())
            } else {
                f.label().to_string()
            }
        })
        .collect();

    let clear = if state.has_completed() {
        "clear completed"
    } else {
        "(clear completed)"
    };

    format!("{left} {noun} left | {} | {clear}", filters.join(" "))
}

/// Renders the whole list as it should be shown after the last action
#[must_use]
pub fn render(state: &TodoState) -> String {
    let mut lines = vec!["todos".to_string()];

    if state.count() > 0 {
        lines.push(format!("{} toggle all", checkbox(state.all_completed())));
    }

    if state.creation_enabled() {
        lines.push(format!("> new todo: {}", state.draft));
    } else {
        lines.push("> new todo: (saving…)".to_string());
    }

    if state.loading {
        lines.push("  loading…".to_string());
    }

    lines.extend(state.visible().into_iter().map(|t| record_line(state, t)));

    if let Some(placeholder) = &state.placeholder {
        lines.push(format!("  [ ] #… {}{PENDING}", placeholder.title));
    }

    if state.count() > 0 {
        lines.push(footer(state));
    }

    if let Some(message) = state.notice.message() {
        lines.push(format!("! {message}"));
    }

    lines.join("\n")
}
