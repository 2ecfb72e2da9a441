//! REPL command parsing.

use crate::filter::{ParseFilterError, StatusFilter};
use crate::types::{TodoAction, TodoId};
use thiserror::Error;

/// Usage text printed by `help`
pub const HELP: &str = "\
commands:
  add <title>            create a todo
  toggle <id>            flip a todo's completion
  edit <id>              start editing a todo
  rename <id> <title>    save a new title (empty title deletes)
  cancel                 leave edit mode
  rm <id>                delete a todo
  toggle-all             complete everything (or un-complete if all done)
  clear                  delete completed todos
  filter all|active|completed
  dismiss                close the notice
  list                   reload from the server
  help                   show this text
  quit                   exit";

/// A line typed at the prompt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `add <title>`
    Add(String),
    /// `toggle <id>`
    Toggle(TodoId),
    /// `edit <id>`
    Edit(TodoId),
    /// `rename <id> <title>`
    Rename(TodoId, String),
    /// `cancel`
    Cancel,
    /// `rm <id>`
    Remove(TodoId),
    /// `toggle-all`
    ToggleAll,
    /// `clear`
    ClearCompleted,
    /// `filter all|active|completed`
    Filter(StatusFilter),
    /// `dismiss`
    Dismiss,
    /// `list`
    Reload,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Why a line could not be understood
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    /// Nothing but whitespace
    #[error("Empty command")]
    Empty,

    /// First word is not a command
    #[error("Unknown command {0:?} (try help)")]
    Unknown(String),

    /// A required argument is absent
    #[error("{command} expects {expected}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// What was expected
        expected: &'static str,
    },

    /// The id argument is not a persisted record id
    #[error("Invalid todo id {0:?}")]
    InvalidId(String),

    /// Filter name not recognised
    #[error(transparent)]
    Filter(#[from] ParseFilterError),
}

fn parse_id(raw: &str) -> Result<TodoId, ParseCommandError> {
    match raw.parse::<TodoId>() {
        Ok(id) if !id.is_placeholder() => Ok(id),
        _ => Err(ParseCommandError::InvalidId(raw.to_string())),
    }
}

fn required<'a>(
    arg: Option<&'a str>,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, ParseCommandError> {
    arg.filter(|a| !a.is_empty())
        .ok_or(ParseCommandError::MissingArgument { command, expected })
}

impl Command {
    /// Parses one input line
    ///
    /// # Errors
    ///
    /// Returns a [`ParseCommandError`] describing what is wrong with the line.
    pub fn parse(line: &str) -> Result<Self, ParseCommandError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim())),
            None => (line, None),
        };

        match name {
            "" => Err(ParseCommandError::Empty),
            // An empty title is allowed here; the reducer reports it
            "add" => Ok(Self::Add(rest.unwrap_or_default().to_string())),
            "toggle" => Ok(Self::Toggle(parse_id(required(rest, "toggle", "<id>")?)?)),
            "edit" => Ok(Self::Edit(parse_id(required(rest, "edit", "<id>")?)?)),
            "rename" => {
                let args = required(rest, "rename", "<id> <title>")?;
                let (id, title) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
                Ok(Self::Rename(parse_id(id)?, title.trim().to_string()))
            },
            "cancel" => Ok(Self::Cancel),
            "rm" | "delete" => Ok(Self::Remove(parse_id(required(rest, "rm", "<id>")?)?)),
            "toggle-all" => Ok(Self::ToggleAll),
            "clear" => Ok(Self::ClearCompleted),
            "filter" => {
                let filter = required(rest, "filter", "all, active or completed")?
                    .parse::<StatusFilter>()?;
                Ok(Self::Filter(filter))
            },
            "dismiss" => Ok(Self::Dismiss),
            "list" => Ok(Self::Reload),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }

    /// Actions dispatched for this command, in order
    ///
    /// `add` fills the input before submitting it, so a rejected create
    /// leaves the typed title in the draft. REPL-only commands yield nothing.
    #[must_use]
    pub fn into_actions(self) -> Vec<TodoAction> {
        let action = match self {
            Self::Add(title) => {
                return vec![
                    TodoAction::SetDraft {
                        title: title.clone(),
                    },
                    TodoAction::Create { title },
                ];
            },
            Self::Toggle(id) => TodoAction::Toggle { id },
            Self::Edit(id) => TodoAction::StartEditing { id },
            Self::Rename(id, title) => TodoAction::Rename { id, title },
            Self::Cancel => TodoAction::CancelEditing,
            Self::Remove(id) => TodoAction::Delete { id },
            Self::ToggleAll => TodoAction::ToggleAll,
            Self::ClearCompleted => TodoAction::ClearCompleted,
            Self::Filter(filter) => TodoAction::SelectFilter { filter },
            Self::Dismiss => TodoAction::DismissNotice,
            Self::Reload => TodoAction::Load,
            Self::Help | Self::Quit => return Vec::new(),
        };
        vec![action]
    }
}
