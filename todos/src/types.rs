//! Domain types for the todos client.
//!
//! A todo list is an ordered collection of records owned by one user. The
//! remote resource assigns ids; locally the client also tracks which records
//! have a call in flight, which toggles are not yet confirmed, which record
//! is being edited, and the single notice slot.

use crate::batch::Settled;
use crate::error::ApiError;
use crate::filter::{self, StatusFilter};
use crate::notice::NoticeSlot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Identifier assigned by the remote resource
///
/// `0` is reserved for the optimistic placeholder and never names a
/// persisted record.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Id carried by the not-yet-persisted placeholder
    pub const PLACEHOLDER: Self = Self(0);

    /// Wraps a raw id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether this is the placeholder id
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Owner of a todo list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw user id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw user id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo record, as exchanged with the remote resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Remote id, `0` for the placeholder
    pub id: TodoId,
    /// Trimmed title
    pub title: String,
    /// Whether the todo is done
    pub completed: bool,
    /// Owner
    pub user_id: UserId,
}

impl Todo {
    /// The optimistic record shown while a create call is in flight
    #[must_use]
    pub fn placeholder(title: impl Into<String>, user_id: UserId) -> Self {
        Self {
            id: TodoId::PLACEHOLDER,
            title: title.into(),
            completed: false,
            user_id,
        }
    }

    /// Body sent on create and update
    #[must_use]
    pub fn payload(&self) -> TodoPayload {
        TodoPayload {
            title: self.title.clone(),
            completed: self.completed,
            user_id: self.user_id,
        }
    }

    /// Copy of this record with `completed` replaced
    #[must_use]
    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }

    /// Copy of this record with `title` replaced
    #[must_use]
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }
}

/// `{title, completed, userId}` body of POST and PATCH requests
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPayload {
    /// Trimmed title
    pub title: String,
    /// Completion flag
    pub completed: bool,
    /// Owner
    pub user_id: UserId,
}

/// Edit mode of one record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Editing {
    /// Record being edited
    pub id: TodoId,
    /// Current content of the edit field
    pub draft: String,
}

/// Local view state of the todo list
#[derive(Clone, Debug)]
pub struct TodoState {
    /// Owner of the list; every listing and create uses it
    pub user_id: UserId,
    /// Persisted records in display order
    pub todos: Vec<Todo>,
    /// Optimistic record while a create call is in flight
    pub placeholder: Option<Todo>,
    /// Content of the new-todo input
    pub draft: String,
    /// Initial listing in flight
    pub loading: bool,
    /// Records with a remote call in flight
    pub pending: BTreeSet<TodoId>,
    /// Displayed `completed` value of toggles awaiting confirmation
    pub optimistic: BTreeMap<TodoId, bool>,
    /// Record in edit mode, if any
    pub editing: Option<Editing>,
    /// Status filter selection
    pub filter: StatusFilter,
    /// Transient error notice
    pub notice: NoticeSlot,
}

impl TodoState {
    /// Creates an empty list for `user_id`
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            todos: Vec::new(),
            placeholder: None,
            draft: String::new(),
            loading: false,
            pending: BTreeSet::new(),
            optimistic: BTreeMap::new(),
            editing: None,
            filter: StatusFilter::default(),
            notice: NoticeSlot::default(),
        }
    }

    /// Same list pre-populated with `todos`
    #[must_use]
    pub fn with_todos(mut self, todos: Vec<Todo>) -> Self {
        self.todos = todos;
        self
    }

    /// Returns a record by id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Returns a mutable record by id
    pub fn get_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id == id)
    }

    /// Number of persisted records
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Whether a call is in flight for `id`
    #[must_use]
    pub fn is_pending(&self, id: TodoId) -> bool {
        self.pending.contains(&id)
    }

    /// `completed` as it should be displayed, including an unconfirmed toggle
    #[must_use]
    pub fn displayed_completed(&self, todo: &Todo) -> bool {
        self.optimistic
            .get(&todo.id)
            .copied()
            .unwrap_or(todo.completed)
    }

    /// Whether the new-todo input accepts a submission
    #[must_use]
    pub const fn creation_enabled(&self) -> bool {
        self.placeholder.is_none()
    }

    /// Records matching the current filter, in display order
    #[must_use]
    pub fn visible(&self) -> Vec<&Todo> {
        filter::visible(&self.todos, self.filter)
    }

    /// Number of records not completed
    #[must_use]
    pub fn items_left(&self) -> usize {
        filter::items_left(&self.todos)
    }

    /// Whether *Clear completed* has anything to do
    #[must_use]
    pub fn has_completed(&self) -> bool {
        filter::has_completed(&self.todos)
    }

    /// Whether every record is completed (false for an empty list)
    #[must_use]
    pub fn all_completed(&self) -> bool {
        filter::all_completed(&self.todos)
    }

    /// Drops per-record marks of a record that no longer exists
    pub(crate) fn forget(&mut self, id: TodoId) {
        self.pending.remove(&id);
        self.optimistic.remove(&id);
        if self.editing.as_ref().is_some_and(|e| e.id == id) {
            self.editing = None;
        }
    }
}

/// Actions representing user commands and remote results
///
/// Commands come from the view; results are produced by the effects the
/// reducer returns for those commands.
#[derive(Clone, Debug, PartialEq)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: List all records of the user
    Load,

    /// Command: Update the new-todo input
    SetDraft {
        /// Input content
        title: String,
    },

    /// Command: Create a record (optimistic placeholder first)
    Create {
        /// Raw title; trimmed before use
        title: String,
    },

    /// Command: Enter edit mode on a record
    StartEditing {
        /// Record to edit
        id: TodoId,
    },

    /// Command: Update the edit field
    EditDraft {
        /// Edit field content
        title: String,
    },

    /// Command: Leave edit mode without saving
    CancelEditing,

    /// Command: Save a new title (empty title deletes)
    Rename {
        /// Record to rename
        id: TodoId,
        /// Raw new title
        title: String,
    },

    /// Command: Flip `completed` of one record
    Toggle {
        /// Record to toggle
        id: TodoId,
    },

    /// Command: Delete one record
    Delete {
        /// Record to delete
        id: TodoId,
    },

    /// Command: Delete every completed record
    ClearCompleted,

    /// Command: Complete everything, or un-complete everything if all are done
    ToggleAll,

    /// Command: Change the status filter
    SelectFilter {
        /// New selection
        filter: StatusFilter,
    },

    /// Command: Show a notice (empty message dismisses)
    ShowNotice {
        /// Notice text
        message: String,
    },

    /// Command: Close the notice
    DismissNotice,

    // ========== Results ==========
    /// Result: Listing succeeded
    Loaded {
        /// Records of the user
        todos: Vec<Todo>,
    },

    /// Result: Listing failed
    LoadFailed {
        /// Cause
        error: ApiError,
    },

    /// Result: Create succeeded
    Created {
        /// Persisted record with its assigned id
        todo: Todo,
    },

    /// Result: Create failed
    CreateFailed {
        /// Cause
        error: ApiError,
    },

    /// Result: Rename succeeded
    Renamed {
        /// Updated record
        todo: Todo,
    },

    /// Result: Rename failed
    RenameFailed {
        /// Record that was being renamed
        id: TodoId,
        /// Cause
        error: ApiError,
    },

    /// Result: Toggle succeeded
    Toggled {
        /// Updated record
        todo: Todo,
    },

    /// Result: Toggle failed
    ToggleFailed {
        /// Record that was being toggled
        id: TodoId,
        /// Cause
        error: ApiError,
    },

    /// Result: Delete succeeded
    Deleted {
        /// Removed record
        id: TodoId,
    },

    /// Result: Delete failed
    DeleteFailed {
        /// Record that was kept
        id: TodoId,
        /// Cause
        error: ApiError,
    },

    /// Result: Every delete of a *Clear completed* batch settled
    ClearCompletedSettled {
        /// One entry per targeted record, in request order
        outcomes: Vec<Settled<TodoId, ()>>,
    },

    /// Result: Every update of a *Toggle all* batch settled
    ToggleAllSettled {
        /// One entry per request (the record with its requested value), in request order
        outcomes: Vec<Settled<Todo, Todo>>,
    },

    /// Timer: a notice reached the end of its lifetime
    NoticeExpired {
        /// Generation of the notice the timer was started for
        generation: u64,
    },
}
