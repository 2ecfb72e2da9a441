//! Status filter and footer derivations.
//!
//! Everything here is a pure function of the collection (and the filter
//! selection); nothing mutates the records.

use crate::types::Todo;
use thiserror::Error;

/// Tri-state status filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Every record
    #[default]
    All,
    /// Records not completed
    Active,
    /// Completed records
    Completed,
}

impl StatusFilter {
    /// All selections in footer order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether a record with the given completion flag passes the filter
    #[must_use]
    pub const fn matches(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }

    /// Footer label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

/// Unknown filter name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown filter {0:?} (expected all, active or completed)")]
pub struct ParseFilterError(String);

impl std::str::FromStr for StatusFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// Records passing `filter`, in collection order
#[must_use]
pub fn visible(todos: &[Todo], filter: StatusFilter) -> Vec<&Todo> {
    todos.iter().filter(|t| filter.matches(t.completed)).collect()
}

/// Number of records not completed ("N items left")
#[must_use]
pub fn items_left(todos: &[Todo]) -> usize {
    todos.iter().filter(|t| !t.completed).count()
}

/// Whether at least one record is completed
#[must_use]
pub fn has_completed(todos: &[Todo]) -> bool {
    todos.iter().any(|t| t.completed)
}

/// Whether the list is non-empty and every record is completed
#[must_use]
pub fn all_completed(todos: &[Todo]) -> bool {
    !todos.is_empty() && todos.iter().all(|t| t.completed)
}
