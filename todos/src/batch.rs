//! Batch operation coordinator.
//!
//! A bulk action (clear completed, toggle all) becomes one independent
//! remote call per target. All calls run concurrently and are joined with a
//! settle-all join: every call's outcome is kept, a rejection never cancels
//! or hides the others. Each outcome stays paired with the target that
//! produced it, so reconciliation never has to re-read mutable state to
//! find out which record a result belongs to.

use crate::error::ApiError;
use crate::types::{Todo, TodoId, TodoState};
use futures::future::join_all;
use std::future::Future;

/// Outcome of one request of a batch, paired with its target
#[derive(Clone, Debug, PartialEq)]
pub struct Settled<T, R> {
    /// What the request was issued for
    pub target: T,
    /// What the remote resource answered
    pub result: Result<R, ApiError>,
}

impl<T, R> Settled<T, R> {
    /// Whether the request succeeded
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Issue `call` for every target concurrently and wait for all of them
///
/// The returned vector has one entry per target, in target order,
/// regardless of the order in which the calls finished.
pub async fn settle_all<T, R, F, Fut>(targets: Vec<T>, mut call: F) -> Vec<Settled<T, R>>
where
    F: FnMut(&T) -> Fut,
    Fut: Future<Output = Result<R, ApiError>>,
{
    let requests: Vec<Fut> = targets.iter().map(&mut call).collect();
    let results = join_all(requests).await;

    targets
        .into_iter()
        .zip(results)
        .map(|(target, result)| Settled { target, result })
        .collect()
}

/// Records *Clear completed* deletes: every completed record not already busy
#[must_use]
pub fn clear_completed_targets(state: &TodoState) -> Vec<TodoId> {
    state
        .todos
        .iter()
        .filter(|t| t.completed && !state.is_pending(t.id))
        .map(|t| t.id)
        .collect()
}

/// Requests *Toggle all* issues, as records carrying the requested value
///
/// If every record is completed, all of them are un-completed; otherwise
/// every record not yet completed is completed. Busy records are skipped.
#[must_use]
pub fn toggle_all_targets(state: &TodoState) -> Vec<Todo> {
    let uncomplete = state.all_completed();

    state
        .todos
        .iter()
        .filter(|t| uncomplete || !t.completed)
        .filter(|t| !state.is_pending(t.id))
        .map(|t| t.with_completed(!t.completed))
        .collect()
}
