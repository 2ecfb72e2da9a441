//! Todo reducer: optimistic updates and reconciliation.
//!
//! Commands validate against the current state, apply whatever is shown
//! before the server answers (the create placeholder, the flipped toggle,
//! pending marks) and return the remote call as an effect. The call's
//! outcome comes back as a result action, which commits or reverts.
//!
//! Rejections never escape the effect: every call resolves to a result
//! action, and every failure raises a notice with a 3-second expiry timer.

use crate::api::TodoApi;
use crate::batch::{self, settle_all};
use crate::notice::{
    ADD_FAILED, DELETE_FAILED, EMPTY_TITLE, LOAD_FAILED, NOTICE_TTL, UPDATE_FAILED,
};
use crate::types::{Editing, Todo, TodoAction, TodoId, TodoState};
use std::sync::Arc;
use todo_sync_core::effect::Effect;
use todo_sync_core::reducer::Reducer;
use todo_sync_core::{async_effect, delay, smallvec, SmallVec};

/// Environment for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Remote todo resource
    pub api: Arc<dyn TodoApi>,
}

impl TodoEnvironment {
    /// Creates an environment around `api`
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>) -> Self {
        Self { api }
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new todo reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Raises `message` and schedules its expiry
    fn notify(state: &mut TodoState, message: &str) -> Effect<TodoAction> {
        match state.notice.raise(message) {
            Some(generation) => delay! {
                duration: NOTICE_TTL,
                action: TodoAction::NoticeExpired { generation }
            },
            None => Effect::None,
        }
    }

    /// Record `id` if it exists and has no call in flight
    fn available(state: &TodoState, id: TodoId, command: &str) -> Option<Todo> {
        let Some(todo) = state.get(id) else {
            tracing::warn!(%id, command, "Ignoring command: no such todo");
            return None;
        };

        if state.is_pending(id) {
            tracing::warn!(%id, command, "Ignoring command: a call is already in flight");
            return None;
        }

        Some(todo.clone())
    }

    /// Replaces the stored record with the server's answer
    fn commit(state: &mut TodoState, todo: Todo) {
        let id = todo.id;
        if let Some(slot) = state.get_mut(id) {
            *slot = todo;
        } else {
            tracing::debug!(%id, "Confirmed todo is no longer listed");
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::Load => {
                if state.loading {
                    tracing::debug!("Listing already in flight");
                    return smallvec![Effect::None];
                }

                state.loading = true;
                let api = Arc::clone(&env.api);
                let user_id = state.user_id;

                smallvec![async_effect! {
                    match api.list(user_id).await {
                        Ok(todos) => Some(TodoAction::Loaded { todos }),
                        Err(error) => Some(TodoAction::LoadFailed { error }),
                    }
                }]
            },

            TodoAction::SetDraft { title } => {
                state.draft = title;
                smallvec![Effect::None]
            },

            TodoAction::Create { title } => {
                if !state.creation_enabled() {
                    tracing::warn!("Ignoring create: another create is in flight");
                    return smallvec![Effect::None];
                }

                let title = title.trim();
                if title.is_empty() {
                    return smallvec![Self::notify(state, EMPTY_TITLE)];
                }

                let placeholder = Todo::placeholder(title, state.user_id);
                let payload = placeholder.payload();
                state.placeholder = Some(placeholder);
                let api = Arc::clone(&env.api);

                smallvec![async_effect! {
                    match api.create(payload).await {
                        Ok(todo) => Some(TodoAction::Created { todo }),
                        Err(error) => Some(TodoAction::CreateFailed { error }),
                    }
                }]
            },

            TodoAction::StartEditing { id } => {
                if let Some(todo) = Self::available(state, id, "edit") {
                    state.editing = Some(Editing {
                        id,
                        draft: todo.title,
                    });
                }
                smallvec![Effect::None]
            },

            TodoAction::EditDraft { title } => {
                match state.editing.as_mut() {
                    Some(editing) => editing.draft = title,
                    None => tracing::debug!("Ignoring edit draft: not editing"),
                }
                smallvec![Effect::None]
            },

            TodoAction::CancelEditing => {
                state.editing = None;
                smallvec![Effect::None]
            },

            TodoAction::Rename { id, title } => {
                let Some(todo) = Self::available(state, id, "rename") else {
                    return smallvec![Effect::None];
                };

                let title = title.trim();
                if title == todo.title {
                    state.editing = None;
                    return smallvec![Effect::None];
                }

                if title.is_empty() {
                    return self.reduce(state, TodoAction::Delete { id }, env);
                }

                state.pending.insert(id);
                let payload = todo.with_title(title).payload();
                let api = Arc::clone(&env.api);

                smallvec![async_effect! {
                    match api.update(id, payload).await {
                        Ok(todo) => Some(TodoAction::Renamed { todo }),
                        Err(error) => Some(TodoAction::RenameFailed { id, error }),
                    }
                }]
            },

            TodoAction::Toggle { id } => {
                let Some(todo) = Self::available(state, id, "toggle") else {
                    return smallvec![Effect::None];
                };

                let completed = !state.displayed_completed(&todo);
                state.optimistic.insert(id, completed);
                state.pending.insert(id);
                let payload = todo.with_completed(completed).payload();
                let api = Arc::clone(&env.api);

                smallvec![async_effect! {
                    match api.update(id, payload).await {
                        Ok(todo) => Some(TodoAction::Toggled { todo }),
                        Err(error) => Some(TodoAction::ToggleFailed { id, error }),
                    }
                }]
            },

            TodoAction::Delete { id } => {
                if Self::available(state, id, "delete").is_none() {
                    return smallvec![Effect::None];
                }

                state.pending.insert(id);
                let api = Arc::clone(&env.api);

                smallvec![async_effect! {
                    match api.delete(id).await {
                        Ok(()) => Some(TodoAction::Deleted { id }),
                        Err(error) => Some(TodoAction::DeleteFailed { id, error }),
                    }
                }]
            },

            TodoAction::ClearCompleted => {
                let targets = batch::clear_completed_targets(state);
                if targets.is_empty() {
                    tracing::debug!("Nothing to clear");
                    return smallvec![Effect::None];
                }

                tracing::debug!(count = targets.len(), "Clearing completed todos");
                state.pending.extend(targets.iter().copied());
                let api = Arc::clone(&env.api);

                smallvec![async_effect! {
                    let outcomes = settle_all(targets, |&id| api.delete(id)).await;
                    Some(TodoAction::ClearCompletedSettled { outcomes })
                }]
            },

            TodoAction::ToggleAll => {
                let targets = batch::toggle_all_targets(state);
                if targets.is_empty() {
                    tracing::debug!("Nothing to toggle");
                    return smallvec![Effect::None];
                }

                tracing::debug!(count = targets.len(), "Toggling todos");
                state.pending.extend(targets.iter().map(|t| t.id));
                let api = Arc::clone(&env.api);

                smallvec![async_effect! {
                    let outcomes =
                        settle_all(targets, |todo: &Todo| api.update(todo.id, todo.payload())).await;
                    Some(TodoAction::ToggleAllSettled { outcomes })
                }]
            },

            TodoAction::SelectFilter { filter } => {
                state.filter = filter;
                smallvec![Effect::None]
            },

            TodoAction::ShowNotice { message } => smallvec![Self::notify(state, &message)],

            TodoAction::DismissNotice => {
                state.notice.dismiss();
                smallvec![Effect::None]
            },

            // ========== Results ==========
            TodoAction::Loaded { mut todos } => {
                let listed = todos.len();
                todos.retain(|t| !t.id.is_placeholder());
                if todos.len() < listed {
                    tracing::warn!(
                        dropped = listed - todos.len(),
                        "Listing held records without an id"
                    );
                }
                tracing::info!(count = todos.len(), "Todos loaded");
                state.loading = false;
                state.todos = todos;

                let gone: Vec<TodoId> = state
                    .pending
                    .iter()
                    .copied()
                    .chain(state.optimistic.keys().copied())
                    .chain(state.editing.as_ref().map(|e| e.id))
                    .filter(|id| state.get(*id).is_none())
                    .collect();
                for id in gone {
                    state.forget(id);
                }
                smallvec![Effect::None]
            },

            TodoAction::LoadFailed { error } => {
                tracing::warn!(%error, "Listing rejected");
                state.loading = false;
                smallvec![Self::notify(state, LOAD_FAILED)]
            },

            TodoAction::Created { todo } if todo.id.is_placeholder() => {
                tracing::warn!(title = %todo.title, "Server answered create without an id");
                state.placeholder = None;
                smallvec![Self::notify(state, ADD_FAILED)]
            },

            TodoAction::Created { todo } => {
                tracing::debug!(id = %todo.id, "Todo created");
                state.todos.push(todo);
                state.draft.clear();
                state.placeholder = None;
                smallvec![Effect::None]
            },

            TodoAction::CreateFailed { error } => {
                tracing::warn!(%error, "Create rejected");
                state.placeholder = None;
                smallvec![Self::notify(state, ADD_FAILED)]
            },

            TodoAction::Renamed { todo } => {
                let id = todo.id;
                state.pending.remove(&id);
                Self::commit(state, todo);
                if state.editing.as_ref().is_some_and(|e| e.id == id) {
                    state.editing = None;
                }
                smallvec![Effect::None]
            },

            TodoAction::RenameFailed { id, error } => {
                tracing::warn!(%id, %error, "Rename rejected");
                state.pending.remove(&id);
                state.optimistic.remove(&id);
                smallvec![Self::notify(state, UPDATE_FAILED)]
            },

            TodoAction::Toggled { todo } => {
                let id = todo.id;
                state.pending.remove(&id);
                state.optimistic.remove(&id);
                Self::commit(state, todo);
                smallvec![Effect::None]
            },

            TodoAction::ToggleFailed { id, error } => {
                tracing::warn!(%id, %error, "Toggle rejected");
                state.pending.remove(&id);
                state.optimistic.remove(&id);
                smallvec![Self::notify(state, UPDATE_FAILED)]
            },

            TodoAction::Deleted { id } => {
                state.todos.retain(|t| t.id != id);
                state.forget(id);
                smallvec![Effect::None]
            },

            TodoAction::DeleteFailed { id, error } => {
                tracing::warn!(%id, %error, "Delete rejected");
                state.pending.remove(&id);
                smallvec![Self::notify(state, DELETE_FAILED)]
            },

            TodoAction::ClearCompletedSettled { outcomes } => {
                let mut failed = 0_usize;
                for outcome in outcomes {
                    let id = outcome.target;
                    match outcome.result {
                        Ok(()) => {
                            state.todos.retain(|t| t.id != id);
                            state.forget(id);
                        },
                        Err(error) => {
                            tracing::warn!(%id, %error, "Delete rejected");
                            state.pending.remove(&id);
                            failed += 1;
                        },
                    }
                }

                if failed == 0 {
                    smallvec![Effect::None]
                } else {
                    smallvec![Self::notify(state, DELETE_FAILED)]
                }
            },

            TodoAction::ToggleAllSettled { outcomes } => {
                let mut failed = 0_usize;
                for outcome in outcomes {
                    let id = outcome.target.id;
                    state.pending.remove(&id);
                    match outcome.result {
                        Ok(_) => {
                            if let Some(todo) = state.get_mut(id) {
                                todo.completed = outcome.target.completed;
                            }
                        },
                        Err(error) => {
                            tracing::warn!(%id, %error, "Update rejected");
                            failed += 1;
                        },
                    }
                }

                if failed == 0 {
                    smallvec![Effect::None]
                } else {
                    smallvec![Self::notify(state, UPDATE_FAILED)]
                }
            },

            TodoAction::NoticeExpired { generation } => {
                if state.notice.expire(generation) {
                    tracing::trace!(generation, "Notice expired");
                }
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::StatusFilter;
    use crate::memory::{ApiCall, InMemoryTodoApi};
    use crate::types::{TodoPayload, UserId};
    use todo_sync_testing::{assertions, run_futures, ReducerTest};

    const USER: UserId = UserId::new(2351);

    fn todo(id: u64, title: &str, completed: bool) -> Todo {
        Todo {
            id: TodoId::new(id),
            title: title.to_string(),
            completed,
            user_id: USER,
        }
    }

    fn seeded() -> Vec<Todo> {
        vec![
            todo(1, "Buy milk", false),
            todo(2, "Walk dog", true),
            todo(3, "Read book", false),
        ]
    }

    fn env(api: &InMemoryTodoApi) -> TodoEnvironment {
        TodoEnvironment::new(Arc::new(api.clone()))
    }

    /// Resolve every remote call in `effects` and reduce the results
    async fn settle(
        state: &mut TodoState,
        effects: Vec<Effect<TodoAction>>,
        env: &TodoEnvironment,
    ) -> Vec<Effect<TodoAction>> {
        let mut follow_ups = Vec::new();
        for action in run_futures(effects).await {
            follow_ups.extend(TodoReducer::new().reduce(state, action, env));
        }
        follow_ups
    }

    #[tokio::test]
    async fn load_replaces_collection() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let env = env(&api);

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(TodoState::new(USER))
            .when_action(TodoAction::Load)
            .then_state(|s| assert!(s.loading))
            .then_effects(assertions::assert_has_future_effect)
            .run_and_take();

        settle(&mut state, effects, &env).await;

        assert!(!state.loading);
        assert_eq!(state.todos, seeded());
        assert_eq!(api.calls(), vec![ApiCall::List(USER)]);
    }

    #[tokio::test]
    async fn load_failure_keeps_collection_and_raises_notice() {
        let api = InMemoryTodoApi::with_todos(seeded());
        api.fail_list();
        let env = env(&api);

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(TodoState::new(USER))
            .when_action(TodoAction::Load)
            .run_and_take();

        let follow_ups = settle(&mut state, effects, &env).await;

        assert!(state.todos.is_empty());
        assert!(!state.loading);
        assert_eq!(state.notice.message(), Some(LOAD_FAILED));
        assert_eq!(
            assertions::delayed_actions(&follow_ups),
            vec![&TodoAction::NoticeExpired {
                generation: state.notice.generation()
            }]
        );
    }

    #[test]
    fn load_drops_records_without_an_id() {
        let api = InMemoryTodoApi::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(env(&api))
            .given_state(TodoState::new(USER))
            .when_action(TodoAction::Loaded {
                todos: vec![todo(0, "orphan", false), todo(1, "Buy milk", false)],
            })
            .then_state(|s| {
                let ids: Vec<u64> = s.todos.iter().map(|t| t.id.get()).collect();
                assert_eq!(ids, vec![1]);
            })
            .run();
    }

    #[test]
    fn load_forgets_marks_of_unlisted_records() {
        let api = InMemoryTodoApi::new();
        let (kept, gone) = (TodoId::new(1), TodoId::new(3));
        let mut given = TodoState::new(USER).with_todos(seeded());
        given.pending.extend([kept, gone]);
        given.optimistic.insert(gone, true);
        given.editing = Some(Editing {
            id: gone,
            draft: "Read book".to_string(),
        });

        ReducerTest::new(TodoReducer::new())
            .with_env(env(&api))
            .given_state(given)
            .when_action(TodoAction::Loaded {
                todos: vec![todo(1, "Buy milk", false), todo(2, "Walk dog", true)],
            })
            .then_state(move |s| {
                assert!(s.is_pending(kept));
                assert!(!s.is_pending(gone));
                assert!(s.optimistic.is_empty());
                assert!(s.editing.is_none());
            })
            .run();
    }

    #[test]
    fn blank_title_is_rejected_without_a_call() {
        let api = InMemoryTodoApi::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(env(&api))
            .given_state(TodoState::new(USER))
            .when_action(TodoAction::Create {
                title: "   ".to_string(),
            })
            .then_state(|s| {
                assert_eq!(s.notice.message(), Some(EMPTY_TITLE));
                assert!(s.placeholder.is_none());
                assert!(s.todos.is_empty());
            })
            .then_effects(assertions::assert_no_future_effect)
            .then_effects(assertions::assert_has_delay_effect)
            .run();

        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn create_shows_placeholder_then_appends_record() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let env = env(&api);
        let mut given = TodoState::new(USER).with_todos(seeded());
        given.draft = "  Water plants ".to_string();

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(given)
            .when_action(TodoAction::Create {
                title: "  Water plants ".to_string(),
            })
            .then_state(|s| {
                let placeholder = s.placeholder.as_ref().map(|p| (p.id, p.title.as_str()));
                assert_eq!(placeholder, Some((TodoId::PLACEHOLDER, "Water plants")));
                assert!(!s.creation_enabled());
            })
            .run_and_take();

        settle(&mut state, effects, &env).await;

        assert!(state.placeholder.is_none());
        assert!(state.creation_enabled());
        assert!(state.draft.is_empty());
        assert_eq!(state.todos.last(), Some(&todo(4, "Water plants", false)));
        assert_eq!(
            api.calls(),
            vec![ApiCall::Create(TodoPayload {
                title: "Water plants".to_string(),
                completed: false,
                user_id: USER,
            })]
        );
    }

    #[tokio::test]
    async fn failed_create_drops_placeholder_and_keeps_draft() {
        let api = InMemoryTodoApi::new();
        api.fail_create();
        let env = env(&api);
        let mut given = TodoState::new(USER);
        given.draft = "Water plants".to_string();

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(given)
            .when_action(TodoAction::Create {
                title: "Water plants".to_string(),
            })
            .run_and_take();

        settle(&mut state, effects, &env).await;

        assert!(state.placeholder.is_none());
        assert!(state.todos.is_empty());
        assert!(state.creation_enabled());
        assert_eq!(state.draft, "Water plants");
        assert_eq!(state.notice.message(), Some(ADD_FAILED));
    }

    #[test]
    fn created_without_an_id_counts_as_failure() {
        let api = InMemoryTodoApi::new();
        let mut given = TodoState::new(USER).with_todos(seeded());
        given.placeholder = Some(Todo::placeholder("Water plants", USER));
        given.draft = "Water plants".to_string();

        ReducerTest::new(TodoReducer::new())
            .with_env(env(&api))
            .given_state(given)
            .when_action(TodoAction::Created {
                todo: todo(0, "Water plants", false),
            })
            .then_state(|s| {
                assert_eq!(s.todos, seeded());
                assert!(s.placeholder.is_none());
                assert_eq!(s.draft, "Water plants");
                assert_eq!(s.notice.message(), Some(ADD_FAILED));
            })
            .then_effects(assertions::assert_has_delay_effect)
            .run();
    }

    #[test]
    fn create_while_placeholder_exists_is_ignored() {
        let api = InMemoryTodoApi::new();
        let mut given = TodoState::new(USER);
        given.placeholder = Some(Todo::placeholder("first", USER));

        ReducerTest::new(TodoReducer::new())
            .with_env(env(&api))
            .given_state(given)
            .when_action(TodoAction::Create {
                title: "second".to_string(),
            })
            .then_state(|s| {
                assert_eq!(s.placeholder.as_ref().map(|p| p.title.as_str()), Some("first"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn toggle_flips_display_at_once_and_commits() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let env = env(&api);
        let id = TodoId::new(1);

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(TodoState::new(USER).with_todos(seeded()))
            .when_action(TodoAction::Toggle { id })
            .then_state(move |s| {
                let stored = s.get(id).cloned().unwrap_or_else(|| todo(0, "", false));
                assert!(s.displayed_completed(&stored));
                assert!(!stored.completed);
                assert!(s.is_pending(id));
            })
            .run_and_take();

        settle(&mut state, effects, &env).await;

        assert_eq!(state.get(id).map(|t| t.completed), Some(true));
        assert!(state.optimistic.is_empty());
        assert!(state.pending.is_empty());
    }

    #[tokio::test]
    async fn failed_toggle_reverts_display() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let id = TodoId::new(2);
        api.fail_update(id);
        let env = env(&api);

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(TodoState::new(USER).with_todos(seeded()))
            .when_action(TodoAction::Toggle { id })
            .run_and_take();

        settle(&mut state, effects, &env).await;

        let stored = state.get(id).cloned();
        assert_eq!(stored.as_ref().map(|t| t.completed), Some(true));
        assert_eq!(stored.map(|t| state.displayed_completed(&t)), Some(true));
        assert!(!state.is_pending(id));
        assert_eq!(state.notice.message(), Some(UPDATE_FAILED));
    }

    #[test]
    fn mutations_on_pending_records_are_ignored() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let id = TodoId::new(1);
        let commands = [
            TodoAction::Toggle { id },
            TodoAction::Delete { id },
            TodoAction::Rename {
                id,
                title: "Other".to_string(),
            },
        ];

        for command in commands {
            let mut given = TodoState::new(USER).with_todos(seeded());
            given.pending.insert(id);

            ReducerTest::new(TodoReducer::new())
                .with_env(env(&api))
                .given_state(given)
                .when_action(command)
                .then_state(|s| assert!(s.optimistic.is_empty()))
                .then_effects(assertions::assert_no_effects)
                .run();
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_record_and_leaves_edit_mode() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let env = env(&api);
        let id = TodoId::new(3);
        let mut given = TodoState::new(USER).with_todos(seeded());
        given.editing = Some(Editing {
            id,
            draft: "Read".to_string(),
        });

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(given)
            .when_action(TodoAction::Delete { id })
            .then_state(move |s| {
                assert!(s.get(id).is_some());
                assert!(s.is_pending(id));
            })
            .run_and_take();

        settle(&mut state, effects, &env).await;

        assert!(state.get(id).is_none());
        assert!(state.editing.is_none());
        assert!(state.pending.is_empty());
    }

    #[tokio::test]
    async fn failed_delete_keeps_record() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let id = TodoId::new(1);
        api.fail_delete(id);
        let env = env(&api);

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(TodoState::new(USER).with_todos(seeded()))
            .when_action(TodoAction::Delete { id })
            .run_and_take();

        settle(&mut state, effects, &env).await;

        assert_eq!(state.count(), 3);
        assert!(!state.is_pending(id));
        assert_eq!(state.notice.message(), Some(DELETE_FAILED));
    }

    #[test]
    fn rename_to_same_title_only_leaves_edit_mode() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let id = TodoId::new(1);
        let mut given = TodoState::new(USER).with_todos(seeded());
        given.editing = Some(Editing {
            id,
            draft: "Buy milk ".to_string(),
        });

        ReducerTest::new(TodoReducer::new())
            .with_env(env(&api))
            .given_state(given)
            .when_action(TodoAction::Rename {
                id,
                title: "Buy milk ".to_string(),
            })
            .then_state(|s| assert!(s.editing.is_none()))
            .then_effects(assertions::assert_no_effects)
            .run();

        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn rename_to_blank_deletes() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let env = env(&api);
        let id = TodoId::new(1);

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(TodoState::new(USER).with_todos(seeded()))
            .when_action(TodoAction::Rename {
                id,
                title: "  ".to_string(),
            })
            .run_and_take();

        settle(&mut state, effects, &env).await;

        assert!(state.get(id).is_none());
        assert_eq!(api.calls(), vec![ApiCall::Delete(id)]);
    }

    #[tokio::test]
    async fn rename_success_replaces_record_in_place() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let env = env(&api);
        let id = TodoId::new(1);
        let mut given = TodoState::new(USER).with_todos(seeded());
        given.editing = Some(Editing {
            id,
            draft: "Buy oat milk".to_string(),
        });

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(given)
            .when_action(TodoAction::Rename {
                id,
                title: " Buy oat milk ".to_string(),
            })
            .run_and_take();

        settle(&mut state, effects, &env).await;

        assert_eq!(state.todos[0], todo(1, "Buy oat milk", false));
        assert!(state.editing.is_none());
        assert!(!state.is_pending(id));
    }

    #[tokio::test]
    async fn failed_rename_keeps_edit_mode() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let id = TodoId::new(1);
        api.fail_update(id);
        let env = env(&api);
        let mut given = TodoState::new(USER).with_todos(seeded());
        given.editing = Some(Editing {
            id,
            draft: "Buy oat milk".to_string(),
        });

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(given)
            .when_action(TodoAction::Rename {
                id,
                title: "Buy oat milk".to_string(),
            })
            .run_and_take();

        settle(&mut state, effects, &env).await;

        assert_eq!(state.todos[0].title, "Buy milk");
        assert_eq!(state.editing.as_ref().map(|e| e.id), Some(id));
        assert_eq!(state.notice.message(), Some(UPDATE_FAILED));
    }

    #[test]
    fn editing_commands_touch_only_edit_mode() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let env = env(&api);
        let reducer = TodoReducer::new();
        let id = TodoId::new(2);
        let mut state = TodoState::new(USER).with_todos(seeded());

        reducer.reduce(&mut state, TodoAction::StartEditing { id }, &env);
        assert_eq!(
            state.editing,
            Some(Editing {
                id,
                draft: "Walk dog".to_string()
            })
        );

        reducer.reduce(
            &mut state,
            TodoAction::EditDraft {
                title: "Walk the dog".to_string(),
            },
            &env,
        );
        assert_eq!(state.editing.as_ref().map(|e| e.draft.as_str()), Some("Walk the dog"));

        reducer.reduce(&mut state, TodoAction::CancelEditing, &env);
        assert!(state.editing.is_none());
        assert_eq!(state.todos, seeded());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn clear_completed_keeps_failed_targets() {
        let mut todos = seeded();
        todos.push(todo(4, "Pay rent", true));
        let api = InMemoryTodoApi::with_todos(todos.clone());
        api.fail_delete(TodoId::new(4));
        let env = env(&api);

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(TodoState::new(USER).with_todos(todos))
            .when_action(TodoAction::ClearCompleted)
            .then_state(|s| {
                assert!(s.is_pending(TodoId::new(2)));
                assert!(s.is_pending(TodoId::new(4)));
                assert!(!s.is_pending(TodoId::new(1)));
            })
            .then_effects(|effects| assert_eq!(assertions::count_futures(effects), 1))
            .run_and_take();

        let follow_ups = settle(&mut state, effects, &env).await;

        let ids: Vec<u64> = state.todos.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert!(state.pending.is_empty());
        assert_eq!(state.notice.message(), Some(DELETE_FAILED));
        assert_eq!(assertions::delayed_actions(&follow_ups).len(), 1);
    }

    #[test]
    fn clear_completed_without_completed_records_is_a_no_op() {
        let api = InMemoryTodoApi::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(env(&api))
            .given_state(TodoState::new(USER).with_todos(vec![todo(1, "a", false)]))
            .when_action(TodoAction::ClearCompleted)
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn toggle_all_completes_every_record() {
        let api = InMemoryTodoApi::with_todos(seeded());
        let env = env(&api);

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(TodoState::new(USER).with_todos(seeded()))
            .when_action(TodoAction::ToggleAll)
            .run_and_take();

        settle(&mut state, effects, &env).await;

        assert!(state.all_completed());
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn toggle_all_uncompletes_when_everything_is_done() {
        let todos = vec![todo(1, "a", true), todo(2, "b", true)];
        let api = InMemoryTodoApi::with_todos(todos.clone());
        api.fail_update(TodoId::new(2));
        let env = env(&api);

        let (mut state, effects) = ReducerTest::new(TodoReducer::new())
            .with_env(env.clone())
            .given_state(TodoState::new(USER).with_todos(todos))
            .when_action(TodoAction::ToggleAll)
            .run_and_take();

        settle(&mut state, effects, &env).await;

        assert_eq!(state.get(TodoId::new(1)).map(|t| t.completed), Some(false));
        assert_eq!(state.get(TodoId::new(2)).map(|t| t.completed), Some(true));
        assert_eq!(state.notice.message(), Some(UPDATE_FAILED));
    }

    #[test]
    fn select_filter_has_no_remote_effect() {
        let api = InMemoryTodoApi::with_todos(seeded());

        ReducerTest::new(TodoReducer::new())
            .with_env(env(&api))
            .given_state(TodoState::new(USER).with_todos(seeded()))
            .when_action(TodoAction::SelectFilter {
                filter: StatusFilter::Completed,
            })
            .then_state(|s| {
                let visible: Vec<u64> = s.visible().iter().map(|t| t.id.get()).collect();
                assert_eq!(visible, vec![2]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn notices_expire_only_for_their_own_generation() {
        let api = InMemoryTodoApi::new();
        let env = env(&api);
        let reducer = TodoReducer::new();
        let mut state = TodoState::new(USER);

        let first = reducer.reduce(
            &mut state,
            TodoAction::ShowNotice {
                message: "first".to_string(),
            },
            &env,
        );
        let first_expiry = assertions::delayed_actions(&first)[0].clone();

        reducer.reduce(
            &mut state,
            TodoAction::ShowNotice {
                message: "second".to_string(),
            },
            &env,
        );
        reducer.reduce(&mut state, first_expiry, &env);
        assert_eq!(state.notice.message(), Some("second"));

        reducer.reduce(&mut state, TodoAction::DismissNotice, &env);
        assert_eq!(state.notice.message(), None);
    }

    #[test]
    fn empty_notice_dismisses_without_a_timer() {
        let api = InMemoryTodoApi::new();
        let mut given = TodoState::new(USER);
        given.notice.raise(ADD_FAILED);

        ReducerTest::new(TodoReducer::new())
            .with_env(env(&api))
            .given_state(given)
            .when_action(TodoAction::ShowNotice {
                message: String::new(),
            })
            .then_state(|s| assert_eq!(s.notice.message(), None))
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
