//! In-memory implementation of [`TodoApi`]
//!
//! Backs the binary's offline mode and the test suites. Calls can be made
//! to fail on demand and every call is recorded, so tests can assert both
//! on state and on what was sent.

use crate::api::TodoApi;
use crate::error::ApiError;
use crate::types::{Todo, TodoId, TodoPayload, UserId};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A call received by [`InMemoryTodoApi`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiCall {
    /// `GET /todos?userId=`
    List(UserId),
    /// `POST /todos`
    Create(TodoPayload),
    /// `PATCH /todos/{id}`
    Update(TodoId, TodoPayload),
    /// `DELETE /todos/{id}`
    Delete(TodoId),
}

#[derive(Debug, Default)]
struct Failures {
    list: bool,
    create: bool,
    update: BTreeSet<TodoId>,
    delete: BTreeSet<TodoId>,
}

#[derive(Debug, Default)]
struct Inner {
    todos: Vec<Todo>,
    next_id: u64,
    calls: Vec<ApiCall>,
    failures: Failures,
    latency: Duration,
}

/// Thread-safe in-memory todo resource
#[derive(Clone, Debug, Default)]
pub struct InMemoryTodoApi {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryTodoApi {
    /// Empty resource; ids start at 1
    #[must_use]
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    /// Resource seeded with `todos`; new ids continue after the largest one
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(Mutex::new(Inner {
                todos,
                next_id,
                ..Inner::default()
            })),
        }
    }

    /// Delay every call by `latency`
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = latency;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reject every listing from now on
    pub fn fail_list(&self) {
        self.lock().failures.list = true;
    }

    /// Reject every create from now on
    pub fn fail_create(&self) {
        self.lock().failures.create = true;
    }

    /// Reject updates of `id` from now on
    pub fn fail_update(&self, id: TodoId) {
        self.lock().failures.update.insert(id);
    }

    /// Reject deletes of `id` from now on
    pub fn fail_delete(&self, id: TodoId) {
        self.lock().failures.delete.insert(id);
    }

    /// Stop rejecting anything
    pub fn heal(&self) {
        self.lock().failures = Failures::default();
    }

    /// Records currently stored
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    /// Every call received so far, in arrival order
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    async fn simulate_latency(&self) {
        let latency = self.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

fn not_found(id: TodoId) -> ApiError {
    ApiError::Status {
        status: 404,
        body: format!("todo {id} not found"),
    }
}

#[async_trait]
impl TodoApi for InMemoryTodoApi {
    async fn list(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.calls.push(ApiCall::List(user_id));

        if inner.failures.list {
            return Err(ApiError::Rejected("list".to_string()));
        }

        Ok(inner
            .todos
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, payload: TodoPayload) -> Result<Todo, ApiError> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.calls.push(ApiCall::Create(payload.clone()));

        if inner.failures.create {
            return Err(ApiError::Rejected("create".to_string()));
        }

        let todo = Todo {
            id: TodoId::new(inner.next_id),
            title: payload.title,
            completed: payload.completed,
            user_id: payload.user_id,
        };
        inner.next_id += 1;
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: TodoId, payload: TodoPayload) -> Result<Todo, ApiError> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.calls.push(ApiCall::Update(id, payload.clone()));

        if inner.failures.update.contains(&id) {
            return Err(ApiError::Rejected(format!("update {id}")));
        }

        let todo = inner
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))?;
        todo.title = payload.title;
        todo.completed = payload.completed;
        todo.user_id = payload.user_id;
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.calls.push(ApiCall::Delete(id));

        if inner.failures.delete.contains(&id) {
            return Err(ApiError::Rejected(format!("delete {id}")));
        }

        let before = inner.todos.len();
        inner.todos.retain(|t| t.id != id);
        if inner.todos.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: UserId = UserId::new(7);

    fn payload(title: &str) -> TodoPayload {
        TodoPayload {
            title: title.to_string(),
            completed: false,
            user_id: USER,
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() -> Result<(), ApiError> {
        let api = InMemoryTodoApi::new();

        let first = api.create(payload("a")).await?;
        let second = api.create(payload("b")).await?;

        assert_eq!(first.id, TodoId::new(1));
        assert_eq!(second.id, TodoId::new(2));
        assert_eq!(api.list(USER).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn list_only_returns_the_users_records() -> Result<(), ApiError> {
        let other = Todo {
            id: TodoId::new(10),
            title: "not mine".to_string(),
            completed: false,
            user_id: UserId::new(8),
        };
        let api = InMemoryTodoApi::with_todos(vec![other]);
        api.create(payload("mine")).await?;

        let listed = api.list(USER).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, TodoId::new(11));
        Ok(())
    }

    #[tokio::test]
    async fn injected_failures_are_recorded_and_healable() {
        let api = InMemoryTodoApi::new();
        api.fail_create();

        assert!(api.create(payload("a")).await.is_err());
        assert_eq!(api.calls(), vec![ApiCall::Create(payload("a"))]);
        assert!(api.todos().is_empty());

        api.heal();
        assert!(api.create(payload("a")).await.is_ok());
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_are_404() {
        let api = InMemoryTodoApi::new();

        assert!(matches!(
            api.update(TodoId::new(3), payload("x")).await,
            Err(ApiError::Status { status: 404, .. })
        ));
        assert!(matches!(
            api.delete(TodoId::new(3)).await,
            Err(ApiError::Status { status: 404, .. })
        ));
    }
}
