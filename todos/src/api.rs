//! The remote todo resource, as seen by the reducer.
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | List | GET | `/todos?userId={id}` |
//! | Create | POST | `/todos` |
//! | Update | PATCH | `/todos/{id}` |
//! | Delete | DELETE | `/todos/{id}` |
//!
//! [`crate::client::HttpTodoApi`] talks to the real resource;
//! [`crate::memory::InMemoryTodoApi`] keeps everything in memory.

use crate::error::ApiError;
use crate::types::{Todo, TodoId, TodoPayload, UserId};
use async_trait::async_trait;

/// CRUD operations on the remote todo resource
///
/// Any error is a rejection; callers do not distinguish causes.
#[async_trait]
pub trait TodoApi: Send + Sync {
    /// Every record owned by `user_id`
    async fn list(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError>;

    /// Persist a new record; the answer carries the assigned id
    async fn create(&self, payload: TodoPayload) -> Result<Todo, ApiError>;

    /// Replace title, completion and owner of record `id`
    async fn update(&self, id: TodoId, payload: TodoPayload) -> Result<Todo, ApiError>;

    /// Remove record `id`
    async fn delete(&self, id: TodoId) -> Result<(), ApiError>;
}
