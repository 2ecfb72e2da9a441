//! HTTP implementation of [`TodoApi`]

use crate::api::TodoApi;
use crate::error::ApiError;
use crate::types::{Todo, TodoId, TodoPayload, UserId};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// REST client for the todo resource
#[derive(Clone, Debug)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    /// Create a client for the resource rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: TodoId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }

    /// Turns transport errors and non-2xx answers into rejections
    async fn check(result: Result<Response, reqwest::Error>) -> Result<Response, ApiError> {
        let response = result.map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self, user_id: UserId) -> Result<Vec<Todo>, ApiError> {
        tracing::debug!(%user_id, "GET /todos");
        let response = Self::check(
            self.client
                .get(self.todos_url())
                .query(&[("userId", user_id.get())])
                .send()
                .await,
        )
        .await?;

        Self::decode(response).await
    }

    async fn create(&self, payload: TodoPayload) -> Result<Todo, ApiError> {
        tracing::debug!(title = %payload.title, "POST /todos");
        let response = Self::check(
            self.client
                .post(self.todos_url())
                .json(&payload)
                .send()
                .await,
        )
        .await?;

        Self::decode(response).await
    }

    async fn update(&self, id: TodoId, payload: TodoPayload) -> Result<Todo, ApiError> {
        tracing::debug!(%id, "PATCH /todos/{id}");
        let response = Self::check(
            self.client
                .patch(self.todo_url(id))
                .json(&payload)
                .send()
                .await,
        )
        .await?;

        Self::decode(response).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        tracing::debug!(%id, "DELETE /todos/{id}");
        Self::check(self.client.delete(self.todo_url(id)).send().await).await?;
        Ok(())
    }
}
