//! # todos
//!
//! Terminal client for a per-user todo list kept on a remote REST resource.
//!
//! Every change shows up locally before the server confirms it: a new todo
//! appears as a placeholder, a toggle flips at once, and records with a call
//! in flight are marked busy. When the server answers, the reducer commits
//! or reverts and raises a short-lived notice on failure. Bulk actions
//! (*Clear completed*, *Toggle all*) fan out into one call per record and
//! reconcile each outcome on its own.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use todos::{InMemoryTodoApi, TodoAction, TodoEnvironment, TodoReducer, TodoState, UserId};
//! use todo_sync_runtime::Store;
//!
//! # async fn run() -> Result<(), todo_sync_runtime::StoreError> {
//! let api = Arc::new(InMemoryTodoApi::new());
//! let store = Store::new(
//!     TodoState::new(UserId::new(2351)),
//!     TodoReducer::new(),
//!     TodoEnvironment::new(api),
//! );
//!
//! let mut handle = store
//!     .send(TodoAction::Create { title: "Buy milk".to_string() })
//!     .await?;
//! handle.wait().await;
//!
//! println!("{}", store.state(todos::view::render).await);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod batch;
pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod filter;
pub mod memory;
pub mod notice;
pub mod reducer;
pub mod types;
pub mod view;

// Re-export main types for convenience
pub use api::TodoApi;
pub use client::HttpTodoApi;
pub use command::{Command, ParseCommandError};
pub use config::Config;
pub use error::{ApiError, ConfigError};
pub use filter::StatusFilter;
pub use memory::InMemoryTodoApi;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{Todo, TodoAction, TodoId, TodoState, UserId};
