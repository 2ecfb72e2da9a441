//! # todo-sync testing
//!
//! Testing utilities and helpers for todo-sync reducers.
//!
//! This crate provides:
//! - [`ReducerTest`]: a Given-When-Then harness for a single reducer step
//! - [`assertions`]: checks over the effects a reducer returned
//! - [`run_futures`]: drives the remote-call effects of a step to completion
//!   so the produced result actions can be fed back by hand
//!
//! ## Example
//!
//! ```ignore
//! use todo_sync_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(environment)
//!     .given_state(TodoState::new(user_id))
//!     .when_action(TodoAction::SelectFilter { filter: StatusFilter::Active })
//!     .then_state(|state| assert_eq!(state.filter, StatusFilter::Active))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```


pub use reducer_test::{assertions, run_futures, ReducerTest};
