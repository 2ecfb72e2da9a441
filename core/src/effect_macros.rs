//! Declarative macros for ergonomic effect construction
//!
//! Remote calls and notice timers are the only effects the client produces;
//! these macros keep the reducer arms that build them short.

/// Create an `Effect::Future` from an async block
///
/// The block is moved into the future, so clone anything it needs out of
/// the environment first.
///
/// # Example
///
/// ```
/// use todo_sync_core::{async_effect, effect::Effect};
///
/// #[derive(Debug)]
/// enum Action {
///     Loaded(usize),
/// }
///
/// let effect: Effect<Action> = async_effect! {
///     Some(Action::Loaded(3))
/// };
/// assert!(matches!(effect, Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```
/// use todo_sync_core::{delay, effect::Effect};
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// enum Action {
///     NoticeExpired { generation: u64 },
/// }
///
/// let effect = delay! {
///     duration: Duration::from_secs(3),
///     action: Action::NoticeExpired { generation: 1 }
/// };
/// assert!(matches!(effect, Effect::Delay { .. }));
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}
