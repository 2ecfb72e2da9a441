//! Transient notice channel.
//!
//! One slot, at most one message. Every write bumps a generation counter;
//! an expiry timer carries the generation it was started for and only
//! clears the slot if nothing has been written since.

use std::time::Duration;

/// How long a notice stays up
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Listing failed
pub const LOAD_FAILED: &str = "Unable to load todos";
/// Create attempted with a blank title
pub const EMPTY_TITLE: &str = "Title should not be empty";
/// Create call rejected
pub const ADD_FAILED: &str = "Unable to add a todo";
/// Delete call rejected
pub const DELETE_FAILED: &str = "Unable to delete a todo";
/// Update call rejected (toggle, rename, toggle all)
pub const UPDATE_FAILED: &str = "Unable to update a todo";

/// Single-message notice slot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeSlot {
    message: Option<String>,
    generation: u64,
}

impl NoticeSlot {
    /// Message currently shown
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Generation of the last write
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the message
    ///
    /// Returns the generation an expiry timer must carry, or `None` when the
    /// message is empty (which dismisses instead).
    pub fn raise(&mut self, message: impl Into<String>) -> Option<u64> {
        let message = message.into();
        if message.is_empty() {
            self.dismiss();
            return None;
        }

        self.generation += 1;
        self.message = Some(message);
        Some(self.generation)
    }

    /// Clears the slot now; any running timer becomes stale
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.message = None;
    }

    /// Timer callback: clears the slot if `generation` is still current
    ///
    /// Returns whether anything was cleared.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.message.is_none() {
            return false;
        }
        self.message = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_notice_overwrites_earlier() {
        let mut slot = NoticeSlot::default();
        slot.raise(ADD_FAILED);
        slot.raise(DELETE_FAILED);
        assert_eq!(slot.message(), Some(DELETE_FAILED));
    }

    #[test]
    fn expiry_clears_current_notice() {
        let mut slot = NoticeSlot::default();
        let generation = slot.raise(LOAD_FAILED);

        assert_eq!(generation, Some(slot.generation()));
        assert!(slot.expire(slot.generation()));
        assert_eq!(slot.message(), None);
    }

    #[test]
    fn stale_expiry_leaves_newer_notice() {
        let mut slot = NoticeSlot::default();
        let first = slot.raise(ADD_FAILED).unwrap_or_default();
        slot.raise(UPDATE_FAILED);

        assert!(!slot.expire(first));
        assert_eq!(slot.message(), Some(UPDATE_FAILED));
    }

    #[test]
    fn dismiss_then_stale_timer_is_harmless() {
        let mut slot = NoticeSlot::default();
        let first = slot.raise(ADD_FAILED).unwrap_or_default();
        slot.dismiss();
        assert_eq!(slot.message(), None);

        let second = slot.raise(DELETE_FAILED).unwrap_or_default();
        assert!(!slot.expire(first));
        assert_eq!(slot.message(), Some(DELETE_FAILED));
        assert!(slot.expire(second));
    }

    #[test]
    fn empty_message_dismisses() {
        let mut slot = NoticeSlot::default();
        let first = slot.raise(ADD_FAILED).unwrap_or_default();

        assert_eq!(slot.raise(""), None);
        assert_eq!(slot.message(), None);
        assert!(!slot.expire(first));
    }
}
