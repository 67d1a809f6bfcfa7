//! Deferred Transitions
//!
//! A single-slot delayed action. The outcome resolver schedules; the session
//! polls the slot once per tick against the host clock and fires the action
//! at most once.

use serde::{Deserialize, Serialize};

/// Action waiting for its deadline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingAction {
    /// Nothing scheduled
    #[default]
    None,
    /// Re-spin the columns after a mismatch
    Reset,
    /// Tear down and report success
    RemoveThenSucceed,
    /// Tear down and report failure
    RemoveThenFail,
}

/// The deferred-transition slot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransitionTimer {
    action: PendingAction,
    deadline: u64,
}

impl TransitionTimer {
    /// Empty slot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently pending action
    #[must_use]
    pub fn action(&self) -> PendingAction {
        self.action
    }

    /// Deadline of the pending action (0 when idle)
    #[must_use]
    pub fn deadline(&self) -> u64 {
        self.deadline
    }

    /// Whether nothing is pending
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.action == PendingAction::None
    }

    /// Schedule `action` to fire at `now + delay_ms`
    ///
    /// Returns the action that was replaced, if the slot was occupied.
    pub fn schedule(
        &mut self,
        action: PendingAction,
        now: u64,
        delay_ms: u64,
    ) -> Option<PendingAction> {
        let replaced = (!self.is_idle()).then_some(self.action);
        self.action = action;
        self.deadline = now.saturating_add(delay_ms);
        replaced
    }

    /// Take the pending action if its deadline has been reached
    ///
    /// The slot is cleared before returning, so each scheduled action is
    /// handed out exactly once.
    pub fn poll(&mut self, now: u64) -> Option<PendingAction> {
        if self.is_idle() || now < self.deadline {
            return None;
        }

        let action = self.action;
        self.action = PendingAction::None;
        self.deadline = 0;
        Some(action)
    }
}
