//! The combination safe, the trail chain, and their outcomes.

use serde::Serialize;
use tracing::debug;

use crate::config::MAX_SAFE_ATTEMPTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafeState {
    pub attempts_remaining: u32,
    pub max_attempts: u32,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeOutcome {
    Unlocked,
    Wrong { attempts_remaining: u32 },
    /// This attempt used the last try.
    LockedOut,
    /// Already out of tries; the attempt was not evaluated.
    Exhausted,
    AlreadyUnlocked,
}

impl Default for SafeState {
    fn default() -> Self {
        SafeState {
            attempts_remaining: MAX_SAFE_ATTEMPTS,
            max_attempts: MAX_SAFE_ATTEMPTS,
            unlocked: false,
        }
    }
}

impl SafeState {
    pub fn exhausted(&self) -> bool {
        !self.unlocked && self.attempts_remaining == 0
    }

    pub fn attempt(&mut self, code: &str, unlock_code: &str) -> CodeOutcome {
        if self.unlocked {
            return CodeOutcome::AlreadyUnlocked;
        }
        if self.exhausted() {
            return CodeOutcome::Exhausted;
        }
        if code == unlock_code {
            self.unlocked = true;
            return CodeOutcome::Unlocked;
        }

        self.attempts_remaining -= 1;
        debug!(remaining = self.attempts_remaining, "wrong code");
        if self.attempts_remaining == 0 {
            CodeOutcome::LockedOut
        } else {
            CodeOutcome::Wrong {
                attempts_remaining: self.attempts_remaining,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Taken,
    AlreadyHeld,
    SafeLocked,
    /// Code-door mode: there is no key to take.
    NoSafe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorOutcome {
    Escaped,
    Locked,
    /// Code-door mode: the door opens from its keypad.
    NeedsCode,
}

/// Position along an ordered trail. Step `n` expects the clue in slot `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainState {
    pub current_step: u32,
    pub total_steps: u32,
}

impl ChainState {
    pub fn new(total_steps: u32) -> Self {
        ChainState {
            current_step: 0,
            total_steps,
        }
    }

    pub fn advance(&mut self) -> u32 {
        if self.current_step < self.total_steps {
            self.current_step += 1;
        }
        self.current_step
    }

    pub fn reset(&mut self) {
        if self.current_step != 0 {
            debug!(from = self.current_step, "chain reset");
        }
        self.current_step = 0;
    }

    pub fn is_complete(&self) -> bool {
        self.current_step >= self.total_steps
    }

    pub fn expected_slot(&self) -> Option<usize> {
        (!self.is_complete()).then_some(self.current_step as usize)
    }
}
