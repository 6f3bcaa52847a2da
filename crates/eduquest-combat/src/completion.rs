//! Single-fire completion guarded by a fallback timer.
//!
//! Every deferred point in the combat simulation waits on an animation
//! completion that the hosting engine may never deliver (missing asset,
//! misconfigured clip). Each such point arms a [`Completion`]: the first of
//! the external signal or the fallback countdown resolves it, and whichever
//! arrives second is a no-op.

/// Lifecycle of a [`Completion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    /// Not waiting on anything.
    Idle,
    /// Armed and counting down toward the fallback deadline.
    Armed,
    /// Resolved; further signals and ticks have no effect.
    Done,
}

/// A one-shot completion point with a fallback deadline.
#[derive(Debug, Clone)]
pub struct Completion {
    state: CompletionState,
    remaining: f32,
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

impl Completion {
    /// Creates an idle completion.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: CompletionState::Idle,
            remaining: 0.0,
        }
    }

    /// Arms the completion with a fallback deadline in seconds.
    ///
    /// Re-arming an already-armed or resolved completion restarts it.
    pub fn arm(&mut self, fallback: f32) {
        self.state = CompletionState::Armed;
        self.remaining = fallback.max(0.0);
    }

    /// Delivers the external signal (e.g. an animation-complete event).
    ///
    /// Returns `true` only if this call resolved the completion; signalling
    /// an idle or already-resolved completion does nothing.
    pub fn signal(&mut self) -> bool {
        if self.state == CompletionState::Armed {
            self.state = CompletionState::Done;
            true
        } else {
            false
        }
    }

    /// Advances the fallback countdown.
    ///
    /// Returns `true` only on the tick where the deadline expires while still
    /// armed; a timer expiring after the signal already resolved is a no-op.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.state != CompletionState::Armed {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.state = CompletionState::Done;
            true
        } else {
            false
        }
    }

    /// Disarms without resolving.
    pub fn cancel(&mut self) {
        self.state = CompletionState::Idle;
        self.remaining = 0.0;
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> CompletionState {
        self.state
    }

    /// Whether the completion is armed and waiting.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.state == CompletionState::Armed
    }

    /// Whether the completion has resolved.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == CompletionState::Done
    }

    /// Seconds left before the fallback fires (0 when not armed).
    #[must_use]
    pub fn remaining(&self) -> f32 {
        if self.is_armed() {
            self.remaining.max(0.0)
        } else {
            0.0
        }
    }
}
