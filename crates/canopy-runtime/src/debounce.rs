//! Debounce timer for structural topology changes
//!
//! The routing protocol is noisy while the mesh forms and churns, so raw
//! structural events are not surfaced directly. Arming while armed replaces
//! the pending deadline: a burst of N events within the interval yields
//! exactly one fire, one interval after the last event in the burst.

use std::time::Duration;

use canopy_core::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum DebounceState {
    #[default]
    Idle,
    Armed {
        deadline: Timestamp,
    },
}

/// Coalesces raw change events into one delayed "topology changed" signal
#[derive(Clone, Copy, Debug)]
pub struct DebounceTimer {
    state: DebounceState,
    interval: Duration,
}

impl DebounceTimer {
    pub fn new(interval: Duration) -> Self {
        DebounceTimer {
            state: DebounceState::Idle,
            interval,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        matches!(self.state, DebounceState::Armed { .. })
    }

    /// Pending fire deadline, if armed
    pub fn deadline(&self) -> Option<Timestamp> {
        match self.state {
            DebounceState::Armed { deadline } => Some(deadline),
            DebounceState::Idle => None,
        }
    }

    /// Arm (or re-arm) the timer. At most one deadline is pending at a time;
    /// re-arming restarts the countdown rather than queuing another fire.
    pub fn arm(&mut self, now: Timestamp) {
        let deadline = now + self.interval;
        if self.is_armed() {
            tracing::trace!(%deadline, "debounce re-armed, deadline replaced");
        } else {
            tracing::debug!(%deadline, "debounce armed");
        }
        self.state = DebounceState::Armed { deadline };
    }

    /// Check the deadline against `now`; returns true exactly once per cycle
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.state {
            DebounceState::Armed { deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                tracing::debug!(%now, "debounce fired");
                true
            }
            _ => false,
        }
    }
}
