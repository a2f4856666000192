//! Liveness tracking for downstream dependents
//!
//! A fixed-capacity arena of (address, last-seen) slots. Data-plane traffic
//! refreshes the timestamp for its source; the expiry sweep returns slots to
//! the free state once their timestamp falls outside the liveness horizon.
//! Capacity is fixed at construction: an observation arriving while the table
//! is full is silently dropped, not evicted-for.

use std::time::Duration;

use canopy_core::{MeshAddr, Timestamp};

/// One tracked next-hop address; `last_seen == None` marks a free slot
#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    addr: MeshAddr,
    last_seen: Option<Timestamp>,
}

/// Fixed-capacity table classifying next-hop addresses as live or free
#[derive(Clone, Debug)]
pub struct LivenessTable {
    slots: Vec<Slot>,
}

impl LivenessTable {
    /// Create a table with `capacity` slots, all free
    pub fn new(capacity: usize) -> Self {
        LivenessTable {
            slots: vec![Slot::default(); capacity],
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of currently occupied slots
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.last_seen.is_some()).count()
    }

    /// Record a data-plane observation of `addr` at `now`.
    ///
    /// Refreshes the existing entry if one is tracked, otherwise claims a
    /// free slot. Returns false if the table is full and the observation was
    /// dropped.
    pub fn record_seen(&mut self, addr: MeshAddr, now: Timestamp) -> bool {
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| s.last_seen.is_some() && s.addr == addr)
        {
            slot.last_seen = Some(now);
            return true;
        }

        if let Some(slot) = self.slots.iter_mut().find(|s| s.last_seen.is_none()) {
            slot.addr = addr;
            slot.last_seen = Some(now);
            tracing::trace!(%addr, "tracking new dependent");
            return true;
        }

        tracing::debug!(%addr, "liveness table full, observation dropped");
        false
    }

    /// True iff an entry for `addr` is currently tracked
    pub fn is_live(&self, addr: MeshAddr) -> bool {
        self.slots
            .iter()
            .any(|s| s.last_seen.is_some() && s.addr == addr)
    }

    /// Timestamp of the most recent observation of `addr`, if tracked
    pub fn last_seen(&self, addr: MeshAddr) -> Option<Timestamp> {
        self.slots
            .iter()
            .find(|s| s.last_seen.is_some() && s.addr == addr)
            .and_then(|s| s.last_seen)
    }

    /// Return every entry older than `interval` to the free state.
    ///
    /// Expires all qualifying entries in one pass and returns the count.
    pub fn expire_stale(&mut self, now: Timestamp, interval: Duration) -> usize {
        let mut expired = 0;
        for slot in &mut self.slots {
            if let Some(last_seen) = slot.last_seen {
                if now.since(last_seen) > interval {
                    tracing::debug!(addr = %slot.addr, "dependent expired");
                    slot.last_seen = None;
                    expired += 1;
                }
            }
        }
        expired
    }
}
