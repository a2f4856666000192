//! Resource configuration

use std::time::Duration;

/// Configuration for the observable topology resource
#[derive(Clone, Debug)]
pub struct DagConfig {
    /// Quiet time after the last structural change before subscribers are
    /// notified. Also the liveness horizon: a dependent not heard from within
    /// this interval is no longer reported.
    pub update_interval: Duration,
    /// Period of the expiry sweep. Kept shorter than `update_interval` so
    /// stale dependents age out in roughly real time. Second granularity;
    /// values under one second are treated as one second.
    pub sweep_interval: Duration,
    /// Capacity of the liveness table, bounded by the maximum number of
    /// concurrent routing-table entries. Observations beyond this are dropped.
    pub max_tracked_routes: usize,
}

impl Default for DagConfig {
    fn default() -> Self {
        DagConfig {
            update_interval: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(1),
            max_tracked_routes: 16,
        }
    }
}
