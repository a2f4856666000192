//! canopy Topology - Local DoDAG state
//!
//! This crate tracks which routing-table entries are currently live
//! dependents and derives point-in-time topology snapshots:
//! - Fixed-capacity liveness table fed by data-plane traffic
//! - Read-only view of the routing collaborator
//! - Snapshot of one upstream relay plus the live dependent set

pub mod liveness;
pub mod routes;
pub mod snapshot;

pub use liveness::*;
pub use routes::*;
pub use snapshot::*;
