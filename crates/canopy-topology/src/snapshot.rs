//! Point-in-time topology snapshots
//!
//! A snapshot is derived on demand, never stored: the parent is the routing
//! layer's current default relay (prefix-rewritten), the children are the
//! routing destinations whose next hop is live right now. Filtering by
//! liveness at capture time means a dependent that expired since the last
//! change notification simply drops out of the next document.

use canopy_core::MeshAddr;

use crate::{LivenessTable, RouteSource};

/// The local DoDAG as reported to observers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologySnapshot {
    /// Upstream relay, absent on a root node
    pub parent: Option<MeshAddr>,
    /// Live dependents in routing-table enumeration order
    pub children: Vec<MeshAddr>,
}

impl TopologySnapshot {
    /// Capture the current topology from the routing view and liveness table
    pub fn capture<R: RouteSource>(routes: &R, liveness: &LivenessTable) -> Self {
        let parent = routes
            .default_parent()
            .map(|p| routes.prefix().apply(p));

        let children = routes
            .routes()
            .into_iter()
            .filter(|entry| liveness.is_live(entry.next_hop))
            .map(|entry| entry.destination)
            .collect();

        TopologySnapshot { parent, children }
    }

    /// An empty topology: no parent, no dependents
    pub fn empty() -> Self {
        TopologySnapshot {
            parent: None,
            children: Vec::new(),
        }
    }
}
