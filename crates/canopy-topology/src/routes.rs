//! Read-only view of the routing collaborator
//!
//! The routing-protocol implementation lives outside this workspace; canopy
//! only enumerates its destination entries, asks for the currently selected
//! default upstream relay, and reads the topology prefix.

use canopy_core::{MeshAddr, Prefix};

/// One destination entry in the routing table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteEntry {
    /// Destination address of the dependent
    pub destination: MeshAddr,
    /// Next hop toward that destination
    pub next_hop: MeshAddr,
}

impl RouteEntry {
    pub fn new(destination: MeshAddr, next_hop: MeshAddr) -> Self {
        RouteEntry {
            destination,
            next_hop,
        }
    }

    /// Entry for a directly attached dependent (destination is the next hop)
    pub fn direct(addr: MeshAddr) -> Self {
        RouteEntry::new(addr, addr)
    }
}

/// Read-only access to the node's routing state
pub trait RouteSource {
    /// Destination entries in table enumeration order
    fn routes(&self) -> Vec<RouteEntry>;

    /// Currently selected default upstream relay, if any
    fn default_parent(&self) -> Option<MeshAddr>;

    /// Prefix of the local topology, used to rewrite the parent address
    fn prefix(&self) -> Prefix;
}

/// In-memory routing table for tests and demos
#[derive(Clone, Debug, Default)]
pub struct StaticRoutes {
    entries: Vec<RouteEntry>,
    parent: Option<MeshAddr>,
    prefix: Prefix,
}

impl StaticRoutes {
    pub fn new(prefix: Prefix) -> Self {
        StaticRoutes {
            entries: Vec::new(),
            parent: None,
            prefix,
        }
    }

    pub fn set_parent(&mut self, parent: MeshAddr) {
        self.parent = Some(parent);
    }

    pub fn clear_parent(&mut self) {
        self.parent = None;
    }

    pub fn add_route(&mut self, entry: RouteEntry) {
        self.entries.push(entry);
    }

    pub fn remove_route(&mut self, destination: MeshAddr) {
        self.entries.retain(|e| e.destination != destination);
    }
}

impl RouteSource for StaticRoutes {
    fn routes(&self) -> Vec<RouteEntry> {
        self.entries.clone()
    }

    fn default_parent(&self) -> Option<MeshAddr> {
        self.parent
    }

    fn prefix(&self) -> Prefix {
        self.prefix
    }
}
