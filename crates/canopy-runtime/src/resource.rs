//! Observable topology resource facade
//!
//! `DagResource` is what the request/response transport talks to: it owns the
//! liveness table, the debounce timer and the pending-notification flag, and
//! turns GET exchanges into encoded chunks. Header parsing, status codes and
//! subscriber bookkeeping stay in the transport layer.

use std::fmt;
use std::time::Duration;

use bytes::{Bytes, BytesMut};

use canopy_core::{CanopyError, CanopyResult, DagConfig, MeshAddr, Timestamp};
use canopy_encode::{encode_chunk, Cursor};
use canopy_topology::{LivenessTable, RouteSource, TopologySnapshot};

use crate::DebounceTimer;

/// Response format requested by the transport peer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ContentFormat {
    /// No accept preference given; treated as JSON
    #[default]
    Unspecified,
    Json,
    /// Any other numeric content-format identifier
    Other(u16),
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentFormat::Unspecified => write!(f, "unspecified"),
            ContentFormat::Json => write!(f, "application/json"),
            ContentFormat::Other(id) => write!(f, "format({})", id),
        }
    }
}

/// Structural routing-table change reported by the routing collaborator
///
/// Only these arm the debounce timer; raw data-plane traffic refreshes
/// liveness without signalling a topology change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteEvent {
    Added(MeshAddr),
    Removed(MeshAddr),
}

impl RouteEvent {
    pub fn destination(self) -> MeshAddr {
        match self {
            RouteEvent::Added(addr) | RouteEvent::Removed(addr) => addr,
        }
    }
}

/// One GET exchange's worth of reply data
#[derive(Clone, Debug)]
pub struct DagReply {
    /// Encoded chunk to hand to the transport; may be empty on a
    /// continuation call that could not fit the next token
    pub payload: Bytes,
    /// Cursor the transport should thread into the next exchange
    pub cursor: Cursor,
    /// True once the document has been fully delivered
    pub done: bool,
}

/// Counters for observability
#[derive(Clone, Debug, Default)]
pub struct ResourceStats {
    pub packets_seen: u64,
    pub observations_dropped: u64,
    pub route_events: u64,
    pub notifications: u64,
    pub dependents_expired: u64,
    pub gets: u64,
}

/// The observable DoDAG resource
pub struct DagResource<R> {
    routes: R,
    liveness: LivenessTable,
    debounce: DebounceTimer,
    /// Set when the debounce fires; the next successful GET starts a fresh
    /// document and consumes it
    changed: bool,
    next_sweep: Timestamp,
    config: DagConfig,
    stats: ResourceStats,
}

impl<R: RouteSource> DagResource<R> {
    pub fn new(routes: R, config: DagConfig) -> Self {
        DagResource {
            routes,
            liveness: LivenessTable::new(config.max_tracked_routes),
            debounce: DebounceTimer::new(config.update_interval),
            changed: false,
            next_sweep: Timestamp::ZERO + config.sweep_interval,
            config,
            stats: ResourceStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &DagConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> &ResourceStats {
        &self.stats
    }

    #[inline]
    pub fn liveness(&self) -> &LivenessTable {
        &self.liveness
    }

    #[inline]
    pub fn routes(&self) -> &R {
        &self.routes
    }

    #[inline]
    pub fn routes_mut(&mut self) -> &mut R {
        &mut self.routes
    }

    /// True if a debounced change is waiting for its first fetch
    #[inline]
    pub fn has_pending_change(&self) -> bool {
        self.changed
    }

    /// Raw inbound data-plane packet from `src`: refreshes that peer's
    /// liveness, never arms the debounce timer.
    pub fn on_packet_received(&mut self, src: MeshAddr, now: Timestamp) {
        self.stats.packets_seen += 1;
        if !self.liveness.record_seen(src, now) {
            self.stats.observations_dropped += 1;
        }
    }

    /// Structural route add/remove: arms (or re-arms) the debounce timer.
    pub fn on_route_event(&mut self, event: RouteEvent, now: Timestamp) {
        self.stats.route_events += 1;
        tracing::debug!(?event, "structural topology change");
        self.debounce.arm(now);
    }

    /// Advance timers to `now`. Runs any due expiry sweeps and checks the
    /// debounce deadline; returns true when the coalesced "topology changed"
    /// signal fires, at which point the caller should notify subscribers.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        // Sweep cadence is decoupled from the debounce interval so stale
        // dependents age out even when the topology shape is quiet.
        let step = self.config.sweep_interval.max(Duration::from_secs(1));
        while now >= self.next_sweep {
            let expired = self
                .liveness
                .expire_stale(now, self.config.update_interval);
            self.stats.dependents_expired += expired as u64;
            self.next_sweep = self.next_sweep + step;
        }

        let fired = self.debounce.poll(now);
        if fired {
            self.changed = true;
            self.stats.notifications += 1;
        }
        fired
    }

    /// Serve one GET exchange.
    ///
    /// A pending change notification forces a fresh document regardless of
    /// the cursor the peer presents, and is consumed only on success: an
    /// unsupported format (or a too-small window) leaves it set so a later
    /// compatible request still observes the change.
    pub fn handle_get(
        &mut self,
        format: ContentFormat,
        capacity: usize,
        cursor: Cursor,
    ) -> CanopyResult<DagReply> {
        self.stats.gets += 1;

        match format {
            ContentFormat::Unspecified | ContentFormat::Json => {}
            other => {
                return Err(CanopyError::UnsupportedFormat(other.to_string()));
            }
        }

        let fresh = self.changed;
        let snapshot = TopologySnapshot::capture(&self.routes, &self.liveness);

        let mut buf = BytesMut::zeroed(capacity);
        let chunk = encode_chunk(&snapshot, &mut buf, cursor, fresh)?;
        self.changed = false;

        buf.truncate(chunk.written);
        tracing::trace!(
            written = chunk.written,
            cursor = ?chunk.cursor,
            fresh,
            "topology chunk encoded"
        );

        Ok(DagReply {
            payload: buf.freeze(),
            cursor: chunk.cursor,
            done: chunk.done,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_topology::{RouteEntry, StaticRoutes};

    const DOC: &str = r#"{"parent":["fe80::1"],"children":["fe80::2","fe80::3"]}"#;

    fn addr(s: &str) -> MeshAddr {
        s.parse().unwrap()
    }

    fn t(secs: u64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn resource_with_children() -> DagResource<StaticRoutes> {
        let mut routes = StaticRoutes::default();
        routes.set_parent(addr("fe80::1"));
        routes.add_route(RouteEntry::direct(addr("fe80::2")));
        routes.add_route(RouteEntry::direct(addr("fe80::3")));

        let mut resource = DagResource::new(routes, DagConfig::default());
        resource.on_packet_received(addr("fe80::2"), t(0));
        resource.on_packet_received(addr("fe80::3"), t(0));
        resource
    }

    #[test]
    fn test_get_full_document() {
        let mut resource = resource_with_children();
        let reply = resource
            .handle_get(ContentFormat::Json, 1024, Cursor::START)
            .unwrap();

        assert!(reply.done);
        assert_eq!(&reply.payload[..], DOC.as_bytes());
    }

    #[test]
    fn test_get_two_chunk_exchange() {
        let mut resource = resource_with_children();

        let first = resource
            .handle_get(ContentFormat::Unspecified, 20, Cursor::START)
            .unwrap();
        assert!(!first.done);

        let second = resource
            .handle_get(ContentFormat::Unspecified, 1024, first.cursor)
            .unwrap();
        assert!(second.done);

        let mut doc = first.payload.to_vec();
        doc.extend_from_slice(&second.payload);
        assert_eq!(doc, DOC.as_bytes());
    }

    #[test]
    fn test_unsupported_format_preserves_notification() {
        let mut resource = resource_with_children();
        resource.on_route_event(RouteEvent::Added(addr("fe80::4")), t(0));
        assert!(resource.poll(t(30)));
        assert!(resource.has_pending_change());

        let err = resource
            .handle_get(ContentFormat::Other(41), 1024, Cursor::START)
            .unwrap_err();
        assert!(matches!(err, CanopyError::UnsupportedFormat(_)));

        // The change is still observable by a JSON-capable request
        assert!(resource.has_pending_change());
        resource
            .handle_get(ContentFormat::Json, 1024, Cursor::START)
            .unwrap();
        assert!(!resource.has_pending_change());
    }

    #[test]
    fn test_pending_change_overrides_stale_cursor() {
        let mut resource = resource_with_children();

        let first = resource
            .handle_get(ContentFormat::Json, 20, Cursor::START)
            .unwrap();
        assert!(!first.done);

        // Change fires mid-transfer; the stale cursor is discarded
        resource.on_route_event(RouteEvent::Removed(addr("fe80::3")), t(1));
        assert!(resource.poll(t(31)));

        let reply = resource
            .handle_get(ContentFormat::Json, 1024, first.cursor)
            .unwrap();
        assert!(reply.payload.starts_with(b"{"));
        assert!(reply.done);
    }

    #[test]
    fn test_packets_do_not_arm_debounce() {
        let mut resource = resource_with_children();
        resource.on_packet_received(addr("fe80::2"), t(5));

        // No structural change, so no fire no matter how long we wait
        assert!(!resource.poll(t(500)));
        assert!(!resource.has_pending_change());
    }

    #[test]
    fn test_burst_yields_single_notification() {
        let mut resource = resource_with_children();
        resource.on_route_event(RouteEvent::Added(addr("fe80::4")), t(0));
        resource.on_route_event(RouteEvent::Added(addr("fe80::5")), t(10));
        resource.on_route_event(RouteEvent::Removed(addr("fe80::4")), t(20));

        let mut fires = 0;
        for secs in 0..=120 {
            if resource.poll(t(secs)) {
                fires += 1;
                assert_eq!(secs, 50, "fires one interval after the last event");
            }
        }
        assert_eq!(fires, 1);
    }

    #[test]
    fn test_expired_dependent_absent_from_next_fetch() {
        let mut resource = resource_with_children();
        // Keep fe80::2 fresh, let fe80::3 age out
        resource.on_packet_received(addr("fe80::2"), t(25));
        resource.poll(t(31));
        assert_eq!(resource.stats().dependents_expired, 1);

        let reply = resource
            .handle_get(ContentFormat::Json, 1024, Cursor::START)
            .unwrap();
        assert_eq!(
            &reply.payload[..],
            br#"{"parent":["fe80::1"],"children":["fe80::2"]}"#
        );
    }

    #[test]
    fn test_chunk_too_small_surfaces_and_keeps_change() {
        let mut resource = resource_with_children();
        resource.on_route_event(RouteEvent::Added(addr("fe80::4")), t(0));
        resource.poll(t(30));

        let err = resource
            .handle_get(ContentFormat::Json, 0, Cursor::START)
            .unwrap_err();
        assert!(matches!(err, CanopyError::ChunkTooSmall { .. }));
        assert!(resource.has_pending_change());
    }

    #[test]
    fn test_capacity_drop_counted() {
        let mut routes = StaticRoutes::default();
        routes.set_parent(addr("fe80::1"));
        let config = DagConfig {
            max_tracked_routes: 1,
            ..Default::default()
        };
        let mut resource = DagResource::new(routes, config);

        resource.on_packet_received(addr("fe80::2"), t(0));
        resource.on_packet_received(addr("fe80::3"), t(0));

        assert_eq!(resource.stats().observations_dropped, 1);
        assert!(resource.liveness().is_live(addr("fe80::2")));
        assert!(!resource.liveness().is_live(addr("fe80::3")));
    }
}
