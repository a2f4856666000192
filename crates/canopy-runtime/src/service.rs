//! Single-consumer event loop
//!
//! All mutation funnels through one task: data-plane observations and
//! structural route events arrive on a channel, a periodic tick drives the
//! expiry sweep and the debounce deadline. Handlers run to completion, so the
//! encoder always sees a consistent table. The transport layer holds the same
//! shared resource for serving GETs; the mutex is never held across an await.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use canopy_core::{MeshAddr, Timestamp};
use canopy_topology::RouteSource;

use crate::{DagResource, RouteEvent};

/// Resource handle shared between the service loop and the transport
pub type SharedResource<R> = Arc<Mutex<DagResource<R>>>;

/// Events delivered to the topology service
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DagEvent {
    /// Inbound data-plane packet observed from a peer
    PacketFrom(MeshAddr),
    /// Structural routing-table change
    Route(RouteEvent),
}

/// Debounced "topology changed" signal for the transport's subscriber notify
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopologyChanged {
    pub at: Timestamp,
}

/// Sender half handed to the routing/packet callbacks
pub type EventSender = mpsc::Sender<DagEvent>;

/// Receiver carrying change signals to the transport layer
pub type ChangeReceiver = mpsc::Receiver<TopologyChanged>;

/// Event loop driving a [`DagResource`]
pub struct DagService<R> {
    resource: SharedResource<R>,
    events: mpsc::Receiver<DagEvent>,
    changes: mpsc::Sender<TopologyChanged>,
    started: Instant,
}

impl<R: RouteSource> DagService<R> {
    /// Wire up a service around `resource`.
    ///
    /// Returns the service plus the event sender for the routing collaborator
    /// and the change receiver for the transport's notify path.
    pub fn new(
        resource: SharedResource<R>,
        queue_depth: usize,
    ) -> (Self, EventSender, ChangeReceiver) {
        let (event_tx, event_rx) = mpsc::channel(queue_depth);
        let (change_tx, change_rx) = mpsc::channel(queue_depth);

        let service = DagService {
            resource,
            events: event_rx,
            changes: change_tx,
            started: Instant::now(),
        };

        (service, event_tx, change_rx)
    }

    /// Seconds since the service started, at tick granularity
    fn now(&self) -> Timestamp {
        Timestamp::from_secs(self.started.elapsed().as_secs())
    }

    /// Run until every event sender is dropped or the change receiver closes
    pub async fn run(mut self) {
        let sweep_interval = self.resource.lock().config().sweep_interval;
        let mut tick = time::interval(sweep_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                event = self.events.recv() => {
                    let Some(event) = event else {
                        tracing::debug!("event senders dropped, stopping");
                        break;
                    };
                    let now = self.now();
                    let mut resource = self.resource.lock();
                    match event {
                        DagEvent::PacketFrom(src) => resource.on_packet_received(src, now),
                        DagEvent::Route(route_event) => resource.on_route_event(route_event, now),
                    }
                }
                _ = tick.tick() => {
                    let now = self.now();
                    let fired = self.resource.lock().poll(now);
                    if fired {
                        tracing::debug!(%now, "notifying subscribers of topology change");
                        if self.changes.send(TopologyChanged { at: now }).await.is_err() {
                            tracing::debug!("change receiver closed, stopping");
                            break;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentFormat;
    use canopy_core::DagConfig;
    use canopy_encode::Cursor;
    use canopy_topology::{RouteEntry, StaticRoutes};
    use std::time::Duration;

    fn addr(s: &str) -> MeshAddr {
        s.parse().unwrap()
    }

    fn shared_resource() -> SharedResource<StaticRoutes> {
        let mut routes = StaticRoutes::default();
        routes.set_parent(addr("fe80::1"));
        routes.add_route(RouteEntry::direct(addr("fe80::2")));
        Arc::new(Mutex::new(DagResource::new(routes, DagConfig::default())))
    }

    #[tokio::test(start_paused = true)]
    async fn test_route_event_produces_one_delayed_notification() {
        let resource = shared_resource();
        let (service, events, mut changes) = DagService::new(resource.clone(), 16);
        let handle = tokio::spawn(service.run());

        events
            .send(DagEvent::Route(RouteEvent::Added(addr("fe80::2"))))
            .await
            .unwrap();
        events
            .send(DagEvent::Route(RouteEvent::Added(addr("fe80::3"))))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(45)).await;

        let change = changes.recv().await.unwrap();
        assert!(change.at.as_secs() >= 30);

        // Burst coalesced: no second signal queued
        assert!(changes.try_recv().is_err());
        assert!(resource.lock().has_pending_change());

        drop(events);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_packets_refresh_liveness_without_notifying() {
        let resource = shared_resource();
        let (service, events, mut changes) = DagService::new(resource.clone(), 16);
        let handle = tokio::spawn(service.run());

        events
            .send(DagEvent::PacketFrom(addr("fe80::2")))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert!(changes.try_recv().is_err());

        // The dependent was seen recently relative to service time, then aged
        // out by the sweep once quiet for longer than the interval
        assert!(!resource.lock().liveness().is_live(addr("fe80::2")));

        drop(events);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_after_notification_serves_fresh_document() {
        let resource = shared_resource();
        let (service, events, mut changes) = DagService::new(resource.clone(), 16);
        let handle = tokio::spawn(service.run());

        events
            .send(DagEvent::PacketFrom(addr("fe80::2")))
            .await
            .unwrap();
        events
            .send(DagEvent::Route(RouteEvent::Added(addr("fe80::2"))))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(31)).await;
        changes.recv().await.unwrap();

        let reply = resource
            .lock()
            .handle_get(ContentFormat::Json, 1024, Cursor::Done)
            .unwrap();
        assert!(reply.done);
        assert!(reply.payload.starts_with(b"{\"parent\""));

        drop(events);
        handle.await.unwrap();
    }
}
