//! The event-dispatch loop: drains the event queue, advancing the logical
//! clock and mutating the world exactly as §4.5's state machine specifies.

use crate::config::SimConfig;
use crate::event::{Event, EventKind, EventQueue};
use crate::router;
use crate::topology::{Request, RequestOutcome, World};
use crate::types::{ItemTag, RequestIndex, TimestampMs};

/// One user's workload entry: an item tag requested at a given logical time.
pub type WorkloadEntry = (ItemTag, TimestampMs);

/// Owns the world, the validated configuration, and the event queue for one
/// run. Constructed once; `run` drives it to completion and is not
/// restartable.
pub struct Engine {
    pub world: World,
    pub config: SimConfig,
    queue: EventQueue,
    simulator_time: TimestampMs,
}

impl Engine {
    pub fn new(world: World, config: SimConfig) -> Self {
        Self {
            world,
            config,
            queue: EventQueue::new(),
            simulator_time: 0,
        }
    }

    pub fn simulator_time(&self) -> TimestampMs {
        self.simulator_time
    }

    /// Build a `Request` per workload entry (sorted by `create_time`
    /// ascending), assign each to the closest node, and schedule its
    /// `UserSend` event. Call once, before `run`.
    pub fn schedule_workloads(&mut self, workloads: &[Vec<WorkloadEntry>]) {
        for (user_idx, entries) in workloads.iter().enumerate() {
            let user_id = crate::types::UserId(user_idx as u32);
            let mut sorted = entries.clone();
            sorted.sort_by_key(|(_, create_time)| *create_time);

            for (per_user_index, (item_tag, create_time)) in sorted.into_iter().enumerate() {
                let user_coord = self.world.user(user_id).coordinate;
                let node_id = router::closest_node(&self.world, user_coord);
                let ridx = self.world.push_request(Request {
                    id: format!("{user_id}.{per_user_index}"),
                    user: user_id,
                    item_tag,
                    fetched_item: None,
                    node: node_id,
                    create_time,
                    receive_time: None,
                    outcome: RequestOutcome::Pending,
                    rerouted: false,
                });
                self.queue.schedule(create_time, 0, EventKind::UserSend(ridx));
            }
        }
    }

    /// Drain the event queue to completion.
    pub fn run(&mut self) {
        while let Some(event) = self.queue.pop_min() {
            debug_assert!(event.proc_time >= self.simulator_time);
            self.simulator_time = event.proc_time;
            self.dispatch(event);
        }
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    fn schedule(&mut self, proc_time: TimestampMs, kind: EventKind) {
        self.queue.schedule(proc_time, self.simulator_time, kind);
    }

    fn dispatch(&mut self, event: Event) {
        match event.kind {
            EventKind::UserSend(ridx) => self.on_user_send(ridx),
            EventKind::NodeReceiveRequest(ridx) => self.on_node_receive_request(ridx),
            EventKind::NodeServe(node_id) => self.on_node_serve(node_id),
            EventKind::OriginReceive(ridx) => self.on_origin_receive(ridx),
            EventKind::NodeReceiveItem(ridx) => self.on_node_receive_item(ridx),
            EventKind::UserReceive(ridx) => self.on_user_receive(ridx),
        }
    }

    fn on_user_send(&mut self, ridx: RequestIndex) {
        let request = &self.world.requests[ridx.0];
        let user_coord = self.world.users[request.user.0 as usize].coordinate;
        let mut node_id = request.node;

        if self.config.reroute_requests {
            let current_queue_len = self.world.nodes[node_id.0 as usize].queue.len() as u32;
            if current_queue_len >= self.config.reroute_threshold {
                if let Some(alt) = router::closest_non_congested(&self.world, user_coord, self.config.reroute_threshold) {
                    if alt != node_id {
                        let request = &mut self.world.requests[ridx.0];
                        request.node = alt;
                        request.rerouted = true;
                        node_id = alt;
                    }
                }
                // else: no non-congested node exists, keep the original assignment.
            }
        }

        let node_coord = self.world.nodes[node_id.0 as usize].coordinate;
        let latency = crate::types::one_way_latency_ms(user_coord, node_coord);
        tracing::trace!(request = ridx.0, node = node_id.0, latency, "user send");
        self.schedule(self.simulator_time + latency, EventKind::NodeReceiveRequest(ridx));
    }

    fn on_node_receive_request(&mut self, ridx: RequestIndex) {
        let node_id = self.world.requests[ridx.0].node;
        let was_empty = self.world.nodes[node_id.0 as usize].enqueue(ridx);
        if was_empty {
            self.schedule(
                self.simulator_time + self.config.service_gap_ms,
                EventKind::NodeServe(node_id),
            );
        }
    }

    fn on_node_serve(&mut self, node_id: crate::types::NodeId) {
        let Some(ridx) = self.world.nodes[node_id.0 as usize].dequeue() else {
            return;
        };

        let item_tag = self.world.requests[ridx.0].item_tag.clone();
        let node = &mut self.world.nodes[node_id.0 as usize];
        node.stats.num_requests += 1;
        let hit = node.cache.get(&item_tag);

        if let Some(item) = hit {
            node.stats.cache_hits += 1;
            let request = &mut self.world.requests[ridx.0];
            request.fetched_item = Some(item);
            request.outcome = RequestOutcome::HitAtNode;

            let user_coord = self.world.users[self.world.requests[ridx.0].user.0 as usize].coordinate;
            let node_coord = self.world.nodes[node_id.0 as usize].coordinate;
            let latency = crate::types::one_way_latency_ms(user_coord, node_coord);
            tracing::trace!(request = ridx.0, node = node_id.0, "cache hit");
            self.schedule(self.simulator_time + latency, EventKind::UserReceive(ridx));
        } else {
            let node_coord = self.world.nodes[node_id.0 as usize].coordinate;
            let origin_coord = self.world.origin.coordinate;
            let latency = crate::types::one_way_latency_ms(node_coord, origin_coord);
            tracing::trace!(request = ridx.0, node = node_id.0, "cache miss, querying origin");
            self.schedule(self.simulator_time + latency, EventKind::OriginReceive(ridx));
        }

        if !self.world.nodes[node_id.0 as usize].queue.is_empty() {
            self.schedule(
                self.simulator_time + self.config.service_gap_ms,
                EventKind::NodeServe(node_id),
            );
        }
    }

    fn on_origin_receive(&mut self, ridx: RequestIndex) {
        let item_tag = self.world.requests[ridx.0].item_tag.clone();
        let found = self.world.origin.fetch(&item_tag);
        let node_id = self.world.requests[ridx.0].node;

        let request = &mut self.world.requests[ridx.0];
        match &found {
            Some(item) => {
                request.fetched_item = Some(item.clone());
                request.outcome = RequestOutcome::MissFromOrigin;
            }
            None => {
                request.outcome = RequestOutcome::ItemNotFound;
            }
        }

        let node_coord = self.world.nodes[node_id.0 as usize].coordinate;
        let origin_coord = self.world.origin.coordinate;
        let latency = crate::types::one_way_latency_ms(node_coord, origin_coord);
        self.schedule(self.simulator_time + latency, EventKind::NodeReceiveItem(ridx));
    }

    fn on_node_receive_item(&mut self, ridx: RequestIndex) {
        let node_id = self.world.requests[ridx.0].node;
        let fetched = self.world.requests[ridx.0].fetched_item.clone();

        if let Some(item) = fetched {
            let cache = &mut self.world.nodes[node_id.0 as usize].cache;
            if item.size <= cache.max_size() {
                cache.insert(item);
            }
        }

        let user_id = self.world.requests[ridx.0].user;
        let user_coord = self.world.users[user_id.0 as usize].coordinate;
        let node_coord = self.world.nodes[node_id.0 as usize].coordinate;
        let latency = crate::types::one_way_latency_ms(user_coord, node_coord);
        self.schedule(self.simulator_time + latency, EventKind::UserReceive(ridx));
    }

    fn on_user_receive(&mut self, ridx: RequestIndex) {
        let request = &mut self.world.requests[ridx.0];
        request.receive_time = Some(self.simulator_time);
        tracing::debug!(request = ridx.0, time = self.simulator_time, "user receive");
    }
}
