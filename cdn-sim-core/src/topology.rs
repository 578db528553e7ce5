//! The simulated world: users, edge nodes, and the origin, addressed by
//! stable indices rather than shared references.
//!
//! Users, nodes, and requests all reference each other (a request names a
//! user and a node; a node's assignment changes over its lifetime). Rather
//! than working around that with `Rc<RefCell<_>>`, every entity lives in a
//! flat `Vec` inside `World` and is addressed by its `NodeId`/`UserId`/
//! `RequestIndex`.

use std::collections::{HashMap, VecDeque};

use crate::cache::{Cache, CachePolicy};
use crate::error::{Error, Result};
use crate::types::{Coordinate, Item, ItemTag, NodeId, RequestIndex, TimestampMs, UserId};

/// Running counters for one node, observed and asserted against by the
/// integration suite (see the invariants this type exists to make checkable).
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeStats {
    pub cache_hits: u32,
    pub num_requests: u32,
    pub max_queue_length: u32,
}

impl NodeStats {
    /// Mean cache hit ratio, guarded against division by zero (§7).
    pub fn hit_ratio(&self) -> f64 {
        if self.num_requests == 0 {
            0.0
        } else {
            f64::from(self.cache_hits) / f64::from(self.num_requests)
        }
    }
}

/// An edge node: a location, a bounded cache, and a FIFO request queue.
#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub coordinate: Coordinate,
    pub cache: Cache,
    /// Requests enqueued at this node and not yet dequeued by `NodeServe`.
    pub queue: VecDeque<RequestIndex>,
    pub stats: NodeStats,
}

impl Node {
    /// Enqueue a request, returning whether the queue was empty beforehand
    /// (the signal the engine uses to decide whether to kick off service).
    pub fn enqueue(&mut self, request: RequestIndex) -> bool {
        let was_empty = self.queue.is_empty();
        self.queue.push_back(request);
        self.stats.max_queue_length = self.stats.max_queue_length.max(self.queue.len() as u32);
        was_empty
    }

    pub fn dequeue(&mut self) -> Option<RequestIndex> {
        self.queue.pop_front()
    }
}

/// A requesting client, fixed at a single coordinate for the run.
#[derive(Debug)]
pub struct User {
    pub id: UserId,
    pub coordinate: Coordinate,
}

/// The single content origin: canonical owner of every catalog item.
#[derive(Debug, Default)]
pub struct Origin {
    pub coordinate: Coordinate,
    items: HashMap<ItemTag, Item>,
}

impl Origin {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            items: HashMap::new(),
        }
    }

    pub fn publish(&mut self, item: Item) {
        self.items.insert(item.tag.clone(), item);
    }

    /// `None` means the item does not exist anywhere in the catalog: a
    /// `MissingItemAtOrigin` outcome, not an error.
    pub fn fetch(&self, tag: &ItemTag) -> Option<Item> {
        self.items.get(tag).cloned()
    }
}

/// Lifecycle stage of a request, mirroring the event chain that drives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Pending,
    /// Served directly from the assigned node's cache.
    HitAtNode,
    /// Served after a round trip to the origin (cache miss).
    MissFromOrigin,
    /// The item does not exist in the catalog; the request completes empty.
    ItemNotFound,
}

/// One user's request for one item, and the bookkeeping the engine updates
/// as it moves through the event chain.
#[derive(Debug)]
pub struct Request {
    /// Deterministic human-facing id, `"{user_id}.{per_user_index}"`.
    pub id: String,
    pub user: UserId,
    pub item_tag: ItemTag,
    /// Set once the content has actually been located (cache or origin).
    /// `None` at completion means the catalog never had this tag.
    pub fetched_item: Option<Item>,
    /// Node the request is currently assigned to; may change once on reroute.
    pub node: NodeId,
    pub create_time: TimestampMs,
    pub receive_time: Option<TimestampMs>,
    pub outcome: RequestOutcome,
    pub rerouted: bool,
}

/// Every entity in a single simulation run, addressed by stable index.
#[derive(Debug)]
pub struct World {
    pub nodes: Vec<Node>,
    pub users: Vec<User>,
    pub origin: Origin,
    pub requests: Vec<Request>,
}

impl World {
    pub fn new(
        node_coordinates: &[Coordinate],
        user_coordinates: &[Coordinate],
        origin_coordinate: Coordinate,
        cache_policy: CachePolicy,
        cache_size: u32,
    ) -> Result<Self> {
        if node_coordinates.is_empty() {
            return Err(Error::EmptyTopology);
        }
        let nodes = node_coordinates
            .iter()
            .enumerate()
            .map(|(idx, &coordinate)| Node {
                id: NodeId(idx as u32),
                coordinate,
                cache: Cache::new(cache_policy, cache_size),
                queue: VecDeque::new(),
                stats: NodeStats::default(),
            })
            .collect();
        let users = user_coordinates
            .iter()
            .enumerate()
            .map(|(idx, &coordinate)| User {
                id: UserId(idx as u32),
                coordinate,
            })
            .collect();
        Ok(Self {
            nodes,
            users,
            origin: Origin::new(origin_coordinate),
            requests: Vec::new(),
        })
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn user(&self, id: UserId) -> &User {
        &self.users[id.0 as usize]
    }

    /// The node closest to `coordinate` by straight-line distance, breaking
    /// ties by lowest `NodeId` (construction order).
    pub fn nearest_node(&self, coordinate: Coordinate) -> NodeId {
        self.nodes
            .iter()
            .min_by(|a, b| {
                let da = a.coordinate.distance(&coordinate);
                let db = b.coordinate.distance(&coordinate);
                da.total_cmp(&db).then_with(|| a.id.cmp(&b.id))
            })
            .map(|n| n.id)
            .expect("World::new guarantees at least one node")
    }

    pub fn push_request(&mut self, request: Request) -> RequestIndex {
        self.requests.push(request);
        RequestIndex(self.requests.len() - 1)
    }

    pub fn request(&self, idx: RequestIndex) -> &Request {
        &self.requests[idx.0]
    }

    pub fn request_mut(&mut self, idx: RequestIndex) -> &mut Request {
        &mut self.requests[idx.0]
    }
}
