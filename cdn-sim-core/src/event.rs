//! The monotonic event clock: a priority queue of timestamped events with
//! deterministic tie-breaking.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::types::{NodeId, RequestIndex, TimestampMs};

/// What transition an event triggers, and which request (and, for service
/// events, which node) it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    UserSend(RequestIndex),
    NodeReceiveRequest(RequestIndex),
    NodeServe(NodeId),
    OriginReceive(RequestIndex),
    NodeReceiveItem(RequestIndex),
    UserReceive(RequestIndex),
}

/// A scheduled future invocation of one transition in the request state machine.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    /// Logical clock time at which this event is processed.
    pub proc_time: TimestampMs,
    /// Logical clock time at which this event was scheduled (inserted).
    pub schedule_time: TimestampMs,
    /// Monotonically increasing counter assigned at insertion; makes ordering total.
    pub seq: u64,
    pub kind: EventKind,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.proc_time == other.proc_time
            && self.schedule_time == other.schedule_time
            && self.seq == other.seq
    }
}
impl Eq for Event {}

impl Ord for Event {
    /// Reversed so `BinaryHeap` (a max-heap) pops the smallest
    /// `(proc_time, schedule_time, seq)` tuple first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .proc_time
            .cmp(&self.proc_time)
            .then_with(|| other.schedule_time.cmp(&self.schedule_time))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of events, ordered `(proc_time, schedule_time, seq)`
/// ascending. No cancellation: once scheduled, an event always fires.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Event>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `kind` to fire at `proc_time`, recording `schedule_time` as
    /// the tie-break key and assigning the next sequence number.
    pub fn schedule(&mut self, proc_time: TimestampMs, schedule_time: TimestampMs, kind: EventKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Event {
            proc_time,
            schedule_time,
            seq,
            kind,
        });
    }

    pub fn pop_min(&mut self) -> Option<Event> {
        self.heap.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
