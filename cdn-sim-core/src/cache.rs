//! Bounded-capacity per-node cache with pluggable eviction policy.
//!
//! Capacity is measured in total item weight, not entry count. An item whose
//! weight exceeds the cache's capacity is never inserted — not an error, just
//! a permanent miss for that item (see `Cache::insert`).

use std::collections::HashMap;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::{Item, ItemTag, Weight};

/// Eviction policy selected for a node's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CachePolicy {
    /// Evict the least-recently-used entry first.
    Lru,
    /// Evict the earliest-inserted entry first; `get` never reorders.
    Fifo,
    /// Evict the least-frequently-used entry first, ties broken by insertion order.
    Lfu,
}

#[derive(Debug, Default)]
struct LruState {
    entries: HashMap<ItemTag, Item>,
    /// Recency order: front is least-recently-used, back is most-recently-used.
    order: VecDeque<ItemTag>,
}

#[derive(Debug, Default)]
struct FifoState {
    entries: HashMap<ItemTag, Item>,
    /// Insertion order: front is oldest.
    order: VecDeque<ItemTag>,
}

#[derive(Debug, Default)]
struct LfuState {
    entries: HashMap<ItemTag, Item>,
    freq: HashMap<ItemTag, u64>,
    /// Insertion order, used only to break frequency ties (front is earliest).
    order: VecDeque<ItemTag>,
}

#[derive(Debug)]
enum CacheState {
    Lru(LruState),
    Fifo(FifoState),
    Lfu(LfuState),
}

/// A single node's bounded, policy-driven cache.
#[derive(Debug)]
pub struct Cache {
    policy: CachePolicy,
    max_size: Weight,
    current_weight: Weight,
    state: CacheState,
}

impl Cache {
    pub fn new(policy: CachePolicy, max_size: Weight) -> Self {
        let state = match policy {
            CachePolicy::Lru => CacheState::Lru(LruState::default()),
            CachePolicy::Fifo => CacheState::Fifo(FifoState::default()),
            CachePolicy::Lfu => CacheState::Lfu(LfuState::default()),
        };
        Self {
            policy,
            max_size,
            current_weight: 0,
            state,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn max_size(&self) -> Weight {
        self.max_size
    }

    pub fn current_weight(&self) -> Weight {
        self.current_weight
    }

    pub fn len(&self) -> usize {
        match &self.state {
            CacheState::Lru(s) => s.entries.len(),
            CacheState::Fifo(s) => s.entries.len(),
            CacheState::Lfu(s) => s.entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, tag: &ItemTag) -> bool {
        match &self.state {
            CacheState::Lru(s) => s.entries.contains_key(tag),
            CacheState::Fifo(s) => s.entries.contains_key(tag),
            CacheState::Lfu(s) => s.entries.contains_key(tag),
        }
    }

    /// Look up an item, touching policy metadata per the active eviction policy.
    pub fn get(&mut self, tag: &ItemTag) -> Option<Item> {
        match &mut self.state {
            CacheState::Lru(s) => {
                let item = s.entries.get(tag)?.clone();
                touch_recency(&mut s.order, tag);
                Some(item)
            }
            CacheState::Fifo(s) => s.entries.get(tag).cloned(),
            CacheState::Lfu(s) => {
                let item = s.entries.get(tag)?.clone();
                *s.freq.entry(tag.clone()).or_insert(0) += 1;
                Some(item)
            }
        }
    }

    /// Insert or update an item, evicting entries until it fits.
    ///
    /// A no-op when `item.size > max_size`: the item can never fit, so it is
    /// never cached (every future request for it is a miss by construction).
    pub fn insert(&mut self, item: Item) {
        if item.size > self.max_size {
            tracing::warn!(tag = %item.tag, size = item.size, max_size = self.max_size, "cache insert skipped: item exceeds capacity");
            return;
        }

        match &mut self.state {
            CacheState::Lru(_) => self.insert_lru(item),
            CacheState::Fifo(_) => self.insert_fifo(item),
            CacheState::Lfu(_) => self.insert_lfu(item),
        }
        self.evict_until_fits();
    }

    fn insert_lru(&mut self, item: Item) {
        let CacheState::Lru(s) = &mut self.state else {
            unreachable!("insert_lru called on non-LRU cache")
        };
        let tag = item.tag.clone();
        if let Some(existing) = s.entries.insert(tag.clone(), item) {
            self.current_weight = self.current_weight - existing.size + s.entries[&tag].size;
        } else {
            self.current_weight += s.entries[&tag].size;
            s.order.push_back(tag.clone());
        }
        touch_recency(&mut s.order, &tag);
    }

    fn insert_fifo(&mut self, item: Item) {
        let CacheState::Fifo(s) = &mut self.state else {
            unreachable!("insert_fifo called on non-FIFO cache")
        };
        let tag = item.tag.clone();
        if let Some(existing) = s.entries.insert(tag.clone(), item) {
            self.current_weight = self.current_weight - existing.size + s.entries[&tag].size;
        } else {
            self.current_weight += s.entries[&tag].size;
            s.order.push_back(tag);
        }
    }

    fn insert_lfu(&mut self, item: Item) {
        let CacheState::Lfu(s) = &mut self.state else {
            unreachable!("insert_lfu called on non-LFU cache")
        };
        let tag = item.tag.clone();
        if let Some(existing) = s.entries.insert(tag.clone(), item) {
            self.current_weight = self.current_weight - existing.size + s.entries[&tag].size;
            *s.freq.entry(tag).or_insert(0) += 1;
        } else {
            self.current_weight += s.entries[&tag].size;
            s.freq.insert(tag.clone(), 1);
            s.order.push_back(tag);
        }
    }

    fn evict_until_fits(&mut self) {
        while self.current_weight > self.max_size {
            let victim = match &mut self.state {
                CacheState::Lru(s) => s.order.pop_front(),
                CacheState::Fifo(s) => s.order.pop_front(),
                CacheState::Lfu(s) => lfu_victim(s),
            };
            let Some(victim) = victim else {
                break;
            };
            let removed = match &mut self.state {
                CacheState::Lru(s) => s.entries.remove(&victim),
                CacheState::Fifo(s) => s.entries.remove(&victim),
                CacheState::Lfu(s) => {
                    s.freq.remove(&victim);
                    s.entries.remove(&victim)
                }
            };
            if let Some(removed) = removed {
                tracing::trace!(tag = %victim, size = removed.size, "cache eviction");
                self.current_weight -= removed.size;
            }
        }
    }
}

/// Move `tag` to the most-recently-used end of an LRU order deque.
fn touch_recency(order: &mut VecDeque<ItemTag>, tag: &ItemTag) {
    if let Some(pos) = order.iter().position(|t| t == tag) {
        order.remove(pos);
    }
    order.push_back(tag.clone());
}

/// Find and remove (from `order`) the least-frequently-used tag, ties broken
/// by earliest insertion. `order` is insertion-ordered, so the first minimum
/// found scanning front-to-back is the earliest-inserted among ties.
fn lfu_victim(s: &mut LfuState) -> Option<ItemTag> {
    let mut best: Option<(usize, u64)> = None;
    for (idx, tag) in s.order.iter().enumerate() {
        let freq = *s.freq.get(tag).unwrap_or(&0);
        match best {
            Some((_, best_freq)) if freq >= best_freq => {}
            _ => best = Some((idx, freq)),
        }
    }
    let (idx, _) = best?;
    s.order.remove(idx)
}
