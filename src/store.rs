//! Hash-consed arena for MTBDD nodes.
//!
//! Nodes live in a flat arena indexed by [`NodeId`] and are deduplicated
//! through an intrusive hash table: `buckets` holds chain heads, and
//! collision chains run through the parallel `next` array. Slot 0 is a
//! sentry and never holds a node, which lets 0 double as the end-of-chain
//! marker.
//!
//! Canonicalization passes mutate the arena wholesale (dropping slots or
//! rewriting node fields in place). Both invalidate the chains, so they must
//! be followed by [`rebuild_buckets`][NodeStore::rebuild_buckets] before the
//! next consing lookup.

use std::cmp::min;

use crate::node::Node;
use crate::types::NodeId;
use crate::utils::MyHash;

pub struct NodeStore {
    data: Vec<Node>,
    next: Vec<usize>,
    occupied: Vec<bool>,

    buckets: Vec<usize>,
    bitmask: u64,

    /// Index of the first *possibly* free (non-occupied) cell.
    min_free: usize,
    /// Index of the last occupied cell.
    last_index: usize,
    /// Number of occupied cells.
    real_size: usize,
}

impl NodeStore {
    /// Create a new store of capacity `2^bits`.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let capacity = 1 << bits;
        let data = vec![Node::default(); capacity];
        let next = vec![0; capacity];
        let mut occupied = vec![false; capacity];
        occupied[0] = true; // Set 0th cell as occupied (sentry).

        let buckets_bits = min(bits, 16);
        let buckets_size = 1 << buckets_bits;
        let buckets = vec![0; buckets_size];
        let bitmask = (buckets_size - 1) as u64;

        Self {
            data,
            next,
            occupied,
            buckets,
            bitmask,
            min_free: 1,
            last_index: 0,
            real_size: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// High-water slot index; all occupied slots are in `1..=size()`.
    pub fn size(&self) -> usize {
        self.last_index
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.real_size
    }

    pub fn is_empty(&self) -> bool {
        self.real_size == 0
    }

    pub fn is_occupied(&self, id: NodeId) -> bool {
        self.occupied[id.index()]
    }

    pub fn node(&self, id: NodeId) -> Node {
        debug_assert!(self.is_occupied(id), "Slot {} is not occupied", id);
        self.data[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        debug_assert!(self.is_occupied(id), "Slot {} is not occupied", id);
        &mut self.data[id.index()]
    }

    /// Iterates over the handles of all live nodes in slot order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (1..=self.last_index)
            .filter(|&i| self.occupied[i])
            .map(NodeId::new)
    }

    fn alloc(&mut self) -> usize {
        let index = (self.min_free..=self.last_index)
            .find(|&i| !self.occupied[i])
            .unwrap_or_else(|| {
                self.last_index += 1;
                self.last_index
            });

        if index >= self.capacity() {
            panic!("Storage is full");
        }

        self.occupied[index] = true;
        self.min_free = index + 1;
        self.real_size += 1;

        index
    }

    /// Stores `node` in a fresh slot without consing it.
    ///
    /// The new slot is not linked into any bucket chain; callers that need
    /// later lookups to see it must [`rebuild_buckets`][Self::rebuild_buckets].
    /// Used for placeholder-style construction (flat import, the sink).
    pub fn add(&mut self, node: Node) -> NodeId {
        let index = self.alloc();
        self.data[index] = node;
        self.next[index] = 0;
        NodeId::new(index)
    }

    /// Releases a slot. Stale bucket chains must be rebuilt afterwards.
    pub fn drop_at(&mut self, id: NodeId) {
        let index = id.index();
        debug_assert!(self.occupied[index], "Slot {} is not occupied", id);

        self.occupied[index] = false;
        self.min_free = min(self.min_free, index);
        self.real_size -= 1;
    }

    fn bucket_index(&self, node: &Node) -> usize {
        (MyHash::hash(node) & self.bitmask) as usize
    }

    /// Returns the canonical slot for `node`, inserting it if absent.
    ///
    /// The second component tells whether a new slot was created.
    pub fn put(&mut self, node: Node) -> (NodeId, bool) {
        let bucket_index = self.bucket_index(&node);
        let mut index = self.buckets[bucket_index];

        if index == 0 {
            // Create new node and put it into the bucket.
            let id = self.add(node);
            self.buckets[bucket_index] = id.index();
            return (id, true);
        }

        loop {
            assert!(index > 0);

            if node == self.data[index] {
                // The node already exists.
                return (NodeId::new(index), false);
            }

            let next = self.next[index];

            if next == 0 {
                // Create new node and append it to the bucket.
                let id = self.add(node);
                self.next[index] = id.index();
                return (id, true);
            } else {
                // Go to the next node in the bucket.
                index = next;
            }
        }
    }

    /// Rechains every live slot into the bucket table.
    ///
    /// Required after `drop_at` or after rewriting node fields in place:
    /// both leave chains pointing at stale slots or stale hashes.
    pub fn rebuild_buckets(&mut self) {
        self.buckets.fill(0);
        for index in 1..=self.last_index {
            if !self.occupied[index] {
                self.next[index] = 0;
                continue;
            }
            let bucket_index = self.bucket_index(&self.data[index]);
            self.next[index] = self.buckets[bucket_index];
            self.buckets[bucket_index] = index;
        }
    }
}
