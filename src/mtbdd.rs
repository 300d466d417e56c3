//! The MTBDD manager.
//!
//! [`MtBdd`] owns a hash-consed [`NodeStore`] and a root index mapping root
//! names (automaton states) to their entry nodes. All construction goes
//! through the manager, which keeps at most one physical node per
//! equivalence class, so several roots transparently share common subgraphs.
//!
//! The intended life cycle is: insert one bit string per transition, then run
//! the canonicalization pipeline
//! `trim` -> `remove_redundant_tests` -> `make_complete`,
//! then enumerate paths or export through the flat bridge.

use std::fmt::Debug;

use hashbrown::HashMap;
use log::debug;

use crate::error::{Error, Result};
use crate::node::Node;
use crate::store::NodeStore;
use crate::types::{display_bits, Bit, NodeId, NodeName, Value, VarIndex, LO, MAX_VALUE, TERMINAL};

/// Default arena capacity exponent (2^16 slots).
pub const DEFAULT_STORAGE_BITS: usize = 16;

pub struct MtBdd {
    num_vars: usize,
    storage_bits: usize,
    store: NodeStore,
    roots: HashMap<NodeName, NodeId>,
}

impl MtBdd {
    /// Creates an empty diagram over `num_vars` variables.
    pub fn new(num_vars: usize) -> Self {
        Self::with_capacity(num_vars, DEFAULT_STORAGE_BITS)
    }

    /// Creates an empty diagram with an arena of `2^storage_bits` slots.
    pub fn with_capacity(num_vars: usize, storage_bits: usize) -> Self {
        Self {
            num_vars,
            storage_bits,
            store: NodeStore::new(storage_bits),
            roots: HashMap::new(),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Number of live nodes in the store.
    pub fn num_nodes(&self) -> usize {
        self.store.len()
    }

    pub fn num_roots(&self) -> usize {
        self.roots.len()
    }

    /// Reads the node behind a handle.
    pub fn node(&self, id: NodeId) -> Node {
        self.store.node(id)
    }

    /// Iterates over the handles of all live nodes (unspecified order).
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.store.ids()
    }

    /// Iterates over `(name, entry node)` pairs (unspecified order).
    pub fn roots(&self) -> impl Iterator<Item = (NodeName, NodeId)> + '_ {
        self.roots.iter().map(|(&name, &id)| (name, id))
    }

    pub(crate) fn store_mut(&mut self) -> &mut NodeStore {
        &mut self.store
    }
}

impl Default for MtBdd {
    fn default() -> Self {
        MtBdd::new(0)
    }
}

impl Debug for MtBdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MtBdd")
            .field("num_vars", &self.num_vars)
            .field("num_nodes", &self.store.len())
            .field("num_roots", &self.roots.len())
            .finish()
    }
}

impl MtBdd {
    fn check_child_order(&self, var: VarIndex, child: Option<NodeId>) -> bool {
        match child {
            None => true,
            Some(id) => {
                let child_var = self.store.node(id).var;
                // TERMINAL sorts after every variable.
                child_var == TERMINAL || child_var > var
            }
        }
    }

    /// Returns the canonical inner node testing `var` with the given children.
    ///
    /// # Panics
    ///
    /// Panics if `var` is outside `[0, num_vars)`.
    pub fn mk_node(&mut self, var: VarIndex, low: Option<NodeId>, high: Option<NodeId>) -> NodeId {
        debug!("mk_node(var = {}, low = {:?}, high = {:?})", var, low, high);

        assert!(
            var >= 0 && (var as usize) < self.num_vars,
            "Variable index {} out of range (diagram has {} variables)",
            var,
            self.num_vars
        );
        debug_assert!(self.check_child_order(var, low), "Low child tests a variable <= {}", var);
        debug_assert!(self.check_child_order(var, high), "High child tests a variable <= {}", var);

        let (id, is_new) = self.store.put(Node::inner(var, low, high));
        if is_new {
            debug!("mk_node: created new node {}", id);
        }
        id
    }

    /// Returns the canonical terminal carrying `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is the reserved "unset" marker.
    pub fn mk_terminal(&mut self, value: Value) -> NodeId {
        assert_ne!(value, MAX_VALUE, "Terminal value is reserved");
        self.store.put(Node::terminal(value)).0
    }

    /// Inserts a preconstructed node, returning its canonical handle and
    /// whether a new slot was created.
    pub fn insert_node(&mut self, node: Node) -> (NodeId, bool) {
        self.store.put(node)
    }

    /// Creates a fresh entry node for `name`: an inner node at variable 0
    /// with both children absent.
    ///
    /// # Errors
    ///
    /// Fails if a root named `name` already exists.
    pub fn create_root(&mut self, name: NodeName) -> Result<NodeId> {
        if self.roots.contains_key(&name) {
            return Err(Error::DuplicateRoot(name));
        }
        let root = self.mk_node(0, None, None);
        self.roots.insert(name, root);
        Ok(root)
    }

    /// Binds an existing node as the entry point for `name`, replacing and
    /// returning any prior binding.
    pub fn set_root(&mut self, name: NodeName, node: NodeId) -> Option<NodeId> {
        self.roots.insert(name, node)
    }

    pub fn get_root(&self, name: NodeName) -> Option<NodeId> {
        self.roots.get(&name).copied()
    }
}

impl MtBdd {
    /// Augments the diagram so that the walk from `name` along `bits`
    /// (low on 0, high on 1) ends in a terminal carrying `value`.
    ///
    /// Paths that disagree with `bits` at some variable are untouched and
    /// keep sharing subgraphs where possible. The root index entry for
    /// `name` is created or retargeted to the returned node. The result may
    /// be partial or non-reduced; run the canonicalization pipeline after a
    /// batch of insertions.
    ///
    /// # Errors
    ///
    /// Fails if `bits.len()` differs from the diagram's variable count.
    pub fn insert_bit_string(&mut self, name: NodeName, bits: &[Bit], value: Value) -> Result<NodeId> {
        if bits.len() != self.num_vars {
            return Err(Error::BitStringLength {
                expected: self.num_vars,
                actual: bits.len(),
            });
        }
        debug!(
            "insert_bit_string(name = {}, bits = {}, value = {})",
            name,
            display_bits(bits),
            value
        );

        let src = self.get_root(name);
        let new_root = self.insert_rec(src, 0, bits, value);
        self.roots.insert(name, new_root);
        Ok(new_root)
    }

    fn insert_rec(&mut self, src: Option<NodeId>, var: usize, bits: &[Bit], value: Value) -> NodeId {
        // Past the last variable: the path ends in a terminal.
        if var == self.num_vars {
            return self.mk_terminal(value);
        }

        let bit = bits[var];

        let Some(src) = src else {
            // No node here yet: build the remaining chain with the other
            // child absent.
            let child = self.insert_rec(None, var + 1, bits, value);
            return if bit == LO {
                self.mk_node(var as VarIndex, Some(child), None)
            } else {
                self.mk_node(var as VarIndex, None, Some(child))
            };
        };

        let node = self.store.node(src);
        let mut low = node.low;
        let mut high = node.high;
        if bit == LO {
            low = Some(self.insert_rec(node.low, var + 1, bits, value));
        } else {
            high = Some(self.insert_rec(node.high, var + 1, bits, value));
        }

        // Nothing changed along this branch: keep the shared node.
        if low == node.low && high == node.high {
            return src;
        }

        self.mk_node(var as VarIndex, low, high)
    }

    /// Evaluates the diagram: descends from `node` along `bits` and returns
    /// the terminal value reached, or `None` if the walk falls into a hole
    /// of a partial diagram.
    ///
    /// # Errors
    ///
    /// Fails if `bits.len()` differs from the diagram's variable count.
    pub fn evaluate(&self, node: NodeId, bits: &[Bit]) -> Result<Option<Value>> {
        if bits.len() != self.num_vars {
            return Err(Error::BitStringLength {
                expected: self.num_vars,
                actual: bits.len(),
            });
        }

        let mut current = self.store.node(node);
        while !current.is_terminal() {
            let child = if bits[current.var as usize] == LO {
                current.low
            } else {
                current.high
            };
            match child {
                None => return Ok(None),
                Some(id) => current = self.store.node(id),
            }
        }
        Ok(Some(current.value))
    }
}

impl MtBdd {
    /// Drops every node unreachable from the root index.
    ///
    /// Surviving handles stay valid; the root index is unchanged.
    pub fn trim(&mut self) -> &mut Self {
        let mut marked = vec![false; self.store.size() + 1];

        let mut worklist: Vec<NodeId> = Vec::new();
        for &root in self.roots.values() {
            if !marked[root.index()] {
                marked[root.index()] = true;
                worklist.push(root);
            }
        }

        while let Some(id) = worklist.pop() {
            let node = self.store.node(id);
            for child in [node.low, node.high].into_iter().flatten() {
                if !marked[child.index()] {
                    marked[child.index()] = true;
                    worklist.push(child);
                }
            }
        }

        let before = self.store.len();
        let unreachable: Vec<NodeId> = self.store.ids().filter(|id| !marked[id.index()]).collect();
        for id in unreachable {
            self.store.drop_at(id);
        }
        self.store.rebuild_buckets();
        debug!("trim: {} -> {} nodes", before, self.store.len());

        self
    }

    /// Rewrites every root's subgraph bottom-up, eliminating inner nodes
    /// whose two children coincide, and replaces the store with the freshly
    /// built set.
    ///
    /// All previously held [`NodeId`]s are invalidated. The pass is
    /// idempotent.
    pub fn remove_redundant_tests(&mut self) -> &mut Self {
        let mut fresh = NodeStore::new(self.storage_bits);
        let mut memo: HashMap<NodeId, NodeId> = HashMap::new();

        let mut new_roots = HashMap::with_capacity(self.roots.len());
        for (&name, &root) in &self.roots {
            let new_root = Self::rewrite(&self.store, &mut fresh, &mut memo, Some(root));
            if let Some(new_root) = new_root {
                new_roots.insert(name, new_root);
            }
        }

        debug!(
            "remove_redundant_tests: {} -> {} nodes",
            self.store.len(),
            fresh.len()
        );
        self.store = fresh;
        self.roots = new_roots;

        self
    }

    fn rewrite(
        store: &NodeStore,
        fresh: &mut NodeStore,
        memo: &mut HashMap<NodeId, NodeId>,
        id: Option<NodeId>,
    ) -> Option<NodeId> {
        let id = id?;
        if let Some(&done) = memo.get(&id) {
            return Some(done);
        }

        let node = store.node(id);
        let new_id = if node.is_terminal() {
            fresh.put(node).0
        } else {
            let low = Self::rewrite(store, fresh, memo, node.low);
            let high = Self::rewrite(store, fresh, memo, node.high);
            match (low, high) {
                // The test is redundant: both branches lead to the same node.
                (Some(l), Some(h)) if l == h => l,
                _ => fresh.put(Node::inner(node.var, low, high)).0,
            }
        };

        memo.insert(id, new_id);
        Some(new_id)
    }

    /// Completes the diagram with a rejecting sink terminal.
    ///
    /// Every absent child of an inner node is redirected to a terminal
    /// carrying `sink_value`. With `complete_terminals`, every terminal
    /// value that is not yet a root name additionally gets a root bound to
    /// the sink, so that all states referenced inside the diagram are
    /// defined. The sink terminal (and its own root binding under
    /// `sink_value`) is materialized only if at least one hole was filled or
    /// at least one terminal-completion root was added.
    pub fn make_complete(&mut self, sink_value: Value, complete_terminals: bool) -> &mut Self {
        assert_ne!(sink_value, MAX_VALUE, "Sink value is reserved");

        let ids: Vec<NodeId> = self.store.ids().collect();
        let sink = self.store.add(Node::terminal(sink_value));
        let mut sink_used = false;

        for id in ids {
            let node = self.store.node(id);
            if node.is_terminal() {
                // Values referenced inside the diagram but never defined as
                // roots become explicit rejecting states.
                if complete_terminals && !self.roots.contains_key(&node.value) {
                    self.roots.insert(node.value, sink);
                    sink_used = true;
                }
                continue;
            }

            if node.low.is_none() {
                self.store.node_mut(id).low = Some(sink);
                sink_used = true;
            }
            if node.high.is_none() {
                self.store.node_mut(id).high = Some(sink);
                sink_used = true;
            }
        }

        if sink_used {
            self.roots.insert(sink_value, sink);
            // In-place child rewrites changed node hashes.
            self.store.rebuild_buckets();
            debug!("make_complete: sink {} materialized as {}", sink_value, sink);
        } else {
            self.store.drop_at(sink);
            debug!("make_complete: diagram already complete");
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BitString, SINK_VALUE};

    use test_log::test;

    fn bits(s: &str) -> BitString {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_mk_node_hash_consing() {
        let mut mtbdd = MtBdd::new(2);
        let t = mtbdd.mk_terminal(3);
        let a = mtbdd.mk_node(1, Some(t), None);
        let b = mtbdd.mk_node(1, Some(t), None);
        assert_eq!(a, b);
        assert_eq!(mtbdd.num_nodes(), 2);

        let c = mtbdd.mk_node(1, None, Some(t));
        assert_ne!(a, c);
    }

    #[test]
    fn test_mk_terminal_dedup() {
        let mut mtbdd = MtBdd::new(1);
        assert_eq!(mtbdd.mk_terminal(5), mtbdd.mk_terminal(5));
        assert_ne!(mtbdd.mk_terminal(5), mtbdd.mk_terminal(6));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_mk_node_var_out_of_range() {
        let mut mtbdd = MtBdd::new(2);
        mtbdd.mk_node(2, None, None);
    }

    #[test]
    fn test_create_root() {
        let mut mtbdd = MtBdd::new(2);
        let root = mtbdd.create_root(0).unwrap();
        assert_eq!(mtbdd.get_root(0), Some(root));
        assert_eq!(mtbdd.create_root(0), Err(Error::DuplicateRoot(0)));
        assert_eq!(mtbdd.get_root(1), None);
    }

    #[test]
    fn test_set_root_replaces() {
        let mut mtbdd = MtBdd::new(1);
        let t = mtbdd.mk_terminal(3);
        assert_eq!(mtbdd.set_root(0, t), None);
        let u = mtbdd.mk_terminal(4);
        assert_eq!(mtbdd.set_root(0, u), Some(t));
        assert_eq!(mtbdd.get_root(0), Some(u));
    }

    #[test]
    fn test_insert_bit_string_length_mismatch() {
        let mut mtbdd = MtBdd::new(3);
        let err = mtbdd.insert_bit_string(0, &bits("01"), 1).unwrap_err();
        assert_eq!(
            err,
            Error::BitStringLength {
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(mtbdd.num_nodes(), 0);
    }

    #[test]
    fn test_insert_and_evaluate() {
        let mut mtbdd = MtBdd::new(3);
        let root = mtbdd.insert_bit_string(0, &bits("010"), 7).unwrap();
        assert_eq!(mtbdd.evaluate(root, &bits("010")).unwrap(), Some(7));
        assert_eq!(mtbdd.evaluate(root, &bits("011")).unwrap(), None);
        assert_eq!(mtbdd.evaluate(root, &bits("110")).unwrap(), None);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut mtbdd = MtBdd::new(3);
        let a = mtbdd.insert_bit_string(0, &bits("101"), 2).unwrap();
        let n = mtbdd.num_nodes();
        let b = mtbdd.insert_bit_string(0, &bits("101"), 2).unwrap();
        assert_eq!(a, b);
        assert_eq!(mtbdd.num_nodes(), n);
    }

    #[test]
    fn test_insert_shares_maximal_prefix() {
        // Two insertions differing only in the last variable share the
        // nodes above it.
        let mut mtbdd = MtBdd::new(3);
        mtbdd.insert_bit_string(0, &bits("000"), 1).unwrap();
        let before = mtbdd.num_nodes();
        mtbdd.insert_bit_string(0, &bits("001"), 2).unwrap();
        // The spine is rewritten once (the old one becomes garbage for
        // trim); everything below the untouched branch is shared.
        assert!(mtbdd.num_nodes() <= before + 4);

        let root = mtbdd.get_root(0).unwrap();
        assert_eq!(mtbdd.evaluate(root, &bits("000")).unwrap(), Some(1));
        assert_eq!(mtbdd.evaluate(root, &bits("001")).unwrap(), Some(2));
    }

    #[test]
    fn test_insert_through_created_root() {
        let mut mtbdd = MtBdd::new(2);
        mtbdd.create_root(0).unwrap();
        mtbdd.insert_bit_string(0, &bits("10"), 4).unwrap();
        let root = mtbdd.get_root(0).unwrap();
        assert_eq!(mtbdd.evaluate(root, &bits("10")).unwrap(), Some(4));
        assert_eq!(mtbdd.evaluate(root, &bits("00")).unwrap(), None);
    }

    #[test]
    fn test_insert_empty_bits_binds_terminal() {
        // With no variables the empty bit string is the only path.
        let mut mtbdd = MtBdd::new(0);
        let root = mtbdd.insert_bit_string(0, &[], 9).unwrap();
        assert!(mtbdd.node(root).is_terminal());
        assert_eq!(mtbdd.evaluate(root, &[]).unwrap(), Some(9));
    }

    #[test]
    fn test_trim_drops_unreachable() {
        let mut mtbdd = MtBdd::new(2);
        mtbdd.insert_bit_string(0, &bits("00"), 1).unwrap();
        // Orphan nodes: an unrooted terminal and chain.
        let orphan_t = mtbdd.mk_terminal(99);
        mtbdd.mk_node(1, Some(orphan_t), None);
        let before = mtbdd.num_nodes();

        mtbdd.trim();
        assert!(mtbdd.num_nodes() < before);

        // Every surviving node is reachable from some root.
        let mut reachable = Vec::new();
        let mut stack: Vec<NodeId> = mtbdd.roots().map(|(_, id)| id).collect();
        while let Some(id) = stack.pop() {
            if reachable.contains(&id) {
                continue;
            }
            reachable.push(id);
            let node = mtbdd.node(id);
            stack.extend([node.low, node.high].into_iter().flatten());
        }
        for id in mtbdd.node_ids() {
            assert!(reachable.contains(&id), "{} is unreachable", id);
        }
    }

    #[test]
    fn test_trim_keeps_roots_and_answers() {
        let mut mtbdd = MtBdd::new(2);
        mtbdd.insert_bit_string(0, &bits("01"), 3).unwrap();
        mtbdd.mk_terminal(42);
        mtbdd.trim();
        let root = mtbdd.get_root(0).unwrap();
        assert_eq!(mtbdd.evaluate(root, &bits("01")).unwrap(), Some(3));
    }

    #[test]
    fn test_remove_redundant_tests_collapses() {
        // Both branches of the last variable lead to the same value, so the
        // test at variable 2 disappears.
        let mut mtbdd = MtBdd::new(3);
        mtbdd.insert_bit_string(0, &bits("000"), 2).unwrap();
        mtbdd.insert_bit_string(0, &bits("001"), 2).unwrap();

        mtbdd.trim().remove_redundant_tests();

        // One var-0 node, one var-1 node, one terminal.
        assert_eq!(mtbdd.num_nodes(), 3);
        let root = mtbdd.get_root(0).unwrap();
        let root_node = mtbdd.node(root);
        assert_eq!(root_node.var, 0);
        let mid = mtbdd.node(root_node.low.unwrap());
        assert_eq!(mid.var, 1);
        let leaf = mtbdd.node(mid.low.unwrap());
        assert!(leaf.is_terminal());
        assert_eq!(leaf.value, 2);

        // No inner node has two identical children.
        for id in mtbdd.node_ids() {
            let node = mtbdd.node(id);
            if node.is_inner() && node.low.is_some() {
                assert_ne!(node.low, node.high);
            }
        }
    }

    #[test]
    fn test_remove_redundant_tests_is_idempotent() {
        fn snapshot(mtbdd: &MtBdd) -> Vec<(NodeName, BitString, Value)> {
            let mut v: Vec<_> = mtbdd
                .roots()
                .flat_map(|(name, id)| mtbdd.paths(id).map(move |(b, value)| (name, b, value)))
                .collect();
            v.sort();
            v
        }

        let mut mtbdd = MtBdd::new(3);
        mtbdd.insert_bit_string(0, &bits("100"), 5).unwrap();
        mtbdd.insert_bit_string(0, &bits("101"), 5).unwrap();
        mtbdd.insert_bit_string(1, &bits("111"), 6).unwrap();

        mtbdd.remove_redundant_tests();
        let nodes_after_first = mtbdd.num_nodes();
        let paths_after_first = snapshot(&mtbdd);

        mtbdd.remove_redundant_tests();
        assert_eq!(mtbdd.num_nodes(), nodes_after_first);
        assert_eq!(snapshot(&mtbdd), paths_after_first);
    }

    #[test]
    fn test_make_complete_fills_holes() {
        let mut mtbdd = MtBdd::new(2);
        mtbdd.insert_bit_string(0, &bits("00"), 1).unwrap();
        mtbdd.make_complete(SINK_VALUE, false);

        for id in mtbdd.node_ids() {
            let node = mtbdd.node(id);
            if node.is_inner() {
                assert!(node.low.is_some());
                assert!(node.high.is_some());
            }
        }

        let root = mtbdd.get_root(0).unwrap();
        assert_eq!(mtbdd.evaluate(root, &bits("11")).unwrap(), Some(SINK_VALUE));
        assert_eq!(mtbdd.get_root(SINK_VALUE), Some(mtbdd.mk_terminal(SINK_VALUE)));
    }

    #[test]
    fn test_make_complete_completes_terminals() {
        // Value 1 appears inside the diagram but is not a root name.
        let mut mtbdd = MtBdd::new(2);
        mtbdd.insert_bit_string(0, &bits("00"), 1).unwrap();
        mtbdd.make_complete(SINK_VALUE, true);

        let sink = mtbdd.get_root(SINK_VALUE).expect("sink root");
        assert_eq!(mtbdd.node(sink).value, SINK_VALUE);
        assert_eq!(mtbdd.get_root(1), Some(sink));

        let mut names: Vec<_> = mtbdd.roots().map(|(name, _)| name).collect();
        names.sort();
        assert_eq!(names, vec![0, 1, SINK_VALUE]);
    }

    #[test]
    fn test_make_complete_no_sink_when_already_complete() {
        // A total single-state relation: both branches defined, value 0 is
        // already a root name. The sink must not be materialized.
        let mut mtbdd = MtBdd::new(1);
        mtbdd.insert_bit_string(0, &bits("0"), 0).unwrap();
        mtbdd.insert_bit_string(0, &bits("1"), 0).unwrap();
        let before = mtbdd.num_nodes();

        mtbdd.make_complete(SINK_VALUE, true);
        assert_eq!(mtbdd.num_nodes(), before);
        assert_eq!(mtbdd.get_root(SINK_VALUE), None);
        assert_eq!(mtbdd.num_roots(), 1);
    }

    #[test]
    fn test_make_complete_custom_sink_value() {
        // The caller may hand out a real state id as the sink, as when
        // appending a reject state right after the existing ones.
        let mut mtbdd = MtBdd::new(1);
        mtbdd.insert_bit_string(0, &bits("0"), 0).unwrap();
        mtbdd.make_complete(1, true);

        let sink = mtbdd.get_root(1).expect("sink root");
        assert_eq!(mtbdd.node(sink).value, 1);
        let root = mtbdd.get_root(0).unwrap();
        assert_eq!(mtbdd.evaluate(root, &bits("1")).unwrap(), Some(1));
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let mut mtbdd = MtBdd::new(3);
        mtbdd.insert_bit_string(0, &bits("000"), 1).unwrap();
        mtbdd.insert_bit_string(0, &bits("100"), 1).unwrap();
        mtbdd.insert_bit_string(1, &bits("011"), 0).unwrap();

        mtbdd.trim().remove_redundant_tests().make_complete(SINK_VALUE, true);
        let nodes = mtbdd.num_nodes();
        let mut roots: Vec<_> = mtbdd.roots().map(|(name, _)| name).collect();
        roots.sort();
        let mut paths: Vec<_> = mtbdd
            .roots()
            .flat_map(|(_, id)| mtbdd.paths(id))
            .collect();
        paths.sort();

        mtbdd.trim().remove_redundant_tests().make_complete(SINK_VALUE, true);
        assert_eq!(mtbdd.num_nodes(), nodes);
        let mut roots2: Vec<_> = mtbdd.roots().map(|(name, _)| name).collect();
        roots2.sort();
        assert_eq!(roots, roots2);
        let mut paths2: Vec<_> = mtbdd
            .roots()
            .flat_map(|(_, id)| mtbdd.paths(id))
            .collect();
        paths2.sort();
        assert_eq!(paths, paths2);
    }

    #[test]
    fn test_hash_cons_uniqueness_invariant() {
        let mut mtbdd = MtBdd::new(3);
        mtbdd.insert_bit_string(0, &bits("000"), 1).unwrap();
        mtbdd.insert_bit_string(0, &bits("010"), 2).unwrap();
        mtbdd.insert_bit_string(1, &bits("000"), 1).unwrap();
        mtbdd.trim().remove_redundant_tests().make_complete(SINK_VALUE, true);

        let all: Vec<_> = mtbdd.node_ids().collect();
        for (i, &a) in all.iter().enumerate() {
            for &b in &all[i + 1..] {
                assert_ne!(mtbdd.node(a), mtbdd.node(b), "{} and {} are equivalent", a, b);
            }
        }
    }

    #[test]
    fn test_strict_ordering_invariant() {
        let mut mtbdd = MtBdd::new(4);
        mtbdd.insert_bit_string(0, &bits("0110"), 1).unwrap();
        mtbdd.insert_bit_string(0, &bits("0111"), 2).unwrap();
        mtbdd.trim().remove_redundant_tests().make_complete(SINK_VALUE, true);

        for id in mtbdd.node_ids() {
            let node = mtbdd.node(id);
            if !node.is_inner() {
                continue;
            }
            for child in [node.low, node.high].into_iter().flatten() {
                let child_node = mtbdd.node(child);
                assert!(
                    child_node.is_terminal() || child_node.var > node.var,
                    "child of {} does not test a later variable",
                    id
                );
            }
        }
    }

    #[test]
    fn test_shared_roots() {
        // Two states with identical behavior share one entry node after
        // canonicalization of insertions built through the same subgraphs.
        let mut mtbdd = MtBdd::new(2);
        mtbdd.insert_bit_string(0, &bits("01"), 5).unwrap();
        mtbdd.insert_bit_string(1, &bits("01"), 5).unwrap();
        mtbdd.remove_redundant_tests();
        assert_eq!(mtbdd.get_root(0), mtbdd.get_root(1));
    }
}
