//! Bridge between the diagram and a flat, position-indexed node table.
//!
//! Foreign BDD libraries commonly expose their node store as a flat array:
//! entry `i` is either an inner triple `(var, low position, high position)`
//! or a leaf with the value stored in the `low` field. [`FlatTable`] is that
//! exchange format, and [`FlatManager`] is the contract a foreign manager
//! must offer: exporting subgraphs into such a table and reconstructing
//! nodes from it.
//!
//! [`MtBdd`] implements [`FlatManager`] itself, so the bridge doubles as a
//! transfer path between two engine instances; the same code paths drive a
//! genuinely foreign manager.
//!
//! A raw import is faithful but not necessarily reduced; run the
//! canonicalization pipeline afterwards. A round trip through the bridge
//! preserves the `(bit string, value)` relation of every root.

use hashbrown::HashMap;
use log::debug;

use crate::error::{Error, Result};
use crate::mtbdd::MtBdd;
use crate::node::Node;
use crate::types::{NodeId, NodeName, Value, VarIndex, TERMINAL};

/// Position of an entry in a [`FlatTable`].
pub type FlatPos = usize;

/// One entry of a flat node table.
///
/// Inner entries carry a variable index and the positions of both children.
/// Leaf entries carry [`TERMINAL`] as the variable, the terminal value in
/// the `low` field, and `0` in the `high` field.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FlatNode {
    pub var: VarIndex,
    pub low: u64,
    pub high: u64,
}

impl FlatNode {
    pub fn inner(var: VarIndex, low: FlatPos, high: FlatPos) -> Self {
        debug_assert!(var >= 0, "Inner entries need a variable index");
        Self {
            var,
            low: low as u64,
            high: high as u64,
        }
    }

    pub fn leaf(value: Value) -> Self {
        Self {
            var: TERMINAL,
            low: value,
            high: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.var == TERMINAL
    }
}

/// A growable flat node table. Leaves and inner entries may coexist.
#[derive(Debug, Clone, Default)]
pub struct FlatTable {
    entries: Vec<FlatNode>,
}

impl FlatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, returning its position.
    pub fn push(&mut self, entry: FlatNode) -> FlatPos {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FlatNode] {
        &self.entries
    }
}

/// The contract of a foreign BDD manager with a flat node table.
pub trait FlatManager {
    /// An opaque handle to a node owned by the foreign manager.
    type Ptr: Copy;

    /// Exports the subgraphs under `roots` into a fresh table.
    ///
    /// Shared subgraphs appear once; inner entries refer to children by
    /// table position. The returned vector names the table position of each
    /// root, in order.
    fn export_flat(&mut self, roots: &[Self::Ptr]) -> (FlatTable, Vec<FlatPos>);

    /// Reconstructs a leaf carrying `value`.
    fn make_leaf(&mut self, value: Value) -> Self::Ptr;

    /// Reconstructs an inner node testing `var` with the given children.
    fn make_inner(&mut self, var: VarIndex, low: Self::Ptr, high: Self::Ptr) -> Self::Ptr;
}

impl MtBdd {
    /// Builds a diagram over `num_vars` variables from the foreign subgraphs
    /// under `roots`, binding root name `r` to the import of `roots[r]`.
    ///
    /// # Errors
    ///
    /// Fails if the exported table tests variables outside `[0, num_vars)`
    /// or refers to positions outside the table.
    pub fn new_from_flat<M: FlatManager>(
        num_vars: usize,
        manager: &mut M,
        roots: &[M::Ptr],
    ) -> Result<MtBdd> {
        let (table, positions) = manager.export_flat(roots);
        debug!(
            "new_from_flat: {} entries, {} roots",
            table.len(),
            positions.len()
        );
        MtBdd::from_flat_table(num_vars, &table, &positions)
    }

    /// Builds a diagram directly from a flat table; `positions[r]` names the
    /// entry to bind under root name `r`.
    pub fn from_flat_table(
        num_vars: usize,
        table: &FlatTable,
        positions: &[FlatPos],
    ) -> Result<MtBdd> {
        // Validate before touching the store.
        for (position, entry) in table.entries().iter().enumerate() {
            if entry.is_leaf() {
                continue;
            }
            if entry.var < 0 || entry.var as usize >= num_vars {
                return Err(Error::FlatVarOutOfRange {
                    position,
                    var: entry.var,
                    num_vars,
                });
            }
            for child in [entry.low, entry.high] {
                if child as usize >= table.len() {
                    return Err(Error::FlatChildOutOfRange {
                        position,
                        child,
                        len: table.len(),
                    });
                }
            }
        }

        let mut mtbdd = MtBdd::new(num_vars);

        // Table entries may refer to later positions, so allocate a
        // placeholder slot for every entry first.
        let placeholders: Vec<NodeId> = table
            .entries()
            .iter()
            .map(|_| mtbdd.store_mut().add(Node::default()))
            .collect();

        for (position, entry) in table.entries().iter().enumerate() {
            let node = if entry.is_leaf() {
                Node::terminal(entry.low)
            } else {
                Node::inner(
                    entry.var,
                    Some(placeholders[entry.low as usize]),
                    Some(placeholders[entry.high as usize]),
                )
            };
            *mtbdd.store_mut().node_mut(placeholders[position]) = node;
        }
        mtbdd.store_mut().rebuild_buckets();

        for (name, &position) in positions.iter().enumerate() {
            assert!(position < table.len(), "Root position {} outside the table", position);
            mtbdd.set_root(name as NodeName, placeholders[position]);
        }

        Ok(mtbdd)
    }

    /// Exports the whole diagram into `manager`, returning the foreign
    /// pointer for each root name in order.
    ///
    /// The root index must cover exactly the names `0..num_roots` (the
    /// contiguous state numbering of the owning automaton).
    ///
    /// # Errors
    ///
    /// Fails if the root names are not contiguous.
    ///
    /// # Panics
    ///
    /// Panics if an inner node has a missing child; run
    /// [`make_complete`][MtBdd::make_complete] before exporting.
    pub fn to_flat<M: FlatManager>(&self, manager: &mut M) -> Result<Vec<M::Ptr>> {
        let num_roots = self.num_roots();
        for name in 0..num_roots {
            if self.get_root(name as NodeName).is_none() {
                return Err(Error::NonContiguousRoots {
                    missing: name as NodeName,
                    num_roots,
                });
            }
        }

        // Any bijection between nodes and positions works.
        let order: Vec<NodeId> = self.node_ids().collect();
        let position: HashMap<NodeId, FlatPos> =
            order.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut work: Vec<WorkEntry<M::Ptr>> = order
            .iter()
            .map(|&id| {
                let node = self.node(id);
                let flat = if node.is_terminal() {
                    FlatNode::leaf(node.value)
                } else {
                    let (Some(low), Some(high)) = (node.low, node.high) else {
                        panic!("Node {} has a missing child; export needs a complete diagram", id);
                    };
                    FlatNode::inner(node.var, position[&low], position[&high])
                };
                WorkEntry { flat, made: None }
            })
            .collect();

        debug!("to_flat: {} nodes, {} roots", order.len(), num_roots);

        let mut out = Vec::with_capacity(num_roots);
        for name in 0..num_roots {
            let root = self.get_root(name as NodeName).ok_or(Error::MissingRoot(name as NodeName))?;
            out.push(materialize(manager, &mut work, position[&root]));
        }
        Ok(out)
    }
}

/// Working entry of the export table: the flat shape plus the memoized
/// foreign pointer once the entry has been materialized.
struct WorkEntry<P> {
    flat: FlatNode,
    made: Option<P>,
}

fn materialize<M: FlatManager>(
    manager: &mut M,
    work: &mut [WorkEntry<M::Ptr>],
    position: FlatPos,
) -> M::Ptr {
    if let Some(made) = work[position].made {
        return made;
    }

    let flat = work[position].flat;
    let made = if flat.is_leaf() {
        manager.make_leaf(flat.low)
    } else {
        let low = materialize(manager, work, flat.low as usize);
        let high = materialize(manager, work, flat.high as usize);
        manager.make_inner(flat.var, low, high)
    };

    work[position].made = Some(made);
    made
}

impl FlatManager for MtBdd {
    type Ptr = NodeId;

    fn export_flat(&mut self, roots: &[NodeId]) -> (FlatTable, Vec<FlatPos>) {
        let mut table = FlatTable::new();
        let mut memo: HashMap<NodeId, FlatPos> = HashMap::new();
        let positions = roots
            .iter()
            .map(|&root| export_rec(self, &mut table, &mut memo, root))
            .collect();
        (table, positions)
    }

    fn make_leaf(&mut self, value: Value) -> NodeId {
        self.mk_terminal(value)
    }

    fn make_inner(&mut self, var: VarIndex, low: NodeId, high: NodeId) -> NodeId {
        self.mk_node(var, Some(low), Some(high))
    }
}

fn export_rec(
    mtbdd: &MtBdd,
    table: &mut FlatTable,
    memo: &mut HashMap<NodeId, FlatPos>,
    id: NodeId,
) -> FlatPos {
    if let Some(&position) = memo.get(&id) {
        return position;
    }

    let node = mtbdd.node(id);
    let entry = if node.is_terminal() {
        FlatNode::leaf(node.value)
    } else {
        let (Some(low), Some(high)) = (node.low, node.high) else {
            panic!("Node {} has a missing child; export needs a complete diagram", id);
        };
        let low_position = export_rec(mtbdd, table, memo, low);
        let high_position = export_rec(mtbdd, table, memo, high);
        FlatNode::inner(node.var, low_position, high_position)
    };

    let position = table.push(entry);
    memo.insert(id, position);
    position
}
