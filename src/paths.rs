//! Iterator over all bit strings reaching a terminal.
//!
//! A reduced diagram does not test every variable along every path, so a
//! single terminal edge can stand for many input assignments. The iterator
//! expands each skipped variable into both `0` and `1` ("don't-cares") and
//! yields full-width `(bit string, terminal value)` pairs: the multiplicity
//! of a diagram path is `2^(skipped variables along it)`.
//!
//! Enumerating a partial diagram is allowed; absent children are simply not
//! descended. Run [`make_complete`][crate::mtbdd::MtBdd::make_complete]
//! first to cover every input assignment.
//!
//! # Example
//!
//! ```
//! use mtbdd_rs::mtbdd::MtBdd;
//! use mtbdd_rs::types::{HI, LO};
//!
//! let mut mtbdd = MtBdd::new(2);
//! mtbdd.insert_bit_string(0, &[LO, LO], 7).unwrap();
//! mtbdd.insert_bit_string(0, &[LO, HI], 7).unwrap();
//! mtbdd.trim().remove_redundant_tests();
//!
//! // The variable-1 test collapsed; enumeration expands it back.
//! let root = mtbdd.get_root(0).unwrap();
//! let paths: Vec<_> = mtbdd.paths(root).collect();
//! assert_eq!(paths.len(), 2);
//! ```

use crate::error::{Error, Result};
use crate::mtbdd::MtBdd;
use crate::types::{Bit, BitString, NodeId, NodeName, Value, VarIndex, HI, LO, TERMINAL};

impl MtBdd {
    /// Returns an iterator over all `(bit string, value)` pairs reaching a
    /// terminal from `node`. Enumeration order is unspecified.
    pub fn paths(&self, node: NodeId) -> Paths<'_> {
        Paths::new(self, node)
    }

    /// Like [`paths`][Self::paths], starting from the entry node of `name`.
    ///
    /// # Errors
    ///
    /// Fails if there is no root named `name`.
    pub fn root_paths(&self, name: NodeName) -> Result<Paths<'_>> {
        let root = self.get_root(name).ok_or(Error::MissingRoot(name))?;
        Ok(self.paths(root))
    }
}

/// Number of variables decided by the edge from a node at `src` to a child
/// at `tgt`: one decision bit plus one bit per skipped variable.
fn transition_length(num_vars: usize, src: VarIndex, tgt: VarIndex) -> usize {
    if tgt == TERMINAL {
        num_vars - src as usize
    } else {
        (tgt - src) as usize
    }
}

/// All extensions of `prefix` by `count` don't-care bits.
fn expand_dont_cares(prefix: &[Bit], count: usize) -> Vec<BitString> {
    if count == 0 {
        return vec![prefix.to_vec()];
    }

    let mut result = Vec::new();

    let mut with_lo = prefix.to_vec();
    with_lo.push(LO);
    result.extend(expand_dont_cares(&with_lo, count - 1));

    let mut with_hi = prefix.to_vec();
    with_hi.push(HI);
    result.extend(expand_dont_cares(&with_hi, count - 1));

    result
}

/// An iterator over all full-width paths of a diagram.
///
/// Created by [`MtBdd::paths()`]. Depth-first over the diagram; the pending
/// frames carry the already-expanded bit prefix leading to their node.
pub struct Paths<'a> {
    mtbdd: &'a MtBdd,
    stack: Vec<(NodeId, BitString)>,
}

impl<'a> Paths<'a> {
    pub fn new(mtbdd: &'a MtBdd, node: NodeId) -> Self {
        // Variables above the entry node are don't-cares as well.
        let leading = transition_length(mtbdd.num_vars(), 0, mtbdd.node(node).var);
        let stack = expand_dont_cares(&[], leading)
            .into_iter()
            .map(|prefix| (node, prefix))
            .collect();
        Paths { mtbdd, stack }
    }
}

impl Iterator for Paths<'_> {
    type Item = (BitString, Value);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, prefix)) = self.stack.pop() {
            let node = self.mtbdd.node(id);

            if node.is_terminal() {
                return Some((prefix, node.value));
            }

            for (bit, child) in [(LO, node.low), (HI, node.high)] {
                let Some(child) = child else {
                    continue;
                };
                let child_var = self.mtbdd.node(child).var;
                let length = transition_length(self.mtbdd.num_vars(), node.var, child_var);
                debug_assert!(length > 0, "Child does not test a later variable");

                let mut base = prefix.clone();
                base.push(bit);
                for expanded in expand_dont_cares(&base, length - 1) {
                    self.stack.push((child, expanded));
                }
            }
        }
        None
    }
}
