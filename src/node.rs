use crate::types::{NodeId, Value, VarIndex, MAX_VALUE, TERMINAL};
use crate::utils::{pairing4, MyHash};

/// One MTBDD node: either an inner test node or a terminal.
///
/// # Fields
///
/// - `var`: variable index for inner nodes, [`TERMINAL`] for terminals
/// - `low`: child followed on a 0 bit (`None` while the diagram is partial)
/// - `high`: child followed on a 1 bit (`None` while the diagram is partial)
/// - `value`: terminal value; [`MAX_VALUE`] for inner nodes
///
/// # Canonical identity
///
/// Two nodes are equivalent iff all four fields agree; children compare by
/// handle, which the hash-consing store makes the same as structural
/// equality. The derived `PartialEq` implements exactly this relation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub var: VarIndex,
    pub low: Option<NodeId>,
    pub high: Option<NodeId>,
    pub value: Value,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            var: TERMINAL,
            low: None,
            high: None,
            value: MAX_VALUE,
        }
    }
}

impl Node {
    /// Creates an inner node testing `var` with the given children.
    pub fn inner(var: VarIndex, low: Option<NodeId>, high: Option<NodeId>) -> Self {
        debug_assert!(var >= 0, "Inner nodes need a variable index");
        Self {
            var,
            low,
            high,
            value: MAX_VALUE,
        }
    }

    /// Creates a terminal node carrying `value`.
    pub fn terminal(value: Value) -> Self {
        Self {
            var: TERMINAL,
            low: None,
            high: None,
            value,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.var == TERMINAL
    }

    pub fn is_inner(&self) -> bool {
        self.var >= 0
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing4(
            self.var as u64,
            MyHash::hash(&self.low),
            MyHash::hash(&self.high),
            self.value,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants() {
        let t = Node::terminal(5);
        assert!(t.is_terminal());
        assert!(!t.is_inner());
        assert_eq!(t.value, 5);

        let n = Node::inner(0, Some(NodeId::new(1)), None);
        assert!(n.is_inner());
        assert!(!n.is_terminal());
        assert_eq!(n.value, MAX_VALUE);
    }

    #[test]
    fn test_equivalence() {
        let a = NodeId::new(1);
        let b = NodeId::new(2);
        assert_eq!(Node::inner(3, Some(a), Some(b)), Node::inner(3, Some(a), Some(b)));
        assert_ne!(Node::inner(3, Some(a), Some(b)), Node::inner(3, Some(b), Some(a)));
        assert_ne!(Node::inner(3, Some(a), Some(b)), Node::inner(2, Some(a), Some(b)));
        assert_eq!(Node::terminal(7), Node::terminal(7));
        assert_ne!(Node::terminal(7), Node::terminal(8));
        // A terminal never matches an inner node with no children.
        assert_ne!(Node::terminal(MAX_VALUE), Node::inner(0, None, None));
    }

    #[test]
    fn test_hash_matches_equivalence() {
        let a = NodeId::new(1);
        let x = Node::inner(2, Some(a), None);
        let y = Node::inner(2, Some(a), None);
        assert_eq!(MyHash::hash(&x), MyHash::hash(&y));
    }
}
