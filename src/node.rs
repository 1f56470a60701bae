//! BDD nodes and node identifiers.
//!
//! A node is an immutable tagged variant: either one of the two terminal
//! constants, or an internal decision node `(var, low, high)`. Node
//! identity is the cell index in the unique table; structural equality of
//! the triple therefore coincides with id equality (hash consing).

use std::fmt;

use crate::hash::{pairing3, StructuralHash};
use crate::variable::VarId;

/// A node identifier: the index of the node's cell in the unique table.
///
/// The two terminals occupy reserved cells: zero at index 1, one at
/// index 2 (index 0 is the table sentry).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The zero terminal.
    pub const ZERO: NodeId = NodeId(1);
    /// The one terminal.
    pub const ONE: NodeId = NodeId(2);

    pub(crate) const fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }

    /// The cell index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this id refers to one of the two terminals.
    pub fn is_terminal(self) -> bool {
        self == NodeId::ZERO || self == NodeId::ONE
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A BDD node.
///
/// Terminals carry their constant value and have no children. An internal
/// node branches on `var`: `low` is the cofactor for `var = 0`, `high`
/// for `var = 1`.
///
/// # Invariants (maintained by the manager, not re-validated here)
///
/// - Reduction: `low != high` for every internal node in the table.
/// - Ordering: the variable of an internal child is strictly greater
///   than `var`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Node {
    Terminal(bool),
    Inner { var: VarId, low: NodeId, high: NodeId },
}

impl Default for Node {
    fn default() -> Self {
        Node::Terminal(false)
    }
}

impl Node {
    /// The constant value, for terminals.
    pub fn terminal_value(&self) -> Option<bool> {
        match *self {
            Node::Terminal(value) => Some(value),
            Node::Inner { .. } => None,
        }
    }

    /// The branch variable, for internal nodes.
    pub fn var(&self) -> Option<VarId> {
        match *self {
            Node::Terminal(_) => None,
            Node::Inner { var, .. } => Some(var),
        }
    }

    /// The `(low, high)` children, for internal nodes.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match *self {
            Node::Terminal(_) => None,
            Node::Inner { low, high, .. } => Some((low, high)),
        }
    }
}

impl StructuralHash for Node {
    fn hash64(&self) -> u64 {
        match *self {
            // Terminals never enter a bucket chain, but keep them
            // distinguishable anyway.
            Node::Terminal(value) => value as u64,
            Node::Inner { var, low, high } => {
                pairing3(var.get() as u64, low.0 as u64, high.0 as u64)
            }
        }
    }
}
