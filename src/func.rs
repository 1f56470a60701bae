//! Boolean-function handles.
//!
//! A [`Func`] is the externally-visible value for a Boolean function: a
//! reference-counted wrapper around the function's canonical node. The
//! manager's handle cache guarantees at most one live handle per node, so
//! handle equality *is* semantic equivalence (canonicity).
//!
//! Handles are also the garbage-collection roots: a node stays alive while
//! some held handle can reach it. Cloning a handle is cheap and does not
//! touch the manager.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::node::NodeId;

#[derive(Debug)]
pub(crate) struct FuncInner {
    pub(crate) node: NodeId,
}

/// A handle to a Boolean function.
///
/// Obtained from a [`Bdd`] manager (variable creation, combinators,
/// expression conversion); all operations on it go through the manager
/// that produced it.
///
/// [`Bdd`]: crate::bdd::Bdd
#[derive(Debug, Clone)]
pub struct Func(Rc<FuncInner>);

impl Func {
    pub(crate) fn from_inner(inner: Rc<FuncInner>) -> Self {
        Func(inner)
    }

    /// The canonical node this handle denotes.
    pub fn node(&self) -> NodeId {
        self.0.node
    }

    /// Whether this is the constant-zero function.
    pub fn is_zero(&self) -> bool {
        self.0.node == NodeId::ZERO
    }

    /// Whether this is the constant-one function.
    pub fn is_one(&self) -> bool {
        self.0.node == NodeId::ONE
    }

    /// The constant value, if this handle denotes a constant function.
    pub fn as_bool(&self) -> Option<bool> {
        if self.is_zero() {
            Some(false)
        } else if self.is_one() {
            Some(true)
        } else {
            None
        }
    }
}

/// Structural identity: two handles are equal iff they denote the same
/// Boolean function.
impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        self.0.node == other.0.node
    }
}

impl Eq for Func {}

impl Hash for Func {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.node.hash(state);
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0.node)
    }
}
