//! Error taxonomy for the engine.
//!
//! Every operation here is a deterministic in-memory computation, so there
//! is no retry story: an error is either invalid input
//! ([`Error::InvalidVariableSpec`], [`Error::IncompletePoint`]) or a
//! lifecycle bug in the caller ([`Error::UnknownNode`],
//! [`Error::UnknownHandle`]). Invariant violations inside the engine
//! (ordering or reduction preconditions of `make_node`) are asserted, not
//! returned, since a silently mis-built node would break canonicity for
//! every diagram constructed afterwards.

use thiserror::Error;

use crate::node::NodeId;
use crate::variable::VarId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed name/index input to variable creation.
    #[error("invalid variable spec: {0}")]
    InvalidVariableSpec(String),

    /// A node id that is not present in the node table.
    /// Indicates use after reclamation.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// An attempt to wrap a node id that is not present in the node table.
    #[error("unknown handle target {0}")]
    UnknownHandle(NodeId),

    /// An evaluation point that does not assign a variable the function
    /// depends on.
    #[error("evaluation point does not assign variable {0}")]
    IncompletePoint(VarId),
}

pub type Result<T> = std::result::Result<T, Error>;
