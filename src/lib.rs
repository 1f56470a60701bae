//! Reduced Ordered Binary Decision Diagrams.
//!
//! A BDD represents a Boolean function as a DAG of decision nodes, reduced
//! and ordered so that every function has exactly one representation.
//! Construction goes through a [`Bdd`] manager, which interns nodes in a
//! unique table and hands out [`Func`] handles; because representation is
//! canonical, checking two functions for equivalence is a handle
//! comparison.
//!
//! # Quick start
//!
//! ```
//! use robdd::Bdd;
//!
//! let bdd = Bdd::default();
//! let a = bdd.var("a")?;
//! let b = bdd.var("b")?;
//! let c = bdd.var("c")?;
//!
//! // Majority of three, built two different ways.
//! let f = bdd.or(&bdd.or(&bdd.and(&a, &b), &bdd.and(&a, &c)), &bdd.and(&b, &c));
//! let g = bdd.ite(&a, &bdd.or(&b, &c), &bdd.and(&b, &c));
//! assert_eq!(f, g);
//!
//! // Nodes unreachable from held handles can be reclaimed at any time.
//! drop(g);
//! bdd.collect_garbage();
//! assert_eq!(bdd.size(&f), 6);
//! # Ok::<(), robdd::Error>(())
//! ```

pub mod bdd;
pub mod cache;
pub mod error;
pub mod expr;
pub mod func;
pub mod hash;
pub mod node;
pub mod table;
pub mod traverse;
pub mod variable;

mod dot;

pub use crate::bdd::{Bdd, IntoFunc};
pub use crate::error::{Error, Result};
pub use crate::expr::Expr;
pub use crate::func::Func;
pub use crate::node::{Node, NodeId};
pub use crate::traverse::PostOrder;
pub use crate::variable::{VarId, VarSpec};
