//! Post-order traversal of the node DAG.

use std::collections::HashSet;

use crate::bdd::Bdd;
use crate::node::NodeId;

/// Lazy post-order iterator over the DAG below a root node.
///
/// Yields every reachable node exactly once, children before parents
/// (`low` first, then `high`), and finishes with the root. Sharing is
/// respected: a node reachable along several paths is yielded on the
/// first visit only. Created by [`Bdd::post_order`].
///
/// The iterator borrows the manager, so the nodes it walks cannot be
/// swept out from under it.
pub struct PostOrder<'a> {
    bdd: &'a Bdd,
    /// `(node, expanded)`: a node is pushed once unexpanded, then pushed
    /// again above its children before it may be yielded.
    stack: Vec<(NodeId, bool)>,
    visited: HashSet<NodeId>,
}

impl<'a> PostOrder<'a> {
    pub(crate) fn new(bdd: &'a Bdd, root: NodeId) -> Self {
        Self {
            bdd,
            stack: vec![(root, false)],
            visited: HashSet::new(),
        }
    }
}

impl Iterator for PostOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some((id, expanded)) = self.stack.pop() {
            if self.visited.contains(&id) {
                continue;
            }
            if expanded {
                self.visited.insert(id);
                return Some(id);
            }
            self.stack.push((id, true));
            if let Some((low, high)) = self.bdd.node_at(id).children() {
                // Popped in reverse: low's subtree is emitted first.
                self.stack.push((high, false));
                self.stack.push((low, false));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_terminal_only() {
        let bdd = Bdd::default();
        let order: Vec<NodeId> = bdd.post_order(&bdd.zero()).collect();
        assert_eq!(order, [NodeId::ZERO]);
    }

    #[test]
    fn test_children_before_parents() {
        let bdd = Bdd::default();
        let a = bdd.var("a").unwrap();
        let b = bdd.var("b").unwrap();
        let c = bdd.var("c").unwrap();
        let maj = bdd.or(&bdd.or(&bdd.and(&a, &b), &bdd.and(&a, &c)), &bdd.and(&b, &c));

        let order: Vec<NodeId> = bdd.post_order(&maj).collect();

        // No duplicates even though the c-node is shared by both branches.
        let distinct: HashSet<NodeId> = order.iter().copied().collect();
        assert_eq!(distinct.len(), order.len());

        // Majority of three: two terminals, one c-node, two b-nodes, root.
        assert_eq!(order.len(), 6);
        assert_eq!(*order.last().unwrap(), maj.node());

        // Every internal node appears after both of its children.
        let position = |id: NodeId| order.iter().position(|&x| x == id).unwrap();
        for &id in &order {
            if let Some((low, high)) = bdd.node_at(id).children() {
                assert!(position(low) < position(id));
                assert!(position(high) < position(id));
            }
        }
    }

    #[test]
    fn test_low_subtree_first() {
        let bdd = Bdd::default();
        let a = bdd.var("a").unwrap();
        let b = bdd.var("b").unwrap();
        let f = bdd.and(&a, &b);

        // Nodes: root (a, 0, nb), nb = (b, 0, 1).
        let order: Vec<NodeId> = bdd.post_order(&f).collect();
        assert_eq!(order[0], NodeId::ZERO);
        assert_eq!(*order.last().unwrap(), f.node());
    }
}
