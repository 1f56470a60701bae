//! DOT (Graphviz) export.

use std::fmt::Write;

use crate::bdd::Bdd;
use crate::func::Func;
use crate::node::Node;

impl Bdd {
    /// Renders the DAG below `f` as an undirected Graphviz graph.
    ///
    /// Terminals are boxes labeled `0`/`1`, decision nodes are circles
    /// labeled with their variable spec. Low edges are dashed and labeled
    /// `0`, high edges solid and labeled `1`. Node names use the stable
    /// table indices, so diagrams rendered before and after a
    /// garbage-collection cycle stay comparable.
    pub fn to_dot(&self, f: &Func) -> String {
        let order: Vec<_> = self.post_order(f).collect();
        let mut dot = String::new();

        // Writing into a String cannot fail.
        writeln!(dot, "graph BDD {{").unwrap();
        for &id in &order {
            match self.node_at(id) {
                Node::Terminal(value) => {
                    writeln!(dot, "    n{} [label={},shape=box];", id.index(), value as u8)
                        .unwrap();
                }
                Node::Inner { var, .. } => {
                    writeln!(
                        dot,
                        "    n{} [label=\"{}\",shape=circle];",
                        id.index(),
                        self.spec_of(var)
                    )
                    .unwrap();
                }
            }
        }
        for &id in &order {
            if let Some((low, high)) = self.node_at(id).children() {
                writeln!(
                    dot,
                    "    n{} -- n{} [label=0,style=dashed];",
                    id.index(),
                    low.index()
                )
                .unwrap();
                writeln!(dot, "    n{} -- n{} [label=1];", id.index(), high.index()).unwrap();
            }
        }
        writeln!(dot, "}}").unwrap();

        dot
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::bdd::Bdd;

    #[test]
    fn test_terminal() {
        let bdd = Bdd::default();
        let dot = bdd.to_dot(&bdd.one());
        assert!(dot.starts_with("graph BDD {"));
        assert!(dot.contains("[label=1,shape=box];"));
        assert!(!dot.contains("--"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_single_variable() {
        let bdd = Bdd::default();
        let a = bdd.var("a").unwrap();
        let dot = bdd.to_dot(&a);

        assert!(dot.contains("[label=\"a\",shape=circle];"));
        assert!(dot.contains("[label=0,shape=box];"));
        assert!(dot.contains("[label=1,shape=box];"));

        // One dashed low edge and one solid high edge.
        let root = a.node().index();
        assert!(dot.contains(&format!("n{} -- n1 [label=0,style=dashed];", root)));
        assert!(dot.contains(&format!("n{} -- n2 [label=1];", root)));
    }

    #[test]
    fn test_every_reachable_node_declared() {
        let bdd = Bdd::default();
        let a = bdd.var_indexed("x", 0).unwrap();
        let b = bdd.var_indexed("x", 1).unwrap();
        let f = bdd.xor(&a, &b);
        let dot = bdd.to_dot(&f);

        assert!(dot.contains("[label=\"x[0]\",shape=circle];"));
        assert!(dot.contains("[label=\"x[1]\",shape=circle];"));
        for id in bdd.post_order(&f) {
            assert!(dot.contains(&format!("n{} [", id.index())));
        }
        // Each internal node contributes one dashed low edge.
        assert_eq!(dot.matches("style=dashed").count(), bdd.size(&f) - 2);
    }
}
