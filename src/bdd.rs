//! The BDD manager.
//!
//! All construction goes through a [`Bdd`] value, which owns the four
//! process-wide tables: the variable registry, the node unique table, the
//! handle cache, and the ITE memo cache. Routing everything through one
//! manager is what makes the representation canonical: every structurally
//! equal node triple is interned exactly once, so two handles denote the
//! same Boolean function iff they are equal.
//!
//! The manager is single-threaded; the tables sit behind [`RefCell`] and
//! every operation is a plain synchronous computation. To share one
//! manager across threads, put it behind a single coarse `Mutex` (or
//! confine it to one thread). Partitioning per thread is not an option:
//! canonicity depends on a single authority over variable and node
//! identities.
//!
//! # Example
//!
//! ```
//! use robdd::Bdd;
//!
//! let bdd = Bdd::default();
//! let a = bdd.var("a")?;
//! let b = bdd.var("b")?;
//!
//! // Absorption: a&b | a == a, established by handle equality alone.
//! let f = bdd.or(&bdd.and(&a, &b), &a);
//! assert_eq!(f, a);
//! # Ok::<(), robdd::Error>(())
//! ```

use std::cell::RefCell;
use std::cmp::min;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};

use log::debug;

use crate::cache::OpCache;
use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::func::{Func, FuncInner};
use crate::node::{Node, NodeId};
use crate::table::UniqueTable;
use crate::traverse::PostOrder;
use crate::variable::{VarId, VarSpec, VarTable};

/// Right-hand operands of the binary combinators: either an existing
/// handle or a raw boolean, which is boxed into the corresponding
/// terminal handle before combining.
pub trait IntoFunc {
    fn into_func(self, bdd: &Bdd) -> Func;
}

impl IntoFunc for Func {
    fn into_func(self, _bdd: &Bdd) -> Func {
        self
    }
}

impl IntoFunc for &Func {
    fn into_func(self, _bdd: &Bdd) -> Func {
        self.clone()
    }
}

impl IntoFunc for bool {
    fn into_func(self, bdd: &Bdd) -> Func {
        bdd.constant(self)
    }
}

pub struct Bdd {
    vars: RefCell<VarTable>,
    nodes: RefCell<UniqueTable<Node>>,
    /// The handle cache: at most one live handle per node.
    funcs: RefCell<HashMap<NodeId, Weak<FuncInner>>>,
    ite_cache: RefCell<OpCache<(NodeId, NodeId, NodeId), NodeId>>,
    zero: Func,
    one: Func,
}

impl Bdd {
    /// Creates a manager whose node table holds up to `2^table_bits` nodes.
    pub fn new(table_bits: usize) -> Self {
        assert!(
            table_bits <= 31,
            "Table bits should be in the range 0..=31"
        );

        let cache_bits = min(table_bits, 16);
        let mut nodes = UniqueTable::new(table_bits);

        // The terminals occupy the two reserved cells.
        let zero_index = nodes.add(Node::Terminal(false));
        assert_eq!(zero_index, NodeId::ZERO.index());
        let one_index = nodes.add(Node::Terminal(true));
        assert_eq!(one_index, NodeId::ONE.index());

        // The manager itself holds strong handles to the terminals, so
        // they are always garbage-collection roots.
        let zero_inner = Rc::new(FuncInner { node: NodeId::ZERO });
        let one_inner = Rc::new(FuncInner { node: NodeId::ONE });
        let mut funcs = HashMap::new();
        funcs.insert(NodeId::ZERO, Rc::downgrade(&zero_inner));
        funcs.insert(NodeId::ONE, Rc::downgrade(&one_inner));

        Self {
            vars: RefCell::new(VarTable::default()),
            nodes: RefCell::new(nodes),
            funcs: RefCell::new(funcs),
            ite_cache: RefCell::new(OpCache::new(cache_bits)),
            zero: Func::from_inner(zero_inner),
            one: Func::from_inner(one_inner),
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(20)
    }
}

impl fmt::Debug for Bdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes = self.nodes.borrow();
        f.debug_struct("Bdd")
            .field("capacity", &nodes.capacity())
            .field("nodes", &nodes.len())
            .field("vars", &self.vars.borrow().len())
            .finish()
    }
}

impl Bdd {
    /// The constant-zero function.
    pub fn zero(&self) -> Func {
        self.zero.clone()
    }

    /// The constant-one function.
    pub fn one(&self) -> Func {
        self.one.clone()
    }

    /// Boxes a raw boolean into the corresponding terminal handle.
    pub fn constant(&self, value: bool) -> Func {
        if value {
            self.one()
        } else {
            self.zero()
        }
    }

    /// Number of live nodes, terminals included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Number of registered variables.
    pub fn num_vars(&self) -> usize {
        self.vars.borrow().len()
    }

    /// Hit/miss counters of the ITE memo cache.
    pub fn ite_cache_stats(&self) -> (usize, usize) {
        let cache = self.ite_cache.borrow();
        (cache.hits(), cache.misses())
    }

    /// The node behind `id`, or [`Error::UnknownNode`] if no such node is
    /// live. Intended for external renderers walking a traversal.
    pub fn node(&self, id: NodeId) -> Result<Node> {
        let nodes = self.nodes.borrow();
        if !nodes.is_occupied(id.index()) {
            return Err(Error::UnknownNode(id));
        }
        Ok(*nodes.value(id.index()))
    }

    /// The node behind `id`. Internal: a vacant cell here is a lifecycle
    /// bug (use after reclamation) and panics.
    pub(crate) fn node_at(&self, id: NodeId) -> Node {
        *self.nodes.borrow().value(id.index())
    }

    /// The registered id for `spec`, if any. Never registers.
    pub fn lookup_var(&self, spec: &VarSpec) -> Option<VarId> {
        self.vars.borrow().get(spec)
    }

    /// The spec registered for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never assigned by this manager's registry.
    pub fn spec_of(&self, id: VarId) -> VarSpec {
        self.vars.borrow().spec(id).clone()
    }
}

// Construction.
impl Bdd {
    /// Returns the unique handle for a live node.
    ///
    /// Idempotent: while a handle for `node` is held somewhere, repeated
    /// calls return that same handle. Fails with [`Error::UnknownHandle`]
    /// for an id with no live node behind it.
    pub fn wrap(&self, node: NodeId) -> Result<Func> {
        if !self.nodes.borrow().is_occupied(node.index()) {
            return Err(Error::UnknownHandle(node));
        }
        Ok(self.func(node))
    }

    /// Handle-cache lookup for a node known to be live.
    pub(crate) fn func(&self, node: NodeId) -> Func {
        let mut funcs = self.funcs.borrow_mut();
        if let Some(weak) = funcs.get(&node) {
            if let Some(inner) = weak.upgrade() {
                return Func::from_inner(inner);
            }
        }
        let inner = Rc::new(FuncInner { node });
        funcs.insert(node, Rc::downgrade(&inner));
        Func::from_inner(inner)
    }

    /// Returns the function for a single-name variable, registering it on
    /// first use.
    pub fn var(&self, name: &str) -> Result<Func> {
        Ok(self.var_with_spec(VarSpec::simple(name)?))
    }

    /// Returns the function for an indexed variable (`name[index]`),
    /// registering it on first use.
    pub fn var_indexed(&self, name: &str, index: u32) -> Result<Func> {
        Ok(self.var_with_spec(VarSpec::indexed(name, index)?))
    }

    /// Returns the function for an arbitrary variable spec, registering it
    /// on first use. Identical specs always yield the same variable.
    pub fn var_with_spec(&self, spec: VarSpec) -> Func {
        let v = self.vars.borrow_mut().get_or_create(spec);
        let node = self.make_node(v, NodeId::ZERO, NodeId::ONE);
        self.func(node)
    }

    /// Interns the node `(var, low, high)`, maintaining reduced ordered
    /// form.
    ///
    /// A redundant test (`low == high`) is collapsed to the shared child
    /// without allocation; otherwise the triple is hash-consed.
    ///
    /// # Precondition
    ///
    /// `var` is strictly less than the branch variable of any internal
    /// `low`/`high`. Checked in debug builds; violating it in a release
    /// build silently breaks canonicity.
    pub fn make_node(&self, var: VarId, low: NodeId, high: NodeId) -> NodeId {
        debug!("make_node(var = {}, low = {}, high = {})", var, low, high);

        if low == high {
            return low;
        }

        #[cfg(debug_assertions)]
        for child in [low, high] {
            if let Some(child_var) = self.node_at(child).var() {
                assert!(
                    var < child_var,
                    "ordering violation: {} must be above {}",
                    var,
                    child_var
                );
            }
        }

        let index = self.nodes.borrow_mut().put(Node::Inner { var, low, high });
        NodeId::from_index(index)
    }
}

// The ITE combinator and the operators derived from it.
impl Bdd {
    /// Cofactors of `id` by the variable `v`, which must not be below
    /// `id`'s own branch variable. A function that does not depend on `v`
    /// is its own cofactor on both branches.
    fn top_cofactors(&self, id: NodeId, v: VarId) -> (NodeId, NodeId) {
        match self.node_at(id) {
            Node::Terminal(_) => (id, id),
            Node::Inner { var, low, high } => {
                if var == v {
                    (low, high)
                } else {
                    debug_assert!(v < var);
                    (id, id)
                }
            }
        }
    }

    /// If-then-else on nodes: `ite(f, g, h) = (f ∧ g) ∨ (¬f ∧ h)`.
    ///
    /// Recursive Shannon expansion on the topmost variable across the
    /// operands, memoized on the `(f, g, h)` triple. Every binary operator
    /// below is a fixed instantiation of this one combinator.
    pub(crate) fn ite_node(&self, f: NodeId, g: NodeId, h: NodeId) -> NodeId {
        debug!("ite({}, {}, {})", f, g, h);

        // Terminal shortcuts.
        if f == NodeId::ONE {
            return g;
        }
        if f == NodeId::ZERO {
            return h;
        }
        if g == h {
            // The choice is irrelevant.
            return g;
        }
        if g == NodeId::ONE && h == NodeId::ZERO {
            // ite(F, 1, 0) = F
            return f;
        }

        let key = (f, g, h);
        if let Some(cached) = self.ite_cache.borrow().get(&key) {
            debug!("cache: ite({}, {}, {}) -> {}", f, g, h, cached);
            return cached;
        }

        // Topmost variable across the non-terminal operands.
        let v = [f, g, h]
            .iter()
            .filter_map(|&n| self.node_at(n).var())
            .min()
            .expect("f is not terminal here");

        let (f0, f1) = self.top_cofactors(f, v);
        let (g0, g1) = self.top_cofactors(g, v);
        let (h0, h1) = self.top_cofactors(h, v);

        let low = self.ite_node(f0, g0, h0);
        let high = self.ite_node(f1, g1, h1);
        let res = self.make_node(v, low, high);

        debug!("computed: ite({}, {}, {}) -> {}", f, g, h, res);
        self.ite_cache.borrow_mut().insert(&key, res);
        res
    }

    /// If-then-else on handles.
    pub fn ite(&self, f: &Func, g: impl IntoFunc, h: impl IntoFunc) -> Func {
        let g = g.into_func(self);
        let h = h.into_func(self);
        self.func(self.ite_node(f.node(), g.node(), h.node()))
    }

    /// `¬f = ite(f, 0, 1)`
    pub fn not(&self, f: &Func) -> Func {
        debug!("not(f = {})", f);
        self.func(self.ite_node(f.node(), NodeId::ZERO, NodeId::ONE))
    }

    /// `f ∧ g = ite(f, g, 0)`
    pub fn and(&self, f: &Func, g: impl IntoFunc) -> Func {
        let g = g.into_func(self);
        debug!("and(f = {}, g = {})", f, g);
        self.func(self.ite_node(f.node(), g.node(), NodeId::ZERO))
    }

    /// `f ∨ g = ite(f, 1, g)`
    pub fn or(&self, f: &Func, g: impl IntoFunc) -> Func {
        let g = g.into_func(self);
        debug!("or(f = {}, g = {})", f, g);
        self.func(self.ite_node(f.node(), NodeId::ONE, g.node()))
    }

    /// `f ⊕ g = ite(f, ¬g, g)`
    pub fn xor(&self, f: &Func, g: impl IntoFunc) -> Func {
        let g = g.into_func(self);
        debug!("xor(f = {}, g = {})", f, g);
        let not_g = self.ite_node(g.node(), NodeId::ZERO, NodeId::ONE);
        self.func(self.ite_node(f.node(), not_g, g.node()))
    }

    /// `f → g = ite(¬f, 1, g)`
    pub fn implies(&self, f: &Func, g: impl IntoFunc) -> Func {
        let g = g.into_func(self);
        debug!("implies(f = {}, g = {})", f, g);
        let not_f = self.ite_node(f.node(), NodeId::ZERO, NodeId::ONE);
        self.func(self.ite_node(not_f, NodeId::ONE, g.node()))
    }
}

// Expression conversion.
impl Bdd {
    /// Converts an expression tree into a canonical function.
    ///
    /// Direct structural recursion, not routed through `ite`: the
    /// expression is split on its topmost variable (the one with the least
    /// registry identity) and the two cofactors are converted recursively.
    /// Every variable occurring in the expression is registered as a side
    /// effect.
    pub fn from_expr(&self, expr: &Expr) -> Func {
        let node = self.expr_node(expr);
        self.func(node)
    }

    fn expr_node(&self, expr: &Expr) -> NodeId {
        if expr.is_zero() {
            return NodeId::ZERO;
        }
        if expr.is_one() {
            return NodeId::ONE;
        }

        let mut top: Option<(VarId, VarSpec)> = None;
        for spec in expr.support() {
            let id = self.vars.borrow_mut().get_or_create(spec.clone());
            match &top {
                Some((best, _)) if *best <= id => {}
                _ => top = Some((id, spec)),
            }
        }
        let (v, spec) = top.expect("a non-constant expression has support");
        debug!("expr_node: top variable {} = {}", v, spec);

        let low = self.expr_node(&expr.restrict(&spec, false));
        let high = self.expr_node(&expr.restrict(&spec, true));
        self.make_node(v, low, high)
    }
}

// Traversal-derived queries.
impl Bdd {
    /// Lazy post-order traversal of the DAG rooted at `f`'s node: every
    /// reachable node exactly once, children before parents (`low` before
    /// `high`), terminals included when reachable.
    pub fn post_order(&self, f: &Func) -> PostOrder<'_> {
        PostOrder::new(self, f.node())
    }

    /// The set of variables `f` depends on.
    pub fn support(&self, f: &Func) -> BTreeSet<VarId> {
        self.post_order(f)
            .filter_map(|id| self.node_at(id).var())
            .collect()
    }

    /// Number of distinct nodes reachable from `f`, terminals included.
    pub fn size(&self, f: &Func) -> usize {
        self.post_order(f).count()
    }

    /// Evaluates `f` at a complete variable assignment.
    ///
    /// Fails with [`Error::IncompletePoint`] when the walk reaches a
    /// variable the point does not assign.
    pub fn eval(&self, f: &Func, point: &HashMap<VarId, bool>) -> Result<bool> {
        let mut id = f.node();
        loop {
            match self.node_at(id) {
                Node::Terminal(value) => return Ok(value),
                Node::Inner { var, low, high } => {
                    let value = point
                        .get(&var)
                        .copied()
                        .ok_or(Error::IncompletePoint(var))?;
                    id = if value { high } else { low };
                }
            }
        }
    }
}

// Garbage collection.
impl Bdd {
    /// All nodes transitively reachable from `roots`, terminals always
    /// included.
    fn reachable(&self, roots: impl IntoIterator<Item = NodeId>) -> HashSet<NodeId> {
        let mut alive = HashSet::from([NodeId::ZERO, NodeId::ONE]);
        let mut queue: VecDeque<NodeId> = roots.into_iter().collect();

        while let Some(id) = queue.pop_front() {
            if alive.insert(id) {
                if let Some((low, high)) = self.node_at(id).children() {
                    queue.push_back(low);
                    queue.push_back(high);
                }
            }
        }

        alive
    }

    /// Reclaims every node unreachable from a currently-held handle.
    ///
    /// Mark phase: the roots are the live entries of the handle cache (the
    /// manager's own zero/one handles keep the terminals live). Sweep
    /// phase: dead cells are unlinked from their bucket chains and freed,
    /// and dead handle-cache entries are dropped. The ITE memo cache is
    /// discarded first, since its entries may reference swept nodes.
    ///
    /// Variables are never reclaimed.
    pub fn collect_garbage(&self) {
        debug!("Collecting garbage...");

        self.ite_cache.borrow_mut().clear();

        let roots: Vec<NodeId> = self
            .funcs
            .borrow()
            .values()
            .filter_map(|weak| weak.upgrade())
            .map(|inner| inner.node)
            .collect();
        let alive = self.reachable(roots);
        debug!("{} nodes alive", alive.len());

        self.funcs
            .borrow_mut()
            .retain(|_, weak| weak.strong_count() > 0);

        let num_buckets = self.nodes.borrow().num_buckets();
        for b in 0..num_buckets {
            // Drop dead cells from the head of the chain.
            let mut head = self.nodes.borrow().bucket(b);
            while head != 0 && !alive.contains(&NodeId::from_index(head)) {
                let next = self.nodes.borrow().next(head);
                debug!("Dropping {}", head);
                self.nodes.borrow_mut().free(head);
                head = next;
            }
            self.nodes.borrow_mut().set_bucket(b, head);

            // Then from the middle, relinking around them.
            let mut prev = head;
            while prev != 0 {
                let mut cur = self.nodes.borrow().next(prev);
                while cur != 0 && !alive.contains(&NodeId::from_index(cur)) {
                    let next = self.nodes.borrow().next(cur);
                    debug!("Dropping {}", cur);
                    self.nodes.borrow_mut().free(cur);
                    cur = next;
                }
                if self.nodes.borrow().next(prev) != cur {
                    self.nodes.borrow_mut().set_next(prev, cur);
                }
                prev = cur;
            }
        }
    }
}
