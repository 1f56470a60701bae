//! Boolean expression trees, the input to [`Bdd::from_expr`].
//!
//! [`Expr`] is a plain syntax tree with constant-folding smart
//! constructors. The converter consumes it through two operations:
//! [`Expr::support`] (which variables occur) and [`Expr::restrict`]
//! (cofactor by one variable). Restriction rebuilds the tree through the
//! smart constructors, so restricting an expression over its whole support
//! always bottoms out in [`Expr::Const`].
//!
//! The usual bit operators are overloaded for convenience:
//!
//! ```
//! use robdd::{Expr, VarSpec};
//!
//! let a = Expr::var(VarSpec::simple("a")?);
//! let b = Expr::var(VarSpec::simple("b")?);
//! let f = a & !b;
//! # Ok::<(), robdd::Error>(())
//! ```
//!
//! [`Bdd::from_expr`]: crate::bdd::Bdd::from_expr

use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::variable::VarSpec;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Expr {
    Const(bool),
    Var(VarSpec),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn zero() -> Self {
        Expr::Const(false)
    }

    pub fn one() -> Self {
        Expr::Const(true)
    }

    pub fn var(spec: VarSpec) -> Self {
        Expr::Var(spec)
    }

    /// Negation, with double negation and constants folded away.
    pub fn negate(value: Self) -> Self {
        match value {
            Expr::Const(b) => Expr::Const(!b),
            Expr::Not(inner) => *inner,
            other => Expr::Not(Box::new(other)),
        }
    }

    /// Conjunction, with constant operands folded away.
    pub fn and(lhs: Self, rhs: Self) -> Self {
        match (lhs, rhs) {
            (Expr::Const(false), _) | (_, Expr::Const(false)) => Expr::Const(false),
            (Expr::Const(true), e) | (e, Expr::Const(true)) => e,
            (lhs, rhs) => Expr::And(Box::new(lhs), Box::new(rhs)),
        }
    }

    /// Disjunction, with constant operands folded away.
    pub fn or(lhs: Self, rhs: Self) -> Self {
        match (lhs, rhs) {
            (Expr::Const(true), _) | (_, Expr::Const(true)) => Expr::Const(true),
            (Expr::Const(false), e) | (e, Expr::Const(false)) => e,
            (lhs, rhs) => Expr::Or(Box::new(lhs), Box::new(rhs)),
        }
    }

    /// Exclusive or, with constant operands folded away.
    pub fn xor(lhs: Self, rhs: Self) -> Self {
        match (lhs, rhs) {
            (Expr::Const(false), e) | (e, Expr::Const(false)) => e,
            (Expr::Const(true), e) | (e, Expr::Const(true)) => Expr::negate(e),
            (lhs, rhs) => Expr::Xor(Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Expr::Const(false)
    }

    pub fn is_one(&self) -> bool {
        *self == Expr::Const(true)
    }

    /// The variables occurring in this expression, in first-encounter
    /// (depth-first, left-to-right) order, without duplicates.
    pub fn support(&self) -> Vec<VarSpec> {
        let mut out = Vec::new();
        self.collect_support(&mut out);
        out
    }

    fn collect_support<'a>(&'a self, out: &mut Vec<VarSpec>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(spec) => {
                if !out.contains(spec) {
                    out.push(spec.clone());
                }
            }
            Expr::Not(a) => a.collect_support(out),
            Expr::And(a, b) | Expr::Or(a, b) | Expr::Xor(a, b) => {
                a.collect_support(out);
                b.collect_support(out);
            }
        }
    }

    /// The cofactor of this expression with `target` fixed to `value`.
    pub fn restrict(&self, target: &VarSpec, value: bool) -> Expr {
        match self {
            Expr::Const(b) => Expr::Const(*b),
            Expr::Var(spec) => {
                if spec == target {
                    Expr::Const(value)
                } else {
                    Expr::Var(spec.clone())
                }
            }
            Expr::Not(a) => Expr::negate(a.restrict(target, value)),
            Expr::And(a, b) => {
                Expr::and(a.restrict(target, value), b.restrict(target, value))
            }
            Expr::Or(a, b) => Expr::or(a.restrict(target, value), b.restrict(target, value)),
            Expr::Xor(a, b) => {
                Expr::xor(a.restrict(target, value), b.restrict(target, value))
            }
        }
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::negate(self)
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        Expr::and(self, rhs)
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        Expr::or(self, rhs)
    }
}

impl BitXor for Expr {
    type Output = Expr;

    fn bitxor(self, rhs: Expr) -> Expr {
        Expr::xor(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Expr {
        Expr::var(VarSpec::simple(name).unwrap())
    }

    #[test]
    fn test_constant_folding() {
        let a = v("a");
        assert_eq!(Expr::and(Expr::zero(), a.clone()), Expr::zero());
        assert_eq!(Expr::and(Expr::one(), a.clone()), a);
        assert_eq!(Expr::or(Expr::one(), a.clone()), Expr::one());
        assert_eq!(Expr::or(Expr::zero(), a.clone()), a);
        assert_eq!(Expr::xor(Expr::zero(), a.clone()), a);
        assert_eq!(Expr::xor(Expr::one(), a.clone()), Expr::negate(a));
    }

    #[test]
    fn test_double_negation_folds() {
        let a = v("a");
        assert_eq!(Expr::negate(Expr::negate(a.clone())), a);
    }

    #[test]
    fn test_restrict_collapses_to_constant() {
        let spec_a = VarSpec::simple("a").unwrap();
        // a | !a restricted on a is identically true either way.
        let f = v("a") | !v("a");
        assert!(f.restrict(&spec_a, false).is_one());
        assert!(f.restrict(&spec_a, true).is_one());
    }

    #[test]
    fn test_restrict_partial() {
        let spec_a = VarSpec::simple("a").unwrap();
        let f = v("a") & v("b");
        assert_eq!(f.restrict(&spec_a, true), v("b"));
        assert!(f.restrict(&spec_a, false).is_zero());
    }

    #[test]
    fn test_support_order_and_dedup() {
        let f = (v("c") & v("b")) | (v("c") & v("a"));
        let support = f.support();
        let names: Vec<String> = support.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["c", "b", "a"]);
    }
}
