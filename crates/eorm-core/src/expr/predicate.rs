//! Predicates and arithmetic expressions.

use super::{impl_arithmetic, impl_comparisons, BinaryExpr, Expr, Op, RawExpr};

/// A boolean binary expression.
///
/// Several predicates are combined left-associatively with [`Predicate::and`]:
/// `p1.and(p2).and(p3)` nests as `(p1 AND p2) AND p3`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate(BinaryExpr);

impl Predicate {
    /// Creates a predicate.
    pub fn new(left: impl Into<Expr>, op: Op, right: impl Into<Expr>) -> Self {
        Self(BinaryExpr::new(left, op, right))
    }

    /// Returns the underlying binary expression.
    #[must_use]
    pub const fn as_binary(&self) -> &BinaryExpr {
        &self.0
    }

    /// Combines this predicate with another using AND.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::new(self, Op::And, other)
    }

    /// Combines this predicate with another using OR.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::new(self, Op::Or, other)
    }

    /// Negates the predicate with NOT.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        not(self)
    }
}

/// Negates a predicate: `NOT (p)`.
///
/// The left operand is an empty raw fragment, so only the operator and the
/// parenthesized right side are rendered.
#[must_use]
pub fn not(predicate: Predicate) -> Predicate {
    Predicate::new(RawExpr::default(), Op::Not, predicate)
}

/// An arithmetic binary expression, e.g. `age + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct MathExpr(BinaryExpr);

impl MathExpr {
    /// Creates an arithmetic expression.
    pub fn new(left: impl Into<Expr>, op: Op, right: impl Into<Expr>) -> Self {
        Self(BinaryExpr::new(left, op, right))
    }

    /// Returns the underlying binary expression.
    #[must_use]
    pub const fn as_binary(&self) -> &BinaryExpr {
        &self.0
    }
}

impl_comparisons!(MathExpr);
impl_arithmetic!(MathExpr);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::col;

    #[test]
    fn test_and_nests_left() {
        let p = col("a").eq(1).and(col("b").eq(2)).and(col("c").eq(3));
        let outer = p.as_binary();
        assert_eq!(outer.op(), Op::And);
        assert_eq!(outer.right(), &Expr::from(col("c").eq(3)));
        let Expr::Predicate(inner) = outer.left() else {
            panic!("left side must be the first fold");
        };
        assert_eq!(inner, &col("a").eq(1).and(col("b").eq(2)));
    }

    #[test]
    fn test_not_has_empty_left() {
        let p = not(col("a").eq(1));
        assert_eq!(p.as_binary().left(), &Expr::Raw(RawExpr::default()));
        assert_eq!(p.as_binary().op(), Op::Not);
        assert_eq!(p, col("a").eq(1).not());
    }

    #[test]
    fn test_math_chain() {
        let m = col("price").multi(2).add(1);
        assert_eq!(m.as_binary().op(), Op::Add);
        assert!(m.as_binary().left().is_compound());
    }
}
