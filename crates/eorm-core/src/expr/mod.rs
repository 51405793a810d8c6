//! Expression trees compiled by [`Builder`](crate::builder::Builder).
//!
//! Every node is exactly one [`Expr`] variant. Operator precedence is carried
//! by the shape of the tree: the compiler parenthesizes nested binary nodes,
//! so there is no priority table.
//!
//! # Example
//!
//! ```rust
//! use eorm_core::expr::{col, Expr, Op};
//!
//! // (`age` + ?) > ?
//! let expr = Expr::binary(col("age").add(1), Op::Gt, 18);
//! assert!(matches!(expr, Expr::Binary(_)));
//! ```

mod aggregate;
mod column;
mod predicate;

use std::fmt;

pub use aggregate::{avg, count, max, min, sum, Aggregate};
pub use column::{col, Column};
pub use predicate::{not, MathExpr, Predicate};

use crate::value::{SqlValue, ToSqlValue};

/// A node of an expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Raw SQL text with its already-ordered arguments.
    Raw(RawExpr),
    /// A column referenced by its logical field name or alias.
    Column(Column),
    /// A literal value, always rendered as a placeholder.
    Value(SqlValue),
    /// An aggregate function over one column.
    Aggregate(Aggregate),
    /// An arithmetic expression.
    Math(MathExpr),
    /// A generic binary expression.
    Binary(BinaryExpr),
    /// A boolean expression usable in WHERE and HAVING.
    Predicate(Predicate),
}

impl Expr {
    /// Creates a generic binary expression.
    pub fn binary(left: impl Into<Self>, op: Op, right: impl Into<Self>) -> Self {
        Self::Binary(BinaryExpr::new(left, op, right))
    }

    /// Returns true for the node kinds the compiler wraps in parentheses when
    /// they appear as an operand.
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Self::Math(_) | Self::Binary(_) | Self::Predicate(_))
    }
}

/// Binary operators with their textual rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Multi,
    /// `/`
    Div,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `NOT`, rendered as a prefix of its right operand.
    Not,
}

impl Op {
    /// Returns the text written between the two operands.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Multi => "*",
            Self::Div => "/",
            Self::Like => " LIKE ",
            Self::NotLike => " NOT LIKE ",
            Self::And => " AND ",
            Self::Or => " OR ",
            Self::Not => "NOT ",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text().trim())
    }
}

/// `left op right`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    left: Box<Expr>,
    op: Op,
    right: Box<Expr>,
}

impl BinaryExpr {
    /// Creates a binary expression.
    pub fn new(left: impl Into<Expr>, op: Op, right: impl Into<Expr>) -> Self {
        Self {
            left: Box::new(left.into()),
            op,
            right: Box::new(right.into()),
        }
    }

    /// Returns the left operand.
    #[must_use]
    pub fn left(&self) -> &Expr {
        &self.left
    }

    /// Returns the operator.
    #[must_use]
    pub const fn op(&self) -> Op {
        self.op
    }

    /// Returns the right operand.
    #[must_use]
    pub fn right(&self) -> &Expr {
        &self.right
    }
}

/// Raw SQL inserted verbatim.
///
/// **Warning**: Only use this for SQL fragments that don't contain user input.
/// Values belong in `args`, referenced by placeholders in `sql`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExpr {
    sql: String,
    args: Vec<SqlValue>,
}

impl RawExpr {
    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the arguments, in placeholder order.
    #[must_use]
    pub fn args(&self) -> &[SqlValue] {
        &self.args
    }
}

/// Creates a raw SQL fragment with its arguments.
pub fn raw(sql: impl Into<String>, args: Vec<SqlValue>) -> RawExpr {
    RawExpr {
        sql: sql.into(),
        args,
    }
}

/// Creates a literal value expression.
pub fn value<T: ToSqlValue>(value: T) -> Expr {
    Expr::Value(value.to_sql_value())
}

impl From<RawExpr> for Expr {
    fn from(raw: RawExpr) -> Self {
        Self::Raw(raw)
    }
}

impl From<Column> for Expr {
    fn from(column: Column) -> Self {
        Self::Column(column)
    }
}

impl From<Aggregate> for Expr {
    fn from(aggregate: Aggregate) -> Self {
        Self::Aggregate(aggregate)
    }
}

impl From<MathExpr> for Expr {
    fn from(math: MathExpr) -> Self {
        Self::Math(math)
    }
}

impl From<BinaryExpr> for Expr {
    fn from(binary: BinaryExpr) -> Self {
        Self::Binary(binary)
    }
}

impl From<Predicate> for Expr {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<SqlValue> for Expr {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}

impl<T: ToSqlValue> From<Option<T>> for Expr {
    fn from(value: Option<T>) -> Self {
        Self::Value(value.to_sql_value())
    }
}

macro_rules! impl_from_value {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    Self::Value(value.to_sql_value())
                }
            }
        )+
    };
}

impl_from_value!(bool, i64, i32, i16, i8, u32, u16, u8, f64, f32, String, &str, Vec<u8>);

/// Generates the comparison constructors shared by column-like nodes.
macro_rules! impl_comparisons {
    ($ty:ty) => {
        impl $ty {
            /// Creates an equality predicate.
            #[must_use]
            pub fn eq(self, other: impl Into<$crate::expr::Expr>) -> $crate::expr::Predicate {
                $crate::expr::Predicate::new(self, $crate::expr::Op::Eq, other)
            }

            /// Creates an inequality predicate.
            #[must_use]
            pub fn not_eq(self, other: impl Into<$crate::expr::Expr>) -> $crate::expr::Predicate {
                $crate::expr::Predicate::new(self, $crate::expr::Op::NotEq, other)
            }

            /// Creates a less-than predicate.
            #[must_use]
            pub fn lt(self, other: impl Into<$crate::expr::Expr>) -> $crate::expr::Predicate {
                $crate::expr::Predicate::new(self, $crate::expr::Op::Lt, other)
            }

            /// Creates a less-than-or-equal predicate.
            #[must_use]
            pub fn lt_eq(self, other: impl Into<$crate::expr::Expr>) -> $crate::expr::Predicate {
                $crate::expr::Predicate::new(self, $crate::expr::Op::LtEq, other)
            }

            /// Creates a greater-than predicate.
            #[must_use]
            pub fn gt(self, other: impl Into<$crate::expr::Expr>) -> $crate::expr::Predicate {
                $crate::expr::Predicate::new(self, $crate::expr::Op::Gt, other)
            }

            /// Creates a greater-than-or-equal predicate.
            #[must_use]
            pub fn gt_eq(self, other: impl Into<$crate::expr::Expr>) -> $crate::expr::Predicate {
                $crate::expr::Predicate::new(self, $crate::expr::Op::GtEq, other)
            }
        }
    };
}

/// Generates the arithmetic constructors shared by column-like nodes.
macro_rules! impl_arithmetic {
    ($ty:ty) => {
        impl $ty {
            /// Creates an addition.
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn add(self, other: impl Into<$crate::expr::Expr>) -> $crate::expr::MathExpr {
                $crate::expr::MathExpr::new(self, $crate::expr::Op::Add, other)
            }

            /// Creates a subtraction.
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn sub(self, other: impl Into<$crate::expr::Expr>) -> $crate::expr::MathExpr {
                $crate::expr::MathExpr::new(self, $crate::expr::Op::Sub, other)
            }

            /// Creates a multiplication.
            #[must_use]
            pub fn multi(self, other: impl Into<$crate::expr::Expr>) -> $crate::expr::MathExpr {
                $crate::expr::MathExpr::new(self, $crate::expr::Op::Multi, other)
            }

            /// Creates a division.
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn div(self, other: impl Into<$crate::expr::Expr>) -> $crate::expr::MathExpr {
                $crate::expr::MathExpr::new(self, $crate::expr::Op::Div, other)
            }
        }
    };
}

pub(crate) use impl_arithmetic;
pub(crate) use impl_comparisons;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_text() {
        assert_eq!(Op::Eq.text(), "=");
        assert_eq!(Op::And.text(), " AND ");
        assert_eq!(Op::Not.text(), "NOT ");
        assert_eq!(Op::NotLike.to_string(), "NOT LIKE");
    }

    #[test]
    fn test_binary_shape() {
        let expr = BinaryExpr::new(col("age"), Op::Gt, 18);
        assert_eq!(expr.left(), &Expr::Column(col("age")));
        assert_eq!(expr.op(), Op::Gt);
        assert_eq!(expr.right(), &Expr::Value(SqlValue::Int(18)));
    }

    #[test]
    fn test_compound_kinds() {
        assert!(Expr::binary(col("a"), Op::Eq, 1).is_compound());
        assert!(Expr::from(col("a").add(1)).is_compound());
        assert!(Expr::from(col("a").eq(1)).is_compound());
        assert!(!Expr::from(col("a")).is_compound());
        assert!(!value(1).is_compound());
        assert!(!Expr::from(avg("age")).is_compound());
        assert!(!Expr::from(raw("1 = 1", vec![])).is_compound());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Expr::from("x"), Expr::Value(SqlValue::Text("x".into())));
        assert_eq!(Expr::from(None::<i64>), Expr::Value(SqlValue::Null));
        assert_eq!(value(2.5_f64), Expr::Value(SqlValue::Float(2.5)));
    }

    #[test]
    fn test_raw_keeps_args_in_order() {
        let r = raw("`age` BETWEEN ? AND ?", vec![SqlValue::Int(1), SqlValue::Int(9)]);
        assert_eq!(r.sql(), "`age` BETWEEN ? AND ?");
        assert_eq!(r.args(), &[SqlValue::Int(1), SqlValue::Int(9)]);
    }
}
