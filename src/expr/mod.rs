//! The expression tree.
//!
//! An [`Op`] is an immutable node; every combinator consumes its receiver
//! and returns a new node. Nothing is rendered until the tree is flattened
//! into a [`Fragments`] buffer against a [`Context`], which is the only point
//! where identifiers are quoted and function names are checked.

use crate::{
    context::{Context, Rendered},
    error::Result,
    fragment::{Fragment, Fragments},
    ident::{Identifier, TableRef},
    operator::{BinaryOperator, UnaryOperator},
    raw::RawSql,
    table::Table,
    value::{IntoValue, Value},
};

pub mod between;
pub mod binary;
pub mod cond;
pub mod equals;
pub mod fncall;
pub mod group;
pub mod r#in;
pub mod order;
pub mod unary;

use between::BetweenExpr;
use binary::BinaryExpr;
use cond::{LogicalExpr, NotExpr};
use equals::EqualsExpr;
use fncall::CallExpr;
use group::GroupExpr;
use r#in::InExpr;
use unary::UnaryExpr;

/// Appends a node's fragments to a caller supplied buffer.
pub trait Flatten {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()>;
}

/// Anything that can sit on either side of an operator.
#[derive(Debug, Clone)]
pub enum Operand {
    Value(Value),
    Ident(Identifier),
    Raw(RawSql),
    Table(TableRef),
    Op(Box<Op>),
}

impl Flatten for Operand {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        match self {
            Operand::Value(value) => {
                out.push(Fragment::Value(value.clone()));
                Ok(())
            }
            Operand::Ident(ident) => ident.flatten(ctx, out),
            Operand::Raw(raw) => raw.flatten(ctx, out),
            Operand::Table(table) => table.flatten(ctx, out),
            Operand::Op(op) => op.flatten(ctx, out),
        }
    }
}

pub trait IntoOperand {
    fn into_operand(self) -> Operand;
}

impl<T> IntoOperand for T
where
    T: IntoValue,
{
    #[inline]
    fn into_operand(self) -> Operand {
        Operand::Value(self.into_value())
    }
}

impl IntoOperand for Operand {
    #[inline(always)]
    fn into_operand(self) -> Operand {
        self
    }
}

impl IntoOperand for Op {
    fn into_operand(self) -> Operand {
        match self {
            Op::Operand(operand) => operand,
            op => Operand::Op(Box::new(op)),
        }
    }
}

impl IntoOperand for &Op {
    fn into_operand(self) -> Operand {
        self.clone().into_operand()
    }
}

impl IntoOperand for Identifier {
    fn into_operand(self) -> Operand {
        Operand::Ident(self)
    }
}

impl IntoOperand for RawSql {
    fn into_operand(self) -> Operand {
        Operand::Raw(self)
    }
}

impl IntoOperand for Fragments {
    fn into_operand(self) -> Operand {
        Operand::Raw(RawSql::from(self))
    }
}

impl IntoOperand for TableRef {
    fn into_operand(self) -> Operand {
        Operand::Table(self)
    }
}

impl IntoOperand for &Table {
    fn into_operand(self) -> Operand {
        Operand::Table(self.table_ref())
    }
}

#[derive(Debug, Clone)]
pub enum Op {
    Operand(Operand),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Logical(LogicalExpr),
    Not(NotExpr),
    Group(GroupExpr),
    In(InExpr),
    Between(BetweenExpr),
    Call(CallExpr),
    Equals(EqualsExpr),
}

impl From<Operand> for Op {
    fn from(value: Operand) -> Self {
        match value {
            Operand::Op(op) => *op,
            operand => Op::Operand(operand),
        }
    }
}

impl Op {
    /// Wraps any operand as a node, without adding anything around it.
    pub fn operand<T: IntoOperand>(value: T) -> Self {
        Op::from(value.into_operand())
    }

    pub fn binary<L, R>(lhs: L, operator: BinaryOperator, rhs: R) -> Self
    where
        L: IntoOperand,
        R: IntoOperand,
    {
        Op::Binary(BinaryExpr {
            lhs: lhs.into_operand(),
            operator,
            rhs: rhs.into_operand(),
        })
    }

    pub fn unary<L>(lhs: L, operator: UnaryOperator) -> Self
    where
        L: IntoOperand,
    {
        Op::Unary(UnaryExpr {
            lhs: lhs.into_operand(),
            operator,
        })
    }

    /// Flattens this node into a fresh buffer.
    pub fn to_fragments(&self, ctx: &dyn Context) -> Result<Fragments> {
        let mut out = Fragments::new();
        self.flatten(ctx, &mut out)?;
        Ok(out)
    }

    pub fn render(&self, ctx: &dyn Context) -> Result<Rendered> {
        Ok(self.to_fragments(ctx)?.render(ctx))
    }
}

impl Flatten for Op {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        match self {
            Op::Operand(operand) => operand.flatten(ctx, out),
            Op::Binary(expr) => expr.flatten(ctx, out),
            Op::Unary(expr) => expr.flatten(ctx, out),
            Op::Logical(expr) => expr.flatten(ctx, out),
            Op::Not(expr) => expr.flatten(ctx, out),
            Op::Group(expr) => expr.flatten(ctx, out),
            Op::In(expr) => expr.flatten(ctx, out),
            Op::Between(expr) => expr.flatten(ctx, out),
            Op::Call(expr) => expr.flatten(ctx, out),
            Op::Equals(expr) => expr.flatten(ctx, out),
        }
    }
}

/// Writes `items` separated by commas.
pub(crate) fn flatten_list(
    items: &[Operand],
    ctx: &dyn Context,
    out: &mut Fragments,
) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.push_sql(",");
        }
        item.flatten(ctx, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{ident, raw, tests::render, val};

    use super::*;

    #[test]
    fn test_operand_resolution() {
        let (sql, params) = render(&ident("age").gte(val(18)));
        assert_eq!("\"age\" >= $1", sql);
        assert_eq!(vec![Value::Int(18)], params);

        let (sql, params) = render(&raw("now()").lt(ident("expires_at")));
        assert_eq!("now() < \"expires_at\"", sql);
        assert!(params.is_empty());
    }

    #[test]
    fn test_operand_op_is_not_double_wrapped() {
        let op = Op::operand(ident("id"));
        assert!(matches!(op, Op::Operand(Operand::Ident(_))));
        let nested = Op::operand(Operand::Op(Box::new(ident("id").is_null())));
        assert!(matches!(nested, Op::Unary(_)));
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let op = ident("a")
            .eq(1)
            .and(ident("b").is_in([2, 3]))
            .or(ident("c").between(4, 5).not());
        let first = render(&op);
        let second = render(&op);
        assert_eq!(first, second);
        assert_eq!(
            "((\"a\" = $1) AND (\"b\" IN ($2, $3))) OR (NOT (\"c\" BETWEEN $4 AND $5))",
            first.0
        );
    }
}
