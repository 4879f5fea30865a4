use crate::{context::Context, error::Result, fragment::Fragments};

use super::{Flatten, IntoOperand, Op, Operand};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

/// `(lhs) AND (rhs)`; both sides are always bracketed.
#[derive(Debug, Clone)]
pub struct LogicalExpr {
    pub(crate) lhs: Operand,
    pub(crate) conjunction: Conjunction,
    pub(crate) rhs: Operand,
}

impl Flatten for LogicalExpr {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        bracketed(&self.lhs, ctx, out)?;
        out.push_sql(self.conjunction.as_sql());
        bracketed(&self.rhs, ctx, out)
    }
}

#[derive(Debug, Clone)]
pub struct NotExpr {
    pub(crate) operand: Operand,
}

impl Flatten for NotExpr {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        out.push_sql("NOT");
        bracketed(&self.operand, ctx, out)
    }
}

fn bracketed(operand: &Operand, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
    out.push_sql("(");
    operand.flatten(ctx, out)?;
    out.push_sql(")");
    Ok(())
}

impl Op {
    pub fn logical<L, R>(lhs: L, conjunction: Conjunction, rhs: R) -> Op
    where
        L: IntoOperand,
        R: IntoOperand,
    {
        Op::Logical(LogicalExpr {
            lhs: lhs.into_operand(),
            conjunction,
            rhs: rhs.into_operand(),
        })
    }

    pub fn negate<T: IntoOperand>(operand: T) -> Op {
        Op::Not(NotExpr {
            operand: operand.into_operand(),
        })
    }

    pub fn and<R: IntoOperand>(self, rhs: R) -> Op {
        Op::logical(self, Conjunction::And, rhs)
    }

    pub fn or<R: IntoOperand>(self, rhs: R) -> Op {
        Op::logical(self, Conjunction::Or, rhs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Op {
        Op::negate(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ident, raw, tests::render};

    #[test]
    fn test_and_brackets_both_sides() {
        let op = ident("a").eq(1).and(ident("b").eq(2));
        assert_eq!("(\"a\" = $1) AND (\"b\" = $2)", render(&op).0);
    }

    #[test]
    fn test_chained_and_nests_left() {
        let op = ident("x").eq(1).and(ident("y").eq(2)).and(ident("z").eq(3));
        let (sql, params) = render(&op);
        assert_eq!("((\"x\" = $1) AND (\"y\" = $2)) AND (\"z\" = $3)", sql);
        assert_eq!(3, params.len());
    }

    #[test]
    fn test_or_and_not() {
        let op = ident("banned").eq(true).or(raw("1 = 0")).not();
        assert_eq!("NOT ((\"banned\" = $1) OR (1 = 0))", render(&op).0);
    }
}
