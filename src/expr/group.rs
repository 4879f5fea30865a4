use crate::{context::Context, error::Result, fragment::Fragments};

use super::{Flatten, IntoOperand, Op, Operand};

#[derive(Debug, Clone)]
pub struct GroupExpr {
    pub(crate) inner: Operand,
}

impl Flatten for GroupExpr {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        out.push_sql("(");
        self.inner.flatten(ctx, out)?;
        out.push_sql(")");
        Ok(())
    }
}

impl Op {
    /// Wraps `inner` in brackets. An operand that already is a group is
    /// returned unchanged.
    pub fn group<T: IntoOperand>(inner: T) -> Op {
        match inner.into_operand() {
            Operand::Op(op) if matches!(*op, Op::Group(_)) => *op,
            inner => Op::Group(GroupExpr { inner }),
        }
    }

    pub fn bracket(self) -> Op {
        Op::group(self)
    }
}
