use crate::{context::Context, error::Result, fragment::Fragments};

use super::{Flatten, IntoOperand, Op, Operand};

#[derive(Debug, Clone)]
pub struct BetweenExpr {
    pub(crate) lhs: Operand,
    pub(crate) low: Operand,
    pub(crate) high: Operand,
    pub(crate) negated: bool,
}

impl Flatten for BetweenExpr {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        self.lhs.flatten(ctx, out)?;
        out.push_sql(if self.negated {
            "NOT BETWEEN"
        } else {
            "BETWEEN"
        });
        self.low.flatten(ctx, out)?;
        out.push_sql("AND");
        self.high.flatten(ctx, out)
    }
}

impl Op {
    pub fn range<L, A, B>(lhs: L, low: A, high: B, negated: bool) -> Op
    where
        L: IntoOperand,
        A: IntoOperand,
        B: IntoOperand,
    {
        Op::Between(BetweenExpr {
            lhs: lhs.into_operand(),
            low: low.into_operand(),
            high: high.into_operand(),
            negated,
        })
    }

    pub fn between<A: IntoOperand, B: IntoOperand>(self, low: A, high: B) -> Op {
        Op::range(self, low, high, false)
    }

    pub fn not_between<A: IntoOperand, B: IntoOperand>(self, low: A, high: B) -> Op {
        Op::range(self, low, high, true)
    }
}
