use crate::{context::Context, error::Result, fragment::Fragments};

use super::{Flatten, IntoOperand, Op, Operand, flatten_list};

#[derive(Debug, Clone)]
pub struct InExpr {
    pub(crate) lhs: Operand,
    pub(crate) items: Vec<Operand>,
    pub(crate) negated: bool,
}

impl Flatten for InExpr {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        self.lhs.flatten(ctx, out)?;
        out.push_sql(if self.negated { "NOT IN (" } else { "IN (" });
        if self.items.is_empty() {
            // `IN ()` is not valid SQL; NULL matches nothing
            out.push_sql("NULL");
        } else {
            flatten_list(&self.items, ctx, out)?;
        }
        out.push_sql(")");
        Ok(())
    }
}

impl Op {
    pub fn in_list<L, I, T>(lhs: L, items: I, negated: bool) -> Op
    where
        L: IntoOperand,
        I: IntoIterator<Item = T>,
        T: IntoOperand,
    {
        Op::In(InExpr {
            lhs: lhs.into_operand(),
            items: items.into_iter().map(IntoOperand::into_operand).collect(),
            negated,
        })
    }

    pub fn is_in<I, T>(self, items: I) -> Op
    where
        I: IntoIterator<Item = T>,
        T: IntoOperand,
    {
        Op::in_list(self, items, false)
    }

    pub fn not_in<I, T>(self, items: I) -> Op
    where
        I: IntoIterator<Item = T>,
        T: IntoOperand,
    {
        Op::in_list(self, items, true)
    }
}
