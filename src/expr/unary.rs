use crate::{context::Context, error::Result, fragment::Fragments, operator::UnaryOperator};

use super::{Flatten, Operand};

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub(crate) lhs: Operand,
    pub(crate) operator: UnaryOperator,
}

impl Flatten for UnaryExpr {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        self.lhs.flatten(ctx, out)?;
        out.push_sql(self.operator.as_sql());
        Ok(())
    }
}
