use crate::{context::Context, error::Result, fragment::Fragments, operator::BinaryOperator};

use super::{Flatten, Operand};

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub(crate) lhs: Operand,
    pub(crate) operator: BinaryOperator,
    pub(crate) rhs: Operand,
}

impl BinaryExpr {
    pub fn operator(&self) -> BinaryOperator {
        self.operator
    }
}

impl Flatten for BinaryExpr {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        self.lhs.flatten(ctx, out)?;
        out.push_sql(self.operator.as_sql());
        self.rhs.flatten(ctx, out)
    }
}
