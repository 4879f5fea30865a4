use crate::{context::Context, error::Result, fragment::Fragments, ident::Identifier};

use super::{Flatten, Operand, cond::Conjunction};

/// `((k1 = v1) AND (k2 = v2))` over record pairs, built by
/// [`crate::Table::equals`].
#[derive(Debug, Clone)]
pub struct EqualsExpr {
    pub(crate) pairs: Vec<(Identifier, Operand)>,
    pub(crate) conjunction: Conjunction,
}

impl Flatten for EqualsExpr {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        out.push_sql("(");
        for (index, (key, value)) in self.pairs.iter().enumerate() {
            if index > 0 {
                out.push_sql(self.conjunction.as_sql());
            }
            out.push_sql("(");
            key.flatten(ctx, out)?;
            out.push_sql("=");
            value.flatten(ctx, out)?;
            out.push_sql(")");
        }
        out.push_sql(")");
        Ok(())
    }
}
