use smol_str::{SmolStr, format_smolstr};

use crate::{
    context::Context,
    error::{Error, Result},
    fragment::{Fragment, Fragments},
};

use super::{Flatten, IntoOperand, Op, Operand, flatten_list};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Aggregate {
    Avg,
    Count,
    Sum,
    Max,
    Min,
}

impl Aggregate {
    pub fn name(self) -> &'static str {
        match self {
            Aggregate::Avg => "avg",
            Aggregate::Count => "count",
            Aggregate::Sum => "sum",
            Aggregate::Max => "max",
            Aggregate::Min => "min",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub(crate) name: SmolStr,
    pub(crate) args: Vec<Operand>,
}

impl CallExpr {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Flatten for CallExpr {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        if !ctx.check_function_name(&self.name) {
            tracing::warn!(function = %self.name, "function name refused by context");
            return Err(Error::InvalidFunctionName(self.name.clone()));
        }
        out.push(Fragment::Sql(format_smolstr!("{}(", self.name)));
        flatten_list(&self.args, ctx, out)?;
        out.push_sql(")");
        Ok(())
    }
}

impl Op {
    /// `name(arg, ...)`. The name is emitted verbatim once the context
    /// accepts it at flatten time.
    pub fn call<N, I, T>(name: N, args: I) -> Op
    where
        N: Into<SmolStr>,
        I: IntoIterator<Item = T>,
        T: IntoOperand,
    {
        Op::Call(CallExpr {
            name: name.into(),
            args: args.into_iter().map(IntoOperand::into_operand).collect(),
        })
    }

    pub fn aggregate<T: IntoOperand>(aggregate: Aggregate, arg: T) -> Op {
        Op::call(aggregate.name(), [arg])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{context::DbContext, ident, raw, tests::render};

    #[test]
    fn test_call_arguments() {
        let op = Op::call("coalesce", [ident("nickname"), ident("name")]);
        assert_eq!("coalesce(\"nickname\", \"name\")", render(&op).0);

        let (sql, params) = render(&Op::call("lower", ["Bob"]));
        assert_eq!("lower($1)", sql);
        assert_eq!(1, params.len());
    }

    #[test]
    fn test_call_without_arguments() {
        let op = Op::call("now", Vec::<Op>::new()).gt(ident("expires_at"));
        assert_eq!("now() > \"expires_at\"", render(&op).0);
    }

    #[test]
    fn test_aggregate() {
        let op = Op::aggregate(Aggregate::Count, raw("*"));
        assert_eq!("count(*)", render(&op).0);
    }

    #[test]
    fn test_refused_name() {
        let ctx = DbContext::default().allow_functions(["lower"]);
        let allowed = Op::call("LOWER", [ident("email")]);
        assert!(allowed.to_fragments(&ctx).is_ok());

        let refused = ident("id").eq(Op::call("pg_sleep", [10]));
        let err = refused.to_fragments(&ctx).unwrap_err();
        assert_eq!(Error::InvalidFunctionName("pg_sleep".into()), err);
    }
}
