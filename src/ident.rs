use smol_str::SmolStr;

use crate::{
    context::Context,
    error::Result,
    expr::{Flatten, Op, Operand},
    fragment::{Fragment, Fragments},
};

/// A column name, optionally qualified by its table.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Identifier {
    table: Option<SmolStr>,
    name: SmolStr,
}

impl Identifier {
    pub fn new<T>(name: T) -> Self
    where
        T: Into<SmolStr>,
    {
        Self {
            table: None,
            name: name.into(),
        }
    }

    pub fn qualified<T, N>(table: T, name: N) -> Self
    where
        T: Into<SmolStr>,
        N: Into<SmolStr>,
    {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn op(self) -> Op {
        Op::from(Operand::Ident(self))
    }
}

impl Flatten for Identifier {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        out.push(Fragment::sql(ctx.quote(self.table(), Some(&self.name))));
        Ok(())
    }
}

/// A possibly schema-qualified table name.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct TableRef {
    schema: Option<SmolStr>,
    name: SmolStr,
}

impl TableRef {
    /// An empty schema is treated as no schema.
    pub fn new<S, N>(schema: S, name: N) -> Self
    where
        S: Into<SmolStr>,
        N: Into<SmolStr>,
    {
        let schema = schema.into();
        Self {
            schema: (!schema.is_empty()).then_some(schema),
            name: name.into(),
        }
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quoted(&self, ctx: &dyn Context) -> String {
        ctx.quote(self.schema(), Some(&self.name))
    }
}

impl Flatten for TableRef {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        out.push(Fragment::sql(self.quoted(ctx)));
        Ok(())
    }
}
