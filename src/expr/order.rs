use smol_str::SmolStr;

use crate::{
    context::Context,
    error::Result,
    fragment::{Fragment, Fragments},
    raw::RawSql,
};

use super::Flatten;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Asc,
    Desc,
}

impl Ordering {
    pub fn as_sql(self) -> &'static str {
        match self {
            Ordering::Asc => "ASC",
            Ordering::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub enum OrderBy {
    /// A column, with the database default direction when `direction` is
    /// absent.
    Column {
        field: SmolStr,
        direction: Option<Ordering>,
    },
    Raw(RawSql),
}

impl OrderBy {
    pub fn column<T: Into<SmolStr>>(field: T) -> Self {
        OrderBy::Column {
            field: field.into(),
            direction: None,
        }
    }

    pub fn asc<T: Into<SmolStr>>(field: T) -> Self {
        OrderBy::Column {
            field: field.into(),
            direction: Some(Ordering::Asc),
        }
    }

    pub fn desc<T: Into<SmolStr>>(field: T) -> Self {
        OrderBy::Column {
            field: field.into(),
            direction: Some(Ordering::Desc),
        }
    }
}

pub trait IntoOrderBy {
    fn into_order_by(self) -> OrderBy;
}

impl IntoOrderBy for OrderBy {
    fn into_order_by(self) -> OrderBy {
        self
    }
}

impl IntoOrderBy for &str {
    fn into_order_by(self) -> OrderBy {
        OrderBy::column(self)
    }
}

impl IntoOrderBy for String {
    fn into_order_by(self) -> OrderBy {
        OrderBy::column(self)
    }
}

impl IntoOrderBy for SmolStr {
    fn into_order_by(self) -> OrderBy {
        OrderBy::column(self)
    }
}

impl<T: Into<SmolStr>> IntoOrderBy for (T, Ordering) {
    fn into_order_by(self) -> OrderBy {
        OrderBy::Column {
            field: self.0.into(),
            direction: Some(self.1),
        }
    }
}

impl IntoOrderBy for RawSql {
    fn into_order_by(self) -> OrderBy {
        OrderBy::Raw(self)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Order {
    items: Vec<OrderBy>,
}

impl Order {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push<T: IntoOrderBy>(&mut self, item: T) {
        self.items.push(item.into_order_by());
    }

    /// Appends `ORDER BY ...`; `column` maps a field name to the column
    /// name that is quoted.
    pub(crate) fn flatten_with<'a, F>(
        &'a self,
        ctx: &dyn Context,
        out: &mut Fragments,
        column: F,
    ) -> Result<()>
    where
        F: Fn(&'a str) -> &'a str,
    {
        if self.items.is_empty() {
            return Ok(());
        }
        out.push_sql("ORDER BY");
        for (index, item) in self.items.iter().enumerate() {
            if index > 0 {
                out.push_sql(",");
            }
            match item {
                OrderBy::Column { field, direction } => {
                    out.push(Fragment::sql(ctx.quote(None, Some(column(field.as_str())))));
                    if let Some(direction) = direction {
                        out.push_sql(direction.as_sql());
                    }
                }
                OrderBy::Raw(raw) => raw.flatten(ctx, out)?,
            }
        }
        Ok(())
    }
}

impl Flatten for Order {
    fn flatten(&self, ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        self.flatten_with(ctx, out, |field| field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sql, tests::ctx};

    #[test]
    fn test_order_list() {
        let ctx = ctx();
        let mut order = Order::default();
        order.push("name");
        order.push(("created_at", Ordering::Desc));
        order.push(OrderBy::asc("id"));
        let mut out = Fragments::new();
        order.flatten(&ctx, &mut out).unwrap();
        assert_eq!(
            "ORDER BY \"name\", \"created_at\" DESC, \"id\" ASC",
            out.render(&ctx).sql
        );
    }

    #[test]
    fn test_raw_order() {
        let ctx = ctx();
        let mut order = Order::default();
        order.push(sql!("random()"));
        let mut out = Fragments::new();
        order.flatten(&ctx, &mut out).unwrap();
        assert_eq!("ORDER BY random()", out.render(&ctx).sql);
    }

    #[test]
    fn test_empty_order_emits_nothing() {
        let ctx = ctx();
        let mut out = Fragments::new();
        Order::default().flatten(&ctx, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
