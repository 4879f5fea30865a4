use smol_str::SmolStr;

use crate::{
    expr::order::{IntoOrderBy, Order},
    paginate::Pagination,
};

/// Trailing clauses shared by delete, update and select.
#[derive(Debug, Default, Clone)]
pub struct QueryOptions {
    pub(crate) order: Order,
    pub(crate) pagination: Pagination,
    pub(crate) allow_empty_where: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by<T: IntoOrderBy>(mut self, item: T) -> Self {
        self.order.push(item);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.pagination.limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.pagination.offset(offset);
        self
    }

    pub fn paginate(mut self, page: u64, per_page: u64) -> Self {
        self.pagination.paginate(page, per_page);
        self
    }

    /// Lets delete and update run with an empty predicate, which is then
    /// rendered as `(1 = 1)`.
    pub fn allow_empty_where(mut self, allow: bool) -> Self {
        self.allow_empty_where = allow;
        self
    }
}

#[derive(Debug, Default, Clone)]
pub struct SelectOptions {
    pub(crate) include: Vec<SmolStr>,
    pub(crate) exclude: Vec<SmolStr>,
    pub(crate) group_by: Vec<SmolStr>,
    pub(crate) query: QueryOptions,
}

impl SelectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects only these fields; defaults to every column.
    pub fn include<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.include.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.exclude.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.group_by.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn order_by<T: IntoOrderBy>(mut self, item: T) -> Self {
        self.query = self.query.order_by(item);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query = self.query.limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.query = self.query.offset(offset);
        self
    }

    pub fn paginate(mut self, page: u64, per_page: u64) -> Self {
        self.query = self.query.paginate(page, per_page);
        self
    }
}

impl From<QueryOptions> for SelectOptions {
    fn from(query: QueryOptions) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }
}
