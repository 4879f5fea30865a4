use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::{
    col::{Column, Index},
    context::Context,
    error::{Error, Result},
    expr::{Flatten, Op, Operand, cond::Conjunction, equals::EqualsExpr, flatten_list},
    fragment::{Fragment, Fragments},
    ident::{Identifier, TableRef},
    options::{QueryOptions, SelectOptions},
    raw::RawSql,
    record::{Filter, IntoFilter, IntoRecord, Record},
};

// above this many columns, lookups by name go through an index
const INDEXED_LOOKUP_THRESHOLD: usize = 12;

/// A table definition bound to the context its statements are built for.
///
/// Read-only after [`TableBuilder::build`]; every statement method allocates
/// its own [`Fragments`] and either returns the complete statement or an
/// error, never a partial one.
#[derive(Debug)]
pub struct Table {
    schema: SmolStr,
    name: SmolStr,
    sql_schema: Option<SmolStr>,
    sql_name: Option<SmolStr>,
    columns: Vec<Column>,
    indexes: Vec<Index>,
    primary_keys: Vec<SmolStr>,
    ctx: Arc<dyn Context>,
    lookup: OnceLock<IndexMap<SmolStr, usize>>,
    qualified_name: OnceLock<String>,
}

#[derive(Debug, Default)]
pub struct TableBuilder {
    schema: SmolStr,
    name: SmolStr,
    sql_schema: Option<SmolStr>,
    sql_name: Option<SmolStr>,
    columns: Vec<Column>,
    indexes: Vec<Index>,
    primary_keys: Option<Vec<SmolStr>>,
}

impl TableBuilder {
    pub fn sql_schema<T: Into<SmolStr>>(mut self, sql_schema: T) -> Self {
        self.sql_schema = Some(sql_schema.into());
        self
    }

    pub fn sql_name<T: Into<SmolStr>>(mut self, sql_name: T) -> Self {
        self.sql_name = Some(sql_name.into());
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns<I: IntoIterator<Item = Column>>(mut self, columns: I) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Overrides the key derived from the columns' primary-key flags.
    pub fn primary_keys<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.primary_keys = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self, ctx: Arc<dyn Context>) -> Table {
        let primary_keys = self.primary_keys.unwrap_or_else(|| {
            self.columns
                .iter()
                .filter(|column| column.is_primary_key())
                .map(|column| SmolStr::new(column.name()))
                .collect()
        });
        Table {
            schema: self.schema,
            name: self.name,
            sql_schema: self.sql_schema,
            sql_name: self.sql_name,
            columns: self.columns,
            indexes: self.indexes,
            primary_keys,
            ctx,
            lookup: OnceLock::new(),
            qualified_name: OnceLock::new(),
        }
    }
}

impl Table {
    pub fn builder<S, N>(schema: S, name: N) -> TableBuilder
    where
        S: Into<SmolStr>,
        N: Into<SmolStr>,
    {
        TableBuilder {
            schema: schema.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    pub fn primary_keys(&self) -> &[SmolStr] {
        &self.primary_keys
    }

    pub fn context(&self) -> &Arc<dyn Context> {
        &self.ctx
    }

    pub fn column(&self, field: &str) -> Option<&Column> {
        if self.columns.len() <= INDEXED_LOOKUP_THRESHOLD {
            return self.columns.iter().find(|column| column.name() == field);
        }
        let lookup = self.lookup.get_or_init(|| {
            self.columns
                .iter()
                .enumerate()
                .map(|(index, column)| (SmolStr::new(column.name()), index))
                .collect()
        });
        lookup.get(field).map(|&index| &self.columns[index])
    }

    /// The SQL-facing table reference, aliases applied.
    pub fn table_ref(&self) -> TableRef {
        TableRef::new(
            self.sql_schema.as_ref().unwrap_or(&self.schema).clone(),
            self.sql_table_name(),
        )
    }

    /// Fully qualified, quoted table name.
    pub fn qualified_name(&self) -> &str {
        self.qualified_name
            .get_or_init(|| self.table_ref().quoted(self.ctx.as_ref()))
    }

    fn sql_table_name(&self) -> SmolStr {
        self.sql_name.as_ref().unwrap_or(&self.name).clone()
    }

    fn column_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.column(field).map_or(field, Column::column_name)
    }

    /// A table-qualified column. Unknown fields are left unqualified.
    pub fn field(&self, field: &str) -> Op {
        let ident = match self.column(field) {
            Some(column) => Identifier::qualified(self.sql_table_name(), column.column_name()),
            None => Identifier::new(field),
        };
        ident.op()
    }

    fn quoted_column(&self, field: &str) -> Fragment {
        Fragment::sql(self.ctx.quote(None, Some(self.column_name(field))))
    }

    fn expand_record(&self, record: Record) -> Result<Vec<(SmolStr, Operand)>> {
        let pairs = record.into_pairs();
        if pairs.is_empty() {
            return Err(Error::EmptyRecord);
        }
        Ok(pairs)
    }

    fn record_to_where_op(&self, record: Record) -> Option<Op> {
        record
            .into_pairs()
            .into_iter()
            .map(|(field, value)| self.field(&field).eq(value))
            .reduce(|predicate, next| predicate.and(next))
    }

    fn push_where(
        &self,
        out: &mut Fragments,
        filter: Filter,
        allow_empty: bool,
        statement: &'static str,
    ) -> Result<()> {
        let predicate = match filter {
            Filter::Op(op) => Some(op),
            Filter::Record(record) => self.record_to_where_op(record),
        };
        let predicate = match predicate {
            Some(predicate) => predicate,
            None if allow_empty => RawSql::new("(1 = 1)").op(),
            None => {
                tracing::warn!(
                    table = %self.name,
                    statement,
                    "refusing to build a statement without a where clause"
                );
                return Err(Error::missing_where(statement));
            }
        };
        out.push_sql("WHERE");
        predicate.flatten(self.ctx.as_ref(), out)
    }

    fn push_options(&self, out: &mut Fragments, opts: &QueryOptions) -> Result<()> {
        opts.order
            .flatten_with(self.ctx.as_ref(), out, |field| self.column_name(field))?;
        opts.pagination.push(out);
        Ok(())
    }

    fn built(&self, statement: &'static str, out: &Fragments) {
        tracing::trace!(
            table = %self.name,
            statement,
            fragments = out.len(),
            "statement built"
        );
    }

    /// `INSERT INTO <table> (k1, ...) VALUES (v1, ...)` over the present
    /// fields of `record`.
    pub fn insert<R: IntoRecord>(&self, record: R) -> Result<Fragments> {
        let pairs = self.expand_record(record.into_record())?;
        let (fields, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();

        let mut out = Fragments::with_capacity(fields.len() * 4 + 3);
        out.push(Fragment::sql(format!("INSERT INTO {}", self.qualified_name())));
        out.push_sql("(");
        for (index, field) in fields.iter().enumerate() {
            if index > 0 {
                out.push_sql(",");
            }
            out.push(self.quoted_column(field));
        }
        out.push_sql(") VALUES (");
        flatten_list(&values, self.ctx.as_ref(), &mut out)?;
        out.push_sql(")");

        self.built("insert", &out);
        Ok(out)
    }

    /// `UPDATE <table> SET k1 = v1, ... WHERE <predicate>` followed by the
    /// ordering and pagination clauses.
    pub fn update<R, F>(&self, record: R, filter: F, opts: QueryOptions) -> Result<Fragments>
    where
        R: IntoRecord,
        F: IntoFilter,
    {
        let pairs = self.expand_record(record.into_record())?;
        let ctx = self.ctx.as_ref();

        let mut out = Fragments::with_capacity(pairs.len() * 4 + 8);
        out.push(Fragment::sql(format!("UPDATE {}", self.qualified_name())));
        out.push_sql("SET");
        for (index, (field, value)) in pairs.iter().enumerate() {
            if index > 0 {
                out.push_sql(",");
            }
            out.push(self.quoted_column(field));
            out.push_sql("=");
            value.flatten(ctx, &mut out)?;
        }
        self.push_where(&mut out, filter.into_filter(), opts.allow_empty_where, "update")?;
        self.push_options(&mut out, &opts)?;

        self.built("update", &out);
        Ok(out)
    }

    /// `DELETE FROM <table> WHERE <predicate>` followed by the ordering and
    /// pagination clauses.
    pub fn delete<F: IntoFilter>(&self, filter: F, opts: QueryOptions) -> Result<Fragments> {
        let mut out = Fragments::with_capacity(8);
        out.push(Fragment::sql(format!("DELETE FROM {}", self.qualified_name())));
        self.push_where(&mut out, filter.into_filter(), opts.allow_empty_where, "delete")?;
        self.push_options(&mut out, &opts)?;

        self.built("delete", &out);
        Ok(out)
    }

    /// `SELECT <projection> FROM <table> WHERE <predicate>`, then group by,
    /// ordering and pagination. An empty predicate selects every row.
    pub fn select<F: IntoFilter>(&self, filter: F, opts: SelectOptions) -> Result<Fragments> {
        let projection = self.projection(&opts)?;

        let mut out = Fragments::with_capacity(8);
        out.push(Fragment::sql(format!(
            "SELECT {projection} FROM {}",
            self.qualified_name()
        )));
        self.push_where(&mut out, filter.into_filter(), true, "select")?;
        if !opts.group_by.is_empty() {
            out.push_sql("GROUP BY");
            for (index, field) in opts.group_by.iter().enumerate() {
                if index > 0 {
                    out.push_sql(",");
                }
                out.push(self.quoted_column(field));
            }
        }
        self.push_options(&mut out, &opts.query)?;

        self.built("select", &out);
        Ok(out)
    }

    pub fn select_all(&self, opts: SelectOptions) -> Result<Fragments> {
        self.select(Record::new(), opts)
    }

    fn projection(&self, opts: &SelectOptions) -> Result<String> {
        if opts.include.is_empty() && opts.exclude.is_empty() {
            return Ok("*".to_owned());
        }
        let fields: Vec<&str> = if opts.include.is_empty() {
            self.columns.iter().map(Column::name).collect()
        } else {
            opts.include.iter().map(SmolStr::as_str).collect()
        };
        let quoted: Vec<String> = fields
            .into_iter()
            .filter(|field| !opts.exclude.iter().any(|excluded| excluded.as_str() == *field))
            .map(|field| self.ctx.quote(None, Some(self.column_name(field))))
            .collect();
        if quoted.is_empty() {
            return Err(Error::EmptyProjection);
        }
        Ok(quoted.join(", "))
    }

    /// `((k1 = v1) AND (k2 = v2))` over the present fields of `record`.
    pub fn equals<R: IntoRecord>(&self, record: R) -> Result<Op> {
        self.equals_with(record, Conjunction::And)
    }

    pub fn equals_with<R: IntoRecord>(&self, record: R, conjunction: Conjunction) -> Result<Op> {
        let pairs = self
            .expand_record(record.into_record())?
            .into_iter()
            .map(|(field, value)| (Identifier::new(self.column_name(&field)), value))
            .collect();
        Ok(Op::Equals(EqualsExpr { pairs, conjunction }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Op, ident, record, sql,
        context::DbContext,
        dialect::Dialect,
        expr::order::{OrderBy, Ordering},
        tests::{rendered, users},
        value::Value,
    };

    #[test]
    fn test_insert() {
        let users = users();
        let (sql, params) = rendered(&users, users.insert(record! { "id" => 1, "name" => "bob" }));
        assert_eq!(
            "INSERT INTO \"public\".\"users\" (\"id\", \"name\") VALUES ($1, $2)",
            sql
        );
        assert_eq!(vec![Value::Int(1), Value::Text("bob".into())], params);
    }

    #[test]
    fn test_insert_skips_absent_fields() {
        let users = users();
        let mut record = Record::new();
        record.set("id", 1).maybe("name", None::<String>);
        let (sql, params) = rendered(&users, users.insert(record));
        assert_eq!("INSERT INTO \"public\".\"users\" (\"id\") VALUES ($1)", sql);
        assert_eq!(1, params.len());
    }

    #[test]
    fn test_insert_uses_sql_names_and_operands() {
        let users = users();
        let mut record = Record::new();
        record
            .set("id", 7)
            .set("createdAt", Op::call("now", Vec::<Op>::new()))
            .set("email", None::<&str>);
        let (sql, params) = rendered(&users, users.insert(record));
        assert_eq!(
            "INSERT INTO \"public\".\"users\" (\"id\", \"created_at\", \"email\") VALUES ($1, now(), $2)",
            sql
        );
        assert_eq!(vec![Value::Int(7), Value::Null], params);
    }

    #[test]
    fn test_empty_record() {
        let users = users();
        let mut record = Record::new();
        record.maybe("id", None::<i64>);
        assert_eq!(Error::EmptyRecord, users.insert(record).unwrap_err());
        assert_eq!(
            Error::EmptyRecord,
            users
                .update(Record::new(), ident("id").eq(1), QueryOptions::new())
                .unwrap_err()
        );
        assert!(users.equals(Record::new()).is_err());
    }

    #[test]
    fn test_update() {
        let users = users();
        let (sql, params) = rendered(
            &users,
            users.update(
                record! { "name" => "alice", "email" => "a@example.com" },
                record! { "id" => 3 },
                QueryOptions::new(),
            ),
        );
        assert_eq!(
            "UPDATE \"public\".\"users\" SET \"name\" = $1, \"email\" = $2 WHERE \"users\".\"id\" = $3",
            sql
        );
        assert_eq!(3, params.len());
    }

    #[test]
    fn test_update_requires_where() {
        let users = users();
        let err = users
            .update(record! { "name" => "x" }, Record::new(), QueryOptions::new())
            .unwrap_err();
        assert!(err.is_missing_where());
        assert_eq!("where clause is required for update", err.to_string());
    }

    #[test]
    fn test_delete_with_record_where() {
        let users = users();
        let (sql, _) = rendered(
            &users,
            users.delete(record! { "id" => 1, "name" => "bob" }, QueryOptions::new()),
        );
        assert_eq!(
            "DELETE FROM \"public\".\"users\" WHERE (\"users\".\"id\" = $1) AND (\"users\".\"name\" = $2)",
            sql
        );
    }

    #[test]
    fn test_delete_requires_where() {
        let users = users();
        let err = users.delete(Record::new(), QueryOptions::new()).unwrap_err();
        assert_eq!(Error::MissingWhereClause { statement: "delete" }, err);

        let (sql, params) = rendered(
            &users,
            users.delete(Record::new(), QueryOptions::new().allow_empty_where(true)),
        );
        assert_eq!("DELETE FROM \"public\".\"users\" WHERE (1 = 1)", sql);
        assert!(params.is_empty());
    }

    #[test]
    fn test_delete_with_options() {
        let users = users();
        let opts = QueryOptions::new()
            .order_by(("createdAt", Ordering::Desc))
            .order_by("id")
            .limit(10)
            .offset(0);
        let (sql, params) = rendered(&users, users.delete(users.field("id").gt(100), opts));
        assert_eq!(
            "DELETE FROM \"public\".\"users\" WHERE \"users\".\"id\" > $1 ORDER BY \"created_at\" DESC, \"id\" LIMIT $2 OFFSET $3",
            sql
        );
        assert_eq!(vec![Value::Int(100), Value::Int(10), Value::Int(0)], params);
    }

    #[test]
    fn test_select_defaults() {
        let users = users();
        let (sql, params) = rendered(&users, users.select_all(SelectOptions::new()));
        assert_eq!("SELECT * FROM \"public\".\"users\" WHERE (1 = 1)", sql);
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_projection() {
        let users = users();
        let (sql, _) = rendered(
            &users,
            users.select(
                users.field("email").is_not_null(),
                SelectOptions::new().exclude(["email", "createdAt"]),
            ),
        );
        assert_eq!(
            "SELECT \"id\", \"name\" FROM \"public\".\"users\" WHERE \"users\".\"email\" IS NOT NULL",
            sql
        );

        let (sql, _) = rendered(
            &users,
            users.select_all(SelectOptions::new().include(["name", "createdAt"])),
        );
        assert_eq!(
            "SELECT \"name\", \"created_at\" FROM \"public\".\"users\" WHERE (1 = 1)",
            sql
        );
    }

    #[test]
    fn test_select_fully_excluded_projection() {
        let users = users();
        let opts = SelectOptions::new().include(["id"]).exclude(["id"]);
        assert_eq!(Error::EmptyProjection, users.select_all(opts).unwrap_err());
    }

    #[test]
    fn test_select_group_by_and_paginate() {
        let users = users();
        let opts = SelectOptions::new()
            .include(["name"])
            .group_by(["name"])
            .order_by(OrderBy::asc("name"))
            .paginate(2, 20);
        let (sql, params) = rendered(&users, users.select_all(opts));
        assert_eq!(
            "SELECT \"name\" FROM \"public\".\"users\" WHERE (1 = 1) GROUP BY \"name\" ORDER BY \"name\" ASC LIMIT $1 OFFSET $2",
            sql
        );
        assert_eq!(vec![Value::Int(20), Value::Int(40)], params);
    }

    #[test]
    fn test_equals() {
        let users = users();
        let op = users
            .equals(record! { "id" => 1, "createdAt" => sql!("now()") })
            .unwrap();
        let ctx = users.context().clone();
        let rendered = op.render(ctx.as_ref()).unwrap();
        assert_eq!("((\"id\" = $1) AND (\"created_at\" = now()))", rendered.sql);

        let op = users
            .equals_with(record! { "id" => 1, "name" => "bob" }, Conjunction::Or)
            .unwrap();
        let rendered = op.render(ctx.as_ref()).unwrap();
        assert_eq!("((\"id\" = $1) OR (\"name\" = $2))", rendered.sql);
    }

    #[test]
    fn test_field() {
        let users = users();
        let ctx = users.context().clone();
        let sql = |op: Op| op.render(ctx.as_ref()).unwrap().sql;
        assert_eq!("\"users\".\"created_at\"", sql(users.field("createdAt")));
        assert_eq!("\"unknown\"", sql(users.field("unknown")));
    }

    #[test]
    fn test_repeated_builds_are_identical() {
        let users = users();
        let build = || {
            users
                .select(
                    users.field("id").is_in([1, 2, 3]).or(users.field("name").like("a%")),
                    SelectOptions::new().limit(5),
                )
                .map(|frags| frags.render(users.context().as_ref()))
        };
        assert_eq!(build().unwrap(), build().unwrap());
    }

    #[test]
    fn test_table_as_operand() {
        let users = users();
        let op = Op::call("count", [&users]);
        let rendered = op.render(users.context().as_ref()).unwrap();
        assert_eq!("count(\"public\".\"users\")", rendered.sql);
    }

    #[test]
    fn test_aliases_and_dialect() {
        let ctx = Arc::new(DbContext::new(Dialect::MySql));
        let table = Table::builder("app", "Account")
            .sql_schema("app_v2")
            .sql_name("accounts")
            .column(Column::new("id", "bigint"))
            .build(ctx.clone());
        let frags = table.delete(table.field("id").eq(1), QueryOptions::new()).unwrap();
        let rendered = frags.render(ctx.as_ref());
        assert_eq!(
            "DELETE FROM `app_v2`.`accounts` WHERE `accounts`.`id` = ?",
            rendered.sql
        );
    }

    #[test]
    fn test_metadata() {
        let users = users();
        assert_eq!(vec![SmolStr::new("id")], users.primary_keys());
        assert_eq!(4, users.columns().len());
        assert!(users.indexes()[0].is_unique());
        assert_eq!(Some("created_at"), users.column("createdAt").map(Column::column_name));
        assert_eq!("\"public\".\"users\"", users.qualified_name());
    }

    #[test]
    fn test_wide_table_lookup() {
        let columns = (0..20).map(|index| Column::new(format!("c{index}"), "int"));
        let table = Table::builder("", "wide")
            .columns(columns)
            .primary_keys(["c0", "c1"])
            .build(Arc::new(DbContext::default()));
        assert_eq!(Some("c17"), table.column("c17").map(Column::name));
        assert!(table.column("c20").is_none());
        assert_eq!(2, table.primary_keys().len());
        assert_eq!("\"wide\"", table.qualified_name());
    }
}
