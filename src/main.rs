use std::sync::Arc;

use fragsql::{
    Column, DbContext, Dialect, Index, Op, OrderBy, QueryOptions, Record, SelectOptions,
    Table, record, sql,
};

fn main() -> fragsql::Result<()> {
    let ctx = Arc::new(DbContext::new(Dialect::Postgres).allow_functions(["lower", "now"]));
    let users = Table::builder("public", "users")
        .column(Column::new("id", "bigint").primary_key())
        .column(Column::new("name", "text"))
        .column(Column::new("email", "text").nullable())
        .column(Column::new("createdAt", "timestamptz").sql_name("created_at"))
        .index(Index::new("users_email_key", ["email"]).unique())
        .build(ctx.clone());

    let insert = users.insert(record! {
        "id" => 1,
        "name" => "bob",
        "createdAt" => Op::call("now", Vec::<Op>::new()),
    })?;

    let mut changes = Record::new();
    changes.set("name", "alice").maybe("email", None::<&str>);
    let update = users.update(changes, record! { "id" => 1 }, QueryOptions::new())?;

    let select = users.select(
        Op::call("lower", [users.field("name")]).like("a%"),
        SelectOptions::new()
            .exclude(["email"])
            .order_by(OrderBy::desc("createdAt"))
            .limit(10),
    )?;

    let delete = users.delete(
        users.field("createdAt").lt(sql!("now() - interval '30 days'")),
        QueryOptions::new(),
    )?;

    for statement in [&insert, &update, &select, &delete] {
        let rendered = statement.render(ctx.as_ref());
        println!("{}  -- {:?}", rendered.sql, rendered.params);
    }

    select.export().label("recent users").is_query(true).register(ctx.as_ref());
    println!("{} statement(s) registered", ctx.take_exports().len());
    Ok(())
}
