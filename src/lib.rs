mod col;
mod context;
mod dialect;
mod error;
mod export;
pub mod expr;
mod fragment;
mod ident;
mod operator;
mod options;
mod paginate;
mod raw;
mod record;
mod table;
mod value;
mod writer;

use smol_str::SmolStr;

pub use col::{Column, Index};
pub use context::{Context, DbContext, Rendered};
pub use dialect::{Dialect, Generic, HasDialect, MySql, Postgres, Sqlite};
pub use error::{Error, Result};
pub use export::{
    ColumnRenderer, DatetimeRenderer, Export, ExportHandle, ExportOptions, RendererKind, TimeUnit,
};
pub use expr::{
    Flatten, IntoOperand, Op, Operand,
    cond::Conjunction,
    fncall::Aggregate,
    order::{IntoOrderBy, Order, OrderBy, Ordering},
};
pub use fragment::{Fragment, FragmentParts, Fragments};
pub use ident::{Identifier, TableRef};
pub use operator::{BinaryOperator, UnaryOperator};
pub use options::{QueryOptions, SelectOptions};
pub use paginate::Pagination;
pub use raw::RawSql;
pub use record::{Filter, IntoFilter, IntoRecord, Record};
pub use table::{Table, TableBuilder};
pub use value::{IntoValue, Value};

/// An unqualified column.
pub fn ident<T: Into<SmolStr>>(name: T) -> Op {
    Identifier::new(name).op()
}

/// A table-qualified column.
pub fn ident_in<T, N>(table: T, name: N) -> Op
where
    T: Into<SmolStr>,
    N: Into<SmolStr>,
{
    Identifier::qualified(table, name).op()
}

/// A bound value.
pub fn val<V: IntoValue>(value: V) -> Op {
    Op::operand(value.into_value())
}

pub fn raw<T: Into<SmolStr>>(sql: T) -> Op {
    RawSql::new(sql).op()
}

/// Builds a [`RawSql`] from string literals, spliced verbatim, and `{expr}`
/// blocks, bound as values.
///
/// ```
/// let name = "bob";
/// let raw = fragsql::sql!("lower(name) =" {name} "AND age >" {18});
/// assert_eq!(4, raw.fragments().len());
/// ```
#[macro_export]
macro_rules! sql {
    ($($part:tt)*) => {{
        #[allow(unused_mut)]
        let mut fragments = $crate::Fragments::new();
        $crate::__sql_parts!(fragments; $($part)*);
        $crate::RawSql::from(fragments)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __sql_parts {
    ($frags:ident;) => {};
    ($frags:ident; , $($rest:tt)*) => {
        $crate::__sql_parts!($frags; $($rest)*);
    };
    ($frags:ident; $text:literal $($rest:tt)*) => {
        $frags.push($crate::Fragment::sql($text));
        $crate::__sql_parts!($frags; $($rest)*);
    };
    ($frags:ident; { $value:expr } $($rest:tt)*) => {
        $frags.push($crate::Fragment::value($value));
        $crate::__sql_parts!($frags; $($rest)*);
    };
}

/// Builds a [`Record`] from `field => value` pairs.
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ( $($field:expr => $value:expr),+ $(,)? ) => {{
        let mut record = $crate::Record::new();
        $( record.set($field, $value); )+
        record
    }};
}
