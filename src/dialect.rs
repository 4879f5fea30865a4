#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    #[default]
    Postgres,
    MySql,
    Sqlite,
    /// No identifier quoting, `$n` placeholders.
    Generic,
}

impl Dialect {
    pub(crate) fn quote_char(self) -> Option<char> {
        match self {
            Dialect::Postgres | Dialect::Sqlite => Some('"'),
            Dialect::MySql => Some('`'),
            Dialect::Generic => None,
        }
    }
}

pub trait HasDialect {
    const DIALECT: Dialect;
}

pub struct Postgres;

impl HasDialect for Postgres {
    const DIALECT: Dialect = Dialect::Postgres;
}

pub struct MySql;

impl HasDialect for MySql {
    const DIALECT: Dialect = Dialect::MySql;
}

pub struct Sqlite;

impl HasDialect for Sqlite {
    const DIALECT: Dialect = Dialect::Sqlite;
}

pub struct Generic;

impl HasDialect for Generic {
    const DIALECT: Dialect = Dialect::Generic;
}
