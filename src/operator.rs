use fragsql_derive::{BinaryOperator, UnaryOperator};

/// Infix operators; each variant also becomes a chainable method on
/// [`crate::Op`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinaryOperator)]
pub enum BinaryOperator {
    Eq,
    #[binary(rename = "neq")]
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
    Plus,
    Minus,
    Multiply,
    Divide,
    #[binary(rename = "modulo")]
    Mod,
    Pow,
    Lshift,
    Rshift,
}

impl BinaryOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Gte => ">=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Lte => "<=",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::NotLike => "NOT LIKE",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Pow => "^",
            BinaryOperator::Lshift => "<<",
            BinaryOperator::Rshift => ">>",
        }
    }
}

/// Postfix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, UnaryOperator)]
pub enum UnaryOperator {
    IsNull,
    IsNotNull,
}

impl UnaryOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            UnaryOperator::IsNull => "IS NULL",
            UnaryOperator::IsNotNull => "IS NOT NULL",
        }
    }
}
