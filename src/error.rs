//! Error types for statement building.

use smol_str::SmolStr;
use thiserror::Error;

/// Result alias used by every builder in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Build-time failures.
///
/// All of them are raised before any SQL text or parameter is produced; a
/// failed build never hands a partial statement to a context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Insert, update or equals got a record whose every field is absent.
    #[error("empty record")]
    EmptyRecord,

    /// A delete or update resolved to an empty predicate without an explicit
    /// waiver.
    #[error("where clause is required for {statement}")]
    MissingWhereClause { statement: &'static str },

    /// Something that is not exactly one of literal SQL or bound value was
    /// pushed into a fragment buffer.
    #[error("{0} is not a fragment")]
    InvalidFragment(String),

    /// The context refused a function name used by a call node.
    #[error("invalid function name: {0}")]
    InvalidFunctionName(SmolStr),

    /// An export hint used a renderer kind outside the known set.
    #[error("unsupported column renderer kind: {0}")]
    UnsupportedColumnRendererKind(String),

    /// A select projection excluded every column it would have listed.
    #[error("select projection is empty after applying include and exclude")]
    EmptyProjection,
}

impl Error {
    pub(crate) fn missing_where(statement: &'static str) -> Self {
        Self::MissingWhereClause { statement }
    }

    /// Check if this error is a refused destructive statement.
    pub fn is_missing_where(&self) -> bool {
        matches!(self, Self::MissingWhereClause { .. })
    }
}
