use std::{
    fmt,
    sync::{Mutex, PoisonError},
};

use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::{
    dialect::{Dialect, HasDialect},
    export::{Export, ExportOptions},
    fragment::Fragments,
    value::Value,
    writer::{FormatContext, FormatWriter},
};

/// SQL text plus its bound parameters, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Rendered {
    pub sql: String,
    pub params: Vec<Value>,
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// The rendering collaborator every builder is parameterised by.
///
/// Builders only ever ask a context for quoted identifiers and for a verdict
/// on function names. Turning a finished fragment buffer into text happens
/// through [`Context::render`] and [`Context::register`].
pub trait Context: fmt::Debug + Send + Sync {
    /// Quotes a single identifier part.
    fn quote_part(&self, part: &str) -> String;

    /// Quotes `table.column`; either half may be absent, in which case the
    /// other one is quoted alone.
    fn quote(&self, table: Option<&str>, column: Option<&str>) -> String {
        match (table, column) {
            (Some(table), Some(column)) => {
                format!("{}.{}", self.quote_part(table), self.quote_part(column))
            }
            (Some(part), None) | (None, Some(part)) => self.quote_part(part),
            (None, None) => String::new(),
        }
    }

    fn check_function_name(&self, _name: &str) -> bool {
        true
    }

    fn render(&self, fragments: &Fragments) -> Rendered;

    fn register(&self, fragments: &Fragments, opts: &ExportOptions) {
        let rendered = self.render(fragments);
        tracing::debug!(
            label = opts.label.as_deref(),
            is_query = opts.is_query,
            params = rendered.params.len(),
            sql = %rendered.sql,
            "register statement"
        );
    }
}

/// A dialect-aware context that also records registered statements.
#[derive(Debug, Default)]
pub struct DbContext {
    dialect: Dialect,
    functions: Option<IndexSet<SmolStr>>,
    exports: Mutex<Vec<Export>>,
}

impl DbContext {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Default::default()
        }
    }

    pub fn for_dialect<D: HasDialect>() -> Self {
        Self::new(D::DIALECT)
    }

    /// Restricts call nodes to the given function names, compared
    /// case-insensitively. Without an allow-list every name passes.
    pub fn allow_functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = self.functions.get_or_insert_with(IndexSet::new);
        allowed.extend(
            names
                .into_iter()
                .map(|name| SmolStr::new(name.as_ref().to_ascii_lowercase())),
        );
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Drains every statement registered so far.
    pub fn take_exports(&self) -> Vec<Export> {
        let mut exports = self.exports.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *exports)
    }
}

impl Context for DbContext {
    fn quote_part(&self, part: &str) -> String {
        let mut out = String::with_capacity(part.len() + 2);
        let mut ctx = FormatContext::new(&mut out, self.dialect);
        ctx.write_ident(part)
            .expect("should not fail on a string writer");
        out
    }

    fn check_function_name(&self, name: &str) -> bool {
        match &self.functions {
            Some(allowed) => allowed.contains(name.to_ascii_lowercase().as_str()),
            None => true,
        }
    }

    fn render(&self, fragments: &Fragments) -> Rendered {
        let mut sql = String::new();
        let mut ctx = FormatContext::new(&mut sql, self.dialect);
        fragments
            .format_writer(&mut ctx)
            .expect("should not fail on a string writer");
        let params = std::mem::take(&mut ctx.params);
        Rendered { sql, params }
    }

    fn register(&self, fragments: &Fragments, opts: &ExportOptions) {
        let rendered = self.render(fragments);
        tracing::debug!(
            label = opts.label.as_deref(),
            is_query = opts.is_query,
            params = rendered.params.len(),
            sql = %rendered.sql,
            "register statement"
        );
        self.exports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Export {
                options: opts.clone(),
                rendered,
            });
    }
}
