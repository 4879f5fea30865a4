//! Export hints attached to a registered statement.
//!
//! Hints are opaque to builders: a label, whether the statement returns rows,
//! and per-column renderer descriptions a downstream consumer can use when
//! displaying results.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::{
    context::{Context, Rendered},
    error::{Error, Result},
    fragment::Fragments,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum RendererKind {
    Datetime,
    Boolean,
    Enum,
    String,
    Uuid,
}

impl RendererKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RendererKind::Datetime => "datetime",
            RendererKind::Boolean => "boolean",
            RendererKind::Enum => "enum",
            RendererKind::String => "string",
            RendererKind::Uuid => "uuid",
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RendererKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "datetime" => Ok(RendererKind::Datetime),
            "boolean" => Ok(RendererKind::Boolean),
            "enum" => Ok(RendererKind::Enum),
            "string" => Ok(RendererKind::String),
            "uuid" => Ok(RendererKind::Uuid),
            other => Err(Error::UnsupportedColumnRendererKind(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Auto,
    Sec,
    Millis,
    Nano,
}

impl TimeUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Auto => "auto",
            TimeUnit::Sec => "sec",
            TimeUnit::Millis => "mills",
            TimeUnit::Nano => "nano",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatetimeRenderer {
    pub unit: Option<TimeUnit>,
    pub layout: Option<String>,
    pub tz: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ColumnRenderer {
    pub kind: RendererKind,
    pub opts: IndexMap<SmolStr, String>,
}

impl ColumnRenderer {
    fn bare(kind: RendererKind) -> Self {
        Self {
            kind,
            opts: IndexMap::new(),
        }
    }

    pub fn boolean() -> Self {
        Self::bare(RendererKind::Boolean)
    }

    pub fn uuid() -> Self {
        Self::bare(RendererKind::Uuid)
    }

    pub fn string(encoding: Option<&str>) -> Self {
        let mut renderer = Self::bare(RendererKind::String);
        if let Some(encoding) = encoding {
            renderer.opts.insert("encoding".into(), encoding.to_owned());
        }
        renderer
    }

    pub fn datetime(opts: DatetimeRenderer) -> Self {
        let mut renderer = Self::bare(RendererKind::Datetime);
        if let Some(unit) = opts.unit {
            renderer.opts.insert("unit".into(), unit.as_str().to_owned());
        }
        if let Some(layout) = opts.layout {
            renderer.opts.insert("layout".into(), layout);
        }
        if let Some(tz) = opts.tz {
            renderer.opts.insert("tz".into(), tz);
        }
        renderer
    }

    /// Maps each enum label to its stored integer.
    pub fn enumeration<I, K>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<SmolStr>,
    {
        let mut renderer = Self::bare(RendererKind::Enum);
        renderer.opts.extend(
            items
                .into_iter()
                .map(|(label, value)| (label.into(), value.to_string())),
        );
        renderer
    }

    /// Builds a renderer from a kind name and raw options. Boolean and uuid
    /// renderers take no options.
    pub fn parse<I, K, V>(kind: &str, opts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<SmolStr>,
        V: Into<String>,
    {
        let kind = kind.parse::<RendererKind>()?;
        let opts: IndexMap<SmolStr, String> = opts
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        if !opts.is_empty() && matches!(kind, RendererKind::Boolean | RendererKind::Uuid) {
            return Err(Error::UnsupportedColumnRendererKind(kind.to_string()));
        }
        Ok(Self { kind, opts })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ExportOptions {
    pub label: Option<SmolStr>,
    pub is_query: bool,
    pub col_renderers: IndexMap<SmolStr, ColumnRenderer>,
}

impl ExportOptions {
    pub fn label<T: Into<SmolStr>>(mut self, label: T) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_query(mut self, is_query: bool) -> Self {
        self.is_query = is_query;
        self
    }

    pub fn col_render<T: Into<SmolStr>>(mut self, column: T, renderer: ColumnRenderer) -> Self {
        self.col_renderers.insert(column.into(), renderer);
        self
    }
}

/// A statement as it was handed to a recording context.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Export {
    pub options: ExportOptions,
    pub rendered: Rendered,
}

/// Chainable builder for export hints over a borrowed fragment buffer.
#[derive(Debug)]
pub struct ExportHandle<'a> {
    fragments: &'a Fragments,
    options: ExportOptions,
}

impl<'a> ExportHandle<'a> {
    pub(crate) fn new(fragments: &'a Fragments) -> Self {
        Self {
            fragments,
            options: ExportOptions::default(),
        }
    }

    pub fn label<T: Into<SmolStr>>(mut self, label: T) -> Self {
        self.options.label = Some(label.into());
        self
    }

    pub fn is_query(mut self, is_query: bool) -> Self {
        self.options.is_query = is_query;
        self
    }

    pub fn col_render<T: Into<SmolStr>>(mut self, column: T, renderer: ColumnRenderer) -> Self {
        self.options.col_renderers.insert(column.into(), renderer);
        self
    }

    pub fn col_render_datetime<T: Into<SmolStr>>(self, column: T, opts: DatetimeRenderer) -> Self {
        self.col_render(column, ColumnRenderer::datetime(opts))
    }

    pub fn col_render_enum<T, I, K>(self, column: T, items: I) -> Self
    where
        T: Into<SmolStr>,
        I: IntoIterator<Item = (K, i64)>,
        K: Into<SmolStr>,
    {
        self.col_render(column, ColumnRenderer::enumeration(items))
    }

    pub fn col_render_string<T: Into<SmolStr>>(self, column: T, encoding: Option<&str>) -> Self {
        self.col_render(column, ColumnRenderer::string(encoding))
    }

    pub fn col_render_uuid<T: Into<SmolStr>>(self, column: T) -> Self {
        self.col_render(column, ColumnRenderer::uuid())
    }

    pub fn col_render_boolean<T: Into<SmolStr>>(self, column: T) -> Self {
        self.col_render(column, ColumnRenderer::boolean())
    }

    /// String-keyed variant of [`ExportHandle::col_render`].
    pub fn col_render_kind<T, I, K, V>(self, column: T, kind: &str, opts: I) -> Result<Self>
    where
        T: Into<SmolStr>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<SmolStr>,
        V: Into<String>,
    {
        let renderer = ColumnRenderer::parse(kind, opts)?;
        Ok(self.col_render(column, renderer))
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Hands the statement and its hints to the context.
    pub fn register(self, ctx: &dyn Context) -> ExportOptions {
        ctx.register(self.fragments, &self.options);
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{context::DbContext, fragment::Fragment};

    #[test]
    fn test_unknown_kind_is_rejected() {
        let frags = Fragments::new();
        let err = frags
            .export()
            .col_render_kind("created", "money", [("unit", "sec")])
            .unwrap_err();
        assert_eq!(Error::UnsupportedColumnRendererKind("money".into()), err);
    }

    #[test]
    fn test_option_free_kinds_reject_options() {
        let err = ColumnRenderer::parse("uuid", [("encoding", "hex")]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedColumnRendererKind(_)));
        assert!(ColumnRenderer::parse("uuid", Vec::<(String, String)>::new()).is_ok());
    }

    #[test]
    fn test_datetime_and_enum_options() {
        let datetime = ColumnRenderer::datetime(DatetimeRenderer {
            unit: Some(TimeUnit::Millis),
            tz: Some("UTC".into()),
            ..Default::default()
        });
        assert_eq!(Some("mills"), datetime.opts.get("unit").map(String::as_str));
        assert_eq!(None, datetime.opts.get("layout"));

        let status = ColumnRenderer::enumeration([("active", 1), ("banned", 2)]);
        assert_eq!(RendererKind::Enum, status.kind);
        assert_eq!(Some("2"), status.opts.get("banned").map(String::as_str));
    }

    #[test]
    fn test_handle_registers_hints() {
        let ctx = DbContext::default();
        let mut frags = Fragments::new();
        frags.push(Fragment::sql("SELECT now()"));

        let options = frags
            .export()
            .label("clock")
            .is_query(true)
            .col_render_datetime("now", DatetimeRenderer::default())
            .col_render_boolean("flag")
            .register(&ctx);
        assert_eq!(2, options.col_renderers.len());

        let exports = ctx.take_exports();
        assert_eq!(options, exports[0].options);
        assert_eq!("SELECT now()", exports[0].rendered.sql);
    }
}
