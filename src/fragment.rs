//! Fragments: the unit handed to a rendering context.
//!
//! A [`Fragment`] is exactly one of literal SQL text or a bound [`Value`].
//! The enum makes "both" and "neither" unrepresentable; [`FragmentParts`] is
//! the loose shape (two optional halves) and only enters a buffer through
//! validation.

use std::{fmt, slice};

use smol_str::SmolStr;

use crate::{
    context::{Context, Rendered},
    error::{Error, Result},
    export::{ExportHandle, ExportOptions},
    value::{IntoValue, Value},
};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum Fragment {
    Sql(SmolStr),
    Value(Value),
}

impl Fragment {
    #[inline]
    pub fn sql<T>(text: T) -> Self
    where
        T: Into<SmolStr>,
    {
        Self::Sql(text.into())
    }

    #[inline]
    pub fn sql_static(text: &'static str) -> Self {
        Self::Sql(SmolStr::new_static(text))
    }

    #[inline]
    pub fn value<V>(value: V) -> Self
    where
        V: IntoValue,
    {
        Self::Value(value.into_value())
    }

    pub fn as_sql(&self) -> Option<&str> {
        match self {
            Fragment::Sql(sql) => Some(sql.as_str()),
            Fragment::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Fragment::Sql(_) => None,
            Fragment::Value(value) => Some(value),
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Fragment::Value(_))
    }
}

/// An unvalidated fragment, e.g. one assembled from external input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentParts {
    pub sql: Option<SmolStr>,
    pub value: Option<Value>,
}

impl FragmentParts {
    pub fn sql<T: Into<SmolStr>>(text: T) -> Self {
        Self {
            sql: Some(text.into()),
            value: None,
        }
    }

    pub fn value<V: IntoValue>(value: V) -> Self {
        Self {
            sql: None,
            value: Some(value.into_value()),
        }
    }
}

impl fmt::Display for FragmentParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.sql, &self.value) {
            (Some(sql), Some(value)) => write!(f, "{{sql: {sql:?}, value: {value:?}}}"),
            (Some(sql), None) => write!(f, "{{sql: {sql:?}}}"),
            (None, Some(value)) => write!(f, "{{value: {value:?}}}"),
            (None, None) => f.write_str("{}"),
        }
    }
}

impl TryFrom<FragmentParts> for Fragment {
    type Error = Error;

    fn try_from(parts: FragmentParts) -> Result<Self> {
        match parts {
            FragmentParts {
                sql: Some(sql),
                value: None,
            } => Ok(Fragment::Sql(sql)),
            FragmentParts {
                sql: None,
                value: Some(value),
            } => Ok(Fragment::Value(value)),
            other => Err(Error::InvalidFragment(other.to_string())),
        }
    }
}

/// Ordered fragment buffer filled during one statement build.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Fragments(Vec<Fragment>);

impl Fragments {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, fragment: Fragment) -> &mut Self {
        self.0.push(fragment);
        self
    }

    pub(crate) fn push_sql(&mut self, text: &'static str) -> &mut Self {
        self.push(Fragment::sql_static(text))
    }

    /// Validates and appends one loose fragment.
    pub fn try_push(&mut self, parts: FragmentParts) -> Result<&mut Self> {
        let fragment = Fragment::try_from(parts)?;
        Ok(self.push(fragment))
    }

    /// Validates every item first; on failure nothing is appended.
    pub fn try_extend<I>(&mut self, items: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = FragmentParts>,
    {
        let validated = items
            .into_iter()
            .map(Fragment::try_from)
            .collect::<Result<Vec<_>>>()?;
        self.0.extend(validated);
        Ok(self)
    }

    pub fn append(&mut self, other: &Fragments) -> &mut Self {
        self.0.extend(other.0.iter().cloned());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Fragment> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Fragment] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Fragment> {
        self.0
    }

    /// Bound values in emission order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().filter_map(Fragment::as_value)
    }

    pub fn render(&self, ctx: &dyn Context) -> Rendered {
        ctx.render(self)
    }

    pub fn register(&self, ctx: &dyn Context, opts: &ExportOptions) {
        ctx.register(self, opts);
    }

    /// Starts an export; hints are attached on the handle before it is
    /// registered with a context.
    pub fn export(&self) -> ExportHandle<'_> {
        ExportHandle::new(self)
    }
}

impl From<Vec<Fragment>> for Fragments {
    fn from(value: Vec<Fragment>) -> Self {
        Self(value)
    }
}

impl FromIterator<Fragment> for Fragments {
    fn from_iter<T: IntoIterator<Item = Fragment>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Fragment> for Fragments {
    fn extend<T: IntoIterator<Item = Fragment>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Fragments {
    type Item = Fragment;
    type IntoIter = std::vec::IntoIter<Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fragments {
    type Item = &'a Fragment;
    type IntoIter = slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_with_both_halves_are_rejected() {
        let parts = FragmentParts {
            sql: Some("id".into()),
            value: Some(Value::Int(1)),
        };
        let err = Fragment::try_from(parts).unwrap_err();
        assert!(matches!(err, Error::InvalidFragment(_)));
    }

    #[test]
    fn test_empty_parts_are_rejected() {
        let mut frags = Fragments::new();
        let err = frags.try_push(FragmentParts::default()).unwrap_err();
        assert_eq!(err, Error::InvalidFragment("{}".to_string()));
        assert!(frags.is_empty());
    }

    #[test]
    fn test_try_extend_is_all_or_nothing() {
        let mut frags = Fragments::new();
        frags.push(Fragment::sql_static("SELECT"));
        let result = frags.try_extend([
            FragmentParts::sql("1"),
            FragmentParts::default(),
            FragmentParts::value(2),
        ]);
        assert!(result.is_err());
        assert_eq!(1, frags.len());

        frags
            .try_extend([FragmentParts::sql("+"), FragmentParts::value(2)])
            .unwrap();
        assert_eq!(3, frags.len());
        assert_eq!(vec![&Value::Int(2)], frags.values().collect::<Vec<_>>());
    }

    #[test]
    fn test_fragment_accessors() {
        let sql = Fragment::sql("WHERE");
        assert_eq!(Some("WHERE"), sql.as_sql());
        assert!(!sql.is_value());
        let value = Fragment::value("bob");
        assert_eq!(Some(&Value::Text("bob".into())), value.as_value());
        assert_eq!(None, value.as_sql());
    }
}
