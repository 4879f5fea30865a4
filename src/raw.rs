use smol_str::SmolStr;

use crate::{
    context::Context,
    error::{Error, Result},
    export::ExportHandle,
    expr::{Flatten, Op, Operand},
    fragment::{Fragment, Fragments},
    value::Value,
};

/// Verbatim SQL, possibly interleaved with bound values.
///
/// Usually built with the [`sql!`](crate::sql) macro or
/// [`RawSql::with_binds`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSql(Fragments);

impl RawSql {
    pub fn new<T: Into<SmolStr>>(sql: T) -> Self {
        let mut fragments = Fragments::with_capacity(1);
        fragments.push(Fragment::sql(sql));
        Self(fragments)
    }

    /// Splits `sql` at its `?` placeholders and binds one value per
    /// placeholder, in order.
    ///
    /// A `?` inside a quoted literal or identifier is text, as are the
    /// `??`, `?|` and `?&` operators.
    pub fn with_binds<I>(sql: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let segments = split_placeholders(sql);
        let mut values = values.into_iter();
        let mut fragments = Fragments::with_capacity(segments.len() * 2);
        for (index, segment) in segments.iter().enumerate() {
            if !segment.trim().is_empty() {
                fragments.push(Fragment::sql(*segment));
            }
            if index + 1 == segments.len() {
                break;
            }
            let value = values.next().ok_or_else(|| {
                Error::InvalidFragment(format!("placeholder {} has no value", index + 1))
            })?;
            fragments.push(Fragment::Value(value));
        }
        if values.next().is_some() {
            return Err(Error::InvalidFragment(format!(
                "{} placeholders but more values",
                segments.len() - 1
            )));
        }
        Ok(Self(fragments))
    }

    pub fn fragments(&self) -> &Fragments {
        &self.0
    }

    pub fn into_fragments(self) -> Fragments {
        self.0
    }

    pub fn op(self) -> Op {
        Op::from(Operand::Raw(self))
    }

    pub fn export(&self) -> ExportHandle<'_> {
        self.0.export()
    }
}

impl From<Fragments> for RawSql {
    fn from(value: Fragments) -> Self {
        Self(value)
    }
}

impl Flatten for RawSql {
    fn flatten(&self, _ctx: &dyn Context, out: &mut Fragments) -> Result<()> {
        out.append(&self.0);
        Ok(())
    }
}

fn split_placeholders(sql: &str) -> Vec<&str> {
    enum State {
        Normal,
        Ident,
        Lit,
    }

    let mut segments = Vec::new();
    let mut state = State::Normal;
    let mut start = 0;

    let mut chars = sql.char_indices().peekable();
    while let Some((index, char)) = chars.next() {
        match state {
            State::Normal => match char {
                '\'' => state = State::Lit,
                '"' => state = State::Ident,
                '?' => {
                    // jsonb operators and an escaped `??` are not placeholders
                    if let Some(&(_, '?' | '|' | '&')) = chars.peek() {
                        chars.next();
                    } else {
                        segments.push(&sql[start..index]);
                        start = index + char.len_utf8();
                    }
                }
                _ => {}
            },
            State::Ident | State::Lit => {
                let close = if matches!(state, State::Lit) { '\'' } else { '"' };
                if char == close {
                    // a doubled quote stays inside
                    if chars.peek().map(|&(_, next)| next) == Some(close) {
                        chars.next();
                    } else {
                        state = State::Normal;
                    }
                }
            }
        }
    }

    segments.push(&sql[start..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::ctx, value::IntoValue};

    fn bound(sql: &str, values: Vec<Value>) -> (String, Vec<Value>) {
        let ctx = ctx();
        let raw = RawSql::with_binds(sql, values).unwrap();
        let rendered = raw.fragments().render(&ctx);
        (rendered.sql, rendered.params)
    }

    #[test]
    fn test_placeholders_are_bound_in_order() {
        let (sql, params) = bound(
            "price + ? as fee, lower(?)",
            vec![5.into_value(), "X".into_value()],
        );
        assert_eq!("price + $1 as fee, lower($2)", sql);
        assert_eq!(vec![Value::Int(5), Value::Text("X".into())], params);
    }

    #[test]
    fn test_quoted_question_marks_are_text() {
        let (sql, params) = bound("'te?st' = ?", vec![1.into_value()]);
        assert_eq!("'te?st' = $1", sql);
        assert_eq!(1, params.len());

        let (sql, _) = bound("\"we\"\"ird?\" = ?", vec![1.into_value()]);
        assert_eq!("\"we\"\"ird?\" = $1", sql);

        let (sql, _) = bound("'it''s?' = ?", vec![1.into_value()]);
        assert_eq!("'it''s?' = $1", sql);
    }

    #[test]
    fn test_jsonb_operators_are_not_placeholders() {
        let (sql, params) = bound("tags ?| ? and doc ?? 'k'", vec!["a".into_value()]);
        assert_eq!("tags ?| $1 and doc ?? 'k'", sql);
        assert_eq!(1, params.len());
    }

    #[test]
    fn test_value_count_mismatch() {
        assert!(RawSql::with_binds("a = ? and b = ?", vec![1.into_value()]).is_err());
        assert!(RawSql::with_binds("a = 1", vec![1.into_value()]).is_err());
        assert!(RawSql::with_binds("a = 1", Vec::new()).is_ok());
    }
}
