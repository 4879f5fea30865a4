use std::fmt::Write;

use crate::{
    dialect::Dialect,
    fragment::{Fragment, Fragments},
    value::Value,
};

pub(crate) trait FormatWriter {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result;
}

/// Joins fragment text with single spaces and turns values into
/// dialect placeholders, collecting the bound values in order.
pub(crate) struct FormatContext<'a, W: Write> {
    pub(crate) writer: &'a mut W,
    pub(crate) dialect: Dialect,
    pub(crate) placeholder: u32,
    pub(crate) params: Vec<Value>,
    // no separator after an opening token or at the very start
    glue: bool,
}

impl<'a, W: Write> FormatContext<'a, W> {
    pub fn new(writer: &'a mut W, dialect: Dialect) -> Self {
        Self {
            writer,
            dialect,
            placeholder: 0,
            params: Vec::new(),
            glue: true,
        }
    }

    pub(crate) fn write_ident(&mut self, part: &str) -> std::fmt::Result {
        if part == "*" {
            return self.writer.write_char('*');
        }

        let Some(quote) = self.dialect.quote_char() else {
            return self.writer.write_str(part);
        };
        self.writer.write_char(quote)?;

        let mut last = 0;
        for (index, char) in part.char_indices() {
            if char == quote {
                if index != last {
                    self.writer.write_str(&part[last..index])?;
                }
                // an embedded quote is escaped by doubling it
                self.writer.write_char(quote)?;
                self.writer.write_char(quote)?;
                last = index + char.len_utf8();
            }
        }

        if last < part.len() {
            self.writer.write_str(&part[last..])?;
        }

        self.writer.write_char(quote)
    }

    fn separate(&mut self, token: &str) -> std::fmt::Result {
        let closing = token.starts_with(')') || token.starts_with(',');
        if !self.glue && !closing {
            self.writer.write_char(' ')?;
        }
        self.glue = token.ends_with('(');
        Ok(())
    }

    pub(crate) fn write_token(&mut self, token: &str) -> std::fmt::Result {
        let token = token.trim();
        if token.is_empty() {
            return Ok(());
        }
        self.separate(token)?;
        self.writer.write_str(token)
    }

    pub(crate) fn write_placeholder(&mut self, value: &Value) -> std::fmt::Result {
        self.separate("?")?;
        self.placeholder += 1;
        self.params.push(value.clone());
        match self.dialect {
            Dialect::Postgres | Dialect::Generic => write!(self.writer, "${}", self.placeholder),
            Dialect::MySql => self.writer.write_char('?'),
            Dialect::Sqlite => write!(self.writer, "?{}", self.placeholder),
        }
    }
}

impl FormatWriter for Fragment {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
        match self {
            Fragment::Sql(sql) => context.write_token(sql),
            Fragment::Value(value) => context.write_placeholder(value),
        }
    }
}

impl FormatWriter for Fragments {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result {
        for fragment in self {
            fragment.format_writer(context)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dialect: Dialect, fragments: &[Fragment]) -> (String, Vec<Value>) {
        let fragments = Fragments::from(fragments.to_vec());
        let mut out = String::new();
        let mut ctx = FormatContext::new(&mut out, dialect);
        fragments.format_writer(&mut ctx).unwrap();
        let params = std::mem::take(&mut ctx.params);
        (out, params)
    }

    #[test]
    fn test_spacing_around_brackets_and_commas() {
        let (sql, params) = write(
            Dialect::Postgres,
            &[
                Fragment::sql("x IN ("),
                Fragment::value(1),
                Fragment::sql(","),
                Fragment::value(2),
                Fragment::sql(")"),
            ],
        );
        assert_eq!("x IN ($1, $2)", sql);
        assert_eq!(vec![Value::Int(1), Value::Int(2)], params);
    }

    #[test]
    fn test_placeholders_per_dialect() {
        let frags = [Fragment::value(1), Fragment::sql("+"), Fragment::value(2)];
        assert_eq!("$1 + $2", write(Dialect::Postgres, &frags).0);
        assert_eq!("? + ?", write(Dialect::MySql, &frags).0);
        assert_eq!("?1 + ?2", write(Dialect::Sqlite, &frags).0);
        assert_eq!("$1 + $2", write(Dialect::Generic, &frags).0);
    }

    #[test]
    fn test_write_ident_doubles_quotes() {
        let mut out = String::new();
        let mut ctx = FormatContext::new(&mut out, Dialect::Postgres);
        ctx.write_ident("we\"ird").unwrap();
        assert_eq!("\"we\"\"ird\"", out);

        let mut out = String::new();
        let mut ctx = FormatContext::new(&mut out, Dialect::MySql);
        ctx.write_ident("a`b").unwrap();
        assert_eq!("`a``b`", out);

        let mut out = String::new();
        let mut ctx = FormatContext::new(&mut out, Dialect::Generic);
        ctx.write_ident("plain").unwrap();
        assert_eq!("plain", out);
    }

    #[test]
    fn test_padding_is_normalised() {
        let (sql, _) = write(
            Dialect::Postgres,
            &[Fragment::sql(" age > "), Fragment::value(3), Fragment::sql("  ")],
        );
        assert_eq!("age > $1", sql);
    }
}
