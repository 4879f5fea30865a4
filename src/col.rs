use smol_str::SmolStr;

/// Column metadata. Only `name` and the SQL-facing alias affect statement
/// building; the rest is carried for callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: SmolStr,
    sql_name: Option<SmolStr>,
    sql_type: SmolStr,
    nullable: bool,
    primary_key: bool,
    default: Option<SmolStr>,
    comment: SmolStr,
}

impl Column {
    pub fn new<N, T>(name: N, sql_type: T) -> Self
    where
        N: Into<SmolStr>,
        T: Into<SmolStr>,
    {
        Self {
            name: name.into(),
            sql_name: None,
            sql_type: sql_type.into(),
            nullable: false,
            primary_key: false,
            default: None,
            comment: SmolStr::default(),
        }
    }

    /// The name used in SQL when it differs from the field name.
    pub fn sql_name<T: Into<SmolStr>>(mut self, sql_name: T) -> Self {
        self.sql_name = Some(sql_name.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn default_value<T: Into<SmolStr>>(mut self, default: T) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn comment<T: Into<SmolStr>>(mut self, comment: T) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_name(&self) -> &str {
        self.sql_name.as_deref().unwrap_or(&self.name)
    }

    pub fn sql_type(&self) -> &str {
        &self.sql_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn comment_text(&self) -> &str {
        &self.comment
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    name: SmolStr,
    unique: bool,
    fields: Vec<SmolStr>,
}

impl Index {
    pub fn new<N, I, S>(name: N, fields: I) -> Self
    where
        N: Into<SmolStr>,
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            name: name.into(),
            unique: false,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn fields(&self) -> &[SmolStr] {
        &self.fields
    }
}
