//! Schema object model.
//!
//! Plain data types describing reflected tables. Values are built either by
//! the loader from schema documents or directly with the builder methods.

use std::fmt;

use serde::Deserialize;

use crate::SchemaError;

/// A reflected table.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Schema (namespace) label, e.g. `public`.
    pub schema: Option<String>,
    /// Free-text table comment.
    pub comment: Option<String>,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Indexes defined on the table.
    pub indexes: Vec<Index>,
    /// Constraints defined on the table.
    pub constraints: Vec<Constraint>,
}

impl Table {
    /// Create an empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            comment: None,
            columns: Vec::new(),
            indexes: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Set the schema label.
    #[must_use]
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Set the table comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Append a column.
    #[must_use]
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Append an index.
    #[must_use]
    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Append a constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Names of the primary key columns, in column order.
    #[must_use]
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// A reflected column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Declared type in its string form (e.g. `VARCHAR(50)`).
    pub data_type: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Part of the primary key.
    pub primary_key: bool,
    /// Carries a single-column unique constraint.
    pub unique: bool,
    /// Carries a single-column index.
    pub index: bool,
    /// Default value descriptor.
    pub default: Option<ColumnDefault>,
    /// Outgoing foreign key references.
    pub foreign_keys: Vec<ForeignKey>,
    /// Free-text column comment.
    pub comment: Option<String>,
}

impl Column {
    /// Create a nullable column with no flags set.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            primary_key: false,
            unique: false,
            index: false,
            default: None,
            foreign_keys: Vec::new(),
            comment: None,
        }
    }

    /// Mark as primary key. Primary key columns are never nullable.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Mark as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark as indexed.
    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.index = true;
        self
    }

    /// Disallow NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Set the default descriptor.
    #[must_use]
    pub fn with_default(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Add a foreign key reference to `table.column`.
    #[must_use]
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_keys.push(ForeignKey {
            table: table.into(),
            column: column.into(),
        });
        self
    }
}

/// Foreign key target, written as `table.column` in schema documents.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ForeignKey {
    /// Referenced table.
    pub table: String,
    /// Referenced column.
    pub column: String,
}

impl TryFrom<String> for ForeignKey {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.rsplit_once('.') {
            Some((table, column)) if !table.is_empty() && !column.is_empty() => Ok(Self {
                table: table.to_owned(),
                column: column.to_owned(),
            }),
            _ => Err(SchemaError::InvalidForeignKey(value)),
        }
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Column default descriptor.
///
/// Mirrors the three shapes a reflected default can take: a wrapped literal
/// value, a generator invoked at insert time, or a raw SQL expression.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColumnDefault {
    /// Callable evaluated by the application on insert (e.g. `utcnow`).
    Generator {
        /// Generator name.
        generator: String,
    },
    /// Server-side SQL expression (e.g. `CURRENT_TIMESTAMP`).
    Expression {
        /// Expression text.
        expression: String,
    },
    /// Literal value.
    Value(DefaultValue),
}

impl ColumnDefault {
    /// Literal default.
    #[must_use]
    pub fn value(value: impl Into<DefaultValue>) -> Self {
        Self::Value(value.into())
    }

    /// Generator default.
    #[must_use]
    pub fn generator(name: impl Into<String>) -> Self {
        Self::Generator {
            generator: name.into(),
        }
    }

    /// Server-side expression default.
    #[must_use]
    pub fn expression(expression: impl Into<String>) -> Self {
        Self::Expression {
            expression: expression.into(),
        }
    }
}

/// Literal default value.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal.
    Text(String),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A table index.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Index {
    /// Index name; `None` for anonymous indexes.
    #[serde(default)]
    pub name: Option<String>,
    /// Indexed columns in order.
    pub columns: Vec<String>,
    /// Unique index.
    #[serde(default)]
    pub unique: bool,
}

impl Index {
    /// Create a named, non-unique index.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        }
    }
}

/// Kind of a table constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// `PRIMARY KEY`.
    PrimaryKey,
    /// `UNIQUE`.
    Unique,
    /// `FOREIGN KEY`.
    ForeignKey,
    /// `CHECK`.
    Check,
}

impl ConstraintKind {
    /// Human-readable label used in documentation.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PrimaryKey => "PrimaryKeyConstraint",
            Self::Unique => "UniqueConstraint",
            Self::ForeignKey => "ForeignKeyConstraint",
            Self::Check => "CheckConstraint",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A table constraint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Constraint {
    /// Constraint name; `None` for anonymous constraints.
    #[serde(default)]
    pub name: Option<String>,
    /// Constraint kind.
    pub kind: ConstraintKind,
    /// Constrained columns in order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Referenced target for foreign key constraints.
    #[serde(default)]
    pub references: Option<ForeignKey>,
    /// Check expression for check constraints.
    #[serde(default)]
    pub expression: Option<String>,
}

impl Constraint {
    /// Create a constraint of the given kind.
    #[must_use]
    pub fn new<I, S>(name: Option<&str>, kind: ConstraintKind, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.map(str::to_owned),
            kind,
            columns: columns.into_iter().map(Into::into).collect(),
            references: None,
            expression: None,
        }
    }

    /// Whether the constraint should appear in documentation.
    ///
    /// Anonymous constraints and names starting with `_` are internal.
    #[must_use]
    pub fn is_documented(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| !name.is_empty() && !name.starts_with('_'))
    }
}
