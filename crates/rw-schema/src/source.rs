//! Schema source trait and in-memory implementation.

use std::collections::HashSet;

use crate::{Column, Constraint, ConstraintKind, Index, NamingConvention, SchemaError, Table};

/// Read-only capability interface over reflected schema metadata.
///
/// Renderers depend only on this trait, never on a concrete reflection
/// backend. Adapt backend objects to it at the boundary.
///
/// Table order returned by [`table_names`](Self::table_names) must be stable
/// across calls.
pub trait SchemaSource: Send + Sync {
    /// Names of all tables in stable iteration order.
    fn table_names(&self) -> Vec<String>;

    /// Whether a table with this name exists.
    fn has_table(&self, name: &str) -> bool {
        self.table_names().iter().any(|t| t == name)
    }

    /// Columns of a table in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::TableNotFound`] for unknown tables, or a backend
    /// error if the metadata cannot be read.
    fn columns(&self, table: &str) -> Result<Vec<Column>, SchemaError>;

    /// Indexes of a table.
    ///
    /// # Errors
    ///
    /// Same as [`columns`](Self::columns).
    fn indexes(&self, table: &str) -> Result<Vec<Index>, SchemaError>;

    /// Constraints of a table.
    ///
    /// # Errors
    ///
    /// Same as [`columns`](Self::columns).
    fn constraints(&self, table: &str) -> Result<Vec<Constraint>, SchemaError>;

    /// Schema (namespace) label of a table.
    fn namespace(&self, table: &str) -> Option<String>;

    /// Table comment.
    fn comment(&self, _table: &str) -> Option<String> {
        None
    }
}

/// In-memory schema metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataSchema {
    tables: Vec<Table>,
}

impl MetadataSchema {
    /// Wrap tables as given, without deriving implicit constraints.
    #[must_use]
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Build metadata the way a reflection library would.
    ///
    /// Column flags produce implicit constraints and indexes unless an
    /// explicit one already covers the same columns: primary key columns
    /// produce one primary key constraint, `unique` columns a unique
    /// constraint, foreign keys a foreign key constraint and `index` columns
    /// an index. Names come from the naming convention; constraints without
    /// a template stay anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateTable`] if two tables share a name.
    pub fn with_convention(
        tables: Vec<Table>,
        convention: &NamingConvention,
    ) -> Result<Self, SchemaError> {
        let mut seen = HashSet::with_capacity(tables.len());
        for table in &tables {
            if !seen.insert(table.name.as_str()) {
                return Err(SchemaError::DuplicateTable(table.name.clone()));
            }
        }

        let tables = tables
            .into_iter()
            .map(|table| derive_implicit(table, convention))
            .collect();
        Ok(Self { tables })
    }

    /// Look up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// All tables in declaration order.
    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    fn require(&self, name: &str) -> Result<&Table, SchemaError> {
        self.table(name)
            .ok_or_else(|| SchemaError::TableNotFound(name.to_owned()))
    }
}

impl SchemaSource for MetadataSchema {
    fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    fn columns(&self, table: &str) -> Result<Vec<Column>, SchemaError> {
        Ok(self.require(table)?.columns.clone())
    }

    fn indexes(&self, table: &str) -> Result<Vec<Index>, SchemaError> {
        Ok(self.require(table)?.indexes.clone())
    }

    fn constraints(&self, table: &str) -> Result<Vec<Constraint>, SchemaError> {
        Ok(self.require(table)?.constraints.clone())
    }

    fn namespace(&self, table: &str) -> Option<String> {
        self.table(table).and_then(|t| t.schema.clone())
    }

    fn comment(&self, table: &str) -> Option<String> {
        self.table(table).and_then(|t| t.comment.clone())
    }
}

fn derive_implicit(mut table: Table, convention: &NamingConvention) -> Table {
    let has_constraint = |constraints: &[Constraint], kind: ConstraintKind, columns: &[&str]| {
        constraints
            .iter()
            .any(|c| c.kind == kind && c.columns.iter().map(String::as_str).eq(columns.iter().copied()))
    };

    let mut derived = Vec::new();

    let pk_columns = table.primary_key_columns();
    if let Some(first) = pk_columns.first()
        && !table
            .constraints
            .iter()
            .any(|c| c.kind == ConstraintKind::PrimaryKey)
    {
        let name = convention.primary_key_name(&table.name, first);
        derived.push(Constraint::new(
            name.as_deref(),
            ConstraintKind::PrimaryKey,
            pk_columns.iter().copied(),
        ));
    }

    for column in table.columns.iter().filter(|c| c.unique) {
        let cols = [column.name.as_str()];
        if !has_constraint(&table.constraints, ConstraintKind::Unique, &cols) {
            let name = convention.unique_name(&table.name, &column.name);
            derived.push(Constraint::new(name.as_deref(), ConstraintKind::Unique, cols));
        }
    }

    for column in &table.columns {
        let cols = [column.name.as_str()];
        if column.foreign_keys.is_empty()
            || has_constraint(&table.constraints, ConstraintKind::ForeignKey, &cols)
        {
            continue;
        }
        for fk in &column.foreign_keys {
            let name = convention.foreign_key_name(&table.name, &column.name, &fk.table);
            let mut constraint =
                Constraint::new(name.as_deref(), ConstraintKind::ForeignKey, cols);
            constraint.references = Some(fk.clone());
            derived.push(constraint);
        }
    }

    let mut indexes = Vec::new();
    for column in table.columns.iter().filter(|c| c.index) {
        let covered = table
            .indexes
            .iter()
            .any(|i| i.columns.len() == 1 && i.columns[0] == column.name);
        if !covered {
            indexes.push(Index::new(
                convention.index_name(&table.name, &column.name),
                [column.name.as_str()],
            ));
        }
    }

    derived.append(&mut table.constraints);
    table.constraints = derived;
    indexes.append(&mut table.indexes);
    table.indexes = indexes;
    table
}
