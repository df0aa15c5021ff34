//! `CREATE TABLE` statement generation.
//!
//! Output follows the layout reflection libraries print for a table: one
//! tab-indented line per column, then table-level constraints.

use std::sync::LazyLock;

use regex::Regex;
use rw_schema::{Column, ColumnDefault, Constraint, ConstraintKind, ForeignKey};

use crate::options::SqlDialect;

static PLAIN_IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap());

/// Words that always need quoting when used as identifiers.
const RESERVED_WORDS: &[&str] = &[
    "all", "and", "as", "by", "check", "column", "constraint", "create", "default", "desc",
    "from", "group", "index", "key", "limit", "not", "null", "order", "primary", "references",
    "select", "table", "to", "unique", "user", "where",
];

/// Build a `CREATE TABLE` statement.
///
/// Table-level constraints come from `constraints`. Column flags fill in
/// what the constraint list does not cover: a primary key when none is
/// listed, and single-column unique and foreign key constraints.
#[must_use]
pub fn create_table_sql(
    table: &str,
    namespace: Option<&str>,
    columns: &[Column],
    constraints: &[Constraint],
    dialect: SqlDialect,
) -> String {
    let mut lines: Vec<String> = columns.iter().map(|c| column_sql(c, dialect)).collect();

    let has_primary = constraints
        .iter()
        .any(|c| c.kind == ConstraintKind::PrimaryKey);
    if !has_primary {
        let pk: Vec<&str> = columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect();
        if !pk.is_empty() {
            lines.push(format!("PRIMARY KEY ({})", column_list(&pk, dialect)));
        }
    }

    lines.extend(constraints.iter().filter_map(|c| constraint_sql(c, dialect)));

    for column in columns {
        let single = [column.name.as_str()];
        if column.unique && !covers(constraints, ConstraintKind::Unique, &single) {
            lines.push(format!("UNIQUE ({})", quote(&column.name, dialect)));
        }
        if !covers(constraints, ConstraintKind::ForeignKey, &single) {
            for fk in &column.foreign_keys {
                lines.push(foreign_key_sql(&[column.name.as_str()], fk, dialect));
            }
        }
    }

    let name = match namespace {
        Some(ns) => format!("{}.{}", quote(ns, dialect), quote(table, dialect)),
        None => quote(table, dialect),
    };
    format!("CREATE TABLE {name} (\n\t{}\n)", lines.join(", \n\t"))
}

/// Quote an identifier for `dialect` when it is not a plain lowercase name.
#[must_use]
pub fn quote(ident: &str, dialect: SqlDialect) -> String {
    if PLAIN_IDENT_RE.is_match(ident) && !RESERVED_WORDS.contains(&ident) {
        return ident.to_owned();
    }
    match dialect {
        SqlDialect::Mysql => format!("`{}`", ident.replace('`', "``")),
        SqlDialect::Mssql => format!("[{}]", ident.replace(']', "]]")),
        SqlDialect::Generic | SqlDialect::Postgresql | SqlDialect::Sqlite => {
            format!("\"{}\"", ident.replace('"', "\"\""))
        }
    }
}

fn column_sql(column: &Column, dialect: SqlDialect) -> String {
    let mut sql = format!(
        "{} {}",
        quote(&column.name, dialect),
        type_name(&column.data_type, dialect)
    );
    if let Some(ColumnDefault::Expression { expression }) = &column.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(expression);
    }
    if !column.nullable {
        sql.push_str(" NOT NULL");
    }
    sql
}

fn type_name(data_type: &str, dialect: SqlDialect) -> String {
    match (dialect, data_type.to_ascii_uppercase().as_str()) {
        (SqlDialect::Postgresql, "DATETIME") => "TIMESTAMP WITHOUT TIME ZONE".to_owned(),
        (SqlDialect::Postgresql, "BLOB") => "BYTEA".to_owned(),
        (SqlDialect::Mssql, "BOOLEAN") => "BIT".to_owned(),
        (SqlDialect::Mssql, "TEXT") => "VARCHAR(max)".to_owned(),
        (SqlDialect::Mysql, "BOOLEAN") => "BOOL".to_owned(),
        _ => data_type.to_owned(),
    }
}

fn constraint_sql(constraint: &Constraint, dialect: SqlDialect) -> Option<String> {
    let columns: Vec<&str> = constraint.columns.iter().map(String::as_str).collect();
    let body = match constraint.kind {
        ConstraintKind::PrimaryKey => format!("PRIMARY KEY ({})", column_list(&columns, dialect)),
        ConstraintKind::Unique => format!("UNIQUE ({})", column_list(&columns, dialect)),
        ConstraintKind::ForeignKey => {
            foreign_key_sql(&columns, constraint.references.as_ref()?, dialect)
        }
        ConstraintKind::Check => format!("CHECK ({})", constraint.expression.as_deref()?),
    };
    Some(match constraint.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => format!("CONSTRAINT {} {body}", quote(name, dialect)),
        None => body,
    })
}

fn foreign_key_sql(columns: &[&str], target: &ForeignKey, dialect: SqlDialect) -> String {
    format!(
        "FOREIGN KEY({}) REFERENCES {} ({})",
        column_list(columns, dialect),
        qualified(&target.table, dialect),
        quote(&target.column, dialect)
    )
}

/// Quote each part of a dotted `schema.table` reference.
fn qualified(name: &str, dialect: SqlDialect) -> String {
    name.split('.')
        .map(|part| quote(part, dialect))
        .collect::<Vec<_>>()
        .join(".")
}

fn column_list(columns: &[&str], dialect: SqlDialect) -> String {
    columns
        .iter()
        .map(|c| quote(c, dialect))
        .collect::<Vec<_>>()
        .join(", ")
}

fn covers(constraints: &[Constraint], kind: ConstraintKind, columns: &[&str]) -> bool {
    constraints.iter().any(|c| {
        c.kind == kind
            && c.columns
                .iter()
                .map(String::as_str)
                .eq(columns.iter().copied())
    })
}
