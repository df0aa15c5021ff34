//! Constraint and index naming conventions.
//!
//! Templates use `%(token)s` placeholders:
//! `table_name`, `column_0_name`, `column_0_label`, `referred_table_name`.

use std::collections::HashMap;

use serde::Deserialize;

/// Template applied to column-level indexes when no `ix` template is set.
const DEFAULT_INDEX_TEMPLATE: &str = "ix_%(column_0_label)s";

/// Naming templates keyed by constraint type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct NamingConvention {
    /// Index names.
    #[serde(default)]
    pub ix: Option<String>,
    /// Unique constraint names.
    #[serde(default)]
    pub uq: Option<String>,
    /// Foreign key constraint names.
    #[serde(default)]
    pub fk: Option<String>,
    /// Primary key constraint names.
    #[serde(default)]
    pub pk: Option<String>,
}

impl NamingConvention {
    /// Primary key constraint name, if a `pk` template is set.
    #[must_use]
    pub fn primary_key_name(&self, table: &str, column: &str) -> Option<String> {
        self.pk
            .as_deref()
            .map(|t| render(t, &tokens(table, column, None)))
    }

    /// Unique constraint name, if a `uq` template is set.
    #[must_use]
    pub fn unique_name(&self, table: &str, column: &str) -> Option<String> {
        self.uq
            .as_deref()
            .map(|t| render(t, &tokens(table, column, None)))
    }

    /// Foreign key constraint name, if an `fk` template is set.
    #[must_use]
    pub fn foreign_key_name(&self, table: &str, column: &str, referred: &str) -> Option<String> {
        self.fk
            .as_deref()
            .map(|t| render(t, &tokens(table, column, Some(referred))))
    }

    /// Index name. Column-level indexes are always named.
    #[must_use]
    pub fn index_name(&self, table: &str, column: &str) -> String {
        let template = self.ix.as_deref().unwrap_or(DEFAULT_INDEX_TEMPLATE);
        render(template, &tokens(table, column, None))
    }
}

fn tokens(table: &str, column: &str, referred: Option<&str>) -> HashMap<&'static str, String> {
    let mut map = HashMap::with_capacity(4);
    map.insert("table_name", table.to_owned());
    map.insert("column_0_name", column.to_owned());
    map.insert("column_0_label", format!("{table}_{column}"));
    if let Some(referred) = referred {
        map.insert("referred_table_name", referred.to_owned());
    }
    map
}

/// Substitute `%(token)s` placeholders. Unknown tokens are left in place.
fn render(template: &str, tokens: &HashMap<&'static str, String>) -> String {
    let mut result = template.to_owned();
    for (token, value) in tokens {
        result = result.replace(&format!("%({token})s"), value);
    }
    result
}
