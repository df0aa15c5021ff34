//! Table selection for multi-table directives.

use std::collections::HashSet;

use rw_config::FilterConfig;

/// Output order for multi-table rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Ascending by table name.
    #[default]
    Name,
    /// Schema declaration order.
    Declared,
}

impl SortBy {
    /// Parse a directive `sort_by` value.
    ///
    /// Unknown values log a warning and keep declaration order.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Self::Name,
            "none" | "declared" => Self::Declared,
            _ => {
                tracing::warn!(value, "Unknown sort_by value, keeping declaration order");
                Self::Declared
            }
        }
    }
}

/// Select the tables a multi-table directive documents.
///
/// The directive's include list replaces the configured one when non-empty;
/// exclude lists from both levels are combined. An empty include list means
/// every table.
#[must_use]
pub fn resolve_tables(
    all: &[String],
    include_override: Option<&[String]>,
    exclude_override: Option<&[String]>,
    plugin_filter: &FilterConfig,
    sort_by: SortBy,
) -> Vec<String> {
    let include: &[String] = include_override
        .filter(|i| !i.is_empty())
        .or(plugin_filter.include_tables.as_deref())
        .unwrap_or_default();

    let exclude: HashSet<&str> = exclude_override
        .into_iter()
        .flatten()
        .chain(plugin_filter.exclude_tables.iter().flatten())
        .map(String::as_str)
        .collect();

    let mut selected: Vec<String> = all
        .iter()
        .filter(|name| include.is_empty() || include.iter().any(|i| i == *name))
        .filter(|name| !exclude.contains(name.as_str()))
        .cloned()
        .collect();

    if sort_by == SortBy::Name {
        selected.sort();
    }
    selected
}
