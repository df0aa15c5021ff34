//! Database schema documentation for RW markdown.
//!
//! Expands `{% sqlalchemy ... %}` directives in markdown into documentation
//! generated from schema metadata: a heading per table, a column table, and
//! optional indexes, constraints and `CREATE TABLE` sections.
//!
//! # Directive syntax
//!
//! ```text
//! {% sqlalchemy table="users" fields="column,type,nullable" show_sql=true %}
//! {% sqlalchemy exclude="logs,audit" sort_by="name" %}
//! ```
//!
//! String parameters must be double-quoted; booleans are bare `true` or
//! `false`. Unrecognized parameters are ignored.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use rw_config::PluginConfig;
//! use rw_schema::{Column, MetadataSchema, Table};
//! use rw_schema_docs::{PluginContext, process_markdown};
//!
//! let schema = MetadataSchema::new(vec![
//!     Table::new("users").with_column(Column::new("id", "INTEGER").primary_key()),
//! ]);
//! let context = PluginContext::new(Arc::new(schema), PluginConfig::default());
//!
//! let page = process_markdown(&context, r#"{% sqlalchemy table="users" %}"#).unwrap();
//! assert!(page.starts_with("## Table: `users`"));
//! ```

mod context;
mod ddl;
mod dispatcher;
mod error;
mod filter;
mod markdown;
mod options;
mod params;
mod plugin;
mod tag;

pub use context::PluginContext;
pub use ddl::{create_table_sql, quote};
pub use dispatcher::{process_markdown, render_directive};
pub use error::RenderError;
pub use filter::{SortBy, resolve_tables};
pub use markdown::{render_table, render_tables};
pub use options::{Field, HeadingLevel, SqlDialect, TableGenerationOptions, TextAlign};
pub use params::{TagParams, TagValue, parse_fields, parse_table_list};
pub use plugin::{SchemaDocsPlugin, search_paths};
pub use tag::{TagMatch, scan};
