//! Relational schema metadata for RW.
//!
//! This crate provides a read-only view of reflected database schema
//! metadata (tables, columns, indexes, constraints) that documentation
//! renderers can consume without depending on any particular reflection
//! library.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`SchemaSource`] trait: the narrow capability interface renderers depend on
//! - [`MetadataSchema`]: in-memory implementation backed by [`Table`] values
//! - [`resolve_base_class`]: loads a named metadata collection from a YAML or
//!   JSON schema file found on a list of search paths
//!
//! # Example
//!
//! ```
//! use rw_schema::{Column, MetadataSchema, SchemaSource, Table};
//!
//! let schema = MetadataSchema::new(vec![
//!     Table::new("users")
//!         .with_column(Column::new("id", "INTEGER").primary_key())
//!         .with_column(Column::new("username", "VARCHAR(50)").unique().not_null()),
//! ]);
//!
//! assert_eq!(schema.table_names(), vec!["users".to_owned()]);
//! assert!(schema.has_table("users"));
//! ```

mod convention;
mod error;
mod loader;
mod model;
mod source;

pub use convention::NamingConvention;
pub use error::SchemaError;
pub use loader::{SCHEMA_EXTENSIONS, load_document, parse_document, resolve_base_class};
pub use model::{
    Column, ColumnDefault, Constraint, ConstraintKind, DefaultValue, ForeignKey, Index, Table,
};
pub use source::{MetadataSchema, SchemaSource};
