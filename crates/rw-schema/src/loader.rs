//! Schema document loading and base class resolution.
//!
//! A schema document is a YAML or JSON map from metadata collection names
//! to table definitions:
//!
//! ```yaml
//! Base:
//!   naming_convention:
//!     pk: "pk_%(table_name)s"
//!   tables:
//!     - name: users
//!       columns:
//!         - { name: id, type: INTEGER, primary_key: true }
//!         - { name: username, type: VARCHAR(50), unique: true, nullable: false }
//! ```
//!
//! A base class reference `app.models.Base` resolves to collection `Base`
//! in `app/models.yaml` (or `.yml`, `.json`) on the first search path that
//! has the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    Column, ColumnDefault, Constraint, ForeignKey, Index, MetadataSchema, NamingConvention,
    SchemaError, Table,
};

/// File extensions tried for a schema module, in order.
pub const SCHEMA_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

#[derive(Deserialize)]
struct MetadataDef {
    #[serde(default)]
    naming_convention: NamingConvention,
    #[serde(default)]
    tables: Vec<TableDef>,
}

#[derive(Deserialize)]
struct TableDef {
    name: String,
    #[serde(default)]
    schema: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    columns: Vec<ColumnDef>,
    #[serde(default)]
    indexes: Vec<Index>,
    #[serde(default)]
    constraints: Vec<Constraint>,
}

#[derive(Deserialize)]
struct ColumnDef {
    name: String,
    #[serde(rename = "type")]
    data_type: String,
    /// Defaults to `true`, or `false` for primary key columns.
    #[serde(default)]
    nullable: Option<bool>,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    index: bool,
    #[serde(default)]
    default: Option<ColumnDefault>,
    #[serde(default)]
    foreign_key: Option<ForeignKey>,
    #[serde(default)]
    foreign_keys: Vec<ForeignKey>,
    #[serde(default)]
    comment: Option<String>,
}

impl From<ColumnDef> for Column {
    fn from(def: ColumnDef) -> Self {
        let mut foreign_keys = def.foreign_keys;
        if let Some(fk) = def.foreign_key {
            foreign_keys.insert(0, fk);
        }
        Self {
            nullable: def.nullable.unwrap_or(!def.primary_key),
            name: def.name,
            data_type: def.data_type,
            primary_key: def.primary_key,
            unique: def.unique,
            index: def.index,
            default: def.default,
            foreign_keys,
            comment: def.comment,
        }
    }
}

impl From<TableDef> for Table {
    fn from(def: TableDef) -> Self {
        Self {
            name: def.name,
            schema: def.schema,
            comment: def.comment,
            columns: def.columns.into_iter().map(Column::from).collect(),
            indexes: def.indexes,
            constraints: def.constraints,
        }
    }
}

/// Parse a schema document into its named metadata collections.
///
/// The format is picked from the extension of `path`: `.json` is parsed as
/// JSON, anything else as YAML. `path` is only used for format detection
/// and error messages.
///
/// # Errors
///
/// Returns [`SchemaError::Parse`] for malformed documents and
/// [`SchemaError::DuplicateTable`] for repeated table names.
pub fn parse_document(
    path: &Path,
    content: &str,
) -> Result<BTreeMap<String, MetadataSchema>, SchemaError> {
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let parsed: Result<BTreeMap<String, MetadataDef>, String> = if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else if content.trim().is_empty() {
        Ok(BTreeMap::new())
    } else {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    };
    let defs = parsed.map_err(|message| SchemaError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    defs.into_iter()
        .map(|(name, def)| {
            let tables = def.tables.into_iter().map(Table::from).collect();
            let schema = MetadataSchema::with_convention(tables, &def.naming_convention)?;
            Ok((name, schema))
        })
        .collect()
}

/// Read and parse a schema document from disk.
///
/// # Errors
///
/// Returns [`SchemaError::Io`] if the file cannot be read, plus any error
/// from [`parse_document`].
pub fn load_document(path: &Path) -> Result<BTreeMap<String, MetadataSchema>, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(path, &content)
}

/// Resolve a `module.path.Name` reference to a metadata collection.
///
/// Search paths are tried in order; within each, the extensions in
/// [`SCHEMA_EXTENSIONS`] are tried in order. The first existing file wins.
///
/// # Errors
///
/// - [`SchemaError::InvalidReference`] if the reference has no module part
/// - [`SchemaError::ModuleNotFound`] if no schema file exists for the module
/// - [`SchemaError::ClassNotFound`] if the file lacks the requested name
pub fn resolve_base_class(
    reference: &str,
    search_paths: &[PathBuf],
) -> Result<MetadataSchema, SchemaError> {
    let (module, name) = split_reference(reference)?;
    let relative: PathBuf = module.split('.').collect();
    let relative = &relative;

    let path = search_paths
        .iter()
        .flat_map(|dir| {
            SCHEMA_EXTENSIONS
                .iter()
                .map(move |ext| dir.join(relative).with_extension(ext))
        })
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| SchemaError::ModuleNotFound {
            module: module.to_owned(),
            searched: search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })?;

    tracing::debug!(path = %path.display(), module, "Loading schema module");
    let mut collections = load_document(&path)?;

    collections
        .remove(name)
        .ok_or_else(|| SchemaError::ClassNotFound {
            name: name.to_owned(),
            module: module.to_owned(),
            available: collections.keys().cloned().collect::<Vec<_>>().join(", "),
        })
}

fn split_reference(reference: &str) -> Result<(&str, &str), SchemaError> {
    match reference.trim().rsplit_once('.') {
        Some((module, name)) if !name.is_empty() && module.split('.').all(|p| !p.is_empty()) => {
            Ok((module, name))
        }
        _ => Err(SchemaError::InvalidReference(reference.to_owned())),
    }
}
