//! Schema error types.

use std::path::PathBuf;

/// Error raised while resolving, loading, or querying schema metadata.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Base class reference is not of the form `module.path.Name`.
    #[error("Invalid base_class format '{0}'. Expected format: 'module.path.ClassName'")]
    InvalidReference(String),
    /// No schema file for the module was found on the search paths.
    #[error("Failed to import module '{module}': no schema file found in {searched}")]
    ModuleNotFound {
        /// Dotted module path from the reference.
        module: String,
        /// Search paths that were tried, comma-separated.
        searched: String,
    },
    /// The schema file exists but does not define the requested name.
    #[error("Class '{name}' not found in module '{module}'. Available: {available}")]
    ClassNotFound {
        /// Requested metadata collection name.
        name: String,
        /// Dotted module path from the reference.
        module: String,
        /// Names defined by the module, comma-separated.
        available: String,
    },
    /// I/O error while reading a schema file.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Schema document is malformed.
    #[error("Invalid schema document {}: {message}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// Foreign key reference is not of the form `table.column`.
    #[error("Invalid foreign key reference '{0}'. Expected format: 'table.column'")]
    InvalidForeignKey(String),
    /// Two tables with the same name in one metadata collection.
    #[error("Duplicate table '{0}' in metadata")]
    DuplicateTable(String),
    /// Table is not part of the metadata.
    #[error("Table '{0}' not found in metadata")]
    TableNotFound(String),
    /// Error reported by a schema source backend.
    #[error("{0}")]
    Backend(String),
}
