//! Rendering error types.

use rw_schema::SchemaError;

/// Error raised while rendering schema documentation.
///
/// These never reach the host: the dispatcher turns them into HTML comments
/// in the output document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The schema source failed to provide table metadata.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
