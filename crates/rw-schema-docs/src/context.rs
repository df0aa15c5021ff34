//! Per-build rendering context.

use std::fmt;
use std::sync::Arc;

use rw_config::PluginConfig;
use rw_schema::SchemaSource;

use crate::options::TableGenerationOptions;

/// Resolved schema plus plugin configuration, shared by every directive in
/// a build.
#[derive(Clone)]
pub struct PluginContext {
    schema: Arc<dyn SchemaSource>,
    config: PluginConfig,
    options: TableGenerationOptions,
}

impl PluginContext {
    /// Create a context. Generation defaults are derived from `config` once.
    #[must_use]
    pub fn new(schema: Arc<dyn SchemaSource>, config: PluginConfig) -> Self {
        let options =
            TableGenerationOptions::from_style_and_display(&config.table_style, &config.display);
        Self {
            schema,
            config,
            options,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &dyn SchemaSource {
        self.schema.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Generation options before any directive parameters are applied.
    #[must_use]
    pub fn base_options(&self) -> &TableGenerationOptions {
        &self.options
    }
}

impl fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginContext")
            .field("tables", &self.schema.table_names())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
