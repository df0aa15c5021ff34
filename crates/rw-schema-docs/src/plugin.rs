//! Plugin lifecycle for documentation hosts.
//!
//! A host calls [`SchemaDocsPlugin::on_config`] once per build and then
//! [`SchemaDocsPlugin::on_page_markdown`] for every page.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rw_config::PluginConfig;
use rw_schema::{SchemaSource, resolve_base_class};

use crate::context::PluginContext;
use crate::dispatcher::process_markdown;

/// Schema documentation plugin.
///
/// Disabled when no base class is configured or the schema cannot be
/// resolved. A disabled plugin leaves every page untouched.
#[derive(Debug, Default)]
pub struct SchemaDocsPlugin {
    context: Option<PluginContext>,
}

impl SchemaDocsPlugin {
    /// Resolve the configured schema and build the rendering context.
    ///
    /// `base_dir` is the directory relative paths in `config` resolve
    /// against, normally the directory holding `rw.toml`.
    #[must_use]
    pub fn on_config(config: &PluginConfig, base_dir: &Path) -> Self {
        if config.base_class.trim().is_empty() {
            tracing::warn!("No base_class specified in plugin configuration");
            return Self::default();
        }

        let paths = search_paths(config, base_dir);
        match resolve_base_class(&config.base_class, &paths) {
            Ok(schema) => {
                tracing::info!(
                    base_class = %config.base_class,
                    tables = schema.table_names().len(),
                    "Loaded schema"
                );
                Self::with_context(PluginContext::new(Arc::new(schema), config.clone()))
            }
            Err(e) => {
                tracing::error!(
                    base_class = %config.base_class,
                    error = %e,
                    "Failed to load schema, directive processing disabled"
                );
                Self::default()
            }
        }
    }

    /// Create an enabled plugin around an existing context.
    #[must_use]
    pub fn with_context(context: PluginContext) -> Self {
        Self {
            context: Some(context),
        }
    }

    /// Whether pages will be processed.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.context.is_some()
    }

    /// Rendering context, when enabled.
    #[must_use]
    pub fn context(&self) -> Option<&PluginContext> {
        self.context.as_ref()
    }

    /// Expand directives in a page.
    ///
    /// Returns `None` when the page should be left unchanged.
    #[must_use]
    pub fn on_page_markdown(&self, markdown: &str) -> Option<String> {
        let Some(context) = &self.context else {
            tracing::warn!("Schema not loaded, skipping sqlalchemy tag processing");
            return None;
        };
        process_markdown(context, markdown)
    }
}

/// Directories searched for schema modules, in priority order.
///
/// `app_path` comes first, then `search_paths` in order, then `base_dir`
/// itself. Relative entries resolve against `base_dir`. Entries that do not
/// exist or are not directories are skipped with a warning.
#[must_use]
pub fn search_paths(config: &PluginConfig, base_dir: &Path) -> Vec<PathBuf> {
    let configured = config
        .app_path
        .iter()
        .map(|p| ("app_path", p))
        .chain(
            config
                .search_paths
                .iter()
                .flatten()
                .map(|p| ("search path", p)),
        );

    let mut paths: Vec<PathBuf> = Vec::new();
    for (kind, raw) in configured {
        let path = base_dir.join(raw);
        if !path.exists() {
            tracing::warn!(kind, path = %path.display(), "Path does not exist");
            continue;
        }
        if !path.is_dir() {
            tracing::warn!(kind, path = %path.display(), "Path is not a directory");
            continue;
        }
        if !paths.contains(&path) {
            tracing::debug!(path = %path.display(), "Added schema search path");
            paths.push(path);
        }
    }

    let base = base_dir.to_path_buf();
    if !paths.contains(&base) {
        paths.push(base);
    }
    paths
}
