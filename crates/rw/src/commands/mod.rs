//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod render;
pub(crate) mod tables;

pub(crate) use build::BuildArgs;
pub(crate) use render::RenderArgs;
pub(crate) use tables::TablesArgs;

use pulldown_cmark::{Options, Parser, html};
use rw_config::Config;
use rw_schema_docs::SchemaDocsPlugin;

use crate::output::Output;

/// Set up the schema plugin from loaded configuration.
///
/// A missing `[sqlalchemy]` section or an unresolvable schema yields a
/// disabled plugin; pages then pass through unchanged.
pub(crate) fn load_plugin(config: &Config, output: &Output) -> SchemaDocsPlugin {
    let Some(plugin_config) = config.plugin() else {
        output.warning("No [sqlalchemy] section in configuration, directives are left as is");
        return SchemaDocsPlugin::default();
    };

    let plugin = SchemaDocsPlugin::on_config(plugin_config, &config.base_dir);
    if plugin.is_enabled() {
        output.info(&format!("Schema: {}", plugin_config.base_class));
    } else {
        output.warning(&format!(
            "Schema '{}' could not be loaded, directives are left as is (run with --verbose for details)",
            plugin_config.base_class
        ));
    }
    plugin
}

/// Expand directives in a page, optionally converting the result to HTML.
///
/// Returns the page content and whether any directive was expanded.
pub(crate) fn render_page(plugin: &SchemaDocsPlugin, markdown: &str, html: bool) -> (String, bool) {
    let expanded = plugin.on_page_markdown(markdown);
    let changed = expanded.is_some();
    let markdown = expanded.as_deref().unwrap_or(markdown);
    let content = if html {
        markdown_to_html(markdown)
    } else {
        markdown.to_owned()
    };
    (content, changed)
}

/// Convert markdown to HTML with GFM tables enabled.
pub(crate) fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
    );
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
