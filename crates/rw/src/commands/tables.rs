//! `rw tables` command implementation.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Args;
use rw_config::{CliSettings, Config, FilterConfig};
use rw_schema::{SchemaSource, resolve_base_class};
use rw_schema_docs::{SortBy, resolve_tables, search_paths};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tables command.
#[derive(Args)]
pub(crate) struct TablesArgs {
    /// Path to configuration file (default: auto-discover rw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Schema base class reference, `module.path.Name` (overrides config).
    #[arg(long, env = "RW_BASE_CLASS")]
    base_class: Option<String>,
}

impl TablesArgs {
    /// Resolve the schema and list its tables.
    ///
    /// Unlike page rendering, resolution failures are reported as errors.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            base_class: self.base_class,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let plugin_config = config
            .plugin()
            .filter(|p| !p.base_class.trim().is_empty())
            .ok_or_else(|| {
                CliError::Validation(
                    "No sqlalchemy.base_class configured (set it in rw.toml or pass --base-class)"
                        .to_owned(),
                )
            })?;

        let paths = search_paths(plugin_config, &config.base_dir);
        let schema = resolve_base_class(&plugin_config.base_class, &paths)?;

        output.heading(&plugin_config.base_class)?;
        for (label, detail) in table_entries(&schema, &plugin_config.filter)? {
            output.entry(&label, &detail)?;
        }
        Ok(())
    }
}

/// Label and detail line for every table, in declaration order.
fn table_entries(
    schema: &dyn SchemaSource,
    filter: &FilterConfig,
) -> Result<Vec<(String, String)>, CliError> {
    let names = schema.table_names();
    let selected: HashSet<String> = resolve_tables(&names, None, None, filter, SortBy::Declared)
        .into_iter()
        .collect();

    names
        .into_iter()
        .map(|name| -> Result<(String, String), CliError> {
            let columns = schema.columns(&name)?.len();
            let detail = if selected.contains(&name) {
                format!("({columns} columns)")
            } else {
                format!("({columns} columns, filtered out)")
            };
            let label = match schema.namespace(&name) {
                Some(namespace) => format!("{namespace}.{name}"),
                None => name,
            };
            Ok((label, detail))
        })
        .collect()
}
