//! `rw render` command implementation.

use std::path::PathBuf;

use clap::Args;
use rw_config::{CliSettings, Config};

use super::{load_plugin, render_page};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover rw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Schema base class reference, `module.path.Name` (overrides config).
    #[arg(long, env = "RW_BASE_CLASS")]
    base_class: Option<String>,

    /// Write the result to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert the result to HTML.
    #[arg(long)]
    html: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            base_class: self.base_class,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let plugin = load_plugin(&config, &output);

        let markdown = std::fs::read_to_string(&self.file)?;
        let (content, changed) = render_page(&plugin, &markdown, self.html);
        if !changed {
            output.info(&format!("No directives in {}", self.file.display()));
        }

        match self.output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, content)?;
                output.success(&format!("Rendered to {}", path.display()));
            }
            None => output.document(&content)?,
        }
        Ok(())
    }
}
