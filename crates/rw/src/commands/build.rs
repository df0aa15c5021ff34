//! `rw build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use rw_config::{CliSettings, Config};

use super::{load_plugin, render_page};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output directory for rendered pages (default: .rw/build/).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Schema base class reference, `module.path.Name` (overrides config).
    #[arg(long, env = "RW_BASE_CLASS")]
    base_class: Option<String>,

    /// Write HTML pages instead of markdown.
    #[arg(long)]
    html: bool,

    /// Path to configuration file (default: auto-discover rw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            base_class: self.base_class,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source_dir = &config.docs_resolved.source_dir;
        let output_dir = &config.docs_resolved.output_dir;

        if !source_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "Source directory not found: {}",
                source_dir.display()
            )));
        }

        output.info(&format!("Source: {}", source_dir.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        let plugin = load_plugin(&config, &output);
        ensure_output_dir(output_dir)?;

        let pages = collect_pages(source_dir)?;
        let mut expanded = 0usize;
        for page in &pages {
            let markdown = std::fs::read_to_string(page)?;
            let (content, changed) = render_page(&plugin, &markdown, self.html);
            if changed {
                expanded += 1;
            }

            let target = target_path(source_dir, output_dir, page, self.html);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, content)?;
            tracing::debug!(page = %page.display(), target = %target.display(), "Wrote page");
        }

        output.success(&format!(
            "Built {} page(s), {expanded} with schema directives, to {}",
            pages.len(),
            output_dir.display()
        ));
        Ok(())
    }
}

/// Find markdown pages under `source_dir`, sorted by path.
fn collect_pages(source_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let pattern = source_dir.join("**").join("*.md");
    let mut pages: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable path");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    pages.sort();
    Ok(pages)
}

/// Output location for a page, keeping its path relative to the source.
fn target_path(source_dir: &Path, output_dir: &Path, page: &Path, html: bool) -> PathBuf {
    let relative = page.strip_prefix(source_dir).unwrap_or(page);
    let target = output_dir.join(relative);
    if html {
        target.with_extension("html")
    } else {
        target
    }
}

/// Create the output directory. Inside a `.rw/` project directory, also
/// drop a `.gitignore` so build output stays out of version control.
fn ensure_output_dir(output_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(output_dir)?;

    let project_dir = output_dir
        .ancestors()
        .find(|dir| dir.file_name().is_some_and(|name| name == ".rw"));
    if let Some(project_dir) = project_dir {
        let gitignore_path = project_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let _ = std::fs::write(&gitignore_path, "# Automatically created by rw\n*\n");
        }
    }

    Ok(())
}
