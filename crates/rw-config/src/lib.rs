//! Configuration management for RW schema documentation.
//!
//! Parses `rw.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! The `[sqlalchemy]` section configures the schema directive. Its style,
//! filter and display blocks hold raw values: heading levels and alignment
//! are validated later, when generation options are built, so an invalid
//! value degrades to a default instead of failing the load.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `sqlalchemy.base_class`
//! - `sqlalchemy.app_path`
//! - `sqlalchemy.search_paths`

mod expand;

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the schema base class reference.
    pub base_class: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rw.toml";

/// Default symbol for true flags.
pub const DEFAULT_TICK: &str = "✔️";

/// Default symbol for false flags.
pub const DEFAULT_CROSS: &str = "❌";

/// Default column table fields, in render order.
pub const DEFAULT_FIELDS: &[&str] = &[
    "column",
    "type",
    "nullable",
    "default",
    "primary_key",
    "unique",
    "foreign_key",
];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Schema directive configuration (optional section).
    pub sqlalchemy: Option<PluginConfig>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Directory relative paths are resolved against (set after loading).
    #[serde(skip)]
    pub base_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Output directory for rendered pages.
    pub output_dir: PathBuf,
}

/// Schema directive configuration.
///
/// Created once at startup and never mutated afterwards.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PluginConfig {
    /// Base class reference, `module.path.Name`.
    pub base_class: String,
    /// Application directory added to the schema search paths.
    pub app_path: Option<String>,
    /// Extra directories searched for schema modules.
    #[serde(alias = "python_path")]
    pub search_paths: Option<Vec<String>>,
    /// Table styling.
    pub table_style: TableStyleConfig,
    /// Table filtering.
    pub filter: FilterConfig,
    /// Display options.
    pub display: DisplayConfig,
}

/// Table styling configuration.
///
/// Heading levels and alignment are kept raw; they are validated when
/// generation options are built.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableStyleConfig {
    /// Symbol for true flags.
    pub tick: String,
    /// Symbol for false flags.
    pub cross: String,
    /// Column table fields, in render order.
    pub fields: Vec<String>,
    /// Heading level for table headings (1-6).
    pub heading_level: RawSetting,
    /// Heading level for schema group headings (1-6).
    pub schema_heading_level: RawSetting,
    /// Column table alignment: `left`, `center` or `right`.
    pub text_align: RawSetting,
}

impl Default for TableStyleConfig {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK.to_owned(),
            cross: DEFAULT_CROSS.to_owned(),
            fields: DEFAULT_FIELDS.iter().map(|f| (*f).to_owned()).collect(),
            heading_level: RawSetting::Integer(2),
            schema_heading_level: RawSetting::Integer(1),
            text_align: RawSetting::from("left"),
        }
    }
}

/// Scalar setting accepted with any TOML type.
///
/// A value of the wrong type does not fail the load; consumers read it with
/// [`RawSetting::as_integer`] or [`RawSetting::as_str`] and fall back when
/// neither fits.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawSetting {
    /// TOML integer.
    Integer(i64),
    /// TOML string.
    Text(String),
    /// Any other TOML value.
    Other(toml::Value),
}

impl RawSetting {
    /// Integer value. Strings holding a decimal integer are accepted.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Other(_) => None,
        }
    }

    /// String value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for RawSetting {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for RawSetting {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl fmt::Display for RawSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Table filtering configuration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    /// Only document these tables.
    pub include_tables: Option<Vec<String>>,
    /// Never document these tables.
    pub exclude_tables: Option<Vec<String>>,
}

/// Display configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Render the indexes section.
    pub show_indexes: bool,
    /// Render the constraints section.
    pub show_constraints: bool,
    /// Render `CREATE TABLE` DDL.
    pub show_sql: bool,
    /// SQL dialect for DDL output.
    pub sql_dialect: RawSetting,
    /// Group multi-table output by schema namespace.
    pub group_by_schema: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_indexes: true,
            show_constraints: true,
            show_sql: false,
            sql_dialect: RawSetting::from("generic"),
            group_by_schema: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`sqlalchemy.base_class`").
        field: String,
        /// Error message (e.g., "${`MODELS`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rw.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Schema directive settings, if the `[sqlalchemy]` section is present.
    #[must_use]
    pub fn plugin(&self) -> Option<&PluginConfig> {
        self.sqlalchemy.as_ref()
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(base_class) = &settings.base_class {
            self.sqlalchemy
                .get_or_insert_with(PluginConfig::default)
                .base_class
                .clone_from(base_class);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            sqlalchemy: None,
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join(".rw").join("build"),
            },
            base_dir: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Heading levels, alignment and dialect are not checked here; invalid
    /// values fall back to defaults with a warning at render time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(plugin) = &self.sqlalchemy {
            require_non_empty(&plugin.table_style.tick, "sqlalchemy.table_style.tick")?;
            require_non_empty(&plugin.table_style.cross, "sqlalchemy.table_style.cross")?;
            if plugin.table_style.fields.is_empty() {
                return Err(ConfigError::Validation(
                    "sqlalchemy.table_style.fields cannot be empty".to_owned(),
                ));
            }
            if let Some(paths) = &plugin.search_paths {
                for path in paths {
                    require_non_empty(path.trim(), "sqlalchemy.search_paths")?;
                }
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut plugin) = self.sqlalchemy {
            plugin.base_class = expand::expand_env(&plugin.base_class, "sqlalchemy.base_class")?;
            if let Some(ref app_path) = plugin.app_path {
                plugin.app_path = Some(expand::expand_env(app_path, "sqlalchemy.app_path")?);
            }
            if let Some(ref paths) = plugin.search_paths {
                plugin.search_paths =
                    Some(expand::expand_env_list(paths, "sqlalchemy.search_paths")?);
            }
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), ".rw/build"),
        };
        self.base_dir = config_dir.to_path_buf();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(
            config.docs_resolved.output_dir,
            PathBuf::from("/test/.rw/build")
        );
        assert_eq!(config.base_dir, PathBuf::from("/test"));
        assert!(config.plugin().is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.sqlalchemy.is_none());
    }

    #[test]
    fn test_parse_plugin_defaults() {
        let toml = r#"
[sqlalchemy]
base_class = "app.models.Base"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let plugin = config.plugin().unwrap();
        assert_eq!(plugin.base_class, "app.models.Base");
        assert_eq!(plugin.table_style, TableStyleConfig::default());
        assert_eq!(plugin.filter, FilterConfig::default());
        assert_eq!(plugin.display, DisplayConfig::default());
        assert_eq!(plugin.table_style.fields.len(), 7);
        assert_eq!(plugin.table_style.heading_level, RawSetting::Integer(2));
        assert!(plugin.display.show_indexes);
        assert!(!plugin.display.show_sql);
    }

    #[test]
    fn test_parse_full_plugin_config() {
        let toml = r#"
[sqlalchemy]
base_class = "app.models.Base"
app_path = "src"
search_paths = ["lib", "vendor"]

[sqlalchemy.table_style]
tick = "yes"
cross = "no"
fields = ["column", "type"]
heading_level = 3
schema_heading_level = 2
text_align = "center"

[sqlalchemy.filter]
include_tables = ["users", "posts"]
exclude_tables = ["logs"]

[sqlalchemy.display]
show_indexes = false
show_constraints = true
show_sql = true
sql_dialect = "postgresql"
group_by_schema = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let plugin = config.plugin().unwrap();
        assert_eq!(plugin.app_path.as_deref(), Some("src"));
        assert_eq!(
            plugin.search_paths,
            Some(vec!["lib".to_owned(), "vendor".to_owned()])
        );
        assert_eq!(plugin.table_style.tick, "yes");
        assert_eq!(plugin.table_style.fields, vec!["column", "type"]);
        assert_eq!(plugin.table_style.heading_level.as_integer(), Some(3));
        assert_eq!(plugin.table_style.text_align.as_str(), Some("center"));
        assert_eq!(
            plugin.filter.exclude_tables,
            Some(vec!["logs".to_owned()])
        );
        assert!(!plugin.display.show_indexes);
        assert!(plugin.display.show_sql);
        assert_eq!(plugin.display.sql_dialect.as_str(), Some("postgresql"));
        assert!(plugin.display.group_by_schema);
    }

    #[test]
    fn test_python_path_alias() {
        let toml = r#"
[sqlalchemy]
base_class = "models.Base"
python_path = ["lib"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.plugin().unwrap().search_paths,
            Some(vec!["lib".to_owned()])
        );
    }

    #[test]
    fn test_invalid_heading_level_still_parses() {
        let toml = r#"
[sqlalchemy.table_style]
heading_level = 9
text_align = "justify"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let style = &config.plugin().unwrap().table_style;
        assert_eq!(style.heading_level.as_integer(), Some(9));
        assert_eq!(style.text_align.as_str(), Some("justify"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wrongly_typed_style_values_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("rw.toml");
        std::fs::write(
            &config_path,
            r#"
[sqlalchemy]
base_class = "app.models.Base"

[sqlalchemy.table_style]
heading_level = "three"
schema_heading_level = 2.5
text_align = 1

[sqlalchemy.display]
sql_dialect = true
"#,
        )
        .unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();
        let plugin = config.plugin().unwrap();
        assert_eq!(plugin.table_style.heading_level.as_integer(), None);
        assert_eq!(plugin.table_style.heading_level.to_string(), "three");
        assert_eq!(plugin.table_style.schema_heading_level.as_integer(), None);
        assert_eq!(plugin.table_style.text_align.as_str(), None);
        assert_eq!(plugin.display.sql_dialect.as_str(), None);
    }

    #[test]
    fn test_raw_setting_accepts_numeric_text() {
        assert_eq!(RawSetting::from(" 4 ").as_integer(), Some(4));
        assert_eq!(RawSetting::from(4).as_integer(), Some(4));
        assert_eq!(RawSetting::from(4).as_str(), None);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "documentation"
output_dir = "site"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/documentation")
        );
        assert_eq!(
            config.docs_resolved.output_dir,
            PathBuf::from("/project/site")
        );
        assert_eq!(config.base_dir, PathBuf::from("/project"));
    }

    #[test]
    fn test_apply_cli_settings_base_class_creates_section() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            base_class: Some("app.models.Base".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        let plugin = config.plugin().unwrap();
        assert_eq!(plugin.base_class, "app.models.Base");
        assert_eq!(plugin.display, DisplayConfig::default());
    }

    #[test]
    fn test_apply_cli_settings_dirs() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            output_dir: Some(PathBuf::from("/custom/out")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
        assert_eq!(
            config.docs_resolved.output_dir,
            PathBuf::from("/custom/out")
        );
        assert!(config.plugin().is_none());
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert!(config.plugin().is_none());
    }

    #[test]
    fn test_expand_env_vars_plugin_fields() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("RW_TEST_APP_ROOT", "/srv/app");
        }

        let toml = r#"
[sqlalchemy]
base_class = "${RW_TEST_MODELS:-app.models.Base}"
app_path = "${RW_TEST_APP_ROOT}/src"
search_paths = ["${RW_TEST_APP_ROOT}/lib", "vendor"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        let plugin = config.plugin().unwrap();
        assert_eq!(plugin.base_class, "app.models.Base");
        assert_eq!(plugin.app_path.as_deref(), Some("/srv/app/src"));
        assert_eq!(
            plugin.search_paths,
            Some(vec!["/srv/app/lib".to_owned(), "vendor".to_owned()])
        );

        unsafe {
            std::env::remove_var("RW_TEST_APP_ROOT");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RW_TEST_MISSING_BASE");
        }

        let toml = r#"
[sqlalchemy]
base_class = "${RW_TEST_MISSING_BASE}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("sqlalchemy.base_class"));
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_fields() {
        let toml = r"
[sqlalchemy.table_style]
fields = []
";
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fields"));
    }

    #[test]
    fn test_validate_empty_tick() {
        let toml = r#"
[sqlalchemy.table_style]
tick = ""
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sqlalchemy.table_style.tick"));
    }

    #[test]
    fn test_validate_blank_search_path() {
        let toml = r#"
[sqlalchemy]
search_paths = ["lib", "  "]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[docs]\nsource_dir = \"pages\"\n\n[sqlalchemy]\nbase_class = \"models.Base\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path, Some(path.clone()));
        assert_eq!(config.base_dir, dir.path());
        assert_eq!(config.docs_resolved.source_dir, dir.path().join("pages"));
        assert_eq!(config.plugin().unwrap().base_class, "models.Base");
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/rw.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
