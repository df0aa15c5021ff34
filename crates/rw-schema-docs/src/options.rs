//! Table generation options.
//!
//! [`TableGenerationOptions`] is built once from the plugin configuration and
//! then merged with each directive's parameters. Merging never mutates the
//! base value.
//!
//! Invalid values are never fatal. A bad configuration value falls back to
//! the built-in default; a bad directive value keeps whatever the
//! configuration produced. Both cases log a warning.

use std::fmt;

use rw_config::{DEFAULT_FIELDS, DisplayConfig, RawSetting, TableStyleConfig};

use crate::params::{TagParams, parse_fields};

/// A column table field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Column name.
    Column,
    /// Declared type.
    Type,
    /// Nullable flag.
    Nullable,
    /// Default value.
    Default,
    /// Primary key flag.
    PrimaryKey,
    /// Unique flag.
    Unique,
    /// Foreign key targets.
    ForeignKey,
}

impl Field {
    /// All fields in their default order.
    pub const ALL: [Self; 7] = [
        Self::Column,
        Self::Type,
        Self::Nullable,
        Self::Default,
        Self::PrimaryKey,
        Self::Unique,
        Self::ForeignKey,
    ];

    /// Parse a field name. Names are matched exactly.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Field name as written in configuration and in table headers.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Column => "column",
            Self::Type => "type",
            Self::Nullable => "nullable",
            Self::Default => "default",
            Self::PrimaryKey => "primary_key",
            Self::Unique => "unique",
            Self::ForeignKey => "foreign_key",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Markdown heading level, 1 through 6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Level used for table headings, and for any invalid configured level.
    pub const TABLE_DEFAULT: Self = Self(2);
    /// Level used for schema group headings when nothing is configured.
    pub const SCHEMA_DEFAULT: Self = Self(1);

    /// Validate a numeric level.
    #[must_use]
    pub fn new(level: i64) -> Option<Self> {
        u8::try_from(level)
            .ok()
            .filter(|l| (1..=6).contains(l))
            .map(Self)
    }

    /// Parse a level from directive text.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<i64>().ok().and_then(Self::new)
    }

    /// Numeric level.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Heading prefix, e.g. `##`.
    #[must_use]
    pub fn hashes(self) -> String {
        "#".repeat(usize::from(self.0))
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        Self::TABLE_DEFAULT
    }
}

/// Column table alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Parse an alignment name, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Separator cell for a markdown table column.
    #[must_use]
    pub fn separator(self) -> &'static str {
        match self {
            Self::Left => ":---",
            Self::Center => ":---:",
            Self::Right => "---:",
        }
    }
}

/// SQL dialect for `CREATE TABLE` output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SqlDialect {
    #[default]
    Generic,
    Postgresql,
    Mysql,
    Sqlite,
    Mssql,
}

impl SqlDialect {
    /// Parse a dialect name, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "generic" | "default" => Some(Self::Generic),
            "postgresql" | "postgres" => Some(Self::Postgresql),
            "mysql" | "mariadb" => Some(Self::Mysql),
            "sqlite" => Some(Self::Sqlite),
            "mssql" => Some(Self::Mssql),
            _ => None,
        }
    }
}

/// Validate a configured heading level, falling back to level 2.
fn config_heading_level(value: &RawSetting, setting: &str) -> HeadingLevel {
    value
        .as_integer()
        .and_then(HeadingLevel::new)
        .unwrap_or_else(|| {
            tracing::warn!(
                setting,
                value = %value,
                "Invalid heading level, must be between 1 and 6. Using default 2"
            );
            HeadingLevel::TABLE_DEFAULT
        })
}

/// Fully resolved settings for rendering one or more tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableGenerationOptions {
    /// Column table fields, in render order.
    pub fields: Vec<Field>,
    /// Render the indexes section.
    pub show_indexes: bool,
    /// Render the constraints section.
    pub show_constraints: bool,
    /// Render `CREATE TABLE` DDL.
    pub show_sql: bool,
    /// Dialect for DDL output.
    pub sql_dialect: SqlDialect,
    /// Heading level for table headings.
    pub heading_level: HeadingLevel,
    /// Heading level for schema group headings.
    pub schema_heading_level: HeadingLevel,
    /// Column table alignment.
    pub text_align: TextAlign,
    /// Symbol for true flags.
    pub tick: String,
    /// Symbol for false flags.
    pub cross: String,
}

impl Default for TableGenerationOptions {
    fn default() -> Self {
        Self::from_style_and_display(&TableStyleConfig::default(), &DisplayConfig::default())
    }
}

impl TableGenerationOptions {
    /// Build options from plugin-wide configuration.
    #[must_use]
    pub fn from_style_and_display(style: &TableStyleConfig, display: &DisplayConfig) -> Self {
        let mut fields: Vec<Field> = style
            .fields
            .iter()
            .filter_map(|name| {
                let field = Field::parse(name.trim());
                if field.is_none() {
                    tracing::debug!(field = %name, "Ignoring unknown field");
                }
                field
            })
            .collect();
        if fields.is_empty() {
            tracing::warn!("No valid table_style.fields configured, using defaults");
            fields = DEFAULT_FIELDS.iter().filter_map(|f| Field::parse(f)).collect();
        }

        let heading_level = config_heading_level(&style.heading_level, "heading_level");
        let schema_heading_level =
            config_heading_level(&style.schema_heading_level, "schema_heading_level");
        let text_align = style
            .text_align
            .as_str()
            .and_then(TextAlign::parse)
            .unwrap_or_else(|| {
                let value = &style.text_align;
                tracing::warn!(
                    value = %value,
                    "Invalid text_align, must be left, center or right. Using default left"
                );
                TextAlign::Left
            });
        let sql_dialect = display
            .sql_dialect
            .as_str()
            .and_then(SqlDialect::parse)
            .unwrap_or_else(|| {
                let value = &display.sql_dialect;
                tracing::warn!(value = %value, "Unknown sql_dialect. Using generic");
                SqlDialect::Generic
            });

        Self {
            fields,
            show_indexes: display.show_indexes,
            show_constraints: display.show_constraints,
            show_sql: display.show_sql,
            sql_dialect,
            heading_level,
            schema_heading_level,
            text_align,
            tick: style.tick.clone(),
            cross: style.cross.clone(),
        }
    }

    /// Return a copy with directive parameters applied.
    ///
    /// Only parameters present in `params` are applied. Invalid values are
    /// logged and ignored.
    #[must_use]
    pub fn merge_with_tag_params(&self, params: &TagParams) -> Self {
        let mut merged = self.clone();

        if let Some(fields) = parse_fields(params.get_str("fields")) {
            if fields.is_empty() {
                tracing::warn!("No valid fields in directive, keeping configured fields");
            } else {
                merged.fields = fields;
            }
        }

        if let Some(show) = params.get_bool("show_indexes") {
            merged.show_indexes = show;
        }
        if let Some(show) = params.get_bool("show_constraints") {
            merged.show_constraints = show;
        }
        if let Some(show) = params.get_bool("show_sql") {
            merged.show_sql = show;
        }

        if let Some(value) = params.get_str("sql_dialect") {
            match SqlDialect::parse(value) {
                Some(dialect) => merged.sql_dialect = dialect,
                None => tracing::warn!(value, "Unknown sql_dialect in directive, ignoring"),
            }
        }
        if let Some(value) = params.get_str("heading_level") {
            match HeadingLevel::parse(value) {
                Some(level) => merged.heading_level = level,
                None => tracing::warn!(
                    value,
                    "Invalid heading_level in directive, must be between 1 and 6"
                ),
            }
        }
        if let Some(value) = params.get_str("schema_heading_level") {
            match HeadingLevel::parse(value) {
                Some(level) => merged.schema_heading_level = level,
                None => tracing::warn!(
                    value,
                    "Invalid schema_heading_level in directive, must be between 1 and 6"
                ),
            }
        }
        if let Some(value) = params.get_str("text_align") {
            match TextAlign::parse(value) {
                Some(align) => merged.text_align = align,
                None => tracing::warn!(
                    value,
                    "Invalid text_align in directive, must be left, center or right"
                ),
            }
        }

        merged
    }

    /// Symbol for a boolean flag.
    #[must_use]
    pub fn flag(&self, value: bool) -> &str {
        if value { &self.tick } else { &self.cross }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn params(raw: &str) -> TagParams {
        TagParams::parse(Some(raw))
    }

    #[test]
    fn test_defaults() {
        let options = TableGenerationOptions::default();
        assert_eq!(options.fields, Field::ALL.to_vec());
        assert!(options.show_indexes);
        assert!(options.show_constraints);
        assert!(!options.show_sql);
        assert_eq!(options.sql_dialect, SqlDialect::Generic);
        assert_eq!(options.heading_level.get(), 2);
        assert_eq!(options.schema_heading_level.get(), 1);
        assert_eq!(options.text_align, TextAlign::Left);
        assert_eq!(options.flag(true), rw_config::DEFAULT_TICK);
        assert_eq!(options.flag(false), rw_config::DEFAULT_CROSS);
    }

    #[test]
    fn test_field_parse() {
        assert_eq!(Field::parse("primary_key"), Some(Field::PrimaryKey));
        assert_eq!(Field::parse("Primary_Key"), None);
        assert_eq!(Field::parse("comment"), None);
        assert_eq!(Field::ForeignKey.to_string(), "foreign_key");
    }

    #[test]
    fn test_heading_level_bounds() {
        assert_eq!(HeadingLevel::new(0), None);
        assert_eq!(HeadingLevel::new(7), None);
        assert_eq!(HeadingLevel::new(-1), None);
        assert_eq!(HeadingLevel::new(6).map(HeadingLevel::get), Some(6));
        assert_eq!(HeadingLevel::parse(" 3 ").map(HeadingLevel::hashes), Some("###".to_owned()));
        assert_eq!(HeadingLevel::parse("three"), None);
    }

    #[test]
    fn test_text_align_parse() {
        assert_eq!(TextAlign::parse("CENTER"), Some(TextAlign::Center));
        assert_eq!(TextAlign::parse("Right"), Some(TextAlign::Right));
        assert_eq!(TextAlign::parse("justify"), None);
        assert_eq!(TextAlign::Right.separator(), "---:");
    }

    #[test]
    fn test_from_config_invalid_values_use_defaults() {
        let style = TableStyleConfig {
            heading_level: RawSetting::from(9),
            schema_heading_level: RawSetting::from(0),
            text_align: RawSetting::from("justify"),
            ..TableStyleConfig::default()
        };
        let display = DisplayConfig {
            sql_dialect: RawSetting::from("oracle"),
            ..DisplayConfig::default()
        };
        let options = TableGenerationOptions::from_style_and_display(&style, &display);
        assert_eq!(options.heading_level, HeadingLevel::TABLE_DEFAULT);
        assert_eq!(options.schema_heading_level, HeadingLevel::TABLE_DEFAULT);
        assert_eq!(options.text_align, TextAlign::Left);
        assert_eq!(options.sql_dialect, SqlDialect::Generic);
    }

    #[test]
    fn test_from_config_invalid_schema_heading_uses_level_two() {
        let style = TableStyleConfig {
            schema_heading_level: RawSetting::from(9),
            ..TableStyleConfig::default()
        };
        let options =
            TableGenerationOptions::from_style_and_display(&style, &DisplayConfig::default());
        assert_eq!(options.schema_heading_level.get(), 2);
    }

    #[test]
    fn test_from_config_wrongly_typed_values_use_defaults() {
        let style = TableStyleConfig {
            heading_level: RawSetting::from("three"),
            schema_heading_level: RawSetting::Other(toml::Value::Float(2.5)),
            text_align: RawSetting::from(1),
            ..TableStyleConfig::default()
        };
        let display = DisplayConfig {
            sql_dialect: RawSetting::Other(toml::Value::Boolean(true)),
            ..DisplayConfig::default()
        };
        let options = TableGenerationOptions::from_style_and_display(&style, &display);
        assert_eq!(options.heading_level, HeadingLevel::TABLE_DEFAULT);
        assert_eq!(options.schema_heading_level, HeadingLevel::TABLE_DEFAULT);
        assert_eq!(options.text_align, TextAlign::Left);
        assert_eq!(options.sql_dialect, SqlDialect::Generic);
    }

    #[test]
    fn test_from_config_numeric_text_heading_level() {
        let style = TableStyleConfig {
            heading_level: RawSetting::from("3"),
            ..TableStyleConfig::default()
        };
        let options =
            TableGenerationOptions::from_style_and_display(&style, &DisplayConfig::default());
        assert_eq!(options.heading_level.get(), 3);
    }

    #[test]
    fn test_from_config_copies_fields_and_flags() {
        let style = TableStyleConfig {
            fields: vec!["type".to_owned(), "bogus".to_owned(), "column".to_owned()],
            tick: "Y".to_owned(),
            cross: "N".to_owned(),
            heading_level: RawSetting::from(4),
            text_align: RawSetting::from("Center"),
            ..TableStyleConfig::default()
        };
        let display = DisplayConfig {
            show_indexes: false,
            show_sql: true,
            sql_dialect: RawSetting::from("MySQL"),
            ..DisplayConfig::default()
        };
        let options = TableGenerationOptions::from_style_and_display(&style, &display);
        assert_eq!(options.fields, vec![Field::Type, Field::Column]);
        assert_eq!(options.flag(true), "Y");
        assert_eq!(options.heading_level.get(), 4);
        assert_eq!(options.text_align, TextAlign::Center);
        assert!(!options.show_indexes);
        assert!(options.show_sql);
        assert_eq!(options.sql_dialect, SqlDialect::Mysql);
    }

    #[test]
    fn test_from_config_all_fields_invalid_uses_defaults() {
        let style = TableStyleConfig {
            fields: vec!["bogus".to_owned()],
            ..TableStyleConfig::default()
        };
        let options =
            TableGenerationOptions::from_style_and_display(&style, &DisplayConfig::default());
        assert_eq!(options.fields, Field::ALL.to_vec());
    }

    #[test]
    fn test_merge_empty_is_identity() {
        let options = TableGenerationOptions::default();
        assert_eq!(options.merge_with_tag_params(&TagParams::default()), options);
    }

    #[test]
    fn test_merge_overrides() {
        let options = TableGenerationOptions::default();
        let merged = options.merge_with_tag_params(&params(
            r#"fields="column,type" show_indexes=false show_sql=true sql_dialect="sqlite" heading_level="3" schema_heading_level="2" text_align="right""#,
        ));
        assert_eq!(merged.fields, vec![Field::Column, Field::Type]);
        assert!(!merged.show_indexes);
        assert!(merged.show_constraints);
        assert!(merged.show_sql);
        assert_eq!(merged.sql_dialect, SqlDialect::Sqlite);
        assert_eq!(merged.heading_level.get(), 3);
        assert_eq!(merged.schema_heading_level.get(), 2);
        assert_eq!(merged.text_align, TextAlign::Right);
        assert_eq!(options, TableGenerationOptions::default(), "base untouched");
    }

    #[test]
    fn test_merge_invalid_heading_keeps_current() {
        let options = TableGenerationOptions::default()
            .merge_with_tag_params(&params(r#"heading_level="4""#));
        for bad in ["0", "7", "x"] {
            let merged =
                options.merge_with_tag_params(&params(&format!(r#"heading_level="{bad}""#)));
            assert_eq!(merged.heading_level.get(), 4, "heading_level={bad}");
        }
    }

    #[test]
    fn test_merge_invalid_align_keeps_current() {
        let merged = TableGenerationOptions::default()
            .merge_with_tag_params(&params(r#"text_align="justify""#));
        assert_eq!(merged.text_align, TextAlign::Left);
    }

    #[test]
    fn test_merge_string_bool_ignored() {
        let merged = TableGenerationOptions::default()
            .merge_with_tag_params(&params(r#"show_indexes="false""#));
        assert!(merged.show_indexes);
    }

    #[test]
    fn test_merge_all_invalid_fields_keeps_current() {
        let merged = TableGenerationOptions::default()
            .merge_with_tag_params(&params(r#"fields="foo,bar""#));
        assert_eq!(merged.fields, Field::ALL.to_vec());
    }
}
