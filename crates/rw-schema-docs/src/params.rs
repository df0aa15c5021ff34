//! Directive parameter parsing.
//!
//! Two syntaxes are recognized inside a tag:
//!
//! - `key="value"`: quotes are mandatory, the value may be empty or contain
//!   spaces but not `"`
//! - `key=true` / `key=false`: lowercase only, followed by whitespace or the
//!   end of the text
//!
//! Everything else is ignored. The string pass runs before the boolean pass,
//! so a boolean match overwrites a string match for the same key.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::options::Field;

static STRING_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)="([^"]*)""#).unwrap());

static BOOL_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)=(true|false)(?:\s|$)").unwrap());

/// Value of a single directive parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagValue {
    /// Quoted string value.
    Str(String),
    /// Bare `true` / `false`.
    Bool(bool),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Parsed directive parameters.
///
/// Unknown keys are kept; consumers look up only the names they know.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagParams {
    values: HashMap<String, TagValue>,
}

impl TagParams {
    /// Parse raw parameter text. Absent or empty text gives no parameters.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let mut values = HashMap::new();
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Self { values };
        };

        for caps in STRING_PARAM_RE.captures_iter(raw) {
            values.insert(caps[1].to_owned(), TagValue::Str(caps[2].to_owned()));
        }
        for caps in BOOL_PARAM_RE.captures_iter(raw) {
            values.insert(caps[1].to_owned(), TagValue::Bool(&caps[2] == "true"));
        }

        Self { values }
    }

    /// Raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.values.get(key)
    }

    /// String value for a key. Boolean values are not returned.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(TagValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Boolean value for a key. String values are not returned.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(TagValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// First string value among `keys`.
    #[must_use]
    pub fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get_str(key))
    }

    /// Whether a key is present with any value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether no parameters were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of parsed parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K: Into<String>, V: Into<TagValue>> FromIterator<(K, V)> for TagParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse a comma-separated field list.
///
/// Returns `None` for absent or empty input. Otherwise returns the recognized
/// field names in order; unknown names are dropped, so the list may be empty.
#[must_use]
pub fn parse_fields(raw: Option<&str>) -> Option<Vec<Field>> {
    let raw = raw.filter(|r| !r.is_empty())?;
    Some(
        raw.split(',')
            .map(str::trim)
            .filter_map(|name| {
                let field = Field::parse(name);
                if field.is_none() {
                    tracing::debug!(field = name, "Ignoring unknown field");
                }
                field
            })
            .collect(),
    )
}

/// Parse a comma-separated table name list.
///
/// Returns `None` for absent or empty input. Blank entries are skipped.
#[must_use]
pub fn parse_table_list(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw.filter(|r| !r.is_empty())?;
    Some(
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_string_param() {
        let params = TagParams::parse(Some(r#"table="users""#));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get_str("table"), Some("users"));
    }

    #[test]
    fn test_parse_unquoted_value_ignored() {
        assert!(TagParams::parse(Some("table=users")).is_empty());
    }

    #[test]
    fn test_parse_bool_param() {
        let params = TagParams::parse(Some("show_indexes=true"));
        assert_eq!(params.get_bool("show_indexes"), Some(true));
        assert_eq!(params.get_str("show_indexes"), None);
    }

    #[test]
    fn test_parse_bool_is_case_sensitive() {
        assert!(TagParams::parse(Some("show_indexes=True")).is_empty());
        assert!(TagParams::parse(Some("show_indexes=FALSE")).is_empty());
    }

    #[test]
    fn test_parse_bool_requires_boundary() {
        assert!(TagParams::parse(Some("show_sql=trueish")).is_empty());
        let params = TagParams::parse(Some("show_sql=false show_indexes=true"));
        assert_eq!(params.get_bool("show_sql"), Some(false));
        assert_eq!(params.get_bool("show_indexes"), Some(true));
    }

    #[test]
    fn test_parse_empty_and_absent() {
        assert!(TagParams::parse(None).is_empty());
        assert!(TagParams::parse(Some("")).is_empty());
    }

    #[test]
    fn test_parse_mixed_params() {
        let params = TagParams::parse(Some(
            r#"table="users" fields="column, type" show_sql=true heading_level="3""#,
        ));
        assert_eq!(params.get_str("table"), Some("users"));
        assert_eq!(params.get_str("fields"), Some("column, type"));
        assert_eq!(params.get_bool("show_sql"), Some(true));
        assert_eq!(params.get_str("heading_level"), Some("3"));
    }

    #[test]
    fn test_parse_empty_quoted_value() {
        let params = TagParams::parse(Some(r#"include="""#));
        assert_eq!(params.get_str("include"), Some(""));
    }

    #[test]
    fn test_parse_keeps_unknown_keys() {
        let params = TagParams::parse(Some(r#"colour="blue""#));
        assert!(params.contains_key("colour"));
    }

    #[test]
    fn test_bool_pass_overwrites_string_pass() {
        let params = TagParams::parse(Some(r#"show_sql="yes" show_sql=true"#));
        assert_eq!(params.get("show_sql"), Some(&TagValue::Bool(true)));
    }

    #[test]
    fn test_later_string_overwrites_earlier() {
        let params = TagParams::parse(Some(r#"table="a" table="b""#));
        assert_eq!(params.get_str("table"), Some("b"));
    }

    #[test]
    fn test_first_str() {
        let params: TagParams = [("include", "users")].into_iter().collect();
        assert_eq!(
            params.first_str(&["include_tables", "include"]),
            Some("users")
        );
        assert_eq!(params.first_str(&["exclude_tables", "exclude"]), None);
    }

    #[test]
    fn test_parse_fields_filters_unknown() {
        assert_eq!(
            parse_fields(Some("column,invalid,type")),
            Some(vec![Field::Column, Field::Type])
        );
    }

    #[test]
    fn test_parse_fields_trims_whitespace() {
        assert_eq!(
            parse_fields(Some(" column , primary_key ")),
            Some(vec![Field::Column, Field::PrimaryKey])
        );
    }

    #[test]
    fn test_parse_fields_all_invalid() {
        assert_eq!(parse_fields(Some("foo,bar")), Some(Vec::new()));
    }

    #[test]
    fn test_parse_fields_empty() {
        assert_eq!(parse_fields(Some("")), None);
        assert_eq!(parse_fields(None), None);
    }

    #[test]
    fn test_parse_table_list() {
        assert_eq!(
            parse_table_list(Some("users, posts,,  ")),
            Some(vec!["users".to_owned(), "posts".to_owned()])
        );
        assert_eq!(parse_table_list(Some("")), None);
        assert_eq!(parse_table_list(None), None);
    }
}
