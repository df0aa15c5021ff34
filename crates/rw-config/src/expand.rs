//! Environment variable expansion for plugin settings.
//!
//! Only the `${VAR}` and `${VAR:-default}` forms are recognized. Strings
//! without `${` are returned untouched, so `$` in paths stays literal.

use crate::ConfigError;

/// Expand `${VAR}` references in a single setting.
///
/// `field` names the setting in error messages (e.g. `sqlalchemy.base_class`).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var).map(Some).map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand every entry of a list setting, indexing the field name.
pub(crate) fn expand_env_list(values: &[String], field: &str) -> Result<Vec<String>, ConfigError> {
    values
        .iter()
        .enumerate()
        .map(|(idx, value)| expand_env(value, &format!("{field}[{idx}]")))
        .collect()
}

/// Variable referenced without a default and not set in the environment.
struct UnsetVar(String);
