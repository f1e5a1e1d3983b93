//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Error carried out of the shellexpand lookup context.
struct MissingVar {
    name: String,
}

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// Values without a `${` marker are returned unchanged; bare `$VAR`
/// syntax is not expanded. A reference to an unset variable without a
/// default is a [`ConfigError::EnvVar`] naming the offending field.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, MissingVar> {
        std::env::var(var).map(Some).map_err(|_| MissingVar {
            name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.name),
    })
}
