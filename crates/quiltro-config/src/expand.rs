//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` references in a configuration value.
///
/// Supports:
/// - `${VAR}` - expands to the value of VAR, errors if unset
/// - `${VAR:-default}` - expands to VAR if set, otherwise uses default
///
/// Only braced references are expanded. Bare `$name` and an unclosed `${`
/// are copied through, so gateway URLs containing `$` stay intact.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut expanded = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let (literal, tail) = rest.split_at(start);
        let (reference, tail) = tail.split_at(len + 1);
        expanded.push_str(literal);
        expanded.push_str(&expand_reference(reference, field)?);
        rest = tail;
    }
    expanded.push_str(rest);

    Ok(expanded)
}

/// Expand a single `${...}` reference through `shellexpand`.
fn expand_reference(reference: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env_with_context(reference, |var| -> Result<Option<String>, LookupError> {
        std::env::var(var).map(Some).map_err(|_| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.var_name),
    })
}

struct LookupError {
    var_name: String,
}
