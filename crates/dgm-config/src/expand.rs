//! Environment variable expansion for configuration strings.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `${VAR}`, `${VAR:-default}`, `$VAR` and a leading `~` in `value`.
///
/// `field` names the configuration key for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_plain_value_unchanged() {
        assert_eq!(expand_env("dgm-render", "builder.program").unwrap(), "dgm-render");
    }

    #[test]
    fn test_expand_default_when_unset() {
        let value = expand_env("${DGM_TEST_SURELY_UNSET_VAR:-fallback}/bin", "builder.program");

        assert_eq!(value.unwrap(), "fallback/bin");
    }

    #[test]
    fn test_expand_unset_is_error() {
        let err = expand_env("${DGM_TEST_SURELY_UNSET_VAR}", "render.output_dir").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "Environment variable error in render.output_dir: ${DGM_TEST_SURELY_UNSET_VAR} not set"
        );
    }
}
