//! Environment variable access with typed errors.

use thiserror::Error;

/// A required environment variable is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads a required environment variable.
///
/// Thin wrapper around `std::env::var` that turns an absent (or non-unicode)
/// value into a [`MissingEnvVarError`] naming the variable, so callers can
/// surface which setting is missing instead of a bare `VarError`.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_variable_is_returned() {
        unsafe { std::env::set_var("SHARED_UTILS_TEST_PRESENT", "value") };
        assert_eq!(
            get_env_var("SHARED_UTILS_TEST_PRESENT").unwrap(),
            "value".to_string()
        );
        unsafe { std::env::remove_var("SHARED_UTILS_TEST_PRESENT") };
    }

    #[test]
    fn missing_variable_names_itself() {
        let err = get_env_var("SHARED_UTILS_TEST_DEFINITELY_MISSING").unwrap_err();
        assert_eq!(err.0, "SHARED_UTILS_TEST_DEFINITELY_MISSING");
        assert!(
            err.to_string()
                .contains("SHARED_UTILS_TEST_DEFINITELY_MISSING")
        );
    }
}
