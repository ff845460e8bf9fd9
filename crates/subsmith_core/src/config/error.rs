//! Config coercion error types.

/// Errors produced when coercing raw values against a schema.
///
/// Every variant names the offending parameter; coercion is
/// all-or-nothing, so no partial config escapes alongside one of these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A raw text value could not be parsed as the declared type.
    #[error("Parameter '{name}': cannot parse '{value}' as {expected}")]
    ParseFailure {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// The raw value's type does not match the declared type.
    #[error("Parameter '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A choice value is not a member of the allowed options.
    #[error("Parameter '{name}': '{value}' is not one of the allowed options")]
    NotAnOption { name: String, value: String },
}

impl ConfigError {
    /// Create a parse-failure error.
    pub fn parse_failure(
        name: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::ParseFailure {
            name: name.into(),
            value: value.into(),
            expected,
        }
    }

    /// Create a type-mismatch error.
    pub fn type_mismatch(
        name: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// Create a not-an-option error.
    pub fn not_an_option(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotAnOption {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The name of the parameter that failed.
    pub fn parameter(&self) -> &str {
        match self {
            Self::ParseFailure { name, .. }
            | Self::TypeMismatch { name, .. }
            | Self::NotAnOption { name, .. } => name,
        }
    }
}
