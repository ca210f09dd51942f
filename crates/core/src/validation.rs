//! Validation

use std::borrow::Cow;

use thiserror::Error;

/// A structural validation failure, naming the first offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    field: String,
    message: Cow<'static, str>,
}

impl ValidationError {
    /// Create a validation error for the given field.
    pub fn new(field: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a "required" error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }

    /// Prefix the field path, e.g. `price` becomes `items[2].price`.
    #[must_use]
    pub fn within(self, parent: &str) -> Self {
        Self {
            field: format!("{parent}.{}", self.field),
            message: self.message,
        }
    }

    /// The offending field path.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Human readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Reject blank (empty or whitespace-only) strings.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming `field` when `value` is blank.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(())
}

/// Loose structural email check: one `@`, a non-empty local part and a dotted domain.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming `field` when `value` does not look like an address.
pub fn require_email(field: &str, value: &str) -> Result<(), ValidationError> {
    require_non_blank(field, value)?;

    let value = value.trim();

    let valid = value
        .split_once('@')
        .filter(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
        })
        .is_some();

    if !valid || value.chars().any(char::is_whitespace) {
        return Err(ValidationError::new(field, "must be a valid email address"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_prefixes_field_path() {
        let error = ValidationError::required("price").within("items[2]");

        assert_eq!(error.field(), "items[2].price");
        assert_eq!(error.to_string(), "items[2].price: is required");
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(require_non_blank("name", "").is_err());
        assert!(require_non_blank("name", "   ").is_err());
        assert!(require_non_blank("name", "Destroyer").is_ok());
    }

    #[test]
    fn email_shapes() {
        assert!(require_email("email", "ace@fairway.example").is_ok());
        assert!(require_email("email", "  ace@fairway.example ").is_ok());

        for bad in [
            "",
            "ace",
            "@fairway.example",
            "ace@",
            "ace@localhost",
            "ace@@fairway.example",
            "ace@fairway.",
            "ace @fairway.example",
        ] {
            assert!(require_email("email", bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
