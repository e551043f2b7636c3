//! Validation utilities.

use crate::{FieldError, MercatoError};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `MercatoError::Validation` on failure.
    fn validate_request(&self) -> Result<(), MercatoError> {
        self.validate().map_err(|e| validation_errors_to_mercato_error(&e))
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to a `MercatoError`.
#[must_use]
pub fn validation_errors_to_mercato_error(errors: &ValidationErrors) -> MercatoError {
    MercatoError::Validation(field_errors(errors))
}

/// Flattens validator errors into one `FieldError` per violation.
///
/// Nested structs produce `parent.child` paths and lists produce
/// `parent[index].child` paths.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut result = Vec::new();
    collect(errors, None, &mut result);
    result
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    let path = |field: &str| match prefix {
        Some(prefix) => format!("{prefix}.{field}"),
        None => field.to_string(),
    };

    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        let field: &str = field.as_ref();
        match kind {
            ValidationErrorsKind::Field(field_errs) => {
                for err in field_errs {
                    let message = err
                        .message
                        .as_ref()
                        .map_or_else(|| format!("Validation failed for field '{field}'"), ToString::to_string);
                    out.push(FieldError::new(path(field), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect(nested, Some(&path(field)), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, item) in items {
                    collect(item, Some(&format!("{}[{}]", path(field), index)), out);
                }
            }
        }
    }
}

/// Common validation rules.
pub mod rules {
    use std::borrow::Cow;
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank").with_message(Cow::Borrowed("Must not be blank")));
        }
        Ok(())
    }

    /// Validates a latitude in degrees.
    pub fn latitude(value: f64) -> Result<(), ValidationError> {
        if !(-90.0..=90.0).contains(&value) {
            return Err(ValidationError::new("latitude_out_of_range"));
        }
        Ok(())
    }

    /// Validates a longitude in degrees.
    pub fn longitude(value: f64) -> Result<(), ValidationError> {
        if !(-180.0..=180.0).contains(&value) {
            return Err(ValidationError::new("longitude_out_of_range"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct ContactRequest {
        #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
        name: String,
        #[validate(email(message = "Invalid email format"))]
        email: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Wrapper {
        #[validate(length(min = 1))]
        title: String,
        #[validate(nested)]
        contact: ContactRequest,
    }

    #[test]
    fn test_single_field() {
        let req = ContactRequest {
            name: "ab".to_string(),
            email: "valid@example.com".to_string(),
        };

        let violations = field_errors(&req.validate().unwrap_err());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[0].message, "Name must be at least 3 characters");
    }

    #[test]
    fn test_two_fields_are_reported_one_to_one() {
        let req = ContactRequest {
            name: "ab".to_string(),
            email: "invalid".to_string(),
        };

        match req.validate_request() {
            Err(MercatoError::Validation(violations)) => {
                assert_eq!(violations.len(), 2);
                assert_eq!(violations[0].field, "email");
                assert_eq!(violations[1].field, "name");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_nested_paths() {
        let req = Wrapper {
            title: "Valid Title".to_string(),
            contact: ContactRequest {
                name: "ab".to_string(),
                email: "valid@example.com".to_string(),
            },
        };

        let violations = field_errors(&req.validate().unwrap_err());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "contact.name");
    }

    #[test]
    fn test_rules() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(latitude(51.5).is_ok());
        assert!(latitude(91.0).is_err());
        assert!(longitude(-180.0).is_ok());
        assert!(longitude(180.5).is_err());
    }
}
