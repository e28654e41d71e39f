use thiserror::Error;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Domain-specific errors using thiserror.
///
/// A missing book is not an error; lookups return `Ok(None)`.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Forbidden: capability '{required}' is required")]
    Forbidden { required: String },

    #[error("Validation failed: {}", describe(.violations))]
    Validation { violations: Vec<FieldViolation> },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    #[must_use]
    pub fn forbidden(required: impl Into<String>) -> Self {
        Self::Forbidden {
            required: required.into(),
        }
    }

    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_fields() {
        let err = DomainError::validation(vec![
            FieldViolation {
                field: "title",
                message: "must not be blank".to_owned(),
            },
            FieldViolation {
                field: "author",
                message: "must not be blank".to_owned(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: title: must not be blank; author: must not be blank"
        );
    }
}
