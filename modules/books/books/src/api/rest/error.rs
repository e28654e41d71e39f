use axum::extract::rejection::{JsonRejection, PathRejection};
use bookshelf_errors::{ErrDef, Problem, ValidationViolation, current_trace_id};

use crate::domain::error::DomainError;

pub const FORBIDDEN: ErrDef = ErrDef {
    status: 403,
    title: "Forbidden",
    code: "BOOKS_FORBIDDEN",
    type_url: "https://errors.bookshelf.dev/books/forbidden",
};

pub const NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Not Found",
    code: "BOOKS_NOT_FOUND",
    type_url: "https://errors.bookshelf.dev/books/not-found",
};

pub const BAD_REQUEST: ErrDef = ErrDef {
    status: 400,
    title: "Bad Request",
    code: "BOOKS_BAD_REQUEST",
    type_url: "https://errors.bookshelf.dev/books/bad-request",
};

pub const VALIDATION: ErrDef = ErrDef {
    status: 422,
    title: "Validation Failed",
    code: "BOOKS_VALIDATION",
    type_url: "https://errors.bookshelf.dev/books/validation",
};

pub const DATABASE: ErrDef = ErrDef {
    status: 500,
    title: "Internal Server Error",
    code: "BOOKS_DATABASE",
    type_url: "https://errors.bookshelf.dev/books/database",
};

/// Map a domain error to an RFC 9457 problem.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let trace_id = current_trace_id();

    match e {
        DomainError::Forbidden { .. } => FORBIDDEN.with_context(e.to_string(), instance, trace_id),
        DomainError::Validation { violations } => VALIDATION
            .with_context(e.to_string(), instance, trace_id)
            .with_errors(
                violations
                    .iter()
                    .map(|v| ValidationViolation::new(v.field, v.message.clone()))
                    .collect(),
            ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            DATABASE.with_context("An internal database error occurred", instance, trace_id)
        }
    }
}

pub fn book_not_found(id: i64, instance: &str) -> Problem {
    NOT_FOUND.with_context(
        format!("Book with id {id} was not found"),
        instance,
        current_trace_id(),
    )
}

pub fn path_rejection(rejection: &PathRejection, instance: &str) -> Problem {
    BAD_REQUEST.with_context(rejection.body_text(), instance, current_trace_id())
}

pub fn json_rejection(rejection: &JsonRejection, instance: &str) -> Problem {
    BAD_REQUEST.with_context(rejection.body_text(), instance, current_trace_id())
}
