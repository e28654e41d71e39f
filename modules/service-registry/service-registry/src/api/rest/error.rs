use axum::extract::rejection::JsonRejection;
use bookshelf_errors::{ErrDef, Problem, current_trace_id};

use crate::domain::error::DomainError;

pub const INSTANCE_NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Not Found",
    code: "REGISTRY_INSTANCE_NOT_FOUND",
    type_url: "https://errors.bookshelf.dev/registry/instance-not-found",
};

pub const VALIDATION: ErrDef = ErrDef {
    status: 422,
    title: "Validation Failed",
    code: "REGISTRY_VALIDATION",
    type_url: "https://errors.bookshelf.dev/registry/validation",
};

pub const BAD_REQUEST: ErrDef = ErrDef {
    status: 400,
    title: "Bad Request",
    code: "REGISTRY_BAD_REQUEST",
    type_url: "https://errors.bookshelf.dev/registry/bad-request",
};

pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let trace_id = current_trace_id();
    match e {
        DomainError::InstanceNotFound { .. } => {
            INSTANCE_NOT_FOUND.with_context(e.to_string(), instance, trace_id)
        }
        DomainError::Validation { .. } => VALIDATION.with_context(e.to_string(), instance, trace_id),
    }
}

pub fn json_rejection(rejection: &JsonRejection, instance: &str) -> Problem {
    BAD_REQUEST.with_context(rejection.body_text(), instance, current_trace_id())
}
