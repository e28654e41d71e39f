//! Error types shared by the bookshelf services.
//!
//! - RFC 9457 Problem Details (`Problem`)
//! - Static error catalog entries (`ErrDef`)
//! - Axum response helpers (feature `axum`)

pub mod catalog;
pub mod problem;
#[cfg(feature = "axum")]
pub mod response;

pub use catalog::ErrDef;
pub use problem::{APPLICATION_PROBLEM_JSON, Problem, ValidationViolation};

/// Attach instance and `trace_id` to a Problem.
pub fn finalize(mut p: Problem, instance: &str, trace_id: Option<String>) -> Problem {
    p = p.with_instance(instance);
    if let Some(tid) = trace_id {
        p = p.with_trace_id(tid);
    }
    p
}

/// Current span id as a string, used as the problem `trace_id`.
#[cfg(feature = "axum")]
#[must_use]
pub fn current_trace_id() -> Option<String> {
    tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string())
}
