//! Static error definitions.

use crate::problem::Problem;
use http::StatusCode;

/// One entry of a service's error catalog.
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    /// Convert this definition into a Problem with the given detail.
    #[inline]
    pub fn as_problem(&self, detail: impl Into<String>) -> Problem {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Problem::new(status, self.title, detail.into())
            .with_code(self.code)
            .with_type(self.type_url)
    }

    /// Problem with request-specific detail, instance and trace id.
    pub fn with_context(
        &self,
        detail: impl Into<String>,
        instance: &str,
        trace_id: Option<String>,
    ) -> Problem {
        crate::finalize(self.as_problem(detail), instance, trace_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK_MISSING: ErrDef = ErrDef {
        status: 404,
        title: "Not Found",
        code: "TEST_NOT_FOUND",
        type_url: "https://errors.bookshelf.dev/TEST_NOT_FOUND",
    };

    #[test]
    fn err_def_to_problem_works() {
        let problem = BOOK_MISSING.as_problem("Book 3 does not exist");
        assert_eq!(problem.status, StatusCode::NOT_FOUND);
        assert_eq!(problem.title, "Not Found");
        assert_eq!(problem.detail, "Book 3 does not exist");
        assert_eq!(problem.code, "TEST_NOT_FOUND");
        assert_eq!(
            problem.type_url,
            "https://errors.bookshelf.dev/TEST_NOT_FOUND"
        );
    }

    #[test]
    fn with_context_sets_instance_and_trace() {
        let problem = BOOK_MISSING.with_context("gone", "/books/3", Some("42".to_owned()));
        assert_eq!(problem.instance, "/books/3");
        assert_eq!(problem.trace_id.as_deref(), Some("42"));
    }

    #[test]
    fn invalid_status_falls_back_to_500() {
        let def = ErrDef {
            status: 1,
            title: "Broken",
            code: "BROKEN",
            type_url: "about:blank",
        };
        assert_eq!(def.as_problem("x").status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
