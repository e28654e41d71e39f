use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required: missing or invalid token")]
    Unauthenticated,

    #[error("Forbidden: insufficient permissions")]
    Forbidden,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "axum-ext")]
mod http_mapping {
    use super::AuthError;
    use bookshelf_errors::ErrDef;

    const UNAUTHENTICATED: ErrDef = ErrDef {
        status: 401,
        title: "Unauthorized",
        code: "AUTH_UNAUTHENTICATED",
        type_url: "https://errors.bookshelf.dev/auth/unauthenticated",
    };

    const FORBIDDEN: ErrDef = ErrDef {
        status: 403,
        title: "Forbidden",
        code: "AUTH_FORBIDDEN",
        type_url: "https://errors.bookshelf.dev/auth/forbidden",
    };

    const INTERNAL: ErrDef = ErrDef {
        status: 500,
        title: "Internal Server Error",
        code: "AUTH_INTERNAL",
        type_url: "https://errors.bookshelf.dev/auth/internal",
    };

    impl axum::response::IntoResponse for AuthError {
        fn into_response(self) -> axum::response::Response {
            let trace_id = bookshelf_errors::current_trace_id();
            let problem = match &self {
                AuthError::Unauthenticated
                | AuthError::InvalidToken(_)
                | AuthError::TokenExpired => {
                    UNAUTHENTICATED.with_context(self.to_string(), "", trace_id)
                }
                AuthError::Forbidden => FORBIDDEN.with_context(self.to_string(), "", trace_id),
                AuthError::Internal(msg) => {
                    tracing::error!(error = %msg, "authentication pipeline failure");
                    INTERNAL.with_context("Authentication could not be completed", "", trace_id)
                }
            };
            problem.into_response()
        }
    }
}
