use axum::response::{IntoResponse, Response};
use bookshelf_errors::{ErrDef, Problem, current_trace_id};
use thiserror::Error;

use crate::filters::FilterRejection;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("No route matches '{path}'")]
    RouteNotFound { path: String },

    #[error("Request rejected by filter {0}")]
    FilterRejected(#[from] FilterRejection),

    #[error("No live instance of '{service}'")]
    NoInstances { service: String },

    #[error("Discovery of '{service}' failed: {message}")]
    Discovery { service: String, message: String },

    #[error("Upstream request failed: {message}")]
    Upstream { message: String },

    #[error("Upstream did not answer within {timeout_ms} ms")]
    UpstreamTimeout { timeout_ms: u128 },
}

pub const ROUTE_NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Not Found",
    code: "GATEWAY_ROUTE_NOT_FOUND",
    type_url: "https://errors.bookshelf.dev/gateway/route-not-found",
};

pub const FILTER_UNAUTHENTICATED: ErrDef = ErrDef {
    status: 401,
    title: "Unauthorized",
    code: "GATEWAY_FILTER_REJECTED",
    type_url: "https://errors.bookshelf.dev/gateway/filter-rejected",
};

pub const FILTER_FORBIDDEN: ErrDef = ErrDef {
    status: 403,
    title: "Forbidden",
    code: "GATEWAY_FILTER_REJECTED",
    type_url: "https://errors.bookshelf.dev/gateway/filter-rejected",
};

pub const NO_INSTANCES: ErrDef = ErrDef {
    status: 503,
    title: "Service Unavailable",
    code: "GATEWAY_NO_INSTANCES",
    type_url: "https://errors.bookshelf.dev/gateway/no-instances",
};

pub const DISCOVERY: ErrDef = ErrDef {
    status: 503,
    title: "Service Unavailable",
    code: "GATEWAY_DISCOVERY",
    type_url: "https://errors.bookshelf.dev/gateway/discovery",
};

pub const UPSTREAM: ErrDef = ErrDef {
    status: 502,
    title: "Bad Gateway",
    code: "GATEWAY_UPSTREAM",
    type_url: "https://errors.bookshelf.dev/gateway/upstream",
};

pub const UPSTREAM_TIMEOUT: ErrDef = ErrDef {
    status: 504,
    title: "Gateway Timeout",
    code: "GATEWAY_UPSTREAM_TIMEOUT",
    type_url: "https://errors.bookshelf.dev/gateway/upstream-timeout",
};

impl GatewayError {
    fn def(&self) -> &'static ErrDef {
        match self {
            Self::RouteNotFound { .. } => &ROUTE_NOT_FOUND,
            Self::FilterRejected(FilterRejection::Unauthenticated { .. }) => &FILTER_UNAUTHENTICATED,
            Self::FilterRejected(FilterRejection::Forbidden { .. }) => &FILTER_FORBIDDEN,
            Self::NoInstances { .. } => &NO_INSTANCES,
            Self::Discovery { .. } => &DISCOVERY,
            Self::Upstream { .. } => &UPSTREAM,
            Self::UpstreamTimeout { .. } => &UPSTREAM_TIMEOUT,
        }
    }

    #[must_use]
    pub fn to_problem(&self, instance: &str) -> Problem {
        self.def()
            .with_context(self.to_string(), instance, current_trace_id())
    }

    /// Problem response for the request at `path`, with a log line.
    #[must_use]
    pub fn into_response_for(self, path: &str) -> Response {
        match &self {
            Self::Upstream { .. } | Self::UpstreamTimeout { .. } | Self::Discovery { .. } => {
                tracing::warn!(error = %self, path, "request not forwarded");
            }
            _ => tracing::info!(error = %self, path, "request not forwarded"),
        }
        self.to_problem(path).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn statuses_follow_failure_class() {
        let cases = [
            (GatewayError::RouteNotFound { path: "/x".to_owned() }, StatusCode::NOT_FOUND),
            (
                GatewayError::NoInstances { service: "books-service".to_owned() },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                GatewayError::Discovery {
                    service: "books-service".to_owned(),
                    message: "down".to_owned(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (GatewayError::Upstream { message: "reset".to_owned() }, StatusCode::BAD_GATEWAY),
            (GatewayError::UpstreamTimeout { timeout_ms: 5 }, StatusCode::GATEWAY_TIMEOUT),
            (
                GatewayError::from(FilterRejection::Unauthenticated {
                    filter: "bearer-presence",
                    reason: "none".to_owned(),
                }),
                StatusCode::UNAUTHORIZED,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.to_problem("/books/1").status, status, "{err}");
        }
    }

    #[test]
    fn no_instances_code() {
        let p = GatewayError::NoInstances {
            service: "books-service".to_owned(),
        }
        .to_problem("/books/1");
        assert_eq!(p.code, "GATEWAY_NO_INSTANCES");
        assert_eq!(p.instance, "/books/1");
    }
}
